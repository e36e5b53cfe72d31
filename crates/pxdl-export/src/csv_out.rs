//! CSV rendering of a shaped table.
//!
//! Output contract:
//! - header `Date,<field>,...` in the shaped field order
//! - one row per date: ISO date, then each price with exactly two decimals
//! - UTF-8, no BOM, `\n` after every record
//!
//! Pure and deterministic: the same table always produces the same bytes.

use crate::shape::ShapedTable;

pub const DATE_HEADER: &str = "Date";

pub fn serialize(table: &ShapedTable) -> Vec<u8> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header: Vec<&str> = Vec::with_capacity(table.fields().len() + 1);
    header.push(DATE_HEADER);
    header.extend(table.fields().iter().map(|f| f.as_str()));

    // Writes go to an in-memory Vec, which cannot fail.
    wtr.write_record(&header).expect("csv write to Vec<u8> is infallible");

    for row in table.rows() {
        let mut record: Vec<String> = Vec::with_capacity(row.values.len() + 1);
        record.push(row.date.format("%Y-%m-%d").to_string());
        record.extend(row.values.iter().map(|c| c.to_string()));
        wtr.write_record(&record).expect("csv write to Vec<u8> is infallible");
    }

    wtr.into_inner().expect("csv flush to Vec<u8> is infallible")
}
