//! Project a provider table onto the requested fields and round to cents.

use std::fmt;

use chrono::NaiveDate;
use pxdl_md::{PriceField, PriceTable};

use crate::price::Cents;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedRow {
    pub date: NaiveDate,
    /// One value per [`ShapedTable::fields`] entry, same order.
    pub values: Vec<Cents>,
}

/// Provider rows reduced to exactly the requested columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedTable {
    fields: Vec<PriceField>,
    rows: Vec<ShapedRow>,
}

impl ShapedTable {
    pub fn fields(&self) -> &[PriceField] {
        &self.fields
    }

    pub fn rows(&self) -> &[ShapedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The provider returned zero rows.
    NoData,
    /// A row lacks a usable value for a requested field.
    MissingField { field: PriceField, date: NaiveDate },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::NoData => write!(f, "provider returned no rows"),
            ShapeError::MissingField { field, date } => {
                write!(f, "provider row {date} has no {field} value")
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Shape `table` to `fields`.
///
/// Zero rows is `NoData` whatever was requested. Row order is preserved.
pub fn shape(table: &PriceTable, fields: &[PriceField]) -> Result<ShapedTable, ShapeError> {
    if table.is_empty() {
        return Err(ShapeError::NoData);
    }

    let mut rows = Vec::with_capacity(table.len());
    for row in table.rows() {
        let mut values = Vec::with_capacity(fields.len());
        for &field in fields {
            let cents = row
                .get(field)
                .and_then(Cents::round_from)
                .ok_or(ShapeError::MissingField {
                    field,
                    date: row.date,
                })?;
            values.push(cents);
        }
        rows.push(ShapedRow {
            date: row.date,
            values,
        });
    }

    Ok(ShapedTable {
        fields: fields.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxdl_md::PriceRow;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn full_row(date: NaiveDate, o: f64, h: f64, l: f64, c: f64) -> PriceRow {
        PriceRow::new(date)
            .with(PriceField::Open, o)
            .with(PriceField::High, h)
            .with(PriceField::Low, l)
            .with(PriceField::Close, c)
    }

    fn sample() -> PriceTable {
        PriceTable::from_rows(vec![
            full_row(d(2024, 1, 2), 590.0, 593.0, 589.0, 593.0),
            full_row(d(2024, 1, 3), 584.0, 585.456, 576.0, 578.005),
        ])
    }

    #[test]
    fn empty_table_is_no_data_for_any_selection() {
        for fields in [
            PriceField::ALL.to_vec(),
            vec![PriceField::Close],
            vec![PriceField::Low, PriceField::Open],
        ] {
            assert_eq!(
                shape(&PriceTable::empty(), &fields).unwrap_err(),
                ShapeError::NoData
            );
        }
    }

    #[test]
    fn projects_in_requested_order_and_rounds() {
        let shaped = shape(&sample(), &[PriceField::Close, PriceField::High]).unwrap();
        assert_eq!(shaped.fields(), &[PriceField::Close, PriceField::High]);
        assert_eq!(shaped.len(), 2);
        assert_eq!(
            shaped.rows()[1].values,
            vec![Cents::new(57_801), Cents::new(58_546)]
        );
    }

    #[test]
    fn preserves_row_order() {
        let shaped = shape(&sample(), &PriceField::ALL).unwrap();
        let dates: Vec<NaiveDate> = shaped.rows().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 3)]);
    }

    #[test]
    fn missing_requested_field_is_reported() {
        let table = PriceTable::from_rows(vec![
            full_row(d(2024, 1, 2), 1.0, 1.0, 1.0, 1.0),
            PriceRow::new(d(2024, 1, 3)).with(PriceField::Close, 2.0),
        ]);
        assert!(shape(&table, &[PriceField::Close]).is_ok());
        assert_eq!(
            shape(&table, &[PriceField::Close, PriceField::Open]).unwrap_err(),
            ShapeError::MissingField {
                field: PriceField::Open,
                date: d(2024, 1, 3)
            }
        );
    }

    #[test]
    fn non_finite_value_counts_as_missing() {
        let table = PriceTable::from_rows(vec![
            PriceRow::new(d(2024, 1, 2)).with(PriceField::Close, f64::NAN)
        ]);
        assert!(matches!(
            shape(&table, &[PriceField::Close]),
            Err(ShapeError::MissingField { .. })
        ));
    }
}
