//! Price fields, rows and the date-ordered price table.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceField
// ---------------------------------------------------------------------------

/// One of the four daily price columns a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl PriceField {
    /// Default selection, in canonical column order.
    pub const ALL: [PriceField; 4] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
        }
    }

    /// Match a user-supplied field name (trimmed, case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PriceRow
// ---------------------------------------------------------------------------

/// A single trading day as reported by a provider.
///
/// A field absent from `values` means the provider had no value for it on
/// that day; the shaping stage decides whether that is fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub values: BTreeMap<PriceField, f64>,
}

impl PriceRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, field: PriceField, value: f64) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn get(&self, field: PriceField) -> Option<f64> {
        self.values.get(&field).copied()
    }
}

// ---------------------------------------------------------------------------
// PriceTable
// ---------------------------------------------------------------------------

/// Daily rows ordered ascending by date, with no duplicate dates.
///
/// The only constructor is [`PriceTable::from_rows`], so every table in the
/// system upholds the ordering invariant regardless of what the provider sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort by date and collapse duplicate dates (the later row wins).
    pub fn from_rows(mut rows: Vec<PriceRow>) -> Self {
        // Stable sort keeps provider order within a date, so "later" is well defined.
        rows.sort_by_key(|r| r.date);

        let mut out: Vec<PriceRow> = Vec::with_capacity(rows.len());
        for row in rows {
            match out.last_mut() {
                Some(last) if last.date == row.date => *last = row,
                _ => out.push(row),
            }
        }
        Self { rows: out }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}
