//! Raw form input and the validated download request.
//!
//! Deliberately thin validation: blank symbol, malformed dates and unknown
//! field names are rejected here. Symbol format and date ordering are left to
//! the provider (an inverted range simply yields no rows).

use std::fmt;

use chrono::NaiveDate;
use pxdl_md::{Interval, Market, PriceField};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Form values exactly as submitted; nothing here is trusted to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDownloadForm {
    pub symbol: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub fields: Vec<String>,
}

impl RawDownloadForm {
    /// Collect url-encoded key/value pairs. Repeated `fields` keys accumulate
    /// in order; for the single-valued keys the first occurrence wins.
    /// Unrecognised keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (k, v) in pairs {
            match k.as_ref() {
                "symbol" => {
                    form.symbol.get_or_insert_with(|| v.into());
                }
                "start" => {
                    form.start.get_or_insert_with(|| v.into());
                }
                "end" => {
                    form.end.get_or_insert_with(|| v.into());
                }
                "fields" => form.fields.push(v.into()),
                _ => {}
            }
        }
        form
    }
}

// ---------------------------------------------------------------------------
// Validated request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Trimmed symbol as the user typed it; used for the filename.
    pub symbol: String,
    /// Provider-facing ticker (symbol plus market suffix).
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Non-empty, de-duplicated, in the caller's order.
    pub fields: Vec<PriceField>,
    pub interval: Interval,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSide {
    Start,
    End,
}

impl DateSide {
    pub fn label(&self) -> &'static str {
        match self {
            DateSide::Start => "start",
            DateSide::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Symbol missing or blank after trimming.
    EmptySymbol,
    /// Date missing (`raw == None`) or not `YYYY-MM-DD`.
    InvalidDate { side: DateSide, raw: Option<String> },
    /// Field name outside Open/High/Low/Close.
    UnknownField { name: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptySymbol => write!(f, "symbol is empty"),
            ParseError::InvalidDate { side, raw: None } => {
                write!(f, "{} date is missing", side.label())
            }
            ParseError::InvalidDate {
                side,
                raw: Some(raw),
            } => write!(f, "{} date '{raw}' is not YYYY-MM-DD", side.label()),
            ParseError::UnknownField { name } => write!(f, "unknown field '{name}'"),
        }
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Validate a raw form into a [`DownloadRequest`] for `market`.
///
/// Checks run in a fixed order (symbol, start, end, fields) so a form with
/// several problems always reports the same one.
pub fn parse(form: &RawDownloadForm, market: Market) -> Result<DownloadRequest, ParseError> {
    let symbol = form.symbol.as_deref().unwrap_or("").trim();
    if symbol.is_empty() {
        return Err(ParseError::EmptySymbol);
    }

    let start_date = parse_date(form.start.as_deref(), DateSide::Start)?;
    let end_date = parse_date(form.end.as_deref(), DateSide::End)?;
    let fields = normalize_fields(&form.fields)?;

    Ok(DownloadRequest {
        symbol: symbol.to_string(),
        ticker: market.provider_ticker(symbol),
        start_date,
        end_date,
        fields,
        interval: Interval::Daily,
    })
}

fn parse_date(raw: Option<&str>, side: DateSide) -> Result<NaiveDate, ParseError> {
    let Some(raw) = raw else {
        return Err(ParseError::InvalidDate { side, raw: None });
    };
    let invalid = || ParseError::InvalidDate {
        side,
        raw: Some(raw.to_string()),
    };
    let trimmed = raw.trim();
    // chrono's %Y and %m also take `2024-1-2`, signs and 5-digit years.
    if !is_iso_date_shape(trimmed) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

/// Exactly `DDDD-DD-DD`.
fn is_iso_date_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

/// Blank entries are ignored; no entries at all means every field.
fn normalize_fields(raw: &[String]) -> Result<Vec<PriceField>, ParseError> {
    let mut out: Vec<PriceField> = Vec::with_capacity(PriceField::ALL.len());
    for name in raw.iter().filter(|n| !n.trim().is_empty()) {
        let field = PriceField::parse(name).ok_or_else(|| ParseError::UnknownField {
            name: name.trim().to_string(),
        })?;
        if !out.contains(&field) {
            out.push(field);
        }
    }
    if out.is_empty() {
        out.extend(PriceField::ALL);
    }
    Ok(out)
}
