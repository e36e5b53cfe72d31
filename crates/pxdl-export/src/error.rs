//! Failure taxonomy and the mapping to status codes and user messages.
//!
//! Every stage error converts into [`DownloadError`]; callers present a
//! failure using only [`DownloadError::status`] and
//! [`DownloadError::user_message`]. `Display` is for logs and may contain
//! unsanitized upstream text.
//!
//! | Kind                  | Status |
//! |-----------------------|--------|
//! | `EmptySymbol`         | 400    |
//! | `InvalidDate`         | 400    |
//! | `UnknownField`        | 400    |
//! | `ProviderUnavailable` | 500    |
//! | `NoData`              | 404    |
//! | `MissingField`        | 500    |

use std::fmt;

use pxdl_md::ProviderError;

use crate::request::ParseError;
use crate::shape::ShapeError;

/// Longest piece of free text interpolated into a user message.
const MAX_DETAIL_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptySymbol,
    InvalidDate,
    UnknownField,
    ProviderUnavailable,
    NoData,
    MissingField,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptySymbol => "empty_symbol",
            ErrorKind::InvalidDate => "invalid_date",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::ProviderUnavailable => "provider_unavailable",
            ErrorKind::NoData => "no_data",
            ErrorKind::MissingField => "missing_field",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::EmptySymbol | ErrorKind::InvalidDate | ErrorKind::UnknownField => 400,
            ErrorKind::NoData => 404,
            ErrorKind::ProviderUnavailable | ErrorKind::MissingField => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    Parse(ParseError),
    Provider(ProviderError),
    Shape(ShapeError),
}

impl DownloadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DownloadError::Parse(ParseError::EmptySymbol) => ErrorKind::EmptySymbol,
            DownloadError::Parse(ParseError::InvalidDate { .. }) => ErrorKind::InvalidDate,
            DownloadError::Parse(ParseError::UnknownField { .. }) => ErrorKind::UnknownField,
            DownloadError::Provider(_) => ErrorKind::ProviderUnavailable,
            DownloadError::Shape(ShapeError::NoData) => ErrorKind::NoData,
            DownloadError::Shape(ShapeError::MissingField { .. }) => ErrorKind::MissingField,
        }
    }

    pub fn status(&self) -> u16 {
        self.kind().status()
    }

    /// Human-readable message safe to embed in any presentation: no double
    /// quotes, no line breaks, bounded length.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::Parse(ParseError::EmptySymbol) => {
                "Ticker symbol must not be empty".to_string()
            }
            DownloadError::Parse(ParseError::InvalidDate { side, raw: None }) => {
                format!("The {} date is required (YYYY-MM-DD)", side.label())
            }
            DownloadError::Parse(ParseError::InvalidDate {
                side,
                raw: Some(raw),
            }) => format!(
                "The {} date '{}' is not a valid YYYY-MM-DD date",
                side.label(),
                sanitize_detail(raw)
            ),
            DownloadError::Parse(ParseError::UnknownField { name }) => format!(
                "Unknown field '{}'; choose from Open, High, Low, Close",
                sanitize_detail(name)
            ),
            DownloadError::Provider(e) => {
                format!("Download failed: {}", sanitize_detail(&e.to_string()))
            }
            DownloadError::Shape(ShapeError::NoData) => {
                "No data found; check the ticker symbol or date range".to_string()
            }
            DownloadError::Shape(ShapeError::MissingField { field, date }) => {
                format!("Download failed: the provider returned no {field} value for {date}")
            }
        }
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Parse(e) => write!(f, "invalid request: {e}"),
            DownloadError::Provider(e) => write!(f, "provider unavailable: {e}"),
            DownloadError::Shape(e) => write!(f, "shape failed: {e}"),
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Parse(e) => Some(e),
            DownloadError::Provider(e) => Some(e),
            DownloadError::Shape(e) => Some(e),
        }
    }
}

impl From<ParseError> for DownloadError {
    fn from(e: ParseError) -> Self {
        DownloadError::Parse(e)
    }
}

impl From<ProviderError> for DownloadError {
    fn from(e: ProviderError) -> Self {
        DownloadError::Provider(e)
    }
}

impl From<ShapeError> for DownloadError {
    fn from(e: ShapeError) -> Self {
        DownloadError::Shape(e)
    }
}

/// `"` becomes `'`, CR/LF and other control characters become a space, and
/// the result is truncated to [`MAX_DETAIL_CHARS`].
pub fn sanitize_detail(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '"' => '\'',
            c if c.is_control() => ' ',
            c => c,
        })
        .take(MAX_DETAIL_CHARS)
        .collect()
}
