//! The downloadable CSV file handed back to the caller.

use crate::request::DownloadRequest;

pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// A finished export: built once per successful request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvArtifact {
    pub filename: String,
    pub content: Vec<u8>,
    pub media_type: &'static str,
}

impl CsvArtifact {
    /// `Content-Disposition` value marking the body as a file download.
    ///
    /// Non-ASCII filenames get an ASCII `filename` fallback plus an RFC 5987
    /// `filename*` carrying the real name.
    pub fn content_disposition(&self) -> String {
        if self.filename.is_ascii() {
            return format!("attachment; filename=\"{}\"", self.filename);
        }
        let fallback: String = self
            .filename
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            rfc5987_encode(&self.filename)
        )
    }

    /// Data rows in the body (excludes the header line).
    pub fn row_count(&self) -> usize {
        self.content
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            .saturating_sub(1)
    }
}

/// `{symbol}_{start}_{end}.csv` with the symbol as the user typed it.
///
/// Only `"`, `\` and control characters become `_`; they would break the
/// quoted header parameter.
pub fn filename_for(req: &DownloadRequest) -> String {
    let symbol: String = req
        .symbol
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!(
        "{symbol}_{}_{}.csv",
        req.start_date.format("%Y-%m-%d"),
        req.end_date.format("%Y-%m-%d")
    )
}

/// Percent-encode everything outside RFC 5987 `attr-char`.
fn rfc5987_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

pub fn build(req: &DownloadRequest, content: Vec<u8>) -> CsvArtifact {
    CsvArtifact {
        filename: filename_for(req),
        content,
        media_type: CSV_MEDIA_TYPE,
    }
}
