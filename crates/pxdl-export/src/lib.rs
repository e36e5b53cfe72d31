//! pxdl-export
//!
//! The retrieval-shape-serialize pipeline: turn a raw download form into a
//! named CSV artifact, or into exactly one [`DownloadError`].
//!
//! Stages, in order:
//! - [`request`]: raw form -> validated [`DownloadRequest`]
//! - provider fetch (via `pxdl_md::HistoricalProvider`)
//! - [`shape`]: project + round -> [`ShapedTable`]
//! - [`csv_out`]: shaped table -> CSV bytes
//! - [`artifact`]: bytes -> [`CsvArtifact`] with its download filename
//!
//! [`error`] is the single place failures become a status code and a
//! user-visible message. This crate never formats HTTP responses itself.

pub mod artifact;
pub mod csv_out;
pub mod error;
pub mod pipeline;
pub mod price;
pub mod request;
pub mod shape;

pub use artifact::CsvArtifact;
pub use error::{DownloadError, ErrorKind};
pub use price::Cents;
pub use request::{DownloadRequest, ParseError, RawDownloadForm};
pub use shape::{ShapeError, ShapedRow, ShapedTable};
