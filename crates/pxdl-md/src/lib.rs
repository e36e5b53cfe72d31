//! pxdl-md
//!
//! Market-data boundary for the price export service.
//!
//! This crate owns the price field vocabulary, the in-memory price table, the
//! provider trait and the concrete Yahoo chart adapter. It knows nothing about
//! CSV, HTTP responses or how failures are presented to a user; callers
//! (`pxdl-export`) translate [`ProviderError`] into their own error taxonomy.

pub mod market;
pub mod provider;
pub mod table;
pub mod yahoo;

pub use market::Market;
pub use provider::{FetchCall, HistoricalProvider, Interval, ProviderError, StaticProvider};
pub use table::{PriceField, PriceRow, PriceTable};
pub use yahoo::YahooChartProvider;
