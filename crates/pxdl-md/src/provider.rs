//! Provider boundary for daily price history.
//!
//! This module defines **only** the interval, the error type and the provider
//! trait, plus a canned in-process provider for tests and offline use. The
//! concrete network adapter lives in [`crate::yahoo`].

use std::fmt;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::table::PriceTable;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// Sampling interval requested from the provider. Only daily bars exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    #[default]
    Daily,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that a [`HistoricalProvider`] implementation may return.
///
/// An empty result is **not** an error at this layer; providers return an
/// empty [`PriceTable`] for valid-but-dataless queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network or transport failure.
    Transport(String),
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The upstream API returned an application-level error.
    Api {
        status: Option<u16>,
        message: String,
    },
    /// A response payload could not be decoded.
    Decode(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "transport error: {msg}"),
            ProviderError::Timeout => write!(f, "provider request timed out"),
            ProviderError::Api {
                status: Some(s),
                message,
            } => write!(f, "provider api error status={s}: {message}"),
            ProviderError::Api {
                status: None,
                message,
            } => write!(f, "provider api error: {message}"),
            ProviderError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Upstream historical-data provider contract.
///
/// Each call is a single atomic, potentially slow operation. Implementations
/// own any batching or throttling; callers never retry.
///
/// Object safe so handlers can hold an `Arc<dyn HistoricalProvider>`.
#[async_trait::async_trait]
pub trait HistoricalProvider: Send + Sync {
    /// Human-readable name identifying this provider (e.g. `"yahoo"`).
    fn source_name(&self) -> &'static str;

    /// Fetch daily rows for `ticker` between `start` and `end`.
    ///
    /// Both ends are inclusive: a bar dated `end` must be returned. Upstream
    /// APIs with an exclusive end (yfinance's `end=`, epoch `period2`) have to
    /// be widened by the implementation. `start > end` is not an error; such a
    /// range simply has no rows.
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceTable, ProviderError>;
}

// ---------------------------------------------------------------------------
// StaticProvider
// ---------------------------------------------------------------------------

/// Arguments of one [`HistoricalProvider::fetch`] call, as recorded by
/// [`StaticProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: Interval,
}

/// Provider that answers every call with the same canned outcome and records
/// what it was asked for.
pub struct StaticProvider {
    outcome: Result<PriceTable, ProviderError>,
    calls: Mutex<Vec<FetchCall>>,
}

impl StaticProvider {
    pub fn with_table(table: PriceTable) -> Self {
        Self {
            outcome: Ok(table),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl HistoricalProvider for StaticProvider {
    fn source_name(&self) -> &'static str {
        "static"
    }

    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceTable, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(FetchCall {
                ticker: ticker.to_string(),
                start,
                end,
                interval,
            });
        }
        self.outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
