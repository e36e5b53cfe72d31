//! Yahoo Finance daily history adapter.
//!
//! Fetches daily OHLC rows from Yahoo's v8 chart endpoint. One HTTP request
//! per fetch; no retries, no caching. Yahoo has no official API and changes
//! its payloads without notice, so every field of the response is optional
//! here and shape problems surface as [`ProviderError::Decode`].

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::provider::{HistoricalProvider, Interval, ProviderError};
use crate::table::{PriceField, PriceRow, PriceTable};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const SECONDS_PER_DAY: i64 = 86_400;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds (28800 for Taipei).
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl QuoteColumns {
    fn column(&self, field: PriceField) -> &[Option<f64>] {
        match field {
            PriceField::Open => &self.open,
            PriceField::High => &self.high,
            PriceField::Low => &self.low,
            PriceField::Close => &self.close,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Yahoo-backed [`HistoricalProvider`].
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    /// Adapter for `base_url` (normally [`DEFAULT_BASE_URL`]; tests and
    /// proxies point elsewhere) with a per-request timeout.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Transport(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{base}/v8/finance/chart/{ticker}` with the ticker percent-encoded as
    /// a single path segment.
    fn chart_url(&self, ticker: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Transport(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ProviderError::Transport("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        Ok(url)
    }
}

/// Start of `start` through the last second of `end`, both UTC.
fn period_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp() + SECONDS_PER_DAY - 1;
    (period1, period2)
}

fn map_reqwest(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_decode() {
        ProviderError::Decode(e.to_string())
    } else {
        ProviderError::Transport(e.to_string())
    }
}

/// Convert a decoded chart response into a table.
///
/// "Not Found" style errors and results without timestamps are empty tables,
/// not errors: an unknown ticker and a holiday-only range look the same to
/// the caller.
fn parse_chart(envelope: ChartEnvelope) -> Result<PriceTable, ProviderError> {
    if let Some(err) = envelope.chart.error {
        if err.code.eq_ignore_ascii_case("Not Found") {
            return Ok(PriceTable::empty());
        }
        return Err(ProviderError::Api {
            status: None,
            message: format!("{}: {}", err.code, err.description),
        });
    }

    let Some(data) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceTable::empty());
    };
    let Some(timestamps) = data.timestamp else {
        return Ok(PriceTable::empty());
    };

    let quote = data
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .ok_or_else(|| ProviderError::Decode("no quote block in chart result".to_string()))?;
    let gmtoffset = data.meta.map_or(0, |m| m.gmtoffset);

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // Daily bars are stamped at the session open; shift to exchange-local
        // time before taking the calendar date.
        let date = ts
            .checked_add(gmtoffset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .map(|dt| dt.date_naive())
            .ok_or_else(|| {
                ProviderError::Decode(format!("invalid timestamp: {ts} (gmtoffset {gmtoffset})"))
            })?;

        let mut row = PriceRow::new(date);
        for field in PriceField::ALL {
            if let Some(v) = quote.column(field).get(i).copied().flatten() {
                if v.is_finite() {
                    row.values.insert(field, v);
                }
            }
        }

        // All-null rows are placeholders for non-trading days.
        if row.values.is_empty() {
            continue;
        }
        rows.push(row);
    }

    Ok(PriceTable::from_rows(rows))
}

#[async_trait::async_trait]
impl HistoricalProvider for YahooChartProvider {
    fn source_name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceTable, ProviderError> {
        // Yahoo rejects inverted ranges with a 400; an inverted range simply
        // has no rows.
        if start > end {
            return Ok(PriceTable::empty());
        }

        let url = self.chart_url(ticker)?;
        let (period1, period2) = period_bounds(start, end);

        let resp = self
            .http
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", interval.as_str().to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = resp.status();
        let body = resp.text().await.map_err(map_reqwest)?;

        if status == StatusCode::NOT_FOUND {
            // Unknown tickers come back as 404 with a chart error body.
            return match serde_json::from_str::<ChartEnvelope>(&body) {
                Ok(envelope) => parse_chart(envelope),
                Err(_) => Ok(PriceTable::empty()),
            };
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ChartEnvelope>(&body)
                .ok()
                .and_then(|e| e.chart.error)
                .map(|e| format!("{}: {}", e.code, e.description))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(ProviderError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        let envelope: ChartEnvelope = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Decode(format!("chart response for {ticker}: {e}")))?;
        parse_chart(envelope)
    }
}

// -----------------
// Tests (no network)
// -----------------
