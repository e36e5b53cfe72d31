//! Shared state handed to every handler.
//!
//! Nothing here is mutable: a download is stateless, so the state is just
//! the provider handle plus the presentation settings read at boot.

use std::sync::Arc;

use anyhow::Context;
use pxdl_config::{ErrorStyle, ServiceConfig};
use pxdl_md::{HistoricalProvider, Market, YahooChartProvider};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: "pxdl-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    pub provider: Arc<dyn HistoricalProvider>,
    /// Suffix policy applied to every submitted symbol.
    pub market: Market,
    pub error_style: ErrorStyle,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn HistoricalProvider>,
        market: Market,
        error_style: ErrorStyle,
    ) -> Self {
        Self {
            build: BuildInfo::default(),
            provider,
            market,
            error_style,
        }
    }

    /// Wire the Yahoo adapter described by `cfg`.
    pub fn from_config(cfg: &ServiceConfig) -> anyhow::Result<Self> {
        let provider =
            YahooChartProvider::with_base_url(&cfg.provider.base_url, cfg.provider.timeout())
                .context("failed to build yahoo provider")?;
        Ok(Self::new(Arc::new(provider), cfg.market, cfg.errors.style))
    }
}
