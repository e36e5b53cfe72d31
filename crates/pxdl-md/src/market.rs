//! Exchange suffix mapping from a user-typed symbol to a provider ticker.
//!
//! Users type the local code (e.g. `2330`); the provider wants the
//! exchange-qualified ticker (e.g. `2330.TW`). Nothing downstream of
//! [`Market::provider_ticker`] knows a suffix exists.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    /// Taiwan Stock Exchange listings (`.TW`).
    #[default]
    Twse,
    /// Taipei Exchange / OTC listings (`.TWO`).
    Tpex,
    /// No suffix; the symbol is passed through as typed.
    Bare,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Twse => "twse",
            Market::Tpex => "tpex",
            Market::Bare => "bare",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Market::Twse => ".TW",
            Market::Tpex => ".TWO",
            Market::Bare => "",
        }
    }

    /// Provider-facing ticker for an already-trimmed symbol.
    pub fn provider_ticker(&self, symbol: &str) -> String {
        format!("{symbol}{}", self.suffix())
    }

    /// Parse a config / env value. Accepts the canonical names plus the
    /// suffix spellings (`tw`, `two`, `none`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twse" | "tw" => Some(Market::Twse),
            "tpex" | "two" => Some(Market::Tpex),
            "bare" | "none" => Some(Market::Bare),
            _ => None,
        }
    }
}
