//! Layered service configuration.
//!
//! Resolution order (later wins):
//! 1. built-in defaults ([`ServiceConfig::default`])
//! 2. YAML documents, merged key-by-key in the order given
//! 3. environment variables ([`ServiceConfig::apply_env_overrides`])
//!
//! The effective config is serialized to canonical JSON and hashed so a
//! running service can log exactly which configuration it booted with.

use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use pxdl_md::{yahoo, Market};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const ENV_CONFIG_PATHS: &str = "PXDL_CONFIG";
pub const ENV_ADDR: &str = "PXDL_ADDR";
pub const ENV_PORT: &str = "PORT";
pub const ENV_MARKET: &str = "PXDL_MARKET";
pub const ENV_PROVIDER_URL: &str = "PXDL_PROVIDER_URL";
pub const ENV_PROVIDER_TIMEOUT_SECS: &str = "PXDL_PROVIDER_TIMEOUT_SECS";
pub const ENV_ERROR_STYLE: &str = "PXDL_ERROR_STYLE";

// ---------------------------------------------------------------------------
// ErrorStyle
// ---------------------------------------------------------------------------

/// How a failed download is rendered to the browser.
///
/// The status code and message are the same in every style; only the body
/// format changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStyle {
    /// `text/plain` message.
    Plain,
    /// `{"error": "<kind>", "message": "..."}`.
    Json,
    /// Small HTML page that pops an `alert()` and navigates back to the form.
    #[default]
    Alert,
}

impl ErrorStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStyle::Plain => "plain",
            ErrorStyle::Json => "json",
            ErrorStyle::Alert => "alert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Some(ErrorStyle::Plain),
            "json" => Some(ErrorStyle::Json),
            "alert" | "html" => Some(ErrorStyle::Alert),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub addr: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: yahoo::DEFAULT_BASE_URL.to_string(),
            timeout_secs: yahoo::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ProviderSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorsSection {
    pub style: ErrorStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub server: ServerSection,
    pub market: Market,
    pub provider: ProviderSection,
    pub errors: ErrorsSection,
}

impl ServiceConfig {
    /// Apply `PXDL_*` overrides read through `lookup`.
    ///
    /// `PORT` (as injected by most hosting platforms) binds `0.0.0.0:<PORT>`
    /// when `PXDL_ADDR` is not set. Malformed values are errors.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_ADDR) {
            self.server.addr = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_ADDR}: invalid socket address '{v}'"))?;
        } else if let Some(v) = lookup(ENV_PORT) {
            let port: u16 = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT}: invalid port '{v}'"))?;
            self.server.addr = SocketAddr::from(([0, 0, 0, 0], port));
        }

        if let Some(v) = lookup(ENV_MARKET) {
            self.market = Market::parse(&v).ok_or_else(|| {
                anyhow!("{ENV_MARKET}: unknown market '{v}' (expected twse | tpex | bare)")
            })?;
        }

        if let Some(v) = lookup(ENV_PROVIDER_URL) {
            self.provider.base_url = v.trim().to_string();
        }

        if let Some(v) = lookup(ENV_PROVIDER_TIMEOUT_SECS) {
            self.provider.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PROVIDER_TIMEOUT_SECS}: invalid seconds '{v}'"))?;
        }

        if let Some(v) = lookup(ENV_ERROR_STYLE) {
            self.errors.style = ErrorStyle::parse(&v).ok_or_else(|| {
                anyhow!("{ENV_ERROR_STYLE}: unknown style '{v}' (expected plain | json | alert)")
            })?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.provider.timeout_secs == 0 {
            bail!("provider.timeout_secs must be greater than zero");
        }
        if self.provider.base_url.trim().is_empty() {
            bail!("provider.base_url must not be empty");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config: ServiceConfig,
}

/// Read YAML files (base first), merge, apply env overrides, hash.
pub fn load<F>(paths: &[&str], lookup: F) -> Result<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let docs = read_docs(paths)?;
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    let mut config = merge_docs(&doc_refs)?;
    config.apply_env_overrides(lookup)?;
    finish(config)
}

/// File layers only, no environment. Used by `pxdl config-hash`.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = read_docs(paths)?;
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    finish(merge_docs(yaml_docs)?)
}

/// Split a `PXDL_CONFIG` style value (`a.yaml,b.yaml`) into paths.
pub fn split_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn read_docs(paths: &[&str]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}")))
        .collect()
}

fn merge_docs(yaml_docs: &[&str]) -> Result<ServiceConfig> {
    // Start from the defaults so every key is present before overlays.
    let mut merged =
        serde_json::to_value(ServiceConfig::default()).context("default config serialize")?;
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        if v_yaml.is_null() {
            // Empty document.
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }
    serde_json::from_value(merged).context("config does not match schema")
}

fn finish(config: ServiceConfig) -> Result<LoadedConfig> {
    config.validate()?;
    let canonical_json = serde_json::to_string(&config).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
