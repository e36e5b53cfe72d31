//! Command handler modules for pxdl-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod export;

use anyhow::{Context, Result};
use pxdl_config::LoadedConfig;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Layer `--config` files, then the process environment, exactly as the
/// daemon does at boot.
pub fn load_config(config_paths: &[String]) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    pxdl_config::load(&path_refs, |k| std::env::var(k).ok())
        .context("failed to load configuration")
}
