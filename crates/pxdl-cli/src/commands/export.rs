//! `pxdl export`: the download pipeline without the web form.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use pxdl_export::{pipeline, RawDownloadForm};
use pxdl_md::YahooChartProvider;
use tracing::debug;

pub struct ExportArgs {
    pub symbol: String,
    pub start: String,
    pub end: String,
    pub fields: Vec<String>,
    pub out: Option<PathBuf>,
    pub config_paths: Vec<String>,
}

/// Pipeline failures are reported on stderr as
/// `error kind=<kind> status=<code>: <message>` with a failing exit code;
/// setup failures (config, I/O) propagate as `anyhow` errors.
pub async fn run(args: ExportArgs) -> Result<ExitCode> {
    let loaded = super::load_config(&args.config_paths)?;
    let cfg = &loaded.config;
    debug!(config_hash = %loaded.config_hash, "configuration loaded");

    let provider =
        YahooChartProvider::with_base_url(&cfg.provider.base_url, cfg.provider.timeout())
            .context("failed to build yahoo provider")?;

    let form = to_form(&args);
    let artifact = match pipeline::run(&provider, &form, cfg.market).await {
        Ok(a) => a,
        Err(e) => {
            eprintln!(
                "error kind={} status={}: {}",
                e.kind(),
                e.status(),
                e.user_message()
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(artifact.filename.replace('/', "_")));
    fs::write(&path, &artifact.content)
        .with_context(|| format!("write csv failed: {}", path.display()))?;

    println!("wrote={} rows={}", path.display(), artifact.row_count());
    Ok(ExitCode::SUCCESS)
}

/// Same pairs a browser would post from the form.
fn to_form(args: &ExportArgs) -> RawDownloadForm {
    let mut pairs: Vec<(&str, &str)> = vec![
        ("symbol", args.symbol.as_str()),
        ("start", args.start.as_str()),
        ("end", args.end.as_str()),
    ];
    pairs.extend(args.fields.iter().map(|f| ("fields", f.as_str())));
    RawDownloadForm::from_pairs(pairs)
}
