use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pxdl")]
#[command(about = "Daily price history to CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily history and write it as a CSV file
    Export {
        /// Symbol as a user would type it (market suffix is added from config)
        #[arg(long, allow_hyphen_values = true)]
        symbol: String,

        /// First trading day, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last trading day (inclusive), YYYY-MM-DD
        #[arg(long)]
        end: String,

        /// Column to include; repeat for several. Defaults to Open, High, Low, Close
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Output file; defaults to {symbol}_{start}_{end}.csv in the working directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overlay...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Export {
            symbol,
            start,
            end,
            fields,
            out,
            config_paths,
        } => {
            commands::export::run(commands::export::ExportArgs {
                symbol,
                start,
                end,
                fields,
                out,
                config_paths,
            })
            .await
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = pxdl_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
