//! `incidents` admin binary.
//!
//! Reads `incidents.toml` (or the path specified with `--config`), opens the
//! SQLite store, runs one subcommand, and prints the result as JSON. Logs go
//! to stderr; set `RUST_LOG` to change verbosity.
//!
//! ```sh
//! echo '{"status":"pending","username":"alice","tags":["flood"]}' \
//!   | incidents create
//! incidents queue pending
//! incidents set-status <incident_id> approved
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use incident_admin::{Command, expand_tilde, load_config};
use incident_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Incident store administration")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "incidents.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;
  let store_path = expand_tilde(&cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(path = ?store_path, "opened incident store");

  let output = incident_admin::run(&store, cli.command, std::io::stdin().lock()).await;
  store.close().await.context("failed to close store")?;

  println!("{}", serde_json::to_string_pretty(&output?)?);
  Ok(())
}
