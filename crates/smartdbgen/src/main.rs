use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use smartdb_core::EmitConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "smartdbgen",
    version,
    about = "Generate the static SMART attribute table C source from smartdb XML"
)]
struct Cli {
    /// Path to the smartdb XML description
    path: PathBuf,
}

fn main() -> Result<()> {
    let Cli { path } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let source = smartdb_core::generate(&path, &EmitConfig::default())
        .with_context(|| format!("generate smart table from {}", path.display()))?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(source.as_bytes())
        .and_then(|()| stdout.flush())
        .context("write generated source")?;
    info!(path = %path.display(), bytes = source.len(), "generated smart table");

    Ok(())
}
