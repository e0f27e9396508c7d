//! `owl-to-km`: translates an OWL ontology into KM frames and publishes
//! them to a KM server in dependency order.
//!
//! **Usage:**
//! ```text
//! owl-to-km --ontology <file> [--format auto|turtle|ntriples|rdfxml]
//!           [--config <file.toml>] [--km-url <url>] [--num-processes <n>]
//!           [--dry-run] [--translate-only] [--debug] [--log-dir <dir>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use km_clients::{logging, run, Cli, Settings};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli).context("Invalid configuration")?;
    let guard = logging::init(&settings.logging)?;
    info!(log = %guard.path().display(), "Logging initialised");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    runtime.block_on(run(&settings, &mut out))?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}
