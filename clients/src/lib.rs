//! The `owl-to-km` command-line tool.
//!
//! Glue between the ontology loader, the translator and the publisher:
//! command-line parsing ([`cli`]), layered configuration ([`config`]), per-run
//! log files ([`logging`]) and the run itself ([`run`]).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod run;

pub use cli::Cli;
pub use config::{ConfigError, Settings};
pub use run::{run, run_with_client, RunOutcome};
