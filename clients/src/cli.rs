//! Command-line interface of `owl-to-km`.

use std::path::PathBuf;

use clap::Parser;
use km_ontology::RdfFormat;

/// Translate an OWL ontology into KM frames and publish them.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "owl-to-km",
    about = "Translate an OWL ontology into KM frames and publish them in dependency order"
)]
pub struct Cli {
    /// Ontology file (Turtle, N-Triples or RDF/XML).
    #[arg(long)]
    pub ontology: Option<PathBuf>,

    /// Ontology format: auto, turtle, ntriples or rdfxml.
    #[arg(long)]
    pub format: Option<RdfFormat>,

    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// KM server endpoint.
    #[arg(long)]
    pub km_url: Option<String>,

    /// Number of concurrent publish workers.
    #[arg(long)]
    pub num_processes: Option<usize>,

    /// Skip sending requests to the KM server.
    #[arg(long)]
    pub dry_run: bool,

    /// Translate and print the frames without publishing.
    #[arg(long)]
    pub translate_only: bool,

    /// Log at debug level and mirror the log to stderr.
    #[arg(long)]
    pub debug: bool,

    /// Directory for the per-run log file.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
