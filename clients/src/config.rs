//! Run configuration.
//!
//! Settings come from an optional TOML file; every field has a default and
//! command-line flags override whatever the file says.
//!
//! ```toml
//! [km]
//! url = "http://localhost:8080/km"
//! max_attempts = 3
//!
//! [run]
//! ontology = "opencyc.owl"
//! workers = 8
//!
//! [naming.overrides]
//! "http://example.org/zoo#owns" = "possesses"
//!
//! [logging]
//! dir = "logs"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use km_codegen::mapping::PredicateOverrides;
use km_codegen::names::NamingOptions;
use km_ontology::RdfFormat;
use km_publisher::scheduler::default_workers;
use km_publisher::{HttpClientConfig, SchedulerConfig};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Settings`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range or missing.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// KM server connection.
    pub km: HttpClientConfig,
    /// What to translate and how to publish it.
    pub run: RunSettings,
    /// Naming knobs.
    pub naming: NamingSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Ontology file to translate.
    pub ontology: Option<PathBuf>,
    /// Its format.
    pub format: RdfFormat,
    /// Publish workers; defaults to the available parallelism.
    pub workers: Option<usize>,
    /// Skip network I/O when publishing.
    pub dry_run: bool,
    /// Stop after translation.
    pub translate_only: bool,
}

/// `[naming]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingSettings {
    /// Annotation predicates naming a resource, before `rdfs:label`.
    pub preferred_label_predicates: Vec<String>,
    /// Extra slot-name overrides keyed by predicate IRI.
    pub overrides: BTreeMap<String, String>,
    /// Extra slot-name overrides keyed by predicate local name.
    pub local_overrides: BTreeMap<String, String>,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            preferred_label_predicates: NamingOptions::default().preferred_label_predicates,
            overrides: BTreeMap::new(),
            local_overrides: BTreeMap::new(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for per-run log files.
    pub dir: PathBuf,
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Debug level plus a stderr copy of the log.
    pub debug: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_owned(),
            debug: false,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] or [`ConfigError::Parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the file named by `--config` (or defaults), applies the other
    /// flags and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be loaded or the merged
    /// settings are invalid.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply(cli);
        settings.validate()?;
        Ok(settings)
    }

    /// Overrides file values with the flags that were given.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(ontology) = &cli.ontology {
            self.run.ontology = Some(ontology.clone());
        }
        if let Some(format) = cli.format {
            self.run.format = format;
        }
        if let Some(url) = &cli.km_url {
            self.km.url = url.clone();
        }
        if let Some(workers) = cli.num_processes {
            self.run.workers = Some(workers);
        }
        if let Some(dir) = &cli.log_dir {
            self.logging.dir = dir.clone();
        }
        self.run.dry_run |= cli.dry_run;
        self.run.translate_only |= cli.translate_only;
        self.logging.debug |= cli.debug;
    }

    /// Checks ranges and required values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.ontology.is_none() {
            return Err(ConfigError::Invalid(
                "run.ontology is not set (use --ontology)".to_owned(),
            ));
        }
        if self.run.workers == Some(0) {
            return Err(ConfigError::Invalid("run.workers must be > 0".to_owned()));
        }
        if self.km.max_attempts == 0 {
            return Err(ConfigError::Invalid("km.max_attempts must be > 0".to_owned()));
        }
        if self.km.backoff_min_ms > self.km.backoff_max_ms {
            return Err(ConfigError::Invalid(
                "km.backoff_min_ms must not exceed km.backoff_max_ms".to_owned(),
            ));
        }
        Url::parse(&self.km.url)
            .map_err(|e| ConfigError::Invalid(format!("km.url `{}`: {e}", self.km.url)))?;
        Ok(())
    }

    /// Naming options with the configured overrides on top of the standard table.
    #[must_use]
    pub fn naming_options(&self) -> NamingOptions {
        let mut overrides = PredicateOverrides::standard();
        for (iri, name) in &self.naming.overrides {
            overrides = overrides.with_iri(iri.clone(), name.clone());
        }
        for (local, name) in &self.naming.local_overrides {
            overrides = overrides.with_local_name(local.clone(), name.clone());
        }
        NamingOptions {
            preferred_label_predicates: self.naming.preferred_label_predicates.clone(),
            overrides,
        }
    }

    /// Scheduler settings for this run.
    #[must_use]
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            workers: self.run.workers.unwrap_or_else(default_workers),
            dry_run: self.run.dry_run,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use km_ontology::Resource;

    #[test]
    fn every_section_is_optional() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.km, HttpClientConfig::default());
        assert_eq!(settings.run.format, RdfFormat::Auto);
        assert_eq!(settings.logging.dir, PathBuf::from("logs"));
    }

    #[test]
    fn file_values_are_read() {
        let settings = Settings::from_toml(
            r#"
            [km]
            url = "http://km.internal:9000/km"
            max_attempts = 5

            [run]
            ontology = "zoo.ttl"
            format = "turtle"
            workers = 3

            [naming.overrides]
            "http://example.org/zoo#owns" = "possesses"
            "#,
        )
        .unwrap();
        assert_eq!(settings.km.max_attempts, 5);
        assert_eq!(settings.km.timeout_ms, 10_000);
        assert_eq!(settings.run.format, RdfFormat::Turtle);
        assert_eq!(settings.scheduler_config().workers, 3);
        assert_eq!(
            settings
                .naming_options()
                .overrides
                .lookup(&Resource::new("http://example.org/zoo#owns")),
            Some("possesses")
        );
    }

    #[test]
    fn flags_override_file() {
        let mut settings = Settings::from_toml(
            "[run]\nontology = \"a.ttl\"\nworkers = 2\n[km]\nurl = \"http://a/km\"\n",
        )
        .unwrap();
        let cli = Cli::parse_from([
            "owl-to-km",
            "--ontology",
            "b.owl",
            "--format",
            "rdfxml",
            "--km-url",
            "http://b:8080/km",
            "--num-processes",
            "6",
            "--dry-run",
            "--debug",
        ]);
        settings.apply(&cli);
        assert_eq!(settings.run.ontology, Some(PathBuf::from("b.owl")));
        assert_eq!(settings.run.format, RdfFormat::RdfXml);
        assert_eq!(settings.km.url, "http://b:8080/km");
        assert_eq!(settings.run.workers, Some(6));
        assert!(settings.run.dry_run);
        assert!(!settings.run.translate_only);
        assert!(settings.logging.debug);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let base = Settings {
            run: RunSettings {
                ontology: Some(PathBuf::from("zoo.ttl")),
                ..RunSettings::default()
            },
            ..Settings::default()
        };
        assert!(base.validate().is_ok());

        assert!(matches!(Settings::default().validate(), Err(ConfigError::Invalid(_))));

        let mut zero_workers = base.clone();
        zero_workers.run.workers = Some(0);
        assert!(zero_workers.validate().is_err());

        let mut bad_url = base.clone();
        bad_url.km.url = "no scheme".to_owned();
        assert!(bad_url.validate().is_err());

        let mut no_attempts = base;
        no_attempts.km.max_attempts = 0;
        assert!(no_attempts.validate().is_err());
    }

    #[test]
    fn unknown_format_is_a_parse_error() {
        let err = Settings::from_toml("[run]\nformat = \"jsonld\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
