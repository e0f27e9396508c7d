//! RDF file loading into an [`OntologyGraph`].
//!
//! Turtle, N-Triples and RDF/XML are parsed with the sophia parsers. With
//! [`RdfFormat::Auto`] the format is picked from the file extension, and an
//! RDF/XML parse failure falls back to Turtle before giving up.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use serde::Deserialize;
use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple;
use tracing::{debug, info, warn};

use crate::graph::OntologyGraph;
use crate::model::{Literal, Resource, Value};

/// Errors raised while loading an ontology.
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// The ontology file could not be read.
    #[error("failed to read ontology `{path}`: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The parser rejected the document.
    #[error("failed to parse ontology as {format}: {message}")]
    Parse {
        /// Format the parser was trying.
        format: RdfFormat,
        /// Parser diagnostic.
        message: String,
    },
    /// The file extension does not map to a known format.
    #[error("cannot infer RDF format of `{path}`; pass an explicit format")]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },
}

/// Serialization format of an ontology document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfFormat {
    /// Pick by extension (files) or by sniffing (strings).
    #[default]
    Auto,
    /// Turtle 1.1.
    Turtle,
    /// N-Triples.
    NTriples,
    /// RDF/XML (OWL files).
    RdfXml,
}

impl RdfFormat {
    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RdfFormat::Auto => "auto",
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "ntriples",
            RdfFormat::RdfXml => "rdfxml",
        }
    }

    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            "owl" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RdfFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(RdfFormat::Auto),
            "turtle" | "ttl" => Ok(RdfFormat::Turtle),
            "ntriples" | "nt" => Ok(RdfFormat::NTriples),
            "rdfxml" | "xml" | "owl" => Ok(RdfFormat::RdfXml),
            other => Err(format!(
                "unknown RDF format `{other}` (expected auto, turtle, ntriples or rdfxml)"
            )),
        }
    }
}

/// Loads an ontology file.
///
/// # Errors
///
/// Returns [`OntologyError::Io`] if the file cannot be read,
/// [`OntologyError::UnsupportedFormat`] if `Auto` cannot infer a format, and
/// [`OntologyError::Parse`] if every applicable parser rejects the document.
pub fn load(path: &Path, format: RdfFormat) -> Result<OntologyGraph, OntologyError> {
    let start = Instant::now();
    info!(path = %path.display(), %format, "Loading ontology");

    let text = std::fs::read_to_string(path).map_err(|source| OntologyError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = match format {
        RdfFormat::Auto => {
            RdfFormat::from_path(path).ok_or_else(|| OntologyError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?
        }
        explicit => explicit,
    };

    let graph = parse_with_fallback(&text, format)?;
    info!(
        triples = graph.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Ontology loaded"
    );
    Ok(graph)
}

/// Parses an ontology held in memory.
///
/// `Auto` treats text starting with `<?xml` or `<rdf:RDF` as RDF/XML and
/// everything else as Turtle (N-Triples is a subset of Turtle).
///
/// # Errors
///
/// Returns [`OntologyError::Parse`] if the document does not parse.
pub fn parse_str(text: &str, format: RdfFormat) -> Result<OntologyGraph, OntologyError> {
    let format = match format {
        RdfFormat::Auto => {
            let head = text.trim_start();
            if head.starts_with("<?xml") || head.starts_with("<rdf:RDF") {
                RdfFormat::RdfXml
            } else {
                RdfFormat::Turtle
            }
        }
        explicit => explicit,
    };
    parse_with_fallback(text, format)
}

fn parse_with_fallback(text: &str, format: RdfFormat) -> Result<OntologyGraph, OntologyError> {
    match parse_as(text, format) {
        Err(err) if format == RdfFormat::RdfXml => {
            warn!(error = %err, "RDF/XML parse failed; retrying as Turtle");
            parse_as(text, RdfFormat::Turtle)
        }
        result => result,
    }
}

fn parse_as(text: &str, format: RdfFormat) -> Result<OntologyGraph, OntologyError> {
    match format {
        RdfFormat::Turtle | RdfFormat::Auto => {
            collect(sophia_turtle::parser::turtle::parse_str(text), format)
        }
        RdfFormat::NTriples => collect(sophia_turtle::parser::nt::parse_str(text), format),
        RdfFormat::RdfXml => collect(sophia_xml::parser::parse_str(text), format),
    }
}

/// Drains a triple source into a fresh graph.
///
/// Triples whose subject or predicate is not an IRI (blank-node class
/// expressions, mostly) have no frame of their own and are skipped.
fn collect<S: TripleSource>(mut source: S, format: RdfFormat) -> Result<OntologyGraph, OntologyError> {
    let mut graph = OntologyGraph::new();
    let mut skipped = 0usize;

    source
        .for_each_triple(|t| match (resource_of(t.s()), resource_of(t.p()), value_of(t.o())) {
            (Some(s), Some(p), Some(o)) => {
                graph.insert(s, p, o);
            }
            _ => skipped += 1,
        })
        .map_err(|err| OntologyError::Parse {
            format,
            message: err.to_string(),
        })?;

    if skipped > 0 {
        debug!(skipped, "Skipped triples without an IRI subject or predicate");
    }
    Ok(graph)
}

fn resource_of<T: Term>(term: T) -> Option<Resource> {
    term.iri().map(|iri| Resource::new(iri.as_str()))
}

fn value_of<T: Term>(term: T) -> Option<Value> {
    match term.kind() {
        TermKind::Iri => resource_of(term).map(Value::Resource),
        TermKind::BlankNode => term.bnode_id().map(|id| Value::Blank(id.as_str().to_owned())),
        TermKind::Literal => {
            let lexical = term.lexical_form()?;
            let lexical: &str = &lexical;
            Some(Value::Literal(Literal {
                lexical: lexical.to_owned(),
                language: term.language_tag().map(|tag| tag.as_str().to_owned()),
                datatype: term.datatype().map(|dt| dt.as_str().to_owned()),
            }))
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::OntologySource;

    #[test]
    fn format_from_extension() {
        assert_eq!(RdfFormat::from_path(Path::new("a/onto.ttl")), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_path(Path::new("onto.NT")), Some(RdfFormat::NTriples));
        assert_eq!(RdfFormat::from_path(Path::new("opencyc.owl")), Some(RdfFormat::RdfXml));
        assert_eq!(RdfFormat::from_path(Path::new("onto.json")), None);
    }

    #[test]
    fn format_parses_from_cli_spelling() {
        assert_eq!("TTL".parse::<RdfFormat>(), Ok(RdfFormat::Turtle));
        assert_eq!("rdfxml".parse::<RdfFormat>(), Ok(RdfFormat::RdfXml));
        assert!("jsonld".parse::<RdfFormat>().is_err());
    }

    #[test]
    fn parses_ntriples_literals_and_tags() {
        let nt = "<http://e.org/a> <http://www.w3.org/2000/01/rdf-schema#label> \"Alpha\"@en .\n\
                  <http://e.org/a> <http://e.org/p> <http://e.org/b> .\n";
        let graph = parse_str(nt, RdfFormat::NTriples).unwrap();
        assert_eq!(graph.len(), 2);
        let a = Resource::new("http://e.org/a");
        let pairs = graph.predicate_objects(&a);
        let label = pairs[0].1.as_literal().unwrap();
        assert_eq!(label.lexical, "Alpha");
        assert_eq!(label.language.as_deref(), Some("en"));
        assert_eq!(pairs[1].1, Value::Resource(Resource::new("http://e.org/b")));
    }

    #[test]
    fn malformed_turtle_is_a_parse_error() {
        let err = parse_str("@prefix : <http://e.org/> .\n:a :b", RdfFormat::Turtle);
        assert!(matches!(err, Err(OntologyError::Parse { .. })));
    }
}
