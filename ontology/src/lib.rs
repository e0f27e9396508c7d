//! Ontology access for the OWL → KM translator.
//!
//! This crate is the data side of the pipeline:
//!
//! - [`model`]: resources, literal values, [`EntityRef`] and vocabulary IRIs.
//! - [`graph`]: the [`OntologySource`] trait and the in-memory [`OntologyGraph`].
//! - [`loader`]: Turtle, N-Triples and RDF/XML loading.
//! - [`labels`]: the label / external-identifier map.
//! - [`entities`]: enumeration of classes, properties and individuals.
//!
//! # Example
//!
//! ```
//! use km_ontology::{entities, loader, RdfFormat};
//!
//! let ttl = "@prefix : <http://example.org/zoo#> .
//! @prefix owl: <http://www.w3.org/2002/07/owl#> .
//! :Animal a owl:Class .
//! :Dog a owl:Class .
//! :Fido a :Dog .";
//! let graph = loader::parse_str(ttl, RdfFormat::Turtle)?;
//! assert_eq!(entities::enumerate(&graph).len(), 3);
//! # Ok::<(), km_ontology::OntologyError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod entities;
pub mod graph;
pub mod labels;
pub mod loader;
pub mod model;

pub use entities::{enumerate, EntityInventory};
pub use graph::{OntologyGraph, OntologySource};
pub use labels::{LabelEntry, LabelMap};
pub use loader::{OntologyError, RdfFormat};
pub use model::{iris, EntityKind, EntityRef, Literal, Resource, Value};
