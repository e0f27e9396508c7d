//! The external label / identifier map.
//!
//! Built once per run before any name is resolved. Each entry carries the
//! first `rdfs:label` literal of a subject and the first `owl:sameAs` IRI
//! (the identifier the resource has in a foreign knowledge base).

use std::collections::HashMap;

use tracing::debug;

use crate::graph::OntologySource;
use crate::model::iris::{OWL_SAME_AS, RDFS_LABEL};
use crate::model::{Resource, Value};

/// Label and external identifier of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEntry {
    /// The first `rdfs:label` literal, if any.
    pub label: Option<String>,
    /// The first `owl:sameAs` IRI, if any.
    pub external_id: Option<Resource>,
}

impl LabelEntry {
    /// Returns the label if it is present and not blank.
    #[must_use]
    pub fn usable_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// Resource → [`LabelEntry`] lookup table.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    entries: HashMap<Resource, LabelEntry>,
}

impl LabelMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts labels and `owl:sameAs` identifiers from every subject.
    ///
    /// Subjects with neither are left out.
    #[must_use]
    pub fn extract<S: OntologySource + ?Sized>(source: &S) -> Self {
        let mut map = Self::new();
        for subject in source.subjects() {
            let mut entry = LabelEntry::default();
            for (predicate, object) in source.predicate_objects(subject) {
                match (predicate.as_str(), object) {
                    (RDFS_LABEL, Value::Literal(lit)) if entry.label.is_none() => {
                        entry.label = Some(lit.lexical.clone());
                    }
                    (OWL_SAME_AS, Value::Resource(id)) if entry.external_id.is_none() => {
                        entry.external_id = Some(id.clone());
                    }
                    _ => {}
                }
            }
            if entry.label.is_some() || entry.external_id.is_some() {
                map.insert(subject.clone(), entry);
            }
        }
        debug!(entries = map.len(), "Extracted label map");
        map
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, resource: Resource, entry: LabelEntry) {
        self.entries.insert(resource, entry);
    }

    /// Looks up the entry for `resource`.
    #[must_use]
    pub fn lookup(&self, resource: &Resource) -> Option<&LabelEntry> {
        self.entries.get(resource)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
