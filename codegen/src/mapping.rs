//! Ontology → KM mapping tables.
//!
//! Deterministic mappings from OWL vocabulary to KM slot names, the set of
//! KM built-in symbols that never denote a user frame, and the symbol
//! sanitiser every generated name passes through.

use std::collections::HashMap;

use km_ontology::iris::{
    OWL_DISJOINT_WITH, OWL_SAME_AS, RDFS_COMMENT, RDFS_LABEL, RDFS_SUBCLASS_OF,
    RDFS_SUBPROPERTY_OF, RDF_TYPE,
};
use km_ontology::Resource;

/// KM built-in frames, slots and control keywords.
///
/// Tokens in this set are never resolved back to an ontology resource.
pub const KEYWORDS: &[&str] = &[
    "has",
    "with",
    "instance-of",
    "superclasses",
    "label",
    "Slot",
    "Class",
    "Thing",
    "domain",
    "range",
    "superslots",
    "inverse",
    "a",
    "in",
    "where",
    "then",
    "else",
    "if",
    "forall",
    "oneof",
    "a-prototype",
];

/// Returns `true` if `token` is a KM built-in.
#[must_use]
pub fn is_keyword(token: &str) -> bool {
    KEYWORDS.contains(&token)
}

/// Canonical slot names for well-known predicates.
///
/// Entries keyed by full IRI match exactly. Entries keyed by local name
/// match any predicate whose IRI ends in that name, which covers the
/// OpenCyc concept IRIs published under several dated namespaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateOverrides {
    by_iri: HashMap<String, String>,
    by_local_name: HashMap<String, String>,
}

impl PredicateOverrides {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard RDF/RDFS/OWL and OpenCyc overrides.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_iri(RDF_TYPE, "instance-of")
            .with_iri(RDFS_SUBCLASS_OF, "superclasses")
            .with_iri(RDFS_LABEL, "label")
            .with_iri(OWL_SAME_AS, "same-as")
            .with_iri(RDFS_COMMENT, "comment")
            .with_iri(OWL_DISJOINT_WITH, "mustnt-be-a")
            .with_iri(RDFS_SUBPROPERTY_OF, "superslots")
            // OpenCyc quotedIsa
            .with_local_name("Mx4rBVVEokNxEdaAAACgydogAg", "instance-of")
            .with_local_name("Mx4rvViAzpwpEbGdrcN5Y29ycA", "datatype")
            .with_local_name("Mx4rwLSVCpwpEbGdrcN5Y29ycA", "prettyString")
            .with_local_name("Mx4r8POVIYRHEdmd8gACs6hbCw", "prettyString-Canonical")
    }

    /// Adds (or replaces) an override keyed by full IRI.
    #[must_use]
    pub fn with_iri(mut self, iri: impl Into<String>, name: impl Into<String>) -> Self {
        self.by_iri.insert(iri.into(), name.into());
        self
    }

    /// Adds (or replaces) an override keyed by IRI local name.
    #[must_use]
    pub fn with_local_name(mut self, local: impl Into<String>, name: impl Into<String>) -> Self {
        self.by_local_name.insert(local.into(), name.into());
        self
    }

    /// Returns the canonical name for `predicate`, if overridden.
    #[must_use]
    pub fn lookup(&self, predicate: &Resource) -> Option<&str> {
        self.by_iri
            .get(predicate.as_str())
            .or_else(|| self.by_local_name.get(predicate.local_name()))
            .map(String::as_str)
    }

    /// Every canonical name in the table.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_iri
            .values()
            .chain(self.by_local_name.values())
            .map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_iri.len() + self.by_local_name.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns arbitrary label text into a single KM symbol.
///
/// Characters other than alphanumerics, `_` and `-` become `-`; runs of `-`
/// collapse to one and leading or trailing `-` are dropped. May return an
/// empty string.
///
/// E.g. `"golden retriever (dog)"` → `"golden-retriever-dog"`.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        let c = if c.is_alphanumeric() || c == '_' || c == '-' {
            c
        } else {
            '-'
        };
        if c == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// The URI-tail name of `resource`: its sanitised local name, or `unnamed`.
#[must_use]
pub fn fallback_name(resource: &Resource) -> String {
    let name = sanitize(resource.local_name());
    if name.is_empty() {
        "unnamed".to_owned()
    } else {
        name
    }
}

/// Sanitises `raw`, falling back to the URI tail of `resource` when nothing remains.
#[must_use]
pub fn symbol_for(raw: &str, resource: &Resource) -> String {
    let name = sanitize(raw);
    if name.is_empty() {
        fallback_name(resource)
    } else {
        name
    }
}
