//! Resource and slot naming.
//!
//! Every resource and predicate that appears in generated KM text gets
//! exactly one symbol. Resource names come from labels and fall back to
//! the IRI tail; predicate names additionally pass through the override
//! table and are made unique with `_1`, `_2`, … suffixes.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use km_ontology::iris::{CYC_ANNOTATIONS_LABEL, CYC_ANNOT_LABEL, RDFS_LABEL};
use km_ontology::{LabelMap, OntologySource, Resource, Value};
use tracing::{debug, info};

use crate::mapping::{fallback_name, symbol_for, PredicateOverrides};

/// A Resource ⇄ name table.
///
/// Each resource maps to exactly one name. A name maps back to the first
/// resource that claimed it; later claimants keep their forward entry but
/// are not reachable by reverse lookup.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    forward: HashMap<Resource, String>,
    reverse: HashMap<String, Resource>,
}

impl NameTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` for `resource` unless the resource already has one.
    ///
    /// Returns the name the resource ends up with.
    pub fn insert(&mut self, resource: Resource, name: String) -> &str {
        if !self.forward.contains_key(&resource) {
            match self.reverse.get(&name) {
                Some(owner) => {
                    debug!(%resource, %owner, %name, "Name already taken; reverse lookup keeps the first resource");
                }
                None => {
                    self.reverse.insert(name.clone(), resource.clone());
                }
            }
        }
        self.forward.entry(resource).or_insert(name)
    }

    /// Forward lookup.
    #[must_use]
    pub fn get(&self, resource: &Resource) -> Option<&str> {
        self.forward.get(resource).map(String::as_str)
    }

    /// Reverse lookup.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Resource> {
        self.reverse.get(name)
    }

    /// Returns `true` if some resource already claimed `name`.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.reverse.contains_key(name)
    }

    /// Number of resources with a name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Knobs for name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingOptions {
    /// Annotation predicates whose literals name a resource, consulted before `rdfs:label`.
    pub preferred_label_predicates: Vec<String>,
    /// Canonical predicate names.
    pub overrides: PredicateOverrides,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            preferred_label_predicates: vec![
                CYC_ANNOTATIONS_LABEL.to_owned(),
                CYC_ANNOT_LABEL.to_owned(),
            ],
            overrides: PredicateOverrides::standard(),
        }
    }
}

/// The resource and predicate name tables of one translation run.
#[derive(Debug, Clone, Default)]
pub struct Names {
    resources: NameTable,
    predicates: NameTable,
}

impl Names {
    /// Builds both tables from every subject and predicate of `source`.
    #[must_use]
    pub fn build<S: OntologySource + ?Sized>(
        source: &S,
        labels: &LabelMap,
        options: &NamingOptions,
    ) -> Self {
        let mut names = Self::default();

        for subject in source.subjects() {
            let name = resource_name(source, labels, options, subject);
            names.resources.insert(subject.clone(), name);
        }

        let mut used: HashSet<String> = options.overrides.names().map(str::to_owned).collect();
        for predicate in source.predicates() {
            if let Some(canonical) = options.overrides.lookup(&predicate) {
                let canonical = canonical.to_owned();
                names.predicates.insert(predicate, canonical);
                continue;
            }
            let base = labels
                .lookup(&predicate)
                .and_then(|entry| entry.usable_label())
                .map_or_else(|| fallback_name(&predicate), |l| symbol_for(l, &predicate));
            let mut name = base.clone();
            let mut suffix = 1usize;
            while used.contains(&name) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            used.insert(name.clone());
            names.predicates.insert(predicate, name);
        }

        info!(
            resources = names.resources.len(),
            predicates = names.predicates.len(),
            "Built name tables"
        );
        names
    }

    /// The frame name of `resource`, falling back to its IRI tail.
    #[must_use]
    pub fn resource_name(&self, resource: &Resource) -> Cow<'_, str> {
        match self.resources.get(resource) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(fallback_name(resource)),
        }
    }

    /// The slot name of `predicate`, falling back to its IRI tail.
    #[must_use]
    pub fn predicate_name(&self, predicate: &Resource) -> Cow<'_, str> {
        match self.predicates.get(predicate) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(fallback_name(predicate)),
        }
    }

    /// The resource-name table.
    #[must_use]
    pub fn resources(&self) -> &NameTable {
        &self.resources
    }

    /// The predicate-name table.
    #[must_use]
    pub fn predicates(&self) -> &NameTable {
        &self.predicates
    }
}

/// Label map, then preferred annotation literals, then `rdfs:label`, then IRI tail.
fn resource_name<S: OntologySource + ?Sized>(
    source: &S,
    labels: &LabelMap,
    options: &NamingOptions,
    resource: &Resource,
) -> String {
    if let Some(label) = labels.lookup(resource).and_then(|e| e.usable_label()) {
        return symbol_for(label, resource);
    }

    let literals = |predicate: &str| -> Vec<String> {
        source
            .objects(resource, predicate)
            .into_iter()
            .filter_map(Value::as_literal)
            .map(|lit| lit.lexical.clone())
            .filter(|text| !text.trim().is_empty())
            .collect()
    };
    let mut candidates: Vec<String> = options
        .preferred_label_predicates
        .iter()
        .flat_map(|p| literals(p))
        .collect();
    if candidates.is_empty() {
        candidates = literals(RDFS_LABEL);
    }

    let chosen = candidates
        .iter()
        .find(|text| text.chars().next().is_some_and(char::is_uppercase))
        .or_else(|| candidates.first());
    match chosen {
        Some(text) => symbol_for(text, resource),
        None => fallback_name(resource),
    }
}
