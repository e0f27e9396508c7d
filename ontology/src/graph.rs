//! The ontology source interface and its in-memory triple store.

use std::collections::{HashMap, HashSet};

use crate::model::iris::{OWL_CLASS, OWL_OBJECT_PROPERTY, RDF_TYPE};
use crate::model::{Resource, Value};

/// Read access to an ontology graph.
///
/// The translator only ever needs subject enumeration, per-subject
/// `(predicate, object)` lists and type lookups. Everything beyond the two
/// required methods has a default derived from them; stores with their own
/// indexes override the defaults.
pub trait OntologySource {
    /// Every subject, in first-seen order.
    fn subjects(&self) -> &[Resource];

    /// The `(predicate, object)` pairs of `subject`, in the order the store holds them.
    fn predicate_objects(&self, subject: &Resource) -> &[(Resource, Value)];

    /// The objects of `subject` under `predicate`.
    fn objects<'a>(&'a self, subject: &Resource, predicate: &str) -> Vec<&'a Value> {
        self.predicate_objects(subject)
            .iter()
            .filter(|(p, _)| p.as_str() == predicate)
            .map(|(_, o)| o)
            .collect()
    }

    /// The declared `rdf:type`s of `resource`.
    fn types_of<'a>(&'a self, resource: &Resource) -> Vec<&'a Resource> {
        self.objects(resource, RDF_TYPE)
            .into_iter()
            .filter_map(Value::as_resource)
            .collect()
    }

    /// Whether `resource` is declared `rdf:type owl:Class`.
    fn is_class(&self, resource: &Resource) -> bool {
        self.types_of(resource)
            .iter()
            .any(|t| t.as_str() == OWL_CLASS)
    }

    /// Whether `resource` is declared `rdf:type owl:ObjectProperty`.
    fn is_object_property(&self, resource: &Resource) -> bool {
        self.types_of(resource)
            .iter()
            .any(|t| t.as_str() == OWL_OBJECT_PROPERTY)
    }

    /// Every distinct predicate, in first-seen order.
    fn predicates(&self) -> Vec<Resource> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for subject in self.subjects() {
            for (predicate, _) in self.predicate_objects(subject) {
                if seen.insert(predicate.clone()) {
                    out.push(predicate.clone());
                }
            }
        }
        out
    }
}

/// In-memory triple store.
///
/// Subjects and predicates keep their first-seen order and each subject's
/// statements keep insertion order, so translation output is deterministic
/// for a given input file. Inserting an identical triple twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    subjects: Vec<Resource>,
    predicates: Vec<Resource>,
    known_predicates: HashSet<Resource>,
    statements: HashMap<Resource, Vec<(Resource, Value)>>,
    types: HashMap<Resource, Vec<Resource>>,
    triple_count: usize,
}

impl OntologyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a triple. Returns `false` if the triple was already present.
    pub fn insert(&mut self, subject: Resource, predicate: Resource, object: Value) -> bool {
        if !self.statements.contains_key(&subject) {
            self.subjects.push(subject.clone());
        }
        let statements = self.statements.entry(subject.clone()).or_default();
        if statements
            .iter()
            .any(|(p, o)| *p == predicate && *o == object)
        {
            return false;
        }

        if predicate.as_str() == RDF_TYPE {
            if let Value::Resource(type_) = &object {
                self.types
                    .entry(subject.clone())
                    .or_default()
                    .push(type_.clone());
            }
        }
        if self.known_predicates.insert(predicate.clone()) {
            self.predicates.push(predicate.clone());
        }
        statements.push((predicate, object));
        self.triple_count += 1;
        true
    }

    /// Inserts a triple from IRI strings and any object value.
    pub fn add(&mut self, subject: &str, predicate: &str, object: impl Into<Value>) -> bool {
        self.insert(Resource::new(subject), Resource::new(predicate), object.into())
    }

    /// Number of distinct triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triple_count
    }

    /// Returns `true` if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triple_count == 0
    }
}

impl OntologySource for OntologyGraph {
    fn subjects(&self) -> &[Resource] {
        &self.subjects
    }

    fn predicate_objects(&self, subject: &Resource) -> &[(Resource, Value)] {
        self.statements
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn types_of<'a>(&'a self, resource: &Resource) -> Vec<&'a Resource> {
        self.types
            .get(resource)
            .map(|types| types.iter().collect())
            .unwrap_or_default()
    }

    fn predicates(&self) -> Vec<Resource> {
        self.predicates.clone()
    }
}
