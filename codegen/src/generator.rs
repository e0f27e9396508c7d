//! Entity → KM frame generation.
//!
//! Each [`EntityRef`] becomes one `(Name has (slot (value …)) …)` frame.

use km_ontology::iris::{
    OWL_CLASS, OWL_INVERSE_OF, RDFS_DOMAIN, RDFS_LABEL, RDFS_RANGE, RDFS_SUBPROPERTY_OF,
};
use km_ontology::{EntityRef, Literal, OntologySource, Resource, Value};
use tracing::trace;

use crate::names::Names;

/// Accumulates one KM frame.
#[derive(Debug)]
pub struct Frame {
    buf: String,
}

impl Frame {
    /// Opens `(name has`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut buf = String::with_capacity(64);
        buf.push('(');
        buf.push_str(name);
        buf.push_str(" has");
        Self { buf }
    }

    /// Appends ` (slot (v1 v2 …))`. Slots with no values are skipped.
    pub fn slot(&mut self, slot: &str, values: &[String]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        self.buf.push_str(" (");
        self.buf.push_str(slot);
        self.buf.push_str(" (");
        self.buf.push_str(&values.join(" "));
        self.buf.push_str("))");
        self
    }

    /// Closes the frame.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.buf.push(')');
        self.buf
    }
}

/// Renders a literal as a double-quoted KM string, JSON escaping rules.
#[must_use]
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

/// Generates frames for entities of one ontology.
#[derive(Debug)]
pub struct ExpressionGenerator<'a, S: ?Sized> {
    source: &'a S,
    names: &'a Names,
}

impl<'a, S: OntologySource + ?Sized> ExpressionGenerator<'a, S> {
    /// Creates a generator over `source` using the run's name tables.
    #[must_use]
    pub fn new(source: &'a S, names: &'a Names) -> Self {
        Self { source, names }
    }

    /// Generates the frame of `entity`.
    #[must_use]
    pub fn generate(&self, entity: &EntityRef) -> String {
        let expression = match entity {
            EntityRef::Class(resource) => self.class_frame(resource),
            EntityRef::Property(resource) => self.property_frame(resource),
            EntityRef::Individual { resource, .. } => self.individual_frame(resource),
        };
        trace!(%entity, %expression, "Generated frame");
        expression
    }

    /// One clause per slot, values in store order, duplicates kept.
    fn class_frame(&self, resource: &Resource) -> String {
        self.statement_frame(resource, false)
    }

    /// As [`Self::class_frame`], with repeated values per slot collapsed.
    fn individual_frame(&self, resource: &Resource) -> String {
        self.statement_frame(resource, true)
    }

    fn statement_frame(&self, resource: &Resource, dedup: bool) -> String {
        let mut slots: Vec<(String, Vec<String>)> = Vec::new();
        for (predicate, object) in self.source.predicate_objects(resource) {
            if matches!(object, Value::Resource(r) if r.as_str() == OWL_CLASS) {
                continue;
            }
            let slot = self.names.predicate_name(predicate);
            let value = self.render(object);
            let index = match slots.iter().position(|(name, _)| *name == slot) {
                Some(index) => index,
                None => {
                    slots.push((slot.into_owned(), Vec::new()));
                    slots.len() - 1
                }
            };
            let values = &mut slots[index].1;
            if dedup && values.contains(&value) {
                continue;
            }
            values.push(value);
        }

        let mut frame = Frame::new(&self.names.resource_name(resource));
        for (slot, values) in &slots {
            frame.slot(slot, values);
        }
        frame.finish()
    }

    fn property_frame(&self, resource: &Resource) -> String {
        let labels: Vec<String> = self
            .source
            .objects(resource, RDFS_LABEL)
            .into_iter()
            .map(|value| match value {
                Value::Literal(Literal { lexical, .. }) => quote(lexical),
                other => quote(&self.render_bare(other)),
            })
            .collect();
        let resources = |predicate: &str| -> Vec<String> {
            self.source
                .objects(resource, predicate)
                .into_iter()
                .map(|value| self.render(value))
                .collect()
        };

        let mut frame = Frame::new(&self.names.resource_name(resource));
        frame
            .slot("instance-of", &["Slot".to_owned()])
            .slot("label", &labels)
            .slot("domain", &resources(RDFS_DOMAIN))
            .slot("range", &resources(RDFS_RANGE))
            .slot("superslots", &resources(RDFS_SUBPROPERTY_OF))
            .slot("inverse", &resources(OWL_INVERSE_OF));
        frame.finish()
    }

    fn render(&self, value: &Value) -> String {
        match value {
            Value::Resource(r) => self.names.resource_name(r).into_owned(),
            Value::Literal(lit) => quote(&lit.lexical),
            Value::Blank(id) => quote(&format!("_:{id}")),
        }
    }

    fn render_bare(&self, value: &Value) -> String {
        match value {
            Value::Resource(r) => self.names.resource_name(r).into_owned(),
            Value::Literal(lit) => lit.lexical.clone(),
            Value::Blank(id) => format!("_:{id}"),
        }
    }
}
