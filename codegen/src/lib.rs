//! OWL → KM translation.
//!
//! Turns the entities of a [`km_ontology::OntologySource`] into KM frame
//! expressions and recovers the dependencies between those expressions.
//! The pieces are usable on their own, but most callers go through
//! [`Translator`], which builds the run's name tables once and shares them
//! between the generator and the extractor.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod generator;
pub mod mapping;
pub mod names;
pub mod references;

use std::time::Duration;

use km_ontology::{EntityKind, EntityRef, LabelMap, OntologySource};
use tracing::info;

use generator::ExpressionGenerator;
use names::{Names, NamingOptions};
use references::ReferenceExtractor;

/// A generated KM expression.
pub type Expression = String;

/// One entity together with its generated frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedEntity {
    /// The translated entity.
    pub entity: EntityRef,
    /// Its KM frame.
    pub expression: Expression,
}

/// Report of what was translated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslationReport {
    /// Number of class frames.
    pub class_count: usize,
    /// Number of slot frames.
    pub property_count: usize,
    /// Number of instance frames.
    pub individual_count: usize,
    /// Wall time spent generating.
    pub elapsed: Duration,
}

impl TranslationReport {
    /// Tallies `translated` by kind.
    #[must_use]
    pub fn new(translated: &[TranslatedEntity], elapsed: Duration) -> Self {
        let mut report = Self {
            elapsed,
            ..Self::default()
        };
        for t in translated {
            match t.entity.kind() {
                EntityKind::Class => report.class_count += 1,
                EntityKind::Property => report.property_count += 1,
                EntityKind::Individual => report.individual_count += 1,
            }
        }
        report
    }

    /// Total number of frames.
    #[must_use]
    pub fn total(&self) -> usize {
        self.class_count + self.property_count + self.individual_count
    }
}

/// Name tables plus the generator and extractor that share them.
#[derive(Debug)]
pub struct Translator<'a, S: ?Sized> {
    source: &'a S,
    names: Names,
}

impl<'a, S: OntologySource + ?Sized> Translator<'a, S> {
    /// Builds the name tables for `source`.
    #[must_use]
    pub fn new(source: &'a S, labels: &LabelMap, options: &NamingOptions) -> Self {
        Self {
            source,
            names: Names::build(source, labels, options),
        }
    }

    /// The run's name tables.
    #[must_use]
    pub fn names(&self) -> &Names {
        &self.names
    }

    /// Generates the frame of one entity.
    #[must_use]
    pub fn translate(&self, entity: &EntityRef) -> Expression {
        ExpressionGenerator::new(self.source, &self.names).generate(entity)
    }

    /// Generates frames for `entities`, in order.
    #[must_use]
    pub fn translate_all(&self, entities: &[EntityRef]) -> Vec<TranslatedEntity> {
        let generator = ExpressionGenerator::new(self.source, &self.names);
        let translated: Vec<TranslatedEntity> = entities
            .iter()
            .map(|entity| TranslatedEntity {
                entity: entity.clone(),
                expression: generator.generate(entity),
            })
            .collect();
        info!(frames = translated.len(), "Translated entities");
        translated
    }

    /// The entities `entity` depends on, given its frame.
    #[must_use]
    pub fn references(&self, entity: &EntityRef, expression: &str) -> Vec<EntityRef> {
        ReferenceExtractor::new(self.source, &self.names).dependencies(entity, expression)
    }
}
