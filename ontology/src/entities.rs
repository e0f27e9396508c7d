//! Entity enumeration: which classes, properties and individuals to translate.

use std::collections::HashSet;

use tracing::info;

use crate::graph::OntologySource;
use crate::model::iris::OWL_CLASS;
use crate::model::{EntityKind, EntityRef};

/// The entities of one ontology, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityInventory {
    /// `owl:Class` subjects.
    pub classes: Vec<EntityRef>,
    /// `owl:ObjectProperty` subjects.
    pub properties: Vec<EntityRef>,
    /// `(individual, class)` typings.
    pub individuals: Vec<EntityRef>,
}

impl EntityInventory {
    /// Total number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len() + self.properties.len() + self.individuals.len()
    }

    /// Returns `true` if nothing was enumerated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entities of `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Class => self.classes.len(),
            EntityKind::Property => self.properties.len(),
            EntityKind::Individual => self.individuals.len(),
        }
    }

    /// Iterates classes, then properties, then individuals.
    pub fn iter(&self) -> impl Iterator<Item = &EntityRef> {
        self.classes
            .iter()
            .chain(&self.properties)
            .chain(&self.individuals)
    }

    /// Consumes the inventory into one list, in [`iter`](Self::iter) order.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntityRef> {
        let mut all = self.classes;
        all.extend(self.properties);
        all.extend(self.individuals);
        all
    }
}

/// Enumerates every translatable entity of `source`.
///
/// A subject typed with a class `T` (other than `owl:Class` itself) yields
/// `Individual(subject, T)`; a multiply typed subject yields one entry per
/// class. Subject order is preserved within each kind.
#[must_use]
pub fn enumerate<S: OntologySource + ?Sized>(source: &S) -> EntityInventory {
    let mut inventory = EntityInventory::default();
    let mut seen = HashSet::new();

    for subject in source.subjects() {
        if source.is_class(subject) {
            inventory.classes.push(EntityRef::Class(subject.clone()));
        }
        if source.is_object_property(subject) {
            inventory.properties.push(EntityRef::Property(subject.clone()));
        }
        for class in source.types_of(subject) {
            if class.as_str() == OWL_CLASS || !source.is_class(class) {
                continue;
            }
            let entity = EntityRef::individual(subject.clone(), class.clone());
            if seen.insert(entity.clone()) {
                inventory.individuals.push(entity);
            }
        }
    }

    info!(
        classes = inventory.classes.len(),
        properties = inventory.properties.len(),
        individuals = inventory.individuals.len(),
        "Enumerated entities"
    );
    inventory
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use km_test_helpers::fixtures;
    use crate::loader::{parse_str, RdfFormat};
    use crate::model::Resource;

    fn zoo(local: &str) -> Resource {
        Resource::new(format!("{}{local}", fixtures::ZOO))
    }

    #[test]
    fn scenario_inventory() {
        let graph = parse_str(fixtures::SCENARIO, RdfFormat::Turtle).unwrap();
        let inv = enumerate(&graph);
        assert_eq!(
            inv.classes,
            vec![EntityRef::Class(zoo("Animal")), EntityRef::Class(zoo("Dog"))]
        );
        assert!(inv.properties.is_empty());
        assert_eq!(
            inv.individuals,
            vec![EntityRef::individual(zoo("Fido"), zoo("Dog"))]
        );
        assert_eq!(inv.len(), 3);
    }

    #[test]
    fn multiply_typed_individual_yields_one_entry_per_class() {
        let ttl = format!(
            "{}:Pet a owl:Class .\n:Dog a owl:Class .\n:Rex a :Dog, :Pet, :Unknown .\n",
            fixtures::PREFIXES
        );
        let graph = parse_str(&ttl, RdfFormat::Turtle).unwrap();
        let inv = enumerate(&graph);
        assert_eq!(inv.count(EntityKind::Individual), 2);
        assert!(inv
            .individuals
            .contains(&EntityRef::individual(zoo("Rex"), zoo("Pet"))));
    }

    #[test]
    fn properties_are_enumerated() {
        let graph = parse_str(fixtures::PROPERTIES, RdfFormat::Turtle).unwrap();
        let inv = enumerate(&graph);
        assert_eq!(inv.count(EntityKind::Property), 2);
        assert_eq!(inv.iter().count(), inv.len());
    }
}
