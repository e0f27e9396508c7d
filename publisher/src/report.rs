//! Publish run reporting.

use std::collections::BTreeMap;

use km_ontology::EntityRef;

use crate::registry::{FailureReason, PublishRegistry, PublishState};

/// Final accounting of one scheduler run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Distinct entities handed to the scheduler.
    pub total: usize,
    /// Entities that ended [`PublishState::Sent`].
    pub sent: usize,
    /// Every failed entity with its reason, in entity order.
    pub failed: Vec<(EntityRef, FailureReason)>,
    /// Rounds the scheduler executed.
    pub rounds: usize,
    /// Entities left undispatched when no further progress was possible.
    pub stuck: Vec<EntityRef>,
}

impl PublishReport {
    /// Builds the report for `entities` from the registry's final state.
    ///
    /// Entities with no terminal state count as neither sent nor failed.
    #[must_use]
    pub fn from_registry(
        entities: &[EntityRef],
        registry: &PublishRegistry,
        rounds: usize,
        stuck: Vec<EntityRef>,
    ) -> Self {
        let mut report = Self {
            total: entities.len(),
            rounds,
            stuck,
            ..Self::default()
        };
        for entity in entities {
            match registry.state(entity) {
                Some(PublishState::Sent { .. }) => report.sent += 1,
                Some(PublishState::Failed { reason, .. }) => {
                    report.failed.push((entity.clone(), reason));
                }
                None => {}
            }
        }
        report.failed.sort_by(|a, b| a.0.cmp(&b.0));
        report
    }

    /// Number of failed entities.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Failure counts keyed by reason kind (`dependency_failure`, `exception`, …).
    #[must_use]
    pub fn failures_by_reason(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, reason) in &self.failed {
            *counts.entry(reason.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns `true` if every entity was sent.
    #[must_use]
    pub fn all_sent(&self) -> bool {
        self.sent == self.total
    }

    /// The user-facing summary, one line per entry.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total entities: {}", self.total),
            format!("Sent: {}", self.sent),
            format!("Failed: {}", self.failed_count()),
        ];
        for (kind, count) in self.failures_by_reason() {
            lines.push(format!("  {kind}: {count}"));
        }
        lines.push(format!("Rounds: {}", self.rounds));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_ontology::Resource;

    #[test]
    fn summary_groups_failures_by_kind() {
        let registry = PublishRegistry::new();
        let a = EntityRef::Class(Resource::new("http://e.org/A"));
        let b = EntityRef::Class(Resource::new("http://e.org/B"));
        let c = EntityRef::Class(Resource::new("http://e.org/C"));
        registry.record(
            a.clone(),
            PublishState::Sent {
                expression: "(A has)".to_owned(),
                round: 1,
            },
        );
        registry.record(
            b.clone(),
            PublishState::Failed {
                reason: FailureReason::Exception("timeout".to_owned()),
                round: 1,
            },
        );
        registry.record(
            c.clone(),
            PublishState::Failed {
                reason: FailureReason::DependencyFailure,
                round: 2,
            },
        );

        let report = PublishReport::from_registry(&[a, b, c.clone()], &registry, 2, vec![c]);
        assert_eq!(
            report.summary_lines(),
            vec![
                "Total entities: 3",
                "Sent: 1",
                "Failed: 2",
                "  dependency_failure: 1",
                "  exception: 1",
                "Rounds: 2",
            ]
        );
        assert!(!report.all_sent());
    }
}
