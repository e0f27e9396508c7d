//! The shared publish registry.
//!
//! One entry per entity that reached a terminal state. Entries are written
//! once and never change; an entity with no entry is still unsent.

use std::collections::HashSet;
use std::fmt;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use km_ontology::EntityRef;

/// Why an entity was not published.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// A prerequisite never reached [`PublishState::Sent`].
    DependencyFailure,
    /// The KM server rejected the expression.
    ProcessingFailure,
    /// The client failed without a verdict.
    Exception(String),
    /// Stuck with every dependency sent; should not happen.
    UnknownFailure,
}

impl FailureReason {
    /// Reason label without the exception message.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::DependencyFailure => "dependency_failure",
            FailureReason::ProcessingFailure => "processing_failure",
            FailureReason::Exception(_) => "exception",
            FailureReason::UnknownFailure => "unknown_failure",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Exception(message) => write!(f, "exception: {message}"),
            other => f.write_str(other.kind()),
        }
    }
}

/// Terminal state of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishState {
    /// Accepted by the server (or skipped in a dry run).
    Sent {
        /// The expression that was published.
        expression: String,
        /// Round in which it was sent (1-based).
        round: usize,
    },
    /// Gave up on the entity.
    Failed {
        /// Classified cause.
        reason: FailureReason,
        /// Round in which the failure was recorded.
        round: usize,
    },
}

impl PublishState {
    /// Returns `true` for [`PublishState::Sent`].
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, PublishState::Sent { .. })
    }

    /// The round this state was recorded in.
    #[must_use]
    pub fn round(&self) -> usize {
        match self {
            PublishState::Sent { round, .. } | PublishState::Failed { round, .. } => *round,
        }
    }
}

/// Concurrent write-once map from entity to terminal state.
#[derive(Debug, Default)]
pub struct PublishRegistry {
    states: DashMap<EntityRef, PublishState>,
}

impl PublishRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `state` for `entity` unless it already has one.
    ///
    /// Returns `true` if this call performed the write.
    pub fn record(&self, entity: EntityRef, state: PublishState) -> bool {
        match self.states.entry(entity) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(state);
                true
            }
        }
    }

    /// The terminal state of `entity`, if it has one.
    #[must_use]
    pub fn state(&self, entity: &EntityRef) -> Option<PublishState> {
        self.states.get(entity).map(|s| s.value().clone())
    }

    /// Returns `true` if `entity` has been sent.
    #[must_use]
    pub fn is_sent(&self, entity: &EntityRef) -> bool {
        self.states.get(entity).is_some_and(|s| s.is_sent())
    }

    /// Every sent entity, copied out.
    #[must_use]
    pub fn sent_snapshot(&self) -> HashSet<EntityRef> {
        self.states
            .iter()
            .filter(|e| e.value().is_sent())
            .map(|e| e.key().clone())
            .collect()
    }

    /// Every failed entity with its reason.
    #[must_use]
    pub fn failures(&self) -> Vec<(EntityRef, FailureReason)> {
        let mut out: Vec<(EntityRef, FailureReason)> = self
            .states
            .iter()
            .filter_map(|e| match e.value() {
                PublishState::Failed { reason, .. } => Some((e.key().clone(), reason.clone())),
                PublishState::Sent { .. } => None,
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Number of sent entities.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.states.iter().filter(|e| e.value().is_sent()).count()
    }

    /// Number of failed entities.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.len() - self.sent_count()
    }

    /// Number of entities in a terminal state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_ontology::Resource;

    fn class(iri: &str) -> EntityRef {
        EntityRef::Class(Resource::new(iri))
    }

    #[test]
    fn writes_are_once_only() {
        let registry = PublishRegistry::new();
        let dog = class("http://e.org/Dog");
        let sent = PublishState::Sent {
            expression: "(Dog has)".to_owned(),
            round: 1,
        };
        assert!(registry.record(dog.clone(), sent.clone()));
        assert!(!registry.record(
            dog.clone(),
            PublishState::Failed {
                reason: FailureReason::ProcessingFailure,
                round: 2,
            }
        ));
        assert_eq!(registry.state(&dog), Some(sent));
        assert_eq!(registry.sent_count(), 1);
        assert_eq!(registry.failed_count(), 0);
        assert!(registry.sent_snapshot().contains(&dog));
    }

    #[test]
    fn failures_are_listed_with_reasons() {
        let registry = PublishRegistry::new();
        registry.record(
            class("http://e.org/B"),
            PublishState::Failed {
                reason: FailureReason::Exception("boom".to_owned()),
                round: 1,
            },
        );
        registry.record(
            class("http://e.org/A"),
            PublishState::Failed {
                reason: FailureReason::DependencyFailure,
                round: 2,
            },
        );
        let failures = registry.failures();
        assert_eq!(failures[0].0, class("http://e.org/A"));
        assert_eq!(failures[1].1.to_string(), "exception: boom");
        assert_eq!(failures[1].1.kind(), "exception");
        assert!(registry.sent_snapshot().is_empty());
    }
}
