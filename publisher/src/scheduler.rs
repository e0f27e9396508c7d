//! Round-based, dependency-ordered publishing.
//!
//! Each round takes a snapshot of the sent set, dispatches every pending
//! entity whose dependencies are all in that snapshot, and waits for the
//! whole batch before the next round starts. Entities that become sent
//! mid-round only unblock their dependents in the following round, so an
//! entity is never dispatched before all of its prerequisites were
//! accepted.
//!
//! The loop ends when nothing is pending, when no pending entity is ready
//! (unresolvable references or a cycle), or when a round changes nothing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use km_ontology::EntityRef;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::client::KmClient;
use crate::registry::{FailureReason, PublishRegistry, PublishState};
use crate::report::PublishReport;

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Publish calls in flight at once.
    pub workers: usize,
    /// Skip network I/O and treat every publish as accepted.
    pub dry_run: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            dry_run: false,
        }
    }
}

/// Available parallelism, or 1 if it cannot be determined.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

/// Publishes expressions in dependency order.
pub struct PublishScheduler {
    client: Arc<dyn KmClient>,
    config: SchedulerConfig,
}

impl std::fmt::Debug for PublishScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishScheduler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PublishScheduler {
    /// Creates a scheduler that publishes through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn KmClient>, config: SchedulerConfig) -> Self {
        Self { client, config }
    }

    /// The scheduler settings.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Publishes `items` into a fresh registry.
    ///
    /// `dependencies` is called at most once per entity, on first need.
    pub async fn run<F>(&self, items: Vec<(EntityRef, String)>, dependencies: F) -> PublishReport
    where
        F: Fn(&EntityRef, &str) -> Vec<EntityRef>,
    {
        let registry = PublishRegistry::new();
        self.run_with_registry(items, dependencies, &registry).await
    }

    /// Publishes `items`, recording terminal states in `registry`.
    ///
    /// Entities that already have a state in `registry` are not dispatched
    /// again. Repeated entities in `items` keep their first expression.
    pub async fn run_with_registry<F>(
        &self,
        items: Vec<(EntityRef, String)>,
        dependencies: F,
        registry: &PublishRegistry,
    ) -> PublishReport
    where
        F: Fn(&EntityRef, &str) -> Vec<EntityRef>,
    {
        let start = Instant::now();
        let workers = self.config.workers.max(1);

        let mut entities = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();
        let mut remaining: Vec<(EntityRef, String)> = Vec::with_capacity(items.len());
        for (entity, expression) in items {
            if !seen.insert(entity.clone()) {
                debug!(%entity, "Duplicate entity ignored");
                continue;
            }
            entities.push(entity.clone());
            if registry.state(&entity).is_none() {
                remaining.push((entity, expression));
            }
        }
        info!(
            entities = entities.len(),
            pending = remaining.len(),
            workers,
            dry_run = self.config.dry_run,
            "Starting publish"
        );

        let mut deps_cache: HashMap<EntityRef, Vec<EntityRef>> = HashMap::new();
        let mut stuck = Vec::new();
        let mut round = 0usize;

        while !remaining.is_empty() {
            round += 1;
            let sent = registry.sent_snapshot();

            let mut ready = Vec::new();
            let mut waiting = Vec::new();
            for (entity, expression) in remaining {
                let deps = deps_cache
                    .entry(entity.clone())
                    .or_insert_with(|| dependencies(&entity, &expression));
                if deps.iter().all(|d| sent.contains(d)) {
                    ready.push((entity, expression));
                } else {
                    waiting.push((entity, expression));
                }
            }

            if ready.is_empty() {
                info!(round, pending = waiting.len(), "No entity is ready; stopping");
                stuck = fail_pending(&waiting, &deps_cache, &sent, registry, round);
                break;
            }

            info!(round, ready = ready.len(), waiting = waiting.len(), "Dispatching round");
            let dispatched = ready.len();
            let client = &self.client;
            let dry_run = self.config.dry_run;
            let written: usize = stream::iter(ready)
                .map(|(entity, expression)| {
                    let span = info_span!("publish", %entity, round);
                    async move {
                        let result = client.publish(&expression, dry_run).await;
                        let state = match result {
                            Ok(outcome) if outcome.success => PublishState::Sent { expression, round },
                            Ok(outcome) => {
                                warn!(detail = %outcome.detail, "Publish rejected");
                                PublishState::Failed {
                                    reason: FailureReason::ProcessingFailure,
                                    round,
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "Publish raised");
                                PublishState::Failed {
                                    reason: FailureReason::Exception(e.to_string()),
                                    round,
                                }
                            }
                        };
                        usize::from(registry.record(entity, state))
                    }
                    .instrument(span)
                })
                .buffer_unordered(workers)
                .fold(0usize, |acc, n| async move { acc + n })
                .await;

            debug!(round, dispatched, written, "Round complete");
            remaining = waiting;
            if written == 0 {
                warn!(round, pending = remaining.len(), "Round made no progress; stopping");
                let sent = registry.sent_snapshot();
                stuck = fail_pending(&remaining, &deps_cache, &sent, registry, round);
                break;
            }
        }

        let report = PublishReport::from_registry(&entities, registry, round, stuck);
        for (entity, reason) in &report.failed {
            info!(%entity, %reason, "Entity not published");
        }
        info!(
            total = report.total,
            sent = report.sent,
            failed = report.failed_count(),
            rounds = report.rounds,
            elapsed_ms = start.elapsed().as_millis(),
            "Publish finished"
        );
        report
    }
}

/// Marks every pending entity failed and returns them.
fn fail_pending(
    pending: &[(EntityRef, String)],
    deps_cache: &HashMap<EntityRef, Vec<EntityRef>>,
    sent: &HashSet<EntityRef>,
    registry: &PublishRegistry,
    round: usize,
) -> Vec<EntityRef> {
    pending
        .iter()
        .map(|(entity, _)| {
            let blocked = deps_cache
                .get(entity)
                .is_some_and(|deps| deps.iter().any(|d| !sent.contains(d)));
            let reason = if blocked {
                FailureReason::DependencyFailure
            } else {
                FailureReason::UnknownFailure
            };
            debug!(%entity, %reason, "Entity stuck");
            registry.record(entity.clone(), PublishState::Failed { reason, round });
            entity.clone()
        })
        .collect()
}
