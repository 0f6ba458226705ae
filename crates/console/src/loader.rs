//! Per-tab relation loading for the user-details view
//!
//! Every activation of a tab bumps that tab's generation and starts one fetch.
//! A fetch result is applied only while its generation is still current, so a
//! superseded fetch that completes late never overwrites newer state. All
//! fetch tasks share the view's cancellation token; once the view is torn
//! down their completions are dropped without touching state or notifying
//! subscribers.

use crate::source::DataAccess;
use keystone_core::{Entity, MembershipRecord, RelationTabState, ResourceKind};
use keystone_http::ClientError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::{CancellationToken, DropGuard};
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info_span, warn};

const UPDATE_CAPACITY: usize = 64;

/// State change of one relation tab
#[derive(Debug, Clone, PartialEq)]
pub struct TabUpdate {
    pub kind: ResourceKind,
    pub state: RelationTabState<Entity>,
}

#[derive(Debug, Default)]
struct TabSlot {
    generation: u64,
    /// `None` until the tab is first activated
    state: Option<RelationTabState<Entity>>,
}

struct Shared {
    source: Arc<dyn DataAccess>,
    subject_id: String,
    tabs: HashMap<ResourceKind, watch::Sender<TabSlot>>,
    updates: broadcast::Sender<TabUpdate>,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl Shared {
    fn publish(&self, kind: ResourceKind, state: RelationTabState<Entity>) {
        // No receivers is fine, hosts may only poll `state_of`
        let _ = self.updates.send(TabUpdate { kind, state });
    }

    fn apply(
        &self,
        kind: ResourceKind,
        generation: u64,
        outcome: Result<Vec<MembershipRecord>, ClientError>,
    ) {
        let Some(tab) = self.tabs.get(&kind) else {
            return;
        };

        let next = match outcome {
            Ok(records) => RelationTabState::loaded(MembershipRecord::resolve(records)),
            Err(err) => {
                warn!(
                    %kind,
                    subject = %self.subject_id,
                    error = %err,
                    transient = err.is_transient(),
                    "failed to load relation tab"
                );
                RelationTabState::errored()
            }
        };

        // Published under the slot lock so notifications follow state order
        // and teardown cannot slip in between the write and the send
        let applied = tab.send_if_modified(|slot| {
            if self.shutdown.is_cancelled() || slot.generation != generation {
                return false;
            }
            slot.state = Some(next.clone());
            self.publish(kind, next.clone());
            true
        });

        if applied {
            debug!(%kind, generation, items = next.items.len(), "relation tab settled");
        } else {
            debug!(%kind, generation, "discarding stale relation result");
        }
    }
}

/// Loads the relation tabs of one subject user.
///
/// Dropping the loader tears it down.
pub struct RelationTabLoader {
    shared: Arc<Shared>,
    _guard: DropGuard,
}

impl RelationTabLoader {
    pub fn new(source: Arc<dyn DataAccess>, subject_id: impl Into<String>) -> Self {
        let shutdown = CancellationToken::new();
        let tabs = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, watch::Sender::new(TabSlot::default())))
            .collect();
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);

        Self {
            _guard: shutdown.clone().drop_guard(),
            shared: Arc::new(Shared {
                source,
                subject_id: subject_id.into(),
                tabs,
                updates,
                shutdown,
                tasks: TaskTracker::new(),
            }),
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.shared.subject_id
    }

    /// Start loading `kind`, superseding any fetch still in flight for it.
    ///
    /// Must be called from within a Tokio runtime. Ignored after teardown.
    pub fn activate(&self, kind: ResourceKind) {
        if self.is_torn_down() {
            debug!(%kind, "ignoring activation after teardown");
            return;
        }
        let Some(tab) = self.shared.tabs.get(&kind) else {
            return;
        };

        let mut generation = 0;
        tab.send_if_modified(|slot| {
            slot.generation += 1;
            generation = slot.generation;
            if slot.state.as_ref().is_some_and(|state| state.loading) {
                return false;
            }
            slot.state = Some(RelationTabState::loading());
            self.shared.publish(kind, RelationTabState::loading());
            true
        });

        let shared = Arc::clone(&self.shared);
        let span = info_span!("relation_fetch", %kind, generation);
        self.shared.tasks.spawn(
            async move {
                let outcome = tokio::select! {
                    biased;
                    () = shared.shutdown.cancelled() => {
                        debug!("view torn down, dropping fetch");
                        return;
                    }
                    outcome = shared
                        .source
                        .fetch_relation_memberships(kind, &shared.subject_id) => outcome,
                };
                shared.apply(kind, generation, outcome);
            }
            .instrument(span),
        );
    }

    /// Current state of `kind`, `None` if it was never activated
    pub fn state_of(&self, kind: ResourceKind) -> Option<RelationTabState<Entity>> {
        self.shared
            .tabs
            .get(&kind)
            .and_then(|tab| tab.borrow().state.clone())
    }

    /// Receive every state change from now on.
    ///
    /// A receiver that falls behind gets `Lagged` and should re-read
    /// [`Self::state_of`].
    pub fn subscribe(&self) -> broadcast::Receiver<TabUpdate> {
        self.shared.updates.subscribe()
    }

    /// Wait until `kind` has finished loading.
    ///
    /// Returns `None` right away for a tab that was never activated, or once
    /// the loader is torn down.
    pub async fn settled(&self, kind: ResourceKind) -> Option<RelationTabState<Entity>> {
        let mut rx = self.shared.tabs.get(&kind)?.subscribe();
        if rx.borrow().state.is_none() {
            return None;
        }
        tokio::select! {
            () = self.shared.shutdown.cancelled() => None,
            slot = rx.wait_for(|slot| slot.state.as_ref().is_some_and(RelationTabState::is_settled)) => {
                slot.ok().and_then(|slot| slot.state.clone())
            }
        }
    }

    /// Stop applying fetch results. In-flight fetches are dropped.
    pub fn teardown(&self) {
        if self.shared.shutdown.is_cancelled() {
            return;
        }
        self.shared.shutdown.cancel();
        for tab in self.shared.tabs.values() {
            tab.send_if_modified(|slot| {
                slot.generation += 1;
                false
            });
        }
        self.shared.tasks.close();
        debug!(subject = %self.shared.subject_id, "relation loader torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.shutdown.is_cancelled()
    }

    /// Wait for every spawned fetch task to finish
    pub async fn join(&self) {
        self.shared.tasks.close();
        self.shared.tasks.wait().await;
        if !self.is_torn_down() {
            self.shared.tasks.reopen();
        }
    }
}

impl std::fmt::Debug for RelationTabLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationTabLoader")
            .field("subject_id", &self.shared.subject_id)
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}
