//! Optimistic toggle synchronizer.
//!
//! One [`ToggleSynchronizer`] per rendered relation view. `assert`/`retract`
//! update local state and the renderer synchronously, then persist in a
//! spawned task and hand back a [`PendingSync`].

use crate::error::{PersistError, ToggleError};
use crate::policy::{FailurePolicy, SyncPolicy};
use crate::relation::ToggleableRelation;
use crate::render::{render_affordance, ControlRenderer};
use crate::store::RelationStore;
use crate::types::{
    Affordance, RelationKind, RelationSnapshot, RelationState, TargetId, ToggleAction, Viewer,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Everything the server rendered about one relation for one viewer.
#[derive(Debug, Clone)]
pub struct RelationView {
    pub snapshot: RelationSnapshot,
    pub viewer: Viewer,
    /// Owner of the target (post creator, profile user), if known.
    pub owner_id: Option<String>,
}

impl RelationView {
    pub fn new(snapshot: RelationSnapshot, viewer: Viewer) -> Self {
        Self {
            snapshot,
            viewer,
            owner_id: None,
        }
    }

    pub fn owned_by(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Anonymous viewers and owners of the target get no controls.
    pub fn is_interactive(&self) -> bool {
        match (self.viewer.user_id(), self.owner_id.as_deref()) {
            (None, _) => false,
            (Some(viewer), Some(owner)) => viewer != owner,
            (Some(_), None) => true,
        }
    }
}

/// How a background persistence request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Persisted {
        attempts: u32,
    },
    Failed {
        attempts: u32,
        error: PersistError,
        /// Whether the local transition was undone.
        rolled_back: bool,
    },
}

impl SyncOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted { .. })
    }
}

/// Handle to an in-flight persistence request.
///
/// Dropping it detaches the request; it still runs to completion.
#[derive(Debug)]
pub struct PendingSync {
    sync_id: Uuid,
    handle: JoinHandle<SyncOutcome>,
}

impl PendingSync {
    pub(crate) fn new(sync_id: Uuid, handle: JoinHandle<SyncOutcome>) -> Self {
        Self { sync_id, handle }
    }

    /// Identifier carried in this request's log lines.
    pub fn sync_id(&self) -> Uuid {
        self.sync_id
    }

    /// Wait for the request to settle.
    pub async fn wait(self) -> SyncOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => SyncOutcome::Failed {
                attempts: 0,
                error: PersistError::Network(format!("sync task did not complete: {err}")),
                rolled_back: false,
            },
        }
    }
}

struct SharedRelation {
    relation: ToggleableRelation,
    /// Bumped on every local transition; lets a late failure detect that it
    /// has been superseded.
    generation: u64,
}

/// Keeps one relation's display in step with user intent and persists each
/// change to the store of record.
///
/// # Thread Safety
///
/// Local transitions take a short lock and never await. Persistence runs on
/// the supplied runtime, so `assert`/`retract` return immediately.
pub struct ToggleSynchronizer {
    shared: Arc<Mutex<SharedRelation>>,
    interactive: bool,
    renderer: Arc<dyn ControlRenderer>,
    store: Arc<dyn RelationStore>,
    policy: SyncPolicy,
    runtime: tokio::runtime::Handle,
}

impl ToggleSynchronizer {
    /// Build the component for a freshly rendered view and draw its initial
    /// control and count.
    pub fn new(
        view: RelationView,
        renderer: Arc<dyn ControlRenderer>,
        store: Arc<dyn RelationStore>,
        policy: SyncPolicy,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let interactive = view.is_interactive();
        let relation = ToggleableRelation::from_snapshot(view.snapshot);

        let affordance = if interactive {
            relation.affordance()
        } else {
            Affordance::Hidden
        };
        render_affordance(renderer.as_ref(), relation.target_id(), affordance);
        renderer.render_count(relation.target_id(), relation.count());

        debug!(
            target_id = %relation.target_id(),
            kind = %relation.kind(),
            state = %relation.state(),
            count = relation.count(),
            interactive,
            "Relation view initialized"
        );

        Self {
            shared: Arc::new(Mutex::new(SharedRelation {
                relation,
                generation: 0,
            })),
            interactive,
            renderer,
            store,
            policy,
            runtime,
        }
    }

    /// Like / follow.
    pub fn assert(&self) -> Result<PendingSync, ToggleError> {
        self.transition(|_| ToggleAction::Assert)
    }

    /// Unlike / unfollow.
    pub fn retract(&self) -> Result<PendingSync, ToggleError> {
        self.transition(|_| ToggleAction::Retract)
    }

    /// Click whichever control is currently visible.
    pub fn toggle(&self) -> Result<PendingSync, ToggleError> {
        self.transition(ToggleAction::allowed_from)
    }

    pub fn snapshot(&self) -> RelationSnapshot {
        self.shared.lock().relation.snapshot()
    }

    pub fn affordance(&self) -> Affordance {
        if !self.interactive {
            return Affordance::Hidden;
        }
        self.shared.lock().relation.affordance()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn transition(
        &self,
        choose: impl FnOnce(RelationState) -> ToggleAction,
    ) -> Result<PendingSync, ToggleError> {
        let mut shared = self.shared.lock();

        if !self.interactive {
            let target_id = shared.relation.target_id().clone();
            warn!(%target_id, "Toggle rejected: relation is not interactive");
            return Err(ToggleError::NotInteractive { target_id });
        }

        let action = choose(shared.relation.state());
        let previous = shared.relation.clone();
        if let Err(err) = shared.relation.apply(action) {
            warn!(
                target_id = %shared.relation.target_id(),
                action = %action,
                error = %err,
                "Toggle rejected: precondition violated"
            );
            return Err(err);
        }

        shared.generation += 1;
        let generation = shared.generation;
        render_relation(self.renderer.as_ref(), &shared.relation);

        let kind = shared.relation.kind();
        let target_id = shared.relation.target_id().clone();
        info!(
            target_id = %target_id,
            kind = %kind,
            action = %action,
            count = shared.relation.count(),
            "Applied optimistic toggle"
        );
        drop(shared);

        Ok(self.spawn_persist(kind, target_id, action, previous, generation))
    }

    fn spawn_persist(
        &self,
        kind: RelationKind,
        target_id: TargetId,
        action: ToggleAction,
        previous: ToggleableRelation,
        generation: u64,
    ) -> PendingSync {
        let sync_id = Uuid::new_v4();
        let shared = self.shared.clone();
        let renderer = self.renderer.clone();
        let store = self.store.clone();
        let policy = self.policy.clone();

        let handle = self.runtime.spawn(async move {
            let (result, attempts) = policy
                .run(|| store.persist(kind, &target_id, action))
                .await;

            match result {
                Ok(()) => {
                    debug!(
                        %sync_id,
                        target_id = %target_id,
                        kind = %kind,
                        action = %action,
                        attempts,
                        "Relation persisted"
                    );
                    SyncOutcome::Persisted { attempts }
                }
                Err(error) => {
                    let rolled_back = policy.on_failure == FailurePolicy::Rollback
                        && rollback(&shared, renderer.as_ref(), previous, generation);
                    warn!(
                        %sync_id,
                        target_id = %target_id,
                        kind = %kind,
                        action = %action,
                        attempts,
                        rolled_back,
                        error = %error,
                        "Relation persist failed"
                    );
                    SyncOutcome::Failed {
                        attempts,
                        error,
                        rolled_back,
                    }
                }
            }
        });

        PendingSync::new(sync_id, handle)
    }
}

impl std::fmt::Debug for ToggleSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleSynchronizer")
            .field("interactive", &self.interactive)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn render_relation(renderer: &dyn ControlRenderer, relation: &ToggleableRelation) {
    render_affordance(renderer, relation.target_id(), relation.affordance());
    renderer.render_count(relation.target_id(), relation.count());
}

/// Restore the relation as it was before the failed transition, unless a
/// newer local transition has happened since.
fn rollback(
    shared: &Mutex<SharedRelation>,
    renderer: &dyn ControlRenderer,
    previous: ToggleableRelation,
    generation: u64,
) -> bool {
    let mut shared = shared.lock();
    if shared.generation != generation {
        debug!(
            target_id = %shared.relation.target_id(),
            failed_generation = generation,
            current_generation = shared.generation,
            "Skipping rollback (superseded by newer toggle)"
        );
        return false;
    }

    // A clamped retract has no inverse action.
    shared.relation = previous;
    shared.generation += 1;
    render_relation(renderer, &shared.relation);
    true
}
