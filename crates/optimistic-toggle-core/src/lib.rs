//! # Optimistic Toggle Core
//!
//! Keeps a locally displayed binary relation ("I like this post", "I follow
//! this profile") in step with user intent, and persists every change to a
//! remote store of record in the background.
//!
//! ## Architecture
//!
//! ```text
//! click ──▶ ToggleSynchronizer ──▶ ControlRenderer (synchronous)
//!                  │
//!                  └──spawn──▶ RelationStore (PUT /assert|retract/{id})
//!                                   │
//!                              PendingSync ──▶ SyncOutcome
//! ```
//!
//! ## Consistency
//!
//! - **Optimistic**: state, count and the visible control change before the
//!   request is sent.
//! - **Fire-and-forget by default**: a failed request is logged and the local
//!   state is kept. The next full load from the server reconciles it.
//! - **Opt-in reconciliation**: [`FailurePolicy::Rollback`] and
//!   [`SyncPolicy::max_retries`] can be enabled without touching the state
//!   machine.
//!
//! The same optimistic flow backs [`PostEditor`], which switches a post
//! between viewing and editing and persists saved content.

mod editor;
mod error;
mod policy;
mod relation;
mod render;
mod store;
mod synchronizer;
mod types;

#[cfg(test)]
mod test_support;

pub use editor::{EditMode, PostEditor, PostView, MAX_POST_LENGTH};
pub use error::{EditError, PersistError, PersistResult, ToggleError};
pub use policy::{FailurePolicy, SyncPolicy};
pub use relation::ToggleableRelation;
pub use render::{ControlRenderer, EditorRenderer};
pub use store::{PostStore, RelationStore};
pub use synchronizer::{PendingSync, RelationView, SyncOutcome, ToggleSynchronizer};
pub use types::{
    Affordance, RelationKind, RelationSnapshot, RelationState, TargetId, ToggleAction, Viewer,
};
