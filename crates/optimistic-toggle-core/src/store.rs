//! Remote store of record consumed by the components.

use crate::error::PersistResult;
use crate::types::{RelationKind, TargetId, ToggleAction};
use async_trait::async_trait;

/// Persists relation transitions for the authenticated subject.
///
/// Implementations are expected to be idempotent server-side: asserting an
/// asserted relation is a no-op, not an error.
#[async_trait]
pub trait RelationStore: Send + Sync {
    async fn persist(
        &self,
        kind: RelationKind,
        target_id: &TargetId,
        action: ToggleAction,
    ) -> PersistResult<()>;
}

/// Persists edited post content.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn update_post(&self, post_id: &TargetId, content: &str) -> PersistResult<()>;
}
