//! Error types for toggles, post edits and remote persistence.

use crate::types::{RelationState, TargetId};
use thiserror::Error;

/// Failure reported by a remote store while persisting a change.
///
/// Never fatal: the synchronizer logs it and reports it through
/// [`SyncOutcome::Failed`](crate::SyncOutcome::Failed).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistError {
    /// The request did not complete (connection refused, timeout, TLS).
    #[error("Network failure: {0}")]
    Network(String),

    /// The store answered with a non-success status.
    #[error("Store rejected request: {status} - {message}")]
    Rejected {
        /// HTTP status code returned by the store.
        status: u16,
        /// Response body, kept for debugging only.
        message: String,
    },

    /// The request could not be built (bad URL, unserializable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result alias for store operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Rejected assert/retract calls. Local state is untouched when returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToggleError {
    /// The requested transition is not valid from the current state, e.g.
    /// `assert` on an already asserted relation (stale view, double click).
    #[error("Cannot apply toggle to {target_id}: relation is already {state}")]
    PreconditionViolation {
        target_id: TargetId,
        state: RelationState,
    },

    /// The viewer may not toggle this relation (anonymous, or own target).
    #[error("Relation on {target_id} is not interactive for this viewer")]
    NotInteractive { target_id: TargetId },
}

/// Rejected post editor calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Post is not editable by this viewer")]
    NotEditable,

    #[error("Post is not being edited")]
    NotEditing,

    #[error("Post is already being edited")]
    AlreadyEditing,

    #[error("Post content cannot be empty")]
    EmptyContent,

    #[error("Post content is {len} characters, maximum is {max}")]
    ContentTooLong { len: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_display() {
        let err = PersistError::Rejected {
            status: 403,
            message: "CSRF verification failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Store rejected request: 403 - CSRF verification failed"
        );
    }

    #[test]
    fn precondition_violation_display_names_state() {
        let err = ToggleError::PreconditionViolation {
            target_id: TargetId::new("42"),
            state: RelationState::Asserted,
        };
        assert_eq!(
            err.to_string(),
            "Cannot apply toggle to 42: relation is already asserted"
        );
    }

    #[test]
    fn content_too_long_display() {
        let err = EditError::ContentTooLong { len: 200, max: 160 };
        assert_eq!(
            err.to_string(),
            "Post content is 200 characters, maximum is 160"
        );
    }
}
