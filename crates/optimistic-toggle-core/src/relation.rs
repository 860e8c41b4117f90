//! The per-view relation value and its two-state machine.

use crate::error::ToggleError;
use crate::types::{
    Affordance, RelationKind, RelationSnapshot, RelationState, TargetId, ToggleAction,
};
use tracing::warn;

/// A directed boolean relation between the viewer and one target, plus the
/// total number of subjects asserting it.
///
/// `NotAsserted --assert--> Asserted --retract--> NotAsserted`. There is no
/// terminal state; the value lives as long as its view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleableRelation {
    target_id: TargetId,
    kind: RelationKind,
    state: RelationState,
    count: u64,
}

impl ToggleableRelation {
    pub fn from_snapshot(snapshot: RelationSnapshot) -> Self {
        Self {
            target_id: snapshot.target_id,
            kind: snapshot.kind,
            state: snapshot.state,
            count: snapshot.count,
        }
    }

    pub fn target_id(&self) -> &TargetId {
        &self.target_id
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn state(&self) -> RelationState {
        self.state
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Control the view should show for the current state.
    pub fn affordance(&self) -> Affordance {
        match self.state {
            RelationState::NotAsserted => Affordance::AssertControl,
            RelationState::Asserted => Affordance::RetractControl,
        }
    }

    pub fn snapshot(&self) -> RelationSnapshot {
        RelationSnapshot {
            target_id: self.target_id.clone(),
            kind: self.kind,
            state: self.state,
            count: self.count,
        }
    }

    /// `NotAsserted -> Asserted`, count + 1.
    pub fn assert(&mut self) -> Result<(), ToggleError> {
        self.apply(ToggleAction::Assert)
    }

    /// `Asserted -> NotAsserted`, count - 1 (never below zero).
    pub fn retract(&mut self) -> Result<(), ToggleError> {
        self.apply(ToggleAction::Retract)
    }

    /// Apply `action` if it is the one allowed from the current state.
    pub fn apply(&mut self, action: ToggleAction) -> Result<(), ToggleError> {
        if ToggleAction::allowed_from(self.state) != action {
            return Err(ToggleError::PreconditionViolation {
                target_id: self.target_id.clone(),
                state: self.state,
            });
        }

        match action {
            ToggleAction::Assert => {
                self.state = RelationState::Asserted;
                self.count = self.count.saturating_add(1);
            }
            ToggleAction::Retract => {
                self.state = RelationState::NotAsserted;
                if self.count == 0 {
                    // Server-rendered count was already stale.
                    warn!(
                        target_id = %self.target_id,
                        kind = %self.kind,
                        "Retract with zero count; clamping at 0"
                    );
                } else {
                    self.count -= 1;
                }
            }
        }

        Ok(())
    }
}
