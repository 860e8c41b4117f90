//! Identifiers and small value types shared by every component.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a post or profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TargetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which relation a toggle manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Current user likes a post.
    Like,
    /// Current user follows a profile.
    Follow,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Follow => "follow",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the relation is currently asserted by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationState {
    Asserted,
    NotAsserted,
}

impl RelationState {
    pub fn from_bool(asserted: bool) -> Self {
        if asserted {
            Self::Asserted
        } else {
            Self::NotAsserted
        }
    }

    pub fn is_asserted(&self) -> bool {
        matches!(self, Self::Asserted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asserted => "asserted",
            Self::NotAsserted => "not asserted",
        }
    }
}

impl fmt::Display for RelationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transition request, also the path segment sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Assert,
    Retract,
}

impl ToggleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assert => "assert",
            Self::Retract => "retract",
        }
    }

    /// The transition that undoes this one.
    pub fn inverse(&self) -> Self {
        match self {
            Self::Assert => Self::Retract,
            Self::Retract => Self::Assert,
        }
    }

    /// The only action allowed from `state`.
    pub fn allowed_from(state: RelationState) -> Self {
        match state {
            RelationState::NotAsserted => Self::Assert,
            RelationState::Asserted => Self::Retract,
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The control a view displays for a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    /// "Like" / "Follow" is clickable, its counterpart is hidden.
    AssertControl,
    /// "Unlike" / "Unfollow" is clickable, its counterpart is hidden.
    RetractControl,
    /// Neither control is shown (anonymous viewer or own target).
    Hidden,
}

/// Who is looking at the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Authenticated { user_id: String },
}

impl Viewer {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::Authenticated {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user_id } => Some(user_id),
        }
    }
}

/// Server-rendered state of one relation, and the shape reported back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSnapshot {
    pub target_id: TargetId,
    pub kind: RelationKind,
    pub state: RelationState,
    pub count: u64,
}

impl RelationSnapshot {
    pub fn new(
        target_id: impl Into<TargetId>,
        kind: RelationKind,
        asserted: bool,
        count: u64,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            kind,
            state: RelationState::from_bool(asserted),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_action_follows_state() {
        assert_eq!(
            ToggleAction::allowed_from(RelationState::NotAsserted),
            ToggleAction::Assert
        );
        assert_eq!(
            ToggleAction::allowed_from(RelationState::Asserted),
            ToggleAction::Retract
        );
        assert_eq!(ToggleAction::Assert.inverse(), ToggleAction::Retract);
    }

    #[test]
    fn viewer_user_id() {
        assert_eq!(Viewer::Anonymous.user_id(), None);
        assert_eq!(Viewer::authenticated("alice").user_id(), Some("alice"));
    }

    #[test]
    fn snapshot_serializes_with_lowercase_enums() {
        let snapshot = RelationSnapshot::new("7", RelationKind::Follow, true, 3);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"target_id\":\"7\""));
        assert!(json.contains("\"kind\":\"follow\""));
        assert!(json.contains("\"state\":\"asserted\""));
        assert!(json.contains("\"count\":3"));
    }
}
