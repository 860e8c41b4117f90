//! Presentation seams injected into the synchronizer and editor.
//!
//! The components never look anything up in a view tree. They call these
//! methods with the new state and the caller decides what "show" means
//! (DOM node, terminal line, test recorder).

use crate::types::{Affordance, TargetId};

/// Renders a relation's action controls and counter.
///
/// Implementations must keep the two controls mutually exclusive: showing
/// one hides the other.
///
/// Methods are called while the synchronizer holds its state lock. They must
/// not call back into the same [`ToggleSynchronizer`](crate::ToggleSynchronizer)
/// (`snapshot`, `affordance`, `assert`, ...) or they will deadlock.
pub trait ControlRenderer: Send + Sync {
    /// Show the "like"/"follow" control, hide its counterpart.
    fn show_assert_control(&self, target_id: &TargetId);

    /// Show the "unlike"/"unfollow" control, hide its counterpart.
    fn show_retract_control(&self, target_id: &TargetId);

    /// Hide both controls.
    fn hide_controls(&self, target_id: &TargetId);

    /// Display the total count.
    fn render_count(&self, target_id: &TargetId, count: u64);
}

/// Dispatch an [`Affordance`] to the matching renderer call.
pub(crate) fn render_affordance(
    renderer: &dyn ControlRenderer,
    target_id: &TargetId,
    affordance: Affordance,
) {
    match affordance {
        Affordance::AssertControl => renderer.show_assert_control(target_id),
        Affordance::RetractControl => renderer.show_retract_control(target_id),
        Affordance::Hidden => renderer.hide_controls(target_id),
    }
}

/// Renders a post's content, edit control, textarea and save control.
///
/// Called with the editor's state lock held; must not call back into the
/// same [`PostEditor`](crate::PostEditor).
pub trait EditorRenderer: Send + Sync {
    /// Show the content text and edit control; hide textarea and save control.
    fn show_content(&self, post_id: &TargetId, content: &str);

    /// Show the textarea pre-filled with `draft` and the save control; hide
    /// the content text and edit control.
    fn show_editor(&self, post_id: &TargetId, draft: &str);

    /// Hide the edit and save controls (viewer may not edit).
    fn hide_edit_controls(&self, post_id: &TargetId);
}
