//! Terminal rendering of relation controls and post editors.

use optimistic_toggle_core::{ControlRenderer, EditorRenderer, RelationKind, TargetId};
use parking_lot::Mutex;

/// Prints each display update as one line and keeps a transcript.
///
/// Labels follow the relation kind: like/unlike, follow/unfollow.
pub struct TerminalRenderer {
    kind: Option<RelationKind>,
    echo: bool,
    lines: Mutex<Vec<String>>,
}

impl TerminalRenderer {
    pub fn for_relation(kind: RelationKind, echo: bool) -> Self {
        Self {
            kind: Some(kind),
            echo,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn for_post(echo: bool) -> Self {
        Self {
            kind: None,
            echo,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Everything rendered so far, oldest first.
    pub fn transcript(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    fn labels(&self) -> (&'static str, &'static str, &'static str) {
        match self.kind {
            Some(RelationKind::Follow) => ("follow", "unfollow", "followers"),
            _ => ("like", "unlike", "likes"),
        }
    }

    fn emit(&self, target_id: &TargetId, text: String) {
        let line = format!("[{}] {}", target_id, text);
        if self.echo {
            println!("{}", line);
        }
        self.lines.lock().push(line);
    }
}

impl ControlRenderer for TerminalRenderer {
    fn show_assert_control(&self, target_id: &TargetId) {
        let (assert, _, _) = self.labels();
        self.emit(target_id, format!("control: {}", assert));
    }

    fn show_retract_control(&self, target_id: &TargetId) {
        let (_, retract, _) = self.labels();
        self.emit(target_id, format!("control: {}", retract));
    }

    fn hide_controls(&self, target_id: &TargetId) {
        self.emit(target_id, "control: hidden".to_string());
    }

    fn render_count(&self, target_id: &TargetId, count: u64) {
        let (_, _, noun) = self.labels();
        self.emit(target_id, format!("{}: {}", noun, count));
    }
}

impl EditorRenderer for TerminalRenderer {
    fn show_content(&self, post_id: &TargetId, content: &str) {
        self.emit(post_id, format!("content: {}", content));
    }

    fn show_editor(&self, post_id: &TargetId, draft: &str) {
        self.emit(post_id, format!("editing: {}", draft));
    }

    fn hide_edit_controls(&self, post_id: &TargetId) {
        self.emit(post_id, "edit: unavailable".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_labels() {
        let renderer = TerminalRenderer::for_relation(RelationKind::Follow, false);
        let target = TargetId::new("alice");

        renderer.show_retract_control(&target);
        renderer.render_count(&target, 3);

        assert_eq!(
            renderer.transcript(),
            vec!["[alice] control: unfollow", "[alice] followers: 3"]
        );
    }

    #[test]
    fn like_labels_and_hidden() {
        let renderer = TerminalRenderer::for_relation(RelationKind::Like, false);
        let target = TargetId::new("42");

        renderer.show_assert_control(&target);
        renderer.hide_controls(&target);

        assert_eq!(
            renderer.transcript(),
            vec!["[42] control: like", "[42] control: hidden"]
        );
    }

    #[test]
    fn editor_lines() {
        let renderer = TerminalRenderer::for_post(false);
        let post = TargetId::new("9");

        renderer.show_editor(&post, "draft");
        renderer.show_content(&post, "final");

        assert_eq!(
            renderer.transcript(),
            vec!["[9] editing: draft", "[9] content: final"]
        );
    }
}
