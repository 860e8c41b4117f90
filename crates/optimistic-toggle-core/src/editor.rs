//! Optimistic in-place post editing.
//!
//! A post is either being viewed (content and edit control visible) or
//! edited (textarea and save control visible). Saving shows the new content
//! right away and persists it in the background.

use crate::error::EditError;
use crate::policy::{FailurePolicy, SyncPolicy};
use crate::render::EditorRenderer;
use crate::store::PostStore;
use crate::synchronizer::{PendingSync, SyncOutcome};
use crate::types::{TargetId, Viewer};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Maximum post length in characters.
pub const MAX_POST_LENGTH: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Viewing,
    Editing,
}

/// Server-rendered post as seen by one viewer.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post_id: TargetId,
    pub content: String,
    pub creator_id: String,
    pub viewer: Viewer,
}

impl PostView {
    /// Only the creator may edit.
    pub fn is_editable(&self) -> bool {
        self.viewer.user_id() == Some(self.creator_id.as_str())
    }
}

struct EditorState {
    mode: EditMode,
    content: String,
    generation: u64,
}

/// Edit/save component for one rendered post.
pub struct PostEditor {
    post_id: TargetId,
    editable: bool,
    state: Arc<Mutex<EditorState>>,
    renderer: Arc<dyn EditorRenderer>,
    store: Arc<dyn PostStore>,
    policy: SyncPolicy,
    runtime: tokio::runtime::Handle,
}

impl PostEditor {
    pub fn new(
        view: PostView,
        renderer: Arc<dyn EditorRenderer>,
        store: Arc<dyn PostStore>,
        policy: SyncPolicy,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let editable = view.is_editable();

        renderer.show_content(&view.post_id, &view.content);
        if !editable {
            renderer.hide_edit_controls(&view.post_id);
        }

        Self {
            post_id: view.post_id,
            editable,
            state: Arc::new(Mutex::new(EditorState {
                mode: EditMode::Viewing,
                content: view.content,
                generation: 0,
            })),
            renderer,
            store,
            policy,
            runtime,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.state.lock().mode
    }

    pub fn content(&self) -> String {
        self.state.lock().content.clone()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Switch to the textarea, pre-filled with the current content.
    pub fn begin_edit(&self) -> Result<(), EditError> {
        if !self.editable {
            return Err(EditError::NotEditable);
        }

        let mut state = self.state.lock();
        if state.mode == EditMode::Editing {
            return Err(EditError::AlreadyEditing);
        }
        state.mode = EditMode::Editing;
        self.renderer.show_editor(&self.post_id, &state.content);

        debug!(post_id = %self.post_id, "Post edit started");
        Ok(())
    }

    /// Leave the textarea without saving.
    pub fn cancel(&self) -> Result<(), EditError> {
        let mut state = self.state.lock();
        if state.mode != EditMode::Editing {
            return Err(EditError::NotEditing);
        }
        state.mode = EditMode::Viewing;
        self.renderer.show_content(&self.post_id, &state.content);
        Ok(())
    }

    /// Show `new_content` immediately and persist it in the background.
    ///
    /// Content is trimmed and must be non-empty and at most
    /// [`MAX_POST_LENGTH`] characters. On a validation error the editor stays
    /// open.
    pub fn save(&self, new_content: &str) -> Result<PendingSync, EditError> {
        let content = new_content.trim().to_string();
        let len = content.chars().count();
        if content.is_empty() {
            return Err(EditError::EmptyContent);
        }
        if len > MAX_POST_LENGTH {
            return Err(EditError::ContentTooLong {
                len,
                max: MAX_POST_LENGTH,
            });
        }

        let mut state = self.state.lock();
        if state.mode != EditMode::Editing {
            return Err(EditError::NotEditing);
        }

        let previous = std::mem::replace(&mut state.content, content.clone());
        state.mode = EditMode::Viewing;
        state.generation += 1;
        let generation = state.generation;
        self.renderer.show_content(&self.post_id, &state.content);
        drop(state);

        info!(post_id = %self.post_id, len, "Applied optimistic post edit");
        Ok(self.spawn_persist(content, previous, generation))
    }

    fn spawn_persist(&self, content: String, previous: String, generation: u64) -> PendingSync {
        let sync_id = Uuid::new_v4();
        let post_id = self.post_id.clone();
        let state = self.state.clone();
        let renderer = self.renderer.clone();
        let store = self.store.clone();
        let policy = self.policy.clone();

        let handle = self.runtime.spawn(async move {
            let (result, attempts) = policy
                .run(|| store.update_post(&post_id, &content))
                .await;

            match result {
                Ok(()) => {
                    debug!(%sync_id, post_id = %post_id, attempts, "Post edit persisted");
                    SyncOutcome::Persisted { attempts }
                }
                Err(error) => {
                    let rolled_back = policy.on_failure == FailurePolicy::Rollback
                        && restore(&state, renderer.as_ref(), &post_id, previous, generation);
                    warn!(
                        %sync_id,
                        post_id = %post_id,
                        attempts,
                        rolled_back,
                        error = %error,
                        "Post edit persist failed"
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

impl std::fmt::Debug for PostEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostEditor")
            .field("post_id", &self.post_id)
            .field("editable", &self.editable)
            .finish_non_exhaustive()
    }
}

fn restore(
    state: &Mutex<EditorState>,
    renderer: &dyn EditorRenderer,
    post_id: &TargetId,
    previous: String,
    generation: u64,
) -> bool {
    let mut state = state.lock();
    // A newer save or an open editor wins over a stale failure.
    if state.generation != generation || state.mode == EditMode::Editing {
        return false;
    }
    state.content = previous;
    state.generation += 1;
    renderer.show_content(post_id, &state.content);
    true
}
