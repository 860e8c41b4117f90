//! Recording renderers and scriptable stores for unit tests.

use crate::error::{PersistError, PersistResult};
use crate::render::{ControlRenderer, EditorRenderer};
use crate::store::{PostStore, RelationStore};
use crate::types::{Affordance, RelationKind, TargetId, ToggleAction};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RenderCall {
    Affordance(Affordance),
    Count(u64),
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    pub(crate) fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn last_affordance(&self) -> Option<Affordance> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::Affordance(affordance) => Some(*affordance),
            RenderCall::Count(_) => None,
        })
    }

    pub(crate) fn last_count(&self) -> Option<u64> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::Count(count) => Some(*count),
            RenderCall::Affordance(_) => None,
        })
    }
}

impl ControlRenderer for RecordingRenderer {
    fn show_assert_control(&self, _target_id: &TargetId) {
        self.calls
            .lock()
            .push(RenderCall::Affordance(Affordance::AssertControl));
    }

    fn show_retract_control(&self, _target_id: &TargetId) {
        self.calls
            .lock()
            .push(RenderCall::Affordance(Affordance::RetractControl));
    }

    fn hide_controls(&self, _target_id: &TargetId) {
        self.calls
            .lock()
            .push(RenderCall::Affordance(Affordance::Hidden));
    }

    fn render_count(&self, _target_id: &TargetId, count: u64) {
        self.calls.lock().push(RenderCall::Count(count));
    }
}

/// Store that records every request and answers from a script.
///
/// Scripted results are consumed front to back; once empty, every call
/// succeeds.
#[derive(Default)]
pub(crate) struct ScriptedStore {
    requests: Mutex<Vec<(RelationKind, TargetId, ToggleAction)>>,
    post_requests: Mutex<Vec<(TargetId, String)>>,
    script: Mutex<VecDeque<PersistResult<()>>>,
    call_count: AtomicUsize,
}

impl ScriptedStore {
    pub(crate) fn failing_times(times: usize) -> Self {
        let store = Self::default();
        for _ in 0..times {
            store
                .script
                .lock()
                .push_back(Err(PersistError::Network("connection refused".into())));
        }
        store
    }

    pub(crate) fn always_failing() -> Self {
        Self::failing_times(64)
    }

    pub(crate) fn count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<(RelationKind, TargetId, ToggleAction)> {
        self.requests.lock().clone()
    }

    pub(crate) fn post_requests(&self) -> Vec<(TargetId, String)> {
        self.post_requests.lock().clone()
    }

    fn next_result(&self) -> PersistResult<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.script.lock().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait]
impl RelationStore for ScriptedStore {
    async fn persist(
        &self,
        kind: RelationKind,
        target_id: &TargetId,
        action: ToggleAction,
    ) -> PersistResult<()> {
        self.requests
            .lock()
            .push((kind, target_id.clone(), action));
        self.next_result()
    }
}

#[async_trait]
impl PostStore for ScriptedStore {
    async fn update_post(&self, post_id: &TargetId, content: &str) -> PersistResult<()> {
        self.post_requests
            .lock()
            .push((post_id.clone(), content.to_string()));
        self.next_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditorCall {
    Content(String),
    Editor(String),
    Hidden,
}

#[derive(Default)]
pub(crate) struct RecordingEditorRenderer {
    calls: Mutex<Vec<EditorCall>>,
}

impl RecordingEditorRenderer {
    pub(crate) fn calls(&self) -> Vec<EditorCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn last(&self) -> Option<EditorCall> {
        self.calls.lock().last().cloned()
    }
}

impl EditorRenderer for RecordingEditorRenderer {
    fn show_content(&self, _post_id: &TargetId, content: &str) {
        self.calls
            .lock()
            .push(EditorCall::Content(content.to_string()));
    }

    fn show_editor(&self, _post_id: &TargetId, draft: &str) {
        self.calls.lock().push(EditorCall::Editor(draft.to_string()));
    }

    fn hide_edit_controls(&self, _post_id: &TargetId) {
        self.calls.lock().push(EditorCall::Hidden);
    }
}
