//! Post editing command.

use super::{cli_viewer, store_client, CLI_USER};
use crate::output::{self, OutputFormat};
use crate::terminal::TerminalRenderer;
use anyhow::{bail, Result};
use optimistic_toggle_core::{PostEditor, PostStore, PostView, SyncOutcome, TargetId};
use relsync_config_and_utils::Config;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct EditReport {
    pub post_id: TargetId,
    pub content: String,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rolled_back: bool,
}

impl fmt::Display for EditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", output::row("Post", &self.post_id))?;
        write!(f, "{}", output::row("Content", &self.content))?;
        match &self.error {
            None => write!(f, "\n{}", output::row("Sync", "persisted")),
            Some(error) => write!(f, "\n{}", output::row("Error", error)),
        }
    }
}

/// Replace a post's content, showing the edit locally first.
pub async fn post_edit(
    config: &Config,
    post_id: &str,
    original: &str,
    content: &str,
    format: OutputFormat,
) -> Result<()> {
    let store = store_client(config)?;
    let report = edit_and_wait(config, post_id, original, content, store, format).await?;

    output::print(&report, &format);

    if !report.persisted {
        bail!(
            "store did not save the post: {}",
            report.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

async fn edit_and_wait(
    config: &Config,
    post_id: &str,
    original: &str,
    content: &str,
    store: Arc<dyn PostStore>,
    format: OutputFormat,
) -> Result<EditReport> {
    let editor = PostEditor::new(
        PostView {
            post_id: TargetId::new(post_id),
            content: original.to_string(),
            creator_id: CLI_USER.to_string(),
            viewer: cli_viewer(),
        },
        Arc::new(TerminalRenderer::for_post(format == OutputFormat::Text)),
        store,
        config.sync_policy(),
        tokio::runtime::Handle::current(),
    );

    editor.begin_edit()?;
    let outcome = editor.save(content)?.wait().await;

    let (error, rolled_back) = match outcome {
        SyncOutcome::Persisted { .. } => (None, false),
        SyncOutcome::Failed {
            error, rolled_back, ..
        } => (Some(error.to_string()), rolled_back),
    };

    Ok(EditReport {
        post_id: TargetId::new(post_id),
        content: editor.content(),
        persisted: error.is_none(),
        error,
        rolled_back,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use optimistic_toggle_core::{EditError, PersistError, PersistResult};
    use parking_lot::Mutex;

    /// Records edits, optionally failing every one.
    #[derive(Default)]
    struct RecordingPostStore {
        fail: bool,
        edits: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PostStore for RecordingPostStore {
        async fn update_post(&self, post_id: &TargetId, content: &str) -> PersistResult<()> {
            self.edits
                .lock()
                .push((post_id.to_string(), content.to_string()));
            if self.fail {
                Err(PersistError::Network("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn edit_saves_trimmed_content() {
        let store = Arc::new(RecordingPostStore::default());
        let report = edit_and_wait(
            &Config::default(),
            "9",
            "old text",
            "  new text  ",
            store.clone(),
            OutputFormat::Json,
        )
        .await
        .unwrap();

        assert!(report.persisted);
        assert_eq!(report.content, "new text");
        assert_eq!(
            *store.edits.lock(),
            vec![("9".to_string(), "new text".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_edit_restores_original_with_rollback() {
        let store = Arc::new(RecordingPostStore {
            fail: true,
            ..Default::default()
        });
        let config = Config {
            rollback_on_failure: true,
            ..Default::default()
        };

        let report = edit_and_wait(&config, "9", "old text", "new text", store, OutputFormat::Json)
            .await
            .unwrap();

        assert!(!report.persisted);
        assert!(report.rolled_back);
        assert_eq!(report.content, "old text");
    }

    #[tokio::test]
    async fn empty_content_is_rejected_before_any_request() {
        let store = Arc::new(RecordingPostStore::default());
        let err = edit_and_wait(
            &Config::default(),
            "9",
            "old",
            "   ",
            store.clone(),
            OutputFormat::Json,
        )
        .await
        .unwrap_err();

        assert_eq!(err.downcast_ref::<EditError>(), Some(&EditError::EmptyContent));
        assert!(store.edits.lock().is_empty());
    }
}
