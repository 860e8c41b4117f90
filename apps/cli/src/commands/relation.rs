//! Like/follow toggle commands.

use super::{cli_viewer, store_client};
use crate::output::{self, OutputFormat};
use crate::terminal::TerminalRenderer;
use anyhow::{bail, Result};
use optimistic_toggle_core::{
    Affordance, PendingSync, RelationKind, RelationSnapshot, RelationStore, RelationView,
    SyncOutcome, ToggleError, ToggleSynchronizer,
};
use relsync_config_and_utils::Config;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Final local state of a relation plus how its request ended.
#[derive(Debug, Serialize)]
pub struct RelationReport {
    #[serde(flatten)]
    pub snapshot: RelationSnapshot,
    pub affordance: Affordance,
    pub sync_id: String,
    pub persisted: bool,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rolled_back: bool,
}

impl RelationReport {
    fn new(sync: &ToggleSynchronizer, sync_id: String, outcome: &SyncOutcome) -> Self {
        let (persisted, attempts, error, rolled_back) = match outcome {
            SyncOutcome::Persisted { attempts } => (true, *attempts, None, false),
            SyncOutcome::Failed {
                attempts,
                error,
                rolled_back,
            } => (false, *attempts, Some(error.to_string()), *rolled_back),
        };
        Self {
            snapshot: sync.snapshot(),
            affordance: sync.affordance(),
            sync_id,
            persisted,
            attempts,
            error,
            rolled_back,
        }
    }
}

impl fmt::Display for RelationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", output::row("Target", &self.snapshot.target_id))?;
        writeln!(f, "{}", output::row("Kind", self.snapshot.kind))?;
        writeln!(f, "{}", output::row("State", self.snapshot.state))?;
        writeln!(f, "{}", output::row("Count", self.snapshot.count))?;
        let status = if self.persisted {
            format!("persisted after {} attempt(s)", self.attempts)
        } else if self.rolled_back {
            "failed, rolled back".to_string()
        } else {
            "failed, kept locally".to_string()
        };
        write!(f, "{}", output::row("Sync", status))?;
        if let Some(error) = &self.error {
            write!(f, "\n{}", output::row("Error", error))?;
        }
        Ok(())
    }
}

/// Like a post or follow a profile.
pub async fn relation_assert(
    config: &Config,
    target: &str,
    kind: RelationKind,
    count: u64,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = RelationSnapshot::new(target, kind, false, count);
    run_transition(config, snapshot, format, ToggleSynchronizer::assert).await
}

/// Unlike a post or unfollow a profile.
pub async fn relation_retract(
    config: &Config,
    target: &str,
    kind: RelationKind,
    count: u64,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = RelationSnapshot::new(target, kind, true, count);
    run_transition(config, snapshot, format, ToggleSynchronizer::retract).await
}

/// Apply whichever transition the displayed state allows.
pub async fn relation_toggle(
    config: &Config,
    target: &str,
    kind: RelationKind,
    asserted: bool,
    count: u64,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = RelationSnapshot::new(target, kind, asserted, count);
    run_transition(config, snapshot, format, ToggleSynchronizer::toggle).await
}

async fn run_transition(
    config: &Config,
    snapshot: RelationSnapshot,
    format: OutputFormat,
    transition: fn(&ToggleSynchronizer) -> Result<PendingSync, ToggleError>,
) -> Result<()> {
    let store = store_client(config)?;
    let report = apply_and_wait(config, snapshot, store, format, transition).await?;

    output::print(&report, &format);

    if !report.persisted {
        bail!(
            "store did not persist the change: {}",
            report.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

/// Render the view, apply the transition, and wait for its request.
async fn apply_and_wait(
    config: &Config,
    snapshot: RelationSnapshot,
    store: Arc<dyn RelationStore>,
    format: OutputFormat,
    transition: fn(&ToggleSynchronizer) -> Result<PendingSync, ToggleError>,
) -> Result<RelationReport> {
    let renderer = Arc::new(TerminalRenderer::for_relation(
        snapshot.kind,
        format == OutputFormat::Text,
    ));
    let sync = ToggleSynchronizer::new(
        RelationView::new(snapshot, cli_viewer()),
        renderer,
        store,
        config.sync_policy(),
        tokio::runtime::Handle::current(),
    );

    let pending = transition(&sync)?;
    let sync_id = pending.sync_id().to_string();
    let outcome = pending.wait().await;

    info!(
        sync_id = %sync_id,
        persisted = outcome.is_persisted(),
        "Relation command finished"
    );

    Ok(RelationReport::new(&sync, sync_id, &outcome))
}
