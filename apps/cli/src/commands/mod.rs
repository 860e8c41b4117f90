//! CLI command implementations.

mod config;
mod edit;
mod relation;

pub use config::{config_path, config_show};
pub use edit::post_edit;
pub use relation::{relation_assert, relation_retract, relation_toggle};

use anyhow::{Context, Result};
use optimistic_toggle_core::Viewer;
use relation_store_client::{Endpoints, RelationStoreClient};
use relsync_config_and_utils::Config;
use std::sync::Arc;

/// The CLI always acts as the session owner of its cookie and token.
const CLI_USER: &str = "relsync-cli";

fn cli_viewer() -> Viewer {
    Viewer::authenticated(CLI_USER)
}

/// Build the HTTP store client from the effective configuration.
pub fn store_client(config: &Config) -> Result<Arc<RelationStoreClient>> {
    let origin = config
        .origin_url()
        .with_context(|| format!("invalid origin {:?}", config.origin))?;

    let mut client = RelationStoreClient::with_timeout(
        origin.as_str(),
        config.csrf_token.clone(),
        config.request_timeout(),
    )?
    .with_endpoints(Endpoints {
        likes_path: config.likes_path.clone(),
        follows_path: config.follows_path.clone(),
        edit_post_path: config.edit_post_path.clone(),
    });

    if let Some(cookie) = &config.session_cookie {
        client = client.with_session_cookie(cookie.clone());
    }

    if config.csrf_token.is_none() {
        tracing::warn!("No CSRF token configured; the store will likely reject writes");
    }

    Ok(Arc::new(client))
}
