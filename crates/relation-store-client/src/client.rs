//! reqwest client for the store of record.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use optimistic_toggle_core::{
    PersistResult, PostStore, RelationKind, RelationStore, TargetId, ToggleAction,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Header carrying the cross-site-request-forgery token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-kind base paths under the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub likes_path: String,
    pub follows_path: String,
    pub edit_post_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            likes_path: "/likes".to_string(),
            follows_path: "/follows".to_string(),
            edit_post_path: "/edit_post".to_string(),
        }
    }
}

impl Endpoints {
    fn base_path(&self, kind: RelationKind) -> &str {
        match kind {
            RelationKind::Like => &self.likes_path,
            RelationKind::Follow => &self.follows_path,
        }
    }
}

/// JSON body of `PUT /edit_post`.
#[derive(Debug, Serialize)]
struct EditPostBody<'a> {
    post_id: &'a str,
    content: &'a str,
}

/// Same-origin HTTP client implementing [`RelationStore`] and [`PostStore`].
#[derive(Clone)]
pub struct RelationStoreClient {
    http_client: reqwest::Client,
    origin: Url,
    endpoints: Endpoints,
    csrf_token: Option<String>,
    session_cookie: Option<String>,
}

impl RelationStoreClient {
    /// Create a client for `origin` (e.g. `https://network.example`).
    pub fn new(origin: &str, csrf_token: Option<String>) -> ClientResult<Self> {
        Self::with_timeout(origin, csrf_token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        origin: &str,
        csrf_token: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let origin = Url::parse(origin)?;
        if !matches!(origin.scheme(), "http" | "https") || origin.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "origin must be an http(s) URL, got {}",
                origin
            )));
        }

        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            origin,
            endpoints: Endpoints::default(),
            csrf_token,
            session_cookie: None,
        })
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Attach the authenticated session cookie (`sessionid=...`).
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `{origin}{base}/{action}/{target_id}`, with the id percent-encoded.
    pub fn relation_url(
        &self,
        kind: RelationKind,
        target_id: &TargetId,
        action: ToggleAction,
    ) -> ClientResult<Url> {
        self.url_with_segments(
            self.endpoints.base_path(kind),
            &[action.as_str(), target_id.as_str()],
        )
    }

    pub fn edit_post_url(&self) -> ClientResult<Url> {
        self.url_with_segments(&self.endpoints.edit_post_path, &[])
    }

    /// PUT an assert/retract for the current session.
    pub async fn put_relation(
        &self,
        kind: RelationKind,
        target_id: &TargetId,
        action: ToggleAction,
    ) -> ClientResult<()> {
        let url = self.relation_url(kind, target_id, action)?;

        debug!(%url, kind = %kind, action = %action, "Sending relation update");

        let response = self.request(url).send().await?;
        self.check_response(response).await
    }

    /// PUT edited post content for the current session.
    pub async fn put_post_content(&self, post_id: &TargetId, content: &str) -> ClientResult<()> {
        let url = self.edit_post_url()?;

        debug!(%url, post_id = %post_id, "Sending post edit");

        let response = self
            .request(url)
            .json(&EditPostBody {
                post_id: post_id.as_str(),
                content,
            })
            .send()
            .await?;
        self.check_response(response).await
    }

    fn url_with_segments(&self, base_path: &str, tail: &[&str]) -> ClientResult<Url> {
        let mut url = self.origin.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::Config("origin cannot be a base URL".to_string()))?;
            segments.pop_if_empty();
            for segment in base_path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
            for segment in tail {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        let mut builder = self
            .http_client
            .put(url)
            .header(reqwest::header::REFERER, self.origin.as_str());

        if let Some(token) = &self.csrf_token {
            builder = builder.header(CSRF_HEADER, token);
        }
        if let Some(cookie) = self.cookie_header() {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }
        builder
    }

    fn cookie_header(&self) -> Option<String> {
        let csrf = self
            .csrf_token
            .as_ref()
            .map(|token| format!("csrftoken={}", token));
        match (csrf, self.session_cookie.as_deref()) {
            (Some(csrf), Some(session)) => Some(format!("{}; {}", csrf, session)),
            (Some(csrf), None) => Some(csrf),
            (None, Some(session)) => Some(session.to_string()),
            (None, None) => None,
        }
    }

    /// Check HTTP response for errors. The body is only read on failure.
    async fn check_response(&self, response: reqwest::Response) -> ClientResult<()> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Store request failed: {} - {}", status, body);
            return Err(ClientError::Rejected {
                status,
                message: body,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RelationStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationStoreClient")
            .field("origin", &self.origin.as_str())
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RelationStore for RelationStoreClient {
    async fn persist(
        &self,
        kind: RelationKind,
        target_id: &TargetId,
        action: ToggleAction,
    ) -> PersistResult<()> {
        self.put_relation(kind, target_id, action)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl PostStore for RelationStoreClient {
    async fn update_post(&self, post_id: &TargetId, content: &str) -> PersistResult<()> {
        self.put_post_content(post_id, content)
            .await
            .map_err(Into::into)
    }
}
