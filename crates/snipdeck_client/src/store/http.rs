//! reqwest-backed store speaking the `{base}/snippets` REST surface.

use super::SnippetStore;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use snipdeck_core::error::error_message_for_body;
use snipdeck_core::{Config, Draft, Snippet, StoreError, SNIPPETS_COLLECTION};
use std::time::Instant;
use tracing::debug;

/// Append percent-encoded path segments to `base`, keeping any base path.
///
/// # Errors
/// [`StoreError::InvalidBaseUrl`] when `base` does not parse or cannot carry a path.
pub fn api_url(base: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(base)
        .map_err(|err| StoreError::InvalidBaseUrl(format!("'{}': {}", base, err)))?;
    let mut path = url.path_segments_mut().map_err(|_| {
        StoreError::InvalidBaseUrl(format!("'{}' cannot be used as an API base", base))
    })?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transport(format!("request timed out: {}", err))
    } else if err.is_decode() {
        StoreError::InvalidResponse(err.to_string())
    } else {
        StoreError::Transport(err.to_string())
    }
}

/// Which status codes count as a payload rejection for an operation.
#[derive(Clone, Copy)]
enum RejectPolicy {
    ServerOnly,
    PayloadRejections,
}

async fn ensure_success(
    res: reqwest::Response,
    policy: RejectPolicy,
) -> Result<reqwest::Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_body(status.canonical_reason(), &body);
    let rejected = matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
    );
    match policy {
        RejectPolicy::PayloadRejections if rejected => Err(StoreError::Validation(message)),
        _ => Err(StoreError::Server {
            status: status.as_u16(),
            message,
        }),
    }
}

/// Store client for a remote snippet collection.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    collection: Url,
}

impl HttpStore {
    /// Build a client for `config.api_base_url` with the configured timeout.
    ///
    /// # Errors
    /// [`StoreError::InvalidBaseUrl`] for an unusable base URL, or
    /// [`StoreError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Self::with_client(client, &config.api_base_url)
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, StoreError> {
        let collection = api_url(base_url, &[SNIPPETS_COLLECTION])?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            collection,
        })
    }

    /// Base URL this store was built for, as configured.
    ///
    /// # Returns
    /// The API base without the collection segment.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the collection endpoint, `{base}/snippets`.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// URL of a single entry, `{base}/snippets/{id}`.
    ///
    /// # Errors
    /// [`StoreError::Validation`] for an id that cannot name one entry: blank,
    /// `.` or `..` would otherwise resolve to the collection itself.
    fn item_url(&self, id: &str) -> Result<Url, StoreError> {
        if id.trim().is_empty() || id == "." || id == ".." {
            return Err(StoreError::Validation(format!(
                "invalid snippet id '{}'",
                id
            )));
        }
        api_url(&self.base_url, &[SNIPPETS_COLLECTION, id])
    }
}

#[async_trait]
impl SnippetStore for HttpStore {
    async fn list(&self) -> Result<Vec<Snippet>, StoreError> {
        let started = Instant::now();
        let res = self
            .client
            .get(self.collection.clone())
            .send()
            .await
            .map_err(transport_error)?;
        let res = ensure_success(res, RejectPolicy::ServerOnly).await?;
        let items: Vec<Snippet> = res.json().await.map_err(transport_error)?;
        debug!(
            url = %self.collection,
            items = items.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "store list"
        );
        Ok(items)
    }

    async fn create(&self, draft: &Draft) -> Result<Snippet, StoreError> {
        draft.validate()?;
        let started = Instant::now();
        let res = self
            .client
            .post(self.collection.clone())
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        let res = ensure_success(res, RejectPolicy::PayloadRejections).await?;
        let created: Snippet = res.json().await.map_err(transport_error)?;
        debug!(
            id = %created.id,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "store create"
        );
        Ok(created)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.item_url(id)?;
        let started = Instant::now();
        let res = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(transport_error)?;
        // Any 2xx counts; the body (if any) is ignored.
        ensure_success(res, RejectPolicy::ServerOnly).await?;
        debug!(
            id,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "store delete"
        );
        Ok(())
    }
}
