//! Network side of the offline cache.

use std::path::PathBuf;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{debug, instrument};
use url::Url;

use super::OfflineError;

/// URL prefix served from the static directory.
pub const STATIC_PREFIX: &str = "/static/";

/// Timeout for remote asset requests.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether a response came from this origin or a foreign one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response.
    Basic,
    /// Cross-origin response.
    Cors,
}

/// A fetched or cached asset response.
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub kind: ResponseKind,
}

impl AssetResponse {
    /// Build a response.
    pub fn new(
        status: u16,
        content_type: Option<String>,
        body: impl Into<Bytes>,
        kind: ResponseKind,
    ) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            kind,
        }
    }

    /// A same-origin 404.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(404, Some("text/plain".to_string()), "Not found", ResponseKind::Basic)
    }

    /// Whether this response may be stored in the cache.
    ///
    /// Only successful same-origin responses are cached.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

impl IntoResponse for AssetResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = self
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        (
            status,
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            ],
            self.body,
        )
            .into_response()
    }
}

/// Fetches assets from the static directory or over HTTP.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    static_files: ServeDir,
    origin: Url,
    client: reqwest::Client,
}

impl AssetFetcher {
    /// Create a fetcher for the given static directory and site origin.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(static_dir: impl Into<PathBuf>, base_url: &str) -> Result<Self, OfflineError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(OfflineError::Http)?;

        Ok(Self {
            static_files: ServeDir::new(static_dir.into()),
            origin: Url::parse(base_url)?,
            client,
        })
    }

    /// Fetch an asset.
    ///
    /// `/static/...` paths are served from the static directory; a missing
    /// file is a 404 response, not an error. Anything else is resolved against the origin
    /// and requested over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the file body cannot be read or the request fails.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<AssetResponse, OfflineError> {
        if let Some(relative) = url.strip_prefix(STATIC_PREFIX) {
            return self.read_static(relative).await;
        }

        let target = self.origin.join(url)?;
        let kind = if target.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        let response = self.client.get(target.clone()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?;

        debug!(%target, status, ?kind, "Fetched asset from network");
        Ok(AssetResponse::new(status, content_type, body, kind))
    }

    async fn read_static(&self, relative: &str) -> Result<AssetResponse, OfflineError> {
        let Ok(request) = Request::builder()
            .uri(format!("/{relative}"))
            .body(Body::empty())
        else {
            return Ok(AssetResponse::not_found());
        };

        let response = self
            .static_files
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX).await?;

        debug!(relative, status, "Read static asset");
        Ok(AssetResponse::new(status, content_type, body, ResponseKind::Basic))
    }
}
