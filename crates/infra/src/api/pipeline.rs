//! Request pipeline
//!
//! Runs one call through serialize → acquire token → build request → send →
//! capture response. Status codes are not interpreted here; that is the
//! result mapper's job. Both suspension points (token acquisition and HTTP
//! dispatch, including reading the body) race the context's cancellation
//! token, and a cancelled call always ends in [`ApiError::Cancelled`].

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::{AccessToken, ScopeSet, TokenProvider};
use super::context::RequestContext;
use super::errors::ApiError;
use super::request::{join_url, RawResponse, RequestSpec};
use crate::http::HttpClient;

/// Executes [`RequestSpec`]s against one backend base address
///
/// Holds only shared, concurrency-safe state, so one pipeline serves any
/// number of simultaneous calls.
#[derive(Clone)]
pub struct RequestPipeline {
    http: HttpClient,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl RequestPipeline {
    /// Create a pipeline bound to `base_url`
    ///
    /// # Errors
    /// Returns `ApiError::Config` if `base_url` is not an absolute http(s) URL.
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "Unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self { http, base_url, tokens })
    }

    /// Absolute address every relative path is joined onto
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute one request and return the raw response
    ///
    /// # Errors
    /// - `ApiError::Cancelled` if the context is cancelled before the body is read
    /// - `ApiError::TokenAcquisition` if a delegated token cannot be obtained;
    ///   no HTTP call is made in that case
    /// - `ApiError::Transport` for network failures
    /// - `ApiError::Serialization` if the body cannot be encoded
    #[instrument(
        skip(self, ctx, spec),
        fields(
            method = %spec.method,
            path = %spec.relative_path,
            user_id = %ctx.principal().user_id
        )
    )]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        spec: RequestSpec,
    ) -> Result<RawResponse, ApiError> {
        if ctx.is_cancelled() {
            debug!("Request cancelled before dispatch");
            return Err(ApiError::Cancelled);
        }

        let body = spec
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        let token = match spec.scopes() {
            Some(scopes) => Some(self.acquire_token(ctx, scopes).await?),
            None => None,
        };

        let url = join_url(&self.base_url, &spec.relative_path);
        let mut request = self.http.request(spec.method.clone(), &url);
        if let Some(token) = &token {
            request = request.bearer_auth(token.secret());
        }
        if let Some(bytes) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let cancellation = ctx.cancellation();

        let response = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Request cancelled during dispatch");
                return Err(ApiError::Cancelled);
            }
            result = self.http.send(request) => result.inspect_err(|err| {
                warn!(error = %err, "Transport failure");
            })?,
        };

        let status = response.status();
        let headers = response.headers().clone();

        let body = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Request cancelled while reading response body");
                return Err(ApiError::Cancelled);
            }
            text = response.text() => text?,
        };

        debug!(%status, body_len = body.len(), "Response captured");
        Ok(RawResponse { status, headers, body })
    }

    async fn acquire_token(
        &self,
        ctx: &RequestContext,
        scopes: &ScopeSet,
    ) -> Result<AccessToken, ApiError> {
        let result = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => {
                debug!("Request cancelled during token acquisition");
                return Err(ApiError::Cancelled);
            }
            result = self.tokens.acquire_token(scopes, ctx.principal()) => result,
        };

        result.map_err(|err| match err {
            ApiError::TokenAcquisition(_) | ApiError::Cancelled => err,
            other => ApiError::TokenAcquisition(other.to_string()),
        })
        .inspect_err(|err| warn!(error = %err, "Token acquisition failed"))
    }
}
