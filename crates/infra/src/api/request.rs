//! Outbound request and raw response values
//!
//! A [`RequestSpec`] is built by a resource client, consumed immediately by
//! the pipeline, and never retained. [`RawResponse`] is what the pipeline
//! hands to the result mapper.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;

use super::auth::ScopeSet;
use super::errors::ApiError;

/// How a request is authorized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAuth {
    /// Acquire a token for the current principal with these scopes
    Delegated(ScopeSet),
    /// No token acquisition and no Authorization header
    Anonymous,
}

/// One outbound call, described as plain data
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP verb
    pub method: Method,
    /// Path appended to the client's base address
    pub relative_path: String,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
    /// Delegated or anonymous
    pub auth: RequestAuth,
}

impl RequestSpec {
    /// Spec without a body
    #[must_use]
    pub fn new(method: Method, relative_path: impl Into<String>, auth: RequestAuth) -> Self {
        Self { method, relative_path: relative_path.into(), body: None, auth }
    }

    /// GET spec
    #[must_use]
    pub fn get(relative_path: impl Into<String>, auth: RequestAuth) -> Self {
        Self::new(Method::GET, relative_path, auth)
    }

    /// POST spec; attach a body with [`RequestSpec::with_json`]
    #[must_use]
    pub fn post(relative_path: impl Into<String>, auth: RequestAuth) -> Self {
        Self::new(Method::POST, relative_path, auth)
    }

    /// PUT spec
    #[must_use]
    pub fn put(relative_path: impl Into<String>, auth: RequestAuth) -> Self {
        Self::new(Method::PUT, relative_path, auth)
    }

    /// DELETE spec
    #[must_use]
    pub fn delete(relative_path: impl Into<String>, auth: RequestAuth) -> Self {
        Self::new(Method::DELETE, relative_path, auth)
    }

    /// Attach a JSON body serialized from `body`
    ///
    /// # Errors
    /// Returns `ApiError::Serialization` if `body` cannot be represented as
    /// JSON. No I/O has happened at that point.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Scopes to request, or `None` for anonymous calls
    #[must_use]
    pub const fn scopes(&self) -> Option<&ScopeSet> {
        match &self.auth {
            RequestAuth::Delegated(scopes) => Some(scopes),
            RequestAuth::Anonymous => None,
        }
    }
}

/// Unparsed HTTP response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body read to completion as text
    pub body: String,
}

impl RawResponse {
    /// Response with no headers, mostly for mapping tests
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    /// Canonical reason phrase for the status, e.g. "Not Found"
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown Status")
    }
}

/// Join base address and relative path with exactly one `/`
#[must_use]
pub fn join_url(base_url: &str, relative_path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), relative_path.trim_start_matches('/'))
}
