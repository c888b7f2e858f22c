//! API-specific error types
//!
//! Only failures that stop a call from producing a response live here. HTTP
//! status failures (4xx/5xx) and unparseable bodies are not errors; they are
//! carried inside [`ApiResult`](super::result::ApiResult).

use tailspin_domain::SurveysError;
use thiserror::Error;

/// Categories of API errors for caller-side retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Identity, consent or token issuer failures
    Authentication,
    /// Network/connection failures
    Network,
    /// Caller aborted the request
    Cancelled,
    /// Request could not be built (bad configuration or unserializable body)
    Client,
}

/// Which stage of the transport failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Whole-request timeout elapsed
    Timeout,
    /// Could not connect to the backend
    Connect,
    /// Request could not be built or sent
    Request,
    /// Response body could not be read
    Body,
    /// Anything reqwest does not classify
    Other,
}

/// API call errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// No token could be obtained for the principal
    #[error("Token acquisition failed: {0}")]
    TokenAcquisition(String),

    /// The request never produced a response
    #[error("Transport error ({kind:?}): {message}")]
    Transport {
        /// Failing stage
        kind: TransportFailure,
        /// Underlying error text
        message: String,
    },

    /// The request context was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// Request body could not be encoded as JSON
    #[error("Failed to serialize request body: {0}")]
    Serialization(String),

    /// Missing, malformed or out-of-range configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::TokenAcquisition(_) => ApiErrorCategory::Authentication,
            Self::Transport { .. } => ApiErrorCategory::Network,
            Self::Cancelled => ApiErrorCategory::Cancelled,
            Self::Serialization(_) | Self::Config(_) => ApiErrorCategory::Client,
        }
    }

    /// Whether a caller may reasonably retry the same call
    ///
    /// This layer never retries on its own.
    pub fn is_retryable(&self) -> bool {
        self.category() == ApiErrorCategory::Network
    }

    /// Whether the caller aborted the call
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else if err.is_body() || err.is_decode() {
            TransportFailure::Body
        } else if err.is_request() || err.is_builder() {
            TransportFailure::Request
        } else {
            TransportFailure::Other
        };

        Self::Transport { kind, message: format!("HTTP request failed: {err}") }
    }
}

impl From<SurveysError> for ApiError {
    fn from(err: SurveysError) -> Self {
        match err {
            SurveysError::Config(message) | SurveysError::InvalidInput(message) => {
                Self::Config(message)
            }
        }
    }
}
