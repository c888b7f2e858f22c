//! Typed call results
//!
//! [`ResultMapper`] turns one [`RawResponse`] into an [`ApiResult`]. Ordinary
//! HTTP failures and unparseable success bodies become `succeeded == false`
//! results, never errors; callers branch on [`ApiResult::succeeded`].

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::request::RawResponse;

/// Reason phrase used when a 2xx body does not match the expected type
pub const DESERIALIZATION_FAILED: &str = "deserialization failed";

/// Diagnostics for an unsuccessful call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed with status {status_code} ({reason_phrase})")]
pub struct ErrorInfo {
    /// HTTP status of the response
    pub status_code: u16,
    /// Response body exactly as received
    pub raw_body: String,
    /// Canonical reason for the status, or [`DESERIALIZATION_FAILED`]
    pub reason_phrase: String,
}

/// Outcome of one API call
///
/// `succeeded` is true exactly when the status is 2xx and, for typed
/// results, the body deserialized. The payload is present only on success
/// and the error only on failure. `ApiResult` without a type argument is the
/// untyped form used by operations with no response payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T = ()> {
    succeeded: bool,
    status_code: u16,
    payload: Option<T>,
    error: Option<ErrorInfo>,
}

impl<T> ApiResult<T> {
    fn success(status_code: u16, payload: T) -> Self {
        Self { succeeded: true, status_code, payload: Some(payload), error: None }
    }

    fn failure(error: ErrorInfo) -> Self {
        Self { succeeded: false, status_code: error.status_code, payload: None, error: Some(error) }
    }

    /// 2xx status and, for typed results, a body of the expected shape
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Deserialized body, present only on success
    #[must_use]
    pub const fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Take the deserialized body
    #[must_use]
    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    /// Diagnostics, present only on failure
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    /// Convert into a `Result` for callers that want to use `?`
    ///
    /// # Errors
    /// Returns the [`ErrorInfo`] of an unsuccessful call.
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match (self.payload, self.error) {
            (Some(payload), None) => Ok(payload),
            (_, Some(error)) => Err(error),
            (None, None) => Err(ErrorInfo {
                status_code: self.status_code,
                raw_body: String::new(),
                reason_phrase: DESERIALIZATION_FAILED.to_string(),
            }),
        }
    }
}

/// Pure mapping from raw responses to results
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMapper;

impl ResultMapper {
    /// Map a response whose 2xx body should deserialize as `T`
    ///
    /// Empty bodies (204/205 or a blank 2xx) are read as JSON `null`, so
    /// `()` and `Option<_>` payloads succeed while struct payloads report
    /// [`DESERIALIZATION_FAILED`].
    #[must_use]
    pub fn map<T: DeserializeOwned>(raw: &RawResponse) -> ApiResult<T> {
        if !raw.status.is_success() {
            return ApiResult::failure(Self::http_failure(raw));
        }

        let parsed = if raw.body.trim().is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_str(&raw.body)
        };

        match parsed {
            Ok(payload) => ApiResult::success(raw.status.as_u16(), payload),
            Err(_) => ApiResult::failure(ErrorInfo {
                status_code: raw.status.as_u16(),
                raw_body: raw.body.clone(),
                reason_phrase: DESERIALIZATION_FAILED.to_string(),
            }),
        }
    }

    /// Map a response by status code alone; the body is not parsed
    #[must_use]
    pub fn map_untyped(raw: &RawResponse) -> ApiResult {
        if raw.status.is_success() {
            ApiResult::success(raw.status.as_u16(), ())
        } else {
            ApiResult::failure(Self::http_failure(raw))
        }
    }

    fn http_failure(raw: &RawResponse) -> ErrorInfo {
        ErrorInfo {
            status_code: raw.status.as_u16(),
            raw_body: raw.body.clone(),
            reason_phrase: raw.reason().to_string(),
        }
    }
}
