//! Authenticated client for the Tailspin Surveys API
//!
//! Issues calls to the backend on behalf of the signed-in user and turns
//! raw HTTP responses into typed [`ApiResult`]s.
//!
//! # Architecture
//!
//! - [`TokenProvider`] acquires a delegated token per call
//! - [`RequestPipeline`] serializes, authorizes, sends, captures
//! - [`ResultMapper`] turns the raw response into an [`ApiResult`]
//! - [`ApiClient`] is the generic REST client; [`SurveyClient`] and
//!   [`QuestionClient`] map domain operations onto it
//!
//! Only token, transport and cancellation failures surface as
//! [`ApiError`]. HTTP failure statuses are ordinary results.

pub mod auth;
pub mod client;
pub mod context;
pub mod errors;
pub mod pipeline;
pub mod questions;
pub mod request;
pub mod result;
pub mod surveys;
pub mod token_cache;

pub use auth::{AccessToken, ScopeSet, StaticTokenProvider, TokenIssuer, TokenProvider};
pub use client::{ApiClient, ApiClientBuilder};
pub use context::{Principal, RequestContext};
pub use errors::{ApiError, ApiErrorCategory, TransportFailure};
pub use pipeline::RequestPipeline;
pub use questions::QuestionClient;
pub use request::{RawResponse, RequestAuth, RequestSpec};
pub use result::{ApiResult, ErrorInfo, ResultMapper, DESERIALIZATION_FAILED};
pub use surveys::SurveyClient;
pub use token_cache::CachingTokenProvider;
