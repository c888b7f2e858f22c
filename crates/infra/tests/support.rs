//! Shared fixtures for the integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tailspin_domain::{HttpConfig, SurveyApiConfig};
use tailspin_infra::api::{
    AccessToken, ApiClient, ApiError, Principal, QuestionClient, RequestContext, ScopeSet,
    SurveyClient, TokenProvider,
};

pub const SCOPES: &str = "api://surveys/.default;surveys.write";

/// Token provider that hands out `token-for-<user>` and records every call
#[derive(Default)]
pub struct RecordingTokenProvider {
    calls: Mutex<Vec<(String, ScopeSet)>>,
    delay: Option<Duration>,
}

impl RecordingTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before issuing each token
    pub fn with_delay(delay: Duration) -> Self {
        Self { calls: Mutex::new(Vec::new()), delay: Some(delay) }
    }

    pub fn calls(&self) -> Vec<(String, ScopeSet)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl TokenProvider for RecordingTokenProvider {
    async fn acquire_token(
        &self,
        scopes: &ScopeSet,
        principal: &Principal,
    ) -> Result<AccessToken, ApiError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((principal.user_id.clone(), scopes.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(AccessToken::expiring_in(
            format!("token-for-{}", principal.user_id),
            scopes.clone(),
            Duration::from_secs(3600),
        ))
    }
}

/// Token provider that always fails, as when the user has no session
pub struct FailingTokenProvider;

#[async_trait]
impl TokenProvider for FailingTokenProvider {
    async fn acquire_token(
        &self,
        _scopes: &ScopeSet,
        _principal: &Principal,
    ) -> Result<AccessToken, ApiError> {
        Err(ApiError::TokenAcquisition("interaction required".to_string()))
    }
}

pub fn api_config(base_url: &str) -> SurveyApiConfig {
    SurveyApiConfig {
        base_url: base_url.to_string(),
        name: "SurveyApi".to_string(),
        scopes: SCOPES.to_string(),
    }
}

pub fn api_client(base_url: &str, tokens: Arc<dyn TokenProvider>) -> Arc<ApiClient> {
    let http = HttpConfig { timeout_secs: 5, ..HttpConfig::default() };
    Arc::new(
        ApiClient::from_config(&api_config(base_url), &http, tokens)
            .expect("api client should build"),
    )
}

pub fn survey_client(base_url: &str, tokens: Arc<dyn TokenProvider>) -> SurveyClient {
    SurveyClient::new(api_client(base_url, tokens))
}

pub fn question_client(base_url: &str, tokens: Arc<dyn TokenProvider>) -> QuestionClient {
    QuestionClient::new(api_client(base_url, tokens))
}

pub fn ctx(user_id: &str) -> RequestContext {
    RequestContext::new(Principal::new(user_id).with_tenant("tenant-1"))
}
