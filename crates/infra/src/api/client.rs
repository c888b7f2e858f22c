//! Generic authenticated REST client
//!
//! Pairs a [`RequestPipeline`] with the scopes of one backend service and
//! maps every response through [`ResultMapper`]. Resource clients are thin
//! configurations over a shared `ApiClient`.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tailspin_domain::{Config, HttpConfig, SurveyApiConfig};
use tracing::{debug, instrument, warn};

use super::auth::{ScopeSet, TokenProvider};
use super::context::RequestContext;
use super::errors::ApiError;
use super::pipeline::RequestPipeline;
use super::request::{RequestAuth, RequestSpec};
use super::result::{ApiResult, ResultMapper, DESERIALIZATION_FAILED};
use crate::http::HttpClient;

/// Authenticated client for one backend API
pub struct ApiClient {
    pipeline: RequestPipeline,
    service_name: String,
    scopes: ScopeSet,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if `scopes` is empty
    pub fn new(
        pipeline: RequestPipeline,
        service_name: impl Into<String>,
        scopes: ScopeSet,
    ) -> Result<Self, ApiError> {
        if scopes.is_empty() {
            return Err(ApiError::Config("At least one scope is required".to_string()));
        }

        Ok(Self { pipeline, service_name: service_name.into(), scopes })
    }

    /// Build transport, pipeline and client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built, the
    /// base URL is invalid, or no scopes are configured
    pub fn from_config(
        api: &SurveyApiConfig,
        http: &HttpConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .build()?;

        let pipeline = RequestPipeline::new(http_client, api.base_url.clone(), tokens)?;

        Self::new(pipeline, api.name.clone(), ScopeSet::parse(&api.scopes))
    }

    /// Validate a loaded [`Config`] and build the client from it
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if validation fails or the client cannot
    /// be built
    pub fn from_app_config(
        config: &Config,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, ApiError> {
        config.validate()?;
        Self::from_config(&config.survey_api, &config.http, tokens)
    }

    /// Create a builder for fluent configuration
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Logical name of the backend, used in logs
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Scopes requested for delegated calls
    #[must_use]
    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    /// Authorization for calls made on behalf of the signed-in user
    #[must_use]
    pub fn delegated(&self) -> RequestAuth {
        RequestAuth::Delegated(self.scopes.clone())
    }

    /// Execute a spec and deserialize a 2xx body as `T`
    ///
    /// # Errors
    ///
    /// Only token, transport, cancellation and serialization failures are
    /// errors. HTTP failure statuses come back as unsuccessful results.
    #[instrument(
        skip(self, ctx, spec),
        fields(service = %self.service_name, method = %spec.method, path = %spec.relative_path)
    )]
    pub async fn send<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        spec: RequestSpec,
    ) -> Result<ApiResult<T>, ApiError> {
        let raw = self.pipeline.execute(ctx, spec).await?;
        let result = ResultMapper::map::<T>(&raw);

        match result.error() {
            None => debug!(status = result.status_code(), "Request succeeded"),
            Some(error) if error.reason_phrase == DESERIALIZATION_FAILED => warn!(
                status = result.status_code(),
                body_len = error.raw_body.len(),
                "Response body did not match expected type"
            ),
            Some(error) => {
                debug!(status = error.status_code, reason = %error.reason_phrase, "Request failed")
            }
        }

        Ok(result)
    }

    /// Execute a spec whose response carries no payload
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    #[instrument(
        skip(self, ctx, spec),
        fields(service = %self.service_name, method = %spec.method, path = %spec.relative_path)
    )]
    pub async fn send_untyped(
        &self,
        ctx: &RequestContext,
        spec: RequestSpec,
    ) -> Result<ApiResult, ApiError> {
        let raw = self.pipeline.execute(ctx, spec).await?;
        let result = ResultMapper::map_untyped(&raw);
        debug!(status = result.status_code(), succeeded = result.succeeded(), "Request completed");
        Ok(result)
    }

    /// GET on behalf of the signed-in user
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> Result<ApiResult<T>, ApiError> {
        self.send(ctx, RequestSpec::get(path, self.delegated())).await
    }

    /// GET without acquiring a user token or sending an Authorization header
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn get_anonymous<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> Result<ApiResult<T>, ApiError> {
        self.send(ctx, RequestSpec::get(path, RequestAuth::Anonymous)).await
    }

    /// POST a JSON body and deserialize the response
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<ApiResult<T>, ApiError> {
        let spec = RequestSpec::post(path, self.delegated()).with_json(body)?;
        self.send(ctx, spec).await
    }

    /// POST a JSON body, ignoring any response payload
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn post_untyped<B: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<ApiResult, ApiError> {
        let spec = RequestSpec::post(path, self.delegated()).with_json(body)?;
        self.send_untyped(ctx, spec).await
    }

    /// PUT a JSON body and deserialize the response
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<ApiResult<T>, ApiError> {
        let spec = RequestSpec::put(path, self.delegated()).with_json(body)?;
        self.send(ctx, spec).await
    }

    /// PUT with no request body, e.g. state transitions like publish
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn put_no_body<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> Result<ApiResult<T>, ApiError> {
        self.send(ctx, RequestSpec::put(path, self.delegated())).await
    }

    /// DELETE on behalf of the signed-in user
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn delete(&self, ctx: &RequestContext, path: &str) -> Result<ApiResult, ApiError> {
        self.send_untyped(ctx, RequestSpec::delete(path, self.delegated())).await
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    api: Option<SurveyApiConfig>,
    http: Option<HttpConfig>,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl ApiClientBuilder {
    /// Set the backend API configuration
    #[must_use]
    pub fn api_config(mut self, api: SurveyApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Set the HTTP transport configuration
    #[must_use]
    pub fn http_config(mut self, http: HttpConfig) -> Self {
        self.http = Some(http);
        self
    }

    /// Set the token provider
    #[must_use]
    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let api = self.api.ok_or_else(|| ApiError::Config("API config not set".to_string()))?;
        let tokens =
            self.tokens.ok_or_else(|| ApiError::Config("Token provider not set".to_string()))?;
        let http = self.http.unwrap_or_default();

        ApiClient::from_config(&api, &http, tokens)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::auth::StaticTokenProvider;
    use crate::api::context::Principal;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
    }

    fn api_config(base_url: &str) -> SurveyApiConfig {
        SurveyApiConfig {
            base_url: base_url.to_string(),
            name: "SurveyApi".to_string(),
            scopes: "surveys.read;surveys.write".to_string(),
        }
    }

    fn client(base_url: &str) -> ApiClient {
        ApiClient::builder()
            .api_config(api_config(base_url))
            .token_provider(Arc::new(StaticTokenProvider::new("test-token")))
            .build()
            .unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Principal::new("user-1"))
    }

    #[test]
    fn test_builder_missing_token_provider() {
        let result = ApiClient::builder().api_config(api_config("http://localhost:1")).build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_empty_scopes() {
        let mut config = api_config("http://localhost:1");
        config.scopes = ";".to_string();
        let result = ApiClient::builder()
            .api_config(config)
            .token_provider(Arc::new(StaticTokenProvider::new("t")))
            .build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_scopes_parsed_from_config() {
        let client = client("http://localhost:1");
        assert_eq!(client.scopes().len(), 2);
        assert_eq!(client.service_name(), "SurveyApi");
    }

    #[tokio::test]
    async fn test_get_with_json_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"success"}"#))
            .mount(&mock_server)
            .await;

        let result: ApiResult<TestResponse> =
            client(&mock_server.uri()).get(&ctx(), "/test").await.unwrap();

        assert!(result.succeeded());
        assert_eq!(result.into_payload().unwrap().message, "success");
    }

    #[tokio::test]
    async fn test_get_with_404_is_unsuccessful_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&mock_server)
            .await;

        let result: ApiResult<TestResponse> =
            client(&mock_server.uri()).get(&ctx(), "/missing").await.unwrap();

        assert!(!result.succeeded());
        assert_eq!(result.status_code(), 404);
        assert_eq!(result.error().unwrap().raw_body, "Not found");
    }

    #[tokio::test]
    async fn test_put_no_body_sends_empty_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/things/1/activate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"on"}"#))
            .mount(&mock_server)
            .await;

        let result: ApiResult<TestResponse> =
            client(&mock_server.uri()).put_no_body(&ctx(), "/things/1/activate").await.unwrap();

        assert!(result.succeeded());
        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
        assert!(requests[0].headers.get("content-type").is_none());
    }

    #[tokio::test]
    async fn test_delete_with_204_succeeds() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/things/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server.uri()).delete(&ctx(), "/things/1").await.unwrap();
        assert!(result.succeeded());
        assert_eq!(result.status_code(), 204);
    }
}
