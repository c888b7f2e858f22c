//! Client for the Surveys API survey endpoints
//!
//! Every operation except [`SurveyClient::get_published_surveys`] runs with
//! the signed-in user's delegated token. Published surveys are public data
//! and are fetched anonymously.

use std::sync::Arc;

use tailspin_domain::{ContributorRequest, Contributors, Survey, TenantSurveys, UserSurveys};

use super::client::ApiClient;
use super::context::RequestContext;
use super::errors::ApiError;
use super::request::RequestSpec;
use super::result::ApiResult;

/// Survey, publication and contributor operations
///
/// # Errors
///
/// Every method fails only when no response was obtained (token, transport,
/// cancellation or serialization); see [`ApiClient::send`]. A 4xx/5xx reply
/// is an unsuccessful [`ApiResult`].
#[derive(Clone)]
pub struct SurveyClient {
    api: Arc<ApiClient>,
}

impl SurveyClient {
    /// Client sharing `api` with other resource clients
    #[must_use]
    pub const fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetch one survey with its questions
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn get_survey(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResult<Survey>, ApiError> {
        self.api.get(ctx, &format!("/surveys/{id}")).await
    }

    /// Surveys a user publishes, owns or contributes to
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn get_surveys_for_user(
        &self,
        ctx: &RequestContext,
        user_id: i32,
    ) -> Result<ApiResult<UserSurveys>, ApiError> {
        self.api.get(ctx, &format!("/users/{user_id}/surveys")).await
    }

    /// A tenant's published and unpublished surveys
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn get_surveys_for_tenant(
        &self,
        ctx: &RequestContext,
        tenant_id: i32,
    ) -> Result<ApiResult<TenantSurveys>, ApiError> {
        self.api.get(ctx, &format!("/tenants/{tenant_id}/surveys")).await
    }

    /// Published surveys, fetched without a user token
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn get_published_surveys(
        &self,
        ctx: &RequestContext,
    ) -> Result<ApiResult<Vec<Survey>>, ApiError> {
        self.api.get_anonymous(ctx, "/surveys/published").await
    }

    /// Create a survey; the result carries the server-assigned id
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn create_survey(
        &self,
        ctx: &RequestContext,
        survey: &Survey,
    ) -> Result<ApiResult<Survey>, ApiError> {
        self.api.post(ctx, "/surveys", survey).await
    }

    /// Replace survey `id`
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn update_survey(
        &self,
        ctx: &RequestContext,
        id: i32,
        survey: &Survey,
    ) -> Result<ApiResult<Survey>, ApiError> {
        self.api.put(ctx, &format!("/surveys/{id}"), survey).await
    }

    /// Delete survey `id`
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn delete_survey(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResult, ApiError> {
        self.api.delete(ctx, &format!("/surveys/{id}")).await
    }

    /// Make survey `id` visible to respondents
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn publish_survey(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResult<Survey>, ApiError> {
        self.api.put_no_body(ctx, &format!("/surveys/{id}/publish")).await
    }

    /// Withdraw survey `id` from respondents
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn unpublish_survey(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResult<Survey>, ApiError> {
        self.api.put_no_body(ctx, &format!("/surveys/{id}/unpublish")).await
    }

    /// Contributors and pending invitations for survey `id`
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn get_survey_contributors(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResult<Contributors>, ApiError> {
        self.api.get(ctx, &format!("/surveys/{id}/contributors")).await
    }

    /// Ask the backend to match pending invitations against the signed-in user
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn process_pending_contributor_requests(
        &self,
        ctx: &RequestContext,
    ) -> Result<ApiResult, ApiError> {
        let spec =
            RequestSpec::post("/surveys/processpendingcontributorrequests", self.api.delegated());
        self.api.send_untyped(ctx, spec).await
    }

    /// Invite `request.email_address` to contribute
    ///
    /// # Errors
    /// See [`SurveyClient`].
    pub async fn add_contributor_request(
        &self,
        ctx: &RequestContext,
        request: &ContributorRequest,
    ) -> Result<ApiResult, ApiError> {
        let path = format!("/surveys/{}/contributorrequests", request.survey_id);
        self.api.post_untyped(ctx, &path, request).await
    }
}
