//! Client for the Surveys API question endpoints

use std::sync::Arc;

use tailspin_domain::Question;

use super::client::ApiClient;
use super::context::RequestContext;
use super::errors::ApiError;
use super::result::ApiResult;

/// CRUD operations for survey questions, all made with the user's token
///
/// # Errors
///
/// Every method fails only when no response was obtained (token, transport,
/// cancellation or serialization); see [`ApiClient::send`]. A 4xx/5xx reply
/// is an unsuccessful [`ApiResult`].
#[derive(Clone)]
pub struct QuestionClient {
    api: Arc<ApiClient>,
}

impl QuestionClient {
    /// Client sharing `api` with other resource clients
    #[must_use]
    pub const fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetch one question
    ///
    /// # Errors
    /// See [`QuestionClient`].
    pub async fn get_question(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResult<Question>, ApiError> {
        self.api.get(ctx, &format!("/questions/{id}")).await
    }

    /// Create a question under `question.survey_id`
    ///
    /// # Errors
    /// See [`QuestionClient`].
    pub async fn create_question(
        &self,
        ctx: &RequestContext,
        question: &Question,
    ) -> Result<ApiResult<Question>, ApiError> {
        self.api.post(ctx, &format!("/surveys/{}/questions", question.survey_id), question).await
    }

    /// Replace question `id`
    ///
    /// # Errors
    /// See [`QuestionClient`].
    pub async fn update_question(
        &self,
        ctx: &RequestContext,
        id: i32,
        question: &Question,
    ) -> Result<ApiResult<Question>, ApiError> {
        self.api.put(ctx, &format!("/questions/{id}"), question).await
    }

    /// Delete question `id`
    ///
    /// # Errors
    /// See [`QuestionClient`].
    pub async fn delete_question(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResult, ApiError> {
        self.api.delete(ctx, &format!("/questions/{id}")).await
    }
}
