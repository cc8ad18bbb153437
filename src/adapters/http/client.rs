//! Survey API Client - reqwest implementation of both service ports.
//!
//! Binds the transport-agnostic `SurveyService` and `ReviewService` ports
//! to the backend's REST routes. Transport failures map onto
//! `ServiceError`; timeouts are treated like any other network failure.
//! The one distinguished case is the skip route, where an HTTP 400 carries
//! the server's skip-limit message.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SurveyApiConfig::new("http://localhost:8000")
//!     .with_api_token(token)
//!     .with_timeout(Duration::from_secs(30));
//!
//! let client = SurveyApiClient::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

use crate::domain::foundation::SessionId;
use crate::domain::survey::{AnswerValue, SurveyQuestion};
use crate::ports::{
    ReviewReply, ReviewService, ServiceError, StartReply, StepReply, SurveyService, SurveySubject,
};

use super::dto::{
    EditAnswerRequest, ErrorBody, GenerateReviewsRequest, GenerateReviewsResponse,
    QuestionForEditResponse, SkipQuestionRequest, StartSurveyRequest, StartSurveyResponse,
    SubmitAnswerRequest, SubmitAnswerResponse, SubmitReviewRequest,
};

/// Configuration for the Survey API client.
#[derive(Debug, Clone)]
pub struct SurveyApiConfig {
    /// Base URL of the backend (default: http://localhost:8000).
    pub base_url: String,
    /// Optional bearer token for authenticated deployments.
    api_token: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
}

impl SurveyApiConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Secret::new(token.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_token(&self) -> Option<&str> {
        self.api_token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

impl Default for SurveyApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

/// Survey Sensei REST backend client.
pub struct SurveyApiClient {
    config: SurveyApiConfig,
    client: Client,
}

impl SurveyApiClient {
    /// Creates a client with the given configuration.
    pub fn new(config: SurveyApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if e.is_connect() {
            ServiceError::unavailable(format!("Connection failed: {}", e))
        } else {
            ServiceError::unavailable(e.to_string())
        }
    }

    async fn post_json<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
        bad_request_is_skip_limit: bool,
    ) -> Result<Resp, ServiceError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = self.config.api_token() {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = handle_status(response, bad_request_is_skip_limit).await?;
        response
            .json::<Resp>()
            .await
            .map_err(|e| ServiceError::invalid_reply(e.to_string()))
    }

    async fn get_json<Resp>(&self, path: &str) -> Result<Resp, ServiceError>
    where
        Resp: DeserializeOwned,
    {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = self.config.api_token() {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = handle_status(response, false).await?;
        response
            .json::<Resp>()
            .await
            .map_err(|e| ServiceError::invalid_reply(e.to_string()))
    }
}

/// Maps non-success statuses onto `ServiceError`.
async fn handle_status(
    response: Response,
    bad_request_is_skip_limit: bool,
) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| body.clone());
    error!(status = status.as_u16(), detail = %detail, "content service request failed");

    match status {
        StatusCode::BAD_REQUEST if bad_request_is_skip_limit => {
            Err(ServiceError::skip_limit(detail))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ServiceError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ServiceError::SessionNotFound),
        _ => Err(ServiceError::Http {
            status: status.as_u16(),
            message: detail,
        }),
    }
}

#[async_trait]
impl SurveyService for SurveyApiClient {
    async fn start(&self, subject: &SurveySubject) -> Result<StartReply, ServiceError> {
        let request = StartSurveyRequest {
            user_id: subject.user_id.as_str(),
            item_id: subject.item_id.as_str(),
            form_data: &subject.form_context,
        };
        let response: StartSurveyResponse =
            self.post_json("/api/survey/start", &request, false).await?;
        response.into_reply()
    }

    async fn answer(
        &self,
        session_id: SessionId,
        answer: &AnswerValue,
    ) -> Result<StepReply, ServiceError> {
        let request = SubmitAnswerRequest {
            session_id: session_id.to_string(),
            answer,
        };
        let response: SubmitAnswerResponse =
            self.post_json("/api/survey/answer", &request, false).await?;
        response.into_reply()
    }

    async fn skip(&self, session_id: SessionId) -> Result<StepReply, ServiceError> {
        let request = SkipQuestionRequest {
            session_id: session_id.to_string(),
        };
        let response: SubmitAnswerResponse =
            self.post_json("/api/survey/skip", &request, true).await?;
        response.into_reply()
    }

    async fn edit(
        &self,
        session_id: SessionId,
        question_number: u32,
        answer: &AnswerValue,
    ) -> Result<StepReply, ServiceError> {
        let request = EditAnswerRequest {
            session_id: session_id.to_string(),
            question_number,
            answer,
        };
        let response: SubmitAnswerResponse =
            self.post_json("/api/survey/edit", &request, false).await?;
        response.into_reply()
    }

    async fn question_for_edit(
        &self,
        session_id: SessionId,
        question_number: u32,
    ) -> Result<SurveyQuestion, ServiceError> {
        let path = format!("/api/survey/questions/{}/{}", session_id, question_number);
        let response: QuestionForEditResponse = self.get_json(&path).await?;
        response.question.into_question()
    }
}

#[async_trait]
impl ReviewService for SurveyApiClient {
    async fn generate(&self, session_id: SessionId) -> Result<ReviewReply, ServiceError> {
        let request = GenerateReviewsRequest {
            session_id: session_id.to_string(),
        };
        let response: GenerateReviewsResponse = self
            .post_json("/api/reviews/generate", &request, false)
            .await?;
        response.into_reply()
    }

    async fn regenerate(&self, session_id: SessionId) -> Result<ReviewReply, ServiceError> {
        let request = GenerateReviewsRequest {
            session_id: session_id.to_string(),
        };
        let response: GenerateReviewsResponse = self
            .post_json("/api/reviews/regenerate", &request, false)
            .await?;
        response.into_reply()
    }

    async fn submit(&self, session_id: SessionId, index: usize) -> Result<(), ServiceError> {
        let request = SubmitReviewRequest {
            session_id: session_id.to_string(),
            selected_review_index: index,
        };
        // The acknowledgment body is not needed beyond a successful status.
        let _: serde_json::Value = self.post_json("/api/survey/review", &request, false).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_trims_trailing_slashes() {
        let config = SurveyApiConfig::new("http://localhost:8000///");
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn config_defaults_to_local_backend() {
        let config = SurveyApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_token().is_none());
    }

    #[test]
    fn client_builds_route_urls() {
        let client = SurveyApiClient::new(SurveyApiConfig::new("http://localhost:8000"));
        assert_eq!(
            client.url("/api/survey/start"),
            "http://localhost:8000/api/survey/start"
        );
    }

    #[test]
    fn api_token_is_not_exposed_by_debug() {
        let config = SurveyApiConfig::new("http://localhost:8000").with_api_token("sk-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
    }
}
