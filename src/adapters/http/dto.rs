//! Wire DTOs for the Survey Sensei REST backend.
//!
//! Request and response shapes mirror the backend's API models; the
//! conversion methods validate payloads into domain types and report
//! anything malformed as an invalid reply.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::review::ReviewOption;
use crate::domain::survey::{AnswerValue, SurveyQuestion};
use crate::ports::{ReviewReply, ServiceError, StartReply, StepReply, StepStatus};

#[derive(Debug, Serialize)]
pub(super) struct StartSurveyRequest<'a> {
    pub user_id: &'a str,
    pub item_id: &'a str,
    pub form_data: &'a Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct QuestionDto {
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl QuestionDto {
    pub fn into_question(self) -> Result<SurveyQuestion, ServiceError> {
        SurveyQuestion::new(
            self.question_text,
            self.options,
            self.allow_multiple,
            self.reasoning,
        )
        .map_err(|e| ServiceError::invalid_reply(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StartSurveyResponse {
    pub session_id: String,
    pub question: QuestionDto,
    pub question_number: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub answered_questions_count: u32,
}

impl StartSurveyResponse {
    pub fn into_reply(self) -> Result<StartReply, ServiceError> {
        let session_id = self
            .session_id
            .parse()
            .map_err(|_| ServiceError::invalid_reply("session_id is not a UUID"))?;
        Ok(StartReply {
            session_id,
            question: self.question.into_question()?,
            question_number: self.question_number,
            total_questions: self.total_questions,
            answered_questions_count: self.answered_questions_count,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitAnswerRequest<'a> {
    pub session_id: String,
    pub answer: &'a AnswerValue,
}

#[derive(Debug, Serialize)]
pub(super) struct SkipQuestionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct EditAnswerRequest<'a> {
    pub session_id: String,
    pub question_number: u32,
    pub answer: &'a AnswerValue,
}

#[derive(Debug, Deserialize)]
pub(super) struct SubmitAnswerResponse {
    pub status: String,
    pub question: Option<QuestionDto>,
    pub question_number: Option<u32>,
    pub total_questions: Option<u32>,
    pub answered_questions_count: Option<u32>,
    pub skipped_count: Option<u32>,
    pub consecutive_skips: Option<u32>,
}

impl SubmitAnswerResponse {
    pub fn into_reply(self) -> Result<StepReply, ServiceError> {
        let status = match self.status.as_str() {
            "continue" => StepStatus::Continue,
            "survey_completed" => StepStatus::SurveyCompleted,
            other => {
                return Err(ServiceError::invalid_reply(format!(
                    "unknown step status {:?}",
                    other
                )));
            }
        };
        let question = self.question.map(QuestionDto::into_question).transpose()?;
        Ok(StepReply {
            status,
            question,
            question_number: self.question_number,
            total_questions: self.total_questions,
            answered_questions_count: self.answered_questions_count,
            skipped_count: self.skipped_count,
            consecutive_skips: self.consecutive_skips,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct QuestionForEditResponse {
    pub question: QuestionDto,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateReviewsRequest {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReviewOptionDto {
    pub review_text: String,
    pub review_stars: u8,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl ReviewOptionDto {
    pub fn into_option(self) -> Result<ReviewOption, ServiceError> {
        let stars = crate::domain::foundation::StarRating::try_from_u8(self.review_stars)
            .map_err(|e| ServiceError::invalid_reply(e.to_string()))?;
        ReviewOption::new(self.review_text, stars, self.tone, self.highlights)
            .map_err(|e| ServiceError::invalid_reply(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateReviewsResponse {
    pub review_options: Vec<ReviewOptionDto>,
    pub sentiment_band: String,
}

impl GenerateReviewsResponse {
    pub fn into_reply(self) -> Result<ReviewReply, ServiceError> {
        let sentiment_band = self
            .sentiment_band
            .parse()
            .map_err(|_| {
                ServiceError::invalid_reply(format!(
                    "unknown sentiment band {:?}",
                    self.sentiment_band
                ))
            })?;
        let options = self
            .review_options
            .into_iter()
            .map(ReviewOptionDto::into_option)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReviewReply {
            options,
            sentiment_band,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitReviewRequest {
    pub session_id: String,
    pub selected_review_index: usize,
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub detail: String,
}
