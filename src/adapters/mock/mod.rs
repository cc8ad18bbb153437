//! Mock services for testing.
//!
//! Configurable mock implementations of the `SurveyService` and
//! `ReviewService` ports, allowing tests and offline hosts to run without
//! a live content service.
//!
//! # Features
//!
//! - Pre-scripted replies, consumed in order
//! - Simulated latency for re-entrancy testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let service = MockSurveyService::new()
//!     .with_start(start_reply)
//!     .with_step(StepReply::survey_completed());
//!
//! let reply = service.start(&subject).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::SessionId;
use crate::domain::survey::{AnswerValue, SurveyQuestion};
use crate::ports::{
    ReviewReply, ReviewService, ServiceError, StartReply, StepReply, SurveyService, SurveySubject,
};

/// One recorded call against the mock survey service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Start {
        user_id: String,
        item_id: String,
    },
    Answer {
        session_id: SessionId,
        answer: AnswerValue,
    },
    Skip {
        session_id: SessionId,
    },
    Edit {
        session_id: SessionId,
        question_number: u32,
        answer: AnswerValue,
    },
    QuestionForEdit {
        session_id: SessionId,
        question_number: u32,
    },
}

/// Mock survey service with scripted replies.
///
/// Step replies are shared by answer/skip/edit and consumed in order;
/// start and question-for-edit replies have their own queues. An
/// exhausted queue yields an `Unavailable` error.
#[derive(Debug, Clone, Default)]
pub struct MockSurveyService {
    start_replies: Arc<Mutex<VecDeque<Result<StartReply, ServiceError>>>>,
    step_replies: Arc<Mutex<VecDeque<Result<StepReply, ServiceError>>>>,
    edit_questions: Arc<Mutex<VecDeque<Result<SurveyQuestion, ServiceError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockSurveyService {
    /// Creates a mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful start reply.
    pub fn with_start(self, reply: StartReply) -> Self {
        self.start_replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    /// Queues a start failure.
    pub fn with_start_error(self, error: ServiceError) -> Self {
        self.start_replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a successful step reply (answer/skip/edit).
    pub fn with_step(self, reply: StepReply) -> Self {
        self.step_replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    /// Queues a step failure (answer/skip/edit).
    pub fn with_step_error(self, error: ServiceError) -> Self {
        self.step_replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a fresh question for the next question-for-edit fetch.
    pub fn with_edit_question(self, question: SurveyQuestion) -> Self {
        self.edit_questions.lock().unwrap().push_back(Ok(question));
        self
    }

    /// Queues a question-for-edit failure.
    pub fn with_edit_question_error(self, error: ServiceError) -> Self {
        self.edit_questions.lock().unwrap().push_back(Err(error));
        self
    }

    /// Simulates latency on every operation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_step(&self, operation: &str) -> Result<StepReply, ServiceError> {
        self.step_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ServiceError::unavailable(format!(
                    "no scripted reply for {}",
                    operation
                )))
            })
    }
}

#[async_trait]
impl SurveyService for MockSurveyService {
    async fn start(&self, subject: &SurveySubject) -> Result<StartReply, ServiceError> {
        self.record(RecordedCall::Start {
            user_id: subject.user_id.as_str().to_string(),
            item_id: subject.item_id.as_str().to_string(),
        });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.start_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::unavailable("no scripted reply for start")))
    }

    async fn answer(
        &self,
        session_id: SessionId,
        answer: &AnswerValue,
    ) -> Result<StepReply, ServiceError> {
        self.record(RecordedCall::Answer {
            session_id,
            answer: answer.clone(),
        });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.next_step("answer")
    }

    async fn skip(&self, session_id: SessionId) -> Result<StepReply, ServiceError> {
        self.record(RecordedCall::Skip { session_id });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.next_step("skip")
    }

    async fn edit(
        &self,
        session_id: SessionId,
        question_number: u32,
        answer: &AnswerValue,
    ) -> Result<StepReply, ServiceError> {
        self.record(RecordedCall::Edit {
            session_id,
            question_number,
            answer: answer.clone(),
        });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.next_step("edit")
    }

    async fn question_for_edit(
        &self,
        session_id: SessionId,
        question_number: u32,
    ) -> Result<SurveyQuestion, ServiceError> {
        self.record(RecordedCall::QuestionForEdit {
            session_id,
            question_number,
        });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.edit_questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ServiceError::unavailable(
                    "no scripted reply for question_for_edit",
                ))
            })
    }
}

/// One recorded call against the mock review service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedReviewCall {
    Generate { session_id: SessionId },
    Regenerate { session_id: SessionId },
    Submit { session_id: SessionId, index: usize },
}

/// Mock review service with scripted replies.
///
/// Generate and regenerate share one reply queue; submit has its own.
#[derive(Debug, Clone, Default)]
pub struct MockReviewService {
    replies: Arc<Mutex<VecDeque<Result<ReviewReply, ServiceError>>>>,
    submit_results: Arc<Mutex<VecDeque<Result<(), ServiceError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<RecordedReviewCall>>>,
}

impl MockReviewService {
    /// Creates a mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful generate/regenerate reply.
    pub fn with_reply(self, reply: ReviewReply) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    /// Queues a generate/regenerate failure.
    pub fn with_error(self, error: ServiceError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a successful submit acknowledgment.
    pub fn with_submit_ok(self) -> Self {
        self.submit_results.lock().unwrap().push_back(Ok(()));
        self
    }

    /// Queues a submit failure.
    pub fn with_submit_error(self, error: ServiceError) -> Self {
        self.submit_results.lock().unwrap().push_back(Err(error));
        self
    }

    /// Simulates latency on every operation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedReviewCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self, operation: &str) -> Result<ReviewReply, ServiceError> {
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ServiceError::unavailable(format!(
                "no scripted reply for {}",
                operation
            )))
        })
    }
}

#[async_trait]
impl ReviewService for MockReviewService {
    async fn generate(&self, session_id: SessionId) -> Result<ReviewReply, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedReviewCall::Generate { session_id });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.next_reply("generate")
    }

    async fn regenerate(&self, session_id: SessionId) -> Result<ReviewReply, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedReviewCall::Regenerate { session_id });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.next_reply("regenerate")
    }

    async fn submit(&self, session_id: SessionId, index: usize) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedReviewCall::Submit { session_id, index });
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::unavailable("no scripted reply for submit")))
    }
}
