//! FlowController - executes the survey conversation against the content
//! service.
//!
//! Owns every mutation of the session snapshot for the answer/skip/edit
//! intents. Each operation claims the busy gate, validates against the
//! current snapshot, makes at most one service call, and commits the new
//! snapshot atomically on success. A failed call leaves the snapshot
//! completely unchanged; retrying reissues the identical intent.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::ValidationError;
use crate::domain::survey::{detect_duplicate, resolve_selection, SurveySession};
use crate::ports::{ServiceError, StepReply, StepStatus, SurveyService, SurveySubject};

use super::errors::FlowError;
use super::session_store::SessionStore;

/// Result of an accepted answer, skip, or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The conversation continues with the contained snapshot's question.
    NextQuestion(SurveySession),
    /// The service signaled survey completion; responses are preserved and
    /// review generation now awaits an explicit request.
    SurveyCompleted(SurveySession),
}

impl StepOutcome {
    /// The snapshot after the accepted step.
    pub fn session(&self) -> &SurveySession {
        match self {
            StepOutcome::NextQuestion(session) => session,
            StepOutcome::SurveyCompleted(session) => session,
        }
    }

    pub fn is_survey_completed(&self) -> bool {
        matches!(self, StepOutcome::SurveyCompleted(_))
    }
}

/// Session-scoped controller for the conversational survey flow.
pub struct FlowController {
    store: Arc<SessionStore>,
    service: Arc<dyn SurveyService>,
}

impl FlowController {
    pub fn new(store: Arc<SessionStore>, service: Arc<dyn SurveyService>) -> Self {
        Self { store, service }
    }

    /// A clone of the current session snapshot.
    pub fn snapshot(&self) -> Option<SurveySession> {
        self.store.snapshot()
    }

    /// Starts a new session for the subject, discarding any previous one.
    ///
    /// A restart is an abandonment: the service issues a brand-new session
    /// id and the old snapshot is dropped client-side, never migrated.
    pub async fn start(&self, subject: &SurveySubject) -> Result<SurveySession, FlowError> {
        let _guard = self.store.begin_operation().ok_or(FlowError::Busy)?;

        let reply = self
            .service
            .start(subject)
            .await
            .map_err(FlowError::StartFailed)?;
        let session = SurveySession::started(
            reply.session_id,
            reply.question,
            reply.question_number,
            reply.total_questions,
            reply.answered_questions_count,
        )
        .map_err(|e| FlowError::StartFailed(ServiceError::invalid_reply(e.to_string())))?;

        info!(
            session_id = %session.session_id(),
            total_questions = session.total_questions(),
            "survey session started"
        );
        self.store.write(|state| *state = Some(session.clone()));
        Ok(session)
    }

    /// Submits the raw selection for the displayed question.
    ///
    /// In normal mode this answers the current question; in edit mode it
    /// submits the branch-and-prune edit. Duplicate edited answers are
    /// detected before any service call and leave the snapshot untouched;
    /// after showing the transient warning the host restores via
    /// [`cancel_edit`](Self::cancel_edit).
    pub async fn submit_answer(
        &self,
        selected: &[String],
        free_text: &str,
    ) -> Result<StepOutcome, FlowError> {
        let _guard = self.store.begin_operation().ok_or(FlowError::Busy)?;

        let (session_id, editing, answer) = self.store.read(|state| {
            let session = state.ok_or(FlowError::NoSession)?;
            let question = session
                .current_question()
                .ok_or(FlowError::NoQuestionDisplayed)?;
            match session.edit() {
                None if !session.status().accepts_answers() => {
                    return Err(FlowError::NotInProgress {
                        status: session.status(),
                    });
                }
                Some(_) if !session.status().allows_editing() => {
                    return Err(FlowError::EditRefused {
                        status: session.status(),
                    });
                }
                _ => {}
            }

            let answer =
                resolve_selection(selected, free_text, question).map_err(FlowError::Selection)?;
            if let Some(edit) = session.edit() {
                detect_duplicate(edit.editing_question_number, &answer, session.responses())?;
                Ok((
                    session.session_id(),
                    Some(edit.editing_question_number),
                    answer,
                ))
            } else {
                Ok((session.session_id(), None, answer))
            }
        })?;

        let reply = match editing {
            None => {
                debug!(session_id = %session_id, "submitting answer");
                self.service
                    .answer(session_id, &answer)
                    .await
                    .map_err(FlowError::Step)?
            }
            Some(question_number) => {
                debug!(session_id = %session_id, question_number, "submitting edited answer");
                self.service
                    .edit(session_id, question_number, &answer)
                    .await
                    .map_err(FlowError::Step)?
            }
        };

        self.apply_step(reply, |session| match editing {
            None => session.record_current_answer(answer),
            Some(_) => session.apply_edit(answer),
        })
    }

    /// Skips the displayed question.
    ///
    /// The server may decline with its skip limit; that soft rejection
    /// carries a user-facing message and changes nothing locally.
    pub async fn skip(&self) -> Result<StepOutcome, FlowError> {
        let _guard = self.store.begin_operation().ok_or(FlowError::Busy)?;

        let session_id = self.store.read(|state| {
            let session = state.ok_or(FlowError::NoSession)?;
            if session.is_editing() {
                return Err(FlowError::SkipWhileEditing);
            }
            if !session.status().accepts_answers() {
                return Err(FlowError::NotInProgress {
                    status: session.status(),
                });
            }
            session
                .current_question()
                .ok_or(FlowError::NoQuestionDisplayed)?;
            Ok(session.session_id())
        })?;

        let reply = match self.service.skip(session_id).await {
            Ok(reply) => reply,
            Err(ServiceError::SkipLimit { message }) => {
                warn!(session_id = %session_id, "skip declined by service");
                return Err(FlowError::SkipLimitExceeded { message });
            }
            Err(e) => return Err(FlowError::Step(e)),
        };

        self.apply_step(reply, |session| session.record_current_skip())
    }

    /// Enters edit mode for an answered question.
    ///
    /// The question is fetched fresh from the service (never reused from
    /// history) and only a successful fetch mutates the snapshot.
    pub async fn load_for_edit(&self, question_number: u32) -> Result<SurveySession, FlowError> {
        let _guard = self.store.begin_operation().ok_or(FlowError::Busy)?;

        let session_id = self.store.read(|state| {
            let session = state.ok_or(FlowError::NoSession)?;
            if !session.status().allows_editing() {
                return Err(FlowError::EditRefused {
                    status: session.status(),
                });
            }
            if !session.responses().contains(question_number) {
                return Err(FlowError::InvalidQuestionNumber { question_number });
            }
            Ok(session.session_id())
        })?;

        let question = self
            .service
            .question_for_edit(session_id, question_number)
            .await
            .map_err(FlowError::Step)?;

        debug!(session_id = %session_id, question_number, "entering edit mode");
        self.store.write(|state| {
            let current = state.as_ref().ok_or(FlowError::NoSession)?;
            let mut next = current.clone();
            next.begin_edit(question_number, question)
                .map_err(reply_error)?;
            *state = Some(next.clone());
            Ok(next)
        })
    }

    /// Abandons the edit and restores the saved display verbatim, clearing
    /// all edit-transient state. Local-only; no service call.
    pub fn cancel_edit(&self) -> Result<SurveySession, FlowError> {
        let _guard = self.store.begin_operation().ok_or(FlowError::Busy)?;

        self.store.write(|state| {
            let current = state.as_ref().ok_or(FlowError::NoSession)?;
            if !current.is_editing() {
                return Err(FlowError::NotEditing);
            }
            let mut next = current.clone();
            next.cancel_edit().map_err(|_| FlowError::NotEditing)?;
            *state = Some(next.clone());
            Ok(next)
        })
    }

    /// Applies a successful step reply on a scratch copy and commits it.
    fn apply_step(
        &self,
        reply: StepReply,
        record: impl FnOnce(&mut SurveySession) -> Result<(), ValidationError>,
    ) -> Result<StepOutcome, FlowError> {
        self.store.write(|state| {
            let current = state.as_ref().ok_or(FlowError::NoSession)?;
            let mut next = current.clone();

            record(&mut next).map_err(reply_error)?;
            next.adopt_counters(
                reply.total_questions,
                reply.answered_questions_count,
                reply.skipped_count,
                reply.consecutive_skips,
            );

            let outcome = match reply.status {
                StepStatus::Continue => {
                    let question = reply.question.ok_or_else(|| {
                        FlowError::Step(ServiceError::invalid_reply(
                            "continue reply is missing the next question",
                        ))
                    })?;
                    let question_number = reply.question_number.ok_or_else(|| {
                        FlowError::Step(ServiceError::invalid_reply(
                            "continue reply is missing the question number",
                        ))
                    })?;
                    next.advance_to(question, question_number)
                        .map_err(reply_error)?;
                    StepOutcome::NextQuestion(next.clone())
                }
                StepStatus::SurveyCompleted => {
                    next.complete_survey().map_err(reply_error)?;
                    info!(session_id = %next.session_id(), "survey completed");
                    StepOutcome::SurveyCompleted(next.clone())
                }
            };

            *state = Some(next);
            Ok(outcome)
        })
    }
}

/// A reply that cannot be applied to the snapshot is treated as malformed.
fn reply_error(e: ValidationError) -> FlowError {
    FlowError::Step(ServiceError::invalid_reply(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockSurveyService;
    use crate::domain::foundation::{ItemId, SurveyStatus, UserId};
    use crate::domain::survey::{AnswerValue, SurveyQuestion};
    use crate::ports::StartReply;
    use std::time::Duration;

    fn question(text: &str) -> SurveyQuestion {
        SurveyQuestion::new(
            text,
            vec!["Yes".to_string(), "No".to_string()],
            false,
            None,
        )
        .unwrap()
    }

    fn subject() -> SurveySubject {
        SurveySubject {
            user_id: UserId::new("user-1").unwrap(),
            item_id: ItemId::new("B000TEST01").unwrap(),
            form_context: serde_json::json!({"hasReviews": "yes"}),
        }
    }

    fn start_reply() -> StartReply {
        StartReply {
            session_id: crate::domain::foundation::SessionId::new(),
            question: question("Q1"),
            question_number: 1,
            total_questions: 3,
            answered_questions_count: 0,
        }
    }

    fn controller(mock: MockSurveyService) -> (FlowController, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new());
        let controller = FlowController::new(store.clone(), Arc::new(mock));
        (controller, store)
    }

    #[tokio::test]
    async fn start_initializes_the_snapshot() {
        let mock = MockSurveyService::new().with_start(start_reply());
        let (controller, _) = controller(mock);

        let session = controller.start(&subject()).await.unwrap();

        assert_eq!(session.status(), SurveyStatus::InProgress);
        assert_eq!(session.question_number(), 1);
        assert_eq!(controller.snapshot().unwrap(), session);
    }

    #[tokio::test]
    async fn start_failure_is_fatal_and_leaves_no_session() {
        let mock =
            MockSurveyService::new().with_start_error(ServiceError::unavailable("refused"));
        let (controller, _) = controller(mock);

        let err = controller.start(&subject()).await.unwrap_err();

        assert!(matches!(err, FlowError::StartFailed(_)));
        assert!(controller.snapshot().is_none());
    }

    #[tokio::test]
    async fn submitting_an_answer_records_and_advances() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::next_question(question("Q2"), 2, 3));
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();

        let outcome = controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();

        let session = outcome.session();
        assert_eq!(session.responses().len(), 1);
        assert_eq!(
            session.responses().get(1).unwrap().answer,
            AnswerValue::single("Yes")
        );
        assert_eq!(session.question_number(), 2);
    }

    #[tokio::test]
    async fn completion_signal_clears_the_question_and_keeps_responses() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::survey_completed());
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();

        let outcome = controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();

        assert!(outcome.is_survey_completed());
        let session = outcome.session();
        assert_eq!(session.status(), SurveyStatus::SurveyCompleted);
        assert!(session.current_question().is_none());
        assert_eq!(session.responses().len(), 1);
    }

    #[tokio::test]
    async fn failed_answer_leaves_the_snapshot_unchanged() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step_error(ServiceError::unavailable("boom"));
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();
        let before = controller.snapshot().unwrap();

        let err = controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::Step(_)));
        assert_eq!(controller.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn submit_without_a_session_is_refused() {
        let (controller, _) = controller(MockSurveyService::new());
        let err = controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap_err();
        assert_eq!(err, FlowError::NoSession);
    }

    #[tokio::test]
    async fn submit_after_completion_is_refused_without_a_service_call() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::survey_completed());
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();
        controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();

        let err = controller
            .submit_answer(&["No".to_string()], "")
            .await
            .unwrap_err();

        // With no question displayed the intent is rejected up front.
        assert_eq!(err, FlowError::NoQuestionDisplayed);
    }

    #[tokio::test]
    async fn rejected_skip_leaves_the_snapshot_bit_for_bit_identical() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step_error(ServiceError::skip_limit("Only 3 skips allowed"));
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();
        let before = controller.snapshot().unwrap();

        let err = controller.skip().await.unwrap_err();

        assert_eq!(
            err,
            FlowError::SkipLimitExceeded {
                message: "Only 3 skips allowed".to_string()
            }
        );
        assert_eq!(controller.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn accepted_skip_records_the_skip_marker_and_advances() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(
                StepReply::next_question(question("Q2"), 2, 3).with_skip_counters(1, 1),
            );
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();

        let outcome = controller.skip().await.unwrap();

        let session = outcome.session();
        let response = session.responses().get(1).unwrap();
        assert!(response.is_skipped);
        assert_eq!(response.answer, AnswerValue::single("SKIPPED"));
        assert_eq!(session.skipped_count(), 1);
        assert_eq!(session.consecutive_skips(), 1);
        assert_eq!(session.question_number(), 2);
    }

    #[tokio::test]
    async fn load_for_edit_fetches_fresh_and_enters_edit_mode() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::next_question(question("Q2"), 2, 3))
            .with_edit_question(question("Q1 regenerated"));
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();
        controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();

        let session = controller.load_for_edit(1).await.unwrap();

        assert!(session.is_editing());
        assert_eq!(session.question_number(), 1);
        assert_eq!(
            session.current_question().unwrap().question_text,
            "Q1 regenerated"
        );
    }

    #[tokio::test]
    async fn load_for_edit_refuses_unanswered_question_numbers() {
        let mock = MockSurveyService::new().with_start(start_reply());
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();

        let err = controller.load_for_edit(1).await.unwrap_err();
        assert_eq!(err, FlowError::InvalidQuestionNumber { question_number: 1 });
    }

    #[tokio::test]
    async fn failed_edit_fetch_does_not_enter_edit_mode() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::next_question(question("Q2"), 2, 3))
            .with_edit_question_error(ServiceError::unavailable("boom"));
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();
        controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();
        let before = controller.snapshot().unwrap();

        let err = controller.load_for_edit(1).await.unwrap_err();

        assert!(matches!(err, FlowError::Step(_)));
        assert_eq!(controller.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn duplicate_edit_raises_without_any_service_call() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::next_question(question("Q2"), 2, 3))
            .with_edit_question(question("Q1 regenerated"));
        let (controller, _) = controller(mock.clone());
        controller.start(&subject()).await.unwrap();
        controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();
        controller.load_for_edit(1).await.unwrap();
        let calls_before = mock.calls().len();
        let before = controller.snapshot().unwrap();

        let err = controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::Duplicate(_)));
        assert_eq!(controller.snapshot().unwrap(), before);
        assert_eq!(mock.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn cancel_edit_restores_the_saved_display() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::next_question(question("Q2"), 2, 3))
            .with_edit_question(question("Q1 regenerated"));
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();
        controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();
        controller.load_for_edit(1).await.unwrap();

        let session = controller.cancel_edit().unwrap();

        assert!(!session.is_editing());
        assert_eq!(session.question_number(), 2);
        assert_eq!(session.current_question().unwrap().question_text, "Q2");
    }

    #[tokio::test]
    async fn accepted_edit_truncates_and_adopts_the_returned_question() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::next_question(question("Q2"), 2, 3))
            .with_step(StepReply::next_question(question("Q3"), 3, 3))
            .with_edit_question(question("Q1 regenerated"))
            .with_step(StepReply::next_question(question("Q2 branched"), 2, 3));
        let (controller, _) = controller(mock);
        controller.start(&subject()).await.unwrap();
        controller
            .submit_answer(&["Yes".to_string()], "")
            .await
            .unwrap();
        controller
            .submit_answer(&["No".to_string()], "")
            .await
            .unwrap();

        controller.load_for_edit(1).await.unwrap();
        let outcome = controller
            .submit_answer(&["No".to_string()], "")
            .await
            .unwrap();

        let session = outcome.session();
        assert_eq!(session.responses().len(), 1);
        assert_eq!(
            session.responses().get(1).unwrap().answer,
            AnswerValue::single("No")
        );
        assert!(!session.is_editing());
        assert_eq!(session.question_number(), 2);
        assert_eq!(
            session.current_question().unwrap().question_text,
            "Q2 branched"
        );
    }

    #[tokio::test]
    async fn concurrent_submissions_collapse_to_one_accepted_mutation() {
        let mock = MockSurveyService::new()
            .with_start(start_reply())
            .with_step(StepReply::next_question(question("Q2"), 2, 3))
            .with_delay(Duration::from_millis(50));
        let (controller, _) = controller(mock);
        let controller = Arc::new(controller);
        controller.start(&subject()).await.unwrap();

        let first = controller.clone();
        let second = controller.clone();
        let (a, b) = tokio::join!(
            async move { first.submit_answer(&["Yes".to_string()], "").await },
            async move { second.submit_answer(&["Yes".to_string()], "").await },
        );

        let accepted = [&a, &b].iter().filter(|r| r.is_ok()).count();
        let busy = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(FlowError::Busy)))
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(busy, 1);
        assert_eq!(controller.snapshot().unwrap().responses().len(), 1);
    }
}
