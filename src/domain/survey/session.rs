//! The survey session snapshot.
//!
//! One `SurveySession` exists per conversation and is owned exclusively by
//! the session's flow controller. All mutation goes through the methods
//! here, which uphold the log ordering invariants and the status state
//! machine; hosts only ever see cloned snapshots.

use serde::{Deserialize, Serialize};

use super::{AnswerValue, Response, ResponseLog, SurveyQuestion};
use crate::domain::foundation::{SessionId, StateMachine, SurveyStatus, ValidationError};

/// Transient bookkeeping while an earlier answer is being edited.
///
/// Holds the question that was displayed when edit mode was entered so a
/// cancelled edit can restore it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditContext {
    pub editing_question_number: u32,
    pub saved_question: Option<SurveyQuestion>,
    pub saved_question_number: u32,
}

/// Conversational state of one survey session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySession {
    session_id: SessionId,
    current_question: Option<SurveyQuestion>,
    question_number: u32,
    /// Soft target; the content service may grow it as follow-ups are
    /// generated.
    total_questions: u32,
    answered_questions_count: u32,
    skipped_count: u32,
    consecutive_skips: u32,
    status: SurveyStatus,
    responses: ResponseLog,
    edit: Option<EditContext>,
}

impl SurveySession {
    /// Creates the session from a successful `start` reply.
    ///
    /// The first question is always question 1; a service that claims
    /// otherwise is out of step with an empty response log.
    pub fn started(
        session_id: SessionId,
        question: SurveyQuestion,
        question_number: u32,
        total_questions: u32,
        answered_questions_count: u32,
    ) -> Result<Self, ValidationError> {
        if question_number != 1 {
            return Err(ValidationError::invalid_format(
                "question_number",
                format!("a new session must begin at question 1, got {}", question_number),
            ));
        }
        Ok(Self {
            session_id,
            current_question: Some(question),
            question_number: 1,
            total_questions,
            answered_questions_count,
            skipped_count: 0,
            consecutive_skips: 0,
            status: SurveyStatus::InProgress,
            responses: ResponseLog::new(),
            edit: None,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn current_question(&self) -> Option<&SurveyQuestion> {
        self.current_question.as_ref()
    }

    pub fn question_number(&self) -> u32 {
        self.question_number
    }

    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    pub fn answered_questions_count(&self) -> u32 {
        self.answered_questions_count
    }

    pub fn skipped_count(&self) -> u32 {
        self.skipped_count
    }

    pub fn consecutive_skips(&self) -> u32 {
        self.consecutive_skips
    }

    pub fn status(&self) -> SurveyStatus {
        self.status
    }

    pub fn responses(&self) -> &ResponseLog {
        &self.responses
    }

    pub fn edit(&self) -> Option<&EditContext> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Records the answer for the currently displayed question.
    pub fn record_current_answer(&mut self, answer: AnswerValue) -> Result<(), ValidationError> {
        let question = self
            .current_question
            .as_ref()
            .ok_or_else(|| ValidationError::empty_field("current_question"))?;
        let response =
            Response::answered(self.question_number, question.question_text.clone(), answer);
        self.responses.record(response)?;
        self.answered_questions_count += 1;
        self.consecutive_skips = 0;
        Ok(())
    }

    /// Records a skip for the currently displayed question.
    pub fn record_current_skip(&mut self) -> Result<(), ValidationError> {
        let question = self
            .current_question
            .as_ref()
            .ok_or_else(|| ValidationError::empty_field("current_question"))?;
        let response = Response::skipped(self.question_number, question.question_text.clone());
        self.responses.record(response)?;
        self.skipped_count += 1;
        self.consecutive_skips += 1;
        Ok(())
    }

    /// Displays the next question returned by the content service.
    ///
    /// Outside edit mode the displayed number always equals the number of
    /// recorded responses plus one.
    pub fn advance_to(
        &mut self,
        question: SurveyQuestion,
        question_number: u32,
    ) -> Result<(), ValidationError> {
        let expected = self.responses.next_question_number();
        if question_number != expected {
            return Err(ValidationError::invalid_format(
                "question_number",
                format!("expected question {}, service sent {}", expected, question_number),
            ));
        }
        self.current_question = Some(question);
        self.question_number = question_number;
        Ok(())
    }

    /// Overrides local progress bookkeeping with server-reported values.
    pub fn adopt_counters(
        &mut self,
        total_questions: Option<u32>,
        answered_questions_count: Option<u32>,
        skipped_count: Option<u32>,
        consecutive_skips: Option<u32>,
    ) {
        if let Some(total) = total_questions {
            self.total_questions = total;
        }
        if let Some(answered) = answered_questions_count {
            self.answered_questions_count = answered;
        }
        if let Some(skipped) = skipped_count {
            self.skipped_count = skipped;
        }
        if let Some(consecutive) = consecutive_skips {
            self.consecutive_skips = consecutive;
        }
    }

    /// Handles the survey-completed signal: the question is cleared and the
    /// response log is preserved.
    pub fn complete_survey(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SurveyStatus::SurveyCompleted)?;
        self.current_question = None;
        self.question_number = self.responses.next_question_number();
        Ok(())
    }

    /// Enters (or retargets) edit mode with a freshly fetched question.
    ///
    /// The displayed question is snapshotted only when first entering edit
    /// mode; retargeting an ongoing edit keeps the original snapshot so a
    /// later cancel restores the pre-edit display.
    pub fn begin_edit(
        &mut self,
        question_number: u32,
        fetched: SurveyQuestion,
    ) -> Result<(), ValidationError> {
        if !self.status.allows_editing() {
            return Err(ValidationError::invalid_format(
                "status",
                format!("editing is not allowed in status {}", self.status),
            ));
        }
        if !self.responses.contains(question_number) {
            return Err(ValidationError::invalid_format(
                "question_number",
                format!("no recorded response for question {}", question_number),
            ));
        }

        match self.edit.take() {
            None => {
                self.edit = Some(EditContext {
                    editing_question_number: question_number,
                    saved_question: self.current_question.clone(),
                    saved_question_number: self.question_number,
                });
            }
            Some(mut edit) => {
                edit.editing_question_number = question_number;
                self.edit = Some(edit);
            }
        }
        self.current_question = Some(fetched);
        self.question_number = question_number;
        Ok(())
    }

    /// Abandons the edit and restores the saved display verbatim.
    pub fn cancel_edit(&mut self) -> Result<(), ValidationError> {
        let edit = self
            .edit
            .take()
            .ok_or_else(|| ValidationError::empty_field("edit"))?;
        self.current_question = edit.saved_question;
        self.question_number = edit.saved_question_number;
        Ok(())
    }

    /// Applies an accepted edit: truncate at the branch point, append the
    /// replacement, clear the edit context.
    ///
    /// The pruned continuation is gone for good; counters are recomputed
    /// from what remains. A session that had reached `SurveyCompleted`
    /// regresses to `InProgress` here, before the service's follow-up
    /// question or completion signal is adopted.
    pub fn apply_edit(&mut self, answer: AnswerValue) -> Result<(), ValidationError> {
        let edit = self
            .edit
            .take()
            .ok_or_else(|| ValidationError::empty_field("edit"))?;
        let question = self
            .current_question
            .as_ref()
            .ok_or_else(|| ValidationError::empty_field("current_question"))?;

        let branch_point = edit.editing_question_number;
        self.responses.truncate_from(branch_point);
        let response = Response::answered(branch_point, question.question_text.clone(), answer);
        self.responses.record(response)?;
        self.recompute_counters();

        if self.status == SurveyStatus::SurveyCompleted {
            self.status = self.status.transition_to(SurveyStatus::InProgress)?;
        }
        self.question_number = self.responses.next_question_number();
        self.current_question = None;
        Ok(())
    }

    /// Marks reviews as generated for this session.
    pub fn mark_reviews_generated(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SurveyStatus::ReviewsGenerated)?;
        Ok(())
    }

    /// Marks the session complete after a review was submitted. Terminal.
    pub fn mark_completed(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SurveyStatus::Completed)?;
        Ok(())
    }

    fn recompute_counters(&mut self) {
        let entries = self.responses.entries();
        self.answered_questions_count = entries.iter().filter(|r| !r.is_skipped).count() as u32;
        self.skipped_count = entries.iter().filter(|r| r.is_skipped).count() as u32;
        self.consecutive_skips = entries
            .iter()
            .rev()
            .take_while(|r| r.is_skipped)
            .count() as u32;
    }
}
