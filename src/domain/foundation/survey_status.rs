//! SurveyStatus enum for tracking the lifecycle of a survey session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a survey session.
///
/// Normal progression is `Starting -> InProgress -> SurveyCompleted ->
/// ReviewsGenerated -> Completed`. The single permitted regression is
/// `SurveyCompleted -> InProgress`, taken when an accepted edit reopens
/// the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    #[default]
    Starting,
    InProgress,
    SurveyCompleted,
    ReviewsGenerated,
    Completed,
}

impl SurveyStatus {
    /// Returns true if the session currently accepts answers and skips.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, SurveyStatus::InProgress)
    }

    /// Returns true if previous answers may still be edited.
    ///
    /// Editing is locked as soon as reviews exist for the session.
    pub fn allows_editing(&self) -> bool {
        matches!(self, SurveyStatus::InProgress | SurveyStatus::SurveyCompleted)
    }

    /// Returns true if review generation may be requested.
    pub fn ready_for_reviews(&self) -> bool {
        matches!(self, SurveyStatus::SurveyCompleted)
    }
}

impl StateMachine for SurveyStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SurveyStatus::*;
        matches!(
            (self, target),
            (Starting, InProgress)
                | (InProgress, SurveyCompleted)
                | (SurveyCompleted, InProgress)
                | (SurveyCompleted, ReviewsGenerated)
                | (ReviewsGenerated, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SurveyStatus::*;
        match self {
            Starting => vec![InProgress],
            InProgress => vec![SurveyCompleted],
            SurveyCompleted => vec![InProgress, ReviewsGenerated],
            ReviewsGenerated => vec![Completed],
            Completed => vec![],
        }
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SurveyStatus::Starting => "starting",
            SurveyStatus::InProgress => "in_progress",
            SurveyStatus::SurveyCompleted => "survey_completed",
            SurveyStatus::ReviewsGenerated => "reviews_generated",
            SurveyStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_starting() {
        assert_eq!(SurveyStatus::default(), SurveyStatus::Starting);
    }

    #[test]
    fn normal_progression_is_valid() {
        use SurveyStatus::*;
        assert!(Starting.can_transition_to(&InProgress));
        assert!(InProgress.can_transition_to(&SurveyCompleted));
        assert!(SurveyCompleted.can_transition_to(&ReviewsGenerated));
        assert!(ReviewsGenerated.can_transition_to(&Completed));
    }

    #[test]
    fn accepted_edit_regression_is_the_only_backward_transition() {
        use SurveyStatus::*;
        assert!(SurveyCompleted.can_transition_to(&InProgress));

        assert!(!InProgress.can_transition_to(&Starting));
        assert!(!ReviewsGenerated.can_transition_to(&InProgress));
        assert!(!ReviewsGenerated.can_transition_to(&SurveyCompleted));
        assert!(!Completed.can_transition_to(&ReviewsGenerated));
        assert!(!Completed.can_transition_to(&InProgress));
    }

    #[test]
    fn skipping_stages_is_invalid() {
        use SurveyStatus::*;
        assert!(!Starting.can_transition_to(&SurveyCompleted));
        assert!(!InProgress.can_transition_to(&ReviewsGenerated));
        assert!(!SurveyCompleted.can_transition_to(&Completed));
    }

    #[test]
    fn accepts_answers_only_in_progress() {
        assert!(SurveyStatus::InProgress.accepts_answers());
        assert!(!SurveyStatus::Starting.accepts_answers());
        assert!(!SurveyStatus::SurveyCompleted.accepts_answers());
        assert!(!SurveyStatus::ReviewsGenerated.accepts_answers());
        assert!(!SurveyStatus::Completed.accepts_answers());
    }

    #[test]
    fn editing_locked_once_reviews_exist() {
        assert!(SurveyStatus::InProgress.allows_editing());
        assert!(SurveyStatus::SurveyCompleted.allows_editing());
        assert!(!SurveyStatus::ReviewsGenerated.allows_editing());
        assert!(!SurveyStatus::Completed.allows_editing());
    }

    #[test]
    fn ready_for_reviews_only_after_survey_completed() {
        assert!(SurveyStatus::SurveyCompleted.ready_for_reviews());
        assert!(!SurveyStatus::InProgress.ready_for_reviews());
        assert!(!SurveyStatus::ReviewsGenerated.ready_for_reviews());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&SurveyStatus::SurveyCompleted).unwrap(),
            "\"survey_completed\""
        );
        assert_eq!(
            serde_json::to_string(&SurveyStatus::ReviewsGenerated).unwrap(),
            "\"reviews_generated\""
        );
    }

    #[test]
    fn deserializes_from_snake_case_json() {
        let status: SurveyStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, SurveyStatus::InProgress);
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(format!("{}", SurveyStatus::InProgress), "in_progress");
        assert_eq!(format!("{}", SurveyStatus::Completed), "completed");
    }
}
