//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions on entity lifecycle statuses.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for SurveyStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!(
///             (self, target),
///             (InProgress, SurveyCompleted) |
///             (SurveyCompleted, InProgress) |
///             // ... etc
///         )
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             InProgress => vec![SurveyCompleted],
///             // ... etc
///         }
///     }
/// }
///
/// // Usage:
/// let status = status.transition_to(SurveyStatus::SurveyCompleted)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    ///
    /// This is the preferred way to change state, as it ensures
    /// the transition is valid according to the state machine rules.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::SurveyStatus;
    use super::*;

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let status = SurveyStatus::Starting;
        let result = status.transition_to(SurveyStatus::InProgress);
        assert_eq!(result, Ok(SurveyStatus::InProgress));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let status = SurveyStatus::Starting;
        let result = status.transition_to(SurveyStatus::Completed);
        assert!(result.is_err());
    }

    #[test]
    fn is_terminal_returns_true_only_for_completed() {
        assert!(SurveyStatus::Completed.is_terminal());
        assert!(!SurveyStatus::Starting.is_terminal());
        assert!(!SurveyStatus::InProgress.is_terminal());
        assert!(!SurveyStatus::SurveyCompleted.is_terminal());
        assert!(!SurveyStatus::ReviewsGenerated.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [
            SurveyStatus::Starting,
            SurveyStatus::InProgress,
            SurveyStatus::SurveyCompleted,
            SurveyStatus::ReviewsGenerated,
            SurveyStatus::Completed,
        ] {
            for valid_target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&valid_target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    status,
                    valid_target
                );
            }
        }
    }
}
