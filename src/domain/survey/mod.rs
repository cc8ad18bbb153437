//! Survey domain - questions, answers, the response log, and the session.
//!
//! # Module Organization
//!
//! - `question` - The question payload displayed to the user
//! - `answer` - Canonical answer values (single choice or ordered multi-select)
//! - `selection` - Resolution of raw UI selections into answer values
//! - `response_log` - Append-only response history with ordering invariants
//! - `session` - The session snapshot mutated by the flow controller

mod answer;
mod question;
mod response_log;
mod selection;
mod session;

pub use answer::AnswerValue;
pub use question::SurveyQuestion;
pub use response_log::{Response, ResponseLog, SKIPPED_ANSWER};
pub use selection::{
    detect_duplicate, resolve_selection, DuplicateAnswer, MultiSelection, OptionRole,
    OPTION_ALL_OF_THE_ABOVE, OPTION_OTHER,
};
pub use session::{EditContext, SurveySession};
