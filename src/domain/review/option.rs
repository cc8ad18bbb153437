//! Generated review options.
//!
//! Review text is authored by the content service from the survey
//! responses; options are immutable once returned. The user picks one and
//! submits it, or asks for a fresh batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StarRating, ValidationError};

/// Coarse sentiment classification of the survey responses, returned ahead
/// of the review options so the host can frame the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBand {
    Good,
    Okay,
    Bad,
}

impl fmt::Display for SentimentBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentBand::Good => "good",
            SentimentBand::Okay => "okay",
            SentimentBand::Bad => "bad",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SentimentBand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(SentimentBand::Good),
            "okay" => Ok(SentimentBand::Okay),
            "bad" => Ok(SentimentBand::Bad),
            other => Err(ValidationError::invalid_format(
                "sentiment_band",
                format!("unknown band {:?}", other),
            )),
        }
    }
}

/// One candidate review the user may submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOption {
    /// Complete review text.
    pub review_text: String,
    /// Star rating 1-5.
    pub review_stars: StarRating,
    /// Writing tone (e.g. "enthusiastic", "balanced", "critical").
    pub tone: String,
    /// Product aspects the review calls out.
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl ReviewOption {
    /// Creates a validated review option.
    pub fn new(
        review_text: impl Into<String>,
        review_stars: StarRating,
        tone: impl Into<String>,
        highlights: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let review_text = review_text.into();
        if review_text.trim().is_empty() {
            return Err(ValidationError::empty_field("review_text"));
        }
        Ok(Self {
            review_text,
            review_stars,
            tone: tone.into(),
            highlights,
        })
    }
}
