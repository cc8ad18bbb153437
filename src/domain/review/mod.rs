//! Review domain - generated review options and sentiment classification.

mod option;

pub use option::{ReviewOption, SentimentBand};
