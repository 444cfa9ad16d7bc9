// File: chatvault-common/src/models/sentiment.rs

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Coarse tone of a user message, picked by keyword heuristic.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
pub enum Tone {
    Enthusiastic,
    Polite,
    Urgent,
    Casual,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Enthusiastic => write!(f, "Enthusiastic"),
            Tone::Polite => write!(f, "Polite"),
            Tone::Urgent => write!(f, "Urgent"),
            Tone::Casual => write!(f, "Casual"),
        }
    }
}

/// Classifier verdict for a single message. `score` is the classifier's
/// confidence/intensity in [0, 1], rounded to 3 decimals.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
    pub tone: Tone,
}
