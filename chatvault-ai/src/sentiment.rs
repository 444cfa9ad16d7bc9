//! Sentiment and tone classification for user messages.
//!
//! Two-tier setup: when a model provider is configured, a chat-completion
//! classifier runs first; any failure falls back to the built-in lexicon
//! scorer, so `SentimentEngine::analyze` always produces a verdict. Tone is
//! a plain keyword heuristic either way.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::debug;

use chatvault_common::models::{Sentiment, SentimentLabel, Tone};
use chatvault_common::Error;

use crate::provider::{ChatProvider, PromptMessage};

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Sentiment, Error>;
}

/// Positive/negative verdicts below this magnitude collapse to Neutral.
const NEUTRAL_BAND: f64 = 0.05;

/// Dampening applied when a valence word sits in the scope of a negator.
const NEGATION_SCALAR: f64 = -0.74;

/// Boost contributed by one intensifier ("very", "extremely", ...).
const INTENSIFIER_BOOST: f64 = 0.293;

/// Per-'!' emphasis, capped at four marks.
const EXCLAMATION_BOOST: f64 = 0.292;

static VALENCE: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("love", 3.2),
        ("loved", 2.9),
        ("best", 3.2),
        ("awesome", 3.1),
        ("great", 3.1),
        ("amazing", 2.8),
        ("excellent", 2.7),
        ("wonderful", 2.7),
        ("perfect", 2.7),
        ("happy", 2.7),
        ("fantastic", 2.6),
        ("glad", 2.1),
        ("good", 1.9),
        ("thanks", 1.9),
        ("thank", 1.9),
        ("helpful", 1.9),
        ("nice", 1.8),
        ("works", 1.4),
        ("fine", 1.1),
        ("worst", -3.1),
        ("hate", -2.7),
        ("horrible", -2.5),
        ("bad", -2.5),
        ("angry", -2.3),
        ("terrible", -2.1),
        ("sad", -2.1),
        ("wrong", -2.1),
        ("awful", -2.0),
        ("annoying", -1.8),
        ("useless", -1.8),
        ("problem", -1.7),
        ("broken", -1.6),
        ("fails", -1.5),
        ("failed", -1.5),
        ("slow", -1.2),
        ("confusing", -1.2),
    ])
});

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "neither", "nor", "cannot", "cant", "wont", "dont",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "absolutely", "so", "totally", "incredibly",
];

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Keyword tone heuristic; first matching bucket wins.
pub fn tone_of(text: &str) -> Tone {
    let lower = text.to_lowercase();
    if ["amazing", "awesome", "great", "!"].iter().any(|w| lower.contains(w)) {
        return Tone::Enthusiastic;
    }
    if ["please", "thank you", "thanks"].iter().any(|p| lower.contains(p)) {
        return Tone::Polite;
    }
    if ["urgent", "asap", "immediately"].iter().any(|u| lower.contains(u)) {
        return Tone::Urgent;
    }
    Tone::Casual
}

/// Self-contained valence-lexicon scorer.
///
/// Sums word valences with negation flipping and intensifier boosts, adds
/// exclamation emphasis, then normalizes to a compound value in [-1, 1].
/// `score` is the absolute compound, rounded to 3 decimals.
#[derive(Default, Clone)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> Sentiment {
        let tokens: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        let mut sum = 0.0_f64;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = VALENCE.get(token.as_str()) else {
                continue;
            };
            let mut v = valence;

            // Look back two tokens for boosters and negation scope.
            let window_start = i.saturating_sub(2);
            for prev in &tokens[window_start..i] {
                if INTENSIFIERS.contains(&prev.as_str()) {
                    v += v.signum() * INTENSIFIER_BOOST;
                }
            }
            let negated = tokens[window_start..i]
                .iter()
                .any(|prev| NEGATORS.contains(&prev.as_str()) || prev.ends_with("n't"));
            if negated {
                v *= NEGATION_SCALAR;
            }

            sum += v;
        }

        if sum != 0.0 {
            let exclamations = text.matches('!').count().min(4) as f64;
            sum += sum.signum() * exclamations * EXCLAMATION_BOOST;
        }

        let compound = (sum / (sum * sum + 15.0).sqrt()).clamp(-1.0, 1.0);

        let label = if compound >= NEUTRAL_BAND {
            SentimentLabel::Positive
        } else if compound <= -NEUTRAL_BAND {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        Sentiment {
            label,
            score: round3(compound.abs()),
            tone: tone_of(text),
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconAnalyzer {
    async fn analyze(&self, text: &str) -> Result<Sentiment, Error> {
        Ok(self.score(text))
    }
}

/// Chat-completion classifier: asks the provider for a JSON verdict.
pub struct ModelAnalyzer {
    provider: Arc<ChatProvider>,
}

impl ModelAnalyzer {
    pub fn new(provider: Arc<ChatProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl SentimentAnalyzer for ModelAnalyzer {
    async fn analyze(&self, text: &str) -> Result<Sentiment, Error> {
        let messages = [
            PromptMessage::system(
                "You are a sentiment classifier. Reply with one JSON object and nothing else: \
                 {\"label\": \"Positive\" | \"Negative\" | \"Neutral\", \"score\": <confidence 0..1>}",
            ),
            PromptMessage::user(text),
        ];
        let reply = self.provider.chat(&messages).await?;

        let verdict: serde_json::Value = serde_json::from_str(reply.trim())
            .map_err(|e| Error::Ai(format!("unparseable sentiment verdict: {e}")))?;

        let raw = verdict["label"].as_str().unwrap_or_default().to_uppercase();
        let label = if raw.contains("POS") {
            SentimentLabel::Positive
        } else if raw.contains("NEG") {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        let score = verdict["score"].as_f64().unwrap_or(0.0).clamp(0.0, 1.0);

        Ok(Sentiment {
            label,
            score: round3(score),
            tone: tone_of(text),
        })
    }
}

/// Model-first, lexicon-fallback classification. Never fails: the lexicon
/// path is infallible.
pub struct SentimentEngine {
    model: Option<ModelAnalyzer>,
    lexicon: LexiconAnalyzer,
}

impl SentimentEngine {
    pub fn lexicon_only() -> Self {
        Self {
            model: None,
            lexicon: LexiconAnalyzer::new(),
        }
    }

    pub fn with_model(provider: Arc<ChatProvider>) -> Self {
        Self {
            model: Some(ModelAnalyzer::new(provider)),
            lexicon: LexiconAnalyzer::new(),
        }
    }

    pub async fn analyze(&self, text: &str) -> Sentiment {
        if let Some(model) = &self.model {
            match model.analyze(text).await {
                Ok(sentiment) => return sentiment,
                Err(e) => {
                    debug!("Model sentiment failed ({}); falling back to lexicon", e);
                }
            }
        }
        self.lexicon.score(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_scores_positive() {
        let s = LexiconAnalyzer::new().score("This is great, I love it!");
        assert_eq!(s.label, SentimentLabel::Positive);
        assert!(s.score > 0.5);
    }

    #[test]
    fn negative_text_scores_negative() {
        let s = LexiconAnalyzer::new().score("This is terrible and broken");
        assert_eq!(s.label, SentimentLabel::Negative);
        assert!(s.score > 0.3);
    }

    #[test]
    fn neutral_text_scores_neutral() {
        let s = LexiconAnalyzer::new().score("The meeting is at three");
        assert_eq!(s.label, SentimentLabel::Neutral);
        assert_eq!(s.score, 0.0);
    }

    #[test]
    fn negation_flips_polarity() {
        let s = LexiconAnalyzer::new().score("this is not good");
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn contraction_negation_flips_polarity() {
        let s = LexiconAnalyzer::new().score("it doesn't work, I don't love it");
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn intensifier_raises_magnitude() {
        let lexicon = LexiconAnalyzer::new();
        let plain = lexicon.score("this is good");
        let boosted = lexicon.score("this is very good");
        assert!(boosted.score > plain.score);
    }

    #[test]
    fn score_is_rounded_to_three_decimals() {
        let s = LexiconAnalyzer::new().score("good");
        assert_eq!(s.score, round3(s.score));
    }

    #[test]
    fn tone_precedence_enthusiastic_first() {
        assert_eq!(tone_of("This is amazing, thanks!"), Tone::Enthusiastic);
        assert_eq!(tone_of("thank you kindly"), Tone::Polite);
        assert_eq!(tone_of("need this asap"), Tone::Urgent);
        assert_eq!(tone_of("hello there"), Tone::Casual);
    }

    #[tokio::test]
    async fn engine_without_model_uses_lexicon() {
        let engine = SentimentEngine::lexicon_only();
        let s = engine.analyze("what a wonderful day").await;
        assert_eq!(s.label, SentimentLabel::Positive);
    }
}
