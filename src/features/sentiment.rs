//! Positivity scoring with the VADER sentiment analyzer.
//!
//! Positivity is VADER's `pos` proportion: the positive share of the
//! sentiment mass after booster words, negation, ALL-CAPS emphasis,
//! exclamation marks and "but" contrast have been applied. Users may layer
//! their own valences over the VADER lexicon.

use std::collections::HashMap;

use unicase::UniCase;
use vader_sentiment::SentimentIntensityAnalyzer;

use super::text;

/// Valence lexicon: user overrides layered over the VADER lexicon.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    overrides: HashMap<String, f64>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides<I, K>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v))
                .collect(),
        }
    }

    /// Valence of a lower-cased word, 0.0 when it carries no sentiment.
    pub fn valence(&self, word: &str) -> f64 {
        self.overrides
            .get(word)
            .or_else(|| vader_sentiment::LEXICON.get(&UniCase::new(word)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Positive share of the sentiment mass in `text`, in `[0, 1]`.
    pub fn positivity(&self, text: &str) -> f64 {
        if text::word_count(text) == 0 {
            return 0.0;
        }

        let pos = if self.overrides.is_empty() {
            positive_share(&SentimentIntensityAnalyzer::new(), text)
        } else {
            let merged: HashMap<UniCase<&str>, f64> = vader_sentiment::LEXICON
                .iter()
                .map(|(word, valence)| (*word, *valence))
                .chain(self.overrides.iter().map(|(word, valence)| (UniCase::new(word.as_str()), *valence)))
                .collect();
            positive_share(&SentimentIntensityAnalyzer::from_lexicon(&merged), text)
        };

        if pos.is_finite() {
            pos.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn positive_share(analyzer: &SentimentIntensityAnalyzer, text: &str) -> f64 {
    analyzer
        .polarity_scores(text)
        .get("pos")
        .copied()
        .unwrap_or(0.0)
}
