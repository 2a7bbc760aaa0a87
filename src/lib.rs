//! Scores spoken self-introduction transcripts against a communication
//! rubric: greeting, content coverage, flow, grammar, vocabulary, filler
//! words and sentiment, each with a fixed weight and written feedback.

pub mod config;
pub mod features;
pub mod logging;
pub mod output;
pub mod rubric;
pub mod scoring;

pub use features::{FeatureExtractor, TextAnalyzer};
pub use rubric::RubricEntry;
pub use scoring::{calculate_score, ScoreItem, ScoreResult, Scorer, ScoringConfig};
