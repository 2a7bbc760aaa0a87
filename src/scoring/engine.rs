use serde::Serialize;

use super::config::ScoringConfig;
use super::rules::{self, Rule};
use crate::features::FeatureExtractor;
use crate::rubric::RubricEntry;

/// One rule's contribution to the overall score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreItem {
    pub category: String,
    pub criteria: String,
    pub weight: f64,
    pub score: f64,
    pub feedback: String,
    #[serde(skip)]
    pub rule: Rule,
}

impl ScoreItem {
    /// Build an item for `rule`, clamping `score` into `[0, weight]`.
    pub fn new(rule: Rule, score: f64, feedback: impl Into<String>) -> Self {
        let weight = rule.weight();
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, weight) };
        Self {
            category: rule.category().to_string(),
            criteria: rule.criteria().to_string(),
            weight,
            score,
            feedback: feedback.into(),
            rule,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Sum of every item's score, not rescaled
    pub overall_score: f64,
    /// Sum of every rule weight
    pub max_score: f64,
    pub breakdown: Vec<ScoreItem>,
}

impl ScoreResult {
    fn from_breakdown(breakdown: Vec<ScoreItem>) -> Self {
        Self {
            overall_score: breakdown.iter().map(|item| item.score).sum(),
            max_score: rules::max_score(),
            breakdown,
        }
    }

    pub fn item(&self, rule: Rule) -> Option<&ScoreItem> {
        self.breakdown.iter().find(|item| item.rule == rule)
    }
}

/// Score a transcript against the rule tables in `config`.
///
/// Never fails: empty or degenerate input lands on each rule's floor.
/// The rubric is accepted as context only; rule weights are fixed.
pub fn calculate_score<F: FeatureExtractor + ?Sized>(
    transcript: &str,
    config: &ScoringConfig,
    features: &F,
    rubric: Option<&[RubricEntry]>,
) -> ScoreResult {
    if let Some(rubric) = rubric {
        tracing::debug!(
            entries = rubric.len(),
            "rubric supplied as context; built-in rule weights apply"
        );
    }

    let lower = transcript.to_lowercase();
    let mut breakdown = Vec::with_capacity(Rule::ALL.len());

    let salutation = rules::salutation(&lower, &config.salutation);
    let greeted = salutation.score > 0.0;
    breakdown.push(salutation);
    breakdown.push(rules::keywords(&lower, &config.must_have, &config.good_to_have));
    breakdown.push(rules::flow(rules::locate_flow(&lower, &config.flow, greeted)));

    let grammar = features.grammar_errors(transcript);
    let words = features.word_count(transcript);
    breakdown.push(rules::grammar(grammar.count, words));

    breakdown.push(rules::vocabulary(
        features.type_token_ratio(transcript),
        &config.vocabulary,
    ));
    breakdown.push(rules::fillers(features.filler_count(transcript), &config.fillers));
    breakdown.push(rules::sentiment(features.positivity(transcript), &config.sentiment));

    for item in &breakdown {
        tracing::debug!(
            criteria = %item.criteria,
            score = item.score,
            weight = item.weight,
            feedback = %item.feedback,
            "rule scored"
        );
    }

    ScoreResult::from_breakdown(breakdown)
}

/// Scoring engine bound to a set of rule tables and a feature extractor.
pub struct Scorer<F> {
    config: ScoringConfig,
    features: F,
}

impl<F: FeatureExtractor> Scorer<F> {
    pub fn new(config: ScoringConfig, features: F) -> Self {
        Self { config, features }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn features(&self) -> &F {
        &self.features
    }

    pub fn score(&self, transcript: &str, rubric: Option<&[RubricEntry]>) -> ScoreResult {
        calculate_score(transcript, &self.config, &self.features, rubric)
    }
}
