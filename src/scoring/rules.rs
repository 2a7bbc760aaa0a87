use serde::Serialize;

use super::config::{FillerBucket, FlowMarkers, KeywordGroup, SalutationTier, TierTable};
use super::engine::ScoreItem;
use super::thresholds::{match_bucket, tier_points};

const CONTENT: &str = "Content & Structure";
const LANGUAGE: &str = "Language & Grammar";

/// Upper bound on errors per 100 words; at or beyond it grammar scores 0.
const GRAMMAR_ERROR_CEILING: f64 = 10.0;

/// The built-in scoring rules, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Salutation,
    Keywords,
    Flow,
    Grammar,
    Vocabulary,
    Fillers,
    Sentiment,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::Salutation,
        Rule::Keywords,
        Rule::Flow,
        Rule::Grammar,
        Rule::Vocabulary,
        Rule::Fillers,
        Rule::Sentiment,
    ];

    pub fn weight(self) -> f64 {
        match self {
            Rule::Salutation => 5.0,
            Rule::Keywords => 30.0,
            Rule::Flow => 5.0,
            Rule::Grammar => 10.0,
            Rule::Vocabulary => 10.0,
            Rule::Fillers => 15.0,
            Rule::Sentiment => 15.0,
        }
    }

    pub fn criteria(self) -> &'static str {
        match self {
            Rule::Salutation => "Salutation",
            Rule::Keywords => "Keywords",
            Rule::Flow => "Flow",
            Rule::Grammar => "Grammar",
            Rule::Vocabulary => "Vocabulary (TTR)",
            Rule::Fillers => "Filler Words",
            Rule::Sentiment => "Sentiment",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Rule::Salutation | Rule::Keywords | Rule::Flow | Rule::Sentiment => CONTENT,
            Rule::Grammar | Rule::Vocabulary | Rule::Fillers => LANGUAGE,
        }
    }

    /// Map a rubric criteria name ("Salutation Level", "Key word Presence",
    /// "Filler Word Rate", ...) to the rule it describes.
    pub fn from_criteria(name: &str) -> Option<Rule> {
        let name = name.to_lowercase();
        if name.contains("salutation") || name.contains("greeting") {
            Some(Rule::Salutation)
        } else if name.contains("keyword") || name.contains("key word") {
            Some(Rule::Keywords)
        } else if name.contains("flow") {
            Some(Rule::Flow)
        } else if name.contains("grammar") {
            Some(Rule::Grammar)
        } else if name.contains("vocab") || name.contains("ttr") {
            Some(Rule::Vocabulary)
        } else if name.contains("filler") {
            Some(Rule::Fillers)
        } else if name.contains("sentiment") || name.contains("positivity") {
            Some(Rule::Sentiment)
        } else {
            None
        }
    }
}

/// Theoretical maximum of the overall score.
pub fn max_score() -> f64 {
    Rule::ALL.iter().map(|r| r.weight()).sum()
}

fn contains_any<S: AsRef<str>>(lower: &str, phrases: &[S]) -> bool {
    phrases
        .iter()
        .map(|p| p.as_ref().to_lowercase())
        .any(|p| !p.is_empty() && lower.contains(p.as_str()))
}

/// First tier with any phrase present wins.
pub fn salutation(lower: &str, tiers: &[SalutationTier]) -> ScoreItem {
    match tiers.iter().find(|tier| contains_any(lower, &tier.phrases)) {
        Some(tier) => ScoreItem::new(Rule::Salutation, tier.points, tier.feedback.clone()),
        None => ScoreItem::new(Rule::Salutation, 0.0, "No salutation found."),
    }
}

fn concepts_found<'a>(lower: &str, group: &'a KeywordGroup) -> Vec<&'a str> {
    group
        .concepts
        .iter()
        .filter(|c| contains_any(lower, &c.keywords))
        .map(|c| c.name.as_str())
        .collect()
}

/// Each concept counts once regardless of how many synonyms match.
pub fn keywords(lower: &str, must_have: &KeywordGroup, good_to_have: &KeywordGroup) -> ScoreItem {
    let must = concepts_found(lower, must_have);
    let good = concepts_found(lower, good_to_have);

    let must_score = (must.len() as f64 * must_have.points).min(must_have.cap());
    let good_score = (good.len() as f64 * good_to_have.points).min(good_to_have.cap());

    tracing::debug!(must_have = ?must, good_to_have = ?good, "keyword concepts found");

    ScoreItem::new(
        Rule::Keywords,
        must_score + good_score,
        format!(
            "Must-have: {}/{}. Good-to-have: {}/{}.",
            must.len(),
            must_have.concepts.len(),
            good.len(),
            good_to_have.concepts.len()
        ),
    )
}

/// Result of checking greeting -> introduction -> closing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Ordered,
    Disordered,
    /// No greeting, introduction or closing marker at all
    Undetermined,
}

fn earliest<S: AsRef<str>>(lower: &str, markers: &[S]) -> Option<usize> {
    markers
        .iter()
        .filter(|m| !m.as_ref().is_empty())
        .filter_map(|m| lower.find(m.as_ref().to_lowercase().as_str()))
        .min()
}

fn latest_first_occurrence<S: AsRef<str>>(lower: &str, markers: &[S]) -> Option<usize> {
    markers
        .iter()
        .filter(|m| !m.as_ref().is_empty())
        .filter_map(|m| lower.find(m.as_ref().to_lowercase().as_str()))
        .max()
}

/// Ordered when greeting < introduction < closing. A missing greeting sorts
/// before everything; a missing introduction or closing breaks the order.
///
/// Greeting markers are only located when the salutation rule found a
/// greeting (`greeted`); otherwise words like "good" later in the text are
/// not treated as the opening.
pub fn locate_flow(lower: &str, markers: &FlowMarkers, greeted: bool) -> FlowOutcome {
    let greeting = if greeted {
        earliest(lower, &markers.greetings)
    } else {
        None
    };
    let introduction = latest_first_occurrence(lower, &markers.introductions);
    let closing = earliest(lower, &markers.closings);

    match (greeting, introduction, closing) {
        (None, None, None) => FlowOutcome::Undetermined,
        (g, Some(i), Some(c)) if g.map_or(true, |g| g < i) && i < c => FlowOutcome::Ordered,
        _ => FlowOutcome::Disordered,
    }
}

pub fn flow(outcome: FlowOutcome) -> ScoreItem {
    match outcome {
        FlowOutcome::Ordered => ScoreItem::new(Rule::Flow, 5.0, "Good flow detected."),
        FlowOutcome::Disordered => ScoreItem::new(Rule::Flow, 2.0, "Flow could be improved."),
        FlowOutcome::Undetermined => ScoreItem::new(Rule::Flow, 2.0, "Could not determine flow."),
    }
}

/// Linear penalty on errors per 100 words, reaching 0 at the ceiling.
pub fn grammar(error_count: usize, word_count: usize) -> ScoreItem {
    let score = if word_count > 0 {
        let per_100 = (error_count as f64 / word_count as f64) * 100.0;
        (1.0 - (per_100 / GRAMMAR_ERROR_CEILING).min(1.0)) * Rule::Grammar.weight()
    } else {
        0.0
    };
    ScoreItem::new(Rule::Grammar, score, format!("Errors: {}", error_count))
}

pub fn vocabulary(ttr: f64, table: &TierTable) -> ScoreItem {
    ScoreItem::new(
        Rule::Vocabulary,
        tier_points(ttr, table),
        format!("TTR: {:.2}", ttr),
    )
}

pub fn fillers(count: usize, buckets: &[FillerBucket]) -> ScoreItem {
    let points = match_bucket(count as u64, buckets)
        .map(|b| b.points)
        .unwrap_or(0.0);
    ScoreItem::new(Rule::Fillers, points, format!("Fillers: {}", count))
}

pub fn sentiment(positivity: f64, table: &TierTable) -> ScoreItem {
    ScoreItem::new(
        Rule::Sentiment,
        tier_points(positivity, table),
        format!("Positivity: {:.2}", positivity),
    )
}
