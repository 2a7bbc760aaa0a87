use serde::{Deserialize, Serialize};

/// Rule tables driving the scoring engine.
///
/// Rule weights are fixed; these tables only say how points are earned
/// within each rule. Every field is optional in YAML and falls back to the
/// built-in table.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   salutation:
///     - { phrases: ["hello everyone"], points: 4, feedback: "Found 'Hello everyone' (4/5)" }
///   good_to_have:
///     points: 2
///     concepts:
///       - { name: Fun Fact, keywords: [fact] }
///   fillers:
///     - { range: "<=3", points: 15 }
///     - { range: "4-6", points: 10 }
///     - { range: ">6", points: 5 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Greeting tiers, checked in order; the first tier with a matching
    /// phrase wins even if a later tier would pay more.
    pub salutation: Vec<SalutationTier>,

    /// Concepts every introduction should cover
    pub must_have: KeywordGroup,

    /// Concepts that enrich an introduction
    pub good_to_have: KeywordGroup,

    pub flow: FlowMarkers,

    /// Filler-count buckets, first match wins
    pub fillers: Vec<FillerBucket>,

    /// Type-token ratio tiers
    pub vocabulary: TierTable,

    /// Positivity tiers
    pub sentiment: TierTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            salutation: vec![
                SalutationTier::new(&["hello everyone"], 4.0, "Found 'Hello everyone' (4/5)"),
                SalutationTier::new(
                    &["good morning", "good afternoon", "good evening"],
                    5.0,
                    "Found formal greeting (5/5)",
                ),
                SalutationTier::new(&["hello", "hi"], 3.0, "Found simple greeting (3/5)"),
            ],
            must_have: KeywordGroup {
                points: 4.0,
                concepts: vec![
                    KeywordConcept::new("Name", &["name", "myself", "i am"]),
                    KeywordConcept::new("Age", &["age", "years old"]),
                    KeywordConcept::new("Class/School", &["class", "school", "grade"]),
                    KeywordConcept::new("Family", &["family", "mother", "father"]),
                    KeywordConcept::new("Hobbies", &["hobby", "hobbies", "playing", "enjoy"]),
                ],
            },
            good_to_have: KeywordGroup {
                points: 2.0,
                concepts: vec![
                    KeywordConcept::new("Fun Fact", &["fact"]),
                    KeywordConcept::new("Unique Point", &["unique", "special", "stole"]),
                    KeywordConcept::new("Origin", &["from", "live"]),
                    KeywordConcept::new("Ambition", &["ambition", "goal", "become", "explore"]),
                    KeywordConcept::new("Strengths", &["strength", "kind"]),
                ],
            },
            flow: FlowMarkers::default(),
            fillers: vec![
                FillerBucket::new("<=3", 15.0),
                FillerBucket::new("4-6", 10.0),
                FillerBucket::new(">6", 5.0),
            ],
            vocabulary: TierTable {
                tiers: vec![Tier { min: 0.7, points: 10.0 }, Tier { min: 0.5, points: 6.0 }],
                floor: 3.0,
            },
            sentiment: TierTable {
                tiers: vec![
                    Tier { min: 0.9, points: 15.0 },
                    Tier { min: 0.7, points: 12.0 },
                    Tier { min: 0.5, points: 8.0 },
                ],
                floor: 3.0,
            },
        }
    }
}

/// A greeting tier: any phrase present awards `points`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SalutationTier {
    pub phrases: Vec<String>,
    pub points: f64,
    pub feedback: String,
}

impl SalutationTier {
    pub fn new(phrases: &[&str], points: f64, feedback: &str) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            points,
            feedback: feedback.to_string(),
        }
    }
}

/// A group of concepts each worth `points`; the group is capped at
/// `points * concepts.len()`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordGroup {
    pub points: f64,
    pub concepts: Vec<KeywordConcept>,
}

impl KeywordGroup {
    pub fn cap(&self) -> f64 {
        self.points * self.concepts.len() as f64
    }
}

/// A concept counts once if any of its keywords occurs in the transcript.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordConcept {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordConcept {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Marker phrases used to check the greeting -> introduction -> closing order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FlowMarkers {
    pub greetings: Vec<String>,
    pub introductions: Vec<String>,
    pub closings: Vec<String>,
}

impl Default for FlowMarkers {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            greetings: owned(&["hello", "hi", "good"]),
            introductions: owned(&["name", "myself", "years old"]),
            closings: owned(&["thank"]),
        }
    }
}

/// Filler-count bucket.
/// Range format: "<N", "<=N", ">N", ">=N", "N-M" (inclusive range) or "N"
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FillerBucket {
    pub range: String,
    pub points: f64,
}

impl FillerBucket {
    pub fn new(range: &str, points: f64) -> Self {
        Self {
            range: range.to_string(),
            points,
        }
    }
}

/// Descending threshold tiers with a floor for values below every tier.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TierTable {
    pub tiers: Vec<Tier>,
    pub floor: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Tier {
    pub min: f64,
    pub points: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.salutation.len(), 3);
        assert_eq!(config.salutation[0].phrases, vec!["hello everyone"]);
        assert_eq!(config.must_have.cap(), 20.0);
        assert_eq!(config.good_to_have.cap(), 10.0);
        assert_eq!(config.fillers.len(), 3);
        assert_eq!(config.vocabulary.floor, 3.0);
        assert_eq!(config.sentiment.tiers[0].points, 15.0);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
fillers:
  - { range: "0", points: 15 }
  - { range: ">0", points: 0 }
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.fillers.len(), 2);
        assert_eq!(config.fillers[1].points, 0.0);
        // untouched sections keep the built-in tables
        assert_eq!(config.salutation, ScoringConfig::default().salutation);
        assert_eq!(config.flow, FlowMarkers::default());
    }

    #[test]
    fn test_partial_flow_markers_parse() {
        let yaml = "flow:\n  closings: [thank, bye]\n";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.flow.closings, vec!["thank", "bye"]);
        assert_eq!(config.flow.greetings, vec!["hello", "hi", "good"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "bonus: 10\n";
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
