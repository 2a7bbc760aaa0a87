use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::ScoringConfig;

pub const DEFAULT_LANGUAGETOOL_URL: &str = "https://api.languagetool.org/v2";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub analysis: Option<AnalysisConfig>,

    #[serde(default)]
    pub grammar: Option<GrammarConfig>,
}

/// Feature extraction tuning.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Replaces the default filler lexicon when set
    #[serde(default)]
    pub fillers: Option<Vec<String>>,

    /// Extra or overriding sentiment valences, e.g. `brilliant: 2.8`
    #[serde(default)]
    pub lexicon: BTreeMap<String, f64>,

    #[serde(default)]
    pub similarity: SimilarityBackend,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBackend {
    /// Bag-of-words cosine
    #[default]
    TermFrequency,
    /// Sentence embeddings; requires the `embeddings` build feature
    Embeddings,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GrammarBackend {
    #[default]
    Heuristic,
    LanguageTool,
    Disabled,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GrammarConfig {
    #[serde(default)]
    pub backend: GrammarBackend,

    /// LanguageTool base URL (without the trailing `/check`)
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout, humantime syntax ("10s", "1500ms")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

fn default_url() -> String {
    DEFAULT_LANGUAGETOOL_URL.to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout() -> String {
    "10s".to_string()
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            backend: GrammarBackend::default(),
            url: default_url(),
            language: default_language(),
            timeout: default_timeout(),
        }
    }
}
