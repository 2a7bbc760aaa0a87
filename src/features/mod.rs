pub mod grammar;
pub mod sentiment;
pub mod similarity;
pub mod text;

pub use grammar::{
    DisabledChecker, GrammarChecker, GrammarError, GrammarMatch, HeuristicChecker,
    LanguageToolClient,
};
pub use sentiment::Lexicon;
#[cfg(feature = "embeddings")]
pub use similarity::SentenceEmbeddings;
pub use similarity::{SimilarityModel, TermFrequency};

/// Grammar check outcome: the error count and the individual findings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrammarReport {
    pub count: usize,
    pub matches: Vec<GrammarMatch>,
}

impl GrammarReport {
    pub fn from_matches(matches: Vec<GrammarMatch>) -> Self {
        Self {
            count: matches.len(),
            matches,
        }
    }
}

/// Derived textual features consumed by the scoring rules.
///
/// Implementations must not fail: a backend that cannot answer degrades to
/// a neutral value (e.g. zero grammar errors) instead of returning an error.
pub trait FeatureExtractor {
    /// Similarity of two texts in `[-1, 1]`. Symmetric.
    fn semantic_similarity(&self, a: &str, b: &str) -> f64;

    fn grammar_errors(&self, text: &str) -> GrammarReport;

    fn word_count(&self, text: &str) -> usize;

    fn sentence_count(&self, text: &str) -> usize;

    /// Unique over total lower-cased word tokens, in `[0, 1]`.
    fn type_token_ratio(&self, text: &str) -> f64;

    fn filler_count(&self, text: &str) -> usize;

    /// Positive sentiment proportion in `[0, 1]`.
    fn positivity(&self, text: &str) -> f64;
}

/// Default feature extractor: regex tokenisation, VADER positivity, and
/// pluggable similarity and grammar backends.
pub struct TextAnalyzer {
    grammar: Box<dyn GrammarChecker>,
    similarity: Box<dyn SimilarityModel>,
    lexicon: Lexicon,
    fillers: Vec<String>,
}

impl TextAnalyzer {
    pub fn new(grammar: Box<dyn GrammarChecker>) -> Self {
        Self {
            grammar,
            similarity: Box::new(TermFrequency),
            lexicon: Lexicon::new(),
            fillers: text::DEFAULT_FILLERS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn with_similarity(mut self, similarity: Box<dyn SimilarityModel>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_fillers(mut self, fillers: Vec<String>) -> Self {
        self.fillers = fillers;
        self
    }

    pub fn fillers(&self) -> &[String] {
        &self.fillers
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(Box::new(HeuristicChecker))
    }
}

impl FeatureExtractor for TextAnalyzer {
    fn semantic_similarity(&self, a: &str, b: &str) -> f64 {
        match self.similarity.similarity(a, b) {
            Ok(score) if score.is_finite() => score.clamp(-1.0, 1.0),
            Ok(_) => 0.0,
            Err(e) => {
                tracing::warn!(
                    backend = self.similarity.name(),
                    error = %e,
                    "similarity model unavailable, using term frequencies"
                );
                similarity::cosine_similarity(a, b)
            }
        }
    }

    fn grammar_errors(&self, text: &str) -> GrammarReport {
        match self.grammar.check(text) {
            Ok(matches) => {
                tracing::debug!(
                    backend = self.grammar.name(),
                    errors = matches.len(),
                    "grammar check complete"
                );
                GrammarReport::from_matches(matches)
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.grammar.name(),
                    error = %e,
                    "grammar check unavailable, counting zero errors"
                );
                GrammarReport::default()
            }
        }
    }

    fn word_count(&self, text: &str) -> usize {
        text::word_count(text)
    }

    fn sentence_count(&self, text: &str) -> usize {
        text::sentence_count(text)
    }

    fn type_token_ratio(&self, text: &str) -> f64 {
        text::type_token_ratio(text)
    }

    fn filler_count(&self, text: &str) -> usize {
        text::filler_count(text, &self.fillers)
    }

    fn positivity(&self, text: &str) -> f64 {
        self.lexicon.positivity(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingChecker;

    impl GrammarChecker for FailingChecker {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn check(&self, _text: &str) -> Result<Vec<GrammarMatch>, GrammarError> {
            Err(GrammarError::Status(503))
        }
    }

    #[test]
    fn test_grammar_failure_degrades_to_zero() {
        let analyzer = TextAnalyzer::new(Box::new(FailingChecker));
        let report = analyzer.grammar_errors("this text has a error");
        assert_eq!(report, GrammarReport::default());
        assert_eq!(report.count, 0);
    }

    struct FailingSimilarity;

    impl SimilarityModel for FailingSimilarity {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn similarity(&self, _a: &str, _b: &str) -> anyhow::Result<f64> {
            anyhow::bail!("model not loaded")
        }
    }

    struct OutOfRangeSimilarity;

    impl SimilarityModel for OutOfRangeSimilarity {
        fn name(&self) -> &'static str {
            "out-of-range"
        }

        fn similarity(&self, _a: &str, _b: &str) -> anyhow::Result<f64> {
            Ok(3.0)
        }
    }

    #[test]
    fn test_similarity_failure_falls_back_to_term_frequency() {
        let analyzer = TextAnalyzer::default().with_similarity(Box::new(FailingSimilarity));
        let s = analyzer.semantic_similarity("a b", "a c");
        assert!((s - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_clamped() {
        let analyzer = TextAnalyzer::default().with_similarity(Box::new(OutOfRangeSimilarity));
        assert_eq!(analyzer.semantic_similarity("a", "b"), 1.0);
    }

    #[test]
    fn test_grammar_report_counts_matches() {
        let analyzer = TextAnalyzer::default();
        let report = analyzer.grammar_errors("i like the the park");
        assert_eq!(report.count, report.matches.len());
        assert!(report.count >= 2);
    }

    #[test]
    fn test_custom_fillers() {
        let analyzer = TextAnalyzer::default().with_fillers(vec!["basically".to_string()]);
        assert_eq!(analyzer.filler_count("Basically, um, basically."), 2);
    }

    #[test]
    fn test_default_fillers() {
        let analyzer = TextAnalyzer::default();
        assert_eq!(analyzer.fillers().len(), 6);
        assert_eq!(analyzer.filler_count("um uh"), 2);
    }

    #[test]
    fn test_custom_lexicon() {
        let analyzer =
            TextAnalyzer::default().with_lexicon(Lexicon::with_overrides([("painting", 2.0)]));
        assert!((analyzer.positivity("painting") - 1.0).abs() < 2e-3);
    }

    #[test]
    fn test_counts_delegate_to_text() {
        let analyzer = TextAnalyzer::new(Box::new(DisabledChecker));
        assert_eq!(analyzer.word_count("one two three."), 3);
        assert_eq!(analyzer.sentence_count("One. Two."), 2);
        assert_eq!(analyzer.type_token_ratio("a a"), 0.5);
        assert_eq!(analyzer.semantic_similarity("", "x"), 0.0);
    }
}
