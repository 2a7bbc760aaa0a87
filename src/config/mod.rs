mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{
    AnalysisConfig, Config, GrammarBackend, GrammarConfig, SimilarityBackend,
    DEFAULT_LANGUAGETOOL_URL,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::features::{
    DisabledChecker, GrammarChecker, HeuristicChecker, LanguageToolClient, Lexicon,
    SimilarityModel, TermFrequency, TextAnalyzer,
};
use crate::scoring::{validate_scoring, ScoringConfig};

/// Get the config directory path (~/.config/intro-scorer/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("intro-scorer"))
}

/// Get the default config file path (~/.config/intro-scorer/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path,
///   and a missing default file yields the built-in defaults.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

impl Config {
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn effective_grammar(&self) -> GrammarConfig {
        self.grammar.clone().unwrap_or_default()
    }

    /// Fill every omitted section with its defaults.
    pub fn resolved(&self) -> Config {
        Config {
            scoring: Some(self.effective_scoring()),
            analysis: Some(self.analysis.clone().unwrap_or_default()),
            grammar: Some(self.effective_grammar()),
        }
    }
}

impl GrammarConfig {
    pub fn timeout_duration(&self) -> Result<Duration> {
        humantime::parse_duration(self.timeout.trim())
            .with_context(|| format!("invalid grammar timeout '{}'", self.timeout))
    }

    pub fn build_checker(&self) -> Result<Box<dyn GrammarChecker>> {
        let checker: Box<dyn GrammarChecker> = match self.backend {
            GrammarBackend::Heuristic => Box::new(HeuristicChecker),
            GrammarBackend::Disabled => Box::new(DisabledChecker),
            GrammarBackend::LanguageTool => Box::new(
                LanguageToolClient::new(&self.url, &self.language, self.timeout_duration()?)
                    .context("Failed to create LanguageTool client")?,
            ),
        };
        Ok(checker)
    }
}

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = match config.scoring.as_ref().map(validate_scoring) {
        Some(Err(errors)) => errors,
        _ => Vec::new(),
    };

    if let Some(ref grammar) = config.grammar {
        if let Err(e) = grammar.timeout_duration() {
            errors.push(format!("grammar.timeout: {:#}", e));
        }
        if grammar.backend == GrammarBackend::LanguageTool && grammar.url.trim().is_empty() {
            errors.push("grammar.url: required for the languagetool backend".to_string());
        }
    }

    if let Some(ref analysis) = config.analysis {
        if let Some(ref fillers) = analysis.fillers {
            if fillers.iter().any(|f| f.trim().is_empty()) {
                errors.push("analysis.fillers: entries must not be empty".to_string());
            }
        }
        for (word, valence) in &analysis.lexicon {
            if !valence.is_finite() {
                errors.push(format!("analysis.lexicon.{}: valence must be a number", word));
            }
        }
        if analysis.similarity == SimilarityBackend::Embeddings && !cfg!(feature = "embeddings") {
            errors.push(
                "analysis.similarity: embeddings requires building with the `embeddings` feature"
                    .to_string(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn build_similarity(backend: SimilarityBackend) -> Result<Box<dyn SimilarityModel>> {
    match backend {
        SimilarityBackend::TermFrequency => Ok(Box::new(TermFrequency)),
        #[cfg(feature = "embeddings")]
        SimilarityBackend::Embeddings => Ok(Box::new(crate::features::SentenceEmbeddings::new()?)),
        #[cfg(not(feature = "embeddings"))]
        SimilarityBackend::Embeddings => {
            anyhow::bail!("similarity backend 'embeddings' needs the `embeddings` build feature")
        }
    }
}

/// Build the feature extractor described by `config`.
pub fn build_analyzer(config: &Config) -> Result<TextAnalyzer> {
    let grammar = config.effective_grammar();
    let mut analyzer = TextAnalyzer::new(grammar.build_checker()?);
    tracing::debug!(backend = ?grammar.backend, "grammar checker ready");

    if let Some(ref analysis) = config.analysis {
        if let Some(ref fillers) = analysis.fillers {
            analyzer = analyzer.with_fillers(fillers.clone());
        }
        if !analysis.lexicon.is_empty() {
            analyzer = analyzer.with_lexicon(Lexicon::with_overrides(
                analysis.lexicon.iter().map(|(k, v)| (k.clone(), *v)),
            ));
        }
        analyzer = analyzer.with_similarity(build_similarity(analysis.similarity)?);
    }

    Ok(analyzer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureExtractor;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
scoring:
  fillers:
    - { range: "0", points: 15 }
    - { range: ">0", points: 5 }
analysis:
  fillers: [basically]
  lexicon:
    painting: 2.0
grammar:
  backend: disabled
  timeout: 2s
"#,
        );
        let config = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.effective_scoring().fillers.len(), 2);
        assert_eq!(config.effective_grammar().backend, GrammarBackend::Disabled);
        assert_eq!(
            config.effective_grammar().timeout_duration().unwrap(),
            Duration::from_secs(2)
        );
        assert!(validate_config(&config).is_ok());

        let analyzer = build_analyzer(&config).unwrap();
        assert_eq!(analyzer.filler_count("basically um"), 1);
        assert!((analyzer.positivity("painting") - 1.0).abs() < 2e-3);
        assert_eq!(analyzer.grammar_errors("i i").count, 0);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let file = write_config("{}\n");
        let config = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
        assert_eq!(config.effective_grammar(), GrammarConfig::default());
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let err = load_config(Some(PathBuf::from("/nonexistent/intro-scorer.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let file = write_config("scoring: [not, a, map]\n");
        let err = load_config(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_unknown_section_is_error() {
        let file = write_config("queries: []\n");
        assert!(load_config(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_grammar_backend_names() {
        let file = write_config("grammar:\n  backend: languagetool\n  url: http://localhost:8081/v2\n");
        let config = load_config(Some(file.path().to_path_buf())).unwrap();
        let grammar = config.effective_grammar();
        assert_eq!(grammar.backend, GrammarBackend::LanguageTool);
        assert_eq!(grammar.language, "en-US");
        assert_eq!(grammar.timeout, "10s");
    }

    #[test]
    fn test_validate_config_collects_errors() {
        let mut scoring = ScoringConfig::default();
        scoring.salutation[0].points = 9.0;
        let config = Config {
            scoring: Some(scoring),
            analysis: Some(AnalysisConfig {
                fillers: Some(vec![" ".to_string()]),
                ..AnalysisConfig::default()
            }),
            grammar: Some(GrammarConfig {
                timeout: "soon".to_string(),
                ..GrammarConfig::default()
            }),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("scoring.salutation[0].points"));
        assert!(errors[1].contains("grammar.timeout"));
        assert!(errors[2].contains("analysis.fillers"));
    }

    #[test]
    fn test_resolved_fills_sections() {
        let resolved = Config::default().resolved();
        assert_eq!(resolved.scoring, Some(ScoringConfig::default()));
        assert_eq!(resolved.grammar, Some(GrammarConfig::default()));
        assert!(resolved.analysis.is_some());
    }

    #[test]
    fn test_similarity_backend_parse() {
        let file = write_config("analysis:\n  similarity: term_frequency\n");
        let config = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(
            config.analysis.unwrap().similarity,
            SimilarityBackend::TermFrequency
        );
    }

    #[cfg(not(feature = "embeddings"))]
    #[test]
    fn test_embeddings_without_feature_is_config_error() {
        let config = Config {
            analysis: Some(AnalysisConfig {
                similarity: SimilarityBackend::Embeddings,
                ..AnalysisConfig::default()
            }),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("analysis.similarity"));
        assert!(build_analyzer(&config).is_err());
    }
}
