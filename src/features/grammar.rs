use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use super::text;

/// A single grammar issue reported by a checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarMatch {
    pub rule_id: String,
    pub message: String,
    /// Start of the flagged span, as reported by the checker
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("grammar service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("grammar service returned HTTP {0}")]
    Status(u16),
}

/// Anything that can find grammar issues in a piece of text.
pub trait GrammarChecker: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, GrammarError>;
}

/// Reports no issues. Used when grammar checking is switched off.
#[derive(Debug, Default)]
pub struct DisabledChecker;

impl GrammarChecker for DisabledChecker {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn check(&self, _text: &str) -> Result<Vec<GrammarMatch>, GrammarError> {
        Ok(Vec::new())
    }
}

/// Offline rule set covering the mistakes most common in spoken transcripts.
#[derive(Debug, Default)]
pub struct HeuristicChecker;

struct Patterns {
    lowercase_i: Regex,
    sentence_start: Regex,
    article: Regex,
    space_before_punct: Regex,
    repeated_spaces: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        lowercase_i: Regex::new(r"\bi\b").expect("valid pattern"),
        sentence_start: Regex::new(r"(?:^\s*|[.!?]\s+)(\p{Ll})").expect("valid pattern"),
        article: Regex::new(r"(?i)\b(an?)\s+(\w+)").expect("valid pattern"),
        space_before_punct: Regex::new(r" +[,.!?;:]").expect("valid pattern"),
        repeated_spaces: Regex::new(r" {2,}").expect("valid pattern"),
    })
}

impl HeuristicChecker {
    fn repeated_words(text: &str, out: &mut Vec<GrammarMatch>) {
        let mut prev: Option<regex::Match> = None;
        for m in text::word_spans(text) {
            if let Some(p) = prev {
                let gap = &text[p.end()..m.start()];
                if !gap.is_empty()
                    && gap.chars().all(char::is_whitespace)
                    && p.as_str().eq_ignore_ascii_case(m.as_str())
                    && !m.as_str().chars().all(|c| c.is_ascii_digit())
                {
                    out.push(GrammarMatch {
                        rule_id: "REPEATED_WORD".to_string(),
                        message: format!("Possible repeated word: '{}'", m.as_str()),
                        offset: p.start(),
                        length: m.end() - p.start(),
                    });
                }
            }
            prev = Some(m);
        }
    }
}

fn starts_with_vowel(word: &str) -> bool {
    matches!(
        word.chars().next().map(|c| c.to_ascii_lowercase()),
        Some('a' | 'e' | 'i' | 'o')
    )
}

fn starts_with_consonant(word: &str) -> bool {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        // 'h' and 'u' go either way ("an hour", "a university")
        Some(c) if c.is_ascii_alphabetic() => !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'h'),
        _ => false,
    }
}

impl GrammarChecker for HeuristicChecker {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, GrammarError> {
        let p = patterns();
        let mut matches = Vec::new();

        Self::repeated_words(text, &mut matches);

        for m in p.lowercase_i.find_iter(text) {
            matches.push(GrammarMatch {
                rule_id: "I_LOWERCASE".to_string(),
                message: "The pronoun 'I' should be capitalized".to_string(),
                offset: m.start(),
                length: m.len(),
            });
        }

        for caps in p.sentence_start.captures_iter(text) {
            if let Some(letter) = caps.get(1) {
                matches.push(GrammarMatch {
                    rule_id: "UPPERCASE_SENTENCE_START".to_string(),
                    message: "Sentence should start with an uppercase letter".to_string(),
                    offset: letter.start(),
                    length: letter.len(),
                });
            }
        }

        for caps in p.article.captures_iter(text) {
            let (Some(article), Some(next)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let suggestion = match article.as_str().to_ascii_lowercase().as_str() {
                "a" if starts_with_vowel(next.as_str()) => "an",
                "an" if starts_with_consonant(next.as_str()) => "a",
                _ => continue,
            };
            matches.push(GrammarMatch {
                rule_id: "EN_A_VS_AN".to_string(),
                message: format!(
                    "Use '{}' instead of '{}' before '{}'",
                    suggestion,
                    article.as_str(),
                    next.as_str()
                ),
                offset: article.start(),
                length: next.end() - article.start(),
            });
        }

        for m in p.space_before_punct.find_iter(text) {
            matches.push(GrammarMatch {
                rule_id: "WHITESPACE_BEFORE_PUNCTUATION".to_string(),
                message: "Remove the space before punctuation".to_string(),
                offset: m.start(),
                length: m.len(),
            });
        }

        for m in p.repeated_spaces.find_iter(text) {
            matches.push(GrammarMatch {
                rule_id: "WHITESPACE_RULE".to_string(),
                message: "Possible typo: repeated whitespace".to_string(),
                offset: m.start(),
                length: m.len(),
            });
        }

        matches.sort_by_key(|m| (m.offset, m.length));
        Ok(matches)
    }
}

/// Client for a LanguageTool HTTP server (self-hosted or the public API).
pub struct LanguageToolClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    matches: Vec<RemoteMatch>,
}

#[derive(Debug, Deserialize)]
struct RemoteMatch {
    message: String,
    offset: usize,
    length: usize,
    rule: RemoteRule,
}

#[derive(Debug, Deserialize)]
struct RemoteRule {
    id: String,
}

impl From<RemoteMatch> for GrammarMatch {
    fn from(m: RemoteMatch) -> Self {
        GrammarMatch {
            rule_id: m.rule.id,
            message: m.message,
            offset: m.offset,
            length: m.length,
        }
    }
}

impl LanguageToolClient {
    /// Build a client for `base_url` (e.g. `https://api.languagetool.org/v2`).
    /// `timeout` bounds every request; a timed-out check is an error.
    pub fn new(base_url: &str, language: &str, timeout: Duration) -> Result<Self, GrammarError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("intro-scorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: check_endpoint(base_url),
            language: language.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn check_endpoint(base_url: &str) -> String {
    format!("{}/check", base_url.trim_end_matches('/'))
}

fn parse_check_response(body: CheckResponse) -> Vec<GrammarMatch> {
    body.matches.into_iter().map(GrammarMatch::from).collect()
}

impl GrammarChecker for LanguageToolClient {
    fn name(&self) -> &'static str {
        "languagetool"
    }

    fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, GrammarError> {
        if text::word_count(text) == 0 {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GrammarError::Status(status.as_u16()));
        }

        let body: CheckResponse = response.json()?;
        Ok(parse_check_response(body))
    }
}
