use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Default filler lexicon. Matching is raw substring counting, so "like"
/// also hits "likely" and "um" hits "drum".
pub const DEFAULT_FILLERS: &[&str] = &["um", "uh", "like", "you know", "actually", "kinda"];

static WORD_RE: OnceLock<Regex> = OnceLock::new();
static SENTENCE_RE: OnceLock<Regex> = OnceLock::new();

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

fn sentence_re() -> &'static Regex {
    SENTENCE_RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"))
}

/// Maximal runs of word characters with their byte positions.
pub fn word_spans(text: &str) -> regex::Matches<'static, '_> {
    word_re().find_iter(text)
}

/// Iterate over maximal runs of word characters, as written.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    word_spans(text).map(|m| m.as_str())
}

/// Lower-cased word tokens.
pub fn tokens(text: &str) -> Vec<String> {
    words(&text.to_lowercase()).map(str::to_string).collect()
}

pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Pieces produced by splitting on terminal punctuation runs, minus one.
/// Text without terminal punctuation counts as zero sentences.
pub fn sentence_count(text: &str) -> usize {
    sentence_re().split(text).count().saturating_sub(1)
}

/// Unique lower-cased tokens over total tokens, 0.0 for empty input.
pub fn type_token_ratio(text: &str) -> f64 {
    let tokens = tokens(text);
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    unique.len() as f64 / tokens.len() as f64
}

/// Sum of non-overlapping substring occurrences of each filler in the
/// lower-cased text.
pub fn filler_count<S: AsRef<str>>(text: &str, fillers: &[S]) -> usize {
    let lower = text.to_lowercase();
    fillers
        .iter()
        .map(|f| f.as_ref().to_lowercase())
        .filter(|f| !f.is_empty())
        .map(|f| lower.matches(f.as_str()).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_basic() {
        assert_eq!(word_count("Hello, my name is Asha."), 5);
    }

    #[test]
    fn test_word_count_empty() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  ... !!"), 0);
    }

    #[test]
    fn test_word_count_splits_on_apostrophe() {
        // "don't" is two word-character runs
        assert_eq!(word_count("I don't know"), 4);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("Hi. I am Asha! Who are you?"), 3);
    }

    #[test]
    fn test_sentence_count_collapses_punctuation_runs() {
        assert_eq!(sentence_count("Wow!!! Really?!"), 2);
    }

    #[test]
    fn test_sentence_count_never_negative() {
        assert_eq!(sentence_count(""), 0);
        assert_eq!(sentence_count("no punctuation here"), 0);
    }

    #[test]
    fn test_ttr_all_unique() {
        assert_eq!(type_token_ratio("one two three four"), 1.0);
    }

    #[test]
    fn test_ttr_case_insensitive() {
        // "The" and "the" are one type
        assert_eq!(type_token_ratio("The cat the dog"), 0.75);
    }

    #[test]
    fn test_ttr_empty() {
        assert_eq!(type_token_ratio(""), 0.0);
    }

    #[test]
    fn test_filler_count_default_lexicon() {
        let text = "Um, I actually, you know, kinda like it. Uh.";
        assert_eq!(filler_count(text, DEFAULT_FILLERS), 6);
    }

    #[test]
    fn test_filler_count_overcounts_substrings() {
        // "likely" contains "like", "drum" contains "um"
        assert_eq!(filler_count("It is likely a drum", DEFAULT_FILLERS), 2);
    }

    #[test]
    fn test_filler_count_empty() {
        assert_eq!(filler_count("", DEFAULT_FILLERS), 0);
    }

    #[test]
    fn test_filler_count_ignores_empty_entries() {
        assert_eq!(filler_count("anything", &["", "thing"]), 1);
    }
}
