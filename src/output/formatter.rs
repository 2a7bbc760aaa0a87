use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{ScoreItem, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with one decimal, dropping a trailing ".0" ("12", "7.5")
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// "Overall: 73/90"
pub fn format_overall(result: &ScoreResult, use_colors: bool) -> String {
    let overall = format_score(result.overall_score);
    let max = format_score(result.max_score);
    if use_colors {
        format!("Overall: {}/{}", overall.bold(), max)
    } else {
        format!("Overall: {}/{}", overall, max)
    }
}

fn score_ratio(item: &ScoreItem) -> f64 {
    if item.weight > 0.0 {
        item.score / item.weight
    } else {
        0.0
    }
}

/// Format the breakdown as one aligned line per criterion.
/// Columns: criteria (18 chars), score/weight right-aligned (7 chars), feedback
pub fn format_breakdown(result: &ScoreResult, use_colors: bool) -> String {
    let criteria_width = 18;
    let score_width = 7;
    let separator = "  ";
    let term_width = get_terminal_width();

    result
        .breakdown
        .iter()
        .map(|item| {
            let criteria = format!("{:<width$}", item.criteria, width = criteria_width);
            let ratio = format!(
                "{}/{}",
                format_score(item.score),
                format_score(item.weight)
            );
            let ratio_padded = format!("{:>width$}", ratio, width = score_width);

            let fixed_width = criteria_width + score_width + separator.len() * 2;
            let feedback = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(&item.feedback, width - fixed_width)
                }
                Some(_) => truncate(&item.feedback, 20),
                None => item.feedback.clone(),
            };

            if use_colors {
                let ratio_colored = match score_ratio(item) {
                    r if r >= 0.8 => ratio_padded.green().to_string(),
                    r if r >= 0.5 => ratio_padded.yellow().to_string(),
                    _ => ratio_padded.red().to_string(),
                };
                format!(
                    "{}{}{}{}{}",
                    criteria.bold(),
                    separator,
                    ratio_colored,
                    separator,
                    feedback.dimmed()
                )
            } else {
                format!(
                    "{}{}{}{}{}",
                    criteria, separator, ratio_padded, separator, feedback
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overall line followed by the breakdown
pub fn format_report(result: &ScoreResult, use_colors: bool) -> String {
    format!(
        "{}\n{}",
        format_overall(result, use_colors),
        format_breakdown(result, use_colors)
    )
}

/// Format the breakdown as tab-separated values for scripting
/// Columns: criteria, score, weight, feedback (no headers, no colors),
/// followed by an "overall" row
pub fn format_tsv(result: &ScoreResult) -> String {
    result
        .breakdown
        .iter()
        .map(|item| {
            format!(
                "{}\t{}\t{}\t{}",
                item.criteria,
                format_score(item.score),
                format_score(item.weight),
                item.feedback
            )
        })
        .chain(std::iter::once(format!(
            "overall\t{}\t{}\t",
            format_score(result.overall_score),
            format_score(result.max_score)
        )))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_json(result: &ScoreResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize score result")
}

/// A score result tagged with the transcript it came from
#[derive(Serialize)]
pub struct SourcedResult<'a> {
    pub source: &'a str,
    #[serde(flatten)]
    pub result: &'a ScoreResult,
}

/// Format several results as one JSON array
pub fn format_json_batch(results: &[SourcedResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize score results")
}
