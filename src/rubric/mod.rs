//! Rubric provider boundary.
//!
//! A rubric is an ordered list of `{category, criteria, weight}` rows. The
//! scoring engine takes it as optional context only; its own rule weights
//! are fixed. [`rubric_weight_mismatches`] surfaces rows that disagree with
//! those weights so the difference is visible rather than silently applied.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::scoring::Rule;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RubricEntry {
    pub category: String,
    pub criteria: String,
    pub weight: f64,
}

/// A rubric row whose weight differs from the built-in weight of its rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RubricMismatch {
    pub criteria: String,
    pub rubric_weight: f64,
    pub rule: Rule,
}

impl RubricMismatch {
    pub fn rule_weight(&self) -> f64 {
        self.rule.weight()
    }
}

/// Load a rubric from a YAML file, or JSON when the extension is `.json`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any
/// weight is negative.
pub fn load_rubric(path: &Path) -> Result<Vec<RubricEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rubric file at {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let entries: Vec<RubricEntry> = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse rubric JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse rubric YAML in {}", path.display()))?
    };

    if let Some(bad) = entries.iter().find(|e| e.weight < 0.0 || e.weight.is_nan()) {
        anyhow::bail!(
            "Rubric criteria '{}' has invalid weight {} (must be non-negative)",
            bad.criteria,
            bad.weight
        );
    }

    Ok(entries)
}

/// Rubric rows that name a built-in rule but carry a different weight.
/// Rows naming no known rule are ignored.
pub fn rubric_weight_mismatches(rubric: &[RubricEntry]) -> Vec<RubricMismatch> {
    rubric
        .iter()
        .filter_map(|entry| {
            let rule = Rule::from_criteria(&entry.criteria)?;
            ((entry.weight - rule.weight()).abs() > f64::EPSILON).then(|| RubricMismatch {
                criteria: entry.criteria.clone(),
                rubric_weight: entry.weight,
                rule,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_rubric() {
        let file = write_temp(
            ".yaml",
            r#"
- category: Content & Structure
  criteria: Salutation Level
  weight: 5
- category: Language & Grammar
  criteria: Grammar
  weight: 20
"#,
        );
        let rubric = load_rubric(file.path()).unwrap();
        assert_eq!(rubric.len(), 2);
        assert_eq!(rubric[0].criteria, "Salutation Level");
        assert_eq!(rubric[1].weight, 20.0);
    }

    #[test]
    fn test_load_json_rubric() {
        let file = write_temp(
            ".json",
            r#"[{"category": "Content & Structure", "criteria": "Flow", "weight": 5}]"#,
        );
        let rubric = load_rubric(file.path()).unwrap();
        assert_eq!(
            rubric,
            vec![RubricEntry {
                category: "Content & Structure".to_string(),
                criteria: "Flow".to_string(),
                weight: 5.0,
            }]
        );
    }

    #[test]
    fn test_load_empty_rubric() {
        let file = write_temp(".json", "[]");
        assert!(load_rubric(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let file = write_temp(
            ".json",
            r#"[{"category": "X", "criteria": "Flow", "weight": -1}]"#,
        );
        let err = load_rubric(file.path()).unwrap_err();
        assert!(err.to_string().contains("Flow"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_rubric(Path::new("/nonexistent/rubric.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read rubric file"));
    }

    #[test]
    fn test_weight_mismatches() {
        let rubric = vec![
            RubricEntry {
                category: "Content & Structure".to_string(),
                criteria: "Salutation Level".to_string(),
                weight: 5.0,
            },
            RubricEntry {
                category: "Language & Grammar".to_string(),
                criteria: "Grammar".to_string(),
                weight: 20.0,
            },
            RubricEntry {
                category: "Speech Rate".to_string(),
                criteria: "Speech rate (words per minute)".to_string(),
                weight: 10.0,
            },
        ];
        let mismatches = rubric_weight_mismatches(&rubric);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].rule, Rule::Grammar);
        assert_eq!(mismatches[0].rubric_weight, 20.0);
        assert_eq!(mismatches[0].rule_weight(), 10.0);
    }
}
