use super::config::{KeywordGroup, ScoringConfig, TierTable};
use super::rules::Rule;
use super::thresholds::RangeOp;

fn check_points(errors: &mut Vec<String>, field: &str, points: f64, rule: Rule) {
    if !(0.0..=rule.weight()).contains(&points) {
        errors.push(format!(
            "{}: {} is outside 0-{} ({} weight)",
            field,
            points,
            rule.weight(),
            rule.criteria()
        ));
    }
}

fn check_group(errors: &mut Vec<String>, field: &str, group: &KeywordGroup) {
    if group.points < 0.0 {
        errors.push(format!("{}.points: must be non-negative", field));
    }
    for (i, concept) in group.concepts.iter().enumerate() {
        if concept.keywords.iter().all(|k| k.trim().is_empty()) {
            errors.push(format!(
                "{}.concepts[{}] ({}): needs at least one keyword",
                field, i, concept.name
            ));
        }
    }
}

fn check_tiers(errors: &mut Vec<String>, field: &str, table: &TierTable, rule: Rule) {
    let mut previous_min = f64::INFINITY;
    for (i, tier) in table.tiers.iter().enumerate() {
        if !(0.0..=1.0).contains(&tier.min) {
            errors.push(format!("{}.tiers[{}].min: {} is outside 0-1", field, i, tier.min));
        }
        if tier.min >= previous_min {
            errors.push(format!(
                "{}.tiers[{}].min: tiers must be listed in descending order",
                field, i
            ));
        }
        previous_min = tier.min;
        check_points(errors, &format!("{}.tiers[{}].points", field, i), tier.points, rule);
    }
    check_points(errors, &format!("{}.floor", field), table.floor, rule);
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, tier) in config.salutation.iter().enumerate() {
        if tier.phrases.iter().all(|p| p.trim().is_empty()) {
            errors.push(format!("scoring.salutation[{}].phrases: must not be empty", i));
        }
        check_points(
            &mut errors,
            &format!("scoring.salutation[{}].points", i),
            tier.points,
            Rule::Salutation,
        );
    }

    check_group(&mut errors, "scoring.must_have", &config.must_have);
    check_group(&mut errors, "scoring.good_to_have", &config.good_to_have);

    for (name, markers) in [
        ("greetings", &config.flow.greetings),
        ("introductions", &config.flow.introductions),
        ("closings", &config.flow.closings),
    ] {
        if markers.iter().all(|m| m.trim().is_empty()) {
            errors.push(format!("scoring.flow.{}: must not be empty", name));
        }
    }

    for (i, bucket) in config.fillers.iter().enumerate() {
        if let Err(e) = RangeOp::parse(&bucket.range) {
            errors.push(format!(
                "scoring.fillers[{}].range: invalid '{}' - {}",
                i, bucket.range, e
            ));
        }
        check_points(
            &mut errors,
            &format!("scoring.fillers[{}].points", i),
            bucket.points,
            Rule::Fillers,
        );
    }

    check_tiers(&mut errors, "scoring.vocabulary", &config.vocabulary, Rule::Vocabulary);
    check_tiers(&mut errors, "scoring.sentiment", &config.sentiment, Rule::Sentiment);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
