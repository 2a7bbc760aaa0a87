use anyhow::{bail, Result};

use super::config::{FillerBucket, TierTable};

/// Count range expression: "<N", "<=N", ">N", ">=N", "N-M" (inclusive) or "N".
#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(u64),
    LessEqual(u64),
    GreaterThan(u64),
    GreaterEqual(u64),
    Equal(u64),
    Between(u64, u64),
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if s.contains('-') && !s.starts_with('-') {
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() != 2 {
                bail!("Invalid range format: {}", s)
            }
            let low: u64 = parts[0].trim().parse()?;
            let high: u64 = parts[1].trim().parse()?;
            if low > high {
                bail!("Range lower bound exceeds upper bound: {}", s)
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: u64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// First bucket whose range matches `count`. Buckets with unparseable
/// ranges are skipped (validation reports them at startup).
pub fn match_bucket(count: u64, buckets: &[FillerBucket]) -> Option<&FillerBucket> {
    buckets.iter().find(|bucket| {
        RangeOp::parse(&bucket.range)
            .map(|range| range.matches(count))
            .unwrap_or(false)
    })
}

/// Points of the first tier whose minimum `value` reaches, else the floor.
pub fn tier_points(value: f64, table: &TierTable) -> f64 {
    table
        .tiers
        .iter()
        .find(|tier| value >= tier.min)
        .map(|tier| tier.points)
        .unwrap_or(table.floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::Tier;

    #[test]
    fn test_parse_range_less_than() {
        let range = RangeOp::parse("<100").unwrap();
        assert!(range.matches(50));
        assert!(!range.matches(100));
    }

    #[test]
    fn test_parse_range_less_equal() {
        let range = RangeOp::parse("<=3").unwrap();
        assert!(range.matches(0));
        assert!(range.matches(3));
        assert!(!range.matches(4));
    }

    #[test]
    fn test_parse_range_greater_than() {
        let range = RangeOp::parse("> 6").unwrap();
        assert!(!range.matches(6));
        assert!(range.matches(7));
    }

    #[test]
    fn test_parse_range_greater_equal() {
        let range = RangeOp::parse(">=7").unwrap();
        assert!(!range.matches(6));
        assert!(range.matches(7));
    }

    #[test]
    fn test_parse_range_equal() {
        let range = RangeOp::parse("0").unwrap();
        assert!(range.matches(0));
        assert!(!range.matches(1));
    }

    #[test]
    fn test_parse_range_between() {
        let range = RangeOp::parse("4-6").unwrap();
        assert!(!range.matches(3));
        assert!(range.matches(4));
        assert!(range.matches(6));
        assert!(!range.matches(7));
    }

    #[test]
    fn test_parse_range_invalid() {
        assert!(RangeOp::parse("many").is_err());
        assert!(RangeOp::parse("1-2-3").is_err());
        assert!(RangeOp::parse("6-4").is_err());
        assert!(RangeOp::parse("-3").is_err());
    }

    #[test]
    fn test_match_bucket_first_match_wins() {
        let buckets = vec![
            FillerBucket { range: "<=3".to_string(), points: 15.0 },
            FillerBucket { range: "<=6".to_string(), points: 10.0 },
        ];
        assert_eq!(match_bucket(2, &buckets).map(|b| b.points), Some(15.0));
        assert_eq!(match_bucket(5, &buckets).map(|b| b.points), Some(10.0));
        assert!(match_bucket(9, &buckets).is_none());
    }

    #[test]
    fn test_match_bucket_skips_invalid_ranges() {
        let buckets = vec![
            FillerBucket { range: "bogus".to_string(), points: 1.0 },
            FillerBucket { range: ">=0".to_string(), points: 2.0 },
        ];
        assert_eq!(match_bucket(0, &buckets).map(|b| b.points), Some(2.0));
    }

    #[test]
    fn test_tier_points() {
        let table = TierTable {
            tiers: vec![Tier { min: 0.7, points: 10.0 }, Tier { min: 0.5, points: 6.0 }],
            floor: 3.0,
        };
        assert_eq!(tier_points(0.7, &table), 10.0);
        assert_eq!(tier_points(0.69, &table), 6.0);
        assert_eq!(tier_points(0.5, &table), 6.0);
        assert_eq!(tier_points(0.49, &table), 3.0);
        assert_eq!(tier_points(0.0, &table), 3.0);
    }
}
