pub mod config;
pub mod engine;
pub mod rules;
pub mod thresholds;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, ScoreItem, ScoreResult, Scorer};
pub use rules::{max_score, FlowOutcome, Rule};
pub use thresholds::RangeOp;
pub use validation::validate_scoring;
