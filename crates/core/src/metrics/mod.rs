//! Per-fight metrics derived from round stats

mod aggregate;
mod duration;
mod types;

pub use aggregate::{aggregate_fights, compute_fight_metric, intensity_score, try_fight_metric, INTENSITY_SCALE};
pub use duration::{parse_duration, parse_duration_str, ROUND_MINUTES};
pub use types::*;
