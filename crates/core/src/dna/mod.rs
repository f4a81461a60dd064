//! Combat DNA: profile averaging, baselines and comparison datasets

mod comparison;
mod profile;

pub use comparison::{build_comparison_dataset, ChartPoint, UNKNOWN_FIGHT};
pub use profile::*;
