//! Combat DNA Core Library
//!
//! Turns round-by-round fight statistics into per-fight metrics, averages the
//! fights a user rated into a Combat DNA profile, compares it with the
//! population baseline and picks recommendations.

pub mod config;
pub mod dna;
pub mod error;
pub mod metrics;
pub mod recommend;
pub mod session;
pub mod storage;
pub mod store;
pub mod supabase;
pub mod votes;

pub use config::{DnaConfig, IntensityThresholds, MetricSource};
pub use dna::{
    build_comparison_dataset, compare_to_baseline, compute_profile, Baseline, BaselineComparison, ChartPoint,
    CombatDnaProfile,
};
pub use error::{Error, Result};
pub use metrics::{compute_fight_metric, parse_duration, BoutMeta, NormalizedFightMetric, RawRoundStat};
pub use recommend::{get_recommendation_state, RecommendationState};
pub use session::{BaselineCache, DnaSession, DnaSnapshot};
pub use storage::Database;
pub use store::FightStore;
pub use supabase::SupabaseClient;
pub use votes::{VoteFilter, VoteType};
