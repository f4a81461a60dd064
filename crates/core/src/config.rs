//! Tunable domain settings

use serde::{Deserialize, Serialize};

/// Where per-fight metrics come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// Pre-joined metric rows served by the store
    #[default]
    Precomputed,
    /// Round stats and bout meta, aggregated locally
    RawRounds,
}

impl MetricSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "precomputed" => Some(MetricSource::Precomputed),
            "raw" | "raw_rounds" => Some(MetricSource::RawRounds),
            _ => None,
        }
    }
}

/// Intensity score cut-offs for the grappling style labels (strictly greater than)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityThresholds {
    pub mauler: f64,
    pub active_grappler: f64,
}

impl Default for IntensityThresholds {
    fn default() -> Self {
        Self {
            mauler: 12.0,
            active_grappler: 7.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnaConfig {
    /// Positive votes needed before style matching replaces community favorites
    pub min_rated_fights: usize,
    /// Size of the community favorites list
    pub community_limit: u32,
    pub metric_source: MetricSource,
    pub intensity_thresholds: IntensityThresholds,
}

impl Default for DnaConfig {
    fn default() -> Self {
        Self {
            min_rated_fights: 5,
            community_limit: 10,
            metric_source: MetricSource::default(),
            intensity_thresholds: IntensityThresholds::default(),
        }
    }
}
