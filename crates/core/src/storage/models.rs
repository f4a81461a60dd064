//! Database models

use serde::{Deserialize, Serialize};

use crate::dna::Baseline;

/// `user_votes` row before its vote type is validated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVote {
    pub user_id: String,
    pub fight_id: String,
    pub vote_type: String,
}

/// Outcome of rebuilding the metric cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRefresh {
    pub completed_fights: usize,
    /// Completed fights that had round stats and a usable duration
    pub aggregated: usize,
    pub baseline: Option<Baseline>,
}
