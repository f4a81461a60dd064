//! The data store the engine reads fights, stats and votes from

use async_trait::async_trait;

use crate::dna::Baseline;
use crate::error::Result;
use crate::metrics::{BoutMeta, FightId, FightStatus, NormalizedFightMetric, RawRoundStat};
use crate::recommend::{ProfileScalars, RankedFight};
use crate::votes::{FightListing, Vote, VoteType};

/// Persistence and ranking collaborator. Implemented by the hosted backend
/// client and by the local SQLite database.
#[async_trait]
pub trait FightStore: Send + Sync {
    /// Round-by-round rows for every bout on the named events
    async fn fetch_raw_round_stats(&self, event_names: &[String]) -> Result<Vec<RawRoundStat>>;

    /// End-of-bout details for every bout on the named events
    async fn fetch_bout_meta(&self, event_names: &[String]) -> Result<Vec<BoutMeta>>;

    /// Pre-joined per-fight metrics for the given fights in `status`
    async fn fetch_precomputed_metrics(
        &self,
        fight_ids: &[FightId],
        status: FightStatus,
    ) -> Result<Vec<NormalizedFightMetric>>;

    async fn fetch_baseline(&self) -> Result<Option<Baseline>>;

    async fn fetch_community_favorites(&self, limit: u32) -> Result<Vec<FightListing>>;

    async fn request_style_recommendations(
        &self,
        user_id: &str,
        scalars: &ProfileScalars,
    ) -> Result<Vec<RankedFight>>;

    /// Upsert the user's vote on a fight, or delete it when `vote` is `None`
    async fn cast_vote(&self, user_id: &str, fight_id: &str, vote: Option<VoteType>) -> Result<()>;

    async fn fetch_user_votes(&self, user_id: &str) -> Result<Vec<Vote>>;

    async fn fetch_fights(&self, fight_ids: &[FightId]) -> Result<Vec<FightListing>>;
}
