//! Per-user DNA session: vote, recompute, keep the freshest snapshot.
//!
//! Every vote and every filter change triggers a recompute. Recomputes for one
//! session run one at a time in arrival order, and a result only replaces the
//! stored snapshot if no newer one has been installed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::config::{DnaConfig, MetricSource};
use crate::dna::{
    build_comparison_dataset, compute_profile, Baseline, ChartPoint, CombatDnaProfile, IntensityLabel,
    ProfileComparison, TargetDistribution,
};
use crate::error::{Error, Result};
use crate::metrics::{aggregate_fights, FightStatus, NormalizedFightMetric};
use crate::recommend::{
    build_request, fetch_recommendations, positive_vote_count, recommendation_state, Recommendation,
    RecommendationState,
};
use crate::store::FightStore;
use crate::votes::{filter_rated, join_rated_fights, FightRecord, VoteFilter, VoteType};

/// Baseline fetched once and shared; falls back to the built-in defaults
/// without caching when the store has none or cannot be reached.
#[derive(Default)]
pub struct BaselineCache {
    cell: OnceCell<Baseline>,
}

impl BaselineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, store: &dyn FightStore) -> Baseline {
        let result = self
            .cell
            .get_or_try_init(|| async {
                match store.fetch_baseline().await? {
                    Some(baseline) => {
                        debug!("Baseline cached from store");
                        Ok::<_, Error>(baseline)
                    }
                    None => Err(Error::Store("no baseline row".to_string())),
                }
            })
            .await;

        match result {
            Ok(baseline) => baseline.clone(),
            Err(e) => {
                warn!("Using default baseline: {}", e);
                Baseline::default()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaSnapshot {
    pub generation: u64,
    pub filter: VoteFilter,
    /// Rated fights whose vote passes the filter
    pub rated_count: usize,
    pub profile: Option<CombatDnaProfile>,
    pub baseline: Baseline,
    pub comparison: Option<ProfileComparison>,
    pub intensity_label: Option<IntensityLabel>,
    pub target_distribution: Option<TargetDistribution>,
    pub points: Vec<ChartPoint>,
    pub state: RecommendationState,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub fight_id: String,
    /// Vote left in place after the toggle
    pub vote: Option<VoteType>,
    pub snapshot: Arc<DnaSnapshot>,
}

pub struct DnaSession {
    store: Arc<dyn FightStore>,
    user_id: String,
    config: DnaConfig,
    baseline: Arc<BaselineCache>,
    generation: AtomicU64,
    recompute_lock: Mutex<()>,
    latest: RwLock<Option<Arc<DnaSnapshot>>>,
}

impl DnaSession {
    pub fn new(
        store: Arc<dyn FightStore>,
        user_id: impl Into<String>,
        config: DnaConfig,
        baseline: Arc<BaselineCache>,
    ) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            config,
            baseline,
            generation: AtomicU64::new(0),
            recompute_lock: Mutex::new(()),
            latest: RwLock::new(None),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Last installed snapshot, for display while a recompute is in flight
    /// or after one failed
    pub fn latest(&self) -> Option<Arc<DnaSnapshot>> {
        self.latest.read().ok().and_then(|slot| slot.clone())
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a vote click (toggle against the current vote), then recompute
    pub async fn vote(&self, fight_id: &str, clicked: VoteType, filter: VoteFilter) -> Result<VoteOutcome> {
        let generation = self.next_generation();
        let _guard = self.recompute_lock.lock().await;

        let current = self
            .store
            .fetch_user_votes(&self.user_id)
            .await?
            .into_iter()
            .find(|v| v.fight_id == fight_id)
            .map(|v| v.vote_type);
        let vote = VoteType::toggle(current, clicked);
        self.store.cast_vote(&self.user_id, fight_id, vote).await?;
        debug!(user_id = %self.user_id, fight_id, ?current, ?vote, "Vote toggled");

        let snapshot = self.compute_and_install(generation, filter).await?;
        Ok(VoteOutcome {
            fight_id: fight_id.to_string(),
            vote,
            snapshot,
        })
    }

    /// Rebuild the snapshot for `filter`
    pub async fn recompute(&self, filter: VoteFilter) -> Result<Arc<DnaSnapshot>> {
        let generation = self.next_generation();
        let _guard = self.recompute_lock.lock().await;
        self.compute_and_install(generation, filter).await
    }

    async fn compute_and_install(&self, generation: u64, filter: VoteFilter) -> Result<Arc<DnaSnapshot>> {
        let snapshot = Arc::new(self.compute(generation, filter).await?);
        self.install(snapshot.clone());
        Ok(snapshot)
    }

    fn install(&self, snapshot: Arc<DnaSnapshot>) -> bool {
        let Ok(mut slot) = self.latest.write() else {
            return false;
        };
        let previous = slot.as_ref().map(|s| (s.generation, s.state));
        match previous {
            Some((generation, _)) if generation > snapshot.generation => {
                debug!(
                    user_id = %self.user_id,
                    stale = snapshot.generation,
                    current = generation,
                    "Discarding stale snapshot"
                );
                false
            }
            _ => {
                if previous.map(|(_, state)| state) != Some(snapshot.state) {
                    info!(
                        user_id = %self.user_id,
                        state = snapshot.state.as_str(),
                        rated = snapshot.rated_count,
                        "Recommendation state changed"
                    );
                }
                *slot = Some(snapshot);
                true
            }
        }
    }

    async fn compute(&self, generation: u64, filter: VoteFilter) -> Result<DnaSnapshot> {
        let store = self.store.as_ref();

        let votes = store.fetch_user_votes(&self.user_id).await?;
        let fight_ids: Vec<String> = votes.iter().map(|v| v.fight_id.clone()).collect();
        let listings = store.fetch_fights(&fight_ids).await?;
        let rated = join_rated_fights(&votes, &listings);

        let rated_count = positive_vote_count(&rated, filter);
        let fights: Vec<FightRecord> = filter_rated(&rated, filter)
            .into_iter()
            .filter(|f| f.fight.status == FightStatus::Completed)
            .map(|f| f.fight.clone())
            .collect();

        let metrics = self.load_metrics(&fights).await?;
        let profile = compute_profile(&metrics);
        let baseline = self.baseline.get(store).await;
        let points = build_comparison_dataset(&metrics, &fights);

        let state = recommendation_state(rated_count, profile.as_ref(), self.config.min_rated_fights);
        let request = build_request(&self.user_id, rated_count, profile.as_ref(), &self.config);
        let recommendations = fetch_recommendations(store, &request, &rated).await;

        debug!(
            user_id = %self.user_id,
            filter = filter.as_str(),
            rated_count,
            metrics = metrics.len(),
            "Recomputed DNA"
        );

        Ok(DnaSnapshot {
            generation,
            filter,
            rated_count,
            comparison: profile.as_ref().map(|p| p.compare(&baseline)),
            intensity_label: profile
                .as_ref()
                .map(|p| p.intensity_label(&self.config.intensity_thresholds)),
            target_distribution: profile.as_ref().map(CombatDnaProfile::target_distribution),
            profile,
            baseline,
            points,
            state,
            recommendations,
        })
    }

    async fn load_metrics(&self, fights: &[FightRecord]) -> Result<Vec<NormalizedFightMetric>> {
        if fights.is_empty() {
            return Ok(Vec::new());
        }
        match self.config.metric_source {
            MetricSource::Precomputed => {
                let ids: Vec<String> = fights.iter().map(|f| f.id.clone()).collect();
                self.store.fetch_precomputed_metrics(&ids, FightStatus::Completed).await
            }
            MetricSource::RawRounds => {
                let mut events: Vec<String> = fights.iter().map(|f| f.event_name.clone()).collect();
                events.sort();
                events.dedup();
                let rows = self.store.fetch_raw_round_stats(&events).await?;
                let metas = self.store.fetch_bout_meta(&events).await?;
                Ok(aggregate_fights(fights, &rows, &metas))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BoutMeta, RawRoundStat};
    use crate::recommend::{COMMUNITY_FAVORITE, STYLE_MATCH};
    use crate::storage::Database;

    fn row(event: &str, bout: &str, sig: u32, td: u32, kd: u32, sub: u32, ctrl: u32) -> RawRoundStat {
        RawRoundStat {
            event_name: event.to_string(),
            bout: bout.to_string(),
            round: 1,
            sig_strikes_attempted: sig,
            takedowns_attempted: td,
            kd,
            sub_attempts: sub,
            control_time_sec: ctrl,
            ..Default::default()
        }
    }

    fn meta(event: &str, bout: &str, round: &str, time: &str, method: &str) -> BoutMeta {
        BoutMeta {
            event_name: event.to_string(),
            bout: bout.to_string(),
            round: round.to_string(),
            time: time.to_string(),
            method: method.to_string(),
        }
    }

    /// Six completed three-round decisions with increasing pace
    fn card() -> Arc<Database> {
        let db = Database::open_in_memory().unwrap();
        for n in 1..=6u32 {
            let bout = format!("Bout {n}");
            db.insert_fight(&FightRecord::completed(format!("f{n}"), "UFC 300", bout.as_str()))
                .unwrap();
            db.insert_round_stats(&[row("UFC 300", &bout, 50 * n, 1, 0, 0, 60)]).unwrap();
            db.insert_bout_meta(&meta("UFC 300", &bout, "3", "5:00", "Decision - Unanimous"))
                .unwrap();
        }
        db.refresh_metrics().unwrap();
        Arc::new(db)
    }

    fn session(db: Arc<Database>, config: DnaConfig) -> DnaSession {
        DnaSession::new(db, "u1", config, Arc::new(BaselineCache::new()))
    }

    #[tokio::test]
    async fn test_state_moves_with_the_fifth_vote() {
        let db = card();
        db.set_vote("u2", "f6", Some(VoteType::Favorite)).unwrap();
        db.set_vote("u2", "f1", Some(VoteType::Favorite)).unwrap();
        let session = session(db, DnaConfig::default());

        for id in ["f1", "f2", "f3", "f4"] {
            session.vote(id, VoteType::Like, VoteFilter::Combined).await.unwrap();
        }
        let snapshot = session.latest().unwrap();
        assert_eq!(snapshot.rated_count, 4);
        assert!(snapshot.profile.is_some());
        assert_eq!(snapshot.state, RecommendationState::Insufficient);
        // f1 is a community favorite but already rated
        let ids: Vec<&str> = snapshot.recommendations.iter().map(|r| r.fight.id.as_str()).collect();
        assert_eq!(ids, ["f6"]);
        assert_eq!(snapshot.recommendations[0].reason, COMMUNITY_FAVORITE);
        assert_eq!(snapshot.recommendations[0].user_vote, None);

        let outcome = session.vote("f5", VoteType::Favorite, VoteFilter::Combined).await.unwrap();
        assert_eq!(outcome.vote, Some(VoteType::Favorite));
        assert_eq!(outcome.snapshot.state, RecommendationState::Ready);
        let ids: Vec<&str> = outcome.snapshot.recommendations.iter().map(|r| r.fight.id.as_str()).collect();
        assert_eq!(ids, ["f6"]);
        assert_eq!(outcome.snapshot.recommendations[0].reason, STYLE_MATCH);

        // Clicking the same vote again clears it
        let outcome = session.vote("f5", VoteType::Favorite, VoteFilter::Combined).await.unwrap();
        assert_eq!(outcome.vote, None);
        assert_eq!(outcome.snapshot.rated_count, 4);
        assert_eq!(outcome.snapshot.state, RecommendationState::Insufficient);
    }

    #[tokio::test]
    async fn test_filter_selects_the_counted_votes() {
        let session = session(card(), DnaConfig::default());
        session.vote("f1", VoteType::Like, VoteFilter::Combined).await.unwrap();
        session.vote("f2", VoteType::Favorite, VoteFilter::Combined).await.unwrap();
        session.vote("f3", VoteType::Dislike, VoteFilter::Combined).await.unwrap();

        let combined = session.recompute(VoteFilter::Combined).await.unwrap();
        assert_eq!(combined.rated_count, 2);
        assert_eq!(combined.points.len(), 2);

        let favorites = session.recompute(VoteFilter::Favorites).await.unwrap();
        assert_eq!(favorites.rated_count, 1);
        assert_eq!(favorites.points[0].fight_id, "f2");
        assert_eq!(favorites.points[0].display_name, "Bout 2");

        assert_eq!(session.latest().unwrap().filter, VoteFilter::Favorites);
    }

    #[tokio::test]
    async fn test_two_bout_scenario_from_raw_rounds() {
        let db = Database::open_in_memory().unwrap();
        db.insert_fight(&FightRecord::completed("a", "UFC 1", "A vs B")).unwrap();
        db.insert_fight(&FightRecord::completed("b", "UFC 1", "C vs D")).unwrap();
        db.insert_fight(&FightRecord {
            status: FightStatus::Upcoming,
            ..FightRecord::completed("c", "UFC 1", "E vs F")
        })
        .unwrap();
        db.insert_round_stats(&[
            row("UFC 1", "A vs B", 60, 2, 0, 1, 30),
            row("UFC 1", "C vs D", 40, 0, 1, 0, 200),
        ])
        .unwrap();
        db.insert_bout_meta(&meta("UFC 1", "A vs B", "1", "03:00", "Decision")).unwrap();
        db.insert_bout_meta(&meta("UFC 1", "C vs D", "2", "01:00", "KO/TKO")).unwrap();

        let config = DnaConfig {
            metric_source: MetricSource::RawRounds,
            ..DnaConfig::default()
        };
        let session = session(Arc::new(db), config);
        for id in ["a", "b", "c"] {
            session.vote(id, VoteType::Like, VoteFilter::Combined).await.unwrap();
        }

        let snapshot = session.latest().unwrap();
        let profile = snapshot.profile.as_ref().unwrap();
        assert_eq!(profile.fight_count, 2);
        assert_eq!(profile.strike_pace, 13.33);
        assert_eq!(profile.finish_rate, 50.0);
        assert_eq!(snapshot.points.len(), 2);
        // No metrics were cached, so the store has no baseline row
        assert_eq!(snapshot.baseline, Baseline::default());
        assert_eq!(snapshot.state, RecommendationState::Insufficient);
    }

    #[tokio::test]
    async fn test_concurrent_triggers_install_the_last_one() {
        let session = session(card(), DnaConfig::default());

        let (first, second, refresh) = tokio::join!(
            session.vote("f1", VoteType::Like, VoteFilter::Combined),
            session.vote("f2", VoteType::Like, VoteFilter::Combined),
            session.recompute(VoteFilter::Likes),
        );
        let (first, second, refresh) = (first.unwrap(), second.unwrap(), refresh.unwrap());

        assert!(first.snapshot.generation < second.snapshot.generation);
        assert!(second.snapshot.generation < refresh.generation);
        assert_eq!(second.snapshot.rated_count, 2);

        let latest = session.latest().unwrap();
        assert_eq!(latest.generation, refresh.generation);
        assert_eq!(latest.filter, VoteFilter::Likes);
        assert_eq!(latest.rated_count, 2);

        let (combined, favorites) = tokio::join!(
            session.recompute(VoteFilter::Combined),
            session.recompute(VoteFilter::Favorites),
        );
        assert!(combined.unwrap().generation < favorites.unwrap().generation);
        let latest = session.latest().unwrap();
        assert_eq!(latest.filter, VoteFilter::Favorites);
        assert_eq!(latest.rated_count, 0);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_discarded() {
        let session = session(card(), DnaConfig::default());
        let newer = session.recompute(VoteFilter::Likes).await.unwrap();

        let stale = Arc::new(DnaSnapshot {
            generation: newer.generation - 1,
            filter: VoteFilter::Combined,
            ..(*newer).clone()
        });
        assert!(!session.install(stale));
        assert_eq!(session.latest().unwrap().filter, VoteFilter::Likes);
    }

    #[tokio::test]
    async fn test_baseline_cache_reads_store_once() {
        let db = card();
        let cache = BaselineCache::new();
        let first = cache.get(db.as_ref()).await;
        assert_eq!(first.strike_pace, 11.67);
        assert_eq!(cache.get(db.as_ref()).await, first);
    }
}
