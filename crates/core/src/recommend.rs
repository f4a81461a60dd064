//! "For You" recommendations: community favorites until a user has enough
//! rated fights for a profile, style matching after that.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DnaConfig;
use crate::dna::CombatDnaProfile;
use crate::store::FightStore;
use crate::votes::{filter_rated, FightListing, FightRecord, RatedFight, RatingCounts, VoteFilter, VoteType};

pub const COMMUNITY_FAVORITE: &str = "Community Favorite";
pub const STYLE_MATCH: &str = "Style Match";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationState {
    /// Fewer positive votes than the threshold, or no profile could be built
    Insufficient,
    /// Enough history and a profile to match against
    Ready,
}

impl RecommendationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationState::Insufficient => "insufficient",
            RecommendationState::Ready => "ready",
        }
    }
}

/// State for a user with `vote_count` positive votes under the active filter.
pub fn recommendation_state(
    vote_count: usize,
    profile: Option<&CombatDnaProfile>,
    min_rated_fights: usize,
) -> RecommendationState {
    match profile {
        Some(_) if vote_count >= min_rated_fights => RecommendationState::Ready,
        _ => RecommendationState::Insufficient,
    }
}

/// [`recommendation_state`] with the default threshold of 5
pub fn get_recommendation_state(vote_count: usize, profile: Option<&CombatDnaProfile>) -> RecommendationState {
    recommendation_state(vote_count, profile, DnaConfig::default().min_rated_fights)
}

/// Number of rated fights whose vote counts toward the threshold
pub fn positive_vote_count(rated: &[RatedFight], filter: VoteFilter) -> usize {
    filter_rated(rated, filter).len()
}

/// The six profile values sent to the style matcher
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileScalars {
    pub pace: f64,
    pub violence: f64,
    pub intensity: f64,
    pub control: f64,
    pub finish: f64,
    pub duration: f64,
}

impl From<&CombatDnaProfile> for ProfileScalars {
    fn from(profile: &CombatDnaProfile) -> Self {
        Self {
            pace: profile.strike_pace,
            violence: profile.violence_index,
            intensity: profile.intensity_score,
            control: profile.engagement_style,
            finish: profile.finish_rate,
            duration: profile.avg_fight_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationRequest {
    CommunityFavorites { limit: u32 },
    StyleMatch { user_id: String, scalars: ProfileScalars },
}

/// Pick the request matching the user's current state
pub fn build_request(
    user_id: &str,
    vote_count: usize,
    profile: Option<&CombatDnaProfile>,
    config: &DnaConfig,
) -> RecommendationRequest {
    match (recommendation_state(vote_count, profile, config.min_rated_fights), profile) {
        (RecommendationState::Ready, Some(profile)) => RecommendationRequest::StyleMatch {
            user_id: user_id.to_string(),
            scalars: ProfileScalars::from(profile),
        },
        _ => RecommendationRequest::CommunityFavorites {
            limit: config.community_limit,
        },
    }
}

/// A fight returned by the style matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFight {
    pub fight: FightRecord,
    pub ratings: Option<RatingCounts>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub fight: FightRecord,
    pub ratings: RatingCounts,
    pub reason: String,
    /// The user's vote on this fight, if they already cast one
    pub user_vote: Option<VoteType>,
}

/// Most favorited first, then most liked, then least disliked
pub fn community_order(a: &RatingCounts, b: &RatingCounts) -> Ordering {
    b.favorites_count
        .cmp(&a.favorites_count)
        .then(b.likes_count.cmp(&a.likes_count))
        .then(a.dislikes_count.cmp(&b.dislikes_count))
}

/// Sort listings into community order and keep the first `limit`
pub fn rank_community_favorites(mut listings: Vec<FightListing>, limit: u32) -> Vec<FightListing> {
    listings.sort_by(|a, b| community_order(&a.ratings.unwrap_or_default(), &b.ratings.unwrap_or_default()));
    listings.truncate(limit as usize);
    listings
}

/// Run `request` against the store. Failures are logged and produce an empty
/// list; recommendations never fail a session. Community favorites skip
/// fights the user already rated.
pub async fn fetch_recommendations(
    store: &dyn FightStore,
    request: &RecommendationRequest,
    rated: &[RatedFight],
) -> Vec<Recommendation> {
    let votes: HashMap<&str, VoteType> = rated
        .iter()
        .filter_map(|f| f.user_vote.map(|v| (f.id(), v)))
        .collect();
    let vote_for = |id: &str| votes.get(id).copied();

    match request {
        RecommendationRequest::CommunityFavorites { limit } => {
            // Rated fights are dropped after the fetch, so ask for enough to refill
            let fetch_limit = limit.saturating_add(u32::try_from(votes.len()).unwrap_or(u32::MAX));
            match store.fetch_community_favorites(fetch_limit).await {
                Ok(listings) => {
                    debug!("Fetched {} community favorites", listings.len());
                    rank_community_favorites(listings, fetch_limit)
                        .into_iter()
                        .filter(|l| !votes.contains_key(l.fight.id.as_str()))
                        .take(*limit as usize)
                        .map(|l| Recommendation {
                            user_vote: vote_for(&l.fight.id),
                            fight: l.fight,
                            ratings: l.ratings.unwrap_or_default(),
                            reason: COMMUNITY_FAVORITE.to_string(),
                        })
                        .collect()
                }
                Err(e) => {
                    warn!("Community favorites unavailable: {}", e);
                    Vec::new()
                }
            }
        }
        RecommendationRequest::StyleMatch { user_id, scalars } => {
            match store.request_style_recommendations(user_id, scalars).await {
                Ok(ranked) => {
                    debug!("Style matcher returned {} fights for {}", ranked.len(), user_id);
                    ranked
                        .into_iter()
                        .map(|r| Recommendation {
                            user_vote: vote_for(&r.fight.id),
                            fight: r.fight,
                            ratings: r.ratings.unwrap_or_default(),
                            reason: r
                                .reason
                                .filter(|s| !s.trim().is_empty())
                                .unwrap_or_else(|| STYLE_MATCH.to_string()),
                        })
                        .collect()
                }
                Err(e) => {
                    warn!("Style recommendations unavailable for {}: {}", user_id, e);
                    Vec::new()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna::compute_profile;
    use crate::metrics::NormalizedFightMetric;

    fn profile() -> CombatDnaProfile {
        compute_profile(&[NormalizedFightMetric {
            fight_id: "1".to_string(),
            pace: 12.0,
            intensity: 3.0,
            violence_index: 0.2,
            control: 40.0,
            finish_flag: 1,
            duration_minutes: 8.0,
            head_strikes: 1,
            body_strikes: 1,
            leg_strikes: 1,
        }])
        .unwrap()
    }

    fn counts(favorites: u32, likes: u32, dislikes: u32) -> RatingCounts {
        RatingCounts {
            likes_count: likes,
            dislikes_count: dislikes,
            favorites_count: favorites,
        }
    }

    #[test]
    fn test_state_threshold() {
        let p = profile();
        assert_eq!(get_recommendation_state(4, Some(&p)), RecommendationState::Insufficient);
        assert_eq!(get_recommendation_state(5, Some(&p)), RecommendationState::Ready);
        assert_eq!(get_recommendation_state(12, None), RecommendationState::Insufficient);
        assert_eq!(recommendation_state(2, Some(&p), 2), RecommendationState::Ready);
    }

    #[test]
    fn test_build_request() {
        let p = profile();
        let config = DnaConfig::default();

        assert_eq!(
            build_request("u", 3, Some(&p), &config),
            RecommendationRequest::CommunityFavorites { limit: 10 }
        );
        match build_request("u", 5, Some(&p), &config) {
            RecommendationRequest::StyleMatch { user_id, scalars } => {
                assert_eq!(user_id, "u");
                assert_eq!(scalars.pace, 12.0);
                assert_eq!(scalars.finish, 100.0);
                assert_eq!(scalars.duration, 8.0);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_community_order() {
        let listing = |id: &str, ratings: RatingCounts| FightListing {
            fight: FightRecord::completed(id, "E", id),
            ratings: Some(ratings),
        };
        let listings = vec![
            listing("few-favs", counts(1, 50, 0)),
            listing("most-disliked", counts(5, 10, 9)),
            listing("top", counts(5, 10, 1)),
            listing("more-likes", counts(5, 11, 20)),
            listing("none", counts(0, 0, 0)),
        ];

        let ranked = rank_community_favorites(listings, 4);
        let ids: Vec<&str> = ranked.iter().map(|l| l.fight.id.as_str()).collect();
        assert_eq!(ids, ["more-likes", "top", "most-disliked", "few-favs"]);
    }

    #[tokio::test]
    async fn test_community_favorites_skip_rated_fights() {
        let db = crate::storage::Database::open_in_memory().unwrap();
        for id in ["f1", "f2", "f3"] {
            db.insert_fight(&FightRecord::completed(id, "UFC 300", id)).unwrap();
        }
        db.set_vote("u2", "f1", Some(VoteType::Favorite)).unwrap();
        db.set_vote("u3", "f1", Some(VoteType::Like)).unwrap();
        db.set_vote("u2", "f2", Some(VoteType::Favorite)).unwrap();
        db.set_vote("u1", "f1", Some(VoteType::Dislike)).unwrap();

        let rated = vec![RatedFight {
            fight: FightRecord::completed("f1", "UFC 300", "f1"),
            ratings: counts(1, 1, 1),
            user_vote: Some(VoteType::Dislike),
        }];
        let request = RecommendationRequest::CommunityFavorites { limit: 1 };

        let recs = fetch_recommendations(&db, &request, &rated).await;
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].fight.id, "f2");
        assert_eq!(recs[0].user_vote, None);
        assert_eq!(recs[0].reason, COMMUNITY_FAVORITE);

        let recs = fetch_recommendations(&db, &request, &[]).await;
        assert_eq!(recs[0].fight.id, "f1");
    }

    #[test]
    fn test_positive_vote_count_respects_filter() {
        let rated = |id: &str, vote: VoteType| RatedFight {
            fight: FightRecord::completed(id, "E", id),
            ratings: RatingCounts::default(),
            user_vote: Some(vote),
        };
        let list = vec![
            rated("1", VoteType::Like),
            rated("2", VoteType::Favorite),
            rated("3", VoteType::Dislike),
        ];
        assert_eq!(positive_vote_count(&list, VoteFilter::Combined), 2);
        assert_eq!(positive_vote_count(&list, VoteFilter::Likes), 1);
        assert_eq!(positive_vote_count(&list, VoteFilter::Favorites), 1);
    }
}
