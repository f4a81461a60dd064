//! Votes, fight records and the rated-fight join

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::metrics::{string_or_number, FightId, FightStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Like,
    Dislike,
    Favorite,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Like => "like",
            VoteType::Dislike => "dislike",
            VoteType::Favorite => "favorite",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(VoteType::Like),
            "dislike" => Some(VoteType::Dislike),
            "favorite" => Some(VoteType::Favorite),
            _ => None,
        }
    }

    /// Vote that results from clicking `clicked` while `current` is cast.
    /// Clicking the active vote clears it; anything else replaces it.
    pub fn toggle(current: Option<VoteType>, clicked: VoteType) -> Option<VoteType> {
        if current == Some(clicked) {
            None
        } else {
            Some(clicked)
        }
    }

    /// Likes and favorites are the votes that feed a profile
    pub fn is_positive(&self) -> bool {
        matches!(self, VoteType::Like | VoteType::Favorite)
    }
}

/// Which positive votes feed the profile and the recommendation threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteFilter {
    #[default]
    Combined,
    Likes,
    Favorites,
}

impl VoteFilter {
    pub fn accepts(&self, vote: VoteType) -> bool {
        match self {
            VoteFilter::Combined => vote.is_positive(),
            VoteFilter::Likes => vote == VoteType::Like,
            VoteFilter::Favorites => vote == VoteType::Favorite,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteFilter::Combined => "combined",
            VoteFilter::Likes => "likes",
            VoteFilter::Favorites => "favorites",
        }
    }
}

/// One user's vote on one fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub fight_id: FightId,
    pub vote_type: VoteType,
}

/// Aggregate vote counters kept per fight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub dislikes_count: u32,
    #[serde(default)]
    pub favorites_count: u32,
}

impl RatingCounts {
    fn bucket(&mut self, vote: VoteType) -> &mut u32 {
        match vote {
            VoteType::Like => &mut self.likes_count,
            VoteType::Dislike => &mut self.dislikes_count,
            VoteType::Favorite => &mut self.favorites_count,
        }
    }

    /// Move one vote from `old` to `new`; counters never go below zero.
    pub fn apply_vote_change(&mut self, old: Option<VoteType>, new: Option<VoteType>) {
        if old == new {
            return;
        }
        if let Some(old) = old {
            let count = self.bucket(old);
            *count = count.saturating_sub(1);
        }
        if let Some(new) = new {
            *self.bucket(new) += 1;
        }
    }

    pub fn like_percentage(&self) -> u32 {
        let total = self.likes_count + self.dislikes_count;
        if total == 0 {
            0
        } else {
            ((self.likes_count as f64 / total as f64) * 100.0).round() as u32
        }
    }
}

/// A fight as listed in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: FightId,
    pub event_name: String,
    pub bout: String,
    #[serde(default)]
    pub status: FightStatus,
    #[serde(default)]
    pub weight_class: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

impl FightRecord {
    pub fn completed(id: impl Into<String>, event_name: impl Into<String>, bout: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            event_name: event_name.into(),
            bout: bout.into(),
            status: FightStatus::Completed,
            weight_class: None,
            method: None,
        }
    }
}

/// A fight as listed together with its counters, which may not exist yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightListing {
    pub fight: FightRecord,
    pub ratings: Option<RatingCounts>,
}

/// Fight record joined with its counters and, when present, the user's vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedFight {
    pub fight: FightRecord,
    pub ratings: RatingCounts,
    pub user_vote: Option<VoteType>,
}

impl RatedFight {
    pub fn id(&self) -> &str {
        &self.fight.id
    }
}

/// Join a user's votes onto the fights they refer to. Fights the user never
/// voted on are dropped, missing counters default to zero, and the result
/// keeps the order of `fights`.
pub fn join_rated_fights(votes: &[Vote], fights: &[FightListing]) -> Vec<RatedFight> {
    let by_fight: HashMap<&str, VoteType> = votes
        .iter()
        .map(|v| (v.fight_id.as_str(), v.vote_type))
        .collect();

    fights
        .iter()
        .filter_map(|listing| {
            let vote = by_fight.get(listing.fight.id.as_str())?;
            Some(RatedFight {
                fight: listing.fight.clone(),
                ratings: listing.ratings.unwrap_or_default(),
                user_vote: Some(*vote),
            })
        })
        .collect()
}

/// Rated fights whose vote passes `filter`
pub fn filter_rated(rated: &[RatedFight], filter: VoteFilter) -> Vec<&RatedFight> {
    rated
        .iter()
        .filter(|f| f.user_vote.is_some_and(|v| filter.accepts(v)))
        .collect()
}
