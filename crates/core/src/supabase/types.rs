//! Row shapes returned by the hosted backend's REST API

use serde::{Deserialize, Serialize};

use crate::metrics::{string_or_number, FightId, NormalizedFightMetric};
use crate::recommend::{ProfileScalars, RankedFight};
use crate::votes::{FightListing, FightRecord, RatingCounts, VoteType};

/// Row of the `fight_dna_metrics` view. Null secondary columns read as zero;
/// a row without duration, pace or violence is unusable.
#[derive(Debug, Clone, Deserialize)]
pub struct PrecomputedMetricRow {
    #[serde(deserialize_with = "string_or_number")]
    pub fight_id: FightId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metric_pace: Option<f64>,
    #[serde(default)]
    pub metric_intensity: Option<f64>,
    #[serde(default)]
    pub metric_violence: Option<f64>,
    #[serde(default)]
    pub metric_control: Option<f64>,
    /// 0 or 100 upstream
    #[serde(default)]
    pub metric_finish: Option<f64>,
    #[serde(default)]
    pub metric_duration: Option<f64>,
    #[serde(default)]
    pub raw_head_strikes: Option<f64>,
    #[serde(default)]
    pub raw_body_strikes: Option<f64>,
    #[serde(default)]
    pub raw_leg_strikes: Option<f64>,
}

impl PrecomputedMetricRow {
    /// `None` when the duration is missing or not positive, or pace or violence is null
    pub fn into_metric(self) -> Option<NormalizedFightMetric> {
        let duration_minutes = self.metric_duration.filter(|d| d.is_finite() && *d > 0.0)?;
        let pace = self.metric_pace?;
        let violence_index = self.metric_violence?;
        let count = |v: Option<f64>| v.unwrap_or(0.0).max(0.0).round() as u32;
        Some(NormalizedFightMetric {
            fight_id: self.fight_id,
            pace,
            intensity: self.metric_intensity.unwrap_or(0.0),
            violence_index,
            control: self.metric_control.unwrap_or(0.0).clamp(0.0, 100.0),
            finish_flag: u8::from(self.metric_finish.unwrap_or(0.0) > 0.0),
            duration_minutes,
            head_strikes: count(self.raw_head_strikes),
            body_strikes: count(self.raw_body_strikes),
            leg_strikes: count(self.raw_leg_strikes),
        })
    }
}

/// An embedded relation comes back as an object or a one-element array
/// depending on how the foreign key is declared.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Embedded<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Embedded<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            Embedded::One(value) => Some(value),
            Embedded::Many(values) => values.into_iter().next(),
        }
    }
}

/// `fights` row with its `fight_ratings` embedded
#[derive(Debug, Clone, Deserialize)]
pub struct FightRow {
    #[serde(flatten)]
    pub fight: FightRecord,
    #[serde(default)]
    pub fight_ratings: Option<Embedded<RatingCounts>>,
}

impl From<FightRow> for FightListing {
    fn from(row: FightRow) -> Self {
        FightListing {
            fight: row.fight,
            ratings: row.fight_ratings.and_then(Embedded::into_first),
        }
    }
}

/// `fight_ratings` row with its fight embedded
#[derive(Debug, Clone, Deserialize)]
pub struct RatingRow {
    #[serde(flatten)]
    pub ratings: RatingCounts,
    pub fights: Embedded<FightRecord>,
}

impl RatingRow {
    pub fn into_listing(self) -> Option<FightListing> {
        let ratings = self.ratings;
        self.fights.into_first().map(|fight| FightListing {
            fight,
            ratings: Some(ratings),
        })
    }
}

/// Row returned by the `get_fight_recommendations` function
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRow {
    #[serde(flatten)]
    pub fight: FightRecord,
    #[serde(default)]
    pub fight_ratings: Option<Embedded<RatingCounts>>,
    #[serde(default, rename = "recommendationReason")]
    pub recommendation_reason: Option<String>,
    #[serde(default)]
    pub match_reason: Option<String>,
}

impl From<RecommendationRow> for RankedFight {
    fn from(row: RecommendationRow) -> Self {
        RankedFight {
            fight: row.fight,
            ratings: row.fight_ratings.and_then(Embedded::into_first),
            reason: row.recommendation_reason.or(row.match_reason),
        }
    }
}

/// Arguments of the `get_fight_recommendations` function
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationArgs<'a> {
    pub p_user_id: &'a str,
    pub p_pace: f64,
    pub p_violence: f64,
    pub p_intensity: f64,
    pub p_control: f64,
    pub p_finish: f64,
    pub p_duration: f64,
}

impl<'a> RecommendationArgs<'a> {
    pub fn new(user_id: &'a str, scalars: &ProfileScalars) -> Self {
        Self {
            p_user_id: user_id,
            p_pace: scalars.pace,
            p_violence: scalars.violence,
            p_intensity: scalars.intensity,
            p_control: scalars.control,
            p_finish: scalars.finish,
            p_duration: scalars.duration,
        }
    }
}

/// Body of a `user_votes` upsert
#[derive(Debug, Clone, Serialize)]
pub struct VoteUpsert<'a> {
    pub user_id: &'a str,
    pub fight_id: &'a str,
    pub vote_type: VoteType,
}

/// Build a PostgREST `in.(...)` filter with every value quoted
pub fn in_filter<S: AsRef<str>>(values: &[S]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.as_ref().replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}
