//! Per-user endpoints backed by a DNA session

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use combat_dna_core::dna::{ChartPoint, IntensityLabel, ProfileComparison, TargetDistribution};
use combat_dna_core::recommend::Recommendation;
use combat_dna_core::session::VoteOutcome;
use combat_dna_core::{Baseline, CombatDnaProfile, RecommendationState, VoteFilter, VoteType};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub filter: VoteFilter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub fight_id: String,
    pub vote_type: VoteType,
    #[serde(default)]
    pub filter: VoteFilter,
}

pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
    Json(req): Json<VoteRequest>,
) -> AppResult<Json<VoteOutcome>> {
    if req.fight_id.trim().is_empty() {
        return Err(AppError::BadRequest("fightId must not be empty".to_string()));
    }
    let session = state.session(&user);
    let outcome = session.vote(&req.fight_id, req.vote_type, req.filter).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaView {
    pub filter: VoteFilter,
    pub rated_count: usize,
    pub profile: Option<CombatDnaProfile>,
    pub baseline: Baseline,
    pub comparison: Option<ProfileComparison>,
    pub intensity_label: Option<IntensityLabel>,
    pub target_distribution: Option<TargetDistribution>,
    pub points: Vec<ChartPoint>,
}

pub async fn user_dna(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
    Query(query): Query<FilterQuery>,
) -> AppResult<Json<DnaView>> {
    let snapshot = state.session(&user).recompute(query.filter).await?;
    Ok(Json(DnaView {
        filter: snapshot.filter,
        rated_count: snapshot.rated_count,
        profile: snapshot.profile.clone(),
        baseline: snapshot.baseline.clone(),
        comparison: snapshot.comparison,
        intensity_label: snapshot.intensity_label,
        target_distribution: snapshot.target_distribution,
        points: snapshot.points.clone(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsView {
    pub state: RecommendationState,
    pub rated_count: usize,
    pub recommendations: Vec<Recommendation>,
}

pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
    Query(query): Query<FilterQuery>,
) -> AppResult<Json<RecommendationsView>> {
    let snapshot = state.session(&user).recompute(query.filter).await?;
    Ok(Json(RecommendationsView {
        state: snapshot.state,
        rated_count: snapshot.rated_count,
        recommendations: snapshot.recommendations.clone(),
    }))
}
