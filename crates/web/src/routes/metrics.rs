//! Stateless metric endpoints over posted data

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use combat_dna_core::dna::{IntensityLabel, TargetDistribution};
use combat_dna_core::metrics::try_fight_metric;
use combat_dna_core::{
    compare_to_baseline, compute_profile, BaselineComparison, BoutMeta, CombatDnaProfile,
    NormalizedFightMetric, RawRoundStat,
};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightMetricRequest {
    pub fight_id: String,
    pub rows: Vec<RawRoundStat>,
    pub meta: BoutMeta,
}

#[derive(Debug, Serialize)]
pub struct FightMetricResponse {
    pub metric: Option<NormalizedFightMetric>,
}

pub async fn fight_metric(Json(req): Json<FightMetricRequest>) -> AppResult<Json<FightMetricResponse>> {
    if req.fight_id.trim().is_empty() {
        return Err(AppError::BadRequest("fightId must not be empty".to_string()));
    }
    let metric = try_fight_metric(&req.fight_id, &req.rows, &req.meta)?;
    Ok(Json(FightMetricResponse { metric }))
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub metrics: Vec<NormalizedFightMetric>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: Option<CombatDnaProfile>,
    pub intensity_label: Option<IntensityLabel>,
    pub target_distribution: Option<TargetDistribution>,
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProfileRequest>,
) -> Json<ProfileResponse> {
    let thresholds = &state.config.intensity_thresholds;
    let profile = compute_profile(&req.metrics);
    Json(ProfileResponse {
        intensity_label: profile.as_ref().map(|p| p.intensity_label(thresholds)),
        target_distribution: profile.as_ref().map(CombatDnaProfile::target_distribution),
        profile,
    })
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub baseline: Option<f64>,
}

pub async fn compare(Json(req): Json<CompareRequest>) -> Json<BaselineComparison> {
    Json(compare_to_baseline(req.value, req.baseline))
}
