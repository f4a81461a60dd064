use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use combat_dna_core::Baseline;

use crate::AppState;

pub mod dna;
pub mod metrics;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub backend: &'static str,
    pub started_at: String,
    pub uptime_seconds: i64,
    pub active_sessions: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        backend: state.backend,
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        active_sessions: state.session_count(),
    })
}

/// Population baseline, fetched once per process
pub async fn baseline(State(state): State<Arc<AppState>>) -> Json<Baseline> {
    Json(state.baseline.get(state.store.as_ref()).await)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use combat_dna_core::metrics::{BoutMeta, RawRoundStat};
    use combat_dna_core::votes::FightRecord;
    use combat_dna_core::{Database, DnaConfig};

    use crate::{app, AppState};

    pub fn seeded_state() -> Arc<AppState> {
        Arc::new(seeded_app_state(DnaConfig::default()))
    }

    pub fn seeded_state_with(config: DnaConfig) -> Arc<AppState> {
        Arc::new(seeded_app_state(config))
    }

    /// Six completed fights on one card, metric cache built
    pub fn seeded_app_state(config: DnaConfig) -> AppState {
        let db = Database::open_in_memory().unwrap();
        for n in 1..=6u32 {
            let bout = format!("Bout {n}");
            db.insert_fight(&FightRecord::completed(format!("f{n}"), "UFC 300", bout.as_str()))
                .unwrap();
            db.insert_round_stats(&[RawRoundStat {
                event_name: "UFC 300".to_string(),
                bout: bout.clone(),
                round: 1,
                sig_strikes_attempted: 30 * n,
                takedowns_attempted: 1,
                control_time_sec: 90,
                ..Default::default()
            }])
            .unwrap();
            db.insert_bout_meta(&BoutMeta {
                event_name: "UFC 300".to_string(),
                bout,
                round: "3".to_string(),
                time: "5:00".to_string(),
                method: if n % 2 == 0 { "KO/TKO" } else { "Decision - Split" }.to_string(),
            })
            .unwrap();
        }
        db.refresh_metrics().unwrap();
        AppState::new(Arc::new(db), config, "sqlite")
    }

    pub async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
        let response = app(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}
