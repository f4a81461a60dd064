use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use combat_dna_core::{BaselineCache, Database, DnaConfig, DnaSession, FightStore, SupabaseClient};

mod config;
mod error;
mod routes;
mod sessions;

use config::{Backend, ServerConfig};
use sessions::{SessionCache, DEFAULT_MAX_SESSIONS};

pub struct AppState {
    pub store: Arc<dyn FightStore>,
    pub config: DnaConfig,
    pub baseline: Arc<BaselineCache>,
    pub backend: &'static str,
    pub started_at: DateTime<Utc>,
    sessions: Mutex<SessionCache>,
}

impl AppState {
    pub fn new(store: Arc<dyn FightStore>, config: DnaConfig, backend: &'static str) -> Self {
        Self {
            store,
            config,
            baseline: Arc::new(BaselineCache::new()),
            backend,
            started_at: Utc::now(),
            sessions: Mutex::new(SessionCache::new(DEFAULT_MAX_SESSIONS)),
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.sessions = Mutex::new(SessionCache::new(max_sessions));
        self
    }

    /// The user's session, created on first use
    pub fn session(&self, user_id: &str) -> Arc<DnaSession> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get_or_open(user_id, || {
            info!(user_id, "Opening DNA session");
            DnaSession::new(self.store.clone(), user_id, self.config.clone(), self.baseline.clone())
        })
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/baseline", get(routes::baseline))
        .route("/metrics/fight", post(routes::metrics::fight_metric))
        .route("/profile", post(routes::metrics::profile))
        .route("/compare", post(routes::metrics::compare))
        .route("/users/:user/votes", post(routes::dna::cast_vote))
        .route("/users/:user/dna", get(routes::dna::user_dna))
        .route("/users/:user/recommendations", get(routes::dna::recommendations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn open_store(backend: &Backend) -> Arc<dyn FightStore> {
    match backend {
        Backend::Sqlite { path } => {
            let db = Database::open(path).expect("Failed to open database");
            match db.refresh_metrics() {
                Ok(refresh) => info!(
                    "Metric cache ready: {} of {} completed fights",
                    refresh.aggregated, refresh.completed_fights
                ),
                Err(e) => warn!("Metric cache not refreshed: {}", e),
            }
            Arc::new(db)
        }
        Backend::Supabase { url, key } => {
            Arc::new(SupabaseClient::new(url, key).expect("Failed to create Supabase client"))
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "combat_dna_web=debug,combat_dna_core=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    info!(
        backend = config.backend.name(),
        metric_source = ?config.dna.metric_source,
        max_sessions = config.max_sessions,
        "Starting Combat DNA server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = open_store(&config.backend);
    let state = Arc::new(
        AppState::new(store, config.dna.clone(), config.backend.name()).with_max_sessions(config.max_sessions),
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .expect("Failed to bind");

    info!("Server running at http://{}", config.bind);

    axum::serve(listener, app(state)).await.expect("Server error");
}
