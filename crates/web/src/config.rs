//! Server configuration from the environment

use std::net::SocketAddr;

use combat_dna_core::{DnaConfig, MetricSource};
use thiserror::Error;

use crate::sessions::DEFAULT_MAX_SESSIONS;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DB: &str = "combat_dna.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBind { var: &'static str, value: String },

    #[error("Unknown backend '{0}', expected 'sqlite' or 'supabase'")]
    UnknownBackend(String),

    #[error("Unknown metric source '{0}', expected 'precomputed' or 'raw_rounds'")]
    UnknownMetricSource(String),

    #[error("COMBAT_DNA_MAX_SESSIONS must be a positive integer, got '{0}'")]
    InvalidMaxSessions(String),

    #[error("{0} must be set for the supabase backend")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    Sqlite { path: String },
    Supabase { url: String, key: String },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite { .. } => "sqlite",
            Backend::Supabase { .. } => "supabase",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub backend: Backend,
    pub dna: DnaConfig,
    pub max_sessions: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_value = var("COMBAT_DNA_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_value.parse().map_err(|_| ConfigError::InvalidBind {
            var: "COMBAT_DNA_BIND",
            value: bind_value.clone(),
        })?;

        let backend = match var("COMBAT_DNA_BACKEND").as_deref().unwrap_or("sqlite") {
            "sqlite" => Backend::Sqlite {
                path: var("COMBAT_DNA_DB").unwrap_or_else(|| DEFAULT_DB.to_string()),
            },
            "supabase" => Backend::Supabase {
                url: var("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                key: var("SUPABASE_KEY").ok_or(ConfigError::Missing("SUPABASE_KEY"))?,
            },
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let mut dna = DnaConfig::default();
        if let Some(source) = var("COMBAT_DNA_METRIC_SOURCE") {
            dna.metric_source =
                MetricSource::parse(&source).ok_or(ConfigError::UnknownMetricSource(source))?;
        }

        let max_sessions = match var("COMBAT_DNA_MAX_SESSIONS") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidMaxSessions(value)),
            },
            None => DEFAULT_MAX_SESSIONS,
        };

        Ok(Self {
            bind,
            backend,
            dna,
            max_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.backend, Backend::Sqlite { path: DEFAULT_DB.to_string() });
        assert_eq!(config.dna.metric_source, MetricSource::Precomputed);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_supabase_needs_credentials() {
        let err = ServerConfig::from_lookup(lookup(&[("COMBAT_DNA_BACKEND", "supabase")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));

        let config = ServerConfig::from_lookup(lookup(&[
            ("COMBAT_DNA_BACKEND", "supabase"),
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_KEY", "anon"),
            ("COMBAT_DNA_METRIC_SOURCE", "raw"),
        ]))
        .unwrap();
        assert_eq!(config.backend.name(), "supabase");
        assert_eq!(config.dna.metric_source, MetricSource::RawRounds);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("COMBAT_DNA_BIND", "nowhere")])),
            Err(ConfigError::InvalidBind { .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("COMBAT_DNA_BACKEND", "postgres")])),
            Err(ConfigError::UnknownBackend(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("COMBAT_DNA_MAX_SESSIONS", "0")])),
            Err(ConfigError::InvalidMaxSessions(_))
        ));
        let config = ServerConfig::from_lookup(lookup(&[("COMBAT_DNA_MAX_SESSIONS", "64")])).unwrap();
        assert_eq!(config.max_sessions, 64);
    }
}
