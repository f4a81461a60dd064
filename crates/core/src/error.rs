//! Error types for combat-dna-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Malformed bout duration: round {round}, clock '{clock}'")]
    MalformedDuration { round: String, clock: String },

    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed_duration(round: impl ToString, clock: impl Into<String>) -> Self {
        Error::MalformedDuration {
            round: round.to_string(),
            clock: clock.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
