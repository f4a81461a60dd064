//! SQLite storage for fights, round stats, votes and cached metrics

mod db;
mod models;

pub use db::{Database, STYLE_MATCH_LIMIT};
pub use models::*;
