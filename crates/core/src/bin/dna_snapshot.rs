//! Quick check of a local fight database: rebuild the metric cache and print a
//! user's DNA snapshot.

use std::sync::Arc;

use combat_dna_core::{BaselineCache, Database, DnaConfig, DnaSession, VoteFilter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "combat_dna_core=debug".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(db_path), Some(user_id)) = (args.next(), args.next()) else {
        eprintln!("Usage: dna_snapshot <database> <user_id> [combined|likes|favorites]");
        std::process::exit(1);
    };
    let filter = match args.next().as_deref() {
        None | Some("combined") => VoteFilter::Combined,
        Some("likes") => VoteFilter::Likes,
        Some("favorites") => VoteFilter::Favorites,
        Some(other) => {
            eprintln!("Unknown filter: {}", other);
            std::process::exit(1);
        }
    };

    let db = match Database::open(&db_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("Failed to open {}: {}", db_path, e);
            std::process::exit(1);
        }
    };

    match db.refresh_metrics() {
        Ok(refresh) => println!(
            "Metrics: {} of {} completed fights aggregated",
            refresh.aggregated, refresh.completed_fights
        ),
        Err(e) => {
            eprintln!("Failed to refresh metrics: {}", e);
            std::process::exit(1);
        }
    }

    let session = DnaSession::new(db, user_id.as_str(), DnaConfig::default(), Arc::new(BaselineCache::new()));
    let snapshot = match session.recompute(filter).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Failed to compute DNA for {}: {}", user_id, e);
            std::process::exit(1);
        }
    };

    println!("\nUser: {} ({})", user_id, filter.as_str());
    println!("Rated fights: {}", snapshot.rated_count);
    match &snapshot.profile {
        Some(profile) => {
            println!("Strike pace:     {:>7.2}", profile.strike_pace);
            println!("Intensity:       {:>7.2}", profile.intensity_score);
            println!("Violence index:  {:>7.2}", profile.violence_index);
            println!("Control:         {:>6}%", profile.engagement_style);
            println!("Finish rate:     {:>6}%", profile.finish_rate);
            println!("Avg fight time:  {:>7.1} min", profile.avg_fight_time);
            if let Some(label) = snapshot.intensity_label {
                println!("Style:           {}", label.display_name());
            }
        }
        None => println!("No profile yet"),
    }

    println!("\nRecommendations ({}):", snapshot.state.as_str());
    for rec in &snapshot.recommendations {
        println!("  {} - {} [{}]", rec.fight.event_name, rec.fight.bout, rec.reason);
    }
}
