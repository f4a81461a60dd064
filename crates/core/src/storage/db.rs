//! Database operations

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use super::models::*;
use crate::dna::Baseline;
use crate::error::{Error, Result};
use crate::metrics::{aggregate_fights, BoutMeta, FightId, FightStatus, NormalizedFightMetric, RawRoundStat};
use crate::recommend::{ProfileScalars, RankedFight};
use crate::store::FightStore;
use crate::votes::{FightListing, FightRecord, RatingCounts, Vote, VoteType};

/// Fights returned by a local style-match query
pub const STYLE_MATCH_LIMIT: usize = 10;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Store("database lock poisoned".to_string()))
    }

    fn init_schema(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS fights (
                id TEXT PRIMARY KEY,
                event_name TEXT NOT NULL,
                bout TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'completed',
                weight_class TEXT,
                method TEXT,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS round_fight_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_name TEXT NOT NULL,
                bout TEXT NOT NULL,
                round INTEGER NOT NULL,
                fighter_name TEXT,
                kd INTEGER NOT NULL DEFAULT 0,
                sig_strikes_attempted INTEGER NOT NULL DEFAULT 0,
                sig_strikes_head_attempted INTEGER NOT NULL DEFAULT 0,
                sig_strikes_body_attempted INTEGER NOT NULL DEFAULT 0,
                sig_strikes_leg_attempted INTEGER NOT NULL DEFAULT 0,
                sig_strikes_ground_attempted INTEGER NOT NULL DEFAULT 0,
                takedowns_attempted INTEGER NOT NULL DEFAULT 0,
                sub_attempts INTEGER NOT NULL DEFAULT 0,
                control_time_sec INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS fight_meta_details (
                event_name TEXT NOT NULL,
                bout TEXT NOT NULL,
                round TEXT NOT NULL,
                time TEXT NOT NULL,
                method TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (event_name, bout)
            );

            CREATE TABLE IF NOT EXISTS fight_metrics (
                fight_id TEXT PRIMARY KEY,
                pace REAL NOT NULL,
                intensity REAL NOT NULL,
                violence REAL NOT NULL,
                control REAL NOT NULL,
                finish INTEGER NOT NULL,
                duration REAL NOT NULL,
                head_strikes INTEGER NOT NULL,
                body_strikes INTEGER NOT NULL,
                leg_strikes INTEGER NOT NULL,
                computed_at INTEGER NOT NULL,
                FOREIGN KEY (fight_id) REFERENCES fights(id)
            );

            CREATE TABLE IF NOT EXISTS fight_ratings (
                fight_id TEXT PRIMARY KEY,
                likes_count INTEGER NOT NULL DEFAULT 0,
                dislikes_count INTEGER NOT NULL DEFAULT 0,
                favorites_count INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (fight_id) REFERENCES fights(id)
            );

            CREATE TABLE IF NOT EXISTS user_votes (
                user_id TEXT NOT NULL,
                fight_id TEXT NOT NULL,
                vote_type TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (user_id, fight_id)
            );

            CREATE TABLE IF NOT EXISTS baselines (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                strike_pace REAL NOT NULL,
                intensity_score REAL NOT NULL,
                violence_index REAL NOT NULL,
                engagement_style REAL NOT NULL,
                finish_rate REAL NOT NULL,
                avg_fight_time REAL NOT NULL,
                fight_count INTEGER NOT NULL,
                computed_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_fights_event ON fights(event_name, bout);
            CREATE INDEX IF NOT EXISTS idx_round_stats_bout ON round_fight_stats(event_name, bout);
            CREATE INDEX IF NOT EXISTS idx_user_votes_user ON user_votes(user_id);
            "#,
        )?;
        Ok(())
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(",")
    }

    pub fn insert_fight(&self, fight: &FightRecord) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO fights (id, event_name, bout, status, weight_class, method, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                event_name = ?2, bout = ?3, status = ?4, weight_class = ?5, method = ?6
            "#,
            params![
                fight.id,
                fight.event_name,
                fight.bout,
                fight.status.as_str(),
                fight.weight_class,
                fight.method,
                Self::now(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_round_stats(&self, rows: &[RawRoundStat]) -> Result<u32> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO round_fight_stats
                (event_name, bout, round, fighter_name, kd, sig_strikes_attempted,
                 sig_strikes_head_attempted, sig_strikes_body_attempted, sig_strikes_leg_attempted,
                 sig_strikes_ground_attempted, takedowns_attempted, sub_attempts, control_time_sec)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    row.event_name,
                    row.bout,
                    row.round,
                    row.fighter_name,
                    row.kd,
                    row.sig_strikes_attempted,
                    row.sig_strikes_head_attempted,
                    row.sig_strikes_body_attempted,
                    row.sig_strikes_leg_attempted,
                    row.sig_strikes_ground_attempted,
                    row.takedowns_attempted,
                    row.sub_attempts,
                    row.control_time_sec,
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        Ok(count)
    }

    pub fn insert_bout_meta(&self, meta: &BoutMeta) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO fight_meta_details (event_name, bout, round, time, method)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(event_name, bout) DO UPDATE SET round = ?3, time = ?4, method = ?5
            "#,
            params![meta.event_name, meta.bout, meta.round, meta.time, meta.method],
        )?;
        Ok(())
    }

    pub fn get_fights_by_status(&self, status: FightStatus) -> Result<Vec<FightRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, event_name, bout, status, weight_class, method FROM fights WHERE status = ?1",
        )?;
        let fights = stmt
            .query_map(params![status.as_str()], fight_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(fights)
    }

    fn raw_rows_for_events(&self, event_names: &[String]) -> Result<Vec<RawRoundStat>> {
        if event_names.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT event_name, bout, round, fighter_name, kd, sig_strikes_attempted,
                   sig_strikes_head_attempted, sig_strikes_body_attempted, sig_strikes_leg_attempted,
                   sig_strikes_ground_attempted, takedowns_attempted, sub_attempts, control_time_sec
            FROM round_fight_stats WHERE event_name IN ({})
            "#,
            Self::placeholders(event_names.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(event_names.iter()), |row| {
                Ok(RawRoundStat {
                    event_name: row.get(0)?,
                    bout: row.get(1)?,
                    round: row.get(2)?,
                    fighter_name: row.get(3)?,
                    kd: row.get(4)?,
                    sig_strikes_attempted: row.get(5)?,
                    sig_strikes_head_attempted: row.get(6)?,
                    sig_strikes_body_attempted: row.get(7)?,
                    sig_strikes_leg_attempted: row.get(8)?,
                    sig_strikes_ground_attempted: row.get(9)?,
                    takedowns_attempted: row.get(10)?,
                    sub_attempts: row.get(11)?,
                    control_time_sec: row.get(12)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn meta_for_events(&self, event_names: &[String]) -> Result<Vec<BoutMeta>> {
        if event_names.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let sql = format!(
            "SELECT event_name, bout, round, time, method FROM fight_meta_details WHERE event_name IN ({})",
            Self::placeholders(event_names.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let metas = stmt
            .query_map(params_from_iter(event_names.iter()), |row| {
                Ok(BoutMeta {
                    event_name: row.get(0)?,
                    bout: row.get(1)?,
                    round: row.get(2)?,
                    time: row.get(3)?,
                    method: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(metas)
    }

    /// Recompute the metric cache for every completed fight from its raw rows,
    /// then derive the baseline from the whole cache.
    pub fn refresh_metrics(&self) -> Result<MetricsRefresh> {
        let fights = self.get_fights_by_status(FightStatus::Completed)?;
        let mut events: Vec<String> = fights.iter().map(|f| f.event_name.clone()).collect();
        events.sort();
        events.dedup();

        let rows = self.raw_rows_for_events(&events)?;
        let metas = self.meta_for_events(&events)?;
        let metrics = aggregate_fights(&fights, &rows, &metas);

        let now = Self::now();
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM fight_metrics", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO fight_metrics
                (fight_id, pace, intensity, violence, control, finish, duration,
                 head_strikes, body_strikes, leg_strikes, computed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )?;
            for m in &metrics {
                stmt.execute(params![
                    m.fight_id,
                    m.pace,
                    m.intensity,
                    m.violence_index,
                    m.control,
                    m.finish_flag,
                    m.duration_minutes,
                    m.head_strikes,
                    m.body_strikes,
                    m.leg_strikes,
                    now,
                ])?;
            }
        }

        let baseline = Baseline::from_metrics(&metrics);
        match &baseline {
            Some(b) => {
                tx.execute(
                    r#"
                    INSERT INTO baselines
                    (id, strike_pace, intensity_score, violence_index, engagement_style,
                     finish_rate, avg_fight_time, fight_count, computed_at)
                    VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(id) DO UPDATE SET
                        strike_pace = ?1, intensity_score = ?2, violence_index = ?3,
                        engagement_style = ?4, finish_rate = ?5, avg_fight_time = ?6,
                        fight_count = ?7, computed_at = ?8
                    "#,
                    params![
                        b.strike_pace,
                        b.intensity_score,
                        b.violence_index,
                        b.engagement_style,
                        b.finish_rate,
                        b.avg_fight_time,
                        metrics.len() as i64,
                        now,
                    ],
                )?;
            }
            None => {
                tx.execute("DELETE FROM baselines", [])?;
            }
        }
        tx.commit()?;

        info!(
            "Refreshed metrics: {} of {} completed fights aggregated",
            metrics.len(),
            fights.len()
        );
        Ok(MetricsRefresh {
            completed_fights: fights.len(),
            aggregated: metrics.len(),
            baseline,
        })
    }

    fn metrics_for(&self, fight_ids: &[FightId], status: FightStatus) -> Result<Vec<NormalizedFightMetric>> {
        if fight_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT m.fight_id, m.pace, m.intensity, m.violence, m.control, m.finish, m.duration,
                   m.head_strikes, m.body_strikes, m.leg_strikes
            FROM fight_metrics m JOIN fights f ON f.id = m.fight_id
            WHERE f.status = ? AND m.fight_id IN ({})
            "#,
            Self::placeholders(fight_ids.len())
        );
        let mut args: Vec<&str> = vec![status.as_str()];
        args.extend(fight_ids.iter().map(String::as_str));

        let mut stmt = conn.prepare(&sql)?;
        let metrics = stmt
            .query_map(params_from_iter(args), metric_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(metrics)
    }

    fn all_completed_metrics(&self) -> Result<Vec<(FightRecord, NormalizedFightMetric)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT m.fight_id, m.pace, m.intensity, m.violence, m.control, m.finish, m.duration,
                   m.head_strikes, m.body_strikes, m.leg_strikes,
                   f.id, f.event_name, f.bout, f.status, f.weight_class, f.method
            FROM fight_metrics m JOIN fights f ON f.id = m.fight_id
            WHERE f.status = 'completed'
            "#,
        )?;
        let pairs = stmt
            .query_map([], |row| {
                let metric = metric_from_row(row)?;
                let fight = FightRecord {
                    id: row.get(10)?,
                    event_name: row.get(11)?,
                    bout: row.get(12)?,
                    status: status_from_sql(row.get::<_, String>(13)?),
                    weight_class: row.get(14)?,
                    method: row.get(15)?,
                };
                Ok((fight, metric))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pairs)
    }

    pub fn get_baseline(&self) -> Result<Option<Baseline>> {
        let conn = self.conn()?;
        let baseline = conn
            .query_row(
                r#"
                SELECT strike_pace, intensity_score, violence_index, engagement_style,
                       finish_rate, avg_fight_time
                FROM baselines WHERE id = 1
                "#,
                [],
                |row| {
                    Ok(Baseline {
                        strike_pace: row.get(0)?,
                        intensity_score: row.get(1)?,
                        violence_index: row.get(2)?,
                        engagement_style: row.get(3)?,
                        finish_rate: row.get(4)?,
                        avg_fight_time: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(baseline)
    }

    fn ratings_for(conn: &Connection, fight_id: &str) -> Result<Option<RatingCounts>> {
        let ratings = conn
            .query_row(
                "SELECT likes_count, dislikes_count, favorites_count FROM fight_ratings WHERE fight_id = ?1",
                params![fight_id],
                ratings_from_row,
            )
            .optional()?;
        Ok(ratings)
    }

    pub fn get_fight_listings(&self, fight_ids: &[FightId]) -> Result<Vec<FightListing>> {
        if fight_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT f.id, f.event_name, f.bout, f.status, f.weight_class, f.method,
                   r.likes_count, r.dislikes_count, r.favorites_count
            FROM fights f LEFT JOIN fight_ratings r ON r.fight_id = f.id
            WHERE f.id IN ({})
            "#,
            Self::placeholders(fight_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let listings = stmt
            .query_map(params_from_iter(fight_ids.iter()), listing_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(listings)
    }

    pub fn get_community_favorites(&self, limit: u32) -> Result<Vec<FightListing>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT f.id, f.event_name, f.bout, f.status, f.weight_class, f.method,
                   r.likes_count, r.dislikes_count, r.favorites_count
            FROM fights f JOIN fight_ratings r ON r.fight_id = f.id
            ORDER BY r.favorites_count DESC, r.likes_count DESC, r.dislikes_count ASC
            LIMIT ?1
            "#,
        )?;
        let listings = stmt
            .query_map(params![limit], listing_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(listings)
    }

    pub fn get_user_votes(&self, user_id: &str) -> Result<Vec<Vote>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, fight_id, vote_type FROM user_votes WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let stored = stmt
            .query_map(params![user_id], |row| {
                Ok(StoredVote {
                    user_id: row.get(0)?,
                    fight_id: row.get(1)?,
                    vote_type: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        stored
            .into_iter()
            .map(|v| {
                let vote_type = VoteType::parse(&v.vote_type)
                    .ok_or_else(|| Error::InvalidVote(format!("stored vote type '{}'", v.vote_type)))?;
                Ok(Vote {
                    user_id: v.user_id,
                    fight_id: v.fight_id,
                    vote_type,
                })
            })
            .collect()
    }

    /// Replace the user's vote on a fight and move the fight's counters with it
    pub fn set_vote(&self, user_id: &str, fight_id: &str, vote: Option<VoteType>) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let old: Option<String> = tx
            .query_row(
                "SELECT vote_type FROM user_votes WHERE user_id = ?1 AND fight_id = ?2",
                params![user_id, fight_id],
                |row| row.get(0),
            )
            .optional()?;
        let old = old.as_deref().and_then(VoteType::parse);

        match vote {
            Some(vote_type) => {
                tx.execute(
                    r#"
                    INSERT INTO user_votes (user_id, fight_id, vote_type, created_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(user_id, fight_id) DO UPDATE SET vote_type = ?3
                    "#,
                    params![user_id, fight_id, vote_type.as_str(), Self::now()],
                )?;
            }
            None => {
                tx.execute(
                    "DELETE FROM user_votes WHERE user_id = ?1 AND fight_id = ?2",
                    params![user_id, fight_id],
                )?;
            }
        }

        let mut counts = Self::ratings_for(&tx, fight_id)?.unwrap_or_default();
        counts.apply_vote_change(old, vote);
        tx.execute(
            r#"
            INSERT INTO fight_ratings (fight_id, likes_count, dislikes_count, favorites_count)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(fight_id) DO UPDATE SET
                likes_count = ?2, dislikes_count = ?3, favorites_count = ?4
            "#,
            params![fight_id, counts.likes_count, counts.dislikes_count, counts.favorites_count],
        )?;
        tx.commit()?;

        debug!(user_id, fight_id, ?old, new = ?vote, "Vote replaced");
        Ok(())
    }

    /// Completed fights the user has not voted on, nearest to `scalars` first.
    /// Each dimension is scaled by the baseline so no single unit dominates.
    pub fn rank_by_style(&self, user_id: &str, scalars: &ProfileScalars) -> Result<Vec<RankedFight>> {
        let voted: std::collections::HashSet<FightId> = self
            .get_user_votes(user_id)?
            .into_iter()
            .map(|v| v.fight_id)
            .collect();
        let baseline = self.get_baseline()?.unwrap_or_default();

        let mut scored: Vec<(f64, FightRecord)> = self
            .all_completed_metrics()?
            .into_iter()
            .filter(|(fight, _)| !voted.contains(&fight.id))
            .map(|(fight, m)| (style_distance(&m, scalars, &baseline), fight))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(STYLE_MATCH_LIMIT);

        let conn = self.conn()?;
        scored
            .into_iter()
            .map(|(_, fight)| {
                let ratings = Self::ratings_for(&conn, &fight.id)?;
                Ok(RankedFight {
                    fight,
                    ratings,
                    reason: None,
                })
            })
            .collect()
    }
}

/// Baseline-scaled Euclidean distance between a fight and a profile
fn style_distance(metric: &NormalizedFightMetric, scalars: &ProfileScalars, baseline: &Baseline) -> f64 {
    let scaled = |value: f64, target: f64, scale: f64| (value - target) / scale.abs().max(1e-6);
    let terms = [
        scaled(metric.pace, scalars.pace, baseline.strike_pace),
        scaled(metric.violence_index, scalars.violence, baseline.violence_index),
        scaled(metric.intensity, scalars.intensity, baseline.intensity_score),
        scaled(metric.control, scalars.control, baseline.engagement_style),
        scaled(f64::from(metric.finish_flag) * 100.0, scalars.finish, baseline.finish_rate),
        scaled(metric.duration_minutes, scalars.duration, baseline.avg_fight_time),
    ];
    terms.iter().map(|t| t * t).sum::<f64>().sqrt()
}

fn status_from_sql(value: String) -> FightStatus {
    FightStatus::parse(&value).unwrap_or_default()
}

fn fight_from_row(row: &Row) -> rusqlite::Result<FightRecord> {
    Ok(FightRecord {
        id: row.get(0)?,
        event_name: row.get(1)?,
        bout: row.get(2)?,
        status: status_from_sql(row.get(3)?),
        weight_class: row.get(4)?,
        method: row.get(5)?,
    })
}

fn listing_from_row(row: &Row) -> rusqlite::Result<FightListing> {
    let fight = fight_from_row(row)?;
    let likes: Option<u32> = row.get(6)?;
    let ratings = match likes {
        Some(likes_count) => Some(RatingCounts {
            likes_count,
            dislikes_count: row.get(7)?,
            favorites_count: row.get(8)?,
        }),
        None => None,
    };
    Ok(FightListing { fight, ratings })
}

fn ratings_from_row(row: &Row) -> rusqlite::Result<RatingCounts> {
    Ok(RatingCounts {
        likes_count: row.get(0)?,
        dislikes_count: row.get(1)?,
        favorites_count: row.get(2)?,
    })
}

fn metric_from_row(row: &Row) -> rusqlite::Result<NormalizedFightMetric> {
    Ok(NormalizedFightMetric {
        fight_id: row.get(0)?,
        pace: row.get(1)?,
        intensity: row.get(2)?,
        violence_index: row.get(3)?,
        control: row.get(4)?,
        finish_flag: row.get(5)?,
        duration_minutes: row.get(6)?,
        head_strikes: row.get(7)?,
        body_strikes: row.get(8)?,
        leg_strikes: row.get(9)?,
    })
}

#[async_trait]
impl FightStore for Database {
    async fn fetch_raw_round_stats(&self, event_names: &[String]) -> Result<Vec<RawRoundStat>> {
        self.raw_rows_for_events(event_names)
    }

    async fn fetch_bout_meta(&self, event_names: &[String]) -> Result<Vec<BoutMeta>> {
        self.meta_for_events(event_names)
    }

    async fn fetch_precomputed_metrics(
        &self,
        fight_ids: &[FightId],
        status: FightStatus,
    ) -> Result<Vec<NormalizedFightMetric>> {
        self.metrics_for(fight_ids, status)
    }

    async fn fetch_baseline(&self) -> Result<Option<Baseline>> {
        self.get_baseline()
    }

    async fn fetch_community_favorites(&self, limit: u32) -> Result<Vec<FightListing>> {
        self.get_community_favorites(limit)
    }

    async fn request_style_recommendations(
        &self,
        user_id: &str,
        scalars: &ProfileScalars,
    ) -> Result<Vec<RankedFight>> {
        self.rank_by_style(user_id, scalars)
    }

    async fn cast_vote(&self, user_id: &str, fight_id: &str, vote: Option<VoteType>) -> Result<()> {
        self.set_vote(user_id, fight_id, vote)
    }

    async fn fetch_user_votes(&self, user_id: &str) -> Result<Vec<Vote>> {
        self.get_user_votes(user_id)
    }

    async fn fetch_fights(&self, fight_ids: &[FightId]) -> Result<Vec<FightListing>> {
        self.get_fight_listings(fight_ids)
    }
}
