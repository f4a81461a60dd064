//! Bout statistics and normalized per-fight metrics

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a fight in the store. Hosted rows may carry numeric ids,
/// so ids are always held as strings.
pub type FightId = String;

/// One row of round-by-round stats for a single fighter in a bout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRoundStat {
    pub event_name: String,
    pub bout: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub round: u32,
    #[serde(default)]
    pub fighter_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub kd: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sig_strikes_attempted: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sig_strikes_head_attempted: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sig_strikes_body_attempted: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sig_strikes_leg_attempted: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sig_strikes_ground_attempted: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub takedowns_attempted: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sub_attempts: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub control_time_sec: u32,
}

impl RawRoundStat {
    pub fn belongs_to(&self, event_name: &str, bout: &str) -> bool {
        self.event_name == event_name && self.bout == bout
    }
}

/// How a bout ended, at the granularity the metrics care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishMethod {
    KoTko,
    Submission,
    Decision,
    Other(String),
}

impl FinishMethod {
    /// Classify a method string as the stats site writes it
    /// ("KO/TKO", "Submission", "Decision - Unanimous", "TKO - Doctor's Stoppage", ...).
    pub fn from_method(method: &str) -> Self {
        let normalized = method.trim().to_ascii_lowercase();
        if normalized.starts_with("ko") || normalized.starts_with("tko") {
            FinishMethod::KoTko
        } else if normalized.starts_with("sub") {
            FinishMethod::Submission
        } else if normalized.starts_with("decision") {
            FinishMethod::Decision
        } else {
            FinishMethod::Other(method.trim().to_string())
        }
    }

    pub fn is_finish(&self) -> bool {
        matches!(self, FinishMethod::KoTko | FinishMethod::Submission)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FinishMethod::KoTko => "KO/TKO",
            FinishMethod::Submission => "Submission",
            FinishMethod::Decision => "Decision",
            FinishMethod::Other(raw) => raw,
        }
    }
}

/// End-of-bout details for one bout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoutMeta {
    pub event_name: String,
    pub bout: String,
    /// Round the bout ended in, as stored (text upstream)
    #[serde(default, deserialize_with = "string_or_number")]
    pub round: String,
    /// Clock reading within the final round, "MM:SS"
    #[serde(default, deserialize_with = "string_or_number")]
    pub time: String,
    #[serde(default)]
    pub method: String,
}

impl BoutMeta {
    pub fn finish_method(&self) -> FinishMethod {
        FinishMethod::from_method(&self.method)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FightStatus {
    /// Rows scraped before status existed are historic bouts
    #[default]
    Completed,
    Upcoming,
}

impl FightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FightStatus::Completed => "completed",
            FightStatus::Upcoming => "upcoming",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(FightStatus::Completed),
            "upcoming" => Some(FightStatus::Upcoming),
            _ => None,
        }
    }
}

/// Bout-combined rates for one fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFightMetric {
    pub fight_id: FightId,
    /// Significant strikes attempted per minute, both fighters
    pub pace: f64,
    /// Grappling work rate
    pub intensity: f64,
    /// Knockdowns plus submission attempts per minute
    pub violence_index: f64,
    /// Percent of bout time under control, 0-100
    pub control: f64,
    /// 1 for KO/TKO or submission, otherwise 0
    pub finish_flag: u8,
    pub duration_minutes: f64,
    pub head_strikes: u32,
    pub body_strikes: u32,
    pub leg_strikes: u32,
}

impl NormalizedFightMetric {
    pub fn is_finish(&self) -> bool {
        self.finish_flag == 1
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Accepts `"3"`, `3` or `null` and yields a string ("" for null).
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    })
}
