//! Combat DNA profile, baselines and comparisons

use serde::{Deserialize, Serialize};

use crate::config::IntensityThresholds;
use crate::metrics::NormalizedFightMetric;

/// A user's averaged fight metrics over the fights they rated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatDnaProfile {
    /// Mean strikes attempted per minute, 2 decimals
    pub strike_pace: f64,
    /// Mean grappling work rate, 2 decimals
    pub intensity_score: f64,
    /// Mean knockdowns + submission attempts per minute, 2 decimals
    pub violence_index: f64,
    /// Mean control percentage, whole number
    pub engagement_style: f64,
    /// Percent of fights that ended in a finish, whole number
    pub finish_rate: f64,
    /// Mean fight length in minutes, 1 decimal
    pub avg_fight_time: f64,
    pub avg_head_strikes: u32,
    pub avg_body_strikes: u32,
    pub avg_leg_strikes: u32,
    /// Number of fights the profile was built from
    pub fight_count: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Average a set of per-fight metrics into a profile.
///
/// Returns `None` for an empty set: a user with no rated completed fights has
/// no profile, not a profile of zeros.
pub fn compute_profile(metrics: &[NormalizedFightMetric]) -> Option<CombatDnaProfile> {
    if metrics.is_empty() {
        return None;
    }

    let n = metrics.len() as f64;
    let mean = |f: fn(&NormalizedFightMetric) -> f64| metrics.iter().map(f).sum::<f64>() / n;
    let finishes = metrics.iter().filter(|m| m.is_finish()).count() as f64;

    Some(CombatDnaProfile {
        strike_pace: round_to(mean(|m| m.pace), 2),
        intensity_score: round_to(mean(|m| m.intensity), 2),
        violence_index: round_to(mean(|m| m.violence_index), 2),
        engagement_style: mean(|m| m.control).round(),
        finish_rate: (100.0 * finishes / n).round(),
        avg_fight_time: round_to(mean(|m| m.duration_minutes), 1),
        avg_head_strikes: mean(|m| f64::from(m.head_strikes)).round() as u32,
        avg_body_strikes: mean(|m| f64::from(m.body_strikes)).round() as u32,
        avg_leg_strikes: mean(|m| f64::from(m.leg_strikes)).round() as u32,
        fight_count: metrics.len(),
    })
}

/// Population-wide averages of the headline profile fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub strike_pace: f64,
    pub intensity_score: f64,
    pub violence_index: f64,
    pub engagement_style: f64,
    pub finish_rate: f64,
    pub avg_fight_time: f64,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            strike_pace: 30.5,
            intensity_score: 4.03,
            violence_index: 0.15,
            engagement_style: 45.0,
            finish_rate: 48.0,
            avg_fight_time: 10.5,
        }
    }
}

/// Baseline row as stored; any missing column keeps its default
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialBaseline {
    pub strike_pace: Option<f64>,
    pub intensity_score: Option<f64>,
    pub violence_index: Option<f64>,
    pub engagement_style: Option<f64>,
    pub finish_rate: Option<f64>,
    pub avg_fight_time: Option<f64>,
}

impl Baseline {
    /// Overlay the columns present in `partial` onto the defaults
    pub fn from_partial(partial: PartialBaseline) -> Self {
        let d = Self::default();
        Self {
            strike_pace: partial.strike_pace.unwrap_or(d.strike_pace),
            intensity_score: partial.intensity_score.unwrap_or(d.intensity_score),
            violence_index: partial.violence_index.unwrap_or(d.violence_index),
            engagement_style: partial.engagement_style.unwrap_or(d.engagement_style),
            finish_rate: partial.finish_rate.unwrap_or(d.finish_rate),
            avg_fight_time: partial.avg_fight_time.unwrap_or(d.avg_fight_time),
        }
    }

    /// Baseline of a whole metric population, through the same averaging as a profile
    pub fn from_metrics(metrics: &[NormalizedFightMetric]) -> Option<Self> {
        compute_profile(metrics).map(|p| Self {
            strike_pace: p.strike_pace,
            intensity_score: p.intensity_score,
            violence_index: p.violence_index,
            engagement_style: p.engagement_style,
            finish_rate: p.finish_rate,
            avg_fight_time: p.avg_fight_time,
        })
    }
}

/// Signed difference between a user value and its baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineComparison {
    pub delta: f64,
    pub is_above_baseline: bool,
}

/// Compare a user value with a baseline value. Absent or non-finite inputs
/// count as zero; this only drives the delta shown next to a stat.
pub fn compare_to_baseline(value: Option<f64>, baseline: Option<f64>) -> BaselineComparison {
    let safe = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0);
    let delta = safe(value) - safe(baseline);
    BaselineComparison {
        delta,
        is_above_baseline: delta > 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileComparison {
    pub strike_pace: BaselineComparison,
    pub intensity_score: BaselineComparison,
    pub violence_index: BaselineComparison,
    pub engagement_style: BaselineComparison,
    pub finish_rate: BaselineComparison,
    pub avg_fight_time: BaselineComparison,
}

impl CombatDnaProfile {
    pub fn compare(&self, baseline: &Baseline) -> ProfileComparison {
        let cmp = |user: f64, base: f64| compare_to_baseline(Some(user), Some(base));
        ProfileComparison {
            strike_pace: cmp(self.strike_pace, baseline.strike_pace),
            intensity_score: cmp(self.intensity_score, baseline.intensity_score),
            violence_index: cmp(self.violence_index, baseline.violence_index),
            engagement_style: cmp(self.engagement_style, baseline.engagement_style),
            finish_rate: cmp(self.finish_rate, baseline.finish_rate),
            avg_fight_time: cmp(self.avg_fight_time, baseline.avg_fight_time),
        }
    }

    pub fn intensity_label(&self, thresholds: &IntensityThresholds) -> IntensityLabel {
        IntensityLabel::classify(self.intensity_score, thresholds)
    }

    pub fn target_distribution(&self) -> TargetDistribution {
        TargetDistribution::new(self.avg_head_strikes, self.avg_body_strikes, self.avg_leg_strikes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityLabel {
    Mauler,
    ActiveGrappler,
    ControlFocused,
}

impl IntensityLabel {
    pub fn classify(score: f64, thresholds: &IntensityThresholds) -> Self {
        if score > thresholds.mauler {
            IntensityLabel::Mauler
        } else if score > thresholds.active_grappler {
            IntensityLabel::ActiveGrappler
        } else {
            IntensityLabel::ControlFocused
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IntensityLabel::Mauler => "MAULER",
            IntensityLabel::ActiveGrappler => "ACTIVE GRAPPLER",
            IntensityLabel::ControlFocused => "CONTROL FOCUSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetZone {
    Head,
    Body,
    Legs,
}

/// Share of average target strikes per zone, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDistribution {
    pub head_pct: u32,
    pub body_pct: u32,
    pub leg_pct: u32,
}

impl TargetDistribution {
    pub fn new(head: u32, body: u32, legs: u32) -> Self {
        let total = match head + body + legs {
            0 => 1.0,
            t => f64::from(t),
        };
        let pct = |v: u32| (f64::from(v) / total * 100.0).round() as u32;
        Self {
            head_pct: pct(head),
            body_pct: pct(body),
            leg_pct: pct(legs),
        }
    }

    /// Zones from most to least targeted; ties keep head, body, legs order
    pub fn ranked(&self) -> [(TargetZone, u32); 3] {
        let mut zones = [
            (TargetZone::Head, self.head_pct),
            (TargetZone::Body, self.body_pct),
            (TargetZone::Legs, self.leg_pct),
        ];
        zones.sort_by(|a, b| b.1.cmp(&a.1));
        zones
    }
}
