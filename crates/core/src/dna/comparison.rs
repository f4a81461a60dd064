//! Scatter points for comparing rated fights by metric

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::metrics::{FightId, NormalizedFightMetric};
use crate::votes::FightRecord;

/// Label used when a metric's fight is not among the supplied records
pub const UNKNOWN_FIGHT: &str = "Unknown Fight";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub fight_id: FightId,
    pub display_name: String,
    pub pace: f64,
    pub intensity: f64,
    pub violence_index: f64,
    pub control: f64,
}

/// One point per metric, in input order, labelled with the bout name.
pub fn build_comparison_dataset(
    metrics: &[NormalizedFightMetric],
    fights: &[FightRecord],
) -> Vec<ChartPoint> {
    let names: HashMap<&str, &str> = fights
        .iter()
        .map(|f| (f.id.as_str(), f.bout.as_str()))
        .collect();

    metrics
        .iter()
        .map(|m| ChartPoint {
            fight_id: m.fight_id.clone(),
            display_name: names
                .get(m.fight_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN_FIGHT)
                .to_string(),
            pace: m.pace,
            intensity: m.intensity,
            violence_index: m.violence_index,
            control: m.control,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(id: &str, pace: f64) -> NormalizedFightMetric {
        NormalizedFightMetric {
            fight_id: id.to_string(),
            pace,
            intensity: 1.0,
            violence_index: 0.1,
            control: 20.0,
            finish_flag: 0,
            duration_minutes: 15.0,
            head_strikes: 0,
            body_strikes: 0,
            leg_strikes: 0,
        }
    }

    #[test]
    fn test_order_and_count_preserved() {
        let metrics = vec![metric("3", 1.0), metric("1", 2.0), metric("3", 3.0)];
        let fights = vec![
            FightRecord::completed("1", "UFC 1", "Gracie vs Jimmerson"),
            FightRecord::completed("3", "UFC 1", "Shamrock vs Rizzo"),
        ];

        let points = build_comparison_dataset(&metrics, &fights);
        assert_eq!(points.len(), 3);
        let ids: Vec<&str> = points.iter().map(|p| p.fight_id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "3"]);
        assert_eq!(points[1].display_name, "Gracie vs Jimmerson");
        assert_eq!(points[2].pace, 3.0);
    }

    #[test]
    fn test_missing_fight_gets_placeholder() {
        let points = build_comparison_dataset(&[metric("9", 1.0)], &[]);
        assert_eq!(points[0].display_name, UNKNOWN_FIGHT);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_comparison_dataset(&[], &[]).is_empty());
    }
}
