//! Per-fight metric aggregation from round stats

use std::collections::HashMap;

use tracing::{debug, warn};

use super::duration::parse_duration_str;
use super::types::*;
use crate::error::Result;
use crate::votes::FightRecord;

/// Weight applied to the grappling work rate so typical bouts land in single digits
pub const INTENSITY_SCALE: f64 = 10.0;

/// Grappling work rate: takedown attempts plus control minutes, per fight minute.
pub fn intensity_score(takedowns_attempted: u64, control_seconds: u64, duration_minutes: f64) -> f64 {
    if duration_minutes <= 0.0 {
        return 0.0;
    }
    let grappling = takedowns_attempted as f64 + control_seconds as f64 / 60.0;
    INTENSITY_SCALE * grappling / duration_minutes
}

/// Bout totals, summed wide so any number of rows fits
#[derive(Debug, Default)]
struct BoutTotals {
    sig_strikes: u64,
    head: u64,
    body: u64,
    leg: u64,
    takedowns: u64,
    violence_events: u64,
    control_seconds: u64,
}

impl BoutTotals {
    fn from_rows(rows: &[RawRoundStat]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.sig_strikes += u64::from(row.sig_strikes_attempted);
            acc.head += u64::from(row.sig_strikes_head_attempted);
            acc.body += u64::from(row.sig_strikes_body_attempted);
            acc.leg += u64::from(row.sig_strikes_leg_attempted);
            acc.takedowns += u64::from(row.takedowns_attempted);
            acc.violence_events += u64::from(row.kd) + u64::from(row.sub_attempts);
            acc.control_seconds += u64::from(row.control_time_sec);
            acc
        })
    }
}

fn saturating_count(total: u64) -> u32 {
    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Aggregate one bout, surfacing a malformed duration as an error.
///
/// `Ok(None)` means there is nothing to aggregate: no rows, or a bout that
/// lasted no time at all.
pub fn try_fight_metric(
    fight_id: &str,
    rows: &[RawRoundStat],
    meta: &BoutMeta,
) -> Result<Option<NormalizedFightMetric>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let duration_minutes = parse_duration_str(&meta.round, &meta.time)?;
    if duration_minutes <= 0.0 {
        return Ok(None);
    }

    let totals = BoutTotals::from_rows(rows);
    let total_seconds = duration_minutes * 60.0;
    let control = (100.0 * totals.control_seconds as f64 / total_seconds)
        .round()
        .clamp(0.0, 100.0);

    Ok(Some(NormalizedFightMetric {
        fight_id: fight_id.to_string(),
        pace: totals.sig_strikes as f64 / duration_minutes,
        intensity: intensity_score(totals.takedowns, totals.control_seconds, duration_minutes),
        violence_index: totals.violence_events as f64 / duration_minutes,
        control,
        finish_flag: u8::from(meta.finish_method().is_finish()),
        duration_minutes,
        head_strikes: saturating_count(totals.head),
        body_strikes: saturating_count(totals.body),
        leg_strikes: saturating_count(totals.leg),
    }))
}

/// Aggregate one bout. A bout whose duration cannot be derived is logged and
/// excluded.
pub fn compute_fight_metric(
    fight_id: &str,
    rows: &[RawRoundStat],
    meta: &BoutMeta,
) -> Option<NormalizedFightMetric> {
    match try_fight_metric(fight_id, rows, meta) {
        Ok(metric) => metric,
        Err(e) => {
            warn!(fight_id, bout = %meta.bout, "Excluding bout from aggregation: {}", e);
            None
        }
    }
}

/// Aggregate every completed fight in `fights` from raw rows and meta, joined on
/// (event name, bout name). Fights without rows, without meta, or with a bad
/// clock are skipped; the rest of the batch is unaffected.
pub fn aggregate_fights(
    fights: &[FightRecord],
    rows: &[RawRoundStat],
    metas: &[BoutMeta],
) -> Vec<NormalizedFightMetric> {
    let mut rows_by_bout: HashMap<(&str, &str), Vec<RawRoundStat>> = HashMap::new();
    for row in rows {
        rows_by_bout
            .entry((row.event_name.as_str(), row.bout.as_str()))
            .or_default()
            .push(row.clone());
    }

    let meta_by_bout: HashMap<(&str, &str), &BoutMeta> = metas
        .iter()
        .map(|m| ((m.event_name.as_str(), m.bout.as_str()), m))
        .collect();

    let metrics: Vec<NormalizedFightMetric> = fights
        .iter()
        .filter(|f| f.status == FightStatus::Completed)
        .filter_map(|fight| {
            let key = (fight.event_name.as_str(), fight.bout.as_str());
            let meta = meta_by_bout.get(&key)?;
            let bout_rows = rows_by_bout.get(&key)?;
            compute_fight_metric(&fight.id, bout_rows, meta)
        })
        .collect();

    debug!(
        "Aggregated {} of {} fights from {} raw rows",
        metrics.len(),
        fights.len(),
        rows.len()
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(event: &str, bout: &str, sig: u32, td: u32, kd: u32, sub: u32, ctrl: u32) -> RawRoundStat {
        RawRoundStat {
            event_name: event.to_string(),
            bout: bout.to_string(),
            round: 1,
            sig_strikes_attempted: sig,
            takedowns_attempted: td,
            kd,
            sub_attempts: sub,
            control_time_sec: ctrl,
            ..Default::default()
        }
    }

    fn meta(event: &str, bout: &str, round: &str, time: &str, method: &str) -> BoutMeta {
        BoutMeta {
            event_name: event.to_string(),
            bout: bout.to_string(),
            round: round.to_string(),
            time: time.to_string(),
            method: method.to_string(),
        }
    }

    #[test]
    fn test_bout_a() {
        let rows = vec![row("E", "A", 60, 2, 0, 1, 30)];
        let m = compute_fight_metric("a", &rows, &meta("E", "A", "1", "03:00", "Decision - Unanimous")).unwrap();

        assert_eq!(m.duration_minutes, 3.0);
        assert_eq!(m.pace, 20.0);
        assert!((m.violence_index - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(m.control, 17.0);
        assert_eq!(m.finish_flag, 0);
    }

    #[test]
    fn test_bout_b_split_across_rows() {
        // Two rounds, both fighters, combined totals 40 sig, 1 kd, 200s control
        let rows = vec![
            row("E", "B", 15, 0, 0, 0, 120),
            row("E", "B", 10, 0, 1, 0, 0),
            row("E", "B", 10, 0, 0, 0, 80),
            row("E", "B", 5, 0, 0, 0, 0),
        ];
        let m = compute_fight_metric("b", &rows, &meta("E", "B", "2", "01:00", "KO/TKO")).unwrap();

        assert_eq!(m.duration_minutes, 6.0);
        assert!((m.pace - 40.0 / 6.0).abs() < 1e-9);
        assert!((m.violence_index - 1.0 / 6.0).abs() < 1e-9);
        assert_eq!(m.control, 56.0);
        assert_eq!(m.finish_flag, 1);
    }

    #[test]
    fn test_target_totals_stay_raw() {
        let mut r = row("E", "A", 30, 0, 0, 0, 0);
        r.sig_strikes_head_attempted = 20;
        r.sig_strikes_body_attempted = 6;
        r.sig_strikes_leg_attempted = 4;
        let m = compute_fight_metric("a", &[r.clone(), r], &meta("E", "A", "3", "5:00", "Decision")).unwrap();

        assert_eq!((m.head_strikes, m.body_strikes, m.leg_strikes), (40, 12, 8));
    }

    #[test]
    fn test_intensity_formula() {
        let rows = vec![row("E", "A", 0, 3, 0, 0, 120)];
        let m = compute_fight_metric("a", &rows, &meta("E", "A", "1", "5:00", "Decision")).unwrap();
        // 10 * (3 + 2) / 5
        assert!((m.intensity - 10.0).abs() < 1e-9);
        assert_eq!(intensity_score(3, 120, 0.0), 0.0);
    }

    #[test]
    fn test_empty_rows_yield_none() {
        assert!(compute_fight_metric("a", &[], &meta("E", "A", "1", "3:00", "KO/TKO")).is_none());
    }

    #[test]
    fn test_zero_duration_and_bad_clock_are_excluded() {
        let rows = vec![row("E", "A", 10, 0, 0, 0, 0)];
        assert!(compute_fight_metric("a", &rows, &meta("E", "A", "1", "0:00", "KO/TKO")).is_none());
        assert!(compute_fight_metric("a", &rows, &meta("E", "A", "1", "garbage", "KO/TKO")).is_none());
        assert!(try_fight_metric("a", &rows, &meta("E", "A", "1", "garbage", "KO/TKO")).is_err());
    }

    #[test]
    fn test_control_is_clamped() {
        // Bad upstream data: more control than the bout lasted
        let rows = vec![row("E", "A", 10, 0, 0, 0, 900)];
        let m = compute_fight_metric("a", &rows, &meta("E", "A", "1", "5:00", "Decision")).unwrap();
        assert_eq!(m.control, 100.0);
    }

    #[test]
    fn test_large_counts_sum_without_overflow() {
        let mut r = row("E", "A", u32::MAX, u32::MAX, u32::MAX, u32::MAX, 60);
        r.sig_strikes_head_attempted = u32::MAX;
        let rows = vec![r.clone(), r];
        let m = compute_fight_metric("a", &rows, &meta("E", "A", "1", "1:00", "Decision")).unwrap();

        assert_eq!(m.pace, 2.0 * u32::MAX as f64);
        assert_eq!(m.violence_index, 4.0 * u32::MAX as f64);
        assert_eq!(m.head_strikes, u32::MAX);
        assert!(m.intensity.is_finite());
    }

    #[test]
    fn test_batch_skips_bad_bouts() {
        let fights = vec![
            FightRecord::completed("1", "E", "A"),
            FightRecord::completed("2", "E", "B"),
            FightRecord::completed("3", "E", "C"),
            FightRecord {
                status: FightStatus::Upcoming,
                ..FightRecord::completed("4", "E", "D")
            },
        ];
        let rows = vec![
            row("E", "A", 60, 2, 0, 1, 30),
            row("E", "B", 40, 0, 1, 0, 200),
            row("E", "D", 40, 0, 1, 0, 200),
        ];
        let metas = vec![
            meta("E", "A", "1", "03:00", "Decision"),
            meta("E", "B", "2", "bad", "KO/TKO"),
            meta("E", "C", "1", "1:00", "KO/TKO"),
            meta("E", "D", "1", "1:00", "KO/TKO"),
        ];

        let metrics = aggregate_fights(&fights, &rows, &metas);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].fight_id, "1");
    }
}
