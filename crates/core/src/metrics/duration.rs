//! Bout duration from end round and clock

use crate::error::{Error, Result};

/// Regulation round length in minutes
pub const ROUND_MINUTES: u32 = 5;

/// Total elapsed time of a bout that ended in `end_round` with `clock`
/// ("MM:SS", time elapsed within that round) showing.
///
/// Returns minutes as `(end_round - 1) * 5 + MM + SS / 60`.
pub fn parse_duration(end_round: u32, clock: &str) -> Result<f64> {
    if end_round == 0 {
        return Err(Error::malformed_duration(end_round, clock));
    }

    let (minutes, seconds) = parse_clock(clock)
        .ok_or_else(|| Error::malformed_duration(end_round, clock))?;

    let total = f64::from(end_round - 1) * f64::from(ROUND_MINUTES)
        + f64::from(minutes)
        + f64::from(seconds) / 60.0;

    if !total.is_finite() || total < 0.0 {
        return Err(Error::malformed_duration(end_round, clock));
    }
    Ok(total)
}

/// Same as [`parse_duration`] but with the round as stored upstream (text).
pub fn parse_duration_str(end_round: &str, clock: &str) -> Result<f64> {
    let round: u32 = end_round
        .trim()
        .parse()
        .map_err(|_| Error::malformed_duration(end_round, clock))?;
    parse_duration(round, clock)
}

fn parse_clock(clock: &str) -> Option<(u32, u32)> {
    let mut parts = clock.trim().split(':');
    let minutes = parts.next()?.trim().parse::<u32>().ok()?;
    let seconds = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() || seconds >= 60 {
        return None;
    }
    Some((minutes, seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_durations() {
        assert_eq!(parse_duration(1, "00:00").unwrap(), 0.0);
        assert_eq!(parse_duration(3, "02:30").unwrap(), 12.5);
        assert_eq!(parse_duration(1, "3:00").unwrap(), 3.0);
        assert_eq!(parse_duration(5, "5:00").unwrap(), 25.0);
    }

    #[test]
    fn test_monotonic_in_round_and_clock() {
        let clocks = ["0:00", "0:59", "1:00", "2:30", "4:59", "5:00"];
        let mut previous = -1.0;
        for round in 1..=5 {
            for clock in clocks {
                let value = parse_duration(round, clock).unwrap();
                assert!(value >= 0.0);
                assert!(value >= previous, "{round} {clock} went backwards");
                previous = value;
            }
        }
    }

    #[test]
    fn test_malformed_clock_is_rejected() {
        for clock in ["", "3", "3:", ":30", "a:bc", "1:2:3", "2:60", "-1:30", "2:-5"] {
            let err = parse_duration(2, clock).unwrap_err();
            assert!(matches!(err, Error::MalformedDuration { .. }), "{clock}");
        }
    }

    #[test]
    fn test_round_zero_is_rejected() {
        assert!(parse_duration(0, "1:00").is_err());
    }

    #[test]
    fn test_round_from_text() {
        assert_eq!(parse_duration_str("3", "2:30").unwrap(), 12.5);
        assert_eq!(parse_duration_str(" 2 ", "1:00").unwrap(), 6.0);
        assert!(parse_duration_str("", "1:00").is_err());
        assert!(parse_duration_str("two", "1:00").is_err());
    }

    #[test]
    fn test_huge_round_does_not_overflow() {
        let minutes = parse_duration_str("4294967295", "1:00").unwrap();
        assert_eq!(minutes, 4294967294.0 * 5.0 + 1.0);
        assert!(parse_duration(u32::MAX, "4294967295:59").unwrap().is_finite());
        assert!(parse_duration_str("4294967296", "1:00").is_err());
    }
}
