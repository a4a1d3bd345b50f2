//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use wk_core::Milliseconds;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~100 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 100 * 365 * 24 * 60;

/// Parses a clock in/out instant.
///
/// Supports:
/// - RFC 3339: "2026-01-15T10:30:00Z"
/// - Local date and time: "2026-01-15 10:30"
/// - Local time today: "10:30"
/// - Relative: "15 minutes ago", "2 hours ago", "1 day ago"
pub fn parse_instant<Tz: TimeZone>(
    s: &str,
    now: Milliseconds,
    tz: &Tz,
) -> anyhow::Result<Milliseconds> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.into());
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return local_instant(&naive, tz);
    }

    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") {
        let today = now.in_zone(tz).date_naive();
        return local_instant(&today.and_time(time), tz);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid time: {s}. Use RFC 3339, 'YYYY-MM-DD HH:MM', 'HH:MM', or relative (e.g., '15 minutes ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(now - Milliseconds::new(duration.num_milliseconds()))
}

/// Resolves a local wall-clock time, picking the earlier instant when ambiguous.
fn local_instant<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> anyhow::Result<Milliseconds> {
    tz.from_local_datetime(naive)
        .earliest()
        .map(Milliseconds::from)
        .with_context(|| format!("{naive} does not exist in the local time zone"))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn instant(rfc3339: &str) -> Milliseconds {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().into()
    }

    #[test]
    fn test_parses_rfc3339() {
        let now = instant("2020-01-02T12:00:00Z");
        assert_eq!(
            parse_instant("2020-01-02T08:30:00+01:00", now, &Utc).unwrap(),
            instant("2020-01-02T07:30:00Z")
        );
    }

    #[test]
    fn test_parses_local_date_and_time() {
        let now = instant("2020-01-02T12:00:00Z");
        let tz = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            parse_instant("2020-01-01 09:15", now, &tz).unwrap(),
            instant("2020-01-01T08:15:00Z")
        );
    }

    #[test]
    fn test_parses_time_of_day_as_today() {
        let now = instant("2020-01-02T12:00:00Z");
        assert_eq!(
            parse_instant("08:05", now, &Utc).unwrap(),
            instant("2020-01-02T08:05:00Z")
        );
    }

    #[test]
    fn test_parses_relative_time() {
        let now = instant("2020-01-02T12:00:00Z");
        assert_eq!(
            parse_instant("15 minutes ago", now, &Utc).unwrap(),
            instant("2020-01-02T11:45:00Z")
        );
        assert_eq!(
            parse_instant("1 hour ago", now, &Utc).unwrap(),
            instant("2020-01-02T11:00:00Z")
        );
        assert_eq!(
            parse_instant("2 days ago", now, &Utc).unwrap(),
            instant("2019-12-31T12:00:00Z")
        );
    }

    #[test]
    fn test_rejects_garbage() {
        let now = instant("2020-01-02T12:00:00Z");
        let err = parse_instant("yesterday", now, &Utc).unwrap_err();
        assert!(err.to_string().contains("Invalid time: yesterday"));
    }

    #[test]
    fn test_rejects_huge_relative_values() {
        let now = instant("2020-01-02T12:00:00Z");
        assert!(parse_instant("99999999 days ago", now, &Utc).is_err());
    }
}
