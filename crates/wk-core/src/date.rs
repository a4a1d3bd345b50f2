//! Calendar bucketing over instants in an explicit time zone.
//!
//! Weeks are Monday-anchored. Midnight that falls in a DST gap resolves to
//! 1am local; an ambiguous midnight resolves to the earlier instant.

use std::fmt;

use chrono::{Datelike, LocalResult, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::time::Milliseconds;

/// Calendar date of `instant` in `tz`.
pub fn local_date<Tz: TimeZone>(instant: Milliseconds, tz: &Tz) -> NaiveDate {
    instant.in_zone(tz).date_naive()
}

/// Converts a local date at midnight to an instant.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Milliseconds {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.into(),
        LocalResult::None => {
            let one_am = midnight + chrono::Duration::hours(1);
            tz.from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| tz.from_utc_datetime(&midnight).into(), Into::into)
        }
    }
}

/// Monday of the week containing `date`.
pub fn week_start_date(date: NaiveDate) -> NaiveDate {
    let days_since_monday = date.weekday().num_days_from_monday();
    date - chrono::Duration::days(i64::from(days_since_monday))
}

/// First day of the month containing `date`.
pub fn month_start_date(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Start of the local day containing `instant`.
pub fn start_of_day<Tz: TimeZone>(instant: Milliseconds, tz: &Tz) -> Milliseconds {
    local_midnight(local_date(instant, tz), tz)
}

/// Start of the local Monday-anchored week containing `instant`.
pub fn start_of_week<Tz: TimeZone>(instant: Milliseconds, tz: &Tz) -> Milliseconds {
    local_midnight(week_start_date(local_date(instant, tz)), tz)
}

/// Last millisecond of the local week containing `instant`.
pub fn end_of_week<Tz: TimeZone>(instant: Milliseconds, tz: &Tz) -> Milliseconds {
    let next_monday = week_start_date(local_date(instant, tz)) + chrono::Duration::days(7);
    local_midnight(next_monday, tz) - Milliseconds::new(1)
}

/// Start of the local month containing `instant`.
pub fn start_of_month<Tz: TimeZone>(instant: Milliseconds, tz: &Tz) -> Milliseconds {
    local_midnight(month_start_date(local_date(instant, tz)), tz)
}

/// Where a "time since" summary starts counting from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeIntervalStartingPoint {
    Day,
    Week,
    #[default]
    Month,
}

impl TimeIntervalStartingPoint {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Resolves the starting point relative to `now`.
    pub fn since<Tz: TimeZone>(self, now: Milliseconds, tz: &Tz) -> Milliseconds {
        match self {
            Self::Day => start_of_day(now, tz),
            Self::Week => start_of_week(now, tz),
            Self::Month => start_of_month(now, tz),
        }
    }
}

impl fmt::Display for TimeIntervalStartingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeIntervalStartingPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(format!("invalid starting point: {s}")),
        }
    }
}
