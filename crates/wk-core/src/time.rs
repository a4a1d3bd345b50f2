//! Instants and hour/minute durations.
//!
//! [`Milliseconds`] is an instant (or span) measured in milliseconds since the
//! Unix epoch. [`HoursMinutes`] is a signed duration whose hour and minute
//! parts always carry the same sign, so `0:50 - 1:00` is `-0:10` rather than
//! `-1:50`.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MILLIS_PER_MINUTE: i64 = 60_000;
const MINUTES_PER_HOUR: i64 = 60;

/// Milliseconds since the Unix epoch, or a span in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliseconds(i64);

impl Milliseconds {
    pub const EMPTY: Self = Self(0);
    /// Earliest representable instant; `since` this includes everything.
    pub const MIN: Self = Self(i64::MIN);

    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The current wall-clock instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Converts the instant to a UTC date-time, saturating outside chrono's range.
    #[must_use]
    pub fn to_date_time(self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).unwrap_or(if self.0 < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }

    /// Converts the instant to a date-time in the given zone.
    #[must_use]
    pub fn in_zone<Tz: TimeZone>(self, tz: &Tz) -> DateTime<Tz> {
        self.to_date_time().with_timezone(tz)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Milliseconds {
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.timestamp_millis())
    }
}

impl Add for Milliseconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Milliseconds {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Milliseconds {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::EMPTY, Add::add)
    }
}

impl fmt::Display for Milliseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A signed duration in hours and minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "HoursMinutesRepr", into = "HoursMinutesRepr")]
pub struct HoursMinutes {
    // Stored as total minutes; hours and minutes are derived.
    total_minutes: i64,
}

impl HoursMinutes {
    pub const EMPTY: Self = Self { total_minutes: 0 };

    /// Builds a duration from parts, carrying minute overflow into hours.
    #[must_use]
    pub const fn new(hours: i64, minutes: i64) -> Self {
        Self::from_minutes(hours * MINUTES_PER_HOUR + minutes)
    }

    #[must_use]
    pub const fn from_minutes(total_minutes: i64) -> Self {
        Self { total_minutes }
    }

    /// Converts a millisecond span, rounding to the nearest minute.
    #[must_use]
    pub const fn from_milliseconds(value: Milliseconds) -> Self {
        let half_minute = MILLIS_PER_MINUTE / 2;
        Self::from_minutes(value.value().saturating_add(half_minute).div_euclid(MILLIS_PER_MINUTE))
    }

    #[must_use]
    pub const fn hours(self) -> i64 {
        self.total_minutes / MINUTES_PER_HOUR
    }

    /// Minutes past the hour, with the same sign as [`Self::hours`].
    #[must_use]
    pub const fn minutes(self) -> i64 {
        self.total_minutes % MINUTES_PER_HOUR
    }

    #[must_use]
    pub const fn total_minutes(self) -> i64 {
        self.total_minutes
    }

    #[must_use]
    pub const fn as_milliseconds(self) -> Milliseconds {
        Milliseconds::new(self.total_minutes.saturating_mul(MILLIS_PER_MINUTE))
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.total_minutes == 0
    }

    /// True when neither part is negative.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.total_minutes >= 0
    }

    /// Sums a sequence of durations, starting from `0:00`.
    pub fn accumulated<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        items.into_iter().fold(Self::EMPTY, Add::add)
    }
}

impl Add for HoursMinutes {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_minutes(self.total_minutes.saturating_add(rhs.total_minutes))
    }
}

impl Sub for HoursMinutes {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_minutes(self.total_minutes.saturating_sub(rhs.total_minutes))
    }
}

impl Neg for HoursMinutes {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_minutes(self.total_minutes.saturating_neg())
    }
}

impl Sum for HoursMinutes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::accumulated(iter)
    }
}

impl From<Milliseconds> for HoursMinutes {
    fn from(value: Milliseconds) -> Self {
        Self::from_milliseconds(value)
    }
}

impl fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&HoursMinutesFormat::Digital.format(*self))
    }
}

#[derive(Serialize, Deserialize)]
struct HoursMinutesRepr {
    hours: i64,
    minutes: i64,
}

impl From<HoursMinutesRepr> for HoursMinutes {
    fn from(value: HoursMinutesRepr) -> Self {
        Self::new(value.hours, value.minutes)
    }
}

impl From<HoursMinutes> for HoursMinutesRepr {
    fn from(value: HoursMinutes) -> Self {
        Self {
            hours: value.hours(),
            minutes: value.minutes(),
        }
    }
}

/// How a duration is rendered for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoursMinutesFormat {
    /// `H:MM`, e.g. `9:07` or `-0:08`.
    #[default]
    Digital,
    /// Decimal hours with two places, e.g. `9.12`.
    Fraction,
}

impl HoursMinutesFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::Fraction => "fraction",
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn format(self, value: HoursMinutes) -> String {
        match self {
            Self::Digital => {
                let sign = if value.is_positive() { "" } else { "-" };
                format!(
                    "{sign}{}:{:02}",
                    value.hours().abs(),
                    value.minutes().abs()
                )
            }
            Self::Fraction => {
                let hours = value.total_minutes() as f64 / MINUTES_PER_HOUR as f64;
                format!("{hours:.2}")
            }
        }
    }
}

impl fmt::Display for HoursMinutesFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HoursMinutesFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digital" => Ok(Self::Digital),
            "fraction" => Ok(Self::Fraction),
            _ => Err(format!("invalid time format: {s}")),
        }
    }
}

/// Fails with [`DomainError::ClockOutBeforeClockIn`] unless `start <= stop`.
pub(crate) fn ensure_ordered(
    start: Milliseconds,
    stop: Milliseconds,
) -> Result<(), DomainError> {
    if stop.value() < start.value() {
        return Err(DomainError::ClockOutBeforeClockIn { start, stop });
    }
    Ok(())
}
