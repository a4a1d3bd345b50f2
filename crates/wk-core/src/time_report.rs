//! Read models for time reports: items, days, and weeks.

use std::fmt::Display;

use chrono::{NaiveDate, TimeZone};

use crate::time::{HoursMinutes, HoursMinutesFormat, Milliseconds};
use crate::time_interval::{TimeInterval, TimeIntervalState};
use crate::types::TimeIntervalId;

/// Reference working day that day summaries are compared against.
pub const WORKING_DAY: HoursMinutes = HoursMinutes::new(8, 0);

/// One interval as shown in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeReportItem {
    interval: TimeInterval,
}

impl TimeReportItem {
    #[must_use]
    pub const fn new(interval: TimeInterval) -> Self {
        Self { interval }
    }

    #[must_use]
    pub const fn interval(&self) -> &TimeInterval {
        &self.interval
    }

    #[must_use]
    pub const fn id(&self) -> TimeIntervalId {
        self.interval.id()
    }

    #[must_use]
    pub const fn state(&self) -> TimeIntervalState {
        self.interval.state()
    }

    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.interval.is_registered()
    }

    /// `HH:MM` while active, `HH:MM - HH:MM` once clocked out.
    pub fn title<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let start = self.interval.start().in_zone(tz).format("%H:%M");
        match self.interval.stop() {
            None => start.to_string(),
            Some(stop) => format!("{start} - {}", stop.in_zone(tz).format("%H:%M")),
        }
    }

    /// Duration of the interval, counting an active one up to `now`.
    #[must_use]
    pub fn time_summary(&self, now: Milliseconds) -> HoursMinutes {
        HoursMinutes::from_milliseconds(self.interval.calculate_interval(now))
    }
}

impl From<TimeInterval> for TimeReportItem {
    fn from(interval: TimeInterval) -> Self {
        Self::new(interval)
    }
}

/// Intervals that started on one local calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeReportDay {
    pub date: NaiveDate,
    /// Most recent first.
    pub items: Vec<TimeReportItem>,
}

impl TimeReportDay {
    /// `Sun (Dec 29)`
    pub fn title(&self) -> String {
        self.date.format("%a (%b %-d)").to_string()
    }

    #[must_use]
    pub fn time_summary(&self, now: Milliseconds) -> HoursMinutes {
        HoursMinutes::accumulated(self.items.iter().map(|item| item.time_summary(now)))
    }

    /// Summary minus [`WORKING_DAY`].
    #[must_use]
    pub fn time_difference(&self, now: Milliseconds) -> HoursMinutes {
        self.time_summary(now) - WORKING_DAY
    }

    /// True when every item is registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.items.iter().all(TimeReportItem::is_registered)
    }

    /// Summary followed by the signed difference, e.g. `9:07 (+1:07)`.
    pub fn time_summary_with_difference(
        &self,
        now: Milliseconds,
        format: HoursMinutesFormat,
    ) -> String {
        summary_with_difference(self.time_summary(now), self.time_difference(now), format)
    }
}

/// Days of one Monday-anchored week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeReportWeek {
    /// Monday of the week.
    pub start: NaiveDate,
    /// Most recent first.
    pub days: Vec<TimeReportDay>,
}

impl TimeReportWeek {
    /// `Week of Dec 30, 2019`
    pub fn title(&self) -> String {
        format!("Week of {}", self.start.format("%b %-d, %Y"))
    }

    #[must_use]
    pub fn time_summary(&self, now: Milliseconds) -> HoursMinutes {
        HoursMinutes::accumulated(self.days.iter().map(|day| day.time_summary(now)))
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.days.iter().all(TimeReportDay::is_registered)
    }

    pub fn items(&self) -> impl Iterator<Item = &TimeReportItem> {
        self.days.iter().flat_map(|day| day.items.iter())
    }
}

fn summary_with_difference(
    summary: HoursMinutes,
    difference: HoursMinutes,
    format: HoursMinutesFormat,
) -> String {
    let summary = format.format(summary);
    if difference.is_empty() {
        return summary;
    }
    let sign = if difference.is_positive() { "+" } else { "" };
    format!("{summary} ({sign}{})", format.format(difference))
}
