//! Bucketing intervals into report days and weeks.
//!
//! Days are keyed by the local calendar date of each interval's start, weeks
//! by the Monday of that date. Both come out most recent first, and only
//! buckets that contain at least one interval exist.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};

use crate::date::{local_date, week_start_date};
use crate::time::Milliseconds;
use crate::time_interval::TimeInterval;
use crate::time_report::{TimeReportDay, TimeReportItem, TimeReportWeek};

/// Orders by start, then stop (active counts as latest), then id, all descending.
pub fn most_recent_first(a: &TimeInterval, b: &TimeInterval) -> Ordering {
    fn stop_key(interval: &TimeInterval) -> Milliseconds {
        interval.stop().unwrap_or(Milliseconds::new(i64::MAX))
    }

    b.start()
        .cmp(&a.start())
        .then_with(|| stop_key(b).cmp(&stop_key(a)))
        .then_with(|| b.id().cmp(&a.id()))
}

/// Groups intervals by the local date they started on.
pub fn group_by_day<Tz, I>(intervals: I, tz: &Tz) -> Vec<TimeReportDay>
where
    Tz: TimeZone,
    I: IntoIterator<Item = TimeInterval>,
{
    let mut buckets: BTreeMap<NaiveDate, Vec<TimeInterval>> = BTreeMap::new();
    for interval in intervals {
        buckets
            .entry(local_date(interval.start(), tz))
            .or_default()
            .push(interval);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(date, mut intervals)| {
            intervals.sort_by(most_recent_first);
            TimeReportDay {
                date,
                items: intervals.into_iter().map(TimeReportItem::new).collect(),
            }
        })
        .collect()
}

/// Groups intervals by day, then the days by Monday-anchored week.
pub fn group_by_week<Tz, I>(intervals: I, tz: &Tz) -> Vec<TimeReportWeek>
where
    Tz: TimeZone,
    I: IntoIterator<Item = TimeInterval>,
{
    let mut weeks: Vec<TimeReportWeek> = Vec::new();
    // Days arrive most recent first, so days of one week are adjacent.
    for day in group_by_day(intervals, tz) {
        let start = week_start_date(day.date);
        match weeks.last_mut() {
            Some(week) if week.start == start => week.days.push(day),
            _ => weeks.push(TimeReportWeek {
                start,
                days: vec![day],
            }),
        }
    }
    weeks
}

/// Drops registered intervals.
pub fn filter_registered<I>(intervals: I) -> Vec<TimeInterval>
where
    I: IntoIterator<Item = TimeInterval>,
{
    intervals
        .into_iter()
        .filter(|interval| !interval.is_registered())
        .collect()
}
