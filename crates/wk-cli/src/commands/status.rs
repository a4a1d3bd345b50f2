//! Status command for showing clocked-in projects.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;
use wk_core::{
    FindActiveProjects, GetProjectTimeSince, HoursMinutesFormat, Milliseconds,
    TimeIntervalRepository, TimeIntervalStartingPoint,
};

use crate::store::Store;

pub fn run<W, Tz>(
    writer: &mut W,
    store: &Store,
    starting_point: TimeIntervalStartingPoint,
    format: HoursMinutesFormat,
    now: Milliseconds,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let active = FindActiveProjects::new(&store.projects, &store.intervals).run();
    if active.is_empty() {
        writeln!(writer, "No project is clocked in.")?;
        return Ok(());
    }

    let time_since = GetProjectTimeSince::new(&store.intervals, tz.clone());
    for project in active {
        let Some(interval) = store.intervals.find_active_by_project_id(project.id) else {
            continue;
        };
        let summary = time_since.time_summary(&project, starting_point, now);
        writeln!(
            writer,
            "{}: clocked in since {}, {} this {starting_point}",
            project.name,
            interval.start().in_zone(tz).format("%H:%M"),
            format.format(summary)
        )?;
    }
    Ok(())
}
