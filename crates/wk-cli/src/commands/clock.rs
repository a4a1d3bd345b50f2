//! `wk clock in` and `wk clock out`.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;
use wk_core::{ClockIn, ClockOut, FindProjects, HoursMinutes, HoursMinutesFormat, Milliseconds};

use crate::store::Store;

pub fn clock_in<W, Tz>(
    writer: &mut W,
    store: &Store,
    project: &str,
    at: Milliseconds,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let project = FindProjects::new(&store.projects).by_name(project)?;
    let interval = ClockIn::new(&store.intervals).run(&project, at)?;
    writeln!(
        writer,
        "Clocked in to {} at {} (interval {})",
        project.name,
        interval.start().in_zone(tz).format("%H:%M"),
        interval.id()
    )?;
    Ok(())
}

pub fn clock_out<W, Tz>(
    writer: &mut W,
    store: &Store,
    project: &str,
    at: Milliseconds,
    tz: &Tz,
    format: HoursMinutesFormat,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let project = FindProjects::new(&store.projects).by_name(project)?;
    let interval = ClockOut::new(&store.intervals).run(&project, at)?;
    writeln!(
        writer,
        "Clocked out of {} at {} after {}",
        project.name,
        at.in_zone(tz).format("%H:%M"),
        format.format(HoursMinutes::from(interval.calculate_time()))
    )?;
    Ok(())
}
