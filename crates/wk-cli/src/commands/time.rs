//! `wk register` and `wk remove-time`.

use std::io::Write;

use anyhow::{Result, bail};
use wk_core::{
    FindProjects, MarkRegisteredTime, Project, RemoveTime, TimeInterval, TimeIntervalId,
    TimeIntervalRepository,
};

use crate::store::Store;

/// Looks up intervals of `project`, skipping ids that don't belong to it.
fn project_intervals(store: &Store, project: &Project, ids: &[TimeIntervalId]) -> Vec<TimeInterval> {
    ids.iter()
        .filter_map(|&id| match store.intervals.find_by_id(id) {
            Some(interval) if interval.project_id() == project.id => Some(interval),
            Some(_) => {
                tracing::warn!(%id, project = %project.name, "time interval belongs to another project");
                None
            }
            None => {
                tracing::warn!(%id, "time interval not found");
                None
            }
        })
        .collect()
}

/// Toggles the registered flag of the given intervals of a project.
pub fn register<W: Write>(
    writer: &mut W,
    store: &Store,
    project: &str,
    ids: &[TimeIntervalId],
) -> Result<()> {
    let project = FindProjects::new(&store.projects).by_name(project)?;
    let intervals = project_intervals(store, &project, ids);
    if intervals.is_empty() {
        bail!("no matching time intervals for project {}", project.name);
    }

    let updated = MarkRegisteredTime::new(&store.intervals).run(&intervals)?;
    for interval in &updated {
        let state = if interval.is_registered() {
            "registered"
        } else {
            "unregistered"
        };
        writeln!(writer, "Interval {} {state}", interval.id())?;
    }
    Ok(())
}

/// Deletes intervals by id.
pub fn remove<W: Write>(writer: &mut W, store: &Store, ids: &[TimeIntervalId]) -> Result<()> {
    let existing: Vec<_> = ids
        .iter()
        .copied()
        .filter(|&id| store.intervals.find_by_id(id).is_some())
        .collect();
    if existing.is_empty() {
        bail!("no matching time intervals");
    }

    RemoveTime::new(&store.intervals).run(&existing);
    writeln!(writer, "Removed {} time interval(s)", existing.len())?;
    Ok(())
}
