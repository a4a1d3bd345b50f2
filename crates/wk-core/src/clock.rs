//! Clocking in and out, registering time, and querying recent time.

use chrono::TimeZone;

use crate::date::TimeIntervalStartingPoint;
use crate::error::DomainError;
use crate::project::Project;
use crate::repository::TimeIntervalRepository;
use crate::time::{HoursMinutes, Milliseconds};
use crate::time_interval::{NewTimeInterval, TimeInterval};
use crate::types::TimeIntervalId;

/// Starts tracking time for a project.
pub struct ClockIn<'a, R: ?Sized> {
    intervals: &'a R,
}

impl<'a, R: TimeIntervalRepository + ?Sized> ClockIn<'a, R> {
    pub const fn new(intervals: &'a R) -> Self {
        Self { intervals }
    }

    /// Adds an active interval starting at `start`.
    ///
    /// Fails with [`DomainError::ActiveProject`] if the project is already clocked in.
    pub fn run(&self, project: &Project, start: Milliseconds) -> Result<TimeInterval, DomainError> {
        if let Some(active) = self.intervals.find_active_by_project_id(project.id) {
            return Err(DomainError::ActiveProject {
                project_id: project.id,
                interval_id: active.id(),
            });
        }

        let interval = self.intervals.add(NewTimeInterval::new(project.id, start))?;
        tracing::debug!(project = %project.name, interval_id = %interval.id(), %start, "clocked in");
        Ok(interval)
    }
}

/// Stops tracking time for a project.
pub struct ClockOut<'a, R: ?Sized> {
    intervals: &'a R,
}

impl<'a, R: TimeIntervalRepository + ?Sized> ClockOut<'a, R> {
    pub const fn new(intervals: &'a R) -> Self {
        Self { intervals }
    }

    /// Ends the project's active interval at `stop`.
    pub fn run(&self, project: &Project, stop: Milliseconds) -> Result<TimeInterval, DomainError> {
        let inactive = DomainError::InactiveProject {
            project_id: project.id,
        };
        let active = self
            .intervals
            .find_active_by_project_id(project.id)
            .ok_or_else(|| inactive.clone())?;

        let interval = active.clock_out(stop)?;
        let interval = self.intervals.update(&interval).ok_or(inactive)?;
        tracing::debug!(project = %project.name, interval_id = %interval.id(), %stop, "clocked out");
        Ok(interval)
    }
}

/// Toggles the registered flag of intervals.
pub struct MarkRegisteredTime<'a, R: ?Sized> {
    intervals: &'a R,
}

impl<'a, R: TimeIntervalRepository + ?Sized> MarkRegisteredTime<'a, R> {
    pub const fn new(intervals: &'a R) -> Self {
        Self { intervals }
    }

    /// Flips each interval between inactive and registered and stores the
    /// results. Nothing is stored if any interval is still active.
    pub fn run(&self, intervals: &[TimeInterval]) -> Result<Vec<TimeInterval>, DomainError> {
        let toggled = intervals
            .iter()
            .map(TimeInterval::toggle_registered)
            .collect::<Result<Vec<_>, _>>()?;

        let updated = self.intervals.update_all(&toggled);
        tracing::debug!(
            requested = intervals.len(),
            updated = updated.len(),
            "toggled registered time"
        );
        Ok(updated)
    }
}

/// Deletes intervals.
pub struct RemoveTime<'a, R: ?Sized> {
    intervals: &'a R,
}

impl<'a, R: TimeIntervalRepository + ?Sized> RemoveTime<'a, R> {
    pub const fn new(intervals: &'a R) -> Self {
        Self { intervals }
    }

    pub fn run(&self, ids: &[TimeIntervalId]) {
        self.intervals.remove_all(ids);
        tracing::debug!(count = ids.len(), "removed time intervals");
    }
}

/// Intervals of a project since the start of the current day, week, or month.
pub struct GetProjectTimeSince<'a, R: ?Sized, Tz> {
    intervals: &'a R,
    tz: Tz,
}

impl<'a, R, Tz> GetProjectTimeSince<'a, R, Tz>
where
    R: TimeIntervalRepository + ?Sized,
    Tz: TimeZone,
{
    pub const fn new(intervals: &'a R, tz: Tz) -> Self {
        Self { intervals, tz }
    }

    /// Intervals starting at or after the resolved starting point, plus the
    /// active interval.
    pub fn run(
        &self,
        project: &Project,
        starting_point: TimeIntervalStartingPoint,
        now: Milliseconds,
    ) -> Vec<TimeInterval> {
        let since = starting_point.since(now, &self.tz);
        self.intervals.find_all(project, since)
    }

    /// Total of [`Self::run`], counting an active interval up to `now`.
    pub fn time_summary(
        &self,
        project: &Project,
        starting_point: TimeIntervalStartingPoint,
        now: Milliseconds,
    ) -> HoursMinutes {
        HoursMinutes::accumulated(
            self.run(project, starting_point, now)
                .iter()
                .map(|interval| HoursMinutes::from(interval.calculate_interval(now))),
        )
    }
}
