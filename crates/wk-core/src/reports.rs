//! Day and week reports for a project.
//!
//! Every operation groups the project's whole history and slices afterwards,
//! so counts never depend on the requested range. The plain operations read
//! the "hide registered time" setting and then behave like their
//! `not_registered` counterparts when it is set.

use chrono::TimeZone;

use crate::grouping::{filter_registered, group_by_day, group_by_week};
use crate::paging::{Page, paginate};
use crate::project::Project;
use crate::repository::{KeyValueStore, TimeIntervalRepository};
use crate::time::Milliseconds;
use crate::time_interval::TimeInterval;
use crate::time_report::{TimeReportDay, TimeReportWeek};
use crate::types::LoadRange;

/// Report queries over a project's time intervals in a given time zone.
pub struct TimeReports<'a, R: ?Sized, K: ?Sized, Tz> {
    intervals: &'a R,
    settings: &'a K,
    tz: Tz,
}

impl<'a, R, K, Tz> TimeReports<'a, R, K, Tz>
where
    R: TimeIntervalRepository + ?Sized,
    K: KeyValueStore + ?Sized,
    Tz: TimeZone,
{
    pub const fn new(intervals: &'a R, settings: &'a K, tz: Tz) -> Self {
        Self {
            intervals,
            settings,
            tz,
        }
    }

    fn intervals(&self, project: &Project, hide_registered: bool) -> Vec<TimeInterval> {
        let intervals = self.intervals.find_all(project, Milliseconds::MIN);
        if hide_registered {
            filter_registered(intervals)
        } else {
            intervals
        }
    }

    fn days(&self, project: &Project, hide_registered: bool) -> Vec<TimeReportDay> {
        group_by_day(self.intervals(project, hide_registered), &self.tz)
    }

    fn weeks(&self, project: &Project, hide_registered: bool) -> Vec<TimeReportWeek> {
        group_by_week(self.intervals(project, hide_registered), &self.tz)
    }

    /// Number of report days.
    pub fn count(&self, project: &Project) -> usize {
        self.days(project, self.settings.hide_registered_time()).len()
    }

    pub fn count_not_registered(&self, project: &Project) -> usize {
        self.days(project, true).len()
    }

    /// Report days, most recent first.
    pub fn find(&self, project: &Project, range: LoadRange) -> Vec<TimeReportDay> {
        paginate(self.days(project, self.settings.hide_registered_time()), range)
    }

    pub fn find_not_registered(&self, project: &Project, range: LoadRange) -> Vec<TimeReportDay> {
        paginate(self.days(project, true), range)
    }

    /// Number of report weeks.
    pub fn count_weeks(&self, project: &Project) -> usize {
        self.weeks(project, self.settings.hide_registered_time()).len()
    }

    pub fn count_not_registered_weeks(&self, project: &Project) -> usize {
        self.weeks(project, true).len()
    }

    /// Report weeks, most recent first.
    pub fn find_weeks(&self, project: &Project, range: LoadRange) -> Vec<TimeReportWeek> {
        paginate(self.weeks(project, self.settings.hide_registered_time()), range)
    }

    pub fn find_not_registered_weeks(
        &self,
        project: &Project,
        range: LoadRange,
    ) -> Vec<TimeReportWeek> {
        paginate(self.weeks(project, true), range)
    }

    /// A page of days along with the total day count.
    pub fn load_days(&self, project: &Project, range: LoadRange) -> Page<TimeReportDay> {
        Page::slice(self.days(project, self.settings.hide_registered_time()), range)
    }

    /// A page of weeks along with the total week count.
    pub fn load_weeks(&self, project: &Project, range: LoadRange) -> Page<TimeReportWeek> {
        Page::slice(self.weeks(project, self.settings.hide_registered_time()), range)
    }
}
