//! Store interfaces used by the use cases.
//!
//! Stores assign ids on `add` and own the values they hold; callers work on
//! snapshots and write changes back through `update`.

use std::fmt;

use crate::error::DomainError;
use crate::paging::paginate;
use crate::project::{NewProject, Project};
use crate::time::Milliseconds;
use crate::time_interval::{NewTimeInterval, TimeInterval};
use crate::types::{LoadRange, ProjectId, TimeIntervalId};

/// Persistence of time intervals.
pub trait TimeIntervalRepository {
    /// Stores a new active interval under a freshly assigned id.
    fn add(&self, new_interval: NewTimeInterval) -> Result<TimeInterval, DomainError>;

    /// Replaces the interval with the same id. `None` when no such interval exists.
    fn update(&self, interval: &TimeInterval) -> Option<TimeInterval>;

    /// Replaces each interval that exists, returning only those.
    fn update_all(&self, intervals: &[TimeInterval]) -> Vec<TimeInterval> {
        intervals
            .iter()
            .filter_map(|interval| self.update(interval))
            .collect()
    }

    /// Intervals of `project` starting at or after `since`, plus its active
    /// interval regardless of when it started.
    fn find_all(&self, project: &Project, since: Milliseconds) -> Vec<TimeInterval>;

    fn find_by_id(&self, id: TimeIntervalId) -> Option<TimeInterval>;

    fn find_active_by_project_id(&self, project_id: ProjectId) -> Option<TimeInterval>;

    fn remove(&self, id: TimeIntervalId);

    fn remove_all(&self, ids: &[TimeIntervalId]) {
        for &id in ids {
            self.remove(id);
        }
    }

    /// Removes every interval of a project.
    fn remove_by_project_id(&self, project_id: ProjectId);
}

/// Persistence of projects.
pub trait ProjectRepository {
    /// Stores a new project under a freshly assigned id.
    fn add(&self, new_project: NewProject) -> Result<Project, DomainError>;

    fn count(&self) -> usize;

    /// All projects ordered by name.
    fn find_all(&self) -> Vec<Project>;

    /// A window of [`Self::find_all`].
    fn find_page(&self, range: LoadRange) -> Vec<Project> {
        paginate(self.find_all(), range)
    }

    fn find_by_id(&self, id: ProjectId) -> Option<Project>;

    /// Case-insensitive lookup.
    fn find_by_name(&self, name: &str) -> Option<Project>;

    /// Removes the project if present.
    fn remove(&self, project: &Project);
}

/// Keys of boolean application settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppKey {
    /// Reports leave out registered time.
    HideRegisteredTime,
}

impl AppKey {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HideRegisteredTime => "hide_registered_time",
        }
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value store for application settings.
pub trait KeyValueStore {
    fn bool(&self, key: AppKey, default: bool) -> bool;

    fn set_bool(&self, key: AppKey, value: bool);

    fn hide_registered_time(&self) -> bool {
        self.bool(AppKey::HideRegisteredTime, false)
    }
}
