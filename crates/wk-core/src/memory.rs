//! In-memory stores.
//!
//! These back the tests and the CLI, which loads them from its data file and
//! writes their snapshots back after each command.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::DomainError;
use crate::project::{NewProject, Project};
use crate::repository::{AppKey, KeyValueStore, ProjectRepository, TimeIntervalRepository};
use crate::time::Milliseconds;
use crate::time_interval::{NewTimeInterval, TimeInterval};
use crate::types::{ProjectId, TimeIntervalId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct Table<K, V> {
    /// `None` once `i64::MAX` has been handed out.
    next_id: Option<i64>,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            next_id: Some(1),
            rows: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> Table<K, V> {
    fn from_rows(rows: impl IntoIterator<Item = (K, V)>, id_of: impl Fn(&K) -> i64) -> Self {
        let rows: BTreeMap<K, V> = rows.into_iter().collect();
        let next_id = rows.keys().map(id_of).max().unwrap_or(0).checked_add(1);
        Self { next_id, rows }
    }

    fn allocate(&mut self) -> Result<i64, DomainError> {
        let id = self.next_id.ok_or(DomainError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }
}

/// Time intervals held in memory. Ids start at 1.
#[derive(Debug, Default)]
pub struct InMemoryTimeIntervalRepository {
    table: Mutex<Table<TimeIntervalId, TimeInterval>>,
}

impl InMemoryTimeIntervalRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. New ids continue after the largest existing one.
    pub fn from_intervals(intervals: impl IntoIterator<Item = TimeInterval>) -> Self {
        let rows = intervals.into_iter().map(|interval| (interval.id(), interval));
        Self {
            table: Mutex::new(Table::from_rows(rows, |id| id.value())),
        }
    }

    /// All stored intervals in id order.
    pub fn snapshot(&self) -> Vec<TimeInterval> {
        lock(&self.table).rows.values().cloned().collect()
    }
}

impl TimeIntervalRepository for InMemoryTimeIntervalRepository {
    fn add(&self, new_interval: NewTimeInterval) -> Result<TimeInterval, DomainError> {
        let mut table = lock(&self.table);
        let interval = new_interval.with_id(TimeIntervalId::new(table.allocate()?));
        table.rows.insert(interval.id(), interval.clone());
        Ok(interval)
    }

    fn update(&self, interval: &TimeInterval) -> Option<TimeInterval> {
        let mut table = lock(&self.table);
        let row = table.rows.get_mut(&interval.id())?;
        *row = interval.clone();
        Some(interval.clone())
    }

    fn find_all(&self, project: &Project, since: Milliseconds) -> Vec<TimeInterval> {
        lock(&self.table)
            .rows
            .values()
            .filter(|interval| interval.project_id() == project.id)
            .filter(|interval| interval.start() >= since || interval.is_active())
            .cloned()
            .collect()
    }

    fn find_by_id(&self, id: TimeIntervalId) -> Option<TimeInterval> {
        lock(&self.table).rows.get(&id).cloned()
    }

    fn find_active_by_project_id(&self, project_id: ProjectId) -> Option<TimeInterval> {
        lock(&self.table)
            .rows
            .values()
            .find(|interval| interval.project_id() == project_id && interval.is_active())
            .cloned()
    }

    fn remove(&self, id: TimeIntervalId) {
        lock(&self.table).rows.remove(&id);
    }

    fn remove_by_project_id(&self, project_id: ProjectId) {
        lock(&self.table)
            .rows
            .retain(|_, interval| interval.project_id() != project_id);
    }
}

/// Projects held in memory. Ids start at 1.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    table: Mutex<Table<ProjectId, Project>>,
}

impl InMemoryProjectRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. New ids continue after the largest existing one.
    pub fn from_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let rows = projects.into_iter().map(|project| (project.id, project));
        Self {
            table: Mutex::new(Table::from_rows(rows, |id| id.value())),
        }
    }

    /// All stored projects in id order.
    pub fn snapshot(&self) -> Vec<Project> {
        lock(&self.table).rows.values().cloned().collect()
    }
}

impl ProjectRepository for InMemoryProjectRepository {
    fn add(&self, new_project: NewProject) -> Result<Project, DomainError> {
        let mut table = lock(&self.table);
        let project = Project::new(ProjectId::new(table.allocate()?), new_project.name);
        table.rows.insert(project.id, project.clone());
        Ok(project)
    }

    fn count(&self) -> usize {
        lock(&self.table).rows.len()
    }

    fn find_all(&self) -> Vec<Project> {
        let mut projects = self.snapshot();
        projects.sort_by(|a, b| {
            a.name
                .as_str()
                .to_lowercase()
                .cmp(&b.name.as_str().to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        projects
    }

    fn find_by_id(&self, id: ProjectId) -> Option<Project> {
        lock(&self.table).rows.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Project> {
        lock(&self.table)
            .rows
            .values()
            .find(|project| project.name.matches(name))
            .cloned()
    }

    fn remove(&self, project: &Project) {
        lock(&self.table).rows.remove(&project.id);
    }
}

/// Settings held in memory.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: Mutex<BTreeMap<AppKey, bool>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn bool(&self, key: AppKey, default: bool) -> bool {
        lock(&self.values).get(&key).copied().unwrap_or(default)
    }

    fn set_bool(&self, key: AppKey, value: bool) {
        lock(&self.values).insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_interval::TimeIntervalBuilder;
    use crate::types::{LoadRange, ProjectName};

    fn ms(value: i64) -> Milliseconds {
        Milliseconds::new(value)
    }

    fn new_project(name: &str) -> NewProject {
        NewProject::new(ProjectName::new(name).unwrap())
    }

    fn names(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|project| project.name.as_str()).collect()
    }

    #[test]
    fn test_interval_ids_are_sequential_from_one() {
        let repository = InMemoryTimeIntervalRepository::new();
        let first = repository.add(NewTimeInterval::new(ProjectId::new(1), ms(1))).unwrap();
        let second = repository.add(NewTimeInterval::new(ProjectId::new(1), ms(2))).unwrap();
        assert_eq!(first.id(), TimeIntervalId::new(1));
        assert_eq!(second.id(), TimeIntervalId::new(2));
        assert!(first.is_active());
    }

    #[test]
    fn test_seeded_store_continues_after_largest_id() {
        let existing = TimeIntervalBuilder::new(ProjectId::new(1))
            .id(TimeIntervalId::new(7))
            .start(ms(1))
            .stop(ms(2))
            .build()
            .unwrap();
        let repository = InMemoryTimeIntervalRepository::from_intervals([existing]);
        let added = repository.add(NewTimeInterval::new(ProjectId::new(1), ms(3))).unwrap();
        assert_eq!(added.id(), TimeIntervalId::new(8));
        assert_eq!(repository.snapshot().len(), 2);
    }

    #[test]
    fn test_add_fails_once_interval_ids_run_out() {
        let last = TimeIntervalBuilder::new(ProjectId::new(1))
            .id(TimeIntervalId::new(i64::MAX))
            .start(ms(1))
            .stop(ms(2))
            .build()
            .unwrap();
        let repository = InMemoryTimeIntervalRepository::from_intervals([last.clone()]);

        let err = repository
            .add(NewTimeInterval::new(ProjectId::new(1), ms(3)))
            .unwrap_err();
        assert_eq!(err, DomainError::IdsExhausted);
        assert_eq!(repository.snapshot(), vec![last]);
    }

    #[test]
    fn test_last_id_is_assigned_before_running_out() {
        let previous = TimeIntervalBuilder::new(ProjectId::new(1))
            .id(TimeIntervalId::new(i64::MAX - 1))
            .start(ms(1))
            .stop(ms(2))
            .build()
            .unwrap();
        let repository = InMemoryTimeIntervalRepository::from_intervals([previous]);

        let added = repository
            .add(NewTimeInterval::new(ProjectId::new(1), ms(3)))
            .unwrap();
        assert_eq!(added.id(), TimeIntervalId::new(i64::MAX));
        assert!(repository
            .add(NewTimeInterval::new(ProjectId::new(1), ms(4)))
            .is_err());
        assert_eq!(repository.snapshot().len(), 2);
    }

    #[test]
    fn test_update_missing_interval_returns_none() {
        let repository = InMemoryTimeIntervalRepository::new();
        let interval = NewTimeInterval::new(ProjectId::new(1), ms(1)).with_id(TimeIntervalId::new(9));
        assert_eq!(repository.update(&interval), None);
    }

    #[test]
    fn test_update_all_returns_only_updated() {
        let repository = InMemoryTimeIntervalRepository::new();
        let stored = repository.add(NewTimeInterval::new(ProjectId::new(1), ms(1))).unwrap();
        let clocked_out = stored.clock_out(ms(5)).unwrap();
        let missing = NewTimeInterval::new(ProjectId::new(1), ms(1)).with_id(TimeIntervalId::new(9));

        let updated = repository.update_all(&[clocked_out.clone(), missing]);
        assert_eq!(updated, vec![clocked_out.clone()]);
        assert_eq!(repository.find_by_id(stored.id()), Some(clocked_out));
    }

    #[test]
    fn test_find_all_filters_by_project_and_since_but_keeps_active() {
        let repository = InMemoryTimeIntervalRepository::new();
        let project = Project::new(ProjectId::new(1), ProjectName::new("android").unwrap());

        let old = repository.add(NewTimeInterval::new(project.id, ms(10))).unwrap();
        repository.update(&old.clock_out(ms(20)).unwrap());
        let recent = repository.add(NewTimeInterval::new(project.id, ms(100))).unwrap();
        repository.update(&recent.clock_out(ms(120)).unwrap());
        let old_active = repository.add(NewTimeInterval::new(project.id, ms(5))).unwrap();
        repository.add(NewTimeInterval::new(ProjectId::new(2), ms(200))).unwrap();

        let ids: Vec<_> = repository
            .find_all(&project, ms(50))
            .iter()
            .map(TimeInterval::id)
            .collect();
        assert_eq!(ids, vec![recent.id(), old_active.id()]);
    }

    #[test]
    fn test_find_active_by_project_id() {
        let repository = InMemoryTimeIntervalRepository::new();
        assert_eq!(repository.find_active_by_project_id(ProjectId::new(1)), None);

        let active = repository.add(NewTimeInterval::new(ProjectId::new(1), ms(1))).unwrap();
        assert_eq!(
            repository.find_active_by_project_id(ProjectId::new(1)),
            Some(active.clone())
        );

        repository.update(&active.clock_out(ms(2)).unwrap());
        assert_eq!(repository.find_active_by_project_id(ProjectId::new(1)), None);
    }

    #[test]
    fn test_remove_intervals() {
        let repository = InMemoryTimeIntervalRepository::new();
        let first = repository.add(NewTimeInterval::new(ProjectId::new(1), ms(1))).unwrap();
        let second = repository.add(NewTimeInterval::new(ProjectId::new(1), ms(2))).unwrap();
        let other = repository.add(NewTimeInterval::new(ProjectId::new(2), ms(3))).unwrap();

        repository.remove(first.id());
        assert_eq!(repository.find_by_id(first.id()), None);

        repository.remove_by_project_id(ProjectId::new(1));
        assert_eq!(repository.find_by_id(second.id()), None);
        assert_eq!(repository.snapshot(), vec![other]);
    }

    #[test]
    fn test_projects_are_ordered_by_name() {
        let repository = InMemoryProjectRepository::new();
        repository.add(new_project("cli")).unwrap();
        repository.add(new_project("android")).unwrap();
        repository.add(new_project("Backend")).unwrap();

        assert_eq!(names(&repository.find_all()), vec!["android", "Backend", "cli"]);
        assert_eq!(
            names(&repository.find_page(LoadRange::new(1, 1))),
            vec!["Backend"]
        );
        assert_eq!(repository.count(), 3);
    }

    #[test]
    fn test_find_project_by_name_ignores_case() {
        let repository = InMemoryProjectRepository::new();
        let added = repository.add(new_project("Android")).unwrap();
        assert_eq!(repository.find_by_name("android"), Some(added.clone()));
        assert_eq!(repository.find_by_id(added.id), Some(added));
        assert_eq!(repository.find_by_name("cli"), None);
    }

    #[test]
    fn test_remove_missing_project_is_a_no_op() {
        let repository = InMemoryProjectRepository::new();
        repository.add(new_project("android")).unwrap();
        let missing = Project::new(ProjectId::new(99), ProjectName::new("cli").unwrap());
        repository.remove(&missing);
        assert_eq!(repository.count(), 1);
    }

    #[test]
    fn test_add_fails_once_project_ids_run_out() {
        let last = Project::new(ProjectId::new(i64::MAX), ProjectName::new("cli").unwrap());
        let repository = InMemoryProjectRepository::from_projects([last.clone()]);

        let err = repository.add(new_project("android")).unwrap_err();
        assert_eq!(err, DomainError::IdsExhausted);
        assert_eq!(repository.snapshot(), vec![last]);
    }

    #[test]
    fn test_key_value_store_defaults() {
        let store = InMemoryKeyValueStore::new();
        assert!(!store.hide_registered_time());
        assert!(store.bool(AppKey::HideRegisteredTime, true));

        store.set_bool(AppKey::HideRegisteredTime, true);
        assert!(store.hide_registered_time());
    }
}
