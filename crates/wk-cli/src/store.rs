//! JSON data file holding projects and time intervals.
//!
//! Commands load the whole file into in-memory stores, run against those, and
//! write the result back. Writers hold an exclusive lock on a sibling
//! `.lock` file for the whole read-modify-write cycle.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use wk_core::{
    AppKey, InMemoryKeyValueStore, InMemoryProjectRepository, InMemoryTimeIntervalRepository,
    KeyValueStore, Project, TimeInterval,
};

use crate::Config;

/// On-disk layout of the data file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    time_intervals: Vec<TimeInterval>,
}

/// Projects, intervals, and settings for one command invocation.
#[derive(Debug, Default)]
pub struct Store {
    pub projects: InMemoryProjectRepository,
    pub intervals: InMemoryTimeIntervalRepository,
    pub settings: InMemoryKeyValueStore,
}

impl Store {
    /// Loads the data file, or starts empty when it doesn't exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str::<DataFile>(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no data file yet");
                DataFile::default()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        Ok(Self {
            projects: InMemoryProjectRepository::from_projects(data.projects),
            intervals: InMemoryTimeIntervalRepository::from_intervals(data.time_intervals),
            settings: InMemoryKeyValueStore::new(),
        })
    }

    /// Loads the configured data file and applies settings from `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Self::load(&config.data_path)?;
        store
            .settings
            .set_bool(AppKey::HideRegisteredTime, config.hide_registered_time);
        Ok(store)
    }

    /// Writes the stores back, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        let data = DataFile {
            projects: self.projects.snapshot(),
            time_intervals: self.intervals.snapshot(),
        };
        let content = serde_json::to_string_pretty(&data)?;

        let tmp_path = sibling(path, "tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            projects = data.projects.len(),
            time_intervals = data.time_intervals.len(),
            "saved data file"
        );
        Ok(())
    }
}

/// Runs `f` against the store under an exclusive lock, saving afterwards.
///
/// Nothing is written when `f` fails.
pub fn update<T>(config: &Config, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
    let path = &config.data_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let lock_file = File::create(sibling(path, "lock")).context("failed to create lock file")?;
    lock_file
        .lock_exclusive()
        .context("failed to acquire lock")?;

    let store = Store::open(config)?;
    let result = f(&store)?;
    store.save(path)?;
    Ok(result)
}

/// `worker.json` -> `worker.json.<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use wk_core::{ClockIn, CreateProject, Milliseconds, ProjectRepository, TimeIntervalRepository};

    use super::*;

    fn config(path: PathBuf) -> Config {
        Config {
            data_path: path,
            ..Config::default()
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::load(&temp.path().join("missing.json")).unwrap();
        assert_eq!(store.projects.count(), 0);
        assert!(store.intervals.snapshot().is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_intervals() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("worker.json");
        fs::write(
            &path,
            r#"{"time_intervals":[{"id":1,"project_id":1,"start":2000,"stop":1000}]}"#,
        )
        .unwrap();

        let err = Store::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_update_saves_changes() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path().join("data/worker.json"));

        update(&config, |store| {
            let project = CreateProject::new(&store.projects).run("android")?;
            ClockIn::new(&store.intervals).run(&project, Milliseconds::new(1_000))?;
            Ok(())
        })
        .unwrap();

        let store = Store::load(&config.data_path).unwrap();
        let project = store.projects.find_by_name("android").unwrap();
        assert!(store.intervals.find_active_by_project_id(project.id).is_some());
        assert!(temp.path().join("data/worker.json.lock").exists());
        assert!(!temp.path().join("data/worker.json.tmp").exists());
    }

    #[test]
    fn test_update_discards_changes_on_error() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path().join("worker.json"));

        let result: Result<()> = update(&config, |store| {
            CreateProject::new(&store.projects).run("android")?;
            anyhow::bail!("boom")
        });

        assert!(result.is_err());
        assert!(!config.data_path.exists());
    }

    #[test]
    fn test_clock_in_fails_once_interval_ids_run_out() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path().join("worker.json"));
        let content = format!(
            r#"{{"projects":[{{"id":1,"name":"android"}}],"time_intervals":[{{"id":{},"project_id":1,"start":1000,"stop":2000}}]}}"#,
            i64::MAX
        );
        fs::write(&config.data_path, &content).unwrap();

        let store = Store::load(&config.data_path).unwrap();
        assert_eq!(store.intervals.snapshot().len(), 1);

        let err = update(&config, |store| {
            let project = store.projects.find_by_name("android").unwrap();
            ClockIn::new(&store.intervals).run(&project, Milliseconds::new(3_000))?;
            Ok(())
        })
        .unwrap_err();
        assert!(err.to_string().contains("no ids left"), "{err}");
        assert_eq!(fs::read_to_string(&config.data_path).unwrap(), content);
    }

    #[test]
    fn test_open_applies_settings() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            hide_registered_time: true,
            ..config(temp.path().join("worker.json"))
        };

        let store = Store::open(&config).unwrap();
        assert!(store.settings.hide_registered_time());
    }

    #[test]
    fn test_sibling_appends_suffix() {
        assert_eq!(
            sibling(Path::new("/data/worker.json"), "lock"),
            PathBuf::from("/data/worker.json.lock")
        );
    }
}
