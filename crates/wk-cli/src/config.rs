//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wk_core::{HoursMinutesFormat, TimeIntervalStartingPoint};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON data file.
    pub data_path: PathBuf,

    /// Leave registered time out of reports.
    pub hide_registered_time: bool,

    /// Where `wk status` starts counting tracked time from.
    pub time_summary: TimeIntervalStartingPoint,

    /// How durations are printed.
    pub time_format: HoursMinutesFormat,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_path: data_dir.join("worker.json"),
            hide_registered_time: false,
            time_summary: TimeIntervalStartingPoint::default(),
            time_format: HoursMinutesFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // WK_DATA_PATH, WK_HIDE_REGISTERED_TIME, ...
        figment = figment.merge(Env::prefixed("WK_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for worker.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("worker"))
}

/// Returns the platform-specific data directory for worker.
///
/// On Linux: `~/.local/share/worker`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("worker"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_worker() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "worker");
    }

    #[test]
    fn test_default_config_uses_data_dir() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.data_path, data_dir.join("worker.json"));
        assert!(!config.hide_registered_time);
        assert_eq!(config.time_summary, TimeIntervalStartingPoint::Month);
        assert_eq!(config.time_format, HoursMinutesFormat::Digital);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "data_path = \"/tmp/work.json\"\nhide_registered_time = true\ntime_summary = \"week\"\ntime_format = \"fraction\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/work.json"));
        assert!(config.hide_registered_time);
        assert_eq!(config.time_summary, TimeIntervalStartingPoint::Week);
        assert_eq!(config.time_format, HoursMinutesFormat::Fraction);
    }

    #[test]
    fn test_load_rejects_unknown_starting_point() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "time_summary = \"year\"\n").unwrap();

        assert!(Config::load_from(Some(&path)).is_err());
    }
}
