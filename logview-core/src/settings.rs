use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use std::{fs, path::PathBuf};

use crate::modal::ViewerOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub logs_dir: Option<String>,
    // Takes precedence over logs_dir
    pub snapshot_file: Option<String>,
    pub font_size: f32,
    pub copy_feedback_ms: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            logs_dir: None,
            snapshot_file: None,
            font_size: 16.0,
            copy_feedback_ms: 2000,
            fetch_timeout_secs: 10,
        }
    }
}

impl ViewerSettings {
    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions { font_size: self.font_size, copy_hold: Duration::from_millis(self.copy_feedback_ms) }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

/// Directory scanned when neither a snapshot nor a log directory is configured.
pub fn default_logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "logview", "logview").map(|d| d.data_dir().join("logs"))
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self> {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .ok_or_else(|| anyhow::anyhow!("failed to resolve viewer directory"))?;
        Ok(Self { path: exe_dir.join("logview.toml") })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<ViewerSettings> {
        if !self.path.exists() {
            return Ok(ViewerSettings::default());
        }
        let text = fs::read_to_string(&self.path).with_context(|| format!("read {}", self.path.display()))?;
        let settings: ViewerSettings = toml::from_str(&text).with_context(|| format!("parse {}", self.path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, settings: &ViewerSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(settings)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("logview.toml"));
        let settings = store.load().unwrap();
        assert_eq!(settings, ViewerSettings::default());
        assert_eq!(settings.viewer_options().copy_hold, Duration::from_secs(2));
        assert_eq!(settings.viewer_options().font_size, 16.0);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("conf").join("logview.toml"));
        let settings = ViewerSettings { logs_dir: Some("/var/log/plugins".into()), font_size: 12.0, ..Default::default() };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logview.toml");
        fs::write(&path, "fetch_timeout_secs = 0\nsnapshot_file = \"dump.json\"\n").unwrap();
        let settings = SettingsStore::at(&path).load().unwrap();
        assert_eq!(settings.snapshot_file.as_deref(), Some("dump.json"));
        assert_eq!(settings.copy_feedback_ms, 2000);
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logview.toml");
        fs::write(&path, "font_size = \"huge\"").unwrap();
        assert!(SettingsStore::at(&path).load().is_err());
    }
}
