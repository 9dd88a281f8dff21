// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::region::DEFAULT_BOUNDARY_POINTS;

fn default_boundary_points() -> usize {
    DEFAULT_BOUNDARY_POINTS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Airport JSON document to load when none is given on the command line
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Home airport code
    #[serde(default)]
    pub home_base: Option<String>,
    #[serde(default)]
    pub min_runway_length_ft: u32,
    #[serde(default = "default_boundary_points")]
    pub boundary_points: usize,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            data_path: None,
            home_base: None,
            min_runway_length_ft: 0,
            boundary_points: DEFAULT_BOUNDARY_POINTS,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_path: PathBuf,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    pub fn new() -> Self {
        Self {
            config_path: crate::get_config_root().join("settings.json"),
        }
    }

    pub fn with_path(config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<PlannerSettings> {
        if !self.config_path.exists() {
            return Ok(PlannerSettings::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read settings.json")?;

        serde_json::from_str(&content).context("Failed to parse settings.json")
    }

    pub fn save(&self, settings: &PlannerSettings) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let mut stamped = settings.clone();
        stamped.updated_at = Some(Utc::now());

        let content =
            serde_json::to_string_pretty(&stamped).context("Failed to serialize settings")?;

        fs::write(&self.config_path, content).context("Failed to write settings.json")?;
        log::debug!("Saved settings — path={}", self.config_path.display());
        Ok(())
    }

    /// Store `code` (trimmed, upper-cased) as the home base.
    pub fn set_home_base(&self, code: &str) -> Result<PlannerSettings> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            anyhow::bail!("Home base code is empty");
        }
        let mut settings = self.load()?;
        settings.home_base = Some(code);
        self.save(&settings)?;
        self.load()
    }

    pub fn clear_home_base(&self) -> Result<PlannerSettings> {
        let mut settings = self.load()?;
        settings.home_base = None;
        self.save(&settings)?;
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let mgr = SettingsManager::with_path(&dir.path().join("settings.json"));
        let settings = mgr.load().unwrap();
        assert_eq!(settings, PlannerSettings::default());
        assert_eq!(settings.boundary_points, 180);
    }

    #[test]
    fn test_home_base_round_trip() {
        let dir = tempdir().unwrap();
        let mgr = SettingsManager::with_path(&dir.path().join("nested").join("settings.json"));

        let saved = mgr.set_home_base(" kbos ").unwrap();
        assert_eq!(saved.home_base.as_deref(), Some("KBOS"));
        assert!(saved.updated_at.is_some());

        let cleared = mgr.clear_home_base().unwrap();
        assert_eq!(cleared.home_base, None);
    }

    #[test]
    fn test_empty_home_base_rejected() {
        let dir = tempdir().unwrap();
        let mgr = SettingsManager::with_path(&dir.path().join("settings.json"));
        assert!(mgr.set_home_base("  ").is_err());
        assert!(!mgr.path().exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"home_base": "KPVD"}"#).unwrap();
        let settings = SettingsManager::with_path(&path).load().unwrap();
        assert_eq!(settings.home_base.as_deref(), Some("KPVD"));
        assert_eq!(settings.boundary_points, DEFAULT_BOUNDARY_POINTS);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{oops").unwrap();
        let err = SettingsManager::with_path(&path).load().unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }
}
