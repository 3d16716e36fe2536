use anyhow::{Context, Result};
use log::warn;
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::config::EngineConfig;

/// JSON file holding the engine thresholds.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineConfig>,
}

impl SettingsStore {
    /// A missing file yields defaults. So does an unreadable one, with a
    /// warning, so a bad edit never blocks a session from starting.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring malformed settings at {}: {err}; using defaults",
                    path.display()
                );
                EngineConfig::default()
            })
        } else {
            EngineConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn config(&self) -> EngineConfig {
        self.read().clone()
    }

    pub fn update(&self, config: EngineConfig) -> Result<()> {
        let mut guard = self.write();
        self.persist(&config)?;
        *guard = config;
        Ok(())
    }

    /// Re-read the file. Unlike `new`, a malformed file is an error here and
    /// the current values are kept.
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed settings in {}", self.path.display()))?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &EngineConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineConfig> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineConfig> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
