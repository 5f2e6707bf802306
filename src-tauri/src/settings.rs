use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

pub const BACKEND_ENV_VAR: &str = "LANGSCOPE_HISTORY_BACKEND";

/// Largest accepted `displayLimit` and `memoryCapacity`.
pub const MAX_HISTORY_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    #[default]
    Sqlite,
    Memory,
}

impl HistoryBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "database" | "db" => Some(HistoryBackend::Sqlite),
            "memory" | "session" => Some(HistoryBackend::Memory),
            _ => None,
        }
    }

    /// Backend forced through `LANGSCOPE_HISTORY_BACKEND`, if set and valid.
    pub fn from_env() -> Option<Self> {
        std::env::var(BACKEND_ENV_VAR)
            .ok()
            .and_then(|value| Self::parse(&value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    pub backend: HistoryBackend,
    /// Rows shown in the history sidebar.
    pub display_limit: usize,
    /// Upper bound for the in-memory backend.
    pub memory_capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::Sqlite,
            display_limit: 100,
            memory_capacity: 100,
        }
    }
}

impl HistorySettings {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("displayLimit", self.display_limit),
            ("memoryCapacity", self.memory_capacity),
        ] {
            if !(1..=MAX_HISTORY_LIMIT).contains(&value) {
                bail!("{name} must be between 1 and {MAX_HISTORY_LIMIT}, got {value}");
            }
        }
        Ok(())
    }

    /// Pulls hand-edited values back into the accepted range.
    fn clamped(self) -> Self {
        Self {
            display_limit: self.display_limit.clamp(1, MAX_HISTORY_LIMIT),
            memory_capacity: self.memory_capacity.clamp(1, MAX_HISTORY_LIMIT),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    history: HistorySettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data: UserSettings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        if data.history.validate().is_err() {
            log::warn!("Out-of-range history limits in {}, clamping", path.display());
            data.history = data.history.clamped();
        }

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn history(&self) -> HistorySettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }

    pub fn update_history(&self, settings: HistorySettings) -> Result<()> {
        settings.validate()?;

        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.history = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
