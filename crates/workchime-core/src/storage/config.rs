//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Chime schedule (days, active hours, frequency)
//! - Pomodoro durations
//! - Notification and sound preferences
//!
//! Configuration is stored at `~/.config/workchime/config.toml`. Every field
//! carries a serde default, so a missing or partial file silently falls back
//! to defaults rather than erroring.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Allowed chime frequencies, in minutes.
pub const FREQUENCIES: [u32; 4] = [15, 30, 60, 120];

/// Chime schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChimeSettings {
    /// Master on/off for the chime.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Active weekdays, index 0 = Monday ... 6 = Sunday.
    #[serde(default = "default_days")]
    pub days: [bool; 7],
    /// Active window `[start_hour, end_hour)`, 24-hour clock.
    #[serde(default = "default_start_hour")]
    pub start_hour: u8,
    #[serde(default = "default_end_hour")]
    pub end_hour: u8,
    /// Chime on minutes-since-midnight multiples of this value.
    #[serde(default = "default_frequency")]
    pub frequency_minutes: u32,
}

/// Pomodoro duration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

/// Notification and sound configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// System sound names under /System/Library/Sounds.
    #[serde(default = "default_chime_sound")]
    pub chime_sound: String,
    #[serde(default = "default_pomodoro_sound")]
    pub pomodoro_sound: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/workchime/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chime: ChimeSettings,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_days() -> [bool; 7] {
    [true; 7]
}
fn default_start_hour() -> u8 {
    9
}
fn default_end_hour() -> u8 {
    18
}
fn default_frequency() -> u32 {
    60
}
fn default_work_minutes() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_chime_sound() -> String {
    "Hero".into()
}
fn default_pomodoro_sound() -> String {
    "Ping".into()
}

impl Default for ChimeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days: default_days(),
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            frequency_minutes: default_frequency(),
        }
    }
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chime_sound: default_chime_sound(),
            pomodoro_sound: default_pomodoro_sound(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chime: ChimeSettings::default(),
            pomodoro: PomodoroConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)
                            .map_err(|e| invalid(format!("cannot parse '{value}': {e}")))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/workchime"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults first if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    /// Invalid persisted settings are never surfaced to the caller.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        // Rename over the target so the agent's periodic reload never
        // observes a half-written file.
        super::write_atomic(path, content.as_bytes()).map_err(|e| failed(e.to_string()))?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, validate the result, and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the resulting config is invalid, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let updated = self.with_value(key, value)?;
        *self = updated;
        self.save()?;
        Ok(())
    }

    /// Apply a key/value update without persisting; used by `set` and tests.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, ConfigError> {
        let mut json = serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        Ok(updated)
    }

    /// Check the cross-field invariants the settings surface must enforce;
    /// the schedulers assume them and do not re-check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if self.chime.start_hour > 23 {
            return Err(invalid("chime.start_hour", "must be in 0..=23".into()));
        }
        if self.chime.end_hour > 23 {
            return Err(invalid("chime.end_hour", "must be in 0..=23".into()));
        }
        if self.chime.start_hour >= self.chime.end_hour {
            return Err(invalid(
                "chime.end_hour",
                format!("must be greater than start_hour ({})", self.chime.start_hour),
            ));
        }
        if !FREQUENCIES.contains(&self.chime.frequency_minutes) {
            return Err(invalid(
                "chime.frequency_minutes",
                format!("must be one of {FREQUENCIES:?}"),
            ));
        }
        for (key, value) in [
            ("pomodoro.work_minutes", self.pomodoro.work_minutes),
            ("pomodoro.short_break_minutes", self.pomodoro.short_break_minutes),
            ("pomodoro.long_break_minutes", self.pomodoro.long_break_minutes),
            (
                "pomodoro.sessions_before_long_break",
                self.pomodoro.sessions_before_long_break,
            ),
        ] {
            if value == 0 {
                return Err(invalid(key, "must be at least 1".into()));
            }
        }
        Ok(())
    }
}
