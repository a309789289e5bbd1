//! TOML-based user configuration.
//!
//! Stores the defaults the CLI and embedding applications feed into the
//! scheduler:
//! - Generation defaults (recovery score, session length)
//! - The user's typical sleep, meal and training pattern
//! - Session-stack patterns (target sleep, wake buffer)
//!
//! Configuration is stored at `~/.config/circadia/config.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::anchors::UserTimeAnchors;
use crate::chronotype::Chronotype;
use crate::clock::MinuteOfDay;
use crate::deferral::SleepPatterns;
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::session_stack::SessionPatterns;
use crate::timeline::{GeneratorConfig, DEFAULT_RECOVERY_SCORE, DEFAULT_SESSION_MINUTES};

/// Returns `~/.config/circadia[-dev]/` based on CIRCADIA_ENV.
///
/// Set CIRCADIA_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CIRCADIA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("circadia-dev")
    } else {
        base_dir.join("circadia")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Generation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_recovery_score")]
    pub default_recovery_score: u8,
    #[serde(default = "default_session_minutes")]
    pub default_session_minutes: u32,
}

/// Typical daily pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternsConfig {
    #[serde(default = "default_wake_time")]
    pub typical_wake_time: MinuteOfDay,
    #[serde(default = "default_bed_time")]
    pub typical_bed_time: MinuteOfDay,
    /// Defaults to one hour after waking.
    #[serde(default)]
    pub first_meal_time: Option<MinuteOfDay>,
    /// Defaults to three hours before bed.
    #[serde(default)]
    pub last_meal_time: Option<MinuteOfDay>,
    #[serde(default)]
    pub training_time: Option<MinuteOfDay>,
    #[serde(default)]
    pub chronotype: Chronotype,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/circadia/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub session_stack: SessionPatterns,
}

// Default functions
fn default_recovery_score() -> u8 {
    DEFAULT_RECOVERY_SCORE
}
fn default_session_minutes() -> u32 {
    DEFAULT_SESSION_MINUTES
}
fn default_wake_time() -> MinuteOfDay {
    MinuteOfDay::new(7, 0).unwrap_or_default()
}
fn default_bed_time() -> MinuteOfDay {
    MinuteOfDay::new(23, 0).unwrap_or_default()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_recovery_score: default_recovery_score(),
            default_session_minutes: default_session_minutes(),
        }
    }
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            typical_wake_time: default_wake_time(),
            typical_bed_time: default_bed_time(),
            first_meal_time: None,
            last_meal_time: None,
            training_time: None,
            chronotype: Chronotype::default(),
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

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || CoreError::from(ConfigError::UnknownKey(key.to_string()));
        let invalid = |message: String| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message,
            })
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Null if value == "none" => serde_json::Value::Null,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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

    /// Set a config value by dot-separated key, in memory.
    ///
    /// `none` clears an optional value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check numeric ranges that the types alone do not enforce.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] for a recovery score above 100
    /// or session-stack hours outside `0..=24`.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let score = self.generation.default_recovery_score;
        if score > 100 {
            return Err(ValidationError::OutOfRange {
                field: "default_recovery_score".to_string(),
                value: f64::from(score),
                min: 0.0,
                max: 100.0,
            });
        }
        self.session_stack.validate()
    }

    /// Anchor snapshot for `date` built from the configured typical pattern.
    pub fn anchors_for(&self, date: NaiveDate) -> UserTimeAnchors {
        let p = &self.patterns;
        let mut anchors = UserTimeAnchors::from_typical(date, p.typical_wake_time, p.typical_bed_time)
            .with_chronotype(p.chronotype);
        if let Some(first) = p.first_meal_time {
            anchors.first_meal_time = first;
        }
        if let Some(last) = p.last_meal_time {
            anchors.last_meal_time = last;
        }
        if let Some(training) = p.training_time {
            anchors = anchors.with_training(training);
        }
        anchors
    }

    pub fn sleep_patterns(&self) -> SleepPatterns {
        SleepPatterns::new(self.patterns.typical_bed_time, self.patterns.typical_wake_time)
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            default_session_minutes: self.generation.default_session_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generation.default_recovery_score, 80);
        assert_eq!(parsed.patterns.typical_wake_time.to_string(), "07:00");
        assert_eq!(parsed.session_stack.target_sleep_hours, 8.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [patterns]
            typical_wake_time = "06:15"
            training_time = "17:30"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.patterns.typical_wake_time.to_string(), "06:15");
        assert_eq!(parsed.patterns.typical_bed_time.to_string(), "23:00");
        assert_eq!(parsed.generation.default_session_minutes, 60);
    }

    #[test]
    fn malformed_time_is_rejected() {
        let parsed = toml::from_str::<Config>("[patterns]\ntypical_wake_time = \"7am\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("patterns.typical_bed_time").as_deref(), Some("23:00"));
        assert_eq!(cfg.get("generation.default_recovery_score").as_deref(), Some("80"));
        assert!(cfg.get("patterns.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("generation.default_recovery_score", "65").unwrap();
        cfg.set("patterns.training_time", "18:00").unwrap();
        cfg.set("session_stack.wake_buffer_hours", "1.5").unwrap();
        assert_eq!(cfg.generation.default_recovery_score, 65);
        assert_eq!(cfg.patterns.training_time, MinuteOfDay::new(18, 0));
        assert_eq!(cfg.session_stack.wake_buffer_hours, 1.5);

        cfg.set("patterns.training_time", "none").unwrap();
        assert!(cfg.patterns.training_time.is_none());
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("patterns.nope", "1").is_err());
        assert!(cfg.set("", "1").is_err());
        assert!(cfg.set("generation.default_recovery_score", "lots").is_err());
        assert!(cfg.set("generation.default_recovery_score", "300").is_err());
        assert!(cfg.set("patterns.typical_wake_time", "25:00").is_err());
        assert_eq!(cfg.generation.default_recovery_score, 80);
    }

    #[test]
    fn set_enforces_numeric_ranges() {
        let mut cfg = Config::default();
        let err = cfg.set("generation.default_recovery_score", "150").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert!(cfg.set("session_stack.target_sleep_hours", "1e18").is_err());
        assert!(cfg.set("session_stack.wake_buffer_hours", "-2").is_err());
        assert_eq!(cfg.generation.default_recovery_score, 80);
        assert_eq!(cfg.session_stack.target_sleep_hours, 8.0);

        cfg.set("session_stack.target_sleep_hours", "24").unwrap();
        assert_eq!(cfg.session_stack.target_sleep_hours, 24.0);
    }

    #[test]
    fn save_and_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let missing = Config::load_from(&path).unwrap();
        assert_eq!(missing.generation.default_recovery_score, 80);

        let mut cfg = Config::default();
        cfg.set("patterns.typical_wake_time", "05:45").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.patterns.typical_wake_time.to_string(), "05:45");
    }

    #[test]
    fn anchors_follow_patterns() {
        let mut cfg = Config::default();
        cfg.set("patterns.training_time", "17:00").unwrap();
        cfg.set("patterns.first_meal_time", "10:00").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 6, 6).unwrap();
        let anchors = cfg.anchors_for(date);
        assert!(anchors.has_training_today);
        assert_eq!(anchors.first_meal_time.to_string(), "10:00");
        assert_eq!(anchors.last_meal_time.to_string(), "20:00");
        assert_eq!(anchors.target_bed_time, date.and_hms_opt(23, 0, 0).unwrap());
    }
}
