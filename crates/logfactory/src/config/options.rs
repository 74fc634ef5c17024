//! Per-class option overrides

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::level::Level;

/// Environment variables read by [`LoggerOptions::with_env_overrides`]
pub const ENV_LEVEL: &str = "LOGFACTORY_LEVEL";
pub const ENV_FILES_PATH: &str = "LOGFACTORY_FILES_PATH";
pub const ENV_FILE_ENABLED: &str = "LOGFACTORY_FILE_ENABLED";
pub const ENV_STREAM_ENABLED: &str = "LOGFACTORY_STREAM_ENABLED";

/// Overrides for a logger class.
///
/// Every field is optional; unset fields inherit the defaults of
/// [`LoggerMeta`](super::LoggerMeta). Keys that name no field are accepted
/// and kept in `extra`, where they have no effect.
///
/// # Example
///
/// ```
/// use logfactory::{Level, LoggerOptions};
///
/// let options = LoggerOptions::new()
///     .with_files_path("/var/log/app")
///     .with_stream_enabled(true)
///     .with_default_level(Level::Info);
/// assert_eq!(options.default_level, Some(Level::Info));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "filesPath")]
    pub files_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fileSuffix")]
    pub file_suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fileEncoding")]
    pub file_encoding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fileEnabled")]
    pub file_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "streamEnabled")]
    pub stream_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "defaultLevel")]
    pub default_level: Option<Level>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "defaultMessageFormat")]
    pub default_message_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "defaultDateFormat")]
    pub default_date_format: Option<String>,

    /// Unrecognized keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl LoggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from `(key, value)` pairs, applied in order
    pub fn from_pairs<K, V, I>(pairs: I) -> ConfigResult<Self>
    where
        K: AsRef<str>,
        V: Into<serde_json::Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut options = Self::new();
        for (key, value) in pairs {
            options.set(key.as_ref(), value)?;
        }
        Ok(options)
    }

    /// Set one option by name.
    ///
    /// Both `snake_case` and `camelCase` names are recognized. A later call
    /// for the same key replaces the earlier value. Unknown keys are stored
    /// in `extra`; only a value of the wrong type for a known key fails.
    pub fn set(&mut self, key: &str, value: impl Into<serde_json::Value>) -> ConfigResult<&mut Self> {
        let value = value.into();
        match snake_case(key).as_str() {
            "files_path" => self.files_path = Some(parse_value(key, value)?),
            "file_suffix" => self.file_suffix = Some(parse_value(key, value)?),
            "file_encoding" => self.file_encoding = Some(parse_value(key, value)?),
            "file_enabled" => self.file_enabled = Some(parse_value(key, value)?),
            "stream_enabled" => self.stream_enabled = Some(parse_value(key, value)?),
            "default_level" => self.default_level = Some(parse_value(key, value)?),
            "default_message_format" => self.default_message_format = Some(parse_value(key, value)?),
            "default_date_format" => self.default_date_format = Some(parse_value(key, value)?),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(self)
    }

    pub fn with_files_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.files_path = Some(path.into());
        self
    }

    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = Some(suffix.into());
        self
    }

    pub fn with_file_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.file_encoding = Some(encoding.into());
        self
    }

    pub fn with_file_enabled(mut self, enabled: bool) -> Self {
        self.file_enabled = Some(enabled);
        self
    }

    pub fn with_stream_enabled(mut self, enabled: bool) -> Self {
        self.stream_enabled = Some(enabled);
        self
    }

    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = Some(level);
        self
    }

    pub fn with_default_message_format(mut self, format: impl Into<String>) -> Self {
        self.default_message_format = Some(format.into());
        self
    }

    pub fn with_default_date_format(mut self, format: impl Into<String>) -> Self {
        self.default_date_format = Some(format.into());
        self
    }

    /// Layer `other` on top of `self`: fields set in `other` win
    pub fn merge(mut self, other: LoggerOptions) -> Self {
        self.files_path = other.files_path.or(self.files_path);
        self.file_suffix = other.file_suffix.or(self.file_suffix);
        self.file_encoding = other.file_encoding.or(self.file_encoding);
        self.file_enabled = other.file_enabled.or(self.file_enabled);
        self.stream_enabled = other.stream_enabled.or(self.stream_enabled);
        self.default_level = other.default_level.or(self.default_level);
        self.default_message_format = other.default_message_format.or(self.default_message_format);
        self.default_date_format = other.default_date_format.or(self.default_date_format);
        self.extra.extend(other.extra);
        self
    }

    /// Apply `LOGFACTORY_*` environment variables on top of these options
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) with a custom lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LEVEL) {
            let level = level.parse::<Level>().map_err(|e| ConfigError::InvalidValue {
                key: ENV_LEVEL.to_string(),
                reason: e.to_string(),
            })?;
            self.default_level = Some(level);
        }
        if let Some(path) = lookup(ENV_FILES_PATH) {
            self.files_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup(ENV_FILE_ENABLED) {
            self.file_enabled = Some(parse_flag(ENV_FILE_ENABLED, &flag)?);
        }
        if let Some(flag) = lookup(ENV_STREAM_ENABLED) {
            self.stream_enabled = Some(parse_flag(ENV_STREAM_ENABLED, &flag)?);
        }
        Ok(self)
    }
}

fn parse_value<T: DeserializeOwned>(key: &str, value: serde_json::Value) -> ConfigResult<T> {
    serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a boolean, got {:?}", value),
        }),
    }
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
