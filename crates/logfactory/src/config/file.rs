//! Options documents (YAML / JSON)
//!
//! Supports a user-level file (`~/.config/logfactory/logging.yaml`) and
//! explicit paths. Field names may be `snake_case` or `camelCase`:
//!
//! ```yaml
//! files_path: /var/log/myapp
//! stream_enabled: true
//! default_level: INFO
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};
use super::options::LoggerOptions;

impl LoggerOptions {
    /// Parse options from YAML; an empty document yields no overrides
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse options from a JSON object
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load options from a `.yaml`, `.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// User-level options file path (`<config dir>/logfactory/logging.yaml`)
    pub fn user_config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("logfactory").join("logging.yaml")
    }

    /// Load the user-level file, or no overrides when it does not exist
    pub fn load_user() -> ConfigResult<Self> {
        let path = Self::user_config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Serialize the set fields (and extras) as YAML
    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
