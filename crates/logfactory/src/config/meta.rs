//! Resolved logger class configuration

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::options::LoggerOptions;
use crate::level::Level;

pub const DEFAULT_FILE_SUFFIX: &str = ".log";
pub const DEFAULT_FILE_ENCODING: &str = "utf-8";
pub const DEFAULT_MESSAGE_FORMAT: &str = "[%(asctime)s] [%(levelname)s]: %(message)s";
pub const DEFAULT_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Fully resolved options of a logger class.
///
/// Built once from defaults plus [`LoggerOptions`] overrides and shared
/// read-only by every logger the class creates. Nothing is validated here:
/// a bad directory, encoding or template surfaces when a logger is built
/// or a record is formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggerMeta {
    /// Directory holding the per-name log files
    pub files_path: PathBuf,
    /// Appended to the logger name to form the file name
    pub file_suffix: String,
    pub file_encoding: String,
    pub file_enabled: bool,
    pub stream_enabled: bool,
    /// Threshold for the logger and every handler it attaches
    pub default_level: Level,
    pub default_message_format: String,
    pub default_date_format: String,
    /// Unrecognized option keys, kept verbatim and otherwise ignored
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for LoggerMeta {
    fn default() -> Self {
        Self {
            files_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            file_encoding: DEFAULT_FILE_ENCODING.to_string(),
            file_enabled: true,
            stream_enabled: false,
            default_level: Level::Debug,
            default_message_format: DEFAULT_MESSAGE_FORMAT.to_string(),
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl LoggerMeta {
    /// Defaults with the given overrides applied
    pub fn from_options(options: LoggerOptions) -> Self {
        Self::default().apply(options)
    }

    /// Replace every field the options name; leave the rest untouched
    pub fn apply(mut self, options: LoggerOptions) -> Self {
        if let Some(files_path) = options.files_path {
            self.files_path = files_path;
        }
        if let Some(file_suffix) = options.file_suffix {
            self.file_suffix = file_suffix;
        }
        if let Some(file_encoding) = options.file_encoding {
            self.file_encoding = file_encoding;
        }
        if let Some(file_enabled) = options.file_enabled {
            self.file_enabled = file_enabled;
        }
        if let Some(stream_enabled) = options.stream_enabled {
            self.stream_enabled = stream_enabled;
        }
        if let Some(default_level) = options.default_level {
            self.default_level = default_level;
        }
        if let Some(format) = options.default_message_format {
            self.default_message_format = format;
        }
        if let Some(format) = options.default_date_format {
            self.default_date_format = format;
        }
        self.extra.extend(options.extra);
        self
    }

    /// `<files_path>/<name><file_suffix>`
    ///
    /// The suffix is appended to the joined path as text, so a name that
    /// already contains dots keeps them (`feeder.myspace` → `feeder.myspace.log`).
    pub fn file_path_for(&self, name: &str) -> PathBuf {
        let mut path = self.files_path.join(name).into_os_string();
        path.push(&self.file_suffix);
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let meta = LoggerMeta::default();
        assert_eq!(meta.file_suffix, ".log");
        assert_eq!(meta.file_encoding, "utf-8");
        assert!(meta.file_enabled);
        assert!(!meta.stream_enabled);
        assert_eq!(meta.default_level, Level::Debug);
        assert_eq!(meta.default_message_format, DEFAULT_MESSAGE_FORMAT);
        assert_eq!(meta.default_date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(meta.files_path, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_overrides_replace_named_fields_only() {
        let meta = LoggerMeta::from_options(
            LoggerOptions::new()
                .with_default_level(Level::Warning)
                .with_stream_enabled(true),
        );
        assert_eq!(meta.default_level, Level::Warning);
        assert!(meta.stream_enabled);
        assert!(meta.file_enabled);
        assert_eq!(meta.file_suffix, ".log");
    }

    #[test]
    fn test_file_path_for() {
        let meta = LoggerMeta::from_options(LoggerOptions::new().with_files_path("/var/log"));
        assert_eq!(
            meta.file_path_for("feeder.myspace"),
            PathBuf::from("/var/log/feeder.myspace.log")
        );

        let meta = LoggerMeta::from_options(
            LoggerOptions::new()
                .with_files_path("/srv/app")
                .with_file_suffix("-debug.txt"),
        );
        assert_eq!(meta.file_path_for("api"), PathBuf::from("/srv/app/api-debug.txt"));
    }
}
