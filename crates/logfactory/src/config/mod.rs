//! Logger class configuration
//!
//! - `LoggerOptions`: sparse overrides, built in code or loaded from YAML/JSON
//! - `LoggerMeta`: defaults with the overrides applied, fixed per logger class

mod error;
mod file;
mod meta;
mod options;

pub use error::{ConfigError, ConfigResult};
pub use meta::{
    LoggerMeta, DEFAULT_DATE_FORMAT, DEFAULT_FILE_ENCODING, DEFAULT_FILE_SUFFIX,
    DEFAULT_MESSAGE_FORMAT,
};
pub use options::{
    LoggerOptions, ENV_FILES_PATH, ENV_FILE_ENABLED, ENV_LEVEL, ENV_STREAM_ENABLED,
};
