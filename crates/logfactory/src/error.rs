//! Error types shared by handlers, loggers and the registry

use thiserror::Error;

use crate::config::ConfigError;
use crate::format::FormatError;

/// Errors that can occur while building loggers or emitting records
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Cannot encode {character:?} as {encoding}")]
    Unencodable { encoding: String, character: char },

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Invalid logger name: {0:?}")]
    InvalidName(String),

    #[error("Global logger registry is already initialized")]
    AlreadyInitialized,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
