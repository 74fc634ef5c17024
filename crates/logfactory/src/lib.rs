//! logfactory
//!
//! Configured logger classes with per-name file and console output.
//!
//! A [`LoggerClass`] is built once from [`LoggerOptions`] overrides on top of
//! the defaults. Every [`Logger`] it creates sets its level from the class,
//! shares one [`Formatter`], and attaches a file handler writing to
//! `<files_path>/<name><file_suffix>` and/or a stderr stream handler,
//! so call sites only ever ask for a logger by name.
//!
//! ```no_run
//! use logfactory::{Level, LoggerClass, LoggerOptions, LoggerRegistry};
//!
//! let registry = LoggerRegistry::new(LoggerClass::new(
//!     LoggerOptions::new()
//!         .with_files_path("/tmp/logs")
//!         .with_stream_enabled(true)
//!         .with_default_level(Level::Info),
//! ));
//!
//! let logger = registry.get_logger("feeder.myspace")?;
//! logger.info("Hello, World.");
//! // /tmp/logs/feeder.myspace.log:
//! // [Tue Mar 05 14:07:09 2024] [INFO]: Hello, World.
//! # Ok::<(), logfactory::LoggerError>(())
//! ```
//!
//! ## `log` facade
//!
//! [`registry::install_log_bridge`] routes `log::info!(target: "name", ..)`
//! records to the registry logger with that name (`::` in a module-path
//! target becomes `.`).

pub mod class;
pub mod config;
pub mod encoding;
pub mod error;
pub mod format;
pub mod handlers;
pub mod level;
pub mod logger;
mod macros;
pub mod record;
pub mod registry;

pub use class::{logger_class, LoggerClass};
pub use config::{ConfigError, ConfigResult, LoggerMeta, LoggerOptions};
pub use encoding::Encoding;
pub use error::{LoggerError, LoggerResult};
pub use format::{FormatError, Formatter};
pub use handlers::{
    FileHandler, FileHandlerOptions, FileMode, Handler, HandlerKind, NullHandler, SharedHandler,
    StreamHandler, StreamTarget,
};
pub use level::Level;
pub use logger::Logger;
pub use record::Record;
pub use registry::{get_logger, LogBridge, LoggerRegistry};
