//! Logger classes: reusable configuration blueprints

use std::sync::Arc;

use crate::config::{LoggerMeta, LoggerOptions};
use crate::error::LoggerResult;
use crate::logger::Logger;

/// A configured logger class.
///
/// Holds the metadata every logger built from it receives. Each class owns
/// its own metadata, so loggers from two classes never share configuration.
///
/// # Example
///
/// ```no_run
/// use logfactory::{Level, LoggerClass, LoggerOptions};
///
/// let class = LoggerClass::new(
///     LoggerOptions::new()
///         .with_files_path("/var/log/myapp")
///         .with_stream_enabled(true)
///         .with_default_level(Level::Info),
/// );
/// let logger = class.instantiate("feeder.myspace")?;
/// logger.info("Hello, World.");
/// # Ok::<(), logfactory::LoggerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerClass {
    meta: Arc<LoggerMeta>,
}

impl LoggerClass {
    /// Merge `options` onto the defaults. Creates no logger.
    pub fn new(options: LoggerOptions) -> Self {
        Self::from_meta(LoggerMeta::from_options(options))
    }

    pub fn from_meta(meta: LoggerMeta) -> Self {
        Self {
            meta: Arc::new(meta),
        }
    }

    /// A class derived from this one with more overrides applied
    pub fn extend(&self, options: LoggerOptions) -> Self {
        Self::from_meta(self.meta.as_ref().clone().apply(options))
    }

    pub fn meta(&self) -> &Arc<LoggerMeta> {
        &self.meta
    }

    /// Build the logger for `name`
    pub fn instantiate(&self, name: &str) -> LoggerResult<Logger> {
        Logger::new(name, Arc::clone(&self.meta))
    }
}

/// Build a logger class from option overrides
pub fn logger_class(options: LoggerOptions) -> LoggerClass {
    LoggerClass::new(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use tempfile::tempdir;

    #[test]
    fn test_default_class() {
        let dir = tempdir().unwrap();
        let class = logger_class(
            LoggerOptions::new()
                .with_files_path(dir.path())
                .with_default_level(Level::Info)
                .with_file_enabled(true)
                .with_stream_enabled(true),
        );

        let logger = class.instantiate("test").unwrap();
        assert_eq!(logger.level(), Level::Info);
        assert!(logger.meta().file_enabled);
        assert!(logger.meta().stream_enabled);
        assert!(Arc::ptr_eq(logger.meta(), class.meta()));
    }

    #[test]
    fn test_no_overrides_keep_defaults() {
        let class = LoggerClass::new(LoggerOptions::new().with_file_enabled(false));
        let logger = class.instantiate("plain").unwrap();

        assert_eq!(logger.level(), Level::Debug);
        assert!(!logger.meta().stream_enabled);
        assert!(logger.stream_handler().is_none());
        assert!(logger.file_path().is_none());
    }

    #[test]
    fn test_classes_are_independent() {
        let first = LoggerClass::new(
            LoggerOptions::new()
                .with_file_enabled(false)
                .with_default_level(Level::Warning),
        );
        let mut second_options = LoggerOptions::new()
            .with_file_enabled(false)
            .with_file_suffix(".txt");
        second_options.set("color", "always").unwrap();
        let second = LoggerClass::new(second_options);

        let a = first.instantiate("a").unwrap();
        let b = second.instantiate("b").unwrap();

        assert_eq!(a.level(), Level::Warning);
        assert_eq!(a.meta().file_suffix, ".log");
        assert!(a.meta().extra.is_empty());

        assert_eq!(b.level(), Level::Debug);
        assert_eq!(b.meta().file_suffix, ".txt");
        assert!(b.meta().extra.contains_key("color"));

        // the base defaults are untouched by either class
        let base = LoggerClass::default();
        assert_eq!(base.meta().default_level, Level::Debug);
        assert_eq!(base.meta().file_suffix, ".log");
    }

    #[test]
    fn test_unknown_options_are_inert() {
        let mut options = LoggerOptions::new().with_file_enabled(false);
        options.set("rotation", "daily").unwrap();
        options.set("max_bytes", 1024).unwrap();
        let class = LoggerClass::new(options);

        let logger = class.instantiate("inert").unwrap();
        assert_eq!(logger.handlers().len(), 0);
        assert_eq!(class.meta().extra.len(), 2);
    }

    #[test]
    fn test_extend() {
        let base = LoggerClass::new(LoggerOptions::new().with_file_suffix(".txt"));
        let derived = base.extend(LoggerOptions::new().with_stream_enabled(true));

        assert_eq!(derived.meta().file_suffix, ".txt");
        assert!(derived.meta().stream_enabled);
        assert!(!base.meta().stream_enabled);
    }
}
