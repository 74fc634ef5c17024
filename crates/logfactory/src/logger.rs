//! Named logger instances
//!
//! A [`Logger`] is built once per name from the [`LoggerMeta`] of its
//! class. Construction sets the level, builds one shared formatter and
//! attaches the file and/or stream handler the metadata asks for. After
//! that, records flow through [`Logger::log`] to every handler whose own
//! level admits them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::LoggerMeta;
use crate::error::{LoggerError, LoggerResult};
use crate::format::Formatter;
use crate::handlers::{
    FileHandler, FileHandlerOptions, Handler, SharedHandler, StreamHandler, StreamTarget,
};
use crate::level::Level;
use crate::record::Record;

/// A named logger configured from its class metadata
pub struct Logger {
    name: String,
    meta: Arc<LoggerMeta>,
    level: RwLock<Level>,
    formatter: Arc<Formatter>,
    handlers: RwLock<Vec<SharedHandler>>,
    file_path: Option<PathBuf>,
    file_handler: Option<Arc<FileHandler>>,
    stream_handler: Option<Arc<StreamHandler>>,
}

impl Logger {
    /// Build a logger and attach the handlers `meta` enables.
    ///
    /// Fails when the name is empty, when the log file cannot be opened
    /// (missing or unwritable directory) or when the file encoding is
    /// unknown. Format templates are not checked until a record is emitted.
    pub fn new(name: impl Into<String>, meta: Arc<LoggerMeta>) -> LoggerResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(LoggerError::InvalidName(name));
        }

        let formatter = Arc::new(Formatter::new(
            meta.default_message_format.clone(),
            Some(meta.default_date_format.as_str()),
        ));

        let mut logger = Self {
            level: RwLock::new(meta.default_level),
            formatter,
            handlers: RwLock::new(Vec::new()),
            file_path: None,
            file_handler: None,
            stream_handler: None,
            name,
            meta,
        };

        if logger.meta.file_enabled {
            let path = logger.meta.file_path_for(&logger.name);
            let options =
                FileHandlerOptions::default().with_encoding(logger.meta.file_encoding.clone());
            let handler = logger.add_file_handler(&path, options)?;
            logger.file_path = Some(path);
            logger.file_handler = Some(handler);
        }

        if logger.meta.stream_enabled {
            let handler = logger.add_stream_handler(StreamTarget::Stderr);
            logger.stream_handler = Some(handler);
        }

        log::debug!(
            "built logger {} (level {}, file {:?}, stream {})",
            logger.name,
            logger.level(),
            logger.file_path,
            logger.stream_handler.is_some()
        );

        Ok(logger)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metadata of the class this logger was built from
    pub fn meta(&self) -> &Arc<LoggerMeta> {
        &self.meta
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    /// Change the logger threshold; handler thresholds are left alone
    pub fn set_level(&self, level: Level) {
        *self.level.write() = level;
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Formatter shared by the handlers this logger attaches
    pub fn formatter(&self) -> Arc<Formatter> {
        Arc::clone(&self.formatter)
    }

    /// Resolved log file path, when the file handler is enabled
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// The file handler attached at construction
    pub fn file_handler(&self) -> Option<&Arc<FileHandler>> {
        self.file_handler.as_ref()
    }

    /// The stream handler attached at construction
    pub fn stream_handler(&self) -> Option<&Arc<StreamHandler>> {
        self.stream_handler.as_ref()
    }

    /// Snapshot of the registered handlers, in registration order
    pub fn handlers(&self) -> Vec<SharedHandler> {
        self.handlers.read().clone()
    }

    pub fn has_handlers(&self) -> bool {
        !self.handlers.read().is_empty()
    }

    /// Register a handler as is; its level and formatter are not touched
    pub fn add_handler(&self, handler: SharedHandler) {
        let mut handlers = self.handlers.write();
        if !handlers.iter().any(|h| same_handler(h, &handler)) {
            handlers.push(handler);
        }
    }

    /// Unregister a handler; returns whether it was registered
    pub fn remove_handler(&self, handler: &SharedHandler) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|h| !same_handler(h, handler));
        handlers.len() != before
    }

    /// Open a file handler with the logger's current level and formatter,
    /// register it, and return it
    pub fn add_file_handler(
        &self,
        path: impl Into<PathBuf>,
        options: FileHandlerOptions,
    ) -> LoggerResult<Arc<FileHandler>> {
        let handler = Arc::new(FileHandler::new(path, options)?);
        self.configure(handler.as_ref());
        self.add_handler(handler.clone());
        Ok(handler)
    }

    /// Create a stream handler with the logger's current level and
    /// formatter, register it, and return it
    pub fn add_stream_handler(&self, target: StreamTarget) -> Arc<StreamHandler> {
        let handler = Arc::new(StreamHandler::new(target));
        self.configure(handler.as_ref());
        self.add_handler(handler.clone());
        handler
    }

    fn configure(&self, handler: &dyn Handler) {
        handler.set_level(self.level());
        handler.set_formatter(self.formatter());
    }

    /// Log a message at `level`
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.log_at(level, args, None, None, None);
    }

    /// Log a message at `level` with its call site
    pub fn log_at(
        &self,
        level: Level,
        args: fmt::Arguments<'_>,
        module_path: Option<&str>,
        file: Option<&str>,
        line: Option<u32>,
    ) {
        if !self.is_enabled_for(level) {
            return;
        }
        let record = Record::new(self.name.as_str(), level, args.to_string())
            .with_location(module_path, file, line);
        self.handle(&record);
    }

    /// Pass a record to every handler; returns how many accepted it
    pub fn handle(&self, record: &Record) -> usize {
        let handlers = self.handlers();
        handlers.iter().filter(|h| h.handle(record)).count()
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, format_args!("{}", message));
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, format_args!("{}", message));
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, format_args!("{}", message));
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, format_args!("{}", message));
    }

    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Level::Critical, format_args!("{}", message));
    }

    /// Log at `ERROR` with the error and its source chain appended
    pub fn exception(&self, message: impl fmt::Display, err: &(dyn std::error::Error + 'static)) {
        if !self.is_enabled_for(Level::Error) {
            return;
        }
        let record = Record::new(self.name.as_str(), Level::Error, message.to_string())
            .with_exception(Record::render_error(err));
        self.handle(&record);
    }

    /// Flush every handler, returning the first failure
    pub fn flush(&self) -> LoggerResult<()> {
        let mut first_error = None;
        for handler in self.handlers() {
            if let Err(err) = handler.flush() {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("file_path", &self.file_path)
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}

/// Whether two handles point at the same handler
pub fn same_handler(a: &SharedHandler, b: &SharedHandler) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggerOptions;
    use crate::handlers::test_support::SharedBuffer;
    use crate::handlers::{HandlerKind, NullHandler};
    use std::fs;
    use tempfile::tempdir;

    fn meta(options: LoggerOptions) -> Arc<LoggerMeta> {
        Arc::new(LoggerMeta::from_options(options))
    }

    fn quiet() -> LoggerOptions {
        LoggerOptions::new().with_file_enabled(false)
    }

    #[test]
    fn test_defaults_attach_file_only() {
        let dir = tempdir().unwrap();
        let logger =
            Logger::new("app", meta(LoggerOptions::new().with_files_path(dir.path()))).unwrap();

        assert_eq!(logger.level(), Level::Debug);
        assert!(logger.meta().file_enabled);
        assert!(!logger.meta().stream_enabled);
        assert!(logger.stream_handler().is_none());
        assert_eq!(logger.file_path(), Some(dir.path().join("app.log").as_path()));

        let handlers = logger.handlers();
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].kind(), HandlerKind::File);
        assert!(dir.path().join("app.log").exists());
    }

    #[test]
    fn test_level_override_reaches_handlers() {
        let dir = tempdir().unwrap();
        let logger = Logger::new(
            "svc",
            meta(
                LoggerOptions::new()
                    .with_files_path(dir.path())
                    .with_stream_enabled(true)
                    .with_default_level(Level::Error),
            ),
        )
        .unwrap();

        assert_eq!(logger.level(), Level::Error);
        let handlers = logger.handlers();
        assert_eq!(handlers.len(), 2);
        for handler in &handlers {
            assert_eq!(handler.level(), Level::Error);
            assert!(Arc::ptr_eq(&handler.formatter(), &logger.formatter()));
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            Logger::new("", meta(quiet())),
            Err(LoggerError::InvalidName(_))
        ));
    }

    #[test]
    fn test_missing_directory_fails_construction() {
        let dir = tempdir().unwrap();
        let result = Logger::new(
            "app",
            meta(LoggerOptions::new().with_files_path(dir.path().join("absent"))),
        );
        assert!(matches!(result, Err(LoggerError::Io(_))));
        assert!(!dir.path().join("absent").exists());
    }

    #[test]
    fn test_unknown_encoding_fails_construction() {
        let dir = tempdir().unwrap();
        let result = Logger::new(
            "app",
            meta(
                LoggerOptions::new()
                    .with_files_path(dir.path())
                    .with_file_encoding("utf-99"),
            ),
        );
        assert!(matches!(result, Err(LoggerError::UnsupportedEncoding(_))));
    }

    #[test]
    fn test_add_stream_handler_uses_current_level_and_formatter() {
        let logger = Logger::new("svc", meta(quiet())).unwrap();
        logger.set_level(Level::Warning);

        let handler = logger.add_stream_handler(StreamTarget::writer(SharedBuffer::default()));
        assert_eq!(handler.level(), Level::Warning);
        assert!(Arc::ptr_eq(&handler.formatter(), &logger.formatter()));

        let shared: SharedHandler = handler;
        assert!(logger.handlers().iter().any(|h| same_handler(h, &shared)));
    }

    #[test]
    fn test_add_file_handler_returns_registered_handler() {
        let dir = tempdir().unwrap();
        let logger = Logger::new("svc", meta(quiet().with_default_level(Level::Info))).unwrap();
        assert!(!logger.has_handlers());

        let extra = dir.path().join("svc-extra.log");
        let handler = logger
            .add_file_handler(&extra, FileHandlerOptions::default())
            .unwrap();
        assert_eq!(handler.path(), extra.as_path());
        assert_eq!(handler.level(), Level::Info);

        let shared: SharedHandler = handler;
        assert!(logger.handlers().iter().any(|h| same_handler(h, &shared)));
        // file handlers added by hand do not replace the configured one
        assert!(logger.file_handler().is_none());
    }

    #[test]
    fn test_dispatch_filters_logger_and_handler_levels() {
        let logger = Logger::new(
            "svc",
            meta(
                quiet()
                    .with_default_level(Level::Info)
                    .with_default_message_format("%(levelname)s %(name)s %(message)s"),
            ),
        )
        .unwrap();
        let all = SharedBuffer::default();
        let errors = SharedBuffer::default();
        logger.add_stream_handler(StreamTarget::writer(all.clone()));
        logger
            .add_stream_handler(StreamTarget::writer(errors.clone()))
            .set_level(Level::Error);

        logger.debug("hidden");
        logger.info("started");
        logger.error(format_args!("failed after {} tries", 3));

        assert_eq!(all.contents(), "INFO svc started\nERROR svc failed after 3 tries\n");
        assert_eq!(errors.contents(), "ERROR svc failed after 3 tries\n");
    }

    #[test]
    fn test_exception_appends_error_chain() {
        let logger = Logger::new(
            "svc",
            meta(quiet().with_default_message_format("%(levelname)s: %(message)s")),
        )
        .unwrap();
        let buffer = SharedBuffer::default();
        logger.add_stream_handler(StreamTarget::writer(buffer.clone()));

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.yaml missing");
        logger.exception("startup failed", &err);

        assert_eq!(
            buffer.contents(),
            "ERROR: startup failed\nError: config.yaml missing\n"
        );
    }

    #[test]
    fn test_malformed_format_fails_lazily() {
        let logger = Logger::new(
            "svc",
            meta(quiet().with_default_message_format("%(message")),
        )
        .unwrap();
        let buffer = SharedBuffer::default();
        logger.add_stream_handler(StreamTarget::writer(buffer.clone()));

        // accepted by the handler, reported on stderr, nothing written
        logger.info("x");
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_unencodable_record_is_reported_not_raised() {
        let dir = tempdir().unwrap();
        let logger = Logger::new(
            "legacy",
            meta(
                LoggerOptions::new()
                    .with_files_path(dir.path())
                    .with_file_encoding("cp1252")
                    .with_default_message_format("%(message)s"),
            ),
        )
        .unwrap();
        let console = SharedBuffer::default();
        logger.add_stream_handler(StreamTarget::writer(console.clone()));

        logger.info("café");
        logger.info("日本");
        logger.info("done");

        // the file skips the record it cannot encode, other handlers still get it
        assert_eq!(
            fs::read(dir.path().join("legacy.log")).unwrap(),
            b"caf\xe9\ndone\n"
        );
        assert_eq!(console.contents(), "café\n日本\ndone\n");
    }

    #[test]
    fn test_add_and_remove_handler() {
        let logger = Logger::new("svc", meta(quiet())).unwrap();
        let handler: SharedHandler = Arc::new(NullHandler::new());

        logger.add_handler(handler.clone());
        logger.add_handler(handler.clone());
        assert_eq!(logger.handlers().len(), 1);

        assert!(logger.remove_handler(&handler));
        assert!(!logger.remove_handler(&handler));
        assert!(!logger.has_handlers());
    }

    #[test]
    fn test_file_records_are_appended() {
        let dir = tempdir().unwrap();
        let logger = Logger::new(
            "db",
            meta(
                LoggerOptions::new()
                    .with_files_path(dir.path())
                    .with_default_message_format("%(levelname)s|%(message)s"),
            ),
        )
        .unwrap();

        logger.info("one");
        logger.warning("two");
        logger.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("db.log")).unwrap();
        assert_eq!(content, "INFO|one\nWARNING|two\n");
    }
}
