//! Handler trait definition

use std::io::Write;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::LoggerResult;
use crate::format::Formatter;
use crate::level::Level;
use crate::record::Record;

/// What sort of sink a handler writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    File,
    Stream,
    Null,
    Custom,
}

/// Output sink attached to a [`Logger`](crate::Logger)
///
/// Implementations:
/// - `FileHandler`: appends to a file
/// - `StreamHandler`: writes to stderr, stdout or any writer
/// - `NullHandler`: discards everything
///
/// Each handler carries its own level threshold and formatter. Loggers call
/// [`Handler::handle`], which filters by level, emits, and reports emit
/// failures to stderr instead of returning them to the logging call site.
pub trait Handler: Send + Sync {
    fn kind(&self) -> HandlerKind;

    fn level(&self) -> Level;

    fn set_level(&self, level: Level);

    fn formatter(&self) -> Arc<Formatter>;

    fn set_formatter(&self, formatter: Arc<Formatter>);

    /// Format and write one record
    fn emit(&self, record: &Record) -> LoggerResult<()>;

    fn flush(&self) -> LoggerResult<()> {
        Ok(())
    }

    /// Emit the record if it passes this handler's level.
    ///
    /// Returns whether the record was accepted.
    fn handle(&self, record: &Record) -> bool {
        if record.level < self.level() {
            return false;
        }
        if let Err(err) = self.emit(record) {
            report_error(&err, record);
        }
        true
    }
}

/// Type alias for an Arc-wrapped handler
pub type SharedHandler = Arc<dyn Handler>;

/// Print an emit failure to stderr
pub fn report_error(err: &dyn std::error::Error, record: &Record) {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(
        stderr,
        "--- Logging error ---\n{}\nMessage: {:?}\nLogger: {}",
        err, record.message, record.name
    );
}

/// Level and formatter shared by the built-in handlers
#[derive(Debug)]
pub struct HandlerState {
    level: RwLock<Level>,
    formatter: RwLock<Arc<Formatter>>,
}

impl Default for HandlerState {
    fn default() -> Self {
        Self {
            level: RwLock::new(Level::Debug),
            formatter: RwLock::new(Arc::new(Formatter::default())),
        }
    }
}

impl HandlerState {
    pub fn level(&self) -> Level {
        *self.level.read()
    }

    pub fn set_level(&self, level: Level) {
        *self.level.write() = level;
    }

    pub fn formatter(&self) -> Arc<Formatter> {
        self.formatter.read().clone()
    }

    pub fn set_formatter(&self, formatter: Arc<Formatter>) {
        *self.formatter.write() = formatter;
    }

    /// Render a record with the current formatter
    pub fn render(&self, record: &Record) -> LoggerResult<String> {
        Ok(self.formatter().format(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHandler {
        state: HandlerState,
        emitted: AtomicUsize,
    }

    impl Handler for CountingHandler {
        fn kind(&self) -> HandlerKind {
            HandlerKind::Custom
        }
        fn level(&self) -> Level {
            self.state.level()
        }
        fn set_level(&self, level: Level) {
            self.state.set_level(level)
        }
        fn formatter(&self) -> Arc<Formatter> {
            self.state.formatter()
        }
        fn set_formatter(&self, formatter: Arc<Formatter>) {
            self.state.set_formatter(formatter)
        }
        fn emit(&self, record: &Record) -> LoggerResult<()> {
            self.state.render(record)?;
            self.emitted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_handle_filters_by_level() {
        let handler = CountingHandler::default();
        handler.set_level(Level::Warning);

        assert!(!handler.handle(&Record::new("t", Level::Info, "skip")));
        assert!(handler.handle(&Record::new("t", Level::Error, "keep")));
        assert_eq!(handler.emitted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_failure_is_reported_not_raised() {
        let handler = CountingHandler::default();
        handler.set_formatter(Arc::new(Formatter::new("%(nope)s", None)));

        // accepted by level, but emit fails and goes to stderr
        assert!(handler.handle(&Record::new("t", Level::Info, "x")));
        assert_eq!(handler.emitted.load(Ordering::SeqCst), 0);
    }
}
