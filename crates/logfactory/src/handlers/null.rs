//! No-op handler implementation

use std::sync::Arc;

use super::traits::{Handler, HandlerKind, HandlerState};
use crate::error::LoggerResult;
use crate::format::Formatter;
use crate::level::Level;
use crate::record::Record;

/// A handler that does nothing
///
/// Useful for libraries that want a logger with no output unless the
/// application attaches real handlers.
#[derive(Debug, Default)]
pub struct NullHandler {
    state: HandlerState,
}

impl NullHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Handler for NullHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Null
    }

    fn level(&self) -> Level {
        self.state.level()
    }

    fn set_level(&self, level: Level) {
        self.state.set_level(level);
    }

    fn formatter(&self) -> Arc<Formatter> {
        self.state.formatter()
    }

    fn set_formatter(&self, formatter: Arc<Formatter>) {
        self.state.set_formatter(formatter);
    }

    fn emit(&self, _record: &Record) -> LoggerResult<()> {
        Ok(())
    }

    fn handle(&self, _record: &Record) -> bool {
        false
    }
}
