//! Stream handler implementation

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use super::traits::{Handler, HandlerKind, HandlerState};
use crate::error::LoggerResult;
use crate::format::Formatter;
use crate::level::Level;
use crate::record::Record;

/// Where a [`StreamHandler`] writes
#[derive(Default)]
pub enum StreamTarget {
    #[default]
    Stderr,
    Stdout,
    Writer(Box<dyn Write + Send>),
}

impl StreamTarget {
    /// Wrap any writer
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        StreamTarget::Writer(Box::new(writer))
    }

    pub fn name(&self) -> &'static str {
        match self {
            StreamTarget::Stderr => "<stderr>",
            StreamTarget::Stdout => "<stdout>",
            StreamTarget::Writer(_) => "<writer>",
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            StreamTarget::Stderr => {
                let mut stderr = io::stderr().lock();
                stderr.write_all(line.as_bytes())?;
                stderr.flush()
            }
            StreamTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(line.as_bytes())?;
                stdout.flush()
            }
            StreamTarget::Writer(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.flush()
            }
        }
    }
}

impl fmt::Debug for StreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A handler that writes formatted records to the console or a writer
#[derive(Debug, Default)]
pub struct StreamHandler {
    state: HandlerState,
    stream: Mutex<StreamTarget>,
}

impl StreamHandler {
    pub fn new(target: StreamTarget) -> Self {
        Self {
            state: HandlerState::default(),
            stream: Mutex::new(target),
        }
    }

    /// Handler writing to stderr
    pub fn stderr() -> Self {
        Self::new(StreamTarget::Stderr)
    }

    /// Replace the target stream, returning the previous one
    pub fn set_stream(&self, target: StreamTarget) -> StreamTarget {
        std::mem::replace(&mut *self.stream.lock(), target)
    }

    pub fn stream_name(&self) -> &'static str {
        self.stream.lock().name()
    }
}

impl Handler for StreamHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Stream
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

    fn emit(&self, record: &Record) -> LoggerResult<()> {
        let mut line = self.state.render(record)?;
        line.push('\n');
        self.stream.lock().write_line(&line)?;
        Ok(())
    }

    fn flush(&self) -> LoggerResult<()> {
        match &mut *self.stream.lock() {
            StreamTarget::Stderr => io::stderr().flush()?,
            StreamTarget::Stdout => io::stdout().flush()?,
            StreamTarget::Writer(writer) => writer.flush()?,
        }
        Ok(())
    }
}
