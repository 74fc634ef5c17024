//! File handler
//!
//! Writes one formatted record per line to a file opened in append mode
//! (by default). The target directory must already exist: a missing or
//! unwritable directory is reported as an I/O error when the handler is
//! created, not repaired.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::traits::{Handler, HandlerKind, HandlerState};
use crate::encoding::Encoding;
use crate::error::LoggerResult;
use crate::format::Formatter;
use crate::level::Level;
use crate::record::Record;

/// How the log file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    #[default]
    Append,
    /// Truncate on open, then write sequentially
    Truncate,
}

/// Pass-through options for [`FileHandler::new`]
#[derive(Debug, Clone, Default)]
pub struct FileHandlerOptions {
    pub mode: FileMode,
    /// Encoding label, `utf-8` when unset
    pub encoding: Option<String>,
    /// Defer opening the file until the first record is emitted
    pub delay: bool,
}

impl FileHandlerOptions {
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn delayed(mut self) -> Self {
        self.delay = true;
        self
    }
}

/// A handler that writes formatted records to a file
#[derive(Debug)]
pub struct FileHandler {
    path: PathBuf,
    encoding: Encoding,
    mode: FileMode,
    state: HandlerState,
    file: Mutex<Slot>,
}

#[derive(Debug, Default)]
struct Slot {
    file: Option<File>,
    opened: bool,
}

impl FileHandler {
    /// Create a file handler.
    ///
    /// Fails with `UnsupportedEncoding` for an unknown encoding label, and
    /// with an I/O error when the file cannot be opened (unless delayed).
    pub fn new(path: impl Into<PathBuf>, options: FileHandlerOptions) -> LoggerResult<Self> {
        let path = path.into();
        let encoding = match options.encoding.as_deref() {
            Some(label) => Encoding::lookup(label)?,
            None => Encoding::default(),
        };
        let file = if options.delay {
            None
        } else {
            Some(open(&path, options.mode)?)
        };

        log::trace!("opened file handler {} ({})", path.display(), encoding.name());

        Ok(Self {
            path,
            encoding,
            mode: options.mode,
            state: HandlerState::default(),
            file: Mutex::new(Slot {
                opened: file.is_some(),
                file,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn is_open(&self) -> bool {
        self.file.lock().file.is_some()
    }

    /// Close the underlying file; the next record reopens it
    pub fn close(&self) {
        if let Some(mut file) = self.file.lock().file.take() {
            let _ = file.flush();
        }
    }
}

fn open(path: &Path, mode: FileMode) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        FileMode::Append => options.append(true),
        FileMode::Truncate => options.write(true).truncate(true),
    };
    options.open(path)
}

impl Handler for FileHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::File
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
        // encode before touching the file so a failure writes nothing
        let bytes = self.encoding.encode(&line)?;

        let mut slot = self.file.lock();
        if slot.file.is_none() {
            // only the first open may truncate
            let mode = if slot.opened { FileMode::Append } else { self.mode };
            slot.file = Some(open(&self.path, mode)?);
            slot.opened = true;
        }
        if let Some(file) = slot.file.as_mut() {
            file.write_all(&bytes)?;
            file.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> LoggerResult<()> {
        if let Some(file) = self.file.lock().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}
