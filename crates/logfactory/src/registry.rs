//! Logger registry: get-or-create loggers by name
//!
//! A [`LoggerRegistry`] holds the logger class used for new names and
//! caches one [`Logger`] per name. Applications normally build one registry
//! at startup and pass it around; [`init`] / [`global`] offer a process-wide
//! instance for code that cannot take it as a parameter.
//!
//! ```no_run
//! use logfactory::{registry, Level, LoggerClass, LoggerOptions};
//!
//! registry::init(LoggerClass::new(
//!     LoggerOptions::new()
//!         .with_files_path("/var/log/myapp")
//!         .with_default_level(Level::Info),
//! ))?;
//!
//! let logger = registry::get_logger("feeder.myspace")?;
//! logger.info("Hello, World.");
//! # Ok::<(), logfactory::LoggerError>(())
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};

use crate::class::LoggerClass;
use crate::error::{LoggerError, LoggerResult};
use crate::level::Level;
use crate::logger::Logger;

/// Name-keyed cache of loggers built from a registered class
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    class: RwLock<LoggerClass>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    pub fn new(class: LoggerClass) -> Self {
        Self {
            class: RwLock::new(class),
            loggers: Mutex::new(HashMap::new()),
        }
    }

    /// Register the class used for names requested from now on.
    ///
    /// Loggers that already exist keep the configuration they were built with.
    pub fn set_logger_class(&self, class: LoggerClass) {
        *self.class.write() = class;
    }

    pub fn logger_class(&self) -> LoggerClass {
        self.class.read().clone()
    }

    /// Look up the logger for `name`, building it on first request.
    ///
    /// Construction runs under the registry lock, so a name is built at
    /// most once. A failed construction caches nothing and the next request
    /// tries again.
    pub fn get_logger(&self, name: &str) -> LoggerResult<Arc<Logger>> {
        let mut loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(name) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(self.logger_class().instantiate(name)?);
        loggers.insert(name.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// The logger for `name`, if it was already built
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.lock().contains_key(name)
    }

    /// Names of the loggers built so far, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn loggers(&self) -> Vec<Arc<Logger>> {
        self.loggers.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide registry
static GLOBAL: OnceCell<LoggerRegistry> = OnceCell::new();

/// Initialize the global registry with `class`.
///
/// May succeed once per process, and only before [`global`] has created the
/// registry with the default class; later calls return `AlreadyInitialized`.
pub fn init(class: LoggerClass) -> LoggerResult<&'static LoggerRegistry> {
    let mut created = false;
    let registry = GLOBAL.get_or_init(|| {
        created = true;
        LoggerRegistry::new(class)
    });
    if created {
        Ok(registry)
    } else {
        Err(LoggerError::AlreadyInitialized)
    }
}

/// The global registry, created with the default class if [`init`] was never called
pub fn global() -> &'static LoggerRegistry {
    GLOBAL.get_or_init(LoggerRegistry::default)
}

/// Look up or build a logger in the global registry
pub fn get_logger(name: &str) -> LoggerResult<Arc<Logger>> {
    global().get_logger(name)
}

/// Crate-internal diagnostics use this target prefix and never reach the bridge
const INTERNAL_TARGET: &str = "logfactory";

fn is_internal(target: &str) -> bool {
    target == INTERNAL_TARGET
        || target
            .strip_prefix(INTERNAL_TARGET)
            .map_or(false, |rest| rest.starts_with("::"))
}

/// Logger name for a `log` target: module paths use dots, so
/// `myapp::net` logs to `myapp.net` (and `myapp.net.log`)
fn logger_name(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

/// `log` facade backend that routes each record to the registry logger
/// named by the record target, with `::` mapped to `.`
#[derive(Debug)]
pub struct LogBridge {
    registry: &'static LoggerRegistry,
}

impl LogBridge {
    pub fn new(registry: &'static LoggerRegistry) -> Self {
        Self { registry }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        !is_internal(metadata.target())
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let name = logger_name(record.target());
        match self.registry.get_logger(&name) {
            Ok(logger) => logger.log_at(
                Level::from(record.level()),
                *record.args(),
                record.module_path(),
                record.file(),
                record.line(),
            ),
            Err(err) => eprintln!(
                "--- Logging error ---\n{}\nLogger: {}",
                err, name
            ),
        }
    }

    fn flush(&self) {
        for logger in self.registry.loggers() {
            let _ = logger.flush();
        }
    }
}

/// Install a [`LogBridge`] as the `log` crate backend.
///
/// `max_level` becomes the facade's static filter; per-logger levels still apply.
pub fn install_log_bridge(
    registry: &'static LoggerRegistry,
    max_level: Level,
) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(registry)))?;
    log::set_max_level(max_level.to_level_filter());
    Ok(())
}
