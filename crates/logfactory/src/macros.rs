//! Convenience macros for logging with format arguments and call site
//!
//! ```no_run
//! use logfactory::{log_info, LoggerClass, LoggerOptions};
//!
//! let logger = LoggerClass::new(LoggerOptions::new()).instantiate("feeder.myspace")?;
//! log_info!(logger, "Hello, {}.", "World");
//! # Ok::<(), logfactory::LoggerError>(())
//! ```

#[macro_export]
macro_rules! log_at_level {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger.log_at(
            $level,
            format_args!($($arg)*),
            Some(module_path!()),
            Some(file!()),
            Some(line!()),
        )
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Level::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Level::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Level::Warning, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Level::Error, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_at_level!($logger, $crate::Level::Critical, $($arg)*)
    };
}
