//! A single log event as seen by formatters and handlers

use chrono::{DateTime, Local};

use crate::level::Level;

/// A log event, created by a [`Logger`](crate::Logger) once its level admits it
#[derive(Debug, Clone)]
pub struct Record {
    /// Name of the logger that produced the record
    pub name: String,
    pub level: Level,
    /// Fully rendered message text
    pub message: String,
    pub created: DateTime<Local>,
    pub module_path: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    /// Rendered error chain attached by `Logger::exception`
    pub exception: Option<String>,
    pub thread_name: String,
    pub process_id: u32,
}

impl Record {
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        let current = std::thread::current();
        Self {
            name: name.into(),
            level,
            message: message.into(),
            created: Local::now(),
            module_path: None,
            file: None,
            line: None,
            exception: None,
            thread_name: current.name().unwrap_or("unnamed").to_string(),
            process_id: std::process::id(),
        }
    }

    /// Attach the call site
    pub fn with_location(
        mut self,
        module_path: Option<&str>,
        file: Option<&str>,
        line: Option<u32>,
    ) -> Self {
        self.module_path = module_path.map(str::to_string);
        self.file = file.map(str::to_string);
        self.line = line;
        self
    }

    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Render an error and its `source()` chain, one cause per line
    pub fn render_error(err: &(dyn std::error::Error + 'static)) -> String {
        let mut out = format!("Error: {}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            out.push_str(&format!("\nCaused by: {}", cause));
            source = cause.source();
        }
        out
    }

    /// File name component of `file`, without directories
    pub fn file_name(&self) -> Option<&str> {
        self.file
            .as_deref()
            .map(|f| f.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(f))
    }

    /// Module name: file stem of the source file, falling back to the
    /// last segment of the module path
    pub fn module(&self) -> Option<&str> {
        if let Some(name) = self.file_name() {
            return Some(name.split('.').next().unwrap_or(name));
        }
        self.module_path
            .as_deref()
            .map(|m| m.rsplit("::").next().unwrap_or(m))
    }
}
