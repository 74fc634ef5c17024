//! Severity levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered severity threshold.
///
/// Numeric values follow the conventional 10-step ladder so that levels read
/// from config files as numbers (`20`) and as names (`"INFO"`) agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl Level {
    /// All levels, most verbose first
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Numeric value (`DEBUG` = 10 .. `CRITICAL` = 50)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Look up a level by its exact numeric value
    pub fn from_u8(value: u8) -> Option<Level> {
        Level::ALL.into_iter().find(|level| level.as_u8() == value)
    }

    /// Closest `log` crate filter admitting this level and everything above it
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Level::Debug => log::LevelFilter::Trace,
            Level::Info => log::LevelFilter::Info,
            Level::Warning => log::LevelFilter::Warn,
            Level::Error | Level::Critical => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warning,
            log::Level::Error => Level::Error,
        }
    }
}

/// Error returned when a string names no known level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Level::from_u8(value).ok_or_else(|| ParseLevelError(s.to_string()));
        }
        match trimmed.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" | "fatal" => Ok(Level::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => u8::try_from(n)
                .ok()
                .and_then(Level::from_u8)
                .ok_or_else(|| serde::de::Error::custom(format!("Unknown level: {}", n))),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
