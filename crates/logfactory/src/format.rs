//! `%(key)s`-style record formatter
//!
//! Templates use mapping-style percent directives:
//! `%(key)[flags][width][.precision]conversion`, plus `%%` for a literal
//! percent sign. Supported conversions are `s`, `r`, `d`, `i` and `f`.
//!
//! A malformed template does not fail construction. The parse error is kept
//! and returned by [`Formatter::format`], so it surfaces at the first record.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use crate::record::Record;

/// Default message template for a bare [`Formatter`]
pub const DEFAULT_FORMAT: &str = "%(message)s";

/// Errors raised when a record cannot be rendered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Incomplete format directive at offset {0}")]
    Unterminated(usize),

    #[error("Unknown format key: {0}")]
    UnknownKey(String),

    #[error("Unsupported conversion {conversion:?} for key {key}")]
    BadConversion { key: String, conversion: String },

    #[error("Invalid date format: {0}")]
    BadDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Str,
    Repr,
    Int,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Spec {
    left_align: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { key: String, spec: Spec },
}

enum Value {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Renders a [`Record`] into a single output line (plus exception text)
#[derive(Debug, Clone)]
pub struct Formatter {
    fmt: String,
    datefmt: Option<String>,
    segments: Result<Vec<Segment>, FormatError>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT, None)
    }
}

impl Formatter {
    /// Create a formatter from a message template and an optional strftime date format
    pub fn new(fmt: impl Into<String>, datefmt: Option<&str>) -> Self {
        let fmt = fmt.into();
        let segments = parse(&fmt);
        Self {
            fmt,
            datefmt: datefmt.map(str::to_string),
            segments,
        }
    }

    /// The message template
    pub fn fmt(&self) -> &str {
        &self.fmt
    }

    /// The date template used for `%(asctime)s`
    pub fn datefmt(&self) -> Option<&str> {
        self.datefmt.as_deref()
    }

    /// Whether the template references `%(asctime)s`
    pub fn uses_time(&self) -> bool {
        match &self.segments {
            Ok(segments) => segments
                .iter()
                .any(|s| matches!(s, Segment::Field { key, .. } if key == "asctime")),
            Err(_) => false,
        }
    }

    /// Render the record timestamp with the date format
    pub fn format_time(&self, record: &Record) -> Result<String, FormatError> {
        match &self.datefmt {
            Some(datefmt) => {
                if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
                    return Err(FormatError::BadDate(datefmt.clone()));
                }
                let mut out = String::new();
                write!(out, "{}", record.created.format(datefmt))
                    .map_err(|_| FormatError::BadDate(datefmt.clone()))?;
                Ok(out)
            }
            None => Ok(format!(
                "{},{:03}",
                record.created.format("%Y-%m-%d %H:%M:%S"),
                record.created.timestamp_subsec_millis()
            )),
        }
    }

    /// Render the record
    pub fn format(&self, record: &Record) -> Result<String, FormatError> {
        let segments = self.segments.as_ref().map_err(Clone::clone)?;
        let mut out = String::with_capacity(self.fmt.len() + record.message.len());

        for segment in segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { key, spec } => {
                    let value = self.lookup(key, record)?;
                    out.push_str(&render(key, &value, spec)?);
                }
            }
        }

        if let Some(exception) = &record.exception {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(exception);
        }
        Ok(out)
    }

    fn lookup(&self, key: &str, record: &Record) -> Result<Value, FormatError> {
        let created = record.created;
        let value = match key {
            "name" => Value::Str(record.name.clone()),
            "levelname" => Value::Str(record.level.as_str().to_string()),
            "levelno" => Value::Int(i64::from(record.level.as_u8())),
            "message" => Value::Str(record.message.clone()),
            "asctime" => Value::Str(self.format_time(record)?),
            "created" => Value::Float(
                created.timestamp() as f64 + f64::from(created.timestamp_subsec_micros()) / 1e6,
            ),
            "msecs" => Value::Float(f64::from(created.timestamp_subsec_micros()) / 1e3),
            "module" => Value::Str(record.module().unwrap_or("unknown").to_string()),
            "pathname" => Value::Str(record.file.clone().unwrap_or_else(|| "unknown".to_string())),
            "filename" => Value::Str(record.file_name().unwrap_or("unknown").to_string()),
            "lineno" => Value::Int(i64::from(record.line.unwrap_or(0))),
            "process" => Value::Int(i64::from(record.process_id)),
            "threadName" => Value::Str(record.thread_name.clone()),
            _ => return Err(FormatError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }
}

fn parse(fmt: &str) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = fmt.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        match chars.next() {
            Some((_, '%')) => literal.push('%'),
            Some((_, '(')) => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some((_, ')')) => break,
                        Some((_, ch)) => key.push(ch),
                        None => return Err(FormatError::Unterminated(offset)),
                    }
                }

                let mut spec = Spec {
                    left_align: false,
                    zero_pad: false,
                    width: None,
                    precision: None,
                    conversion: Conversion::Str,
                };

                while let Some(&(_, flag)) = chars.peek() {
                    match flag {
                        '-' => spec.left_align = true,
                        '0' => spec.zero_pad = true,
                        ' ' | '+' | '#' => {}
                        _ => break,
                    }
                    chars.next();
                }
                spec.width = take_number(&mut chars);
                if let Some(&(_, '.')) = chars.peek() {
                    chars.next();
                    spec.precision = Some(take_number(&mut chars).unwrap_or(0));
                }

                spec.conversion = match chars.next() {
                    Some((_, 's')) => Conversion::Str,
                    Some((_, 'r')) => Conversion::Repr,
                    Some((_, 'd')) | Some((_, 'i')) => Conversion::Int,
                    Some((_, 'f')) => Conversion::Float,
                    Some((_, other)) => {
                        return Err(FormatError::BadConversion {
                            key,
                            conversion: other.to_string(),
                        })
                    }
                    None => return Err(FormatError::Unterminated(offset)),
                };

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field { key, spec });
            }
            Some((_, other)) => {
                return Err(FormatError::BadConversion {
                    key: String::new(),
                    conversion: other.to_string(),
                })
            }
            None => return Err(FormatError::Unterminated(offset)),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn take_number(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits.parse().ok()
}

fn render(key: &str, value: &Value, spec: &Spec) -> Result<String, FormatError> {
    let bad = |conversion: &str| FormatError::BadConversion {
        key: key.to_string(),
        conversion: conversion.to_string(),
    };

    let (body, numeric) = match (spec.conversion, value) {
        (Conversion::Str, Value::Str(s)) => (s.clone(), false),
        (Conversion::Str, Value::Int(n)) => (n.to_string(), false),
        (Conversion::Str, Value::Float(f)) => (f.to_string(), false),
        (Conversion::Repr, Value::Str(s)) => (format!("'{}'", s.replace('\'', "\\'")), false),
        (Conversion::Repr, Value::Int(n)) => (n.to_string(), false),
        (Conversion::Repr, Value::Float(f)) => (f.to_string(), false),
        (Conversion::Int, Value::Int(n)) => (n.to_string(), true),
        (Conversion::Int, Value::Float(f)) => ((f.trunc() as i64).to_string(), true),
        (Conversion::Float, Value::Int(n)) => {
            (format!("{:.*}", spec.precision.unwrap_or(6), *n as f64), true)
        }
        (Conversion::Float, Value::Float(f)) => {
            (format!("{:.*}", spec.precision.unwrap_or(6), f), true)
        }
        (Conversion::Int, Value::Str(_)) => return Err(bad("d")),
        (Conversion::Float, Value::Str(_)) => return Err(bad("f")),
    };

    let body = match (spec.conversion, spec.precision) {
        (Conversion::Str | Conversion::Repr, Some(precision)) => {
            body.chars().take(precision).collect()
        }
        _ => body,
    };

    let width = spec.width.unwrap_or(0);
    let len = body.chars().count();
    if len >= width {
        return Ok(body);
    }
    let fill = width - len;
    Ok(if spec.left_align {
        format!("{}{}", body, " ".repeat(fill))
    } else if spec.zero_pad && numeric {
        match body.strip_prefix('-') {
            Some(rest) => format!("-{}{}", "0".repeat(fill), rest),
            None => format!("{}{}", "0".repeat(fill), body),
        }
    } else {
        format!("{}{}", " ".repeat(fill), body)
    })
}
