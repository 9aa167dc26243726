//! Native record engine.
//!
//! A small synchronous logging engine with its own field types and
//! severities. The facade never talks to it directly; the
//! [`RecordLogger`](crate::adapter::RecordLogger) adapter translates
//! neutral fields and levels into the types defined here.

use crate::caller::Caller;
use crate::encoder;
use crate::error::BackendError;
use crate::field::Reflect;
use crate::record::LogRecord;
use crate::sink::Sink;
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Default timestamp layout: RFC 3339, UTC, millisecond precision.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Reject strftime layouts `chrono` cannot render.
pub fn validate_time_format(format: &str) -> Result<(), BackendError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(BackendError::InvalidTimeFormat(format.to_string()));
    }
    Ok(())
}

/// Severities understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NativeLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl NativeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeLevel::Debug => "DEBUG",
            NativeLevel::Info => "INFO",
            NativeLevel::Warn => "WARN",
            NativeLevel::Error => "ERROR",
        }
    }

    fn from_u8(value: u8) -> NativeLevel {
        match value {
            0 => NativeLevel::Debug,
            1 => NativeLevel::Info,
            2 => NativeLevel::Warn,
            _ => NativeLevel::Error,
        }
    }
}

/// Level gate shared between a config and every handle built from it.
///
/// Handles read it on each call, so changing it takes effect without a
/// rebuild.
#[derive(Debug, Clone)]
pub struct AtomicLevel(Arc<AtomicU8>);

impl AtomicLevel {
    pub fn new(level: NativeLevel) -> Self {
        AtomicLevel(Arc::new(AtomicU8::new(level as u8)))
    }

    pub fn level(&self) -> NativeLevel {
        NativeLevel::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set_level(&self, level: NativeLevel) {
        self.0.store(level as u8, Ordering::Release);
    }

    pub fn enabled(&self, level: NativeLevel) -> bool {
        level >= self.level()
    }
}

/// Field type tags understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    String,
    Bool,
    Uint16,
    Uint32,
    Uint64,
    Int16,
    Int32,
    Int64,
    Reflect,
}

/// Engine-side field. Borrows its key and payload from the caller's
/// field for the duration of one write.
#[derive(Debug, Clone, Copy)]
pub struct NativeField<'a> {
    pub key: &'a str,
    pub ty: NativeType,
    pub integer: i64,
    pub string: &'a str,
    pub interface: Option<&'a dyn Reflect>,
}

impl NativeField<'_> {
    /// Render the authoritative slot as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self.ty {
            NativeType::String => Value::from(self.string),
            NativeType::Bool => Value::Bool(self.integer != 0),
            NativeType::Uint16 | NativeType::Uint32 | NativeType::Uint64 => {
                Value::from(self.integer as u64)
            }
            NativeType::Int16 | NativeType::Int32 | NativeType::Int64 => Value::from(self.integer),
            NativeType::Reflect => match self.interface {
                Some(value) => value
                    .reflect()
                    .unwrap_or_else(|_| Value::String(format!("{:?}", value))),
                None => Value::Null,
            },
        }
    }
}

/// Line layout produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// One JSON object per line.
    Json,
    /// Tab-separated human readable line.
    Console,
}

/// Settings a [`NativeLogger`] is built from.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub level: AtomicLevel,
    pub encoding: Encoding,
    pub time_format: String,
    pub add_caller: bool,
    pub color: bool,
    pub skip_line_ending: bool,
}

impl BackendConfig {
    pub fn production() -> Self {
        Self {
            level: AtomicLevel::new(NativeLevel::Info),
            encoding: Encoding::Json,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            add_caller: true,
            color: false,
            skip_line_ending: false,
        }
    }

    pub fn development() -> Self {
        Self {
            encoding: Encoding::Console,
            color: true,
            ..Self::production()
        }
    }

    /// Build a handle writing to `sink`.
    ///
    /// The handle shares this config's [`AtomicLevel`].
    pub fn build(&self, sink: Sink) -> Result<NativeLogger, BackendError> {
        validate_time_format(&self.time_format)?;
        Ok(NativeLogger {
            config: self.clone(),
            sink,
        })
    }
}

/// Live engine handle: encodes records and writes them to its sink.
#[derive(Debug)]
pub struct NativeLogger {
    config: BackendConfig,
    sink: Sink,
}

impl NativeLogger {
    pub fn enabled(&self, level: NativeLevel) -> bool {
        self.config.level.enabled(level)
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Encode and write one record. Write failures are reported through
    /// `tracing` and otherwise swallowed.
    pub fn write(&self, level: NativeLevel, caller: Caller, message: &str, fields: &[NativeField<'_>]) {
        if !self.enabled(level) {
            return;
        }
        let record = LogRecord {
            timestamp: Utc::now().format(&self.config.time_format).to_string(),
            level,
            caller: self.config.add_caller.then_some(caller),
            message,
            fields: fields.iter().map(|f| (f.key, f.to_json())).collect(),
        };
        let buf = encoder::encode(&record, &self.config);
        if let Err(e) = self.sink.write_record(&buf) {
            tracing::warn!(output = self.sink.target(), error = %e, "failed to write log record");
        }
    }

    /// Flush the sink.
    pub fn sync(&self) {
        if let Err(e) = self.sink.sync() {
            tracing::warn!(output = self.sink.target(), error = %e, "failed to flush log output");
        }
    }
}
