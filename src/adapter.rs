//! Facade adapter over the native record engine.

use crate::backend::{AtomicLevel, BackendConfig, NativeField, NativeLevel, NativeLogger, NativeType};
use crate::caller::Caller;
use crate::config::LoggerConfig;
use crate::error::LoggerError;
use crate::field::{FieldKind, TypedField, TypedLogger};
use crate::level::{Level, LevelMapping};
use crate::logger::Logger;
use crate::sink::{Output, Sink};
use parking_lot::RwLock;
use std::collections::HashSet;

const STRICT_LEVELS: [(Level, NativeLevel); 5] = [
    (Level::TRACE, NativeLevel::Debug),
    (Level::DEBUG, NativeLevel::Debug),
    (Level::INFO, NativeLevel::Info),
    (Level::WARNING, NativeLevel::Warn),
    (Level::ERROR, NativeLevel::Error),
];

const LEGACY_LEVELS: [(Level, NativeLevel); 5] = [
    (Level::TRACE, NativeLevel::Debug),
    (Level::DEBUG, NativeLevel::Debug),
    (Level::INFO, NativeLevel::Info),
    (Level::WARNING, NativeLevel::Debug),
    (Level::ERROR, NativeLevel::Error),
];

fn level_table(mapping: LevelMapping) -> &'static [(Level, NativeLevel)] {
    match mapping {
        LevelMapping::Strict => &STRICT_LEVELS,
        LevelMapping::Legacy => &LEGACY_LEVELS,
    }
}

/// Neutral → native gate level. Unmapped levels become `Info`.
pub fn native_level(mapping: LevelMapping, level: Level) -> NativeLevel {
    level_table(mapping)
        .iter()
        .find(|(neutral, _)| *neutral == level)
        .map(|(_, native)| *native)
        .unwrap_or(NativeLevel::Info)
}

/// Native → neutral. Only an unambiguous match is returned; a native
/// level shared by several neutral levels (or by none) resolves to
/// `INFO`.
pub fn neutral_level(mapping: LevelMapping, native: NativeLevel) -> Level {
    let mut matches = level_table(mapping)
        .iter()
        .filter(|(_, n)| *n == native)
        .map(|(neutral, _)| *neutral);
    match (matches.next(), matches.next()) {
        (Some(level), None) => level,
        _ => Level::INFO,
    }
}

/// Severity a record is written at. Unlike the gate mapping this is the
/// same for every [`LevelMapping`].
fn emission_level(level: Level) -> NativeLevel {
    match level {
        Level::TRACE | Level::DEBUG => NativeLevel::Debug,
        Level::WARNING => NativeLevel::Warn,
        Level::ERROR | Level::ALERT => NativeLevel::Error,
        _ => NativeLevel::Info,
    }
}

fn native_type(kind: FieldKind) -> NativeType {
    match kind {
        FieldKind::String => NativeType::String,
        FieldKind::Bool => NativeType::Bool,
        FieldKind::UInt16 => NativeType::Uint16,
        FieldKind::UInt32 => NativeType::Uint32,
        FieldKind::UInt64 => NativeType::Uint64,
        FieldKind::Int16 => NativeType::Int16,
        FieldKind::Int32 => NativeType::Int32,
        FieldKind::Int | FieldKind::Int64 => NativeType::Int64,
        // plain millis, the engine must not reinterpret units
        FieldKind::Duration => NativeType::Int64,
        FieldKind::Interface => NativeType::Reflect,
    }
}

/// Translate fields, keeping only the first occurrence of each key.
pub fn native_fields(fields: &[TypedField]) -> Vec<NativeField<'_>> {
    let mut seen = HashSet::with_capacity(fields.len());
    let mut native = Vec::with_capacity(fields.len());
    for f in fields {
        if !seen.insert(&*f.key) {
            continue;
        }
        native.push(NativeField {
            key: &f.key,
            ty: native_type(f.kind),
            integer: f.integer,
            string: &f.string,
            interface: f.interface.as_deref(),
        });
    }
    native
}

struct State {
    config: BackendConfig,
    handle: NativeLogger,
}

/// [`Logger`] backed by the native record engine.
///
/// The live handle sits behind a read/write lock. Emissions hold the read
/// side for the whole write; `set_output` swaps the handle under the
/// write side, so a record always lands entirely in one output.
pub struct RecordLogger<C> {
    context: C,
    mapping: LevelMapping,
    level: AtomicLevel,
    state: RwLock<State>,
}

impl<C> RecordLogger<C> {
    /// Build a logger from `config`.
    ///
    /// Fails if the output cannot be opened or the engine rejects the
    /// configuration; no logger is returned in that case.
    pub fn new(context: C, config: LoggerConfig) -> Result<Self, LoggerError> {
        let backend = config.backend_config();
        backend
            .level
            .set_level(native_level(config.mapping, config.level));
        let sink = config.output.open()?;
        let handle = backend.build(sink)?;

        Ok(Self {
            context,
            mapping: config.mapping,
            level: backend.level.clone(),
            state: RwLock::new(State {
                config: backend,
                handle,
            }),
        })
    }

    /// Toggle the trailing newline. Rebuilds the handle against the
    /// current output.
    pub fn set_skip_line_ending(&self, skip: bool) -> Result<(), LoggerError> {
        let mut state = self.state.write();
        let mut config = state.config.clone();
        config.skip_line_ending = skip;
        let handle = config.build(state.handle.sink().clone())?;
        state.handle.sync();
        *state = State { config, handle };
        Ok(())
    }
}

impl<C> TypedLogger for RecordLogger<C> {}

impl<C: Send + Sync> Logger for RecordLogger<C> {
    type Context = C;

    fn log(&self, level: Level, caller: Caller, message: &str, fields: &[TypedField]) {
        let native = emission_level(level);
        if !self.level.enabled(native) {
            return;
        }
        let fields = native_fields(fields);
        self.state.read().handle.write(native, caller, message, &fields);
    }

    fn set_output(&self, output: Output) -> Result<(), LoggerError> {
        let sink: Sink = output.open()?;
        let target = sink.target().to_string();

        let mut state = self.state.write();
        let handle = state.config.build(sink)?;
        state.handle.sync();
        let old = std::mem::replace(&mut state.handle, handle);
        drop(state);

        tracing::debug!(from = old.sink().target(), to = %target, "log output retargeted");
        Ok(())
    }

    fn set_level(&self, level: Level) {
        self.level.set_level(native_level(self.mapping, level));
    }

    fn level(&self) -> Level {
        neutral_level(self.mapping, self.level.level())
    }

    fn context(&self) -> &C {
        &self.context
    }
}

impl<C> Drop for RecordLogger<C> {
    fn drop(&mut self) {
        self.state.get_mut().handle.sync();
    }
}
