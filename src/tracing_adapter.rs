//! Facade adapter over `tracing`.
//!
//! Each [`TracingLogger`] owns a private [`Dispatch`] (registry + reloadable
//! level filter + `fmt` layer) instead of installing a global subscriber,
//! so several loggers with different outputs can coexist in one process.

use crate::adapter::native_fields;
use crate::backend::validate_time_format;
use crate::caller::Caller;
use crate::config::{LoggerConfig, Mode};
use crate::error::LoggerError;
use crate::field::{TypedField, TypedLogger};
use crate::level::{Level, LevelMapping};
use crate::logger::Logger;
use crate::record::fields_json;
use crate::sink::{Output, Sink};
use parking_lot::RwLock;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, Registry};

const LEVELS: [(Level, tracing::Level); 5] = [
    (Level::TRACE, tracing::Level::TRACE),
    (Level::DEBUG, tracing::Level::DEBUG),
    (Level::INFO, tracing::Level::INFO),
    (Level::WARNING, tracing::Level::WARN),
    (Level::ERROR, tracing::Level::ERROR),
];

const LEGACY_LEVELS: [(Level, tracing::Level); 5] = [
    (Level::TRACE, tracing::Level::TRACE),
    (Level::DEBUG, tracing::Level::DEBUG),
    (Level::INFO, tracing::Level::INFO),
    (Level::WARNING, tracing::Level::DEBUG),
    (Level::ERROR, tracing::Level::ERROR),
];

fn level_table(mapping: LevelMapping) -> &'static [(Level, tracing::Level)] {
    match mapping {
        LevelMapping::Strict => &LEVELS,
        LevelMapping::Legacy => &LEGACY_LEVELS,
    }
}

/// Neutral → `tracing` filter level. Unmapped levels become `INFO`.
fn filter_level(mapping: LevelMapping, level: Level) -> LevelFilter {
    level_table(mapping)
        .iter()
        .find(|(neutral, _)| *neutral == level)
        .map(|(_, native)| LevelFilter::from_level(*native))
        .unwrap_or(LevelFilter::INFO)
}

fn emission_level(level: Level) -> tracing::Level {
    match level {
        Level::ALERT => tracing::Level::ERROR,
        other => LEVELS
            .iter()
            .find(|(neutral, _)| *neutral == other)
            .map(|(_, native)| *native)
            .unwrap_or(tracing::Level::INFO),
    }
}

/// Filter → neutral, unambiguous matches only.
fn neutral_level(mapping: LevelMapping, filter: LevelFilter) -> Level {
    let Some(native) = filter.into_level() else {
        return Level::INFO;
    };
    let mut matches = level_table(mapping)
        .iter()
        .filter(|(_, n)| *n == native)
        .map(|(neutral, _)| *neutral);
    match (matches.next(), matches.next()) {
        (Some(level), None) => level,
        _ => Level::INFO,
    }
}

/// Settings every rebuild of the dispatch reuses.
#[derive(Debug, Clone)]
struct Settings {
    mode: Mode,
    mapping: LevelMapping,
    add_caller: bool,
    time_format: String,
}

struct State {
    dispatch: Dispatch,
    filter: reload::Handle<LevelFilter, Registry>,
    sink: Sink,
}

impl State {
    fn build(settings: &Settings, sink: Sink, filter: LevelFilter) -> Self {
        let (filter_layer, handle) = reload::Layer::new(filter);
        let timer = ChronoUtc::new(settings.time_format.clone());
        let writer = sink.clone();

        // The two fmt layers have different types, build the dispatch in
        // each branch.
        let dispatch = match settings.mode {
            Mode::Production => {
                let fmt_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(timer)
                    .with_writer(move || writer.clone());
                Dispatch::new(Registry::default().with(filter_layer).with(fmt_layer))
            }
            Mode::Development => {
                let fmt_layer = tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_timer(timer)
                    .with_writer(move || writer.clone());
                Dispatch::new(Registry::default().with(filter_layer).with(fmt_layer))
            }
        };

        State {
            dispatch,
            filter: handle,
            sink,
        }
    }

    fn current_filter(&self) -> LevelFilter {
        self.filter.clone_current().unwrap_or(LevelFilter::INFO)
    }

    fn sync(&self) {
        if let Err(e) = self.sink.sync() {
            tracing::warn!(output = self.sink.target(), error = %e, "failed to flush log output");
        }
    }
}

/// [`Logger`] that emits through a private `tracing` subscriber.
///
/// `tracing` field names are static, so the typed fields of a record are
/// attached as a single `fields` value holding a JSON object rendered as
/// text. In production mode a record looks like
/// `{"timestamp":..,"level":"INFO","fields":{"message":"hit","caller":"src/main.rs:9","fields":"{\"n\":5}"},..}`,
/// so numbers and booleans inside `fields` arrive as part of a string.
/// Trace keeps its own severity here.
///
/// `add_caller` and `mapping` are honoured. `skip_line_ending` is not:
/// the `fmt` layer always ends a record with a newline.
pub struct TracingLogger<C> {
    context: C,
    settings: Settings,
    state: RwLock<State>,
}

impl<C> TracingLogger<C> {
    pub fn new(context: C, config: LoggerConfig) -> Result<Self, LoggerError> {
        validate_time_format(&config.time_format)?;
        let settings = Settings {
            mode: config.mode,
            mapping: config.mapping,
            add_caller: config.add_caller,
            time_format: config.time_format,
        };
        let sink = config.output.open()?;
        let state = State::build(&settings, sink, filter_level(settings.mapping, config.level));

        Ok(Self {
            context,
            settings,
            state: RwLock::new(state),
        })
    }
}

impl<C> TypedLogger for TracingLogger<C> {}

impl<C: Send + Sync> Logger for TracingLogger<C> {
    type Context = C;

    fn log(&self, level: Level, caller: Caller, message: &str, fields: &[TypedField]) {
        let level = emission_level(level);
        let state = self.state.read();
        if level > state.current_filter() {
            return;
        }
        let pairs: Vec<(&str, serde_json::Value)> = native_fields(fields)
            .iter()
            .map(|f| (f.key, f.to_json()))
            .collect();
        let fields = fields_json(&pairs);
        // `None` records nothing, so the fmt layer leaves the key out.
        let caller = self.settings.add_caller.then(|| tracing::field::display(caller));

        tracing::dispatcher::with_default(&state.dispatch, || {
            if level == tracing::Level::ERROR {
                tracing::error!(caller, fields = %fields, "{}", message);
            } else if level == tracing::Level::WARN {
                tracing::warn!(caller, fields = %fields, "{}", message);
            } else if level == tracing::Level::INFO {
                tracing::info!(caller, fields = %fields, "{}", message);
            } else if level == tracing::Level::DEBUG {
                tracing::debug!(caller, fields = %fields, "{}", message);
            } else {
                tracing::trace!(caller, fields = %fields, "{}", message);
            }
        });
    }

    fn set_output(&self, output: Output) -> Result<(), LoggerError> {
        let sink = output.open()?;
        let target = sink.target().to_string();

        let mut state = self.state.write();
        let next = State::build(&self.settings, sink, state.current_filter());
        state.sync();
        let old = std::mem::replace(&mut *state, next);
        drop(state);

        tracing::debug!(from = old.sink.target(), to = %target, "log output retargeted");
        Ok(())
    }

    fn set_level(&self, level: Level) {
        let state = self.state.read();
        if let Err(e) = state.filter.reload(filter_level(self.settings.mapping, level)) {
            tracing::warn!(error = %e, "failed to reload level filter");
        }
    }

    fn level(&self) -> Level {
        neutral_level(self.settings.mapping, self.state.read().current_filter())
    }

    fn context(&self) -> &C {
        &self.context
    }
}

impl<C> Drop for TracingLogger<C> {
    fn drop(&mut self) {
        self.state.get_mut().sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mapping_is_monotonic() {
        let strict = LevelMapping::Strict;
        assert_eq!(filter_level(strict, Level::TRACE), LevelFilter::TRACE);
        assert_eq!(filter_level(strict, Level::WARNING), LevelFilter::WARN);
        assert_eq!(filter_level(strict, Level::ALERT), LevelFilter::INFO);
        assert_eq!(filter_level(strict, Level(40)), LevelFilter::INFO);
    }

    #[test]
    fn test_legacy_filter_gates_warning_at_debug() {
        assert_eq!(
            filter_level(LevelMapping::Legacy, Level::WARNING),
            LevelFilter::DEBUG
        );
        // Debug and Warning share a filter, so neither reads back.
        assert_eq!(
            neutral_level(LevelMapping::Legacy, LevelFilter::DEBUG),
            Level::INFO
        );
        assert_eq!(
            neutral_level(LevelMapping::Legacy, LevelFilter::ERROR),
            Level::ERROR
        );
    }

    #[test]
    fn test_emission_levels() {
        assert_eq!(emission_level(Level::TRACE), tracing::Level::TRACE);
        assert_eq!(emission_level(Level::ALERT), tracing::Level::ERROR);
        assert_eq!(emission_level(Level(9)), tracing::Level::INFO);
    }

    #[test]
    fn test_reverse_mapping() {
        assert_eq!(
            neutral_level(LevelMapping::Strict, LevelFilter::WARN),
            Level::WARNING
        );
        assert_eq!(neutral_level(LevelMapping::Strict, LevelFilter::OFF), Level::INFO);
    }
}
