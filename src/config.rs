use crate::backend::{BackendConfig, DEFAULT_TIME_FORMAT};
use crate::env::{
    env_or, LOG_FACADE_LEVEL_ENV, LOG_FACADE_MAPPING_ENV, LOG_FACADE_MODE_ENV,
    LOG_FACADE_OUTPUT_ENV,
};
use crate::error::ConfigError;
use crate::level::{Level, LevelMapping};
use crate::sink::Output;
use std::path::PathBuf;

/// Default formatting profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// JSON lines, no colour.
    #[default]
    Production,
    /// Console lines with a coloured level.
    Development,
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Configuration owned by one logger instance.
///
/// There is no process-wide default: every adapter is built from its own
/// config and later reconfigured only through the facade.
///
/// **Fields**
/// - `mode`: formatting profile, see [`Mode`].
/// - `level`: initial minimum level, normalized like
///   [`Logger::set_level`](crate::logger::Logger::set_level).
/// - `mapping`: neutral→backend level table.
/// - `output`: initial destination.
/// - `add_caller`: attach the `file:line` of the emitting call.
/// - `skip_line_ending`: omit the trailing newline after each record.
/// - `time_format`: `chrono` strftime layout of the timestamp.
#[derive(Debug)]
pub struct LoggerConfig {
    pub mode: Mode,
    pub level: Level,
    pub mapping: LevelMapping,
    pub output: Output,
    pub add_caller: bool,
    pub skip_line_ending: bool,
    pub time_format: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Production,
            level: Level::INFO,
            mapping: LevelMapping::Strict,
            output: Output::Stderr,
            add_caller: true,
            skip_line_ending: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl LoggerConfig {
    pub fn production() -> Self {
        Self::default()
    }

    pub fn development() -> Self {
        Self {
            mode: Mode::Development,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_mapping(mut self, mapping: LevelMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn with_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    pub fn with_skip_line_ending(mut self, skip: bool) -> Self {
        self.skip_line_ending = skip;
        self
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Build a config from the `LOG_FACADE_*` environment variables.
    ///
    /// Missing variables keep their defaults. Unknown level names are
    /// normalized to `info`; an unknown mode is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = env_or(LOG_FACADE_MODE_ENV, "production").parse::<Mode>()?;
        let level = Level::parse_or_info(&env_or(LOG_FACADE_LEVEL_ENV, "info"));
        let mapping = match env_or(LOG_FACADE_MAPPING_ENV, "strict").to_ascii_lowercase().as_str() {
            "legacy" => LevelMapping::Legacy,
            _ => LevelMapping::Strict,
        };
        let output = match env_or(LOG_FACADE_OUTPUT_ENV, "stderr").as_str() {
            "stdout" => Output::Stdout,
            "stderr" | "" => Output::Stderr,
            path => Output::File(PathBuf::from(path)),
        };

        Ok(Self {
            mode,
            level,
            mapping,
            output,
            ..Self::default()
        })
    }

    /// Engine settings derived from this config, independent of the
    /// output.
    pub(crate) fn backend_config(&self) -> BackendConfig {
        let base = match self.mode {
            Mode::Production => BackendConfig::production(),
            Mode::Development => BackendConfig::development(),
        };
        BackendConfig {
            add_caller: self.add_caller,
            skip_line_ending: self.skip_line_ending,
            time_format: self.time_format.clone(),
            ..base
        }
    }
}
