use std::io;

/// Error type returned when building a native engine handle.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("invalid timestamp format {0:?}")]
    InvalidTimeFormat(String),
}

/// Error type returned when reading configuration from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unknown logger mode {0:?}, expected \"production\" or \"development\"")]
    UnknownMode(String),
}

/// Errors surfaced by facade construction and output retargeting.
///
/// Everything else (unknown levels, duplicate or empty keys, write
/// failures on an already-open output) is resolved locally and never
/// reaches the caller.
#[derive(thiserror::Error, Debug)]
pub enum LoggerError {
    #[error("failed to build logger backend: {0}")]
    Build(#[from] BackendError),

    #[error("failed to open log output {target}: {source}")]
    Output {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
