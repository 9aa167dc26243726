use typed_log_facade::{Logger, LoggerConfig, RecordLogger, TypedLogger};

/// Run with e.g. `LOG_FACADE_MODE=development LOG_FACADE_LEVEL=debug`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoggerConfig::from_env()?;
    let logger = RecordLogger::new((), config)?;

    logger.debug("configured from environment", &[logger.string("level", logger.level().to_string())]);
    logger.info("ready", &[]);

    Ok(())
}
