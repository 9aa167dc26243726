use std::time::{Duration, Instant};

use typed_log_facade::writer::NoopWriter;
use typed_log_facade::{Level, Logger, LoggerConfig, Output, RecordLogger, TypedLogger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Surface the adapter's own diagnostics (retargets, flush failures).
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let logger = RecordLogger::new("checkout", LoggerConfig::development().with_output(Output::Stdout))?;

    logger.info(
        "order placed",
        &[
            logger.string("user", "alice"),
            logger.uint32("items", 3),
            logger.float64("total", 42.5),
            logger.duration("elapsed", Duration::from_micros(12_750)),
        ],
    );
    logger.debug("not shown at info", &[]);

    logger.set_level(Level::DEBUG);
    logger.debug("shown after set_level", &[logger.bool("verbose", true)]);

    // Measure the facade without I/O.
    logger.set_output(Output::writer(NoopWriter))?;
    let n: u64 = 100_000;
    let start = Instant::now();
    for i in 0..n {
        logger.error("load test", &[logger.uint64("iteration", i), logger.string("k", "v")]);
    }
    let elapsed = start.elapsed();
    println!(
        "record logger: wrote {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    Ok(())
}
