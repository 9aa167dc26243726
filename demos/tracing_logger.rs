use serde::Serialize;

use typed_log_facade::{Level, Logger, LoggerConfig, Output, TracingLogger, TypedLogger};

#[derive(Debug, Serialize)]
struct Peer {
    addr: &'static str,
    port: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = TracingLogger::new((), LoggerConfig::production().with_output(Output::Stdout))?;

    logger.info(
        "connection accepted",
        &[
            logger.interface("peer", Peer { addr: "10.0.0.7", port: 4431 }),
            logger.int32("fd", 12),
        ],
    );

    logger.set_level(Level::WARNING);
    logger.info("dropped by the level gate", &[]);
    logger.warning("slow handshake", &[logger.uint16("ms", 740)]);

    Ok(())
}
