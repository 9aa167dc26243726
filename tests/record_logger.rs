use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use typed_log_facade::writer::CaptureWriter;
use typed_log_facade::{
    Level, LevelMapping, Logger, LoggerConfig, LoggerError, Output, RecordLogger, TypedField,
    TypedLogger,
};

fn capture_logger(config: LoggerConfig) -> (RecordLogger<&'static str>, CaptureWriter) {
    let capture = CaptureWriter::new();
    let logger = RecordLogger::new("request-ctx", config.with_output(Output::writer(capture.clone())))
        .expect("logger should build");
    (logger, capture)
}

fn json_lines(capture: &CaptureWriter) -> Vec<Value> {
    capture
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("each line is one JSON object"))
        .collect()
}

fn missing_dir_output() -> Output {
    Output::File(
        std::env::temp_dir()
            .join("typed-log-facade-does-not-exist")
            .join("deeper")
            .join("out.log"),
    )
}

/// Holds bytes until flushed, like a buffered file.
struct Buffered {
    pending: Vec<u8>,
    out: CaptureWriter,
}

impl Write for Buffered {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.write_all(&self.pending)?;
        self.pending.clear();
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Order {
    id: u32,
    items: Vec<&'static str>,
}

#[test]
fn test_emits_typed_fields_as_json() {
    let (logger, capture) = capture_logger(LoggerConfig::production());

    logger.info(
        "order placed",
        &[
            logger.string("user", "alice"),
            logger.bool("express", true),
            logger.uint64("total_cents", 1999),
            logger.int16("delta", -3),
            logger.float64("ratio", 0.25),
            logger.duration("elapsed", Duration::from_micros(1_500_500)),
            logger.interface("order", Order { id: 7, items: vec!["tea"] }),
        ],
    );

    let lines = json_lines(&capture);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line["level"], "INFO");
    assert_eq!(line["msg"], "order placed");
    assert_eq!(line["user"], "alice");
    assert_eq!(line["express"], true);
    assert_eq!(line["total_cents"], 1999);
    assert_eq!(line["delta"], -3);
    assert_eq!(line["ratio"], "0.250000");
    assert_eq!(line["elapsed"], 1500, "duration is plain whole milliseconds");
    assert_eq!(line["order"], serde_json::json!({ "id": 7, "items": ["tea"] }));
    assert!(line["ts"].is_string());
}

#[test]
fn test_duplicate_keys_keep_first_occurrence() {
    let (logger, capture) = capture_logger(LoggerConfig::production().with_caller(false));

    logger.info(
        "dedupe",
        &[
            TypedField::string("k", "a"),
            TypedField::string("k", "b"),
            TypedField::string("j", "c"),
        ],
    );

    let line = capture.lines().remove(0);
    assert!(
        line.ends_with(r#""msg":"dedupe","k":"a","j":"c"}"#),
        "unexpected line: {line}"
    );
}

#[test]
fn test_level_gate_after_set_level_warning() {
    let (logger, capture) = capture_logger(LoggerConfig::production());

    logger.set_level(Level::WARNING);
    logger.info("filtered out", &[]);
    assert!(capture.is_empty(), "info must be a no-op at warning level");

    logger.warning("kept", &[]);
    logger.error("also kept", &[]);
    let lines = json_lines(&capture);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["level"], "WARN");
    assert_eq!(lines[1]["level"], "ERROR");
}

#[test]
fn test_trace_and_debug_share_debug_severity() {
    let (logger, capture) = capture_logger(LoggerConfig::production().with_level(Level::TRACE));

    logger.trace("t", &[]);
    logger.debug("d", &[]);
    let levels: Vec<Value> = json_lines(&capture).iter().map(|l| l["level"].clone()).collect();
    assert_eq!(levels, ["DEBUG", "DEBUG"]);
}

#[test]
fn test_default_level_is_info() {
    let (logger, capture) = capture_logger(LoggerConfig::production());
    assert_eq!(logger.level(), Level::INFO);

    logger.debug("hidden", &[]);
    assert!(capture.is_empty());
}

#[test]
fn test_level_read_back_strict() {
    let (logger, _) = capture_logger(LoggerConfig::production());

    logger.set_level(Level::WARNING);
    assert_eq!(logger.level(), Level::WARNING);

    logger.set_level(Level::ERROR);
    assert_eq!(logger.level(), Level::ERROR);

    // Trace and Debug share the debug gate, so reading it back is
    // ambiguous and resolves to info.
    logger.set_level(Level::DEBUG);
    assert_eq!(logger.level(), Level::INFO);
}

#[test]
fn test_level_read_back_legacy() {
    let (logger, capture) =
        capture_logger(LoggerConfig::production().with_mapping(LevelMapping::Legacy));

    logger.set_level(Level::WARNING);
    assert_eq!(logger.level(), Level::INFO);

    // Warning gates at debug under the legacy table.
    logger.info("still written", &[]);
    assert_eq!(capture.lines().len(), 1);
}

#[test]
fn test_unknown_level_falls_back_to_info() {
    let (logger, capture) = capture_logger(LoggerConfig::production());

    logger.set_level(Level::ERROR);
    logger.set_level(Level(42));
    assert_eq!(logger.level(), Level::INFO);

    logger.info("visible again", &[]);
    assert_eq!(capture.lines().len(), 1);
}

#[test]
fn test_set_output_retargets() {
    let (logger, first) = capture_logger(LoggerConfig::production());
    logger.info("before", &[]);

    let second = CaptureWriter::new();
    logger.set_output(Output::writer(second.clone())).expect("retarget");
    logger.info("after", &[]);

    assert_eq!(json_lines(&first)[0]["msg"], "before");
    assert_eq!(first.lines().len(), 1);
    assert_eq!(json_lines(&second)[0]["msg"], "after");
    assert_eq!(second.lines().len(), 1);
}

#[test]
fn test_set_output_flushes_previous_output() {
    let published = CaptureWriter::new();
    let logger = RecordLogger::new(
        (),
        LoggerConfig::production().with_output(Output::writer(Buffered {
            pending: Vec::new(),
            out: published.clone(),
        })),
    )
    .expect("build");

    logger.info("buffered", &[]);
    assert!(published.is_empty());

    logger.set_output(Output::writer(CaptureWriter::new())).expect("retarget");
    assert_eq!(json_lines(&published)[0]["msg"], "buffered");
}

#[test]
fn test_drop_flushes_output() {
    let published = CaptureWriter::new();
    let logger = RecordLogger::new(
        (),
        LoggerConfig::production().with_output(Output::writer(Buffered {
            pending: Vec::new(),
            out: published.clone(),
        })),
    )
    .expect("build");

    logger.error("last words", &[]);
    assert!(published.is_empty());

    drop(logger);
    assert_eq!(json_lines(&published)[0]["msg"], "last words");
}

#[test]
fn test_failed_retarget_keeps_previous_output() {
    let (logger, capture) = capture_logger(LoggerConfig::production());

    let err = logger.set_output(missing_dir_output()).expect_err("directory is missing");
    assert!(matches!(err, LoggerError::Output { .. }));

    logger.info("still here", &[]);
    assert_eq!(json_lines(&capture)[0]["msg"], "still here");
}

#[test]
fn test_concurrent_emissions_around_retarget_are_not_split() {
    let (logger, first) = capture_logger(LoggerConfig::production());
    let second = CaptureWriter::new();
    let padding = "x".repeat(256);

    std::thread::scope(|s| {
        for worker in 0..4i64 {
            let logger = &logger;
            let padding = padding.clone();
            s.spawn(move || {
                for i in 0..200i64 {
                    logger.info(
                        "tick",
                        &[
                            TypedField::int64("worker", worker),
                            TypedField::int64("i", i),
                            TypedField::string("pad", padding.clone()),
                        ],
                    );
                }
            });
        }
        let logger = &logger;
        let second = second.clone();
        s.spawn(move || {
            std::thread::sleep(Duration::from_millis(1));
            logger.set_output(Output::writer(second)).expect("retarget");
        });
    });

    let mut records = json_lines(&first);
    records.extend(json_lines(&second));
    assert_eq!(records.len(), 800);
    for record in &records {
        assert_eq!(record["msg"], "tick");
        assert_eq!(record["pad"].as_str().map(str::len), Some(256));
    }
}

#[test]
fn test_context_is_returned_verbatim() {
    let (logger, _) = capture_logger(LoggerConfig::production());
    assert_eq!(*logger.context(), "request-ctx");
}

#[test]
fn test_caller_points_at_application_call() {
    let (logger, capture) = capture_logger(LoggerConfig::production());

    let line = line!() + 1;
    logger.error("boom", &[]);

    let caller = json_lines(&capture)[0]["caller"].as_str().unwrap_or_default().to_string();
    assert_eq!(caller, format!("tests/record_logger.rs:{}", line));
}

#[test]
fn test_dyn_logger_emits() {
    let (logger, capture) = capture_logger(LoggerConfig::production());
    let facade: &dyn Logger<Context = &'static str> = &logger;

    facade.warning("through a trait object", &[TypedField::int("n", 1)]);
    assert_eq!(json_lines(&capture)[0]["n"], 1);
}

#[test]
fn test_development_mode_writes_console_lines() {
    let (logger, capture) = capture_logger(LoggerConfig::development().with_caller(false));

    logger.info("hello", &[TypedField::string("who", "world")]);
    let line = capture.lines().remove(0);
    let columns: Vec<&str> = line.split('\t').collect();
    assert_eq!(columns.len(), 4, "ts, level, msg, fields: {line:?}");
    assert!(columns[1].contains("INFO"));
    assert_eq!(columns[2], "hello");
    assert_eq!(columns[3], r#"{"who":"world"}"#);
}

#[test]
fn test_construction_fails_on_bad_output() {
    let result = RecordLogger::new((), LoggerConfig::production().with_output(missing_dir_output()));
    assert!(matches!(result, Err(LoggerError::Output { .. })));
}

#[test]
fn test_construction_fails_on_bad_time_format() {
    let result = RecordLogger::new(
        (),
        LoggerConfig::production()
            .with_output(Output::writer(CaptureWriter::new()))
            .with_time_format("%Y-%"),
    );
    assert!(matches!(result, Err(LoggerError::Build(_))));
}

#[test]
fn test_file_output_appends() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("typed-log-facade-{}-{}.log", std::process::id(), nanos));

    {
        let logger = RecordLogger::new((), LoggerConfig::production().with_output(Output::File(path.clone())))
            .expect("file output");
        logger.info("first", &[]);
    }
    {
        let logger = RecordLogger::new((), LoggerConfig::production().with_output(Output::File(path.clone())))
            .expect("file output");
        logger.info("second", &[]);
    }

    let contents = std::fs::read_to_string(&path).expect("log file");
    assert_eq!(contents.lines().count(), 2);
    std::fs::remove_file(&path).expect("cleanup");
}
