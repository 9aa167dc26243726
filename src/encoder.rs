use crate::backend::{BackendConfig, Encoding, NativeLevel};
use crate::record::LogRecord;

fn color_code(level: NativeLevel) -> &'static str {
    match level {
        NativeLevel::Debug => "\x1b[35m",
        NativeLevel::Info => "\x1b[34m",
        NativeLevel::Warn => "\x1b[33m",
        NativeLevel::Error => "\x1b[31m",
    }
}

/// Encode a record into one output line according to `config`.
pub fn encode(record: &LogRecord<'_>, config: &BackendConfig) -> Vec<u8> {
    let mut buf = match config.encoding {
        Encoding::Json => encode_json(record),
        Encoding::Console => encode_console(record, config.color),
    };
    if !config.skip_line_ending {
        buf.push(b'\n');
    }
    buf
}

fn encode_json(record: &LogRecord<'_>) -> Vec<u8> {
    // Keys are strings and values already JSON, serialization cannot fail.
    serde_json::to_vec(record).unwrap_or_default()
}

fn encode_console(record: &LogRecord<'_>, color: bool) -> Vec<u8> {
    let mut line = String::with_capacity(64 + record.message.len());
    line.push_str(&record.timestamp);
    line.push('\t');
    if color {
        line.push_str(color_code(record.level));
        line.push_str(record.level.as_str());
        line.push_str("\x1b[0m");
    } else {
        line.push_str(record.level.as_str());
    }
    if let Some(caller) = &record.caller {
        line.push('\t');
        line.push_str(&caller.to_string());
    }
    line.push('\t');
    line.push_str(record.message);
    if !record.fields.is_empty() {
        line.push('\t');
        line.push_str(&record.fields_json());
    }
    line.into_bytes()
}
