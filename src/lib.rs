pub mod field;
pub mod level;
pub mod caller;
pub mod logger;
pub mod error;
pub mod config;
pub mod env;
pub mod sink;
pub mod writer;

pub mod record;
pub mod encoder;
pub mod backend;
pub mod adapter;
pub mod tracing_adapter;

pub use adapter::RecordLogger;
pub use caller::Caller;
pub use config::{LoggerConfig, Mode};
pub use error::LoggerError;
pub use field::{FieldKind, TypedField, TypedLogger};
pub use level::{Level, LevelMapping};
pub use logger::Logger;
pub use sink::Output;
pub use tracing_adapter::TracingLogger;
