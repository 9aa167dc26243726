use std::fmt;
use std::str::FromStr;

/// Neutral log severity, ordered from least to most severe.
///
/// Kept as an open newtype rather than an enum so that values coming
/// from outside (config, other layers) can be carried around and
/// normalized instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub u8);

impl Level {
    pub const TRACE: Level = Level(0);
    pub const DEBUG: Level = Level(1);
    pub const INFO: Level = Level(2);
    pub const WARNING: Level = Level(3);
    pub const ERROR: Level = Level(4);
    pub const ALERT: Level = Level(5);

    /// Parse a level name, falling back to [`Level::INFO`] for anything
    /// unrecognized.
    pub fn parse_or_info(name: &str) -> Level {
        name.parse().unwrap_or(Level::INFO)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Level::TRACE => f.write_str("trace"),
            Level::DEBUG => f.write_str("debug"),
            Level::INFO => f.write_str("info"),
            Level::WARNING => f.write_str("warn"),
            Level::ERROR => f.write_str("error"),
            Level::ALERT => f.write_str("alert"),
            Level(n) => write!(f, "Level({})", n),
        }
    }
}

/// Error returned when parsing an unknown level name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" | "warning" => Ok(Level::WARNING),
            "error" => Ok(Level::ERROR),
            "alert" => Ok(Level::ALERT),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Which neutral→backend table an adapter translates levels with.
///
/// `Strict` keeps the mapping monotonic. `Legacy` reproduces the older
/// behaviour where `Warning` gates at the backend's debug severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelMapping {
    #[default]
    Strict,
    Legacy,
}
