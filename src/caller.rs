use std::fmt;
use std::panic::Location;

/// Source location a record is attributed to.
///
/// Captured with `#[track_caller]`, so every wrapping layer that is
/// itself `#[track_caller]` is skipped automatically. Layers that cannot
/// be (closures, trait objects built elsewhere) capture a `Caller` once
/// and pass it down to [`Logger::log`](crate::logger::Logger::log).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Caller(&'static Location<'static>);

impl Caller {
    #[track_caller]
    pub fn here() -> Self {
        Caller(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Caller(location)
    }

    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    pub fn line(&self) -> u32 {
        self.0.line()
    }

    /// Last directory and file name only, e.g. `tests/adapter.rs`.
    pub fn short_file(&self) -> &'static str {
        let file = self.0.file();
        let mut separators = file.rmatch_indices(|c: char| c == '/' || c == '\\');
        match (separators.next(), separators.next()) {
            (Some(_), Some((idx, _))) => &file[idx + 1..],
            _ => file,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.short_file(), self.line())
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Caller({}:{})", self.file(), self.line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn wrapped() -> Caller {
        Caller::here()
    }

    #[test]
    fn test_here_points_at_call_site() {
        let line = line!() + 1;
        let caller = Caller::here();
        assert_eq!(caller.line(), line);
        assert!(caller.file().ends_with("caller.rs"));
    }

    #[test]
    fn test_track_caller_layers_are_skipped() {
        let line = line!() + 1;
        let caller = wrapped();
        assert_eq!(caller.line(), line);
    }

    #[test]
    fn test_short_file_keeps_parent_dir() {
        let caller = Caller::here();
        assert_eq!(caller.short_file(), "src/caller.rs");
        assert!(caller.to_string().starts_with("src/caller.rs:"));
    }
}
