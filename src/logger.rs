use crate::caller::Caller;
use crate::error::LoggerError;
use crate::field::{TypedField, TypedLogger};
use crate::level::Level;
use crate::sink::Output;

/// Backend-agnostic logging contract application code depends on.
///
/// Emission methods take a message plus typed fields built with the
/// [`TypedLogger`] constructors. A call below the current level is a
/// no-op: the adapter neither translates the fields nor allocates.
///
/// Implementations are shared across threads; reconfiguration
/// ([`set_output`](Logger::set_output), [`set_level`](Logger::set_level))
/// may run concurrently with emissions and is observed atomically.
pub trait Logger: TypedLogger + Send + Sync {
    /// Opaque value handed over at construction.
    type Context;

    /// Emit at `level`, attributed to `caller`.
    ///
    /// Wrappers that sit between the application and the logger capture
    /// the caller themselves and forward it here.
    fn log(&self, level: Level, caller: Caller, message: &str, fields: &[TypedField]);

    /// Emitted at debug severity; there is no separate trace severity
    /// in the backends.
    #[track_caller]
    fn trace(&self, message: &str, fields: &[TypedField]) {
        self.log(Level::TRACE, Caller::here(), message, fields)
    }

    #[track_caller]
    fn debug(&self, message: &str, fields: &[TypedField]) {
        self.log(Level::DEBUG, Caller::here(), message, fields)
    }

    #[track_caller]
    fn info(&self, message: &str, fields: &[TypedField]) {
        self.log(Level::INFO, Caller::here(), message, fields)
    }

    #[track_caller]
    fn warning(&self, message: &str, fields: &[TypedField]) {
        self.log(Level::WARNING, Caller::here(), message, fields)
    }

    #[track_caller]
    fn error(&self, message: &str, fields: &[TypedField]) {
        self.log(Level::ERROR, Caller::here(), message, fields)
    }

    /// Redirect all subsequent records to `output`.
    ///
    /// On error the logger keeps writing to its previous output.
    fn set_output(&self, output: Output) -> Result<(), LoggerError>;

    /// Change the minimum emitted level. Levels without a backend
    /// mapping fall back to info.
    fn set_level(&self, level: Level);

    /// Effective level, read back from the backend.
    fn level(&self) -> Level;

    fn context(&self) -> &Self::Context;
}
