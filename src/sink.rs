use crate::error::LoggerError;
use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Destination for emitted records, as supplied by the application.
///
/// Opening is the only fallible step: a [`Output::File`] whose parent
/// directory is missing or unwritable fails before any adapter state is
/// touched.
pub enum Output {
    Stdout,
    Stderr,
    /// Created if missing, appended to otherwise.
    File(PathBuf),
    /// Any byte sink owned by the caller.
    Writer(Box<dyn Write + Send>),
}

impl Output {
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Output::Writer(Box::new(writer))
    }

    fn describe(&self) -> String {
        match self {
            Output::Stdout => "stdout".to_string(),
            Output::Stderr => "stderr".to_string(),
            Output::File(path) => path.display().to_string(),
            Output::Writer(_) => "writer".to_string(),
        }
    }

    /// Open the output into a shareable [`Sink`].
    pub fn open(self) -> Result<Sink, LoggerError> {
        let target = self.describe();
        let writer: Box<dyn Write + Send> = match self {
            Output::Stdout => Box::new(io::stdout()),
            Output::Stderr => Box::new(io::stderr()),
            Output::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|source| LoggerError::Output {
                        target: target.clone(),
                        source,
                    })?;
                Box::new(file)
            }
            Output::Writer(writer) => writer,
        };
        Ok(Sink {
            target: Arc::from(target),
            inner: Arc::new(Mutex::new(writer)),
        })
    }
}

impl Default for Output {
    fn default() -> Self {
        Output::Stderr
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::File(path) => f.debug_tuple("File").field(path).finish(),
            Output::Writer(_) => f.write_str("Writer(..)"),
            other => f.write_str(&other.describe()),
        }
    }
}

/// Opened, cloneable handle to an output.
///
/// Every record is handed over as one buffer and written with a single
/// `write_all` under the lock, so concurrent records never interleave.
#[derive(Clone)]
pub struct Sink {
    target: Arc<str>,
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Write one fully encoded record.
    pub fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(record)
    }

    /// Flush anything the underlying writer buffers.
    pub fn sync(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("target", &self.target).finish()
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_record(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync()
    }
}
