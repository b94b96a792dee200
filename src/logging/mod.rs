//! Diagnostic logging.
//!
//! bashwrap logs through [`tracing`]. Stdout belongs to the hook protocol, so
//! [`init`] never installs a stdout writer:
//!
//! - with `debug_log` on, every event at `DEBUG` and above is written to the
//!   configured log file through a [`DiagnosticSink`];
//! - otherwise events go to stderr through [`Redacting`], filtered by
//!   `RUST_LOG` (default `warn`).
//!
//! Both writers redact secrets from every line. The file sink also keeps the
//! file bounded (see [`rotate`]).

pub mod rotate;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::policy::config::HookConfig;
use crate::redact::{PatternRedactor, Redactor};

pub use rotate::RotationLimits;

/// Install the global subscriber for this process.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(config: &HookConfig) {
    let redactor: Arc<dyn Redactor> = Arc::new(config.redactor());
    let file_sink = config
        .debug_log
        .then(|| config.effective_log_file())
        .flatten()
        .map(|path| DiagnosticSink::new(path).with_redactor(Arc::clone(&redactor)));

    match file_sink {
        Some(sink) => {
            let _ = tracing_subscriber::fmt()
                .with_max_level(LevelFilter::DEBUG)
                .with_ansi(false)
                .with_target(false)
                .with_writer(sink)
                .try_init();
        }
        None => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Redacting::new(io::stderr, redactor))
                .try_init();
        }
    }
}

/// Append-only, redacting, size-bounded log file.
///
/// Each `write` call receives one formatted event from the fmt layer.
#[derive(Clone)]
pub struct DiagnosticSink {
    path: PathBuf,
    redactor: Arc<dyn Redactor>,
    limits: RotationLimits,
}

impl DiagnosticSink {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            redactor: Arc::new(PatternRedactor::new()),
            limits: RotationLimits::default(),
        }
    }

    pub fn with_redactor(mut self, redactor: Arc<dyn Redactor>) -> Self {
        self.redactor = redactor;
        self
    }

    pub fn with_limits(mut self, limits: RotationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Redact `message`, rotate the file if it is over the limit, then append.
    pub fn append(&self, message: &[u8]) -> io::Result<()> {
        let text = String::from_utf8_lossy(message);
        let scrubbed = self.redactor.redact(&text);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        rotate::rotate_if_needed(&self.path, &self.limits)?;

        let mut file = open_append(&self.path)?;
        file.write_all(scrubbed.as_bytes())?;
        if !scrubbed.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl Write for DiagnosticSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DiagnosticSink {
    type Writer = DiagnosticSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Wraps another [`MakeWriter`] so every event is redacted before it is
/// written.
pub struct Redacting<M> {
    inner: M,
    redactor: Arc<dyn Redactor>,
}

impl<M> Redacting<M> {
    pub fn new(inner: M, redactor: Arc<dyn Redactor>) -> Self {
        Self { inner, redactor }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for Redacting<M> {
    type Writer = RedactedWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactedWriter {
            inner: self.inner.make_writer(),
            redactor: Arc::clone(&self.redactor),
        }
    }
}

/// Writer produced by [`Redacting`].
pub struct RedactedWriter<W> {
    inner: W,
    redactor: Arc<dyn Redactor>,
}

impl<W: Write> Write for RedactedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(self.redactor.redact(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(unix)]
fn open_append(path: &Path) -> io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_append(path: &Path) -> io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}
