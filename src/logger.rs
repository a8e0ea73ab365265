//! Pluggable sink for the facade's user-facing log messages.
//!
//! The facade reports each request line (`GET: <url>`) and every rejected
//! argument through a [`Logger`] chosen at construction time. Three implementations ship with the crate:
//!
//! - [`NoOpLogger`] discards everything (the default),
//! - [`SimpleLogger`] formats leveled lines and writes them to stderr or any writer,
//! - [`TracingLogger`] forwards to the `tracing` ecosystem unchanged.
//!
//! Internal diagnostics (attempts, retries, responses) always go to `tracing`
//! directly, whatever logger is configured.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::Level;

/// A sink for leveled log messages.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
/// use tracing::Level;
/// use valorant_api::logger::Logger;
///
/// #[derive(Default)]
/// struct Collect(Mutex<Vec<String>>);
///
/// impl Logger for Collect {
///     fn log(&self, level: Level, message: &str) {
///         self.0.lock().unwrap().push(format!("{level}: {message}"));
///     }
/// }
///
/// let logger = Collect::default();
/// logger.warn("careful");
/// assert_eq!(logger.0.lock().unwrap()[0], "WARN: careful");
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Forwards every message to `tracing` under the `valorant_api` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "valorant_api", "{}", message),
            Level::WARN => tracing::warn!(target: "valorant_api", "{}", message),
            Level::INFO => tracing::info!(target: "valorant_api", "{}", message),
            Level::DEBUG => tracing::debug!(target: "valorant_api", "{}", message),
            _ => tracing::trace!(target: "valorant_api", "{}", message),
        }
    }
}

/// Writes formatted lines at or above a minimum level.
///
/// Lines look like `WARN     Sun, 18 Oct 2026 12:00:00 GMT valorant_api: message`.
pub struct SimpleLogger {
    min_level: Level,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl SimpleLogger {
    /// Logs to stderr at `min_level` and above.
    pub fn new(min_level: Level) -> Self {
        Self::with_writer(min_level, io::stderr())
    }

    /// Logs to `writer` at `min_level` and above.
    pub fn with_writer(min_level: Level, writer: impl Write + Send + 'static) -> Self {
        Self {
            min_level,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// The least severe level that is written.
    pub fn min_level(&self) -> Level {
        self.min_level
    }
}

impl Default for SimpleLogger {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl std::fmt::Debug for SimpleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleLogger")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl Logger for SimpleLogger {
    fn log(&self, level: Level, message: &str) {
        // tracing orders levels by verbosity: ERROR < TRACE.
        if level > self.min_level {
            return;
        }

        let line = format!(
            "{:<8} {} valorant_api: {}\n",
            level.as_str(),
            httpdate::fmt_http_date(SystemTime::now()),
            message
        );

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.flush();
        }
    }
}
