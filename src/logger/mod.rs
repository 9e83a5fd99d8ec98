//! The leveled facade. A `Logger` filters by severity, encodes the record once, and hands the
//! same bytes to every sink through a [`SinkCombiner`].
//!
//! Loggers are immutable after build. Reconfiguration builds a new one; see
//! [`LoggerRegistry`](crate::LoggerRegistry).

mod builder;
mod from_config;

pub use builder::{ConsoleBuilder, FileBuilder, LoggerBuilder};
pub use from_config::{ENV_FILE_PATH, ENV_LEVEL_INFO, ENV_NOT_STDOUT, LoggerConfig};

use crate::Error;
use crate::fmt::Encoder;
use crate::level::Level;
use crate::rotation::RotatingWriter;
use crate::sink::{Sink, SinkCombiner};
use std::panic::Location;
use std::sync::Arc;

/// Immutable after build, so one instance can be shared by every thread.
#[derive(Debug, Default)]
pub struct Logger {
    min_level: Level,
    encoder: Encoder,
    sinks: SinkCombiner,
    rotators: Vec<Arc<RotatingWriter>>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Sends pre-encoded bytes to every sink if `level` passes the threshold.
    ///
    /// # Errors
    /// [`Error::Sinks`] naming every sink that failed.
    pub fn write(&self, level: Level, formatted: &[u8]) -> Result<(), Error> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.sinks.write(formatted)
    }

    /// Encodes `msg` with the caller's location and writes it.
    ///
    /// # Errors
    /// [`Error::Sinks`] naming every sink that failed.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str) -> Result<(), Error> {
        if !self.enabled(level) {
            return Ok(());
        }
        let line = self.encoder.encode(level, Some(Location::caller()), msg);
        self.sinks.write(&line)
    }

    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    #[track_caller]
    pub fn trace(&self, msg: &str) {
        report(self.log(Level::Trace, msg));
    }

    #[track_caller]
    pub fn debug(&self, msg: &str) {
        report(self.log(Level::Debug, msg));
    }

    #[track_caller]
    pub fn info(&self, msg: &str) {
        report(self.log(Level::Info, msg));
    }

    #[track_caller]
    pub fn warn(&self, msg: &str) {
        report(self.log(Level::Warn, msg));
    }

    #[track_caller]
    pub fn error(&self, msg: &str) {
        report(self.log(Level::Error, msg));
    }

    /// Logs at info only when `cond` holds.
    #[track_caller]
    pub fn cond(&self, cond: bool, msg: &str) {
        if cond {
            report(self.log(Level::Info, msg));
        }
    }

    /// Info record that bypasses the level threshold; for output the user asked for.
    #[track_caller]
    pub fn print(&self, msg: &str) {
        let line = self
            .encoder
            .encode(Level::Info, Some(Location::caller()), msg);
        report(self.sinks.write(&line));
    }

    /// Logs, flushes, and exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str) -> ! {
        let line = self
            .encoder
            .encode(Level::Fatal, Some(Location::caller()), msg);
        report(self.sinks.write(&line));
        report(self.flush());
        std::process::exit(1);
    }

    /// Pushes buffered output to every sink. Never rotates or closes.
    ///
    /// # Errors
    /// [`Error::Sinks`] naming every sink that failed.
    pub fn flush(&self) -> Result<(), Error> {
        self.sinks.flush()
    }

    /// Flushes, then releases every rotating file this logger owns. Writes through this
    /// logger to those files fail with [`Error::WriterClosed`] afterwards.
    ///
    /// Every rotator is closed even when an earlier one fails.
    ///
    /// # Errors
    /// The flush failure, or else the first close failure.
    pub fn close(&self) -> Result<(), Error> {
        let flushed = self.flush();
        let closed = self
            .rotators
            .iter()
            .map(|rotator| rotator.close())
            .fold(Ok(()), Result::and);
        flushed.and(closed)
    }

    #[must_use]
    pub const fn min_level(&self) -> Level {
        self.min_level
    }

    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.names()
    }

    /// Rotating files owned by this logger, in registration order.
    #[must_use]
    pub fn rotators(&self) -> &[Arc<RotatingWriter>] {
        &self.rotators
    }
}

/// The leveled helpers have no error channel; failures go to stderr like any other
/// last-resort diagnostic.
fn report(result: Result<(), Error>) {
    if let Err(e) = result {
        eprintln!("rotalog: {e}");
    }
}
