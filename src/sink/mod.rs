//! Destinations for encoded records. The console and the rotating file are the built-in
//! ones; the `Sink` trait lets callers plug in others without touching the logger.

mod combiner;
mod console;

pub use combiner::{SinkCombiner, SinkFailure};
pub use console::{ConsoleSink, ConsoleStream};

/// `Send + Sync` so one sink can serve every thread that logs.
pub trait Sink: Send + Sync {
    /// Identifies the sink in aggregated errors.
    fn name(&self) -> &str;

    /// Appends one already-encoded record.
    ///
    /// # Errors
    /// Whatever the destination reports.
    fn write(&self, bytes: &[u8]) -> Result<(), crate::Error>;

    /// Pushes buffered bytes to the destination. Must be safe to call repeatedly.
    ///
    /// # Errors
    /// Whatever the destination reports.
    fn flush(&self) -> Result<(), crate::Error>;
}

impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), crate::Error> {
        (**self).write(bytes)
    }

    fn flush(&self) -> Result<(), crate::Error> {
        (**self).flush()
    }
}
