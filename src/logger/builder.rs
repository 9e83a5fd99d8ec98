//! Stepwise construction. Each sink kind gets a sub-builder for its own options and
//! `done()` returns to the parent, so outputs chain in the order they should be written.

use super::Logger;
use crate::Error;
use crate::fmt::Encoder;
use crate::level::Level;
use crate::rotation::{Clock, RotatingWriter, RotationSchedule, SystemClock, WriterOptions};
use crate::sink::{ConsoleSink, ConsoleStream, Sink, SinkCombiner};
use chrono::TimeDelta;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Default)]
pub struct LoggerBuilder {
    pub(super) min_level: Level,
    pub(super) encoder: Encoder,
    pub(super) sinks: SinkCombiner,
    pub(super) rotators: Vec<Arc<RotatingWriter>>,
    /// First failure from a sub-builder, reported by `build`.
    pub(super) error: Option<Error>,
}

impl LoggerBuilder {
    /// Debug and up, no sinks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Record layout shared by all sinks.
    #[must_use]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    #[must_use]
    pub fn console(self) -> ConsoleBuilder {
        ConsoleBuilder {
            parent: self,
            stream: ConsoleStream::Stdout,
        }
    }

    /// Rotating file at `path`. The file is opened when the sub-builder is `done()`.
    #[must_use]
    pub fn file(self, path: impl Into<PathBuf>) -> FileBuilder {
        FileBuilder {
            parent: self,
            path: path.into(),
            interval: RotationSchedule::daily().interval(),
            phase_offset: TimeDelta::zero(),
            options: WriterOptions::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Any other destination.
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(sink);
        self
    }

    /// # Errors
    /// The first failure from a file sub-builder: invalid interval or an unopenable path.
    pub fn build(self) -> Result<Logger, Error> {
        if let Some(error) = self.error {
            for rotator in &self.rotators {
                let _ = rotator.close();
            }
            return Err(error);
        }
        Ok(Logger {
            min_level: self.min_level,
            encoder: self.encoder,
            sinks: self.sinks,
            rotators: self.rotators,
        })
    }
}

pub struct ConsoleBuilder {
    parent: LoggerBuilder,
    stream: ConsoleStream,
}

impl ConsoleBuilder {
    #[must_use]
    pub const fn stderr(mut self) -> Self {
        self.stream = ConsoleStream::Stderr;
        self
    }

    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        let sink = match self.stream {
            ConsoleStream::Stdout => ConsoleSink::stdout(),
            ConsoleStream::Stderr => ConsoleSink::stderr(),
        };
        self.parent.sinks.push(sink);
        self.parent
    }
}

pub struct FileBuilder {
    parent: LoggerBuilder,
    path: PathBuf,
    interval: TimeDelta,
    phase_offset: TimeDelta,
    options: WriterOptions,
    clock: Arc<dyn Clock>,
}

impl FileBuilder {
    #[must_use]
    pub const fn interval(mut self, interval: TimeDelta) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn phase_offset(mut self, offset: TimeDelta) -> Self {
        self.phase_offset = offset;
        self
    }

    #[must_use]
    pub const fn schedule(mut self, schedule: RotationSchedule) -> Self {
        self.interval = schedule.interval();
        self.phase_offset = schedule.phase_offset();
        self
    }

    #[must_use]
    pub fn options(mut self, options: WriterOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn max_size(mut self, bytes: u64) -> Self {
        self.options.size.max_size = bytes;
        self
    }

    #[must_use]
    pub const fn max_age_days(mut self, days: Option<u32>) -> Self {
        self.options.size.max_age_days = days;
        self
    }

    #[must_use]
    pub const fn max_backups(mut self, count: Option<usize>) -> Self {
        self.options.size.max_backups = count;
        self
    }

    #[must_use]
    pub const fn compress(mut self, compress: bool) -> Self {
        self.options.size.compress = compress;
        self
    }

    #[must_use]
    pub const fn local_time(mut self, local_time: bool) -> Self {
        self.options.size.local_time = local_time;
        self
    }

    #[must_use]
    pub const fn rotate_on_open(mut self, rotate: bool) -> Self {
        self.options.rotate_on_open = rotate;
        self
    }

    /// Time source for scheduled rotation; tests pass a [`ManualClock`](crate::rotation::ManualClock).
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Opens the writer. A failure is held until [`LoggerBuilder::build`].
    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        if self.parent.error.is_some() {
            return self.parent;
        }

        let opened = RotationSchedule::new(self.interval, self.phase_offset).and_then(|schedule| {
            RotatingWriter::open_with_clock(self.path, schedule, self.options, self.clock)
        });
        match opened {
            Ok(writer) => {
                let writer = Arc::new(writer);
                self.parent.sinks.push(Arc::clone(&writer));
                self.parent.rotators.push(writer);
            }
            Err(e) => self.parent.error = Some(e),
        }
        self.parent
    }
}
