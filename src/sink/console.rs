//! Console output. Each record is written under the stream lock so lines from different
//! threads never interleave mid-record.

use super::Sink;
use std::io::{self, Write};

/// Which standard stream a [`ConsoleSink`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    #[must_use]
    pub const fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<(), crate::Error> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().lock().write_all(bytes)?,
            ConsoleStream::Stderr => io::stderr().lock().write_all(bytes)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush()?,
            ConsoleStream::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}
