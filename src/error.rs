//! Unified error type for all rotalog operations.

use crate::sink::SinkFailure;
use std::path::PathBuf;

/// Error type for rotalog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error opening or appending to a sink.
    Io(std::io::Error),
    /// The time-triggered rotation of the backing file failed.
    Rotation(std::io::Error),
    /// The writer was closed; its file handle has been released.
    WriterClosed,
    /// A single record is larger than the size-rotation threshold.
    WriteTooLarge { len: u64, max: u64 },
    /// One or more sinks behind a combiner failed.
    Sinks(Vec<SinkFailure>),
    /// Rotation interval must be strictly positive.
    InvalidInterval(String),
    /// Duration string could not be parsed.
    InvalidDuration(String),
    /// Size string could not be parsed.
    InvalidSize(String),
    /// Unknown log level string.
    InvalidLevel(String),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// Cyclic include detected in config sources.
    CyclicInclude(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Rotation(e) => write!(f, "rotation failed: {e}"),
            Self::WriterClosed => write!(f, "writer closed"),
            Self::WriteTooLarge { len, max } => {
                write!(f, "write length {len} exceeds maximum file size {max}")
            }
            Self::Sinks(failures) => {
                write!(f, "{} sink(s) failed: ", failures.len())?;
                for (i, failure) in failures.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{failure}")?;
                }
                Ok(())
            }
            Self::InvalidInterval(s) => write!(f, "invalid rotation interval: {s}"),
            Self::InvalidDuration(s) => write!(f, "invalid duration: {s}"),
            Self::InvalidSize(s) => write!(f, "invalid size: {s}"),
            Self::InvalidLevel(s) => write!(f, "invalid level: {s}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::CyclicInclude(p) => write!(f, "cyclic include: {}", p.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::Rotation(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
