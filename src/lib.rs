//! `rotalog` - leveled logging with size- and time-aligned file rotation.
//!
//! - [`RotatingWriter`] rotates its file at wall-clock boundaries (`interval` shifted by a
//!   phase offset) and whenever it outgrows its size threshold. Concurrent writers racing a
//!   boundary cause exactly one rotation, and no record straddles two files.
//! - [`SinkCombiner`] fans one encoded record out to several sinks and reports every failure.
//! - [`LoggerRegistry`] holds the active [`Logger`] and swaps it atomically on `configure`.
//!
//! # Example
//!
//! ```no_run
//! use rotalog::{Level, LoggerConfig, LoggerRegistry, RotationSchedule};
//! use chrono::TimeDelta;
//!
//! let schedule = RotationSchedule::new(TimeDelta::hours(24), TimeDelta::hours(17))?;
//! let registry = LoggerRegistry::new(
//!     &LoggerConfig::file("/var/log/app.log")
//!         .with_level(Level::Info)
//!         .with_schedule(schedule),
//! )?;
//!
//! registry.current().info("service started");
//! registry.flush()?;
//! # Ok::<(), rotalog::Error>(())
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `rotalog` binary

pub mod config;
mod error;
pub mod fmt;
pub mod global;
pub mod internal;
pub mod level;
pub mod logger;
pub mod registry;
pub mod rotation;
pub mod sink;
pub mod units;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::Config;
pub use error::Error;
pub use fmt::{Encoder, FormatTemplate};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder, LoggerConfig};
pub use registry::LoggerRegistry;
pub use rotation::{
    Clock, ManualClock, RotatingWriter, RotationSchedule, SizeOptions, SizeRotatingFile,
    SystemClock, WriterOptions, boundary,
};
pub use sink::{ConsoleSink, Sink, SinkCombiner, SinkFailure};
pub use units::{format_duration, format_size, parse_duration, parse_size};
