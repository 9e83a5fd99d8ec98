//! Process-wide registry for call sites that do not carry a [`LoggerRegistry`] around.
//!
//! Lazily built from the environment on first use. If the environment names a file that
//! cannot be opened, the process still gets a console logger and the failure is printed
//! once to stderr.

use crate::Error;
use crate::logger::{Logger, LoggerConfig};
use crate::registry::LoggerRegistry;
use std::sync::{Arc, OnceLock};

static REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

pub fn registry() -> &'static LoggerRegistry {
    REGISTRY.get_or_init(|| {
        LoggerRegistry::from_env().unwrap_or_else(|e| {
            eprintln!("rotalog: falling back to console logging: {e}");
            LoggerRegistry::with_logger(
                Logger::from_config(&LoggerConfig::console()).unwrap_or_default(),
            )
        })
    })
}

/// # Errors
/// See [`LoggerRegistry::configure`].
pub fn configure(config: &LoggerConfig) -> Result<(), Error> {
    registry().configure(config)
}

/// # Errors
/// See [`LoggerRegistry::flush`].
pub fn flush() -> Result<(), Error> {
    registry().flush()
}

#[must_use]
pub fn current() -> Arc<Logger> {
    registry().current()
}

#[track_caller]
pub fn debug(msg: &str) {
    current().debug(msg);
}

#[track_caller]
pub fn info(msg: &str) {
    current().info(msg);
}

#[track_caller]
pub fn warn(msg: &str) {
    current().warn(msg);
}

#[track_caller]
pub fn error(msg: &str) {
    current().error(msg);
}

#[track_caller]
pub fn print(msg: &str) {
    current().print(msg);
}

#[track_caller]
pub fn cond(cond: bool, msg: &str) {
    current().cond(cond, msg);
}

#[track_caller]
pub fn fatal(msg: &str) -> ! {
    current().fatal(msg)
}
