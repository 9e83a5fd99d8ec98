//! Rotalog's own diagnostic logger, for config loading, rotation and retention events.
//!
//! Console only (stderr), so a diagnostic about a rotating file can never recurse into that
//! file's writer. Silent until [`init`] is called; `OnceLock` makes the first call win.

use crate::fmt::Encoder;
use crate::level::Level;
use crate::logger::Logger;
use crate::sink::ConsoleSink;
use std::sync::OnceLock;

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

const TEMPLATE: &str = "{timestamp} {level} rotalog {msg}";

/// Turns diagnostics on at `level`. Later calls are no-ops.
pub fn init(level: Level) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| {
        Logger::builder()
            .level(level)
            .encoder(Encoder::new().template(TEMPLATE).timestamp_format("%H:%M:%S%.3f"))
            .sink(ConsoleSink::stderr())
            .build()
            .unwrap_or_default()
    });
    if !was_init {
        debug("INTERNAL", &format!("Diagnostics enabled at {level}"));
    }
}

/// Pre-init calls vanish. Write failures on stderr have nowhere left to go.
fn log(level: Level, scope: &str, msg: &str) {
    if let Some(logger) = INTERNAL_LOGGER.get() {
        let _ = logger.log(level, &format!("[{scope}] {msg}"));
    }
}

pub fn trace(scope: &str, msg: &str) {
    log(Level::Trace, scope, msg);
}

/// Open, close and rotation events.
pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Failures that do not fail the caller, e.g. a retention pass that could not delete a backup.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
