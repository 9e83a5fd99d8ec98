//! Emit a single record from a shell script.

use crate::level::Level;
use crate::registry::LoggerRegistry;
use std::process::ExitCode;

#[must_use]
pub fn cmd_log(registry: &LoggerRegistry, level: Level, message: &[String]) -> ExitCode {
    let logger = registry.current();
    let result = logger
        .log(level, &message.join(" "))
        .and_then(|()| logger.flush());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rotalog log: {e}");
            ExitCode::FAILURE
        }
    }
}
