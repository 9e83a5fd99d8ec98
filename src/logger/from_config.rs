//! Typed logger configuration and the environment defaults it is usually built from.

use super::{Logger, LoggerBuilder};
use crate::Error;
use crate::internal;
use crate::level::Level;
use crate::rotation::{RotationSchedule, WriterOptions};
use crate::units::parse_bool;
use std::path::PathBuf;

/// Target file; unset or empty means console only.
pub const ENV_FILE_PATH: &str = "LOG_FILE_PATH";
/// True raises the threshold from debug to info.
pub const ENV_LEVEL_INFO: &str = "LOG_LEVEL_INFO";
/// True stops console duplication while a file is configured.
pub const ENV_NOT_STDOUT: &str = "LOG_NOT_STDOUT";

/// Everything needed to build a [`Logger`]. A value type: reconfiguring means building a
/// new logger from a new `LoggerConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Empty means console only.
    pub file_path: PathBuf,
    pub min_level: Level,
    /// Also write to stdout while a file is configured. Ignored without a file.
    pub duplicate_to_console: bool,
    pub schedule: RotationSchedule,
    pub writer: WriterOptions,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::new(),
            min_level: Level::Debug,
            duplicate_to_console: true,
            schedule: RotationSchedule::daily(),
            writer: WriterOptions::default(),
        }
    }
}

impl LoggerConfig {
    /// Console only at debug.
    #[must_use]
    pub fn console() -> Self {
        Self::default()
    }

    /// Rotating file at `path`, duplicated to the console.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub const fn with_console(mut self, duplicate: bool) -> Self {
        self.duplicate_to_console = duplicate;
        self
    }

    #[must_use]
    pub const fn with_schedule(mut self, schedule: RotationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    #[must_use]
    pub fn with_writer(mut self, writer: WriterOptions) -> Self {
        self.writer = writer;
        self
    }

    #[must_use]
    pub fn has_file(&self) -> bool {
        !self.file_path.as_os_str().is_empty()
    }

    /// Defaults from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults from any variable source. Booleans that do not parse count as false.
    #[must_use]
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).and_then(|v| parse_bool(&v)).unwrap_or(false);

        let mut config = Self {
            file_path: lookup(ENV_FILE_PATH).map(PathBuf::from).unwrap_or_default(),
            ..Self::default()
        };
        if flag(ENV_LEVEL_INFO) {
            config.min_level = Level::Info;
        }
        if flag(ENV_NOT_STDOUT) {
            config.duplicate_to_console = false;
        }
        config
    }
}

impl Logger {
    /// Console first, then the rotating file, so the console still sees records the file
    /// rejects.
    ///
    /// # Errors
    /// The file could not be opened or rotated.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, Error> {
        let mut builder = LoggerBuilder::new().level(config.min_level);

        if !config.has_file() || config.duplicate_to_console {
            builder = builder.console().done();
        }
        if config.has_file() {
            builder = builder
                .file(&config.file_path)
                .schedule(config.schedule)
                .options(config.writer.clone())
                .done();
        }

        let logger = builder.build()?;
        internal::debug(
            "LOGGER",
            &format!(
                "Built logger level={} sinks=[{}]",
                logger.min_level(),
                logger.sink_names().join(", ")
            ),
        );
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_is_console_debug() {
        let config = LoggerConfig::from_vars(vars(&[]));
        assert_eq!(config, LoggerConfig::default());
        assert!(!config.has_file());
    }

    #[test]
    fn environment_flags() {
        let config = LoggerConfig::from_vars(vars(&[
            (ENV_FILE_PATH, "/var/log/app.log"),
            (ENV_LEVEL_INFO, "true"),
            (ENV_NOT_STDOUT, "1"),
        ]));
        assert_eq!(config.file_path, PathBuf::from("/var/log/app.log"));
        assert_eq!(config.min_level, Level::Info);
        assert!(!config.duplicate_to_console);
    }

    #[test]
    fn unparsable_flags_are_false() {
        let config =
            LoggerConfig::from_vars(vars(&[(ENV_LEVEL_INFO, "yes"), (ENV_NOT_STDOUT, "")]));
        assert_eq!(config.min_level, Level::Debug);
        assert!(config.duplicate_to_console);
    }

    #[test]
    fn console_only_logger() {
        let logger = Logger::from_config(&LoggerConfig::console()).unwrap();
        assert_eq!(logger.sink_names(), vec!["stdout"]);
        assert!(logger.rotators().is_empty());
    }

    #[test]
    fn file_without_console() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::from_config(&LoggerConfig::file(&path).with_console(false)).unwrap();

        assert_eq!(logger.sink_count(), 1);
        assert_eq!(logger.rotators().len(), 1);
        logger.close().unwrap();
    }
}
