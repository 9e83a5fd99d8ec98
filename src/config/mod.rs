//! TOML configuration loading, `source = "..."` include resolution, environment overrides,
//! and conversion into a typed [`LoggerConfig`].
//!
//! Includes are merged at the table level before deserialization: a key set in the including
//! file wins over the same key in an included one, and sections merge key by key.

mod structs;

pub use structs::{ConsoleConfig, FileConfig, GeneralConfig, RotationConfig};

use crate::Error;
use crate::internal;
use crate::level::Level;
use crate::logger::{ENV_FILE_PATH, ENV_LEVEL_INFO, ENV_NOT_STDOUT, LoggerConfig};
use crate::rotation::{RotationSchedule, SizeOptions, WriterOptions};
use crate::units::{parse_bool, parse_duration, parse_size};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// An empty file is a valid config: every section and field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub console: ConsoleConfig,
    pub file: FileConfig,
    pub rotation: RotationConfig,
}

/// Splits `source = "..."` lines out of raw TOML, since they are not TOML keys we can
/// deserialize. Returns the include paths and the remaining content.
#[doc(hidden)]
#[must_use]
pub fn extract_sources(content: &str) -> (Vec<String>, String) {
    let mut sources = Vec::new();
    let mut remaining = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(value) = trimmed
            .strip_prefix("source")
            .and_then(|rest| rest.trim_start().strip_prefix('='))
        {
            let path = value.trim().trim_matches('"').trim_matches('\'');
            if !path.is_empty() {
                sources.push(path.to_string());
            }
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }

    (sources, remaining)
}

/// Copies keys from `include` that `primary` does not set, descending into sub-tables.
fn merge_tables(primary: &mut toml::Table, include: toml::Table) {
    for (key, value) in include {
        if let Some(existing) = primary.get_mut(&key) {
            if let (toml::Value::Table(ours), toml::Value::Table(theirs)) = (existing, value) {
                merge_tables(ours, theirs);
            }
        } else {
            primary.insert(key, value);
        }
    }
}

impl Config {
    /// Loads the default config file with includes resolved. A missing file yields defaults.
    ///
    /// # Errors
    /// No config directory on this platform, unreadable files, TOML syntax errors, or
    /// cyclic includes.
    pub fn load() -> Result<Self, Error> {
        internal::debug("CONFIG", "Loading config from default location");
        let path = Self::get_config_path()?;
        let config = Self::load_from(&path)?;
        internal::info("CONFIG", &format!("Config loaded from {}", path.display()));
        Ok(config)
    }

    /// # Errors
    /// Unreadable files, TOML syntax errors, or cyclic includes.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let table = Self::load_with_sources(path, &mut HashSet::new())?;
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Parses TOML content directly. `source` lines are ignored.
    ///
    /// # Errors
    /// TOML syntax or type errors.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let (_, content) = extract_sources(content);
        Ok(toml::from_str(&content)?)
    }

    fn load_with_sources(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<toml::Table, Error> {
        if !path.exists() {
            internal::debug(
                "CONFIG",
                &format!("{} not found, using defaults", path.display()),
            );
            return Ok(toml::Table::new());
        }

        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !seen.insert(canonical.clone()) {
            internal::warn(
                "CONFIG",
                &format!("Cyclic include detected: {}", canonical.display()),
            );
            return Err(Error::CyclicInclude(canonical));
        }

        let content = fs::read_to_string(path)?;
        let (sources, toml_content) = extract_sources(&content);
        let mut table: toml::Table = toml_content.parse()?;

        for source in sources {
            internal::debug("CONFIG", &format!("Processing source: {source}"));
            let expanded = shellexpand::tilde(&source);
            let mut source_file = PathBuf::from(expanded.as_ref());
            if source_file.is_relative()
                && let Some(parent) = path.parent()
            {
                source_file = parent.join(source_file);
            }
            if source_file.exists() {
                let included = Self::load_with_sources(&source_file, seen)?;
                merge_tables(&mut table, included);
            } else {
                internal::warn("CONFIG", &format!("Source file not found: {source}"));
            }
        }

        seen.remove(&canonical);
        Ok(table)
    }

    /// `<config dir>/rotalog/rotalog.toml`, e.g. `~/.config/rotalog/rotalog.toml` on Linux.
    ///
    /// # Errors
    /// The platform has no config directory.
    pub fn get_config_path() -> Result<PathBuf, Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("rotalog").join("rotalog.toml"))
            .ok_or(Error::ConfigDirNotFound)
    }

    /// Applies `LOG_FILE_PATH`, `LOG_LEVEL_INFO` and `LOG_NOT_STDOUT` from the process
    /// environment on top of the file values.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with any variable source. Flags only ever
    /// switch behaviour on; an unset or false flag leaves the file value alone.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let flag = |key: &str| lookup(key).and_then(|v| parse_bool(&v)).unwrap_or(false);

        if let Some(path) = lookup(ENV_FILE_PATH) {
            internal::debug("CONFIG", &format!("{ENV_FILE_PATH} overrides file path"));
            self.file.path = path;
        }
        if flag(ENV_LEVEL_INFO) {
            self.general.level = Level::Info;
        }
        if flag(ENV_NOT_STDOUT) {
            self.console.enabled = false;
        }
    }

    /// Validates the string-typed fields and produces the logger's input.
    ///
    /// # Errors
    /// [`Error::InvalidDuration`], [`Error::InvalidSize`] or [`Error::InvalidInterval`].
    pub fn to_logger_config(&self) -> Result<LoggerConfig, Error> {
        let interval = parse_duration(&self.rotation.interval)
            .ok_or_else(|| Error::InvalidDuration(self.rotation.interval.clone()))?;
        let phase_offset = parse_duration(&self.rotation.phase_offset)
            .ok_or_else(|| Error::InvalidDuration(self.rotation.phase_offset.clone()))?;
        let max_size = parse_size(&self.file.max_size)
            .filter(|&n| n > 0)
            .ok_or_else(|| Error::InvalidSize(self.file.max_size.clone()))?;

        let file_path = if self.file.path.is_empty() {
            PathBuf::new()
        } else {
            PathBuf::from(shellexpand::tilde(&self.file.path).as_ref())
        };

        Ok(LoggerConfig {
            file_path,
            min_level: self.general.level,
            duplicate_to_console: self.console.enabled,
            schedule: RotationSchedule::new(interval, phase_offset)?,
            writer: WriterOptions {
                size: SizeOptions {
                    max_size,
                    max_age_days: (self.file.max_age_days > 0).then_some(self.file.max_age_days),
                    max_backups: (self.file.max_backups > 0).then_some(self.file.max_backups),
                    compress: self.file.compress,
                    local_time: self.file.local_time,
                },
                rotate_on_open: self.rotation.rotate_on_open,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn extract_sources_strips_directives() {
        let (sources, rest) = extract_sources("source = \"~/a.toml\"\n[general]\nlevel = \"info\"\n");
        assert_eq!(sources, vec!["~/a.toml"]);
        assert!(!rest.contains("source"));
        assert!(rest.contains("level"));
    }

    #[test]
    fn keys_named_like_source_are_not_directives() {
        let (sources, _) = extract_sources("sources_dir = 1\n");
        assert!(sources.is_empty());
    }

    #[test]
    fn merge_prefers_primary() {
        let mut primary: toml::Table = "[file]\npath = \"a.log\"\n".parse().unwrap();
        let include: toml::Table = "[file]\npath = \"b.log\"\ncompress = true\n"
            .parse()
            .unwrap();
        merge_tables(&mut primary, include);

        let config: Config = toml::Value::Table(primary).try_into().unwrap();
        assert_eq!(config.file.path, "a.log");
        assert!(config.file.compress);
    }

    #[test]
    fn defaults_convert() {
        let logger = Config::default().to_logger_config().unwrap();
        assert_eq!(logger, LoggerConfig::default());
    }

    #[test]
    fn rotation_section_converts() {
        let config = Config::parse(
            "[rotation]\ninterval = \"200ms\"\nphase_offset = \"50ms\"\nrotate_on_open = false\n\
             [file]\npath = \"/tmp/x.log\"\nmax_size = \"1K\"\nmax_backups = 3\nmax_age_days = 0\n",
        )
        .unwrap();
        let logger = config.to_logger_config().unwrap();

        assert_eq!(logger.schedule.interval(), TimeDelta::milliseconds(200));
        assert_eq!(logger.schedule.phase_offset(), TimeDelta::milliseconds(50));
        assert!(!logger.writer.rotate_on_open);
        assert_eq!(logger.writer.size.max_size, 1024);
        assert_eq!(logger.writer.size.max_backups, Some(3));
        assert_eq!(logger.writer.size.max_age_days, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut config = Config::default();
        config.rotation.interval = "0s".into();
        assert!(matches!(
            config.to_logger_config(),
            Err(Error::InvalidInterval(_))
        ));

        config.rotation.interval = "200000000d".into();
        assert!(matches!(
            config.to_logger_config(),
            Err(Error::InvalidInterval(_))
        ));

        config.rotation.interval = "soon".into();
        assert!(matches!(
            config.to_logger_config(),
            Err(Error::InvalidDuration(_))
        ));

        let mut config = Config::default();
        config.file.max_size = "lots".into();
        assert!(matches!(config.to_logger_config(), Err(Error::InvalidSize(_))));
    }

    #[test]
    fn env_overrides() {
        let mut config = Config::default();
        config.apply_vars(|key| match key {
            ENV_FILE_PATH => Some("/var/log/app.log".into()),
            ENV_LEVEL_INFO => Some("T".into()),
            ENV_NOT_STDOUT => Some("no".into()),
            _ => None,
        });
        assert_eq!(config.file.path, "/var/log/app.log");
        assert_eq!(config.general.level, Level::Info);
        assert!(config.console.enabled);
    }

    #[test]
    fn unknown_level_is_a_parse_error() {
        assert!(matches!(
            Config::parse("[general]\nlevel = \"loud\"\n"),
            Err(Error::ConfigParse(_))
        ));
    }
}
