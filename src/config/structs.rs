//! Configuration struct definitions.

use crate::level::Level;
use serde::Deserialize;

/// Threshold shared by every output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub level: Level,
}

/// Console output. With a file configured this controls duplication to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Rotating file output. An empty `path` disables it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Live file; `~` is expanded.
    pub path: String,
    /// Size threshold such as `"100M"`.
    pub max_size: String,
    /// Delete backups older than this many days; 0 keeps them forever.
    pub max_age_days: u32,
    /// Keep at most this many backups; 0 keeps all.
    pub max_backups: usize,
    /// Gzip backups after rotation.
    pub compress: bool,
    /// Stamp backup names in local time instead of UTC.
    pub local_time: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_size: "100M".to_string(),
            max_age_days: crate::rotation::DEFAULT_MAX_AGE_DAYS,
            max_backups: 0,
            compress: false,
            local_time: false,
        }
    }
}

/// Time-aligned rotation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Duration such as `"24h"` or `"200ms"`.
    pub interval: String,
    /// Shift from the epoch-aligned series, e.g. `"17h"` for local midnight at UTC+7.
    pub phase_offset: String,
    pub rotate_on_open: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            interval: "24h".to_string(),
            phase_offset: "0s".to_string(),
            rotate_on_open: true,
        }
    }
}
