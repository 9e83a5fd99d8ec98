//! Backups live next to the live file as `<stem>-<timestamp><ext>`, optionally `.gz`.
//! The timestamp sorts lexically, which keeps `ls` output in rotation order.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
pub(super) const COMPRESS_SUFFIX: &str = ".gz";

/// Splits the live file name once so every backup name is derived the same way.
#[derive(Debug, Clone)]
pub(super) struct BackupNaming {
    dir: PathBuf,
    stem: String,
    ext: String,
}

/// One backup found on disk.
#[derive(Debug, Clone)]
pub(super) struct Backup {
    pub path: PathBuf,
    pub rotated_at: NaiveDateTime,
    pub compressed: bool,
}

impl BackupNaming {
    pub fn new(live: &Path) -> Self {
        let dir = live
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let file_name = live
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = live
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let stem = file_name[..file_name.len() - ext.len()].to_string();

        Self { dir, stem, ext }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, rotated_at: NaiveDateTime) -> PathBuf {
        self.dir.join(format!(
            "{}-{}{}",
            self.stem,
            rotated_at.format(TIMESTAMP_FORMAT),
            self.ext
        ))
    }

    /// Recognises both plain and compressed backups of this live file.
    pub fn parse(&self, file_name: &str) -> Option<(NaiveDateTime, bool)> {
        let (name, compressed) = file_name
            .strip_suffix(COMPRESS_SUFFIX)
            .map_or((file_name, false), |n| (n, true));
        let ts = name
            .strip_prefix(&self.stem)?
            .strip_prefix('-')?
            .strip_suffix(self.ext.as_str())?;
        NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT)
            .ok()
            .map(|at| (at, compressed))
    }

    /// Newest first.
    pub fn scan(&self) -> std::io::Result<Vec<Backup>> {
        let mut backups = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some((rotated_at, compressed)) = self.parse(name) {
                backups.push(Backup {
                    path: entry.path(),
                    rotated_at,
                    compressed,
                });
            }
        }
        backups.sort_by(|a, b| b.rotated_at.cmp(&a.rotated_at));
        Ok(backups)
    }
}
