//! The live log file plus its size threshold. Appends are serialized by an internal mutex
//! so each record lands as one contiguous `write_all`.

use super::backup::BackupNaming;
use super::retention::{self, RetentionPolicy};
use crate::units::format_size;
use crate::{Error, internal};
use chrono::{Local, NaiveDateTime, TimeDelta, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 100 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;
/// About a month of daily backups.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 32;

/// Size threshold and retention for one live file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeOptions {
    /// Rotate before a write would push the live file past this many bytes.
    pub max_size: u64,
    /// Backups older than this are removed after a rotation.
    pub max_age_days: Option<u32>,
    /// At most this many backups survive a rotation, newest first.
    pub max_backups: Option<usize>,
    /// Gzip surviving backups.
    pub compress: bool,
    /// Stamp backup names in local time instead of UTC.
    pub local_time: bool,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_age_days: Some(DEFAULT_MAX_AGE_DAYS),
            max_backups: None,
            compress: false,
            local_time: false,
        }
    }
}

impl SizeOptions {
    fn retention(&self) -> RetentionPolicy {
        RetentionPolicy {
            max_backups: self.max_backups,
            max_age: self.max_age_days.map(|d| TimeDelta::days(i64::from(d))),
            compress: self.compress,
        }
    }
}

#[derive(Debug, Default)]
struct LiveFile {
    file: Option<File>,
    size: u64,
    /// Stamp of the last backup this handle created. Backup names only move forward.
    last_backup: Option<NaiveDateTime>,
}

/// A file that moves itself aside to `<stem>-<timestamp><ext>` once it grows past
/// `max_size`, or whenever [`rotate`](Self::rotate) is called.
///
/// The file is opened lazily on first write unless [`open`](Self::open) is called first.
#[derive(Debug)]
pub struct SizeRotatingFile {
    path: PathBuf,
    naming: BackupNaming,
    options: SizeOptions,
    live: Mutex<LiveFile>,
}

impl SizeRotatingFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, options: SizeOptions) -> Self {
        let path = path.into();
        let naming = BackupNaming::new(&path);
        Self {
            path,
            naming,
            options,
            live: Mutex::new(LiveFile::default()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn options(&self) -> &SizeOptions {
        &self.options
    }

    /// Bytes in the live file as tracked by this handle.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.lock().size
    }

    /// Opens the live file now instead of on first write, so path problems surface early.
    ///
    /// # Errors
    /// Directory creation or open failures.
    pub fn open(&self) -> io::Result<()> {
        let mut live = self.lock();
        if live.file.is_none() {
            self.open_existing_or_new(&mut live, 0)?;
        }
        Ok(())
    }

    /// Appends `bytes` as one record, rotating first if it would not fit.
    ///
    /// # Errors
    /// [`Error::WriteTooLarge`] if the record alone exceeds `max_size`; I/O failures otherwise.
    pub fn write(&self, bytes: &[u8]) -> Result<usize, Error> {
        let len = bytes.len() as u64;
        if len > self.options.max_size {
            return Err(Error::WriteTooLarge {
                len,
                max: self.options.max_size,
            });
        }

        let mut live = self.lock();
        if live.file.is_none() {
            self.open_existing_or_new(&mut live, len)?;
        }
        if live.size + len > self.options.max_size {
            internal::debug(
                "ROTATE",
                &format!(
                    "{} reached {}, rotating",
                    self.path.display(),
                    format_size(live.size)
                ),
            );
            self.rotate_locked(&mut live)?;
        }

        let Some(file) = live.file.as_mut() else {
            return Err(Error::WriterClosed);
        };
        file.write_all(bytes)?;
        live.size += len;
        Ok(bytes.len())
    }

    /// Moves the live file aside (if it exists) and starts a new one, then applies retention.
    ///
    /// # Errors
    /// Rename or create failures. Retention problems are only reported as diagnostics.
    pub fn rotate(&self) -> io::Result<()> {
        let mut live = self.lock();
        self.rotate_locked(&mut live)
    }

    /// # Errors
    /// Propagates the flush failure of the live file.
    pub fn flush(&self) -> io::Result<()> {
        let mut live = self.lock();
        match live.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Releases the file handle. A later write reopens the live file.
    ///
    /// # Errors
    /// Propagates the final flush failure.
    pub fn close(&self) -> io::Result<()> {
        let mut live = self.lock();
        let result = live.file.as_mut().map_or(Ok(()), Write::flush);
        live.file = None;
        result
    }

    fn lock(&self) -> MutexGuard<'_, LiveFile> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> NaiveDateTime {
        if self.options.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }

    fn open_existing_or_new(&self, live: &mut LiveFile, write_len: u64) -> io::Result<()> {
        let existing = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.open_new(live),
            Err(e) => return Err(e),
        };

        if existing + write_len > self.options.max_size {
            return self.rotate_locked(live);
        }

        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => {
                live.file = Some(file);
                live.size = existing;
                Ok(())
            }
            Err(e) => {
                internal::warn(
                    "ROTATE",
                    &format!("Reopening {} failed ({e}), starting fresh", self.path.display()),
                );
                self.open_new(live)
            }
        }
    }

    fn open_new(&self, live: &mut LiveFile) -> io::Result<()> {
        fs::create_dir_all(self.naming.dir())?;

        if self.path.exists() {
            let backup = self.free_backup_path(live);
            fs::rename(&self.path, &backup)?;
            internal::debug(
                "ROTATE",
                &format!("{} -> {}", self.path.display(), backup.display()),
            );
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        live.file = Some(file);
        live.size = 0;
        Ok(())
    }

    /// Picks a name later than every backup this handle made before, so name order stays
    /// rotation order even when several rotations share a millisecond.
    fn free_backup_path(&self, live: &mut LiveFile) -> PathBuf {
        let step = TimeDelta::milliseconds(1);
        let mut at = self.now();
        if let Some(last) = live.last_backup {
            at = at.max(last + step);
        }
        loop {
            let candidate = self.naming.path_for(at);
            if !candidate.exists() {
                live.last_backup = Some(at);
                return candidate;
            }
            at += step;
        }
    }

    fn rotate_locked(&self, live: &mut LiveFile) -> io::Result<()> {
        if let Some(mut file) = live.file.take() {
            file.flush()?;
        }
        self.open_new(live)?;
        self.apply_retention();
        Ok(())
    }

    fn apply_retention(&self) {
        match retention::enforce(&self.naming, self.options.retention(), self.now()) {
            Ok(report) => {
                if !report.removed.is_empty() || !report.compressed.is_empty() {
                    internal::debug(
                        "RETENTION",
                        &format!(
                            "{}: removed {}, compressed {}",
                            self.path.display(),
                            report.removed.len(),
                            report.compressed.len()
                        ),
                    );
                }
                for (path, reason) in report.failed {
                    internal::warn(
                        "RETENTION",
                        &format!("Could not process {}: {reason}", path.display()),
                    );
                }
            }
            Err(e) => internal::warn(
                "RETENTION",
                &format!("Scanning {} failed: {e}", self.naming.dir().display()),
            ),
        }
    }
}
