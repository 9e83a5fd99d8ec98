//! Time-aligned rotation on top of a [`SizeRotatingFile`].
//!
//! Appends share a read lock; a scheduled rotation takes the write lock, so no record can
//! straddle the old and the new file. The due-check is repeated under the write lock, which
//! makes callers racing across the same boundary produce exactly one physical rotation.

use super::clock::{Clock, SystemClock};
use super::size::{SizeOptions, SizeRotatingFile};
use super::RotationSchedule;
use crate::sink::Sink;
use crate::{Error, internal};
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Construction-time knobs for a [`RotatingWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Threshold and retention for the underlying file.
    pub size: SizeOptions,
    /// Move any existing live file aside when the writer is opened, so every writer
    /// starts on a fresh file. On by default.
    pub rotate_on_open: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            size: SizeOptions::default(),
            rotate_on_open: true,
        }
    }
}

#[derive(Debug)]
struct RotationState {
    /// Boundary of the most recent scheduled rotation. Never moves backwards.
    last_rotated_at: DateTime<Utc>,
    closed: bool,
}

/// Log sink that rotates its file on a wall-clock schedule as well as by size.
///
/// A failed scheduled rotation is returned from the write that triggered it. The boundary
/// still counts as handled, so the next attempt happens at the next boundary rather than on
/// every following write.
pub struct RotatingWriter {
    file: SizeRotatingFile,
    schedule: RotationSchedule,
    clock: Arc<dyn Clock>,
    state: RwLock<RotationState>,
    rotations: AtomicU64,
    name: String,
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("path", &self.file.path())
            .field("schedule", &self.schedule)
            .field("rotations", &self.rotation_count())
            .finish_non_exhaustive()
    }
}

impl RotatingWriter {
    /// Opens `path` with the wall clock.
    ///
    /// # Errors
    /// [`Error::Io`] when the file cannot be opened or moved aside, e.g. an unwritable
    /// directory.
    pub fn open(
        path: impl Into<PathBuf>,
        schedule: RotationSchedule,
        options: WriterOptions,
    ) -> Result<Self, Error> {
        Self::open_with_clock(path, schedule, options, Arc::new(SystemClock))
    }

    /// Opens `path` reading time from `clock`.
    ///
    /// # Errors
    /// I/O failures opening or rotating the file.
    pub fn open_with_clock(
        path: impl Into<PathBuf>,
        schedule: RotationSchedule,
        options: WriterOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        let path = path.into();
        let file = SizeRotatingFile::new(&path, options.size);

        if options.rotate_on_open {
            file.rotate()?;
        } else {
            file.open()?;
        }

        let now = clock.now();
        let last_rotated_at = schedule.boundary(now);
        internal::debug(
            "ROTATE",
            &format!(
                "Opened {} ({schedule}), next rotation at {}",
                path.display(),
                schedule.next_boundary(now).to_rfc3339()
            ),
        );

        Ok(Self {
            name: format!("file:{}", path.display()),
            file,
            schedule,
            clock,
            state: RwLock::new(RotationState {
                last_rotated_at,
                closed: false,
            }),
            rotations: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    #[must_use]
    pub const fn schedule(&self) -> RotationSchedule {
        self.schedule
    }

    /// Boundary of the most recent scheduled rotation.
    #[must_use]
    pub fn last_rotated_at(&self) -> DateTime<Utc> {
        self.read_state().last_rotated_at
    }

    /// Scheduled rotations performed since opening. Size-triggered ones are not counted.
    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.read_state().closed
    }

    /// Appends one record, rotating first when a boundary has been crossed.
    ///
    /// # Errors
    /// [`Error::Rotation`] when the scheduled rotation failed, [`Error::WriterClosed`] after
    /// [`close`](Self::close), otherwise whatever the underlying append returns.
    pub fn write(&self, bytes: &[u8]) -> Result<usize, Error> {
        self.rotate_if_due()?;

        let state = self.read_state();
        if state.closed {
            return Err(Error::WriterClosed);
        }
        self.file.write(bytes)
    }

    /// # Errors
    /// Flush failure of the live file. Flushing a closed writer is a no-op.
    pub fn flush(&self) -> Result<(), Error> {
        let state = self.read_state();
        if state.closed {
            return Ok(());
        }
        self.file.flush()?;
        Ok(())
    }

    /// Releases the file handle; subsequent writes fail with [`Error::WriterClosed`].
    /// Closing twice is a no-op.
    ///
    /// # Errors
    /// Final flush failure.
    pub fn close(&self) -> Result<(), Error> {
        let mut state = self.write_state();
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        internal::debug("ROTATE", &format!("Closing {}", self.path().display()));
        self.file.close()?;
        Ok(())
    }

    fn is_due(&self, state: &RotationState, now: DateTime<Utc>) -> bool {
        !state.closed && now - state.last_rotated_at >= self.schedule.interval()
    }

    fn rotate_if_due(&self) -> Result<(), Error> {
        let now = self.clock.now();
        if !self.is_due(&self.read_state(), now) {
            return Ok(());
        }

        let mut state = self.write_state();
        // Another caller may have rotated while we waited for the write lock.
        if !self.is_due(&state, now) {
            return Ok(());
        }
        state.last_rotated_at = self.schedule.boundary(now);

        match self.file.rotate() {
            Ok(()) => {
                self.rotations.fetch_add(1, Ordering::Relaxed);
                internal::debug(
                    "ROTATE",
                    &format!(
                        "Rotated {} at boundary {}",
                        self.path().display(),
                        state.last_rotated_at.to_rfc3339()
                    ),
                );
                Ok(())
            }
            Err(e) => {
                internal::error(
                    "ROTATE",
                    &format!("Rotating {} failed: {e}", self.path().display()),
                );
                Err(Error::Rotation(e))
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RotationState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RotationState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for RotatingWriter {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, bytes: &[u8]) -> Result<(), Error> {
        Self::write(self, bytes).map(|_| ())
    }

    fn flush(&self) -> Result<(), Error> {
        Self::flush(self)
    }
}

/// Lets a shared writer be handed to anything that takes `io::Write`.
impl io::Write for &RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::write(*self, buf).map_err(into_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        RotatingWriter::flush(*self).map_err(into_io)
    }
}

fn into_io(e: Error) -> io::Error {
    match e {
        Error::Io(e) | Error::Rotation(e) => e,
        other => io::Error::other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::ManualClock;
    use chrono::TimeDelta;
    use std::fs;
    use tempfile::TempDir;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2021-04-12T06:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn open(dir: &TempDir, clock: &Arc<ManualClock>) -> RotatingWriter {
        let schedule = RotationSchedule::new(TimeDelta::hours(24), TimeDelta::hours(7)).unwrap();
        RotatingWriter::open_with_clock(
            dir.path().join("app.log"),
            schedule,
            WriterOptions::default(),
            Arc::clone(clock) as Arc<dyn Clock>,
        )
        .unwrap()
    }

    fn file_count(dir: &TempDir) -> usize {
        fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn last_rotated_starts_at_current_boundary() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let writer = open(&dir, &clock);

        assert_eq!(
            writer.last_rotated_at(),
            DateTime::parse_from_rfc3339("2021-04-11T07:00:00Z").unwrap()
        );
    }

    #[test]
    fn crossing_boundary_rotates_once() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let writer = open(&dir, &clock);

        writer.write(b"before\n").unwrap();
        clock.advance(TimeDelta::minutes(45));
        writer.write(b"after\n").unwrap();
        writer.write(b"after again\n").unwrap();

        assert_eq!(writer.rotation_count(), 1);
        assert_eq!(file_count(&dir), 2);
        assert_eq!(
            fs::read_to_string(writer.path()).unwrap(),
            "after\nafter again\n"
        );
        assert_eq!(
            writer.last_rotated_at(),
            DateTime::parse_from_rfc3339("2021-04-12T07:00:00Z").unwrap()
        );
    }

    #[test]
    fn skipping_several_intervals_rotates_once() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let writer = open(&dir, &clock);

        clock.advance(TimeDelta::days(5));
        writer.write(b"late\n").unwrap();

        assert_eq!(writer.rotation_count(), 1);
        assert_eq!(writer.last_rotated_at(), writer.schedule().boundary(clock.now()));
    }

    #[test]
    fn clock_going_backwards_never_rewinds_state() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let writer = open(&dir, &clock);
        let before = writer.last_rotated_at();

        clock.advance(TimeDelta::days(-3));
        writer.write(b"skewed\n").unwrap();

        assert_eq!(writer.last_rotated_at(), before);
        assert_eq!(writer.rotation_count(), 0);
    }

    #[test]
    fn rotate_on_open_moves_previous_file_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old run\n").unwrap();

        let writer =
            RotatingWriter::open(&path, RotationSchedule::daily(), WriterOptions::default())
                .unwrap();
        writer.write(b"new run\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new run\n");
        assert_eq!(file_count(&dir), 2);
    }

    #[test]
    fn without_rotate_on_open_previous_file_is_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old run\n").unwrap();

        let options = WriterOptions {
            rotate_on_open: false,
            ..WriterOptions::default()
        };
        let writer = RotatingWriter::open(&path, RotationSchedule::daily(), options).unwrap();
        writer.write(b"new run\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old run\nnew run\n");
        assert_eq!(file_count(&dir), 1);
    }

    #[test]
    fn closed_writer_rejects_writes() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let writer = open(&dir, &clock);

        writer.close().unwrap();
        writer.close().unwrap();
        assert!(writer.is_closed());
        assert!(matches!(writer.write(b"x\n"), Err(Error::WriterClosed)));
        writer.flush().unwrap();
    }

    #[test]
    fn io_write_adapter_appends() {
        use std::io::Write;

        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let writer = open(&dir, &clock);

        writeln!(&writer, "via io::Write").unwrap();
        (&writer).flush().unwrap();
        assert_eq!(
            fs::read_to_string(writer.path()).unwrap(),
            "via io::Write\n"
        );
    }

    #[test]
    fn failed_rotation_is_reported_once_per_boundary() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        let clock = Arc::new(ManualClock::new(start()));
        let writer = RotatingWriter::open_with_clock(
            logs.join("app.log"),
            RotationSchedule::daily(),
            WriterOptions::default(),
            Arc::clone(&clock) as Arc<dyn Clock>,
        )
        .unwrap();
        writer.write(b"first\n").unwrap();
        let before = writer.last_rotated_at();

        // A regular file where the log directory was cannot be created into.
        fs::remove_dir_all(&logs).unwrap();
        fs::write(&logs, b"").unwrap();

        clock.advance(TimeDelta::days(1));
        assert!(matches!(writer.write(b"second\n"), Err(Error::Rotation(_))));
        assert_eq!(writer.last_rotated_at(), before + TimeDelta::days(1));

        let retried = writer.write(b"third\n");
        assert!(retried.is_err());
        assert!(!matches!(retried, Err(Error::Rotation(_))));
        assert_eq!(writer.rotation_count(), 0);
        assert_eq!(writer.last_rotated_at(), before + TimeDelta::days(1));

        fs::remove_file(&logs).unwrap();
        writer.write(b"fourth\n").unwrap();
        assert_eq!(writer.rotation_count(), 0);
        assert_eq!(fs::read_to_string(logs.join("app.log")).unwrap(), "fourth\n");
    }

    #[test]
    fn unwritable_directory_fails_open_with_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("plain-file");
        fs::write(&blocker, b"").unwrap();

        for rotate_on_open in [true, false] {
            let options = WriterOptions {
                rotate_on_open,
                ..WriterOptions::default()
            };
            let opened =
                RotatingWriter::open(blocker.join("app.log"), RotationSchedule::daily(), options);
            assert!(matches!(opened, Err(Error::Io(_))));
        }
    }
}
