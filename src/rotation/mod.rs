//! File rotation: a size-rotating file underneath, a time-aligned writer on top.
//!
//! [`SizeRotatingFile`] owns the live file, the backup naming scheme and retention.
//! [`RotatingWriter`] adds the wall-clock schedule and the locking that keeps appends
//! from straddling a rotation.

mod backup;
pub mod clock;
mod retention;
mod size;
mod writer;

pub use clock::{Clock, ManualClock, SystemClock, boundary};
pub use size::{DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_SIZE, SizeOptions, SizeRotatingFile};
pub use writer::{RotatingWriter, WriterOptions};

use crate::Error;
use crate::units::format_duration;
use chrono::{DateTime, TimeDelta, Utc};

/// When scheduled rotations happen: every `interval`, shifted by `phase_offset` from the
/// epoch-aligned series. Validated once; a writer never changes its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSchedule {
    interval: TimeDelta,
    phase_offset: TimeDelta,
}

impl Default for RotationSchedule {
    fn default() -> Self {
        Self::daily()
    }
}

impl RotationSchedule {
    /// # Errors
    /// [`Error::InvalidInterval`] when `interval` is zero or negative, or so long that the
    /// next boundary from now is past the last representable date.
    pub fn new(interval: TimeDelta, phase_offset: TimeDelta) -> Result<Self, Error> {
        if interval <= TimeDelta::zero() || Utc::now().checked_add_signed(interval).is_none() {
            return Err(Error::InvalidInterval(format_duration(interval)));
        }
        Ok(Self {
            interval,
            phase_offset,
        })
    }

    /// Once a day at UTC midnight.
    #[must_use]
    pub fn daily() -> Self {
        Self {
            interval: TimeDelta::days(1),
            phase_offset: TimeDelta::zero(),
        }
    }

    #[must_use]
    pub const fn interval(&self) -> TimeDelta {
        self.interval
    }

    #[must_use]
    pub const fn phase_offset(&self) -> TimeDelta {
        self.phase_offset
    }

    /// Latest boundary of this schedule not after `now`.
    #[must_use]
    pub fn boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        boundary(now, self.interval, self.phase_offset)
    }

    /// First boundary strictly after `now`, clamped to the last representable instant.
    #[must_use]
    pub fn next_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.boundary(now)
            .checked_add_signed(self.interval)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl std::fmt::Display for RotationSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "every {} offset {}",
            format_duration(self.interval),
            format_duration(self.phase_offset)
        )
    }
}
