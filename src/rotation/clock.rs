//! Boundary arithmetic for scheduled rotation, plus the time source the writer reads.
//!
//! Boundaries form the series `phase_offset + k * interval` measured from the Unix epoch
//! in UTC, so a daily interval with a 7h offset rotates at 07:00 UTC every day regardless
//! of the host's local zone.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Mutex;

/// Returns the latest rotation boundary that is not after `now`.
///
/// A non-positive `interval` has no boundaries; `now` is returned unchanged. Writers
/// reject such intervals before they ever get here.
#[must_use]
pub fn boundary(now: DateTime<Utc>, interval: TimeDelta, phase_offset: TimeDelta) -> DateTime<Utc> {
    let Some(interval_us) = interval.num_microseconds().filter(|us| *us > 0) else {
        return now;
    };
    let offset_us = i128::from(phase_offset.num_microseconds().unwrap_or(0));
    let now_us = i128::from(now.timestamp_micros());
    let interval_us = i128::from(interval_us);

    let shifted = now_us - offset_us;
    let floored = shifted.div_euclid(interval_us) * interval_us + offset_us;

    i64::try_from(floored)
        .ok()
        .and_then(DateTime::from_timestamp_micros)
        .unwrap_or(now)
}

/// Time source consulted on every write. Swappable so tests can step across boundaries
/// without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn parse(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn daily_without_offset_is_utc_midnight() {
        let now = parse("2021-04-12T09:29:00+07:00");
        let b = boundary(now, TimeDelta::hours(24), TimeDelta::zero());
        assert_eq!(b.to_rfc3339(), "2021-04-12T00:00:00+00:00");
    }

    #[test]
    fn offset_shifts_boundary_into_local_midnight() {
        let now = parse("2021-04-12T02:29:00Z");
        let b = boundary(now, TimeDelta::hours(24), TimeDelta::hours(17));
        let ict = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(
            b.with_timezone(&ict).to_rfc3339(),
            "2021-04-12T00:00:00+07:00"
        );
    }

    #[test]
    fn offset_picks_previous_day_when_not_yet_reached() {
        let now = parse("2021-04-12T06:59:59Z");
        let b = boundary(now, TimeDelta::hours(24), TimeDelta::hours(7));
        assert_eq!(b, parse("2021-04-11T07:00:00Z"));

        let now = parse("2021-04-12T07:00:00Z");
        let b = boundary(now, TimeDelta::hours(24), TimeDelta::hours(7));
        assert_eq!(b, now);
    }

    #[test]
    fn boundary_is_bounded_and_periodic() {
        let interval = TimeDelta::milliseconds(200);
        let offsets = [
            TimeDelta::zero(),
            TimeDelta::milliseconds(50),
            TimeDelta::milliseconds(-30),
            TimeDelta::milliseconds(450),
        ];
        let start = parse("2024-02-29T23:59:59.123Z");
        for offset in offsets {
            for step in 0..500 {
                let now = start + TimeDelta::microseconds(step * 1_337);
                let b = boundary(now, interval, offset);
                assert!(b <= now);
                assert!(now - b < interval);
                assert_eq!(boundary(now + interval, interval, offset), b + interval);
            }
        }
    }

    #[test]
    fn pre_epoch_timestamps_floor_downwards() {
        let now = parse("1969-12-31T23:30:00Z");
        let b = boundary(now, TimeDelta::hours(1), TimeDelta::zero());
        assert_eq!(b, parse("1969-12-31T23:00:00Z"));
    }

    #[test]
    fn non_positive_interval_returns_now() {
        let now = parse("2021-04-12T02:29:00Z");
        assert_eq!(boundary(now, TimeDelta::zero(), TimeDelta::zero()), now);
        assert_eq!(boundary(now, TimeDelta::hours(-1), TimeDelta::zero()), now);
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let start = parse("2021-04-12T00:00:00Z");
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(TimeDelta::seconds(5));
        assert_eq!(clock.now(), start + TimeDelta::seconds(5));
        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
