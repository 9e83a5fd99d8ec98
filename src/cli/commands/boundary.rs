//! `rotalog boundary --at 2021-04-12T02:29:00Z --interval 24h --offset 17h`

use crate::rotation::RotationSchedule;
use crate::units::{format_duration, parse_duration};
use chrono::{DateTime, FixedOffset, Utc};
use std::process::ExitCode;

/// Prints the boundary in UTC and in the zone of `--at`, plus the next one.
#[must_use]
pub fn cmd_boundary(at: Option<&str>, interval: &str, offset: &str) -> ExitCode {
    let now: DateTime<FixedOffset> = match at {
        Some(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Invalid --at '{s}': {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Utc::now().fixed_offset(),
    };

    let Some(interval) = parse_duration(interval) else {
        eprintln!("Invalid --interval '{interval}'");
        return ExitCode::FAILURE;
    };
    let Some(offset) = parse_duration(offset) else {
        eprintln!("Invalid --offset '{offset}'");
        return ExitCode::FAILURE;
    };

    let schedule = match RotationSchedule::new(interval, offset) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let boundary = schedule.boundary(now.with_timezone(&Utc));
    let next = schedule.next_boundary(now.with_timezone(&Utc));
    println!("schedule  {schedule}");
    println!("at        {}", now.to_rfc3339());
    println!("boundary  {}", boundary.to_rfc3339());
    println!(
        "local     {}",
        boundary.with_timezone(now.offset()).to_rfc3339()
    );
    println!(
        "next      {} (in {})",
        next.to_rfc3339(),
        format_duration(next - now.with_timezone(&Utc))
    );
    ExitCode::SUCCESS
}
