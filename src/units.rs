//! Config files and environment variables carry sizes, durations and flags as strings
//! ("100M", "7h30m", "TRUE") while the writers operate on bytes and `TimeDelta`s.

use chrono::TimeDelta;

/// Config files and CLI args use "100M"/"1G" notation, not raw byte counts.
#[must_use]
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier): (&str, f64) = if s.ends_with("GB") || s.ends_with('G') {
        (
            s.trim_end_matches("GB").trim_end_matches('G'),
            1024.0 * 1024.0 * 1024.0,
        )
    } else if s.ends_with("MB") || s.ends_with('M') {
        (
            s.trim_end_matches("MB").trim_end_matches('M'),
            1024.0 * 1024.0,
        )
    } else if s.ends_with("KB") || s.ends_with('K') {
        (s.trim_end_matches("KB").trim_end_matches('K'), 1024.0)
    } else {
        (s.trim_end_matches('B'), 1.0)
    };

    let n = num_str.trim().parse::<f64>().ok()?;
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let result = (n * multiplier) as u64;
    Some(result)
}

/// Raw byte counts are unreadable in diagnostics.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;

    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.2} GB", bytes_f / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes_f / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes_f / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Parses compound durations such as `24h`, `7h30m`, `200ms` or `-1h`.
///
/// Recognised units: `d`, `h`, `m`, `s`, `ms`, `us`/`µs`, `ns`. A bare `0` is accepted.
#[must_use]
pub fn parse_duration(s: &str) -> Option<TimeDelta> {
    let s = s.trim();
    let (negative, mut rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if rest == "0" {
        return Some(TimeDelta::zero());
    }
    if rest.is_empty() {
        return None;
    }

    let mut total = TimeDelta::zero();
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return None;
        }
        let value: i64 = rest[..digits].parse().ok()?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let part = match unit {
            "d" => TimeDelta::try_days(value)?,
            "h" => TimeDelta::try_hours(value)?,
            "m" => TimeDelta::try_minutes(value)?,
            "s" => TimeDelta::try_seconds(value)?,
            "ms" => TimeDelta::try_milliseconds(value)?,
            "us" | "µs" => TimeDelta::microseconds(value),
            "ns" => TimeDelta::nanoseconds(value),
            _ => return None,
        };
        total = total.checked_add(&part)?;
    }

    Some(if negative { -total } else { total })
}

/// Inverse of [`parse_duration`] for diagnostics: `TimeDelta::hours(30)` renders as `1d6h`.
#[must_use]
pub fn format_duration(delta: TimeDelta) -> String {
    if delta.is_zero() {
        return "0s".to_string();
    }

    let mut out = String::new();
    if delta < TimeDelta::zero() {
        out.push('-');
    }
    let delta = delta.abs();

    let parts = [
        (delta.num_days(), "d"),
        (delta.num_hours() % 24, "h"),
        (delta.num_minutes() % 60, "m"),
        (delta.num_seconds() % 60, "s"),
        (delta.num_milliseconds() % 1000, "ms"),
    ];
    for (value, unit) in parts {
        if value != 0 {
            out.push_str(&value.to_string());
            out.push_str(unit);
        }
    }
    if out.is_empty() || out == "-" {
        // Sub-millisecond remainder only.
        let micros = delta.num_microseconds().unwrap_or(0);
        out.push_str(&format!("{micros}us"));
    }
    out
}

/// Accepts the conventional spellings `1 t T TRUE true True` and `0 f F FALSE false False`.
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
