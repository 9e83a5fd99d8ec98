//! Turns one log call into the bytes every sink receives.

use super::format::{FormatTemplate, FormatValues, Placeholder};
use crate::level::Level;
use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;
use std::panic::Location;

/// ISO-8601 with milliseconds and a numeric offset, e.g. `2021-04-12T09:29:00.123+0700`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Renders records as single newline-terminated lines.
#[derive(Debug, Clone)]
pub struct Encoder {
    template: FormatTemplate,
    timestamp_format: String,
    utc: bool,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            template: FormatTemplate::default(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc: false,
        }
    }

    #[must_use]
    pub fn template(mut self, template: &str) -> Self {
        self.template = FormatTemplate::parse(template);
        self
    }

    /// strftime pattern for `{timestamp}`.
    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Render timestamps in UTC instead of the host zone.
    #[must_use]
    pub const fn utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// Encodes a record stamped with the current time.
    #[must_use]
    pub fn encode(&self, level: Level, caller: Option<&Location<'_>>, msg: &str) -> Vec<u8> {
        self.encode_at(Utc::now(), level, caller, msg)
    }

    /// Encodes a record stamped `at`. Trailing newlines in `msg` collapse into the single
    /// record terminator.
    #[must_use]
    pub fn encode_at(
        &self,
        at: DateTime<Utc>,
        level: Level,
        caller: Option<&Location<'_>>,
        msg: &str,
    ) -> Vec<u8> {
        let mut timestamp = String::new();
        if self.template.uses(Placeholder::Timestamp) {
            // A bad strftime pattern makes `write!` fail; fall back to RFC 3339.
            let rendered = if self.utc {
                write!(timestamp, "{}", at.format(&self.timestamp_format))
            } else {
                write!(
                    timestamp,
                    "{}",
                    at.with_timezone(&Local).format(&self.timestamp_format)
                )
            };
            if rendered.is_err() {
                timestamp = at.to_rfc3339();
            }
        }

        let caller = match caller {
            Some(loc) if self.template.uses(Placeholder::Caller) => {
                format!("{}:{}", loc.file(), loc.line())
            }
            _ => String::new(),
        };

        let values = FormatValues {
            timestamp: &timestamp,
            level: level.label(),
            caller: &caller,
            msg: msg.trim_end_matches(['\n', '\r']),
        };

        let mut line = String::with_capacity(64 + msg.len());
        self.template.render_into(&values, &mut line);
        line.push('\n');
        line.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2021-04-12T02:29:00.5Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn encodes_default_layout() {
        let encoder = Encoder::new().utc(true);
        let loc = Location::caller();
        let line = String::from_utf8(encoder.encode_at(at(), Level::Info, Some(loc), "hello"))
            .unwrap();

        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        assert_eq!(fields[0], "2021-04-12T02:29:00.500+0000");
        assert_eq!(fields[1], "INFO");
        assert!(fields[2].starts_with(loc.file()));
        assert_eq!(fields[3], "hello");
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn trailing_newlines_collapse() {
        let encoder = Encoder::new().template("{msg}");
        let line = encoder.encode_at(at(), Level::Debug, None, "multi\n\n");
        assert_eq!(line, b"multi\n");
    }

    #[test]
    fn custom_template_and_timestamp() {
        let encoder = Encoder::new()
            .utc(true)
            .template("{timestamp} [{level}] {msg}")
            .timestamp_format("%H:%M");
        let line = encoder.encode_at(at(), Level::Warn, None, "careful");
        assert_eq!(line, b"02:29 [WARN] careful\n");
    }
}
