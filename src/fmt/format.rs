//! Record layout as a template, so the file and console can share one line format or
//! diverge without code changes. `{timestamp}\t{level}\t{caller}\t{msg}` is the default.

/// Closed set of known substitution tokens. Unknown `{names}` pass through as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Timestamp,
    Level,
    Caller,
    Msg,
}

impl Placeholder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Level => "level",
            Self::Caller => "caller",
            Self::Msg => "msg",
        }
    }

    pub const ALL: &'static [Self] = &[Self::Timestamp, Self::Level, Self::Caller, Self::Msg];

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ph| ph.as_str() == name)
    }
}

/// Parsing into segments once avoids re-scanning the template on every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Pre-parsed template: parse once, render per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    segments: Vec<FormatSegment>,
}

pub const DEFAULT_TEMPLATE: &str = "{timestamp}\t{level}\t{caller}\t{msg}";

impl Default for FormatTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE)
    }
}

impl FormatTemplate {
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|c| open + c) else {
                break;
            };
            literal.push_str(&rest[..open]);

            let name = &rest[open + 1..close];
            if let Some(ph) = Placeholder::from_name(name) {
                if !literal.is_empty() {
                    segments.push(FormatSegment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(FormatSegment::Placeholder(ph));
            } else {
                literal.push_str(&rest[open..=close]);
            }
            rest = &rest[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(FormatSegment::Literal(literal));
        }

        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[FormatSegment] {
        &self.segments
    }

    /// Whether rendering needs a caller location at all; saves formatting it otherwise.
    #[must_use]
    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| *s == FormatSegment::Placeholder(placeholder))
    }

    /// Appends the rendered record to `out`.
    pub fn render_into(&self, values: &FormatValues<'_>, out: &mut String) {
        for segment in &self.segments {
            match segment {
                FormatSegment::Literal(s) => out.push_str(s),
                FormatSegment::Placeholder(ph) => out.push_str(match ph {
                    Placeholder::Timestamp => values.timestamp,
                    Placeholder::Level => values.level,
                    Placeholder::Caller => values.caller,
                    Placeholder::Msg => values.msg,
                }),
            }
        }
    }

    #[must_use]
    pub fn render(&self, values: &FormatValues<'_>) -> String {
        let mut out = String::new();
        self.render_into(values, &mut out);
        out
    }
}

/// Borrowed values for one render; every placeholder has a field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatValues<'a> {
    pub timestamp: &'a str,
    pub level: &'a str,
    pub caller: &'a str,
    pub msg: &'a str,
}
