//! Timestamp templates
//!
//! A template mixes literal decoration with date/time tokens (see
//! [`token`]). Square brackets mark the token parts:
//!
//! ```rust
//! use stamplog::template::Template;
//! use time::macros::datetime;
//!
//! let now = datetime!(2024-03-07 09:05:03 UTC);
//! assert_eq!(Template::parse("Date: [YYYY-MM-DD]").render(&now), "Date: 2024-03-07");
//! assert_eq!(Template::parse("[]-fixed").render(&now), "-fixed");
//! assert_eq!(Template::parse("YYYY").render(&now), "2024");
//! ```
//!
//! Without any matching `[...]` pair the whole template is a format string.
//! Literal letters that are also tokens are then rendered as tokens; use
//! brackets to avoid that.
//!
//! With at least one pair, scanning runs left to right and each span is the
//! shortest substring from a `[` to the next `]`. Brackets are not nested:
//! the first `]` closes the span, and a `[` that is followed by another `[`
//! before any `]` stays literal. Text outside spans, stray brackets included,
//! is copied verbatim.

pub mod token;

use std::fmt;

use smallvec::SmallVec;
use time::OffsetDateTime;

pub use token::{Item, Pattern, Token};

/// Template used when none (or an empty one) is configured
pub const DEFAULT_TEMPLATE: &str = "YYYY-MM-DD HH:mm:ss";

/// How a template was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateMode {
    /// No bracket pair: the whole template is one format string
    Whole,
    /// Bracketed spans are format strings, the rest is literal
    Segmented,
}

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Verbatim text
    Literal(String),
    /// Token-rendered text
    Pattern(Pattern),
}

/// A parsed timestamp template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    mode: TemplateMode,
    segments: SmallVec<[Segment; 4]>,
}

impl Template {
    /// Parse a template. An empty string selects [`DEFAULT_TEMPLATE`].
    ///
    /// Parsing never fails: a template without a matching bracket pair is
    /// read as a single format string.
    pub fn parse(source: &str) -> Self {
        let source = if source.is_empty() {
            DEFAULT_TEMPLATE
        } else {
            source
        };

        match split_segments(source) {
            Some(segments) => Self {
                source: source.to_string(),
                mode: TemplateMode::Segmented,
                segments,
            },
            None => Self {
                source: source.to_string(),
                mode: TemplateMode::Whole,
                segments: smallvec::smallvec![Segment::Pattern(Pattern::parse(source))],
            },
        }
    }

    /// Original template text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Interpretation chosen at parse time
    pub fn mode(&self) -> TemplateMode {
        self.mode
    }

    /// Parsed segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render at `now`
    pub fn render(&self, now: &OffsetDateTime) -> String {
        let mut out = String::with_capacity(self.source.len() + 8);
        self.render_into(now, &mut out);
        out
    }

    fn render_into(&self, now: &OffsetDateTime, out: &mut String) {
        use fmt::Write as _;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                // Writing into a String cannot fail
                Segment::Pattern(pattern) => {
                    let _ = write!(out, "{}", pattern.display(now));
                }
            }
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE)
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split on `[...]` spans. `None` when no pair closes.
fn split_segments(source: &str) -> Option<SmallVec<[Segment; 4]>> {
    let mut segments = SmallVec::new();
    let mut literal_start = 0;
    let mut open = None;
    let mut paired = false;

    for (idx, ch) in source.char_indices() {
        match ch {
            '[' => open = Some(idx),
            ']' => {
                if let Some(start) = open.take() {
                    if start > literal_start {
                        segments.push(Segment::Literal(source[literal_start..start].to_string()));
                    }
                    segments.push(Segment::Pattern(Pattern::parse(&source[start + 1..idx])));
                    literal_start = idx + 1;
                    paired = true;
                }
            }
            _ => {}
        }
    }

    if !paired {
        return None;
    }
    if literal_start < source.len() {
        segments.push(Segment::Literal(source[literal_start..].to_string()));
    }
    Some(segments)
}

/// A template plus literal prefix and suffix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampFormat {
    template: Template,
    prefix: String,
    suffix: String,
}

impl TimestampFormat {
    /// Create a format without decoration
    pub fn new(template: Template) -> Self {
        Self {
            template,
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    /// Literal text placed before the rendered template
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Literal text placed after the rendered template
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Underlying template
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Configured prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Configured suffix
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Render `prefix + template + suffix` at `now`
    pub fn render(&self, now: &OffsetDateTime) -> String {
        let mut out =
            String::with_capacity(self.prefix.len() + self.template.source.len() + self.suffix.len() + 8);
        out.push_str(&self.prefix);
        self.template.render_into(now, &mut out);
        out.push_str(&self.suffix);
        out
    }
}

/// Render `template` at `now` between `prefix` and `suffix`
pub fn format_timestamp(template: &str, now: &OffsetDateTime, prefix: &str, suffix: &str) -> String {
    TimestampFormat::new(Template::parse(template))
        .with_prefix(prefix)
        .with_suffix(suffix)
        .render(now)
}
