//! Date/time tokens and format-string patterns
//!
//! Token spelling follows the common `YYYY-MM-DD HH:mm:ss` convention. A
//! format string is scanned left to right; at each position the longest
//! matching token wins and any other character is copied through.

use std::fmt;

use smallvec::SmallVec;
use time::OffsetDateTime;

/// A recognised date/time placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `YYYY` - 4-digit year
    Year,
    /// `YY` - 2-digit year
    YearShort,
    /// `Q` - quarter 1-4
    Quarter,
    /// `MMMM` - full month name
    MonthName,
    /// `MMM` - 3-letter month name
    MonthNameShort,
    /// `MM` - month 01-12
    MonthPadded,
    /// `M` - month 1-12
    Month,
    /// `DDDD` - day of year 001-366
    DayOfYearPadded,
    /// `DDD` - day of year 1-366
    DayOfYear,
    /// `DD` - day of month 01-31
    DayPadded,
    /// `Do` - day of month with ordinal suffix
    DayOrdinal,
    /// `D` - day of month 1-31
    Day,
    /// `dddd` - full weekday name
    WeekdayName,
    /// `ddd` - 3-letter weekday name
    WeekdayNameShort,
    /// `dd` - 2-letter weekday name
    WeekdayNameMin,
    /// `d` - weekday number, Sunday = 0
    Weekday,
    /// `HH` - hour 00-23
    Hour24Padded,
    /// `H` - hour 0-23
    Hour24,
    /// `hh` - hour 01-12
    Hour12Padded,
    /// `h` - hour 1-12
    Hour12,
    /// `mm` - minute 00-59
    MinutePadded,
    /// `m` - minute 0-59
    Minute,
    /// `ss` - second 00-59
    SecondPadded,
    /// `s` - second 0-59
    Second,
    /// `SSS` - milliseconds
    Millis,
    /// `SS` - centiseconds
    Centis,
    /// `S` - deciseconds
    Decis,
    /// `A` - AM / PM
    MeridiemUpper,
    /// `a` - am / pm
    MeridiemLower,
    /// `ZZ` - offset as `+hhmm`
    OffsetCompact,
    /// `Z` - offset as `+hh:mm`
    Offset,
    /// `X` - unix seconds
    UnixSeconds,
    /// `x` - unix milliseconds
    UnixMillis,
}

// Ordered longest first so prefix scanning picks the longest token.
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year),
    ("MMMM", Token::MonthName),
    ("DDDD", Token::DayOfYearPadded),
    ("dddd", Token::WeekdayName),
    ("MMM", Token::MonthNameShort),
    ("DDD", Token::DayOfYear),
    ("ddd", Token::WeekdayNameShort),
    ("SSS", Token::Millis),
    ("YY", Token::YearShort),
    ("MM", Token::MonthPadded),
    ("DD", Token::DayPadded),
    ("Do", Token::DayOrdinal),
    ("dd", Token::WeekdayNameMin),
    ("HH", Token::Hour24Padded),
    ("hh", Token::Hour12Padded),
    ("mm", Token::MinutePadded),
    ("ss", Token::SecondPadded),
    ("SS", Token::Centis),
    ("ZZ", Token::OffsetCompact),
    ("Q", Token::Quarter),
    ("M", Token::Month),
    ("D", Token::Day),
    ("d", Token::Weekday),
    ("H", Token::Hour24),
    ("h", Token::Hour12),
    ("m", Token::Minute),
    ("s", Token::Second),
    ("S", Token::Decis),
    ("A", Token::MeridiemUpper),
    ("a", Token::MeridiemLower),
    ("Z", Token::Offset),
    ("X", Token::UnixSeconds),
    ("x", Token::UnixMillis),
];

impl Token {
    /// Match the longest token at the start of `input`
    pub fn match_prefix(input: &str) -> Option<(Self, usize)> {
        TOKENS
            .iter()
            .find(|(text, _)| input.starts_with(text))
            .map(|(text, token)| (*token, text.len()))
    }

    /// Write the field of `now` this token stands for
    pub fn write(self, now: &OffsetDateTime, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "{:04}", now.year()),
            Self::YearShort => write!(f, "{:02}", now.year().rem_euclid(100)),
            Self::Quarter => write!(f, "{}", (u8::from(now.month()) - 1) / 3 + 1),
            Self::MonthName => write!(f, "{}", now.month()),
            Self::MonthNameShort => f.write_str(&now.month().to_string()[..3]),
            Self::MonthPadded => write!(f, "{:02}", u8::from(now.month())),
            Self::Month => write!(f, "{}", u8::from(now.month())),
            Self::DayOfYearPadded => write!(f, "{:03}", now.ordinal()),
            Self::DayOfYear => write!(f, "{}", now.ordinal()),
            Self::DayPadded => write!(f, "{:02}", now.day()),
            Self::DayOrdinal => write!(f, "{}{}", now.day(), ordinal_suffix(now.day())),
            Self::Day => write!(f, "{}", now.day()),
            Self::WeekdayName => write!(f, "{}", now.weekday()),
            Self::WeekdayNameShort => f.write_str(&now.weekday().to_string()[..3]),
            Self::WeekdayNameMin => f.write_str(&now.weekday().to_string()[..2]),
            Self::Weekday => write!(f, "{}", now.weekday().number_days_from_sunday()),
            Self::Hour24Padded => write!(f, "{:02}", now.hour()),
            Self::Hour24 => write!(f, "{}", now.hour()),
            Self::Hour12Padded => write!(f, "{:02}", hour12(now.hour())),
            Self::Hour12 => write!(f, "{}", hour12(now.hour())),
            Self::MinutePadded => write!(f, "{:02}", now.minute()),
            Self::Minute => write!(f, "{}", now.minute()),
            Self::SecondPadded => write!(f, "{:02}", now.second()),
            Self::Second => write!(f, "{}", now.second()),
            Self::Millis => write!(f, "{:03}", now.millisecond()),
            Self::Centis => write!(f, "{:02}", now.millisecond() / 10),
            Self::Decis => write!(f, "{}", now.millisecond() / 100),
            Self::MeridiemUpper => f.write_str(if now.hour() < 12 { "AM" } else { "PM" }),
            Self::MeridiemLower => f.write_str(if now.hour() < 12 { "am" } else { "pm" }),
            Self::OffsetCompact => write_offset(now, "", f),
            Self::Offset => write_offset(now, ":", f),
            Self::UnixSeconds => write!(f, "{}", now.unix_timestamp()),
            Self::UnixMillis => write!(f, "{}", now.unix_timestamp_nanos() / 1_000_000),
        }
    }
}

fn hour12(hour: u8) -> u8 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn ordinal_suffix(day: u8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn write_offset(now: &OffsetDateTime, sep: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let minutes = now.offset().whole_minutes();
    let sign = if minutes < 0 { '-' } else { '+' };
    let minutes = minutes.unsigned_abs();
    write!(f, "{sign}{:02}{sep}{:02}", minutes / 60, minutes % 60)
}

/// One piece of a parsed format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// Text copied through unchanged
    Literal(String),
    /// Placeholder replaced by a field of the instant
    Token(Token),
}

/// A parsed date/time format string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    items: SmallVec<[Item; 8]>,
}

impl Pattern {
    /// Parse a format string; never fails, unknown characters become literals
    pub fn parse(format: &str) -> Self {
        let mut items = SmallVec::new();
        let mut literal = String::new();
        let mut rest = format;

        while let Some(ch) = rest.chars().next() {
            if let Some((token, len)) = Token::match_prefix(rest) {
                if !literal.is_empty() {
                    items.push(Item::Literal(std::mem::take(&mut literal)));
                }
                items.push(Item::Token(token));
                rest = &rest[len..];
            } else {
                literal.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
        if !literal.is_empty() {
            items.push(Item::Literal(literal));
        }

        Self { items }
    }

    /// Parsed items in order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether the pattern has no items (renders to an empty string)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lazily rendered view of this pattern at `now`
    pub fn display<'a>(&'a self, now: &'a OffsetDateTime) -> PatternDisplay<'a> {
        PatternDisplay { pattern: self, now }
    }

    /// Render this pattern at `now`
    pub fn render(&self, now: &OffsetDateTime) -> String {
        self.display(now).to_string()
    }
}

/// [`fmt::Display`] adapter returned by [`Pattern::display`]
#[derive(Debug)]
pub struct PatternDisplay<'a> {
    pattern: &'a Pattern,
    now: &'a OffsetDateTime,
}

impl fmt::Display for PatternDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.pattern.items {
            match item {
                Item::Literal(text) => f.write_str(text)?,
                Item::Token(token) => token.write(self.now, f)?,
            }
        }
        Ok(())
    }
}
