//! Size and retention limits for the file sink

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::core::{LogError, LogResult};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// How many rotated files to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Keep files modified within the last N days (`"14d"`)
    Days(u32),
    /// Keep the N most recent files (`"10"`)
    Count(usize),
}

impl Retention {
    /// Maximum age for [`Retention::Days`]
    pub fn max_age(self) -> Option<Duration> {
        match self {
            Self::Days(days) => Some(Duration::from_secs(u64::from(days) * SECONDS_PER_DAY)),
            Self::Count(_) => None,
        }
    }
}

impl Default for Retention {
    fn default() -> Self {
        Self::Days(14)
    }
}

impl FromStr for Retention {
    type Err = LogError;

    fn from_str(s: &str) -> LogResult<Self> {
        let text = s.trim();
        let invalid = || LogError::config(format!("maxFile '{s}' is not a file count or a day count like '14d'"));

        let retention = match text.strip_suffix(['d', 'D']) {
            Some(days) => Self::Days(days.trim().parse().map_err(|_| invalid())?),
            None => Self::Count(text.parse().map_err(|_| invalid())?),
        };
        match retention {
            Self::Days(0) | Self::Count(0) => Err(invalid()),
            retention => Ok(retention),
        }
    }
}

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}d"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// Parse a size like `"20m"`, `"512k"`, `"1g"` or `"4096"` into bytes
pub fn parse_size(s: &str) -> LogResult<u64> {
    let text = s.trim().to_ascii_lowercase();
    let invalid = || LogError::config(format!("maxSize '{s}' is not a size like '20m'"));

    let (digits, multiplier) = match text.as_bytes().last() {
        Some(b'k') => (&text[..text.len() - 1], 1024),
        Some(b'm') => (&text[..text.len() - 1], 1024 * 1024),
        Some(b'g') => (&text[..text.len() - 1], 1024 * 1024 * 1024),
        _ => (text.as_str(), 1),
    };

    let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
    match value.checked_mul(multiplier) {
        Some(0) | None => Err(invalid()),
        Some(bytes) => Ok(bytes),
    }
}
