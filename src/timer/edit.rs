use std::str::FromStr;

use thiserror::Error;

/// Which half of the staged replacement time an input targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EditField {
    Minutes,
    Seconds,
}

impl EditField {
    /// The other field, used when cycling focus between the two inputs
    pub fn other(self) -> Self {
        match self {
            EditField::Minutes => EditField::Seconds,
            EditField::Seconds => EditField::Minutes,
        }
    }
}

impl FromStr for EditField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minutes" => Ok(EditField::Minutes),
            "seconds" => Ok(EditField::Seconds),
            other => Err(format!("unknown edit field: {other}")),
        }
    }
}

/// Recoverable problems found while committing the edit buffers.
/// These are reported alongside the committed value, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{field} buffer {raw:?} is not a number, using 0")]
    NotANumber { field: EditField, raw: String },
}

/// Result of `TimerController::commit_edit`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitReport {
    pub remaining_secs: u32,
    pub fallbacks: Vec<EditError>,
}

impl CommitReport {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Parse one edit buffer like a lenient integer parse: leading whitespace is
/// skipped, an optional sign and the longest digit run are read, trailing
/// garbage is ignored. No digits at all is an error.
pub fn parse_field(field: EditField, raw: &str) -> Result<i64, EditError> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(EditError::NotANumber {
            field,
            raw: raw.to_string(),
        });
    }

    let magnitude = rest[..digits_len]
        .bytes()
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    Ok(if negative { -magnitude } else { magnitude })
}

/// Combine parsed minutes and seconds into a countdown value.
/// Negative totals clamp to zero; oversized totals saturate.
pub fn total_secs(minutes: i64, seconds: i64) -> u32 {
    let total = minutes.saturating_mul(60).saturating_add(seconds);
    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

/// Stage a countdown value as zero-padded minute and second strings
pub fn stage(remaining_secs: u32) -> (String, String) {
    (
        format!("{:02}", remaining_secs / 60),
        format!("{:02}", remaining_secs % 60),
    )
}
