//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default safety limit for a single recording (5 minutes)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 300;

/// Value object representing a recording length in whole seconds.
/// Immutable and validated on creation when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    seconds: u64,
}

impl Duration {
    /// Zero-length duration
    pub const ZERO: Self = Self { seconds: 0 };

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self { seconds: secs }
    }

    /// Default safety limit for a single recording
    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.seconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds)
    }

    /// Format as a running clock, `m:ss`
    pub fn clock(&self) -> String {
        format!("{}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a compact duration string.
    /// Supported formats: "30s", "1m", "2m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| invalid())?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| invalid())?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(invalid());
            }
        }

        if !current_num.is_empty() || !found_any {
            return Err(invalid());
        }

        let total = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(invalid)?;

        if total == 0 {
            return Err(invalid());
        }

        Ok(Self::from_secs(total))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds / 60;
        let seconds = self.seconds % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_case_and_whitespace() {
        let d: Duration = "  1M30S ".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert!("0s".parse::<Duration>().is_err());
        assert!("".parse::<Duration>().is_err());
        assert!("30".parse::<Duration>().is_err());
        assert!("3x".parse::<Duration>().is_err());
    }

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(Duration::ZERO.clock(), "0:00");
        assert_eq!(Duration::from_secs(3).clock(), "0:03");
        assert_eq!(Duration::from_secs(125).clock(), "2:05");
        assert_eq!(Duration::from_secs(600).clock(), "10:00");
    }

    #[test]
    fn display_compact() {
        assert_eq!(Duration::from_secs(30).to_string(), "30s");
        assert_eq!(Duration::from_secs(120).to_string(), "2m");
        assert_eq!(Duration::from_secs(150).to_string(), "2m30s");
    }

    #[test]
    fn as_std_duration() {
        assert_eq!(Duration::from_secs(4).as_std(), StdDuration::from_secs(4));
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Duration::default(), Duration::ZERO);
        assert_eq!(Duration::default_max_duration().as_secs(), 300);
    }
}
