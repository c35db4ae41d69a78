//! What `play` does when something is already playing

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error when an unknown playback policy is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid playback policy: \"{input}\". Valid policies are: restart, ignore")]
pub struct InvalidPolicyError {
    pub input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackPolicy {
    /// Stop the current playback, then play the new artifact
    #[default]
    Restart,
    /// Keep the current playback and ignore the request
    Ignore,
}

impl PlaybackPolicy {
    pub const ALL: &'static [&'static str] = &["restart", "ignore"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for PlaybackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlaybackPolicy {
    type Err = InvalidPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "restart" => Ok(Self::Restart),
            "ignore" => Ok(Self::Ignore),
            _ => Err(InvalidPolicyError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_policies() {
        assert_eq!("restart".parse::<PlaybackPolicy>().unwrap(), PlaybackPolicy::Restart);
        assert_eq!(" Ignore ".parse::<PlaybackPolicy>().unwrap(), PlaybackPolicy::Ignore);
        assert!("queue".parse::<PlaybackPolicy>().is_err());
    }

    #[test]
    fn default_is_restart() {
        assert_eq!(PlaybackPolicy::default(), PlaybackPolicy::Restart);
    }
}
