//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::audio::PlaybackPolicy;
use crate::domain::composer::ComposerVariant;
use crate::domain::recording::Duration;
use crate::domain::timeline::ModuleTag;

/// Author label used when nothing else is configured
pub const DEFAULT_AUTHOR: &str = "Nome";

/// Default log level for the `voice_timeline` target
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub author: Option<String>,
    pub module: Option<String>,
    pub variant: Option<String>,
    pub max_duration: Option<String>,
    pub playback_policy: Option<String>,
    pub notify: Option<bool>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            author: Some(DEFAULT_AUTHOR.to_string()),
            module: Some(ModuleTag::FAMILY.to_string()),
            variant: Some(ComposerVariant::Full.to_string()),
            max_duration: Some(Duration::default_max_duration().to_string()),
            playback_policy: Some(PlaybackPolicy::Restart.to_string()),
            notify: Some(false),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            author: other.author.or(self.author),
            module: other.module.or(self.module),
            variant: other.variant.or(self.variant),
            max_duration: other.max_duration.or(self.max_duration),
            playback_policy: other.playback_policy.or(self.playback_policy),
            notify: other.notify.or(self.notify),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get the author label, or the default if not set/blank
    pub fn author_or_default(&self) -> &str {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_AUTHOR)
    }

    /// Get module as parsed ModuleTag, or default if not set/invalid
    pub fn module_or_default(&self) -> ModuleTag {
        self.module
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get variant as parsed ComposerVariant, or default if not set/invalid
    pub fn variant_or_default(&self) -> ComposerVariant {
        self.variant
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    /// Get playback policy, or restart if not set/invalid
    pub fn playback_policy_or_default(&self) -> PlaybackPolicy {
        self.playback_policy
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get log level, or "warn" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.author, Some("Nome".to_string()));
        assert_eq!(config.module, Some("family".to_string()));
        assert_eq!(config.variant, Some("full".to_string()));
        assert_eq!(config.max_duration, Some("5m".to_string()));
        assert_eq!(config.playback_policy, Some("restart".to_string()));
        assert_eq!(config.notify, Some(false));
        assert_eq!(config.log_level, Some("warn".to_string()));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.author.is_none());
        assert!(config.module.is_none());
        assert!(config.max_duration.is_none());
        assert!(config.notify.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            author: Some("Base".to_string()),
            module: Some("family".to_string()),
            variant: Some("full".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            author: Some("Other".to_string()),
            module: None,
            variant: Some("compact".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.author, Some("Other".to_string()));
        assert_eq!(merged.module, Some("family".to_string()));
        assert_eq!(merged.variant, Some("compact".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            notify: Some(true),
            ..Default::default()
        };
        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.notify, Some(true));
    }

    #[test]
    fn author_or_default_ignores_blank() {
        let config = AppConfig {
            author: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.author_or_default(), "Nome");

        let config = AppConfig {
            author: Some(" Ana ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.author_or_default(), "Ana");
    }

    #[test]
    fn module_or_default_parses() {
        let config = AppConfig {
            module: Some("education".to_string()),
            ..Default::default()
        };
        assert_eq!(config.module_or_default().as_str(), "education");
        assert_eq!(AppConfig::empty().module_or_default().as_str(), "family");
    }

    #[test]
    fn variant_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            variant: Some("huge".to_string()),
            ..Default::default()
        };
        assert_eq!(config.variant_or_default(), ComposerVariant::Full);
    }

    #[test]
    fn max_duration_or_default_parses() {
        let config = AppConfig {
            max_duration: Some("90s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 90);
        assert_eq!(AppConfig::empty().max_duration_or_default().as_secs(), 300);
    }

    #[test]
    fn playback_policy_or_default() {
        let config = AppConfig {
            playback_policy: Some("ignore".to_string()),
            ..Default::default()
        };
        assert_eq!(config.playback_policy_or_default(), PlaybackPolicy::Ignore);
        assert_eq!(
            AppConfig::empty().playback_policy_or_default(),
            PlaybackPolicy::Restart
        );
    }

    #[test]
    fn boolean_and_level_defaults() {
        let config = AppConfig::empty();
        assert!(!config.notify_or_default());
        assert_eq!(config.log_level_or_default(), "warn");
    }
}
