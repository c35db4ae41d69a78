//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::audio::PlaybackPolicy;
use crate::domain::composer::ComposerVariant;

/// Environment variable overriding the configured author
pub const ENV_AUTHOR: &str = "VOICE_TIMELINE_AUTHOR";

/// Environment variable overriding the configured module
pub const ENV_MODULE: &str = "VOICE_TIMELINE_MODULE";

/// Voice Timeline - record voice notes and post them to a timeline
#[derive(Parser, Debug)]
#[command(name = "voice-timeline")]
#[command(version)]
#[command(about = "Record voice notes and text into a module timeline")]
#[command(long_about = None)]
pub struct Cli {
    /// Author label attached to new entries
    #[arg(short = 'a', long, value_name = "NAME", env = ENV_AUTHOR)]
    pub author: Option<String>,

    /// Module the entries belong to (family, education, professional, ...)
    #[arg(short = 'm', long, value_name = "MODULE", env = ENV_MODULE)]
    pub module: Option<String>,

    /// Composer variant, which sets the text limit
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<VariantArg>,

    /// Auto-stop recordings after this long (e.g., 30s, 1m, 2m30s)
    #[arg(long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// What `play` does while something is already playing
    #[arg(long, value_name = "POLICY")]
    pub playback_policy: Option<PolicyArg>,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Seed the timeline with sample entries
    #[arg(long)]
    pub demo: bool,

    /// Verbose logging to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Report whether audio capture is available
    Check,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Full,
    Compact,
}

impl From<VariantArg> for ComposerVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Full => ComposerVariant::Full,
            VariantArg::Compact => ComposerVariant::Compact,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Restart,
    Ignore,
}

impl From<PolicyArg> for PlaybackPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Restart => PlaybackPolicy::Restart,
            PolicyArg::Ignore => PlaybackPolicy::Ignore,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "author",
    "module",
    "variant",
    "max_duration",
    "playback_policy",
    "notify",
    "log_level",
];

/// Accepted `log_level` values
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
