//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::audio::PlaybackPolicy;
use crate::domain::composer::ComposerVariant;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;
use crate::domain::timeline::ModuleTag;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS, VALID_LOG_LEVELS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let value = normalize_config_value(key, value)?;

    let mut config = store.load().await?;
    apply(&mut config, key, &value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match lookup(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = lookup(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Store a validated value under `key`
fn apply(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "author" => config.author = Some(value.to_string()),
        "module" => config.module = Some(value.to_string()),
        "variant" => config.variant = Some(value.to_string()),
        "max_duration" => config.max_duration = Some(value.to_string()),
        "playback_policy" => config.playback_policy = Some(value.to_string()),
        "log_level" => config.log_level = Some(value.to_string()),
        "notify" => {
            config.notify = Some(
                parse_bool(value).ok_or_else(|| invalid(key, "Value must be 'true' or 'false'"))?,
            )
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn lookup(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "author" => config.author.clone(),
        "module" => config.module.clone(),
        "variant" => config.variant.clone(),
        "max_duration" => config.max_duration.clone(),
        "playback_policy" => config.playback_policy.clone(),
        "notify" => config.notify.map(|b| b.to_string()),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}

/// Validate a config value for its key, returning the form to store
fn normalize_config_value(key: &str, value: &str) -> Result<String, ConfigError> {
    let normalized = match key {
        "author" => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(invalid(key, "Author must not be blank"));
            }
            trimmed.to_string()
        }
        "module" => value
            .parse::<ModuleTag>()
            .map_err(|e| invalid(key, e.to_string()))?
            .to_string(),
        "variant" => value
            .parse::<ComposerVariant>()
            .map_err(|e| invalid(key, e.to_string()))?
            .to_string(),
        "max_duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            value.to_string()
        }
        "playback_policy" => value
            .parse::<PlaybackPolicy>()
            .map_err(|e| invalid(key, e.to_string()))?
            .to_string(),
        "notify" => parse_bool(value)
            .ok_or_else(|| invalid(key, "Value must be 'true' or 'false'"))?
            .to_string(),
        "log_level" => {
            let lower = value.to_lowercase();
            if !VALID_LOG_LEVELS.contains(&lower.as_str()) {
                return Err(invalid(
                    key,
                    format!(
                        "Invalid value '{}'. Valid options: {}",
                        value,
                        VALID_LOG_LEVELS.join(", ")
                    ),
                ));
            }
            lower
        }
        _ => value.to_string(),
    };
    Ok(normalized)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
