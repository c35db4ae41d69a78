//! Configuration port interface

use async_trait::async_trait;
use std::path::Path;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for persisted session preferences (author, module, limits)
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration. A missing file yields an empty config.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the full configuration, creating parent directories.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Where the configuration lives
    fn path(&self) -> &Path;

    fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Write the defaults. Fails if a file already exists.
    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path().to_string_lossy().to_string(),
            ));
        }
        self.save(&AppConfig::defaults()).await
    }
}
