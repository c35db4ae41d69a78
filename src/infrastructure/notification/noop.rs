//! No-op notifier
//!
//! Used when desktop notifications are disabled.

use async_trait::async_trait;

use crate::application::ports::{Notice, NotificationError, Notifier};

/// Notifier that shows nothing
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _notice: &Notice) -> Result<(), NotificationError> {
        Ok(())
    }
}
