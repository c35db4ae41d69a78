//! Desktop notice port
//!
//! Status messages can be mirrored outside the terminal. A [`Notice`] is
//! the adapter-neutral form of one status.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::status::{Severity, Status};

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// How insistently a notice should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    Critical,
}

/// One status rendered for a notification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub body: String,
    /// freedesktop icon name
    pub icon: &'static str,
    pub urgency: Urgency,
    /// Replaces the previous notice instead of stacking under it
    pub transient: bool,
}

impl Notice {
    pub fn from_status(status: &Status) -> Self {
        let icon = match status {
            Status::RecordingStarted | Status::MaxDurationReached { .. } => {
                "audio-input-microphone"
            }
            Status::PlaybackStarted | Status::PlaybackFinished | Status::PlaybackStopped => {
                "audio-speakers"
            }
            other => match other.severity() {
                Severity::Info => "dialog-information",
                Severity::Success => "dialog-ok",
                Severity::Warning => "dialog-warning",
                Severity::Error => "dialog-error",
            },
        };
        let urgency = match status.severity() {
            Severity::Info => Urgency::Low,
            Severity::Success | Severity::Warning => Urgency::Normal,
            Severity::Error => Urgency::Critical,
        };

        Self {
            body: status.message(),
            icon,
            urgency,
            transient: urgency != Urgency::Critical,
        }
    }
}

impl From<&Status> for Notice {
    fn from(status: &Status) -> Self {
        Self::from_status(status)
    }
}

/// Port for announcing status messages outside the terminal
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError>;
}

#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        self.as_ref().notify(notice).await
    }
}
