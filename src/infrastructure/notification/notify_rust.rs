//! Desktop notices through notify-rust

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::application::ports::{Notice, NotificationError, Notifier, Urgency};

/// Application name shown by the notification daemon
pub const APP_NAME: &str = "Voice Timeline";

/// How long a non-critical notice stays on screen
const NOTICE_TIMEOUT_MS: u32 = 4_000;

pub struct NotifyRustNotifier {
    app_name: String,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self::with_app_name(APP_NAME)
    }

    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    fn build(&self, notice: &Notice) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&self.app_name)
            .body(&notice.body)
            .icon(notice.icon);

        match notice.urgency {
            Urgency::Critical => notification.timeout(Timeout::Never),
            Urgency::Low | Urgency::Normal => {
                notification.timeout(Timeout::Milliseconds(NOTICE_TIMEOUT_MS))
            }
        };

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification.urgency(match notice.urgency {
                Urgency::Low => notify_rust::Urgency::Low,
                Urgency::Normal => notify_rust::Urgency::Normal,
                Urgency::Critical => notify_rust::Urgency::Critical,
            });
            if notice.transient {
                notification.hint(notify_rust::Hint::Transient(true));
            }
        }

        notification
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        let notification = self.build(notice);

        // May block on D-Bus
        tokio::task::spawn_blocking(move || {
            notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("notification task failed: {}", e)))?
    }
}
