//! Notification infrastructure adapters
//!
//! Mirrors status messages to the desktop when enabled.

mod noop;
mod notify_rust;

pub use noop::NoOpNotifier;
pub use notify_rust::{NotifyRustNotifier, APP_NAME};

use crate::application::ports::Notifier;

/// Create a notifier based on whether desktop notifications are enabled
pub fn create_notifier(enabled: bool) -> Box<dyn Notifier> {
    if enabled {
        Box::new(NotifyRustNotifier::new())
    } else {
        Box::new(NoOpNotifier::new())
    }
}
