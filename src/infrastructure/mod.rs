//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, rodio, the desktop notifier and the filesystem.

pub mod capture;
pub mod clock;
pub mod config;
pub mod notification;
pub mod playback;

// Re-export adapters
pub use capture::CpalCapture;
pub use clock::SystemClock;
pub use config::XdgConfigStore;
pub use notification::{create_notifier, NoOpNotifier, NotifyRustNotifier};
pub use playback::RodioOutput;
