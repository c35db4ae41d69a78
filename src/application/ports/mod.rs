//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod clock;
pub mod config;
pub mod notifier;
pub mod playback;

// Re-export common types
pub use capture::{
    CaptureCapability, CaptureConfig, CaptureDevice, CaptureError, CaptureStream,
    CAPTURE_SAMPLE_RATE,
};
pub use clock::Clock;
pub use config::ConfigStore;
pub use notifier::{Notice, NotificationError, Notifier, Urgency};
pub use playback::{AudioOutput, PlaybackError, PlaybackHandle};
