//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder, playback and composer use cases and the
//! trait definitions for capture, output, clock and config.

pub mod composer;
pub mod playback;
pub mod ports;
pub mod recorder;
pub mod status;
pub mod ticker;

#[cfg(test)]
pub(crate) mod testing;

// Re-export use cases
pub use composer::{
    Composer, ComposerError, ComposerEvent, ComposerOptions, ComposerSnapshot, PlaybackSource,
    SessionContext,
};
pub use playback::PlaybackController;
pub use recorder::{RecorderError, RecorderEvent, RecorderSession};
pub use status::{Severity, Status, StatusChannel};
pub use ticker::{Ticker, TICK_PERIOD};
