//! Domain layer - Core business logic
//!
//! Contains value objects, entities, state machines and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod composer;
pub mod config;
pub mod error;
pub mod recording;
pub mod timeline;

// Re-export common types
pub use audio::{AudioArtifact, AudioMimeType, PlaybackPolicy};
pub use composer::{ComposerVariant, Draft, AUDIO_PLACEHOLDER_CAPTION};
pub use config::AppConfig;
pub use error::*;
pub use recording::{Duration, RecorderState, RecordingSession};
pub use timeline::{EntryId, EntryKind, ModuleTag, Timeline, TimelineEntry};
