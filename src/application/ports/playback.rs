//! Audio playback port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioArtifact;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    /// The artifact could not be decoded
    #[error("Cannot decode audio: {0}")]
    Decode(String),

    /// No audio output device available
    #[error("Audio output not available: {0}")]
    OutputUnavailable(String),
}

/// Port that turns an artifact into a live playback
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Decode the artifact and start playing it.
    ///
    /// On error nothing is left playing and no handle is held.
    async fn open(&self, artifact: &AudioArtifact) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}

/// A live playback resource
#[async_trait]
pub trait PlaybackHandle: Send {
    /// Resolve when playback reaches the end of the audio.
    ///
    /// Must be cancel-safe: the controller races it against other events.
    async fn finished(&mut self);

    /// Halt playback and release the output immediately. Idempotent.
    fn stop(&mut self);
}
