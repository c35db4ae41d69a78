//! Audio capture port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioMimeType;

/// Sample rate requested from the capture device
pub const CAPTURE_SAMPLE_RATE: u32 = 44_100;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to start capture: {0}")]
    StartFailed(String),
}

/// Fixed configuration requested on every acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            sample_rate: CAPTURE_SAMPLE_RATE,
            channels: 1,
        }
    }
}

/// Port answering whether audio capture exists on this platform at all.
/// A pure query: no device is opened.
pub trait CaptureCapability: Send + Sync {
    fn is_capture_available(&self) -> bool;
}

/// Port for acquiring exclusive access to the capture device
#[async_trait]
pub trait CaptureDevice: CaptureCapability {
    /// Open the device with the given configuration.
    ///
    /// # Returns
    /// A live stream that delivers chunks until released
    async fn acquire(&self, config: &CaptureConfig) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// A live, exclusively-held capture stream
#[async_trait]
pub trait CaptureStream: Send {
    /// Wait for the next chunk of encoded audio.
    /// Returns `None` once the device stops delivering.
    ///
    /// Must be cancel-safe: the recorder races it against its ticker.
    async fn next_chunk(&mut self) -> Option<Vec<u8>>;

    /// Take a chunk the device has already delivered, without waiting
    fn try_next_chunk(&mut self) -> Option<Vec<u8>>;

    /// Encoding of the chunks this stream delivers
    fn mime_type(&self) -> AudioMimeType;

    /// Stop the device and release it. Idempotent.
    fn release(&mut self);
}
