//! Audio artifact value object

use std::fmt;
use std::sync::Arc;

use crate::domain::recording::Duration;

/// Codec/container tag attached to an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    WebmOpus,
    Webm,
    Ogg,
    Wav,
    Mpeg,
    /// Raw little-endian 16-bit linear PCM
    L16 { sample_rate: u32, channels: u16 },
}

impl AudioMimeType {
    /// Get the MIME essence (type/subtype, no parameters)
    pub const fn essence(&self) -> &'static str {
        match self {
            Self::WebmOpus | Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Mpeg => "audio/mpeg",
            Self::L16 { .. } => "audio/L16",
        }
    }

    /// Whether the payload is headerless PCM rather than a container
    pub const fn is_raw_pcm(&self) -> bool {
        matches!(self, Self::L16 { .. })
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebmOpus => write!(f, "audio/webm;codecs=opus"),
            Self::L16 {
                sample_rate,
                channels,
            } => write!(f, "audio/L16;rate={};channels={}", sample_rate, channels),
            other => write!(f, "{}", other.essence()),
        }
    }
}

impl Default for AudioMimeType {
    fn default() -> Self {
        Self::WebmOpus
    }
}

/// A finalized recording. Immutable once built.
///
/// Deliberately not `Clone`: an artifact moves from the recorder to a draft
/// and from the draft to a timeline entry, never duplicated. Playback reads
/// it through [`AudioArtifact::playback_source`].
#[derive(Debug)]
pub struct AudioArtifact {
    data: Arc<[u8]>,
    mime_type: AudioMimeType,
    duration: Duration,
}

impl AudioArtifact {
    /// Create an artifact from an owned buffer
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType, duration: Duration) -> Self {
        Self {
            data: data.into(),
            mime_type,
            duration,
        }
    }

    /// Concatenate chunks, in order, into a single artifact
    pub fn from_chunks<I>(chunks: I, mime_type: AudioMimeType, duration: Duration) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let data: Vec<u8> = chunks.into_iter().flatten().collect();
        Self::new(data, mime_type, duration)
    }

    /// Get the raw payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Transient read handle on the payload for a playback backend.
    /// Holding it does not confer ownership of the artifact.
    pub fn playback_source(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Recorded length
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload holds no audio at all
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Render as a `data:` URL for a web view or JSON export
    pub fn to_data_url(&self) -> String {
        use base64::Engine;
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}
