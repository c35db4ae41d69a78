//! Observable status channel
//!
//! Recorder, playback and composer report expected conditions here instead
//! of failing across their public contract, so a view can announce them.

use std::fmt;

use tokio::sync::broadcast;

use crate::domain::recording::Duration;
use crate::domain::timeline::{EntryId, EntryKind};

/// How a status should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, user-facing status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    RecordingStarted,
    RecordingStopped { duration: Duration },
    RecordingDiscarded,
    MaxDurationReached { limit: Duration },
    CaptureUnavailable { reason: String },
    AlreadyRecording,
    PlaybackStarted,
    PlaybackFinished,
    PlaybackStopped,
    PlaybackFailed { reason: String },
    EntryAdded { id: EntryId, kind: EntryKind },
    DraftEmpty,
}

impl Status {
    pub fn severity(&self) -> Severity {
        match self {
            Self::RecordingStarted
            | Self::RecordingDiscarded
            | Self::PlaybackStarted
            | Self::PlaybackFinished
            | Self::PlaybackStopped => Severity::Info,
            Self::RecordingStopped { .. } | Self::EntryAdded { .. } => Severity::Success,
            Self::MaxDurationReached { .. } | Self::AlreadyRecording | Self::DraftEmpty => {
                Severity::Warning
            }
            Self::CaptureUnavailable { .. } | Self::PlaybackFailed { .. } => Severity::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::RecordingStarted => {
                "Recording started. Speak clearly close to the microphone.".to_string()
            }
            Self::RecordingStopped { duration } => {
                format!("Recording finished ({})", duration.clock())
            }
            Self::RecordingDiscarded => "Recording discarded".to_string(),
            Self::MaxDurationReached { limit } => {
                format!("Maximum recording length reached ({}), stopping", limit.clock())
            }
            Self::CaptureUnavailable { reason } => format!(
                "Could not access the microphone. Check the permissions. ({})",
                reason
            ),
            Self::AlreadyRecording => "A recording is already in progress".to_string(),
            Self::PlaybackStarted => "Playing audio".to_string(),
            Self::PlaybackFinished => "Playback finished".to_string(),
            Self::PlaybackStopped => "Playback stopped".to_string(),
            Self::PlaybackFailed { reason } => format!("Cannot play this audio: {}", reason),
            Self::EntryAdded { id, kind } => {
                format!("Entry #{} ({}) added to the timeline", id, kind)
            }
            Self::DraftEmpty => "Type a note or record audio before sending".to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Default buffer for slow subscribers before they start lagging
pub const STATUS_CAPACITY: usize = 64;

/// Broadcast sender shared by the components of one composer
#[derive(Debug, Clone)]
pub struct StatusChannel {
    tx: broadcast::Sender<Status>,
}

impl StatusChannel {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(STATUS_CAPACITY);
        Self { tx }
    }

    /// Publish a status. Having no subscriber is not an error.
    pub fn publish(&self, status: Status) {
        match status.severity() {
            Severity::Info | Severity::Success => tracing::info!(status = %status, "status"),
            Severity::Warning => tracing::warn!(status = %status, "status"),
            Severity::Error => tracing::error!(status = %status, "status"),
        }
        let _ = self.tx.send(status);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Status> {
        self.tx.subscribe()
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new()
    }
}
