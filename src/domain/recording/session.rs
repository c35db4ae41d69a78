//! Recording session state machine

use std::fmt;
use thiserror::Error;

use super::Duration;
use crate::domain::audio::{AudioArtifact, AudioMimeType};

/// Recorder lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Acquiring,
    Recording,
    Finalizing,
    Ready,
    AcquireFailed,
}

impl RecorderState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Recording => "recording",
            Self::Finalizing => "finalizing",
            Self::Ready => "ready",
            Self::AcquireFailed => "acquire-failed",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: RecorderState,
    pub action: String,
}

/// Recording session entity.
/// Owns the elapsed counter, the chunk buffer and, once finalized, the artifact.
///
/// State machine:
///   IDLE -> ACQUIRING (begin_acquire)
///   ACQUIRING -> RECORDING (acquired)
///   ACQUIRING -> ACQUIRE_FAILED (acquire_failed)
///   ACQUIRE_FAILED -> IDLE (reset_after_failure)
///   RECORDING -> FINALIZING (begin_finalize)
///   FINALIZING -> READY (finalize)
///   READY -> IDLE (take_artifact)
///   any -> IDLE (discard)
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: RecorderState,
    elapsed_secs: u64,
    chunks: Vec<Vec<u8>>,
    artifact: Option<AudioArtifact>,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == RecorderState::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Seconds counted by the ticker so far
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs(self.elapsed_secs)
    }

    /// Number of chunks buffered for the current recording
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Bytes buffered for the current recording
    pub fn buffered_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// The finalized artifact, present only in READY
    pub fn artifact(&self) -> Option<&AudioArtifact> {
        self.artifact.as_ref()
    }

    fn expect_state(
        &self,
        expected: RecorderState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != expected {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        Ok(())
    }

    /// Transition from IDLE to ACQUIRING
    pub fn begin_acquire(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect_state(RecorderState::Idle, "start recording")?;
        self.state = RecorderState::Acquiring;
        Ok(())
    }

    /// Transition from ACQUIRING to RECORDING, starting from a clean buffer
    pub fn acquired(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect_state(RecorderState::Acquiring, "enter recording")?;
        self.state = RecorderState::Recording;
        self.elapsed_secs = 0;
        self.chunks.clear();
        Ok(())
    }

    /// Transition from ACQUIRING to ACQUIRE_FAILED
    pub fn acquire_failed(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect_state(RecorderState::Acquiring, "fail acquisition")?;
        self.state = RecorderState::AcquireFailed;
        Ok(())
    }

    /// Transition from ACQUIRE_FAILED back to IDLE
    pub fn reset_after_failure(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect_state(RecorderState::AcquireFailed, "reset after failure")?;
        self.state = RecorderState::Idle;
        self.elapsed_secs = 0;
        Ok(())
    }

    /// Buffer a device chunk. Only non-empty chunks delivered while
    /// RECORDING are kept; anything else is dropped.
    ///
    /// Returns whether the chunk was appended.
    pub fn append_chunk(&mut self, chunk: Vec<u8>) -> bool {
        if self.state != RecorderState::Recording || chunk.is_empty() {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    /// Advance the elapsed counter by one second while RECORDING.
    ///
    /// Returns the new elapsed value, or `None` if the tick was ignored.
    pub fn tick(&mut self) -> Option<Duration> {
        if self.state != RecorderState::Recording {
            return None;
        }
        self.elapsed_secs += 1;
        Some(self.elapsed())
    }

    /// Transition from RECORDING to FINALIZING. Elapsed time freezes here.
    pub fn begin_finalize(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect_state(RecorderState::Recording, "stop recording")?;
        self.state = RecorderState::Finalizing;
        Ok(())
    }

    /// Transition from FINALIZING to READY, concatenating the buffered chunks
    pub fn finalize(
        &mut self,
        mime_type: AudioMimeType,
    ) -> Result<&AudioArtifact, InvalidStateTransition> {
        self.expect_state(RecorderState::Finalizing, "finalize recording")?;
        let chunks = std::mem::take(&mut self.chunks);
        let artifact = AudioArtifact::from_chunks(chunks, mime_type, self.elapsed());
        self.state = RecorderState::Ready;
        Ok(self.artifact.insert(artifact))
    }

    /// Hand the finalized artifact to its new owner, READY -> IDLE
    pub fn take_artifact(&mut self) -> Option<AudioArtifact> {
        if self.state != RecorderState::Ready {
            return None;
        }
        self.state = RecorderState::Idle;
        self.elapsed_secs = 0;
        self.artifact.take()
    }

    /// Drop everything held and return to IDLE. Safe from any state.
    ///
    /// Returns whether anything was actually released.
    pub fn discard(&mut self) -> bool {
        let held = self.state != RecorderState::Idle
            || self.artifact.is_some()
            || !self.chunks.is_empty()
            || self.elapsed_secs != 0;

        self.state = RecorderState::Idle;
        self.elapsed_secs = 0;
        self.chunks.clear();
        self.artifact = None;
        held
    }
}
