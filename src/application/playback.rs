//! Playback controller use case
//!
//! Plays one artifact at a time through an injected audio output. The
//! controller only ever holds a transient playback handle; the artifact
//! itself stays with the draft or the timeline.

use tracing::{debug, info, warn};

use super::ports::{AudioOutput, PlaybackError, PlaybackHandle};
use super::status::{Status, StatusChannel};
use crate::domain::audio::{AudioArtifact, PlaybackPolicy};

pub struct PlaybackController<O>
where
    O: AudioOutput,
{
    output: O,
    policy: PlaybackPolicy,
    active: Option<Box<dyn PlaybackHandle>>,
    status: StatusChannel,
}

impl<O> PlaybackController<O>
where
    O: AudioOutput,
{
    pub fn new(output: O, status: StatusChannel) -> Self {
        Self {
            output,
            policy: PlaybackPolicy::default(),
            active: None,
            status,
        }
    }

    /// Choose what `play` does while something is already playing
    pub fn with_policy(mut self, policy: PlaybackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PlaybackPolicy {
        self.policy
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Start playing `artifact`.
    ///
    /// Returns `Ok(false)` when the `ignore` policy left the current
    /// playback untouched. A decode failure leaves the controller idle.
    pub async fn play(&mut self, artifact: &AudioArtifact) -> Result<bool, PlaybackError> {
        if self.is_playing() {
            match self.policy {
                PlaybackPolicy::Ignore => {
                    debug!("play ignored, already playing");
                    return Ok(false);
                }
                PlaybackPolicy::Restart => {
                    debug!("restarting playback");
                    self.release();
                }
            }
        }

        match self.output.open(artifact).await {
            Ok(handle) => {
                self.active = Some(handle);
                info!(
                    mime = %artifact.mime_type(),
                    bytes = artifact.size_bytes(),
                    "playback started"
                );
                self.status.publish(Status::PlaybackStarted);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "playback failed");
                self.status.publish(Status::PlaybackFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Stop when playing, play otherwise
    pub async fn toggle(&mut self, artifact: &AudioArtifact) -> Result<bool, PlaybackError> {
        if self.stop() {
            return Ok(false);
        }
        self.play(artifact).await
    }

    /// Halt playback and release the output. Returns whether anything was playing.
    pub fn stop(&mut self) -> bool {
        if !self.release() {
            return false;
        }
        self.status.publish(Status::PlaybackStopped);
        true
    }

    /// Resolve when the active playback reaches its natural end.
    /// Never resolves while idle.
    pub async fn next_end(&mut self) {
        match self.active.as_mut() {
            Some(handle) => handle.finished().await,
            None => std::future::pending().await,
        }
    }

    /// Return to idle after [`PlaybackController::next_end`] resolved
    pub fn handle_end(&mut self) {
        if self.release() {
            debug!("playback reached end");
            self.status.publish(Status::PlaybackFinished);
        }
    }

    fn release(&mut self) -> bool {
        match self.active.take() {
            Some(mut handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }
}

impl<O> Drop for PlaybackController<O>
where
    O: AudioOutput,
{
    fn drop(&mut self) {
        if self.release() {
            debug!("playback released on teardown");
        }
    }
}
