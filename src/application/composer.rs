//! Composer use case
//!
//! Ties one recorder, one playback controller, the draft and the timeline
//! together. Finished recordings move into the draft; submitting the draft
//! moves its content into the timeline.

use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::playback::PlaybackController;
use super::ports::{AudioOutput, CaptureDevice, Clock, PlaybackError};
use super::recorder::{RecorderError, RecorderEvent, RecorderSession};
use super::status::{Status, StatusChannel};
use crate::domain::audio::{AudioArtifact, PlaybackPolicy};
use crate::domain::composer::{ComposerVariant, Draft};
use crate::domain::error::ValidationError;
use crate::domain::recording::{Duration, RecorderState};
use crate::domain::timeline::{EntryId, ModuleTag, Timeline};

/// Errors surfaced by composer commands
#[derive(Debug, Error)]
pub enum ComposerError {
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No timeline entry #{0}")]
    NoSuchEntry(EntryId),

    #[error("Entry #{0} has no audio")]
    NotAudio(EntryId),

    #[error("The draft has no audio attached")]
    NoDraftAudio,
}

/// Who is writing, and where. Supplied by the surrounding session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub author: String,
    pub module: ModuleTag,
}

impl SessionContext {
    pub fn new(author: impl Into<String>, module: ModuleTag) -> Self {
        Self {
            author: author.into(),
            module,
        }
    }
}

/// Tunables for a composer instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposerOptions {
    pub variant: ComposerVariant,
    pub max_duration: Option<Duration>,
    pub playback_policy: PlaybackPolicy,
}

/// What the playback controller is currently reading from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSource {
    Draft,
    Entry(EntryId),
}

/// Something the event loop must hand back to [`Composer::handle_event`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEvent {
    Recorder(RecorderEvent),
    PlaybackEnded,
}

/// Observable state for a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerSnapshot {
    pub capture_available: bool,
    pub recorder_state: RecorderState,
    pub elapsed: Duration,
    pub playing: Option<PlaybackSource>,
    pub text: String,
    pub char_count: usize,
    pub max_chars: usize,
    pub has_artifact: bool,
    pub can_commit: bool,
    pub entry_count: usize,
}

pub struct Composer<D, O, C>
where
    D: CaptureDevice,
    O: AudioOutput,
    C: Clock,
{
    recorder: RecorderSession<D>,
    playback: PlaybackController<O>,
    playing: Option<PlaybackSource>,
    draft: Draft,
    timeline: Timeline,
    clock: C,
    context: SessionContext,
    status: StatusChannel,
}

impl<D, O, C> Composer<D, O, C>
where
    D: CaptureDevice,
    O: AudioOutput,
    C: Clock,
{
    pub fn new(
        device: D,
        output: O,
        clock: C,
        context: SessionContext,
        options: ComposerOptions,
    ) -> Self {
        let status = StatusChannel::new();

        let mut recorder = RecorderSession::new(device, status.clone());
        if let Some(limit) = options.max_duration {
            recorder = recorder.with_max_duration(limit);
        }
        let playback =
            PlaybackController::new(output, status.clone()).with_policy(options.playback_policy);

        Self {
            recorder,
            playback,
            playing: None,
            draft: Draft::for_variant(options.variant),
            timeline: Timeline::new(),
            clock,
            context,
            status,
        }
    }

    /// Seed the timeline with pre-existing entries
    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Status> {
        self.status.subscribe()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn recorder(&self) -> &RecorderSession<D> {
        &self.recorder
    }

    pub fn is_capture_available(&self) -> bool {
        self.recorder.is_capture_available()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Current playback source, if anything is playing
    pub fn now_playing(&self) -> Option<PlaybackSource> {
        self.playing.filter(|_| self.playback.is_playing())
    }

    pub fn snapshot(&self) -> ComposerSnapshot {
        ComposerSnapshot {
            capture_available: self.is_capture_available(),
            recorder_state: self.recorder.state(),
            elapsed: self.recorder.elapsed(),
            playing: self.now_playing(),
            text: self.draft.text().to_string(),
            char_count: self.draft.char_count(),
            max_chars: self.draft.max_chars(),
            has_artifact: self.draft.has_artifact(),
            can_commit: self.draft.can_commit(),
            entry_count: self.timeline.len(),
        }
    }

    // Draft

    /// Store draft text, clamped to the variant's limit. Returns whether it was truncated.
    pub fn set_text(&mut self, text: &str) -> bool {
        let truncated = self.draft.set_text(text);
        if truncated {
            debug!(max = self.draft.max_chars(), "draft text truncated");
        }
        truncated
    }

    /// Attach audio to the draft, replacing any earlier attachment
    pub fn attach_artifact(&mut self, artifact: AudioArtifact) -> Option<AudioArtifact> {
        self.stop_draft_playback();
        self.draft.attach_artifact(artifact)
    }

    /// Drop the draft audio, stopping it first if it is playing
    pub fn clear_artifact(&mut self) -> Option<AudioArtifact> {
        self.stop_draft_playback();
        self.draft.clear_artifact()
    }

    pub fn can_commit(&self) -> bool {
        self.draft.can_commit()
    }

    /// Commit the draft with an explicit author, module and timestamp.
    /// An empty draft is rejected with nothing changed.
    pub fn commit(
        &mut self,
        author: &str,
        module: &ModuleTag,
        now: DateTime<Local>,
    ) -> Result<EntryId, ValidationError> {
        let entry = match self.draft.commit(author, module, now) {
            Ok(entry) => entry,
            Err(e) => {
                self.status.publish(Status::DraftEmpty);
                return Err(e);
            }
        };

        let kind = entry.kind();
        let id = self.timeline.prepend(entry);
        if self.playing == Some(PlaybackSource::Draft) {
            self.playing = Some(PlaybackSource::Entry(id));
        }

        info!(%id, %kind, module = %module, "entry committed");
        self.status.publish(Status::EntryAdded { id, kind });
        Ok(id)
    }

    /// Commit the draft as the session's author and module, stamped now
    pub fn submit(&mut self) -> Result<EntryId, ValidationError> {
        let SessionContext { author, module } = self.context.clone();
        let now = self.clock.now();
        self.commit(&author, &module, now)
    }

    // Recording

    pub async fn start_recording(&mut self) -> Result<(), ComposerError> {
        self.recorder.start_recording().await?;
        Ok(())
    }

    /// Stop recording and move the result into the draft
    pub fn stop_recording(&mut self) -> Option<&AudioArtifact> {
        self.recorder.stop_recording();
        self.collect_recording();
        self.draft.artifact()
    }

    /// Drop the recording in progress and any audio attached to the draft
    pub fn discard_recording(&mut self) -> bool {
        let recorder_held = self.recorder.discard();
        let draft_held = self.clear_artifact().is_some();

        if draft_held && !recorder_held {
            self.status.publish(Status::RecordingDiscarded);
        }
        recorder_held || draft_held
    }

    fn collect_recording(&mut self) {
        if self.recorder.state() != RecorderState::Ready {
            return;
        }
        if let Some(artifact) = self.recorder.take_artifact() {
            debug!(bytes = artifact.size_bytes(), "recording attached to draft");
            self.attach_artifact(artifact);
        }
    }

    // Playback

    pub async fn play_draft(&mut self) -> Result<bool, ComposerError> {
        let artifact = self.draft.artifact().ok_or(ComposerError::NoDraftAudio)?;
        let started = self.playback.play(artifact).await?;
        if started {
            self.playing = Some(PlaybackSource::Draft);
        }
        Ok(started)
    }

    /// Play a committed audio entry. The timeline is not modified.
    pub async fn play_entry(&mut self, id: EntryId) -> Result<bool, ComposerError> {
        let entry = self
            .timeline
            .get(id)
            .ok_or(ComposerError::NoSuchEntry(id))?;
        let artifact = entry.artifact().ok_or(ComposerError::NotAudio(id))?;

        let started = self.playback.play(artifact).await?;
        if started {
            self.playing = Some(PlaybackSource::Entry(id));
        }
        Ok(started)
    }

    /// Stop when playing, otherwise play the draft audio
    pub async fn toggle_draft(&mut self) -> Result<bool, ComposerError> {
        if self.stop_playback() {
            return Ok(false);
        }
        self.play_draft().await
    }

    /// Stop when playing, otherwise play entry `id`
    pub async fn toggle_entry(&mut self, id: EntryId) -> Result<bool, ComposerError> {
        if self.stop_playback() {
            return Ok(false);
        }
        self.play_entry(id).await
    }

    pub fn stop_playback(&mut self) -> bool {
        self.playing = None;
        self.playback.stop()
    }

    fn stop_draft_playback(&mut self) {
        if self.now_playing() == Some(PlaybackSource::Draft) {
            self.stop_playback();
        }
    }

    // Event loop

    /// Wait for the next recorder event or end of playback
    pub async fn next_event(&mut self) -> ComposerEvent {
        tokio::select! {
            event = self.recorder.next_event() => ComposerEvent::Recorder(event),
            _ = self.playback.next_end() => ComposerEvent::PlaybackEnded,
        }
    }

    pub fn handle_event(&mut self, event: ComposerEvent) {
        match event {
            ComposerEvent::Recorder(event) => {
                self.recorder.handle_event(event);
                // Auto-stop and device loss both end in READY
                self.collect_recording();
            }
            ComposerEvent::PlaybackEnded => {
                self.playing = None;
                self.playback.handle_end();
            }
        }
    }

    /// Release the device and any playback. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.recorder.teardown();
        self.playing = None;
        self.playback.stop();
    }
}
