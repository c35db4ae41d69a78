//! Recorder use case
//!
//! Drives the recording state machine against an injected capture device,
//! owning the device stream and the one-second ticker for the lifetime of
//! a single recording.

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::ports::{CaptureConfig, CaptureDevice, CaptureStream};
use super::status::{Status, StatusChannel};
use super::ticker::Ticker;
use crate::domain::audio::AudioArtifact;
use crate::domain::recording::{Duration, InvalidStateTransition, RecorderState, RecordingSession};

/// Errors from the recorder use case
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Audio capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("A recording is already in progress (state: {0})")]
    AlreadyRecording(RecorderState),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// Something the recorder must react to while recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    Chunk(Vec<u8>),
    Tick,
    DeviceLost,
}

/// One recorder per composer. At most one recording at a time.
pub struct RecorderSession<D>
where
    D: CaptureDevice,
{
    device: D,
    config: CaptureConfig,
    max_duration: Option<Duration>,
    session: RecordingSession,
    stream: Option<Box<dyn CaptureStream>>,
    ticker: Option<Ticker>,
    status: StatusChannel,
}

impl<D> RecorderSession<D>
where
    D: CaptureDevice,
{
    /// Create an idle recorder over a capture device
    pub fn new(device: D, status: StatusChannel) -> Self {
        Self {
            device,
            config: CaptureConfig::default(),
            max_duration: None,
            session: RecordingSession::new(),
            stream: None,
            ticker: None,
            status,
        }
    }

    /// Auto-stop once a recording reaches `limit`
    pub fn with_max_duration(mut self, limit: Duration) -> Self {
        self.max_duration = Some(limit);
        self
    }

    /// Capability guard: whether the record affordance should be enabled
    pub fn is_capture_available(&self) -> bool {
        self.device.is_capture_available()
    }

    pub fn state(&self) -> RecorderState {
        self.session.state()
    }

    pub fn elapsed(&self) -> Duration {
        self.session.elapsed()
    }

    /// The finalized artifact, present only in READY
    pub fn artifact(&self) -> Option<&AudioArtifact> {
        self.session.artifact()
    }

    /// Whether the capture device is currently held open
    pub fn holds_device(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether the elapsed-time ticker is running
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Acquire the device and begin recording.
    ///
    /// Rejected without touching the device when not idle or when capture
    /// is unavailable. A failed acquisition returns to idle without retry.
    pub async fn start_recording(&mut self) -> Result<(), RecorderError> {
        if !self.session.is_idle() {
            let state = self.session.state();
            debug!(%state, "start ignored, recorder busy");
            self.status.publish(Status::AlreadyRecording);
            return Err(RecorderError::AlreadyRecording(state));
        }

        if !self.device.is_capture_available() {
            let reason = "no audio input on this platform".to_string();
            self.status.publish(Status::CaptureUnavailable {
                reason: reason.clone(),
            });
            return Err(RecorderError::CaptureUnavailable(reason));
        }

        self.session.begin_acquire()?;
        debug!(config = ?self.config, "acquiring capture device");

        match self.device.acquire(&self.config).await {
            Ok(stream) => {
                self.session.acquired()?;
                self.stream = Some(stream);
                self.ticker = Some(Ticker::every_second());
                info!("recording started");
                self.status.publish(Status::RecordingStarted);
                Ok(())
            }
            Err(e) => {
                self.session.acquire_failed()?;
                warn!(error = %e, "capture acquisition failed");
                self.session.reset_after_failure()?;

                let reason = e.to_string();
                self.status.publish(Status::CaptureUnavailable {
                    reason: reason.clone(),
                });
                Err(RecorderError::CaptureUnavailable(reason))
            }
        }
    }

    /// Wait for the next chunk or tick. Never resolves unless recording.
    pub async fn next_event(&mut self) -> RecorderEvent {
        let (Some(stream), Some(ticker)) = (self.stream.as_mut(), self.ticker.as_mut()) else {
            return std::future::pending().await;
        };

        tokio::select! {
            chunk = stream.next_chunk() => match chunk {
                Some(chunk) => RecorderEvent::Chunk(chunk),
                None => RecorderEvent::DeviceLost,
            },
            _ = ticker.tick() => RecorderEvent::Tick,
        }
    }

    /// Apply an event produced by [`RecorderSession::next_event`]
    pub fn handle_event(&mut self, event: RecorderEvent) {
        match event {
            RecorderEvent::Chunk(chunk) => {
                self.on_chunk(chunk);
            }
            RecorderEvent::Tick => {
                self.on_tick();
            }
            RecorderEvent::DeviceLost => {
                warn!("capture stream ended while recording, finalizing");
                self.stop_recording();
            }
        }
    }

    /// Buffer a device chunk. Chunks arriving outside RECORDING, including
    /// any that race a stop, are dropped.
    pub fn on_chunk(&mut self, chunk: Vec<u8>) -> bool {
        let len = chunk.len();
        let appended = self.session.append_chunk(chunk);
        if !appended {
            trace!(len, state = %self.session.state(), "chunk dropped");
        }
        appended
    }

    /// Count one elapsed second. Returns the new elapsed time, or `None`
    /// when not recording.
    pub fn on_tick(&mut self) -> Option<Duration> {
        let elapsed = self.session.tick()?;
        trace!(elapsed = elapsed.as_secs(), "tick");

        if let Some(limit) = self.max_duration {
            if elapsed >= limit {
                self.status.publish(Status::MaxDurationReached { limit });
                self.stop_recording();
            }
        }
        Some(elapsed)
    }

    /// Stop capturing and finalize the buffered chunks into an artifact.
    /// A no-op outside RECORDING.
    pub fn stop_recording(&mut self) -> Option<&AudioArtifact> {
        if !self.session.is_recording() {
            debug!(state = %self.session.state(), "stop ignored, not recording");
            return None;
        }

        // Chunks delivered before the stop belong to the recording
        self.drain_delivered();
        if let Err(e) = self.session.begin_finalize() {
            warn!(error = %e, "cannot finalize");
            return None;
        }

        self.ticker = None;
        let mime_type = self.release_device().unwrap_or_default();
        let chunks = self.session.chunk_count();

        if let Err(e) = self.session.finalize(mime_type) {
            warn!(error = %e, "finalize failed");
            return None;
        }

        let duration = self.session.elapsed();
        info!(chunks, duration = duration.as_secs(), %mime_type, "recording finalized");
        self.status.publish(Status::RecordingStopped { duration });
        self.session.artifact()
    }

    /// Move the finalized artifact out, returning the recorder to idle
    pub fn take_artifact(&mut self) -> Option<AudioArtifact> {
        self.session.take_artifact()
    }

    /// Drop any recording or artifact and return to idle. Idempotent.
    ///
    /// Returns whether there was anything to drop.
    pub fn discard(&mut self) -> bool {
        self.ticker = None;
        let held_device = self.release_device().is_some();
        let held_data = self.session.discard();

        if held_device || held_data {
            info!("recording discarded");
            self.status.publish(Status::RecordingDiscarded);
        }
        held_device || held_data
    }

    /// Release everything silently, as on component teardown. Idempotent.
    pub fn teardown(&mut self) {
        self.ticker = None;
        if self.release_device().is_some() {
            debug!("capture device force-released on teardown");
        }
        self.session.discard();
    }

    fn drain_delivered(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        let mut drained = 0usize;
        while let Some(chunk) = stream.try_next_chunk() {
            if self.session.append_chunk(chunk) {
                drained += 1;
            }
        }
        if drained > 0 {
            trace!(drained, "queued chunks appended on stop");
        }
    }

    fn release_device(&mut self) -> Option<crate::domain::audio::AudioMimeType> {
        let mut stream = self.stream.take()?;
        let mime_type = stream.mime_type();
        stream.release();
        debug!("capture device released");
        Some(mime_type)
    }
}

impl<D> Drop for RecorderSession<D>
where
    D: CaptureDevice,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedCapture;
    use std::sync::Arc;

    fn recorder(capture: ScriptedCapture) -> RecorderSession<ScriptedCapture> {
        RecorderSession::new(capture, StatusChannel::new())
    }

    #[tokio::test]
    async fn start_acquires_device_and_ticker() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let status = StatusChannel::new();
        let mut rx = status.subscribe();
        let mut recorder = RecorderSession::new(capture, status);

        recorder.start_recording().await.unwrap();

        assert_eq!(recorder.state(), RecorderState::Recording);
        assert_eq!(recorder.elapsed(), Duration::ZERO);
        assert!(recorder.holds_device());
        assert!(recorder.is_ticking());
        assert_eq!(probe.acquisitions(), 1);
        assert_eq!(rx.try_recv().unwrap(), Status::RecordingStarted);
    }

    #[tokio::test]
    async fn start_while_recording_is_rejected_without_acquisition() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();
        recorder.on_tick();

        let err = recorder.start_recording().await.unwrap_err();
        assert!(matches!(
            err,
            RecorderError::AlreadyRecording(RecorderState::Recording)
        ));
        assert_eq!(probe.acquisitions(), 1);
        assert_eq!(recorder.state(), RecorderState::Recording);
        assert_eq!(recorder.elapsed().as_secs(), 1);
    }

    #[tokio::test]
    async fn start_while_ready_is_rejected() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();
        recorder.stop_recording();

        assert!(recorder.start_recording().await.is_err());
        assert_eq!(probe.acquisitions(), 1);
        assert_eq!(recorder.state(), RecorderState::Ready);
    }

    #[tokio::test]
    async fn unavailable_capture_short_circuits() {
        let capture = ScriptedCapture::unavailable();
        let probe = Arc::clone(&capture.probe);
        let status = StatusChannel::new();
        let mut rx = status.subscribe();
        let mut recorder = RecorderSession::new(capture, status);

        assert!(!recorder.is_capture_available());
        let err = recorder.start_recording().await.unwrap_err();

        assert!(matches!(err, RecorderError::CaptureUnavailable(_)));
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(probe.acquisitions(), 0);
        assert!(matches!(
            rx.try_recv().unwrap(),
            Status::CaptureUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn denied_acquisition_returns_to_idle() {
        let capture = ScriptedCapture::denied();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);

        let err = recorder.start_recording().await.unwrap_err();

        assert!(matches!(err, RecorderError::CaptureUnavailable(_)));
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(probe.acquisitions(), 1);
        assert!(!recorder.holds_device());
        assert!(!recorder.is_ticking());
    }

    #[tokio::test]
    async fn three_ticks_then_stop_yields_three_second_artifact() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();

        for expected in 1..=3 {
            assert_eq!(recorder.on_tick(), Some(Duration::from_secs(expected)));
        }
        let artifact = recorder.stop_recording().unwrap();
        assert_eq!(artifact.duration().as_secs(), 3);

        assert_eq!(recorder.state(), RecorderState::Ready);
        assert!(!recorder.holds_device());
        assert!(!recorder.is_ticking());
        assert_eq!(probe.releases(), 1);

        // Frozen after stop
        assert_eq!(recorder.on_tick(), None);
        assert_eq!(recorder.elapsed().as_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_drives_elapsed_time() {
        let mut recorder = recorder(ScriptedCapture::working());
        recorder.start_recording().await.unwrap();

        for _ in 0..3 {
            let event = recorder.next_event().await;
            assert_eq!(event, RecorderEvent::Tick);
            recorder.handle_event(event);
        }

        assert_eq!(recorder.elapsed().as_secs(), 3);
        let artifact = recorder.stop_recording().unwrap();
        assert_eq!(artifact.duration().as_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn chunks_are_buffered_in_arrival_order() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();

        probe.deliver(&[1, 2]);
        probe.deliver(&[]);
        probe.deliver(&[3]);
        for _ in 0..3 {
            let event = recorder.next_event().await;
            assert!(matches!(event, RecorderEvent::Chunk(_)));
            recorder.handle_event(event);
        }

        let artifact = recorder.stop_recording().unwrap();
        assert_eq!(artifact.data(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn chunks_after_stop_are_not_included() {
        let mut recorder = recorder(ScriptedCapture::working());
        recorder.start_recording().await.unwrap();
        assert!(recorder.on_chunk(vec![1]));
        recorder.stop_recording();

        assert!(!recorder.on_chunk(vec![2]));
        assert_eq!(recorder.artifact().unwrap().data(), &[1]);
    }

    #[tokio::test]
    async fn stop_keeps_chunks_not_yet_polled() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();

        probe.deliver(&[1, 2]);
        probe.deliver(&[3]);
        recorder.stop_recording();

        assert_eq!(recorder.state(), RecorderState::Ready);
        assert_eq!(recorder.artifact().unwrap().data(), &[1, 2, 3]);
        assert_eq!(probe.releases(), 1);
    }

    #[tokio::test]
    async fn max_duration_stop_keeps_queued_chunk() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture).with_max_duration(Duration::from_secs(1));
        recorder.start_recording().await.unwrap();

        assert!(recorder.on_chunk(vec![7]));
        probe.deliver(&[8, 9]);
        assert_eq!(recorder.on_tick(), Some(Duration::from_secs(1)));

        assert_eq!(recorder.state(), RecorderState::Ready);
        assert_eq!(recorder.artifact().unwrap().data(), &[7, 8, 9]);
    }

    #[tokio::test]
    async fn stop_outside_recording_is_noop() {
        let mut recorder = recorder(ScriptedCapture::working());
        assert!(recorder.stop_recording().is_none());
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn discard_twice_releases_once() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();
        recorder.on_tick();

        assert!(recorder.discard());
        assert!(!recorder.discard());

        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(recorder.elapsed(), Duration::ZERO);
        assert!(recorder.artifact().is_none());
        assert!(!recorder.is_ticking());
        assert_eq!(probe.releases(), 1);
    }

    #[tokio::test]
    async fn discard_from_ready_drops_artifact() {
        let mut recorder = recorder(ScriptedCapture::working());
        recorder.start_recording().await.unwrap();
        recorder.on_chunk(vec![5]);
        recorder.stop_recording();

        recorder.discard();
        assert!(recorder.artifact().is_none());
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn discard_when_idle_publishes_nothing() {
        let status = StatusChannel::new();
        let mut rx = status.subscribe();
        let mut recorder = RecorderSession::new(ScriptedCapture::working(), status);

        recorder.discard();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropping_while_recording_releases_device() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();

        drop(recorder);
        assert_eq!(probe.releases(), 1);
    }

    #[tokio::test]
    async fn teardown_is_idempotent() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();

        recorder.teardown();
        recorder.teardown();
        drop(recorder);

        assert_eq!(probe.releases(), 1);
    }

    #[tokio::test]
    async fn lost_device_finalizes_what_was_captured() {
        let capture = ScriptedCapture::working();
        let probe = Arc::clone(&capture.probe);
        let mut recorder = recorder(capture);
        recorder.start_recording().await.unwrap();
        recorder.on_chunk(vec![4, 4]);

        probe.disconnect();
        let event = recorder.next_event().await;
        assert_eq!(event, RecorderEvent::DeviceLost);
        recorder.handle_event(event);

        assert_eq!(recorder.state(), RecorderState::Ready);
        assert_eq!(recorder.artifact().unwrap().data(), &[4, 4]);
    }

    #[tokio::test]
    async fn max_duration_auto_stops() {
        let status = StatusChannel::new();
        let mut rx = status.subscribe();
        let mut recorder = RecorderSession::new(ScriptedCapture::working(), status)
            .with_max_duration(Duration::from_secs(2));
        recorder.start_recording().await.unwrap();

        recorder.on_tick();
        assert_eq!(recorder.state(), RecorderState::Recording);
        recorder.on_tick();
        assert_eq!(recorder.state(), RecorderState::Ready);
        assert_eq!(recorder.artifact().unwrap().duration().as_secs(), 2);

        let statuses: Vec<Status> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert!(statuses.contains(&Status::MaxDurationReached {
            limit: Duration::from_secs(2)
        }));
    }

    #[tokio::test]
    async fn take_artifact_hands_over_ownership() {
        let mut recorder = recorder(ScriptedCapture::working());
        recorder.start_recording().await.unwrap();
        recorder.on_chunk(vec![8]);
        recorder.stop_recording();

        let artifact = recorder.take_artifact().unwrap();
        assert_eq!(artifact.data(), &[8]);
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert!(recorder.artifact().is_none());
    }
}
