//! Scripted port implementations for unit tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use tokio::sync::{mpsc, oneshot};

use super::ports::{
    AudioOutput, CaptureCapability, CaptureConfig, CaptureDevice, CaptureError, CaptureStream,
    Clock, PlaybackError, PlaybackHandle,
};
use crate::domain::audio::{AudioArtifact, AudioMimeType};

/// Counters and a chunk feed shared between a test and its fake device
#[derive(Default)]
pub struct CaptureProbe {
    pub acquisitions: AtomicUsize,
    pub releases: AtomicUsize,
    feed: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
}

impl CaptureProbe {
    /// Deliver a chunk as the device would
    pub fn deliver(&self, chunk: &[u8]) {
        if let Some(tx) = self.feed.lock().unwrap().as_ref() {
            let _ = tx.send(chunk.to_vec());
        }
    }

    /// Simulate the device going away
    pub fn disconnect(&self) {
        self.feed.lock().unwrap().take();
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

pub struct ScriptedCapture {
    pub available: bool,
    pub deny: bool,
    pub probe: Arc<CaptureProbe>,
}

impl ScriptedCapture {
    pub fn working() -> Self {
        Self {
            available: true,
            deny: false,
            probe: Arc::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::working()
        }
    }

    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::working()
        }
    }
}

impl CaptureCapability for ScriptedCapture {
    fn is_capture_available(&self) -> bool {
        self.available
    }
}

#[async_trait]
impl CaptureDevice for ScriptedCapture {
    async fn acquire(&self, _config: &CaptureConfig) -> Result<Box<dyn CaptureStream>, CaptureError> {
        self.probe.acquisitions.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            return Err(CaptureError::PermissionDenied("denied by test".into()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.probe.feed.lock().unwrap() = Some(tx);
        Ok(Box::new(ScriptedStream {
            rx,
            probe: Arc::clone(&self.probe),
            released: false,
        }))
    }
}

struct ScriptedStream {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    probe: Arc<CaptureProbe>,
    released: bool,
}

#[async_trait]
impl CaptureStream for ScriptedStream {
    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }

    fn try_next_chunk(&mut self) -> Option<Vec<u8>> {
        self.rx.try_recv().ok()
    }

    fn mime_type(&self) -> AudioMimeType {
        AudioMimeType::WebmOpus
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.rx.close();
            self.probe.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Counters and end-of-stream triggers shared with a fake output
#[derive(Default)]
pub struct OutputProbe {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    endings: Mutex<Vec<oneshot::Sender<()>>>,
}

impl OutputProbe {
    /// Make the most recent playback reach its natural end
    pub fn finish_latest(&self) {
        if let Some(tx) = self.endings.lock().unwrap().pop() {
            let _ = tx.send(());
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// Fake output that refuses empty payloads as undecodable
#[derive(Default)]
pub struct ScriptedOutput {
    pub probe: Arc<OutputProbe>,
}

#[async_trait]
impl AudioOutput for ScriptedOutput {
    async fn open(&self, artifact: &AudioArtifact) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        if artifact.is_empty() {
            return Err(PlaybackError::Decode("empty payload".into()));
        }
        self.probe.opened.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.probe.endings.lock().unwrap().push(tx);
        Ok(Box::new(ScriptedPlayback {
            ended: Some(rx),
            stopped: AtomicBool::new(false),
            probe: Arc::clone(&self.probe),
        }))
    }
}

struct ScriptedPlayback {
    ended: Option<oneshot::Receiver<()>>,
    stopped: AtomicBool,
    probe: Arc<OutputProbe>,
}

#[async_trait]
impl PlaybackHandle for ScriptedPlayback {
    async fn finished(&mut self) {
        match self.ended.as_mut() {
            Some(rx) => {
                let _ = rx.await;
                self.ended = None;
            }
            None => std::future::pending().await,
        }
    }

    fn stop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.probe.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for ScriptedPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn at(hour: u32, minute: u32) -> Self {
        Self(Local.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
