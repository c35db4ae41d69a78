//! Audio output using rodio
//!
//! Each playback gets its own output thread, since the rodio output stream
//! must stay on the thread that opened it. Raw L16 payloads are fed as
//! samples; container formats go through rodio's decoder.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{AudioOutput, PlaybackError, PlaybackHandle};
use crate::domain::audio::{AudioArtifact, AudioMimeType};

/// How often the output thread checks for stop or end of audio
const POLL_INTERVAL: StdDuration = StdDuration::from_millis(50);

/// Audio output backed by the default rodio device
pub struct RodioOutput;

impl RodioOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutput for RodioOutput {
    async fn open(&self, artifact: &AudioArtifact) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let source = artifact.playback_source();
        let mime_type = artifact.mime_type();

        let (ready_tx, ready_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&stop);
        let worker = std::thread::Builder::new()
            .name("voice-timeline-playback".into())
            .spawn(move || run_playback(source, mime_type, ready_tx, done_tx, flag))
            .map_err(|e| PlaybackError::OutputUnavailable(e.to_string()))?;

        match ready_rx.await {
            Ok(Ok(())) => Ok(Box::new(RodioPlayback {
                done: Some(done_rx),
                stop,
                worker: Some(worker),
            })),
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                Err(PlaybackError::OutputUnavailable(
                    "playback thread exited before starting".into(),
                ))
            }
        }
    }
}

/// Body of the output thread. Plays until the sink drains or `stop` is set.
fn run_playback(
    source: Arc<[u8]>,
    mime_type: AudioMimeType,
    ready_tx: oneshot::Sender<Result<(), PlaybackError>>,
    done_tx: oneshot::Sender<()>,
    stop: Arc<AtomicBool>,
) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            let _ = ready_tx.send(Err(PlaybackError::OutputUnavailable(e.to_string())));
            return;
        }
    };

    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = ready_tx.send(Err(PlaybackError::OutputUnavailable(e.to_string())));
            return;
        }
    };

    if let Err(e) = append_source(&sink, source, mime_type) {
        let _ = ready_tx.send(Err(e));
        return;
    }
    let _ = ready_tx.send(Ok(()));

    while !stop.load(Ordering::SeqCst) && !sink.empty() {
        std::thread::park_timeout(POLL_INTERVAL);
    }

    if stop.load(Ordering::SeqCst) {
        sink.stop();
        debug!("playback stopped");
    } else {
        let _ = done_tx.send(());
        debug!("playback drained");
    }
}

fn append_source(
    sink: &Sink,
    source: Arc<[u8]>,
    mime_type: AudioMimeType,
) -> Result<(), PlaybackError> {
    match mime_type {
        AudioMimeType::L16 {
            sample_rate,
            channels,
        } => {
            let samples = decode_l16(&source)?;
            sink.append(SamplesBuffer::new(channels, sample_rate, samples));
        }
        _ => {
            let decoder = Decoder::new(Cursor::new(source))
                .map_err(|e| PlaybackError::Decode(e.to_string()))?;
            sink.append(decoder);
        }
    }
    Ok(())
}

/// Interpret bytes as little-endian i16 samples
fn decode_l16(bytes: &[u8]) -> Result<Vec<i16>, PlaybackError> {
    if bytes.len() < 2 {
        return Err(PlaybackError::Decode("no PCM samples".into()));
    }
    if bytes.len() % 2 != 0 {
        return Err(PlaybackError::Decode(format!(
            "odd PCM payload length: {}",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

struct RodioPlayback {
    done: Option<oneshot::Receiver<()>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

#[async_trait]
impl PlaybackHandle for RodioPlayback {
    async fn finished(&mut self) {
        match self.done.as_mut() {
            Some(rx) => {
                let _ = rx.await;
                self.done = None;
            }
            None => std::future::pending().await,
        }
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);

        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            if worker.join().is_err() {
                warn!("playback thread panicked");
            }
        }
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::Duration;

    #[test]
    fn decode_l16_reads_little_endian() {
        assert_eq!(decode_l16(&[0x01, 0x00, 0xFF, 0xFF]).unwrap(), vec![1, -1]);
    }

    #[test]
    fn decode_l16_rejects_empty_and_odd() {
        assert!(matches!(decode_l16(&[]), Err(PlaybackError::Decode(_))));
        assert!(matches!(decode_l16(&[1, 2, 3]), Err(PlaybackError::Decode(_))));
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn garbage_container_is_a_decode_error() {
        let artifact = AudioArtifact::new(
            vec![0x00, 0x01, 0x02, 0x03],
            AudioMimeType::WebmOpus,
            Duration::from_secs(1),
        );
        let result = RodioOutput::new().open(&artifact).await;
        assert!(matches!(result, Err(PlaybackError::Decode(_))));
    }
}
