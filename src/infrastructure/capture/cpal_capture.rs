//! Microphone capture using cpal
//!
//! The cpal stream is not `Send`, so it lives on a dedicated thread for the
//! whole recording. Audio is mixed down to mono i16 and handed to the async
//! side as little-endian PCM chunks over a channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SampleRate, SizedSample, StreamConfig};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::application::ports::{
    CaptureCapability, CaptureConfig, CaptureDevice, CaptureError, CaptureStream,
};
use crate::domain::audio::AudioMimeType;

/// How often the capture thread checks whether it should stop
const POLL_INTERVAL: StdDuration = StdDuration::from_millis(50);

/// Capture device backed by the default cpal input
pub struct CpalCapture;

impl CpalCapture {
    pub fn new() -> Self {
        Self
    }

    /// Pick a supported input configuration close to the requested one
    fn input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono, and ranges that include the target rate
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= target_rate
                && config.max_sample_rate().0 >= target_rate;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > target_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(CaptureError::StartFailed(
            "No suitable input config found".into(),
        ))?;

        let sample_rate = if config_range.min_sample_rate().0 <= target_rate
            && config_range.max_sample_rate().0 >= target_rate
        {
            SampleRate(target_rate)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureCapability for CpalCapture {
    fn is_capture_available(&self) -> bool {
        cpal::default_host().default_input_device().is_some()
    }
}

#[async_trait]
impl CaptureDevice for CpalCapture {
    async fn acquire(&self, config: &CaptureConfig) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if config.echo_cancellation || config.noise_suppression {
            debug!("echo cancellation and noise suppression are left to the host");
        }

        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let running = Arc::new(AtomicBool::new(true));

        let target_rate = config.sample_rate;
        let flag = Arc::clone(&running);
        let worker = std::thread::Builder::new()
            .name("voice-timeline-capture".into())
            .spawn(move || run_capture(target_rate, chunk_tx, ready_tx, flag))
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        let sample_rate = match ready_rx.await {
            Ok(Ok(rate)) => rate,
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => {
                let _ = worker.join();
                return Err(CaptureError::StartFailed(
                    "capture thread exited before starting".into(),
                ));
            }
        };

        debug!(sample_rate, "capture stream running");
        Ok(Box::new(CpalStream {
            rx: chunk_rx,
            running,
            worker: Some(worker),
            mime_type: AudioMimeType::L16 {
                sample_rate,
                channels: 1,
            },
        }))
    }
}

/// Body of the capture thread. Holds the device until `running` clears.
fn run_capture(
    target_rate: u32,
    chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    ready_tx: oneshot::Sender<Result<u32, CaptureError>>,
    running: Arc<AtomicBool>,
) {
    let stream = match open_stream(target_rate, chunk_tx, Arc::clone(&running)) {
        Ok((stream, sample_rate)) => {
            let _ = ready_tx.send(Ok(sample_rate));
            stream
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    while running.load(Ordering::SeqCst) {
        std::thread::park_timeout(POLL_INTERVAL);
    }

    // Dropping the stream closes the device and the chunk sender
    drop(stream);
    debug!("capture thread finished");
}

fn open_stream(
    target_rate: u32,
    chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    running: Arc<AtomicBool>,
) -> Result<(cpal::Stream, u32), CaptureError> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or(CaptureError::NoAudioDevice)?;
    let (config, sample_format) = CpalCapture::input_config(&device, target_rate)?;
    let sample_rate = config.sample_rate.0;

    let stream = match sample_format {
        SampleFormat::I16 => build_stream::<i16>(&device, &config, chunk_tx, running)?,
        SampleFormat::F32 => build_stream::<f32>(&device, &config, chunk_tx, running)?,
        other => {
            return Err(CaptureError::StartFailed(format!(
                "Unsupported sample format: {}",
                other
            )))
        }
    };

    stream.play().map_err(|e| match e {
        cpal::PlayStreamError::DeviceNotAvailable => CaptureError::NoAudioDevice,
        other => CaptureError::StartFailed(other.to_string()),
    })?;

    Ok((stream, sample_rate))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    running: Arc<AtomicBool>,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let channels = config.channels;

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let samples: Vec<i16> = data.iter().map(|&s| i16::from_sample(s)).collect();
                let mono = downmix(&samples, channels);
                let _ = chunk_tx.send(pcm_bytes(&mono));
            },
            move |err| {
                warn!(error = %err, "capture stream error");
                if matches!(err, cpal::StreamError::DeviceNotAvailable) {
                    running.store(false, Ordering::SeqCst);
                }
            },
            None,
        )
        .map_err(|e| match e {
            cpal::BuildStreamError::DeviceNotAvailable => CaptureError::NoAudioDevice,
            other => CaptureError::PermissionDenied(other.to_string()),
        })
}

/// Average interleaved frames down to one channel
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

/// Little-endian byte layout of the samples
fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

struct CpalStream {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    mime_type: AudioMimeType,
}

#[async_trait]
impl CaptureStream for CpalStream {
    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }

    fn try_next_chunk(&mut self) -> Option<Vec<u8>> {
        self.rx.try_recv().ok()
    }

    fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    fn release(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.rx.close();

        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            if worker.join().is_err() {
                warn!("capture thread panicked");
            }
        }
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_mono_passthrough() {
        let samples = vec![100, 200, 300];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn downmix_stereo_averages_frames() {
        let samples = vec![100, 200, -50, 50];
        assert_eq!(downmix(&samples, 2), vec![150, 0]);
    }

    #[test]
    fn pcm_bytes_are_little_endian() {
        assert_eq!(pcm_bytes(&[1, -1]), vec![0x01, 0x00, 0xFF, 0xFF]);
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn can_acquire_default_input() {
        let capture = CpalCapture::new();
        let mut stream = capture.acquire(&CaptureConfig::default()).await.unwrap();
        assert!(matches!(stream.mime_type(), AudioMimeType::L16 { .. }));
        stream.release();
        stream.release();
    }
}
