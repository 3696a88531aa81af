use std::time::{Duration, Instant};

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, RingBuffer};

use crate::error::AudioError;

/// How often the recorder drains the ring buffer.
const DRAIN_INTERVAL: Duration = Duration::from_millis(50);

/// Audio capture via cpal.
///
/// Writes mono f32 samples into a lock-free ring buffer.
///
/// # Example
/// ```no_run
/// use cl_audio::capture::AudioCapture;
/// let capture = AudioCapture::start_default().unwrap();
/// ```
pub struct AudioCapture {
    /// Capture stops when this is dropped.
    _stream: cpal::Stream,
    consumer: Consumer<f32>,
    sample_rate: u32,
}

impl AudioCapture {
    /// Start capturing from the default input device.
    ///
    /// # Errors
    /// Returns an error if the audio device is unavailable.
    pub fn start_default() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::NoInputDevice)?;

        let config = device.default_input_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = usize::from(config.channels());

        // Ring buffer: 2 seconds of audio @ sample_rate
        let buf_size = sample_rate as usize * 2;
        let (mut producer, consumer) = RingBuffer::new(buf_size);

        let stream = device.build_input_stream(
            &config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Downmix to mono and push into ring buffer
                for chunk in data.chunks(channels) {
                    let mono: f32 = chunk.iter().sum::<f32>() / channels as f32;
                    let _ = producer.push(mono);
                }
            },
            |err| {
                log::error!("Audio stream error: {err}");
            },
            None,
        )
        .map_err(|e| AudioError::StreamError(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        log::info!("Capture started @ {sample_rate}Hz ({channels} ch)");

        Ok(Self {
            _stream: stream,
            consumer,
            sample_rate,
        })
    }

    /// Append every available sample from the ring buffer to `out`.
    ///
    /// Returns how many samples were appended.
    pub fn drain_into(&mut self, out: &mut Vec<f32>) -> usize {
        let available = self.consumer.slots();
        out.reserve(available);
        let mut count = 0;
        while let Ok(sample) = self.consumer.pop() {
            out.push(sample);
            count += 1;
        }
        count
    }

    /// The sample rate of the capture stream.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// A finished microphone recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    /// Mono samples in [-1, 1].
    pub samples: Vec<f32>,
    /// Capture rate (Hz).
    pub sample_rate: u32,
}

impl Recording {
    /// Length in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Record from the default input until `stop` fires (or its sender is
/// dropped), or `max_duration` elapses.
///
/// # Errors
/// Returns an error if the input device cannot be opened.
pub fn record_until(
    stop: &flume::Receiver<()>,
    max_duration: Option<Duration>,
) -> Result<Recording> {
    let mut capture = AudioCapture::start_default()?;
    let mut samples = Vec::new();
    let started = Instant::now();

    loop {
        match stop.recv_timeout(DRAIN_INTERVAL) {
            Ok(()) | Err(flume::RecvTimeoutError::Disconnected) => break,
            Err(flume::RecvTimeoutError::Timeout) => {}
        }
        capture.drain_into(&mut samples);
        if max_duration.is_some_and(|max| started.elapsed() >= max) {
            break;
        }
    }
    capture.drain_into(&mut samples);

    let recording = Recording {
        samples,
        sample_rate: capture.sample_rate(),
    };
    log::info!(
        "Recorded {:.2}s ({} samples @ {}Hz)",
        recording.duration_secs(),
        recording.samples.len(),
        recording.sample_rate
    );
    Ok(recording)
}
