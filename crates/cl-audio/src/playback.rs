use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::AudioError;

/// How often the blocking player checks for completion or a stop request.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Play mono `samples` on the default output device.
///
/// Blocks until the buffer has played out, `stop` fires, or its sender is
/// dropped. Returns `true` if playback ran to the end.
///
/// # Errors
/// Returns an error if no output device is available or the stream fails
/// to start.
pub fn play_samples(samples: Vec<f32>, sample_rate: u32, stop: &flume::Receiver<()>) -> Result<bool> {
    if samples.is_empty() {
        return Ok(true);
    }

    let samples = Arc::new(samples);
    let position = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicBool::new(false));

    let host = cpal::default_host();
    let output_device = host
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)?;

    let output_config = cpal::StreamConfig {
        channels: 2, // stereo output
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let playback_samples = Arc::clone(&samples);
    let playback_pos = Arc::clone(&position);
    let playback_done = Arc::clone(&finished);

    let output_stream = output_device.build_output_stream(
        &output_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            let total = playback_samples.len();
            let mut pos = playback_pos.load(Ordering::Relaxed);

            for frame in data.chunks_mut(2) {
                let sample = if pos < total {
                    playback_samples[pos]
                } else {
                    0.0
                };
                frame.fill(sample);
                pos += 1;
            }
            if pos >= total {
                playback_done.store(true, Ordering::Relaxed);
            }
            playback_pos.store(pos.min(total), Ordering::Relaxed);
        },
        |err| {
            log::error!("Audio output error: {err}");
        },
        None,
    )
    .map_err(|e| AudioError::StreamError(e.to_string()))?;

    output_stream
        .play()
        .map_err(|e| AudioError::StreamError(e.to_string()))?;
    log::info!(
        "Playback started: {:.2}s @ {sample_rate}Hz",
        samples.len() as f64 / f64::from(sample_rate)
    );

    loop {
        if finished.load(Ordering::Relaxed) {
            return Ok(true);
        }
        match stop.recv_timeout(POLL_INTERVAL) {
            Ok(()) | Err(flume::RecvTimeoutError::Disconnected) => {
                log::info!(
                    "Playback stopped at sample {}",
                    position.load(Ordering::Relaxed)
                );
                return Ok(false);
            }
            Err(flume::RecvTimeoutError::Timeout) => {}
        }
    }
}
