//! Chroma feature extraction.
//!
//! Folds the STFT power spectrum into 12 pitch-class bins per hop.
//! Frame `i` covers samples `[i × hop, i × hop + fft_size)`, zero-padded
//! past the end of the signal. The frame count is `len / hop` (floor): a
//! trailing partial hop is dropped, so the last chord event never ends
//! after the audio does.

use cl_core::chroma::{CHROMA_BINS, ChromaFrame, ChromaMatrix};
use cl_core::config::AnalysisConfig;
use rayon::prelude::*;

use crate::error::AudioError;
use crate::fft::FftPipeline;

/// Parameters of the chroma extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaSettings {
    /// Sample rate of the input (Hz).
    pub sample_rate: u32,
    /// Samples between frames.
    pub hop_length: usize,
    /// FFT window length.
    pub fft_size: usize,
    /// Frequency of A4 (Hz).
    pub tuning_hz: f32,
    /// Lowest folded frequency (Hz).
    pub min_frequency: f32,
    /// Highest folded frequency (Hz).
    pub max_frequency: f32,
    /// Frames with less summed in-band power are emitted as all-zero.
    pub silence_threshold: f32,
}

impl ChromaSettings {
    /// Settings taken from an [`AnalysisConfig`].
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            hop_length: config.hop_length,
            fft_size: config.fft_size,
            tuning_hz: config.tuning_hz,
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            silence_threshold: config.silence_threshold,
        }
    }

    /// Seconds between frames.
    #[must_use]
    pub fn hop_duration(&self) -> f64 {
        self.hop_length as f64 / f64::from(self.sample_rate)
    }
}

impl Default for ChromaSettings {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Pitch class of `freq` for an A4 tuning of `tuning_hz` (C = 0).
#[must_use]
pub fn pitch_class_of(freq: f32, tuning_hz: f32) -> usize {
    let midi = 69.0 + 12.0 * (freq / tuning_hz).log2();
    (midi.round() as i64).rem_euclid(CHROMA_BINS as i64) as usize
}

/// STFT chroma extractor.
///
/// # Example
/// ```
/// use cl_audio::chroma::{ChromaExtractor, ChromaSettings};
/// let extractor = ChromaExtractor::new(ChromaSettings::default()).unwrap();
/// let chroma = extractor.extract(&vec![0.0f32; 22050]).unwrap();
/// assert_eq!(chroma.len(), 22050 / 512);
/// ```
#[derive(Debug, Clone)]
pub struct ChromaExtractor {
    settings: ChromaSettings,
    /// (spectrum bin, pitch class) for every bin inside the frequency range.
    bin_map: Vec<(usize, usize)>,
}

impl ChromaExtractor {
    /// Build the extractor and its bin → pitch-class map.
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidSettings`] for zero sizes or rates, or a
    /// frequency range that contains no FFT bin.
    pub fn new(settings: ChromaSettings) -> Result<Self, AudioError> {
        if settings.sample_rate == 0 || settings.hop_length == 0 || settings.fft_size == 0 {
            return Err(AudioError::InvalidSettings(format!(
                "sample_rate, hop_length and fft_size must be > 0 ({settings:?})"
            )));
        }
        if !(settings.tuning_hz.is_finite() && settings.tuning_hz > 0.0) {
            return Err(AudioError::InvalidSettings(format!(
                "tuning must be positive, got {}",
                settings.tuning_hz
            )));
        }

        let bin_hz = settings.sample_rate as f32 / settings.fft_size as f32;
        let bin_map: Vec<(usize, usize)> = (1..=settings.fft_size / 2)
            .filter_map(|bin| {
                let freq = bin as f32 * bin_hz;
                (freq >= settings.min_frequency && freq <= settings.max_frequency)
                    .then(|| (bin, pitch_class_of(freq, settings.tuning_hz)))
            })
            .collect();

        if bin_map.is_empty() {
            return Err(AudioError::InvalidSettings(format!(
                "no FFT bin between {} and {} Hz at {} Hz / {} points",
                settings.min_frequency,
                settings.max_frequency,
                settings.sample_rate,
                settings.fft_size
            )));
        }

        Ok(Self { settings, bin_map })
    }

    /// Extractor parameters.
    #[must_use]
    pub fn settings(&self) -> &ChromaSettings {
        &self.settings
    }

    /// Number of frames `extract` yields for `num_samples` samples.
    #[must_use]
    pub fn frame_count(&self, num_samples: usize) -> usize {
        num_samples / self.settings.hop_length
    }

    /// Compute one chroma frame per hop, normalised to a maximum of 1.
    ///
    /// Frames are processed in parallel; each worker owns an FFT plan.
    ///
    /// # Errors
    /// Returns [`AudioError::EmptyInput`] for an empty buffer.
    pub fn extract(&self, samples: &[f32]) -> Result<ChromaMatrix, AudioError> {
        if samples.is_empty() {
            return Err(AudioError::EmptyInput);
        }
        let hop = self.settings.hop_length;
        let fft_size = self.settings.fft_size;
        let num_frames = self.frame_count(samples.len());

        let frames: Vec<ChromaFrame> = (0..num_frames)
            .into_par_iter()
            .map_init(
                || FftPipeline::new(fft_size),
                |fft, i| {
                    let start = i * hop;
                    let end = (start + fft_size).min(samples.len());
                    self.frame_chroma(fft, &samples[start..end])
                },
            )
            .collect();

        Ok(ChromaMatrix::from_arrays(frames)?)
    }

    fn frame_chroma(&self, fft: &mut FftPipeline, window: &[f32]) -> ChromaFrame {
        let power = fft.power_spectrum(window);
        let mut chroma = [0.0f32; CHROMA_BINS];
        for &(bin, pc) in &self.bin_map {
            chroma[pc] += power[bin];
        }

        let total: f32 = chroma.iter().sum();
        if !total.is_finite() || total < self.settings.silence_threshold {
            return [0.0; CHROMA_BINS];
        }
        let max = chroma.iter().copied().fold(0.0f32, f32::max);
        if max > 0.0 {
            for v in &mut chroma {
                *v /= max;
            }
        }
        chroma
    }
}
