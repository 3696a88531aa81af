use serde::Serialize;

use crate::chord::Chord;
use crate::chroma::ChromaMatrix;
use crate::classify::classify_all;
use crate::config::AnalysisConfig;
use crate::error::CoreError;
use crate::segment::{FrequencyStats, Progression, build_progression};
use crate::smoothing::{smooth, validate_window};
use crate::templates::TemplateBank;

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordAnalysis {
    /// One template match per chroma frame.
    pub raw_labels: Vec<Chord>,
    /// Raw labels after the majority filter.
    pub smoothed_labels: Vec<Chord>,
    /// Timed chord events.
    pub progression: Progression,
    /// Frame-weighted chord frequencies.
    pub stats: FrequencyStats,
}

/// Classify → smooth → segment, with explicit parameters and no shared state.
///
/// # Example
/// ```
/// use cl_core::chroma::ChromaMatrix;
/// use cl_core::pipeline::ChordPipeline;
/// use cl_core::templates::TemplateBank;
///
/// let pipeline = ChordPipeline::new(TemplateBank::new(), 5, 512.0 / 22050.0).unwrap();
/// let analysis = pipeline.analyze(&ChromaMatrix::default()).unwrap();
/// assert!(analysis.progression.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ChordPipeline {
    bank: TemplateBank,
    window: usize,
    hop_duration: f64,
}

impl ChordPipeline {
    /// Build a pipeline, validating window and hop duration up front.
    ///
    /// # Errors
    /// Returns [`CoreError::Configuration`] if `window` is 0 or even, or
    /// `hop_duration` is not a positive finite number.
    pub fn new(bank: TemplateBank, window: usize, hop_duration: f64) -> Result<Self, CoreError> {
        validate_window(window)?;
        if !hop_duration.is_finite() || hop_duration <= 0.0 {
            return Err(CoreError::Configuration(format!(
                "hop duration must be positive, got {hop_duration}"
            )));
        }
        Ok(Self {
            bank,
            window,
            hop_duration,
        })
    }

    /// Pipeline described by `config` (templates, window, hop duration).
    ///
    /// # Errors
    /// Returns [`CoreError::Configuration`] if the config is invalid.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Self::new(
            config.template_bank()?,
            config.smoothing_window,
            config.hop_duration(),
        )
    }

    /// Run the whole pipeline over `chroma`.
    ///
    /// An empty matrix yields an empty progression and empty statistics.
    ///
    /// # Errors
    /// Propagates stage configuration errors; `new` already rejects them.
    pub fn analyze(&self, chroma: &ChromaMatrix) -> Result<ChordAnalysis, CoreError> {
        let raw_labels = classify_all(chroma, &self.bank);
        let smoothed_labels = smooth(&raw_labels, self.window)?;
        let (progression, stats) = build_progression(&smoothed_labels, self.hop_duration)?;
        Ok(ChordAnalysis {
            raw_labels,
            smoothed_labels,
            progression,
            stats,
        })
    }

    /// Templates in use.
    #[must_use]
    pub fn bank(&self) -> &TemplateBank {
        &self.bank
    }

    /// Majority-filter width.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Seconds per frame.
    #[must_use]
    pub fn hop_duration(&self) -> f64 {
        self.hop_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(ChordPipeline::new(TemplateBank::new(), 2, 0.01).is_err());
        assert!(ChordPipeline::new(TemplateBank::new(), 5, 0.0).is_err());
    }

    #[test]
    fn from_default_config() {
        let p = ChordPipeline::from_config(&AnalysisConfig::default()).unwrap();
        assert_eq!(p.window(), 5);
        assert!((p.hop_duration() - 512.0 / 22050.0).abs() < 1e-12);
    }

    #[test]
    fn from_config_carries_template_weights() {
        let config = AnalysisConfig {
            active_weight: 1.0,
            inactive_weight: 0.2,
            ..AnalysisConfig::default()
        };
        let p = ChordPipeline::from_config(&config).unwrap();
        assert!((p.bank().active_weight() - 1.0).abs() < f32::EPSILON);
        assert!((p.bank().inactive_weight() - 0.2).abs() < f32::EPSILON);
    }
}
