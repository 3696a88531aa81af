//! Triad templates for all 24 chords (12 major + 12 minor).
//!
//! Each template places `active_weight` on the three chord tones and
//! `inactive_weight` on the nine other pitch classes. The default is a
//! binary 1/0 profile. Raising `inactive_weight` towards `active_weight`
//! flattens the templates and makes cosine scores closer together, which
//! makes canonical-order tie-breaks more frequent.

use crate::chord::{Chord, NUM_CHORDS};
use crate::chroma::{CHROMA_BINS, ChromaFrame};
use crate::error::CoreError;

/// Default weight on chord tones.
pub const DEFAULT_ACTIVE_WEIGHT: f32 = 1.0;

/// Default weight on non-chord tones.
pub const DEFAULT_INACTIVE_WEIGHT: f32 = 0.0;

/// Reference chroma profile of one chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordTemplate {
    /// The chord this template describes.
    pub chord: Chord,
    /// Expected relative energy per pitch class.
    pub weights: ChromaFrame,
    /// Euclidean norm of `weights`, precomputed for cosine scoring.
    pub norm: f32,
}

impl ChordTemplate {
    fn new(chord: Chord, active: f32, inactive: f32) -> Self {
        let mut weights = [inactive; CHROMA_BINS];
        for pc in chord.pitch_classes() {
            weights[pc.index()] = active;
        }
        let norm = weights.iter().map(|w| w * w).sum::<f32>().sqrt();
        Self {
            chord,
            weights,
            norm,
        }
    }
}

/// The fixed catalogue of 24 chord templates, in canonical order.
///
/// # Example
/// ```
/// use cl_core::templates::TemplateBank;
/// let bank = TemplateBank::new();
/// assert_eq!(bank.len(), 24);
/// assert_eq!(bank.templates()[0].chord.to_string(), "C");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBank {
    templates: [ChordTemplate; NUM_CHORDS],
    active_weight: f32,
    inactive_weight: f32,
}

impl TemplateBank {
    /// Binary triad templates (1.0 on chord tones, 0.0 elsewhere).
    #[must_use]
    pub fn new() -> Self {
        Self::build(DEFAULT_ACTIVE_WEIGHT, DEFAULT_INACTIVE_WEIGHT)
    }

    /// Templates with a custom chord-tone / non-chord-tone ratio.
    ///
    /// # Errors
    /// Returns [`CoreError::Configuration`] unless both weights are finite
    /// and `active > inactive >= 0`.
    pub fn with_weights(active: f32, inactive: f32) -> Result<Self, CoreError> {
        if !active.is_finite() || !inactive.is_finite() {
            return Err(CoreError::Configuration(format!(
                "template weights must be finite (active {active}, inactive {inactive})"
            )));
        }
        if inactive < 0.0 || active <= inactive {
            return Err(CoreError::Configuration(format!(
                "template weights require active > inactive >= 0 (active {active}, inactive {inactive})"
            )));
        }
        Ok(Self::build(active, inactive))
    }

    fn build(active: f32, inactive: f32) -> Self {
        let mut templates = [ChordTemplate::new(Chord::ALL[0], active, inactive); NUM_CHORDS];
        for (slot, chord) in templates.iter_mut().zip(Chord::ALL) {
            *slot = ChordTemplate::new(chord, active, inactive);
        }
        Self {
            templates,
            active_weight: active,
            inactive_weight: inactive,
        }
    }

    /// Templates in canonical order.
    #[must_use]
    pub fn templates(&self) -> &[ChordTemplate] {
        &self.templates
    }

    /// Template for `chord`.
    #[must_use]
    pub fn get(&self, chord: Chord) -> &ChordTemplate {
        &self.templates[chord.index()]
    }

    /// Always 24.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Never empty; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Weight placed on chord tones.
    #[must_use]
    pub fn active_weight(&self) -> f32 {
        self.active_weight
    }

    /// Weight placed on non-chord tones.
    #[must_use]
    pub fn inactive_weight(&self) -> f32 {
        self.inactive_weight
    }
}

impl Default for TemplateBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default 24-template catalogue.
#[must_use]
pub fn build_templates() -> TemplateBank {
    TemplateBank::new()
}
