use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::smoothing::{DEFAULT_WINDOW, validate_window};
use crate::templates::{DEFAULT_ACTIVE_WEIGHT, DEFAULT_INACTIVE_WEIGHT, TemplateBank};

/// Configuration complète de l'analyse.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut (22,05 kHz,
/// hop 512, fenêtre 5).
///
/// # Example
/// ```
/// use cl_core::config::AnalysisConfig;
/// let config = AnalysisConfig::default();
/// assert_eq!(config.hop_length, 512);
/// assert!((config.hop_duration() - 512.0 / 22050.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    // === Analyse ===
    /// Fréquence de rééchantillonnage avant l'extraction chroma (Hz).
    pub sample_rate: u32,
    /// Échantillons entre deux frames d'analyse.
    pub hop_length: usize,
    /// Taille de la fenêtre FFT en échantillons.
    pub fft_size: usize,
    /// Largeur du filtre majoritaire en frames (impaire).
    pub smoothing_window: usize,
    /// Fréquence du La4 en Hz.
    pub tuning_hz: f32,
    /// Fréquence la plus basse repliée dans le chroma (Hz).
    pub min_frequency: f32,
    /// Fréquence la plus haute repliée dans le chroma (Hz).
    pub max_frequency: f32,
    /// Seuil d'énergie sous lequel une frame est émise comme silence.
    pub silence_threshold: f32,

    // === Templates ===
    /// Poids du template sur les notes de l'accord.
    pub active_weight: f32,
    /// Poids du template sur les autres notes.
    pub inactive_weight: f32,

    // === Sortie ===
    /// Frames représentées par un caractère de la timeline.
    pub timeline_frames_per_cell: usize,
    /// Largeur maximale d'une ligne de timeline (caractères).
    pub timeline_width: usize,
    /// Chemin par défaut des rapports texte sauvegardés.
    pub output_path: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            hop_length: 512,
            fft_size: 2048,
            smoothing_window: DEFAULT_WINDOW,
            tuning_hz: 440.0,
            min_frequency: 65.0,
            max_frequency: 2100.0,
            silence_threshold: 1e-6,
            active_weight: DEFAULT_ACTIVE_WEIGHT,
            inactive_weight: DEFAULT_INACTIVE_WEIGHT,
            timeline_frames_per_cell: 10,
            timeline_width: 100,
            output_path: PathBuf::from("chord-output.txt"),
        }
    }
}

impl AnalysisConfig {
    /// Seconds per analysis frame: `hop_length / sample_rate`.
    #[must_use]
    pub fn hop_duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.hop_length as f64 / f64::from(self.sample_rate)
    }

    /// Template bank described by the weight fields.
    ///
    /// # Errors
    /// Returns [`CoreError::Configuration`] for invalid weights.
    pub fn template_bank(&self) -> Result<TemplateBank, CoreError> {
        TemplateBank::with_weights(self.active_weight, self.inactive_weight)
    }

    /// Rejette les valeurs incohérentes.
    ///
    /// # Errors
    /// Returns [`CoreError::Configuration`] describing the first problem.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.sample_rate == 0 {
            return Err(CoreError::Configuration("sample_rate must be > 0".into()));
        }
        if self.hop_length == 0 {
            return Err(CoreError::Configuration("hop_length must be > 0".into()));
        }
        if self.fft_size < self.hop_length {
            return Err(CoreError::Configuration(format!(
                "fft_size ({}) must be >= hop_length ({})",
                self.fft_size, self.hop_length
            )));
        }
        validate_window(self.smoothing_window)?;
        if !(self.tuning_hz.is_finite() && self.tuning_hz > 0.0) {
            return Err(CoreError::Configuration(format!(
                "tuning_hz must be positive, got {}",
                self.tuning_hz
            )));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if !(self.min_frequency > 0.0
            && self.min_frequency < self.max_frequency
            && self.max_frequency <= nyquist)
        {
            return Err(CoreError::Configuration(format!(
                "frequency range {}..{} Hz must lie within 0..{nyquist} Hz",
                self.min_frequency, self.max_frequency
            )));
        }
        if self.silence_threshold.is_nan() || self.silence_threshold < 0.0 {
            return Err(CoreError::Configuration(
                "silence_threshold must be >= 0".into(),
            ));
        }
        self.template_bank()?;
        if self.timeline_frames_per_cell == 0 {
            return Err(CoreError::Configuration(
                "timeline_frames_per_cell must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire : chaque section et champ est optionnel.
#[derive(Deserialize)]
struct ConfigFile {
    analysis: Option<AnalysisSection>,
    templates: Option<TemplateSection>,
    output: Option<OutputSection>,
}

#[derive(Deserialize)]
struct AnalysisSection {
    sample_rate: Option<u32>,
    hop_length: Option<usize>,
    fft_size: Option<usize>,
    smoothing_window: Option<usize>,
    tuning_hz: Option<f32>,
    min_frequency: Option<f32>,
    max_frequency: Option<f32>,
    silence_threshold: Option<f32>,
}

#[derive(Deserialize)]
struct TemplateSection {
    active_weight: Option<f32>,
    inactive_weight: Option<f32>,
}

#[derive(Deserialize)]
struct OutputSection {
    timeline_frames_per_cell: Option<usize>,
    timeline_width: Option<usize>,
    output_path: Option<PathBuf>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema or the
/// merged configuration fails [`AnalysisConfig::validate`].
pub fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let file: ConfigFile = toml::from_str(content).context("TOML parse error")?;
    let mut config = AnalysisConfig::default();

    if let Some(a) = file.analysis {
        if let Some(v) = a.sample_rate {
            config.sample_rate = v;
        }
        if let Some(v) = a.hop_length {
            config.hop_length = v;
        }
        if let Some(v) = a.fft_size {
            config.fft_size = v;
        }
        if let Some(v) = a.smoothing_window {
            config.smoothing_window = v;
        }
        if let Some(v) = a.tuning_hz {
            config.tuning_hz = v;
        }
        if let Some(v) = a.min_frequency {
            config.min_frequency = v;
        }
        if let Some(v) = a.max_frequency {
            config.max_frequency = v;
        }
        if let Some(v) = a.silence_threshold {
            config.silence_threshold = v;
        }
    }

    if let Some(t) = file.templates {
        if let Some(v) = t.active_weight {
            config.active_weight = v;
        }
        if let Some(v) = t.inactive_weight {
            config.inactive_weight = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.timeline_frames_per_cell {
            config.timeline_frames_per_cell = v;
        }
        if let Some(v) = o.timeline_width {
            config.timeline_width = v;
        }
        if let Some(v) = o.output_path {
            config.output_path = v;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Load a TOML file and merge it over the defaults.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
/// ```no_run
/// use cl_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("chordline.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
}
