//! Chord model, configuration, and the chord-detection pipeline for chordline.
//!
//! This crate holds the pure computation: template matching of chroma
//! frames, majority smoothing, and segmentation into timed chord events.
//! It performs no audio I/O.

pub mod chord;
pub mod chroma;
pub mod classify;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pitch;
pub mod segment;
pub mod smoothing;
pub mod templates;

pub use chord::{Chord, ChordQuality};
pub use chroma::{CHROMA_BINS, ChromaFrame, ChromaMatrix};
pub use config::AnalysisConfig;
pub use error::CoreError;
pub use pipeline::{ChordAnalysis, ChordPipeline};
pub use pitch::PitchClass;
pub use segment::{ChordEvent, ChordFrequency, FrequencyStats, Progression};
pub use templates::{ChordTemplate, TemplateBank};
