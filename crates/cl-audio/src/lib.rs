// Audio decoding, capture, chroma extraction, and chord playback for chordline.

pub mod capture;
pub mod chroma;
pub mod decode;
pub mod error;
pub mod fft;
pub mod playback;
pub mod resample;
pub mod synth;

pub use chroma::{ChromaExtractor, ChromaSettings};
pub use error::AudioError;
