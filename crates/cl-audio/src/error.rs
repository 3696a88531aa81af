use cl_core::CoreError;
use thiserror::Error;

/// Errors originating from the audio module.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio input device found.
    #[error("No audio input device found")]
    NoInputDevice,

    /// No audio output device found.
    #[error("No audio output device found")]
    NoOutputDevice,

    /// Unsupported audio format.
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Audio stream error.
    #[error("Audio stream error: {0}")]
    StreamError(String),

    /// Audio decode error.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// No samples to analyse.
    #[error("Audio input is empty")]
    EmptyInput,

    /// Extractor parameters that cannot produce chroma frames.
    #[error("Invalid chroma settings: {0}")]
    InvalidSettings(String),

    /// The extracted chroma was rejected by the core.
    #[error(transparent)]
    Core(#[from] CoreError),
}
