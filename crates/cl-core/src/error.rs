use thiserror::Error;

/// Errors originating from the core module.
///
/// Two families exist: input errors (malformed chroma data, unparsable
/// chord names) and configuration errors (bad window size, bad weights).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed or out-of-domain input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A chroma frame does not have exactly 12 bins.
    #[error("Invalid input: chroma frame {frame} has {len} bins, expected 12")]
    InvalidFrameLength {
        /// Index of the offending frame.
        frame: usize,
        /// Number of bins it carried.
        len: usize,
    },

    /// A chroma bin holds a negative or non-finite energy.
    #[error("Invalid input: chroma frame {frame}, bin {bin} holds {value}")]
    InvalidEnergy {
        /// Index of the offending frame.
        frame: usize,
        /// Pitch-class bin within the frame.
        bin: usize,
        /// The rejected value.
        value: f32,
    },

    /// A chord name that does not spell one of the 24 triads.
    #[error("Invalid input: unknown chord name '{0}'")]
    UnknownChord(String),

    /// Invalid configuration value or structure.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// `true` for the input family of errors.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, CoreError::Configuration(_))
    }

    /// `true` for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, CoreError::Configuration(_))
    }
}
