use crate::error::CoreError;

/// Number of pitch-class bins per chroma frame.
pub const CHROMA_BINS: usize = 12;

/// Energy per pitch class, C through B.
pub type ChromaFrame = [f32; CHROMA_BINS];

/// Validated, time-ordered sequence of chroma frames.
///
/// Every bin is finite and non-negative. Frame `i` starts at
/// `i × hop_duration`. An empty matrix is valid and analyses to an empty
/// progression.
///
/// # Example
/// ```
/// use cl_core::chroma::ChromaMatrix;
/// let m = ChromaMatrix::from_frames(vec![vec![0.0; 12]; 4]).unwrap();
/// assert_eq!(m.len(), 4);
/// assert!(ChromaMatrix::from_frames(vec![vec![0.0; 11]]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromaMatrix {
    frames: Vec<ChromaFrame>,
}

impl ChromaMatrix {
    /// Build from fixed-size frames, rejecting negative or non-finite energies.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidEnergy`] on the first bad bin.
    pub fn from_arrays(frames: Vec<ChromaFrame>) -> Result<Self, CoreError> {
        for (frame, bins) in frames.iter().enumerate() {
            check_bins(frame, bins)?;
        }
        Ok(Self { frames })
    }

    /// Build from dynamically sized frames (e.g. rows read from another tool).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidFrameLength`] if a frame does not hold
    /// exactly 12 bins, or [`CoreError::InvalidEnergy`] on a bad bin.
    pub fn from_frames(frames: Vec<Vec<f32>>) -> Result<Self, CoreError> {
        let mut out = Vec::with_capacity(frames.len());
        for (frame, bins) in frames.into_iter().enumerate() {
            let arr: ChromaFrame = bins
                .as_slice()
                .try_into()
                .map_err(|_| CoreError::InvalidFrameLength {
                    frame,
                    len: bins.len(),
                })?;
            check_bins(frame, &arr)?;
            out.push(arr);
        }
        Ok(Self { frames: out })
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when there are no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames in time order.
    #[must_use]
    pub fn frames(&self) -> &[ChromaFrame] {
        &self.frames
    }

    /// Iterate frames in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChromaFrame> {
        self.frames.iter()
    }

    /// Frame at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ChromaFrame> {
        self.frames.get(index)
    }

    /// Mean energy per pitch class over the whole matrix.
    #[must_use]
    pub fn mean_profile(&self) -> ChromaFrame {
        let mut acc = [0.0f32; CHROMA_BINS];
        if self.frames.is_empty() {
            return acc;
        }
        for frame in &self.frames {
            for (a, v) in acc.iter_mut().zip(frame) {
                *a += v;
            }
        }
        let n = self.frames.len() as f32;
        for a in &mut acc {
            *a /= n;
        }
        acc
    }
}

impl<'a> IntoIterator for &'a ChromaMatrix {
    type Item = &'a ChromaFrame;
    type IntoIter = std::slice::Iter<'a, ChromaFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

fn check_bins(frame: usize, bins: &ChromaFrame) -> Result<(), CoreError> {
    match bins
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        Some((bin, &value)) => Err(CoreError::InvalidEnergy { frame, bin, value }),
        None => Ok(()),
    }
}
