use crate::chord::{Chord, NUM_CHORDS};
use crate::error::CoreError;

/// Default majority-filter width, in frames.
pub const DEFAULT_WINDOW: usize = 5;

/// Check that `window` is a usable majority-filter width (odd, >= 1).
///
/// # Errors
/// Returns [`CoreError::Configuration`] for 0 or even widths.
pub fn validate_window(window: usize) -> Result<(), CoreError> {
    if window == 0 || window % 2 == 0 {
        return Err(CoreError::Configuration(format!(
            "smoothing window must be odd and >= 1, got {window}"
        )));
    }
    Ok(())
}

/// Majority filter over a label sequence.
///
/// For each index the output is the most frequent label within the window
/// centred on it; windows are clipped at the sequence ends. Among equally
/// frequent labels the centre label wins if it is one of them, otherwise
/// the one that appears first in the window. The filter is non-causal and
/// preserves length.
///
/// # Errors
/// Returns [`CoreError::Configuration`] if `window` is 0 or even.
///
/// # Example
/// ```
/// use cl_core::chord::Chord;
/// use cl_core::smoothing::smooth;
/// let seq: Vec<Chord> = ["C", "C", "C", "G", "Am", "Am", "Am"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let out = smooth(&seq, 5).unwrap();
/// assert_eq!(out[3].to_string(), "C");
/// ```
pub fn smooth(raw: &[Chord], window: usize) -> Result<Vec<Chord>, CoreError> {
    validate_window(window)?;
    let half = window / 2;
    let n = raw.len();
    let mut counts = [0u32; NUM_CHORDS];
    let mut out = Vec::with_capacity(n);

    for (i, &center) in raw.iter().enumerate() {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(n);
        let span = &raw[lo..hi];

        counts.fill(0);
        for chord in span {
            counts[chord.index()] += 1;
        }
        let top = counts.iter().copied().max().unwrap_or(0);

        let winner = if counts[center.index()] == top {
            center
        } else {
            span.iter()
                .copied()
                .find(|c| counts[c.index()] == top)
                .unwrap_or(center)
        };
        out.push(winner);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(names: &[&str]) -> Vec<Chord> {
        names.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn rejects_even_and_zero_windows() {
        let raw = seq(&["C", "G"]);
        assert!(smooth(&raw, 0).unwrap_err().is_configuration());
        assert!(smooth(&raw, 4).unwrap_err().is_configuration());
        assert!(smooth(&raw, 3).is_ok());
    }

    #[test]
    fn window_of_one_is_identity() {
        let raw = seq(&["C", "G", "Am", "F", "G"]);
        assert_eq!(smooth(&raw, 1).unwrap(), raw);
    }

    #[test]
    fn preserves_length() {
        let raw = seq(&["C", "G", "Am", "F", "G", "C", "Em"]);
        for w in [1, 3, 5, 7, 9, 11] {
            assert_eq!(smooth(&raw, w).unwrap().len(), raw.len());
        }
        assert!(smooth(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn isolated_frame_is_absorbed() {
        let raw = seq(&["Am", "Am", "Am", "G", "F", "F", "F"]);
        let out = smooth(&raw, 5).unwrap();
        assert_eq!(out[3].to_string(), "Am", "tie resolves to earliest in window");
        assert!(!out.contains(&"G".parse().unwrap()));
    }

    #[test]
    fn isolated_frame_between_equal_runs() {
        let raw = seq(&["C", "C", "C", "D", "C", "C", "C"]);
        let out = smooth(&raw, 5).unwrap();
        assert!(out.iter().all(|c| c.to_string() == "C"));
    }

    #[test]
    fn centre_label_wins_ties() {
        // Window at index 2 holds G, G, C, C, Em: G and C tie, centre is C.
        let raw = seq(&["G", "G", "C", "C", "Em"]);
        let out = smooth(&raw, 5).unwrap();
        assert_eq!(out[2].to_string(), "C");
    }

    #[test]
    fn boundary_windows_are_clipped() {
        // Index 0 sees [F, C, C] with window 5: C is the majority.
        let raw = seq(&["F", "C", "C", "C", "C"]);
        let out = smooth(&raw, 5).unwrap();
        assert_eq!(out[0].to_string(), "C");
    }
}
