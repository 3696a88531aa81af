use std::fmt;

/// One of the twelve chromatic pitch classes, spelled with sharps.
///
/// The discriminant is the chroma bin index (C = 0 ... B = 11).
///
/// # Example
/// ```
/// use cl_core::pitch::PitchClass;
/// assert_eq!(PitchClass::A.transpose(3), PitchClass::C);
/// assert_eq!(PitchClass::from_index(13), PitchClass::Cs);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order, starting at C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Chroma bin index (0..12).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Pitch class for an arbitrary index, wrapped modulo 12.
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 12]
    }

    /// Move up by `semitones`, wrapping around the octave.
    #[must_use]
    pub const fn transpose(self, semitones: usize) -> Self {
        Self::from_index(self.index() + semitones)
    }

    /// Sharp spelling: "C", "C#", ... "B".
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a note letter with an optional `#` or `b` accidental.
    ///
    /// Returns the pitch class and the number of bytes consumed, or `None`
    /// when `s` does not start with a note letter.
    #[must_use]
    pub fn parse_prefix(s: &str) -> Option<(Self, usize)> {
        let mut chars = s.chars();
        let base = match chars.next()?.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        match chars.next() {
            Some('#') => Some((Self::from_index(base + 1), 2)),
            Some('b') => Some((Self::from_index(base + 11), 2)),
            _ => Some((Self::from_index(base), 1)),
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrips_through_all() {
        for (i, pc) in PitchClass::ALL.iter().enumerate() {
            assert_eq!(pc.index(), i);
            assert_eq!(PitchClass::from_index(i), *pc);
        }
    }

    #[test]
    fn parse_prefix_handles_accidentals() {
        assert_eq!(PitchClass::parse_prefix("F#m"), Some((PitchClass::Fs, 2)));
        assert_eq!(PitchClass::parse_prefix("Bb"), Some((PitchClass::As, 2)));
        assert_eq!(PitchClass::parse_prefix("Cb"), Some((PitchClass::B, 2)));
        assert_eq!(PitchClass::parse_prefix("Am"), Some((PitchClass::A, 1)));
        assert_eq!(PitchClass::parse_prefix("H"), None);
        assert_eq!(PitchClass::parse_prefix(""), None);
    }
}
