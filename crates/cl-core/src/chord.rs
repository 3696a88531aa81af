use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::pitch::PitchClass;

/// Triad quality. Only major and minor triads are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChordQuality {
    /// Root, major third, perfect fifth.
    Major,
    /// Root, minor third, perfect fifth.
    Minor,
}

impl ChordQuality {
    /// Semitone offsets of the chord tones above the root.
    #[must_use]
    pub const fn intervals(self) -> [usize; 3] {
        match self {
            ChordQuality::Major => [0, 4, 7],
            ChordQuality::Minor => [0, 3, 7],
        }
    }

    /// Name suffix: "" for major, "m" for minor.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
        }
    }
}

/// A major or minor triad, e.g. "C" or "Am".
///
/// Chords order by their canonical position: the major block C..B
/// followed by the minor block Cm..Bm.
///
/// # Example
/// ```
/// use cl_core::chord::Chord;
/// let am: Chord = "Am".parse().unwrap();
/// assert_eq!(am.to_string(), "Am");
/// assert_eq!(am.index(), 21);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    /// Root pitch class.
    pub root: PitchClass,
    /// Major or minor.
    pub quality: ChordQuality,
}

/// Number of recognised chords (12 roots × 2 qualities).
pub const NUM_CHORDS: usize = 24;

impl Chord {
    /// All 24 chords in canonical order.
    pub const ALL: [Chord; NUM_CHORDS] = {
        let mut all = [Chord::major(PitchClass::C); NUM_CHORDS];
        let mut i = 0;
        while i < 12 {
            all[i] = Chord::major(PitchClass::from_index(i));
            all[i + 12] = Chord::minor(PitchClass::from_index(i));
            i += 1;
        }
        all
    };

    /// Major triad on `root`.
    #[must_use]
    pub const fn major(root: PitchClass) -> Self {
        Self {
            root,
            quality: ChordQuality::Major,
        }
    }

    /// Minor triad on `root`.
    #[must_use]
    pub const fn minor(root: PitchClass) -> Self {
        Self {
            root,
            quality: ChordQuality::Minor,
        }
    }

    /// Position in canonical order (0..24).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self.quality {
            ChordQuality::Major => self.root.index(),
            ChordQuality::Minor => 12 + self.root.index(),
        }
    }

    /// Chord at canonical position `idx`, if in range.
    #[must_use]
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// The three chord tones, root first.
    #[must_use]
    pub const fn pitch_classes(self) -> [PitchClass; 3] {
        let [a, b, c] = self.quality.intervals();
        [
            self.root.transpose(a),
            self.root.transpose(b),
            self.root.transpose(c),
        ]
    }
}

impl PartialOrd for Chord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Chord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Padding flags apply to the whole name ("{:4}" in listings).
        let name = format!("{}{}", self.root.name(), self.quality.suffix());
        f.pad(&name)
    }
}

impl FromStr for Chord {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (root, used) = PitchClass::parse_prefix(trimmed)
            .ok_or_else(|| CoreError::UnknownChord(trimmed.to_string()))?;
        match &trimmed[used..] {
            "" | "maj" | "M" => Ok(Chord::major(root)),
            "m" | "min" => Ok(Chord::minor(root)),
            _ => Err(CoreError::UnknownChord(trimmed.to_string())),
        }
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
