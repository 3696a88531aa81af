use serde::Serialize;

use crate::chord::{Chord, NUM_CHORDS};
use crate::error::CoreError;

/// One maximal run of identical smoothed labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChordEvent {
    /// Chord held during the run.
    pub chord: Chord,
    /// Index of the run's first frame.
    pub start_frame: usize,
    /// Number of frames in the run (>= 1).
    pub frame_count: usize,
    /// `start_frame × hop_duration`, in seconds.
    pub start_time: f64,
    /// `(start_frame + frame_count) × hop_duration`, in seconds.
    pub end_time: f64,
}

impl ChordEvent {
    /// Length of the event in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Index one past the run's last frame.
    #[must_use]
    pub fn end_frame(&self) -> usize {
        self.start_frame + self.frame_count
    }
}

/// Contiguous, gap-free sequence of chord events.
///
/// Adjacent events never share a chord, and the events cover
/// `[0, total_frames × hop_duration)` exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    /// Events in time order.
    pub events: Vec<ChordEvent>,
    /// Seconds per analysis frame.
    pub hop_duration: f64,
    /// Number of frames the progression covers.
    pub total_frames: usize,
}

impl Progression {
    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` when there are no events (zero-frame input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Covered duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.total_frames as f64 * self.hop_duration
    }

    /// Iterate events in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChordEvent> {
        self.events.iter()
    }

    /// Chord names in order, e.g. `["Am", "F", "C", "G"]`.
    #[must_use]
    pub fn chord_names(&self) -> Vec<String> {
        self.events.iter().map(|e| e.chord.to_string()).collect()
    }

    /// Event sounding at `time` seconds.
    #[must_use]
    pub fn event_at(&self, time: f64) -> Option<&ChordEvent> {
        if time < 0.0 || self.hop_duration <= 0.0 {
            return None;
        }
        let frame = (time / self.hop_duration) as usize;
        self.events
            .iter()
            .find(|e| frame >= e.start_frame && frame < e.end_frame())
    }
}

impl<'a> IntoIterator for &'a Progression {
    type Item = &'a ChordEvent;
    type IntoIter = std::slice::Iter<'a, ChordEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Frame count and share of one chord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChordFrequency {
    /// The chord.
    pub chord: Chord,
    /// Exact number of smoothed frames carrying this chord.
    pub frames: usize,
    /// `frames / total_frames × 100`, unrounded.
    pub percentage: f64,
}

/// Frame-weighted chord frequencies over the smoothed label sequence.
///
/// Entries are sorted by descending frame count, ties alphabetically by
/// chord name. Chords that never occur are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyStats {
    /// Sorted entries.
    pub entries: Vec<ChordFrequency>,
    /// Total number of frames tallied.
    pub total_frames: usize,
}

impl FrequencyStats {
    /// Entry for `chord`, if it occurs.
    #[must_use]
    pub fn get(&self, chord: Chord) -> Option<&ChordFrequency> {
        self.entries.iter().find(|e| e.chord == chord)
    }

    /// Number of distinct chords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` for zero-frame input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tally smoothed labels per chord.
///
/// # Example
/// ```
/// use cl_core::chord::Chord;
/// use cl_core::segment::frequency_stats;
/// let labels: Vec<Chord> = ["G", "G", "G", "C"].iter().map(|s| s.parse().unwrap()).collect();
/// let stats = frequency_stats(&labels);
/// assert_eq!(stats.entries[0].frames, 3);
/// assert!((stats.entries[0].percentage - 75.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn frequency_stats(labels: &[Chord]) -> FrequencyStats {
    let mut counts = [0usize; NUM_CHORDS];
    for chord in labels {
        counts[chord.index()] += 1;
    }
    let total = labels.len();

    let mut entries: Vec<ChordFrequency> = Chord::ALL
        .iter()
        .filter(|c| counts[c.index()] > 0)
        .map(|&chord| {
            let frames = counts[chord.index()];
            ChordFrequency {
                chord,
                frames,
                percentage: frames as f64 / total as f64 * 100.0,
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        b.frames
            .cmp(&a.frames)
            .then_with(|| a.chord.to_string().cmp(&b.chord.to_string()))
    });

    FrequencyStats {
        entries,
        total_frames: total,
    }
}

/// Collapse smoothed labels into chord events and tally frequencies.
///
/// Times derive from frame indices (`index × hop_duration`), so
/// consecutive events share their boundary exactly.
///
/// # Errors
/// Returns [`CoreError::Configuration`] if `hop_duration` is not a
/// positive finite number.
pub fn build_progression(
    smoothed: &[Chord],
    hop_duration: f64,
) -> Result<(Progression, FrequencyStats), CoreError> {
    if !hop_duration.is_finite() || hop_duration <= 0.0 {
        return Err(CoreError::Configuration(format!(
            "hop duration must be positive, got {hop_duration}"
        )));
    }

    let mut events: Vec<ChordEvent> = Vec::new();
    let mut start = 0;
    for i in 1..=smoothed.len() {
        if i == smoothed.len() || smoothed[i] != smoothed[start] {
            events.push(ChordEvent {
                chord: smoothed[start],
                start_frame: start,
                frame_count: i - start,
                start_time: start as f64 * hop_duration,
                end_time: i as f64 * hop_duration,
            });
            start = i;
        }
    }

    let progression = Progression {
        events,
        hop_duration,
        total_frames: smoothed.len(),
    };
    Ok((progression, frequency_stats(smoothed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOP: f64 = 512.0 / 22050.0;

    fn seq(names: &[&str]) -> Vec<Chord> {
        names.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn empty_input_gives_empty_results() {
        let (p, s) = build_progression(&[], HOP).unwrap();
        assert!(p.is_empty());
        assert!(s.is_empty());
        assert_eq!(p.total_frames, 0);
    }

    #[test]
    fn runs_become_events() {
        let labels = seq(&["C", "C", "G", "G", "G", "C"]);
        let (p, _) = build_progression(&labels, HOP).unwrap();
        assert_eq!(p.chord_names(), vec!["C", "G", "C"]);
        assert_eq!(p.events[1].start_frame, 2);
        assert_eq!(p.events[1].frame_count, 3);
        assert!((p.events[1].start_time - 2.0 * HOP).abs() < 1e-12);
        assert!((p.events[1].end_time - 5.0 * HOP).abs() < 1e-12);
    }

    #[test]
    fn events_are_contiguous_and_cover_input() {
        let labels = seq(&["Am", "F", "F", "C", "G", "G", "G", "Am", "Am"]);
        let (p, _) = build_progression(&labels, HOP).unwrap();
        assert_eq!(p.events[0].start_time, 0.0);
        for pair in p.events.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
            assert_ne!(pair[0].chord, pair[1].chord);
        }
        let last = p.events.last().unwrap();
        assert!((last.end_time - labels.len() as f64 * HOP).abs() < 1e-12);
        let frames: usize = p.iter().map(|e| e.frame_count).sum();
        assert_eq!(frames, labels.len());
    }

    #[test]
    fn stats_are_frame_weighted_and_sorted() {
        let labels = seq(&["G", "C", "C", "C", "G", "Am", "Am", "Am"]);
        let (_, s) = build_progression(&labels, HOP).unwrap();
        let order: Vec<String> = s.entries.iter().map(|e| e.chord.to_string()).collect();
        // Am and C tie on 3 frames: alphabetical.
        assert_eq!(order, vec!["Am", "C", "G"]);
        assert_eq!(s.get("G".parse().unwrap()).unwrap().frames, 2);
        let total: f64 = s.entries.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_hop_duration() {
        let labels = seq(&["C"]);
        assert!(build_progression(&labels, 0.0).unwrap_err().is_configuration());
        assert!(build_progression(&labels, f64::NAN).is_err());
        assert!(build_progression(&labels, -1.0).is_err());
    }

    #[test]
    fn event_lookup_by_time() {
        let labels = seq(&["C", "C", "G", "G"]);
        let (p, _) = build_progression(&labels, 0.5).unwrap();
        assert_eq!(p.event_at(0.2).unwrap().chord.to_string(), "C");
        assert_eq!(p.event_at(1.2).unwrap().chord.to_string(), "G");
        assert!(p.event_at(2.5).is_none());
        assert!((p.duration() - 2.0).abs() < 1e-12);
    }
}
