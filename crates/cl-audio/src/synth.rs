//! Guitar-ish chord synthesis for previewing a detected progression.
//!
//! Each chord tone is a sawtooth plus a quieter square wave one octave up,
//! shaped by a linear attack/release envelope.

use cl_core::chord::Chord;
use cl_core::pitch::PitchClass;
use cl_core::segment::Progression;

/// Octave the chord root is voiced in.
pub const ROOT_OCTAVE: i32 = 4;

/// A chord placed on the playback timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledChord {
    /// Chord to play.
    pub chord: Chord,
    /// Onset in seconds.
    pub start: f64,
    /// Length in seconds.
    pub duration: f64,
}

/// Equal-tempered frequency of `pc` in `octave` (A4 = `tuning_hz`).
#[must_use]
pub fn note_frequency(pc: PitchClass, octave: i32, tuning_hz: f32) -> f32 {
    let midi = 12 * (octave + 1) + pc.index() as i32;
    tuning_hz * 2f32.powf((midi - 69) as f32 / 12.0)
}

/// Close-position voicing: root in `ROOT_OCTAVE`, upper tones stacked above it.
///
/// # Example
/// ```
/// use cl_audio::synth::voicing;
/// // F major: F4, A4, C5
/// let f = voicing("F".parse().unwrap(), 440.0);
/// assert!((f[2] / f[0] - 2f32.powf(7.0 / 12.0)).abs() < 1e-4);
/// ```
#[must_use]
pub fn voicing(chord: Chord, tuning_hz: f32) -> [f32; 3] {
    let mut octave = ROOT_OCTAVE;
    let mut prev = chord.root.index();
    chord.pitch_classes().map(|pc| {
        if pc.index() < prev {
            octave += 1;
        }
        prev = pc.index();
        note_frequency(pc, octave, tuning_hz)
    })
}

/// Chord synthesiser.
#[derive(Debug, Clone)]
pub struct ChordSynth {
    sample_rate: u32,
    tuning_hz: f32,
    saw_volume: f32,
    square_volume: f32,
    attack_secs: f32,
    release_secs: f32,
    gain: f32,
}

impl ChordSynth {
    /// Synth with the default voice mix (saw 0.8, square 0.3 an octave up).
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            tuning_hz: 440.0,
            saw_volume: 0.8,
            square_volume: 0.3,
            attack_secs: 0.01,
            release_secs: 0.05,
            gain: 0.25,
        }
    }

    /// Output sample rate.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render `chord` for `duration` seconds.
    #[must_use]
    pub fn render_chord(&self, chord: Chord, duration: f64) -> Vec<f32> {
        let n = (duration.max(0.0) * f64::from(self.sample_rate)) as usize;
        let sr = self.sample_rate as f32;
        let freqs = voicing(chord, self.tuning_hz);
        let attack = (self.attack_secs * sr) as usize;
        let release = (self.release_secs * sr) as usize;

        (0..n)
            .map(|i| {
                let t = i as f32 / sr;
                let voice: f32 = freqs
                    .iter()
                    .map(|&f| {
                        self.saw_volume * sawtooth(f * t) + self.square_volume * square(2.0 * f * t)
                    })
                    .sum();
                voice * self.gain * envelope(i, n, attack, release)
            })
            .collect()
    }

    /// Render a whole timeline; chords are mixed in at their start times.
    #[must_use]
    pub fn render_timeline(&self, chords: &[ScheduledChord]) -> Vec<f32> {
        let sr = f64::from(self.sample_rate);
        let total = chords
            .iter()
            .map(|c| ((c.start + c.duration).max(0.0) * sr) as usize)
            .max()
            .unwrap_or(0);
        let mut out = vec![0.0f32; total];
        for c in chords {
            let offset = (c.start.max(0.0) * sr) as usize;
            for (slot, s) in out[offset.min(total)..]
                .iter_mut()
                .zip(self.render_chord(c.chord, c.duration))
            {
                *slot += s;
            }
        }
        for s in &mut out {
            *s = s.clamp(-1.0, 1.0);
        }
        out
    }

    /// Render a detected progression, one chord per event.
    #[must_use]
    pub fn render_progression(&self, progression: &Progression) -> Vec<f32> {
        let chords: Vec<ScheduledChord> = progression
            .iter()
            .map(|e| ScheduledChord {
                chord: e.chord,
                start: e.start_time,
                duration: e.duration(),
            })
            .collect();
        self.render_timeline(&chords)
    }
}

/// Naive sawtooth in [-1, 1] for `phase` measured in cycles.
#[inline]
fn sawtooth(phase: f32) -> f32 {
    2.0 * phase.fract() - 1.0
}

/// Naive square in {-1, 1} for `phase` measured in cycles.
#[inline]
fn square(phase: f32) -> f32 {
    if phase.fract() < 0.5 { 1.0 } else { -1.0 }
}

/// Linear attack/release gain for sample `i` of `n`.
#[inline]
fn envelope(i: usize, n: usize, attack: usize, release: usize) -> f32 {
    let rise = if attack > 0 && i < attack {
        i as f32 / attack as f32
    } else {
        1.0
    };
    let remaining = n - i;
    let fall = if release > 0 && remaining < release {
        remaining as f32 / release as f32
    } else {
        1.0
    };
    rise.min(fall)
}
