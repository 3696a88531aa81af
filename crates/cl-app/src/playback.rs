use std::path::Path;

use anyhow::{Context, Result};
use cl_audio::playback::play_samples;
use cl_audio::synth::{ChordSynth, ScheduledChord};
use cl_report::parse::{ParsedChord, parse_report};
use cl_report::time::format_time;

/// Output rate of the chord synthesizer (Hz).
pub const PLAYBACK_RATE: u32 = 44_100;

/// Timeline for the synthesizer, one entry per parsed report line.
#[must_use]
pub fn schedule(chords: &[ParsedChord]) -> Vec<ScheduledChord> {
    chords
        .iter()
        .map(|c| ScheduledChord {
            chord: c.chord,
            start: c.start,
            duration: c.duration,
        })
        .collect()
}

/// Synthesize and play the progression stored in a saved text report.
///
/// # Errors
/// Returns an error if the report cannot be read or holds no chords, or
/// the output device fails.
pub fn play_report(path: &Path, stop: &flume::Receiver<()>) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    let chords = parse_report(&text).with_context(|| format!("Invalid report {}", path.display()))?;
    if chords.is_empty() {
        anyhow::bail!("No chords found in {}", path.display());
    }

    println!("Playing {} chords from {}. Press Ctrl+C to stop.", chords.len(), path.display());
    for (i, c) in chords.iter().enumerate() {
        println!("{:2}. {:4} | {} for {}", i + 1, c.chord, format_time(c.start), format_time(c.duration));
    }

    let samples = ChordSynth::new(PLAYBACK_RATE).render_timeline(&schedule(&chords));
    if play_samples(samples, PLAYBACK_RATE, stop)? {
        println!("Playback finished.");
    } else {
        println!("Playback stopped.");
    }
    Ok(())
}
