use anyhow::{Result, bail};
use cl_core::chord::Chord;

use crate::report::{FREQUENCY_HEADER, PROGRESSION_HEADER};
use crate::time::parse_time;

/// One progression line read back from a saved report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedChord {
    /// Chord named on the line.
    pub chord: Chord,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Duration column in seconds.
    pub duration: f64,
}

/// Read the progression section of a text report.
///
/// Lines that name an unknown chord are skipped with a warning; anything
/// else inside the section that is not a progression line (timeline rows,
/// blank lines) is ignored.
///
/// # Errors
/// Returns an error if the text has no progression section.
///
/// # Example
/// ```
/// use cl_report::parse::parse_report;
/// let text = "CHORD PROGRESSION:\n---\n 1. Am   | 00:00.000 - 00:00.696 | Duration: 00:00.696\n";
/// let chords = parse_report(text).unwrap();
/// assert_eq!(chords[0].chord.to_string(), "Am");
/// assert!((chords[0].end - 0.696).abs() < 1e-9);
/// ```
pub fn parse_report(text: &str) -> Result<Vec<ParsedChord>> {
    let mut lines = text.lines();
    if !lines.any(|l| l.trim_end().ends_with(PROGRESSION_HEADER)) {
        bail!("No chord progression section found");
    }

    let mut chords = Vec::new();
    for line in lines {
        if line.trim_end().ends_with(FREQUENCY_HEADER) {
            break;
        }
        let Some((name, start, end, duration)) = split_entry(line) else {
            continue;
        };
        match name.parse::<Chord>() {
            Ok(chord) => chords.push(ParsedChord {
                chord,
                start,
                end,
                duration,
            }),
            Err(e) => log::warn!("Skipping line {:?}: {e}", line.trim()),
        }
    }
    Ok(chords)
}

/// `" 1. Am   | 00:00.000 - 00:00.696 | Duration: 00:00.696"` → parts.
fn split_entry(line: &str) -> Option<(&str, f64, f64, f64)> {
    let mut fields = line.split('|');
    let head = fields.next()?;
    let span = fields.next()?;
    let tail = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let (number, name) = head.trim().split_once('.')?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (start, end) = span.split_once(" - ")?;
    let duration = tail.trim().strip_prefix("Duration:")?;
    Some((
        name.trim(),
        parse_time(start)?,
        parse_time(end)?,
        parse_time(duration)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVED: &str = "\
============================================================
CHORD ANALYSIS RESULTS FOR: demo.wav
============================================================

Total Duration: 00:04.000

CHORD PROGRESSION:
--------------------------------------------------
 1. Am   | 00:00.000 - 00:01.500 | Duration: 00:01.500
 2. F    | 00:01.500 - 00:02.000 | Duration: 00:00.500
 3. Hm   | 00:02.000 - 00:03.000 | Duration: 00:01.000
 4. G    | 00:03.000 - 00:04.000 | Duration: 00:01.000

|----|-|---|---|
  Am  F  Hm  G

CHORD FREQUENCY:
------------------------------
Am  :  37.5% (15 frames)

============================================================
";

    #[test]
    fn reads_progression_lines_in_order() {
        let chords = parse_report(SAVED).unwrap();
        let names: Vec<String> = chords.iter().map(|c| c.chord.to_string()).collect();
        assert_eq!(names, vec!["Am", "F", "G"]);
        assert!((chords[1].start - 1.5).abs() < 1e-9);
        assert!((chords[1].duration - 0.5).abs() < 1e-9);
        assert!((chords[2].end - 4.0).abs() < 1e-9);
    }

    #[test]
    fn accepts_decorated_headers() {
        let text = "📊 CHORD PROGRESSION:\n-----\n 1. D#   | 00:00.000 - 00:00.100 | Duration: 00:00.100\n";
        let chords = parse_report(text).unwrap();
        assert_eq!(chords[0].chord.to_string(), "D#");
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(parse_report("nothing to see").is_err());
    }

    #[test]
    fn empty_progression_parses_to_nothing() {
        let text = "CHORD PROGRESSION:\n---\nNo clear chord progression detected.\n\nCHORD FREQUENCY:\n";
        assert!(parse_report(text).unwrap().is_empty());
    }
}
