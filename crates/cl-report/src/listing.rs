use std::fmt::Write;

use cl_core::segment::{FrequencyStats, Progression};

use crate::time::format_time;

/// One line per event: `" 1. Am   | 00:00.000 - 00:00.696 | Duration: 00:00.696"`.
///
/// # Example
/// ```
/// use cl_core::segment::build_progression;
/// use cl_report::listing::format_progression;
/// let labels = vec!["Am".parse().unwrap(); 30];
/// let (p, _) = build_progression(&labels, 512.0 / 22050.0).unwrap();
/// assert_eq!(
///     format_progression(&p),
///     " 1. Am   | 00:00.000 - 00:00.696 | Duration: 00:00.696\n"
/// );
/// ```
#[must_use]
pub fn format_progression(progression: &Progression) -> String {
    let mut out = String::new();
    for (i, event) in progression.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:2}. {:4} | {} - {} | Duration: {}",
            i + 1,
            event.chord,
            format_time(event.start_time),
            format_time(event.end_time),
            format_time(event.duration())
        );
    }
    out
}

/// One line per chord in the stats' order: `"Am  :  25.0% (30 frames)"`.
#[must_use]
pub fn format_frequency_table(stats: &FrequencyStats) -> String {
    let mut out = String::new();
    for entry in &stats.entries {
        let unit = if entry.frames == 1 { "frame" } else { "frames" };
        let _ = writeln!(
            out,
            "{:4}: {:5.1}% ({} {unit})",
            entry.chord, entry.percentage, entry.frames
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_core::chord::Chord;
    use cl_core::segment::build_progression;

    fn labels(spec: &[(&str, usize)]) -> Vec<Chord> {
        spec.iter()
            .flat_map(|(n, k)| std::iter::repeat_n(n.parse::<Chord>().unwrap(), *k))
            .collect()
    }

    #[test]
    fn listing_numbers_and_aligns_events() {
        let l = labels(&[("C", 2), ("F#m", 3)]);
        let (p, _) = build_progression(&l, 0.5).unwrap();
        let text = format_progression(&p);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], " 1. C    | 00:00.000 - 00:01.000 | Duration: 00:01.000");
        assert_eq!(lines[1], " 2. F#m  | 00:01.000 - 00:02.500 | Duration: 00:01.500");
    }

    #[test]
    fn frequency_table_rounds_to_one_decimal() {
        let l = labels(&[("G", 2), ("C", 1)]);
        let (_, s) = build_progression(&l, 0.5).unwrap();
        let text = format_frequency_table(&s);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "G   :  66.7% (2 frames)");
        assert_eq!(lines[1], "C   :  33.3% (1 frame)");
    }

    #[test]
    fn empty_inputs_render_nothing() {
        let (p, s) = build_progression(&[], 0.5).unwrap();
        assert!(format_progression(&p).is_empty());
        assert!(format_frequency_table(&s).is_empty());
    }
}
