use cl_core::segment::{ChordEvent, Progression};

/// ASCII timeline renderer.
///
/// Every event becomes a run of `-` whose width follows its frame count
/// (not wall-clock time), closed by `|`. A label row under each bar row
/// centres the chord name on its segment; names that do not fit become
/// [`NARROW_MARKER`]. Rows wrap on event boundaries
/// once `max_width` would be exceeded.
///
/// # Example
/// ```
/// use cl_core::segment::build_progression;
/// use cl_report::timeline::Timeline;
/// let labels: Vec<_> = ["C", "C", "G", "G"].iter().map(|s| s.parse().unwrap()).collect();
/// let (p, _) = build_progression(&labels, 0.1).unwrap();
/// let text = Timeline::new(1, 80).render(&p);
/// assert_eq!(text, "|--|--|\n  C  G\n");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    frames_per_cell: usize,
    max_width: usize,
}

impl Timeline {
    /// Renderer with `frames_per_cell` frames per dash (min 1).
    #[must_use]
    pub fn new(frames_per_cell: usize, max_width: usize) -> Self {
        Self {
            frames_per_cell: frames_per_cell.max(1),
            max_width: max_width.max(3),
        }
    }

    /// Dash count for one event: `max(1, round(frames / frames_per_cell))`.
    #[must_use]
    pub fn segment_width(&self, event: &ChordEvent) -> usize {
        let cells = (event.frame_count + self.frames_per_cell / 2) / self.frames_per_cell;
        cells.max(1)
    }

    /// Render the timeline. An empty progression renders as an empty string.
    #[must_use]
    pub fn render(&self, progression: &Progression) -> String {
        let mut out = String::new();
        let mut bars = String::new();
        let mut labels = String::new();

        for event in progression {
            let width = self.segment_width(event);
            // Leading "|" plus this segment and its closing "|".
            let needed = if bars.is_empty() { width + 2 } else { width + 1 };
            if !bars.is_empty() && bars.len() + needed > self.max_width {
                flush_row(&mut out, &mut bars, &mut labels);
            }
            if bars.is_empty() {
                bars.push('|');
                labels.push(' ');
            }
            bars.push_str(&"-".repeat(width));
            bars.push('|');
            labels.push_str(&centred(&event.chord.to_string(), width + 1));
        }
        if !bars.is_empty() {
            flush_row(&mut out, &mut bars, &mut labels);
        }
        out
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(10, 100)
    }
}

fn flush_row(out: &mut String, bars: &mut String, labels: &mut String) {
    out.push_str(bars);
    out.push('\n');
    out.push_str(labels.trim_end());
    out.push('\n');
    bars.clear();
    labels.clear();
}

/// Marker drawn under segments too narrow for their chord name.
pub const NARROW_MARKER: char = '·';

/// Centre `name` in `width` cells, or [`NARROW_MARKER`] if it does not fit.
///
/// The label cell spans the segment plus its closing bar, so a name of
/// width-1 or less never collides with the next label. A name is shown
/// whole or not at all.
fn centred(name: &str, width: usize) -> String {
    let room = width.saturating_sub(1);
    let shown = if name.chars().count() <= room {
        name.to_string()
    } else {
        NARROW_MARKER.to_string()
    };
    let pad = width.saturating_sub(shown.chars().count());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), shown, " ".repeat(pad - left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_core::chord::Chord;
    use cl_core::segment::build_progression;

    fn progression(spec: &[(&str, usize)]) -> Progression {
        let labels: Vec<Chord> = spec
            .iter()
            .flat_map(|(n, k)| std::iter::repeat_n(n.parse::<Chord>().unwrap(), *k))
            .collect();
        build_progression(&labels, 0.1).unwrap().0
    }

    #[test]
    fn widths_follow_frame_counts() {
        let p = progression(&[("Am", 50), ("F", 20), ("C", 4)]);
        let t = Timeline::new(10, 200);
        let widths: Vec<usize> = p.iter().map(|e| t.segment_width(e)).collect();
        assert_eq!(widths, vec![5, 2, 1]);
        let text = t.render(&p);
        let bars = text.lines().next().unwrap();
        assert_eq!(bars, "|-----|--|-|");
    }

    #[test]
    fn width_is_independent_of_hop_duration() {
        let spec = [("G", 30), ("D", 30)];
        let labels: Vec<Chord> = spec
            .iter()
            .flat_map(|(n, k)| std::iter::repeat_n(n.parse::<Chord>().unwrap(), *k))
            .collect();
        let fast = build_progression(&labels, 0.01).unwrap().0;
        let slow = build_progression(&labels, 1.0).unwrap().0;
        let t = Timeline::new(5, 100);
        assert_eq!(t.render(&fast), t.render(&slow));
    }

    #[test]
    fn labels_are_centred_under_segments() {
        let p = progression(&[("Am", 50), ("G", 50)]);
        let text = Timeline::new(10, 100).render(&p);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "|-----|-----|");
        assert_eq!(lines[1], "   Am    G");
    }

    #[test]
    fn rows_wrap_on_event_boundaries() {
        let p = progression(&[("C", 50), ("G", 50), ("Am", 50), ("F", 50)]);
        let text = Timeline::new(10, 14).render(&p);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "|-----|-----|");
        assert_eq!(lines[2], "|-----|-----|");
        assert!(lines[3].contains("Am") && lines[3].contains('F'));
    }

    #[test]
    fn narrow_segments_mark_names_that_do_not_fit() {
        let p = progression(&[("C#m", 10), ("C", 10), ("F#", 30)]);
        let text = Timeline::new(10, 100).render(&p);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "|-|-|---|");
        assert_eq!(lines[1], " · C  F#");
        assert!(!lines[1].starts_with(" C "));
    }

    #[test]
    fn empty_progression_renders_nothing() {
        assert!(Timeline::default().render(&progression(&[])).is_empty());
    }
}
