use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use cl_core::pipeline::ChordAnalysis;
use serde::Serialize;

use crate::listing::{format_frequency_table, format_progression};
use crate::time::format_time;
use crate::timeline::Timeline;

/// Heavy rule framing the report.
pub const RULE: &str = "============================================================";
/// Header of the progression section; also the anchor for [`crate::parse`].
pub const PROGRESSION_HEADER: &str = "CHORD PROGRESSION:";
/// Header of the frequency section.
pub const FREQUENCY_HEADER: &str = "CHORD FREQUENCY:";

/// A finished analysis ready for the terminal, a text file or JSON.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    source: String,
    total_duration: f64,
    analysis: &'a ChordAnalysis,
    timeline: Option<Timeline>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    total_duration: f64,
    hop_duration: f64,
    chords: Vec<String>,
    #[serde(flatten)]
    analysis: &'a ChordAnalysis,
}

impl<'a> Report<'a> {
    /// Report for `analysis` of `source` (usually a file name).
    ///
    /// Total duration defaults to the analysed span; the timeline uses
    /// [`Timeline::default`].
    #[must_use]
    pub fn new(source: impl Into<String>, analysis: &'a ChordAnalysis) -> Self {
        Self {
            source: source.into(),
            total_duration: analysis.progression.duration(),
            analysis,
            timeline: Some(Timeline::default()),
        }
    }

    /// Override the reported duration (e.g. the decoded audio length).
    #[must_use]
    pub fn with_total_duration(mut self, seconds: f64) -> Self {
        self.total_duration = seconds;
        self
    }

    /// Timeline settings, or `None` to omit the timeline.
    #[must_use]
    pub fn with_timeline(mut self, timeline: Option<Timeline>) -> Self {
        self.timeline = timeline;
        self
    }

    /// Full text report, identical for terminal and file output.
    #[must_use]
    pub fn render(&self) -> String {
        let progression = &self.analysis.progression;
        let stats = &self.analysis.stats;
        let mut out = String::new();

        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "CHORD ANALYSIS RESULTS FOR: {}", self.source);
        let _ = writeln!(out, "{RULE}\n");
        let _ = writeln!(out, "Total Duration: {}\n", format_time(self.total_duration));

        let _ = writeln!(out, "{PROGRESSION_HEADER}");
        let _ = writeln!(out, "{}", "-".repeat(50));
        if progression.is_empty() {
            out.push_str("No clear chord progression detected.\n\n");
        } else {
            out.push_str(&format_progression(progression));
            out.push('\n');
            if let Some(timeline) = &self.timeline {
                out.push_str(&timeline.render(progression));
                out.push('\n');
            }
        }

        let _ = writeln!(out, "{FREQUENCY_HEADER}");
        let _ = writeln!(out, "{}", "-".repeat(30));
        if stats.is_empty() {
            out.push_str("No chords detected.\n");
        } else {
            out.push_str(&format_frequency_table(stats));
        }
        let _ = writeln!(out, "\n{RULE}");
        out
    }

    /// Write the text report to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_report(&self, path: &Path) -> Result<()> {
        if path.exists() {
            log::info!("Overwriting existing report {}", path.display());
        }
        std::fs::write(path, self.render())
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        log::info!("Report saved to {}", path.display());
        Ok(())
    }

    /// Pretty JSON: metadata plus the complete analysis.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let doc = JsonReport {
            source: &self.source,
            total_duration: self.total_duration,
            hop_duration: self.analysis.progression.hop_duration,
            chords: self.analysis.progression.chord_names(),
            analysis: self.analysis,
        };
        serde_json::to_string_pretty(&doc).context("Failed to serialize report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_core::chord::Chord;
    use cl_core::chroma::ChromaMatrix;
    use cl_core::pipeline::ChordPipeline;
    use cl_core::templates::TemplateBank;

    fn analysis(spec: &[(&str, usize)]) -> ChordAnalysis {
        let bank = TemplateBank::new();
        let frames: Vec<[f32; 12]> = spec
            .iter()
            .flat_map(|(n, k)| {
                let chord: Chord = n.parse().unwrap();
                let weights = bank.get(chord).weights;
                std::iter::repeat_n(weights, *k)
            })
            .collect();
        let chroma = ChromaMatrix::from_arrays(frames).unwrap();
        ChordPipeline::new(bank, 5, 512.0 / 22050.0)
            .unwrap()
            .analyze(&chroma)
            .unwrap()
    }

    #[test]
    fn text_report_has_all_sections() {
        let a = analysis(&[("Am", 30), ("F", 30)]);
        let text = Report::new("song.wav", &a).render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "CHORD ANALYSIS RESULTS FOR: song.wav");
        assert_eq!(lines[4], "Total Duration: 00:01.393");
        assert!(text.contains(" 1. Am   | 00:00.000 - 00:00.696 | Duration: 00:00.696"));
        assert!(text.contains("|---|---|"));
        assert!(text.contains("Am  :  50.0% (30 frames)"));
        assert_eq!(*lines.last().unwrap(), RULE);
    }

    #[test]
    fn timeline_can_be_omitted() {
        let a = analysis(&[("G", 30)]);
        let text = Report::new("x", &a).with_timeline(None).render();
        assert!(!text.contains("|---"));
        assert!(text.contains(" 1. G "));
    }

    #[test]
    fn empty_analysis_reports_placeholders() {
        let a = analysis(&[]);
        let text = Report::new("silence.wav", &a).render();
        assert!(text.contains("No clear chord progression detected."));
        assert!(text.contains("No chords detected."));
        assert!(text.contains("Total Duration: 00:00.000"));
    }

    #[test]
    fn write_report_persists_rendered_text() {
        let a = analysis(&[("C", 12)]);
        let report = Report::new("c.wav", &a).with_total_duration(0.5);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chord-output.txt");
        report.write_report(&path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved, report.render());
        assert!(saved.contains("Total Duration: 00:00.500"));
    }

    #[test]
    fn json_contains_metadata_and_analysis() {
        let a = analysis(&[("Em", 10)]);
        let json = Report::new("e.flac", &a).to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["source"], "e.flac");
        assert_eq!(v["chords"][0], "Em");
        assert_eq!(v["raw_labels"].as_array().unwrap().len(), 10);
        assert_eq!(v["stats"]["entries"][0]["chord"], "Em");
    }
}
