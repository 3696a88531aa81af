use cl_core::chord::Chord;
use cl_core::chroma::{ChromaFrame, ChromaMatrix};
use cl_core::config::AnalysisConfig;
use cl_core::pipeline::ChordPipeline;
use cl_core::templates::TemplateBank;

const HOP: f64 = 512.0 / 22050.0;

fn chord(name: &str) -> Chord {
    name.parse().unwrap()
}

/// A frame dominated by `name`'s chord tones with a little bleed elsewhere.
fn frame_for(name: &str, jitter: usize) -> ChromaFrame {
    let mut f = [0.05f32; 12];
    for pc in chord(name).pitch_classes() {
        f[pc.index()] = 1.0;
    }
    f[jitter % 12] += 0.1;
    f
}

fn blocks(names: &[&str], len: usize) -> ChromaMatrix {
    let frames = names
        .iter()
        .flat_map(|n| (0..len).map(move |i| frame_for(n, i)))
        .collect();
    ChromaMatrix::from_arrays(frames).unwrap()
}

fn pipeline() -> ChordPipeline {
    ChordPipeline::new(TemplateBank::new(), 5, HOP).unwrap()
}

#[test]
fn four_block_progression() {
    let analysis = pipeline().analyze(&blocks(&["Am", "F", "C", "G"], 30)).unwrap();

    let names = analysis.progression.chord_names();
    assert_eq!(names, vec!["Am", "F", "C", "G"]);
    for (i, event) in analysis.progression.iter().enumerate() {
        assert_eq!(event.frame_count, 30);
        assert_eq!(event.start_frame, i * 30);
        assert!((event.duration() - 30.0 * HOP).abs() < 1e-9);
        assert!((event.duration() - 0.6965).abs() < 1e-3);
    }

    assert_eq!(analysis.stats.len(), 4);
    for entry in &analysis.stats.entries {
        assert_eq!(entry.frames, 30);
        assert!((entry.percentage - 25.0).abs() < 1e-9);
    }
    // Equal counts: alphabetical.
    let order: Vec<String> = analysis
        .stats
        .entries
        .iter()
        .map(|e| e.chord.to_string())
        .collect();
    assert_eq!(order, vec!["Am", "C", "F", "G"]);
}

#[test]
fn empty_matrix_is_not_an_error() {
    let analysis = pipeline().analyze(&ChromaMatrix::default()).unwrap();
    assert!(analysis.raw_labels.is_empty());
    assert!(analysis.progression.is_empty());
    assert!(analysis.stats.is_empty());
}

#[test]
fn single_frame_glitch_is_smoothed_away() {
    let mut frames: Vec<ChromaFrame> = Vec::new();
    frames.extend((0..6).map(|i| frame_for("C", i)));
    frames.push(frame_for("F#", 0));
    frames.extend((0..6).map(|i| frame_for("G", i)));
    let matrix = ChromaMatrix::from_arrays(frames).unwrap();

    let analysis = pipeline().analyze(&matrix).unwrap();
    assert_eq!(analysis.raw_labels[6], chord("F#"));
    assert_eq!(analysis.progression.chord_names(), vec!["C", "G"]);
    assert_eq!(analysis.smoothed_labels.len(), analysis.raw_labels.len());
}

#[test]
fn progression_covers_input_without_gaps() {
    let matrix = blocks(&["D", "Bm", "G", "A", "D"], 9);
    let analysis = pipeline().analyze(&matrix).unwrap();
    let events = &analysis.progression.events;

    assert_eq!(events[0].start_time, 0.0);
    for pair in events.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time);
        assert_ne!(pair[0].chord, pair[1].chord);
    }
    let end = events.last().unwrap().end_time;
    assert!((end - matrix.len() as f64 * HOP).abs() < 1e-9);

    let pct: f64 = analysis.stats.entries.iter().map(|e| e.percentage).sum();
    assert!((pct - 100.0).abs() < 1e-6);
}

#[test]
fn rerunning_is_idempotent() {
    let matrix = blocks(&["Em", "C", "G", "D"], 12);
    let p = pipeline();
    let first = p.analyze(&matrix).unwrap();
    let second = p.analyze(&matrix).unwrap();
    assert_eq!(first, second);

    let other = ChordPipeline::from_config(&AnalysisConfig::default()).unwrap();
    assert_eq!(other.analyze(&matrix).unwrap(), first);
}

#[test]
fn malformed_matrix_is_rejected_before_analysis() {
    let err = ChromaMatrix::from_frames(vec![vec![0.1; 12], vec![0.1; 6]]).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(err.to_string().contains("frame 1"));
}
