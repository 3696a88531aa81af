use crate::chord::Chord;
use crate::chroma::{ChromaFrame, ChromaMatrix};
use crate::templates::{ChordTemplate, TemplateBank};

/// Frames whose total energy falls below this are treated as silent.
pub const SILENCE_EPSILON: f32 = 1e-8;

/// A later template must beat the current best by more than this margin
/// to replace it, so near-equal scores resolve to canonical order.
pub const TIE_EPSILON: f32 = 1e-6;

/// Best template for one frame, with its cosine score in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordMatch {
    /// Winning chord.
    pub chord: Chord,
    /// Cosine similarity between the frame and the chord's template.
    pub score: f32,
}

/// Cosine similarity between a frame and a template.
///
/// Returns 0.0 for a silent frame. The frame is scaled to a peak of 1
/// first, so any finite level gives the same score.
#[inline]
#[must_use]
pub fn cosine_similarity(frame: &ChromaFrame, template: &ChordTemplate) -> f32 {
    let energy: f32 = frame.iter().sum();
    if energy < SILENCE_EPSILON || template.norm <= 0.0 {
        return 0.0;
    }
    let peak = f64::from(frame.iter().copied().fold(0.0f32, f32::max));
    let (dot, norm_sq) = frame
        .iter()
        .zip(template.weights.iter())
        .fold((0.0f64, 0.0f64), |(dot, norm_sq), (&f, &w)| {
            let v = f64::from(f) / peak;
            (dot + v * f64::from(w), norm_sq + v * v)
        });
    (dot / (norm_sq.sqrt() * f64::from(template.norm))) as f32
}

/// Score `frame` against every template and keep the best.
///
/// Ties go to the template that comes first in canonical order (C, C#,
/// ... B, then Cm ... Bm). A silent frame scores 0.0 everywhere and
/// therefore resolves to "C".
///
/// # Example
/// ```
/// use cl_core::classify::best_match;
/// use cl_core::templates::TemplateBank;
/// let mut frame = [0.0f32; 12];
/// frame[9] = 1.0; // A
/// frame[0] = 1.0; // C
/// frame[4] = 1.0; // E
/// let m = best_match(&frame, &TemplateBank::new());
/// assert_eq!(m.chord.to_string(), "Am");
/// ```
#[must_use]
pub fn best_match(frame: &ChromaFrame, bank: &TemplateBank) -> ChordMatch {
    // A TemplateBank always holds 24 templates.
    let templates = bank.templates();
    let mut best = ChordMatch {
        chord: templates[0].chord,
        score: cosine_similarity(frame, &templates[0]),
    };
    for template in &templates[1..] {
        let score = cosine_similarity(frame, template);
        if score > best.score + TIE_EPSILON {
            best = ChordMatch {
                chord: template.chord,
                score,
            };
        }
    }
    best
}

/// Label for one chroma frame. Never "unknown": silent and ambiguous
/// frames still get a definite chord and are left to the smoother.
#[must_use]
pub fn classify(frame: &ChromaFrame, bank: &TemplateBank) -> Chord {
    best_match(frame, bank).chord
}

/// Raw label sequence: one chord per frame, index-aligned with `matrix`.
#[must_use]
pub fn classify_all(matrix: &ChromaMatrix, bank: &TemplateBank) -> Vec<Chord> {
    matrix.iter().map(|frame| classify(frame, bank)).collect()
}

/// Per-frame matches including scores, index-aligned with `matrix`.
#[must_use]
pub fn match_all(matrix: &ChromaMatrix, bank: &TemplateBank) -> Vec<ChordMatch> {
    matrix.iter().map(|frame| best_match(frame, bank)).collect()
}
