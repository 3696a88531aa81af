use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cl_audio::capture::record_until;
use cl_audio::decode::{has_audio_extension, load_audio};
use cl_audio::resample::resample;
use cl_audio::{ChromaExtractor, ChromaSettings};
use cl_core::config::AnalysisConfig;
use cl_core::pipeline::{ChordAnalysis, ChordPipeline};
use cl_report::{Report, Timeline};

/// How a finished analysis is presented.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Save the text report here.
    pub save_path: Option<PathBuf>,
    /// Print JSON instead of text.
    pub json: bool,
    /// Include the ASCII timeline.
    pub timeline: bool,
}

/// Analyse an audio file and print (and optionally save) its report.
///
/// # Errors
/// Returns an error if decoding, analysis or writing the report fails.
pub fn analyze_file(path: &Path, config: &AnalysisConfig, output: &OutputOptions) -> Result<()> {
    if !has_audio_extension(path) {
        log::warn!(
            "Unrecognised audio extension for {}, trying to decode anyway",
            path.display()
        );
    }
    let (samples, sample_rate) = load_audio(path, config.sample_rate)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let total_duration = samples.len() as f64 / f64::from(sample_rate);

    let analysis = analyze_samples(&samples, config)?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    emit(&name, total_duration, &analysis, config, output)
}

/// Record from the microphone until `stop` fires, then analyse the take.
///
/// # Errors
/// Returns an error if the input device fails, nothing was recorded, or
/// analysis fails.
pub fn analyze_mic(
    config: &AnalysisConfig,
    output: &OutputOptions,
    stop: &flume::Receiver<()>,
    max_duration: Option<Duration>,
) -> Result<()> {
    println!("Recording from the default microphone. Press Ctrl+C to stop.");
    let recording = record_until(stop, max_duration)?;
    if recording.samples.is_empty() {
        anyhow::bail!("No audio was recorded");
    }
    let samples = resample(&recording.samples, recording.sample_rate, config.sample_rate)?;
    let analysis = analyze_samples(&samples, config)?;
    emit("microphone", recording.duration_secs(), &analysis, config, output)
}

/// Chroma extraction followed by the chord pipeline.
///
/// # Errors
/// Returns an error if the settings are invalid or `samples` is empty.
pub fn analyze_samples(samples: &[f32], config: &AnalysisConfig) -> Result<ChordAnalysis> {
    let extractor = ChromaExtractor::new(ChromaSettings::from_config(config))?;
    let chroma = extractor.extract(samples)?;
    log::debug!("Chroma: {} frames from {} samples", chroma.len(), samples.len());

    let pipeline = ChordPipeline::from_config(config)?;
    log::debug!(
        "Pipeline: window {}, hop {:.4}s, template weights {}/{}",
        pipeline.window(),
        pipeline.hop_duration(),
        pipeline.bank().active_weight(),
        pipeline.bank().inactive_weight()
    );
    let analysis = pipeline.analyze(&chroma)?;
    log::debug!(
        "Labels: {} raw, {} smoothed; {} events",
        analysis.raw_labels.len(),
        analysis.smoothed_labels.len(),
        analysis.progression.len()
    );
    Ok(analysis)
}

fn emit(
    source: &str,
    total_duration: f64,
    analysis: &ChordAnalysis,
    config: &AnalysisConfig,
    output: &OutputOptions,
) -> Result<()> {
    let timeline = output
        .timeline
        .then(|| Timeline::new(config.timeline_frames_per_cell, config.timeline_width));
    let report = Report::new(source, analysis)
        .with_total_duration(total_duration)
        .with_timeline(timeline);

    if output.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render());
    }
    if let Some(path) = &output.save_path {
        report.write_report(path)?;
        if !output.json {
            println!("Results saved to {}", path.display());
        }
    }
    Ok(())
}
