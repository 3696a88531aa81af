use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cl_core::config::AnalysisConfig;

pub mod analyze;
pub mod cli;
pub mod playback;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.level_filter())
        .init();

    // 3. Valider la source
    let source = cli.validate_source()?;

    // 4. Charger la config et appliquer les overrides CLI
    let config = resolve_config(&cli)?;
    let output = analyze::OutputOptions {
        save_path: cli.save_path(&config.output_path),
        json: cli.json,
        timeline: !cli.no_timeline,
    };

    // 5. Lancer l'analyse ou la lecture
    match source {
        cli::Source::File(path) => analyze::analyze_file(&path, &config, &output),
        cli::Source::Mic => {
            let stop = stop_on_ctrlc()?;
            let max = cli.max_seconds.map(Duration::from_secs);
            analyze::analyze_mic(&config, &output, &stop, max)
        }
        cli::Source::Play(path) => {
            let stop = stop_on_ctrlc()?;
            playback::play_report(&path, &stop)
        }
    }
}

/// Fichier de config (ou défauts s'il manque), puis `--window` / `--hop`.
fn resolve_config(cli: &cli::Cli) -> Result<AnalysisConfig> {
    let mut config = if cli.config.exists() {
        cl_core::config::load_config(&cli.config)?
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        AnalysisConfig::default()
    };

    if let Some(window) = cli.window {
        config.smoothing_window = window;
    }
    if let Some(hop) = cli.hop {
        config.hop_length = hop;
    }
    config.validate().context("Invalid analysis settings")?;
    Ok(config)
}

/// Canal qui reçoit un message par Ctrl+C.
fn stop_on_ctrlc() -> Result<flume::Receiver<()>> {
    let (tx, rx) = flume::bounded(1);
    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })
    .context("Failed to install Ctrl+C handler")?;
    Ok(rx)
}
