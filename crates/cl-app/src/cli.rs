use std::path::PathBuf;

use clap::Parser;

/// chordline: chord progression extraction by chroma template matching.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier audio à analyser (WAV, MP3, FLAC, OGG, AAC, M4A).
    pub input: Option<PathBuf>,

    /// Enregistrer depuis le micro par défaut jusqu'à Ctrl+C.
    #[arg(long, default_value_t = false)]
    pub mic: bool,

    /// Rejouer les accords d'un rapport texte sauvegardé.
    #[arg(long, value_name = "REPORT")]
    pub play: Option<PathBuf>,

    /// Fichier de configuration TOML. Absent : valeurs par défaut.
    #[arg(short, long, default_value = "chordline.toml")]
    pub config: PathBuf,

    /// Fenêtre de lissage en frames (impaire).
    #[arg(long)]
    pub window: Option<usize>,

    /// Pas d'analyse (hop) en échantillons.
    #[arg(long)]
    pub hop: Option<usize>,

    /// Arrêter l'enregistrement micro après N secondes.
    #[arg(long, value_name = "SECS")]
    pub max_seconds: Option<u64>,

    /// Sauvegarder le rapport texte (vers --output, ou le chemin configuré).
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Chemin du rapport. Implique --save.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Afficher le rapport en JSON plutôt qu'en texte.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Omettre la timeline ASCII du rapport texte.
    #[arg(long, default_value_t = false)]
    pub no_timeline: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Raccourci pour --log-level debug.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// What to run, once the CLI has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Mic,
    Play(PathBuf),
}

impl Cli {
    /// Validate that exactly one of INPUT, `--mic` or `--play` is given.
    ///
    /// # Errors
    /// Returns an error if zero or more than one source is specified.
    pub fn validate_source(&self) -> anyhow::Result<Source> {
        let count = usize::from(self.input.is_some())
            + usize::from(self.mic)
            + usize::from(self.play.is_some());

        if count == 0 {
            anyhow::bail!("Aucune entrée spécifiée. Utilisez un fichier audio, --mic, ou --play RAPPORT.");
        }
        if count > 1 {
            anyhow::bail!("Une seule entrée à la fois : un fichier audio, --mic, OU --play RAPPORT.");
        }
        Ok(if let Some(path) = &self.input {
            Source::File(path.clone())
        } else if let Some(path) = &self.play {
            Source::Play(path.clone())
        } else {
            Source::Mic
        })
    }

    /// Effective log level (`--verbose` wins over `--log-level`).
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
        }
    }

    /// Where to save the text report, if anywhere.
    #[must_use]
    pub fn save_path(&self, configured: &std::path::Path) -> Option<PathBuf> {
        match &self.output {
            Some(path) => Some(path.clone()),
            None if self.save => Some(configured.to_path_buf()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chordline").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn exactly_one_source() {
        assert_eq!(
            parse(&["song.wav"]).validate_source().unwrap(),
            Source::File(PathBuf::from("song.wav"))
        );
        assert_eq!(parse(&["--mic"]).validate_source().unwrap(), Source::Mic);
        assert_eq!(
            parse(&["--play", "out.txt"]).validate_source().unwrap(),
            Source::Play(PathBuf::from("out.txt"))
        );
        assert!(parse(&[]).validate_source().is_err());
        assert!(parse(&["song.wav", "--mic"]).validate_source().is_err());
    }

    #[test]
    fn verbose_overrides_log_level() {
        assert_eq!(parse(&["--mic"]).level_filter(), log::LevelFilter::Warn);
        assert_eq!(
            parse(&["--mic", "--log-level", "info"]).level_filter(),
            log::LevelFilter::Info
        );
        assert_eq!(
            parse(&["--mic", "--log-level", "info", "-v"]).level_filter(),
            log::LevelFilter::Debug
        );
    }

    #[test]
    fn output_implies_save() {
        let configured = Path::new("chord-output.txt");
        assert_eq!(parse(&["a.wav"]).save_path(configured), None);
        assert_eq!(
            parse(&["a.wav", "--save"]).save_path(configured),
            Some(PathBuf::from("chord-output.txt"))
        );
        assert_eq!(
            parse(&["a.wav", "-o", "x.txt"]).save_path(configured),
            Some(PathBuf::from("x.txt"))
        );
    }
}
