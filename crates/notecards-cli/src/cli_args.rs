//! CLI argument definitions for the notecards command-line interface.
//!
//! All `#[derive(Parser)]`, `#[derive(Subcommand)]` and `#[derive(Args)]` types
//! are defined here, keeping `main.rs` focused on dispatch logic.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use notecards_lilypond::renderer::{DEFAULT_DOCKER_IMAGE, DEFAULT_RESOLUTION, DEFAULT_TIMEOUT_SECS};
use notecards_lilypond::{Backend, RendererConfig};
use notecards_theory::interval::MAX_NAMED_DISTANCE;

/// notecards - Music theory flashcard generator
#[derive(Debug, Parser)]
#[command(name = "notecards")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate interval flashcards for the selected scales
    Intervals {
        /// Largest interval to generate, in semitones (0-12)
        #[arg(long, default_value_t = MAX_NAMED_DISTANCE, value_parser = clap::value_parser!(i32).range(0..=MAX_NAMED_DISTANCE as i64))]
        max_distance: i32,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate diatonic chord flashcards for the selected scales
    Chords {
        /// Generate seventh chords without fifth instead of triads
        #[arg(long)]
        sevenths: bool,

        /// Render all chords of each scale into a single image instead of a deck
        #[arg(long)]
        one_pager: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Options shared by every generator command.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Scale to use, e.g. "c major", "f sharp minor"; "major" or "minor" selects every scale of that mode
    #[arg(long, default_value = "c major")]
    pub scale: String,

    /// Maximum number of accidentals when selecting scales by mode
    #[arg(long, default_value_t = 7)]
    pub accidentals: usize,

    /// Temp directory for LilyPond sources
    #[arg(long, default_value = "tmp")]
    pub tmp_dir: PathBuf,

    /// Destination directory for generated images
    #[arg(long, default_value = "images")]
    pub image_dir: PathBuf,

    /// Path to the generated deck file (empty disables the deck)
    #[arg(long, default_value = "deck.csv")]
    pub deck_file: String,

    /// Path to an HTML page listing every card
    #[arg(long)]
    pub html_file: Option<PathBuf>,

    /// Number of parallel renders (default: available parallelism)
    #[arg(long)]
    pub parallel: Option<usize>,

    /// How LilyPond is run
    #[arg(long, default_value = "docker", value_parser = ["docker", "native"])]
    pub renderer: String,

    /// Path to the LilyPond executable (native renderer)
    #[arg(long)]
    pub lilypond_path: Option<PathBuf>,

    /// LilyPond container image (docker renderer)
    #[arg(long, default_value = DEFAULT_DOCKER_IMAGE)]
    pub docker_image: String,

    /// PNG resolution in dpi
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: u32,

    /// Timeout for a single render, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Also write the LilyPond source next to each image
    #[arg(long)]
    pub keep_source: bool,

    /// Write deck and HTML files without rendering images
    #[arg(long)]
    pub no_render: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print every card
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Deck file path, or `None` when the deck is disabled.
    pub fn deck_path(&self) -> Option<PathBuf> {
        if self.deck_file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.deck_file))
        }
    }

    /// Worker count, never below one.
    pub fn parallelism(&self) -> usize {
        self.parallel
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    pub fn backend(&self) -> Backend {
        match self.renderer.as_str() {
            "native" => Backend::Native,
            _ => Backend::Docker,
        }
    }

    /// Renderer configuration from the command line.
    pub fn renderer_config(&self) -> RendererConfig {
        let mut config = RendererConfig::with_working_dir(&self.tmp_dir)
            .backend(self.backend())
            .docker_image(&self.docker_image)
            .resolution(self.resolution)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(path) = &self.lilypond_path {
            config = config.lilypond_path(path);
        }
        config
    }
}
