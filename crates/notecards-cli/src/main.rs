//! notecards CLI - Music theory flashcard generator
//!
//! This binary generates interval and chord flashcards: an Anki-style deck
//! file plus one rendered staff image per card.

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use notecards_lilypond::CancelFlag;

use notecards_cli::cli_args::{Cli, Commands};
use notecards_cli::{commands, report, signal};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cancel = CancelFlag::new();
    if let Err(e) = signal::install_handler(&cancel) {
        eprintln!("{} {:#}", "WARN".yellow().bold(), e);
    }

    let result = match cli.command {
        Commands::Intervals {
            max_distance,
            common,
        } => commands::intervals::run(&common, max_distance, &cancel),
        Commands::Chords {
            sevenths,
            one_pager,
            common,
        } => commands::chords::run(&common, sevenths, one_pager, &cancel),
    };

    match result {
        Ok(code) => code,
        Err(e) if report::is_invariant_violation(&e) => {
            eprintln!(
                "{} [{}]: {:#}",
                "internal error".red().bold(),
                report::error_code(&e).unwrap_or("UNKNOWN"),
                e
            );
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
