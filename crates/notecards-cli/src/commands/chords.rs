//! Chords command implementation
//!
//! Deck mode builds one card per diatonic close voicing. One-pager mode
//! renders every voicing of a scale into a single image and writes no deck.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use notecards_lilypond::{chords_source, CancelFlag};
use notecards_theory::naming::one_pager_file_stem;
use notecards_theory::{
    generate_all_diatonic_sevenths_without_fifth, generate_all_diatonic_triads, select_scales,
    Chord, Scale, TheoryResult,
};

use super::Session;
use crate::card::Card;
use crate::cli_args::CommonArgs;
use crate::render::{render_to_file, Outcome, RenderSummary};

/// Run the chords command
///
/// # Arguments
/// * `args` - Shared generator options
/// * `sevenths` - Seventh chords without fifth instead of triads
/// * `one_pager` - One image per scale instead of a deck
/// * `cancel` - Flag set by the signal handler
///
/// # Returns
/// Exit code: 0 success, 1 on any error
pub fn run(
    args: &CommonArgs,
    sevenths: bool,
    one_pager: bool,
    cancel: &CancelFlag,
) -> Result<ExitCode> {
    let command = if one_pager { "chords-one-pager" } else { "chords" };
    let mut session = Session::new(command, args, cancel);
    let outcome = if one_pager {
        generate_one_pagers(&mut session, sevenths)
    } else {
        generate_deck(&mut session, sevenths)
    };
    session.finish(outcome)
}

fn chords_in(scale: &Scale, sevenths: bool) -> TheoryResult<Vec<Chord>> {
    if sevenths {
        generate_all_diatonic_sevenths_without_fifth(scale)
    } else {
        generate_all_diatonic_triads(scale)
    }
}

fn selected_scales(session: &mut Session<'_>, title: &str) -> Result<Vec<Scale>> {
    let args = session.args();
    let scales = select_scales(&args.scale, args.accidentals)
        .with_context(|| format!("Failed to select scales for '{}'", args.scale))?;
    session.record_scales(&scales);
    session.print_header(title, &scales);
    Ok(scales)
}

fn print_chords(scale: &Scale, chords: &[Chord]) {
    println!(
        "{} {} ({} chords)",
        "Scale:".blue().bold(),
        scale.name,
        chords.len()
    );
    for chord in chords {
        let notes: Vec<String> = chord.pitches.iter().map(|p| p.name_with_modifier()).collect();
        println!(
            "  {:<5} {:<10} {}",
            chord.roman_numeral(),
            chord.name(),
            notes.join(" ").dimmed()
        );
    }
}

fn generate_deck(session: &mut Session<'_>, sevenths: bool) -> Result<()> {
    let scales = selected_scales(session, "Notecards Chord Generator")?;
    let verbose = session.args().verbose;

    let mut cards = Vec::new();
    for scale in &scales {
        let chords = chords_in(scale, sevenths)
            .with_context(|| format!("Failed to generate chords in {}", scale.name))?;
        if verbose {
            print_chords(scale, &chords);
        }
        cards.extend(chords.into_iter().map(Card::Chord));
    }

    session.write_and_render(&cards)
}

fn generate_one_pagers(session: &mut Session<'_>, sevenths: bool) -> Result<()> {
    let scales = selected_scales(session, "Notecards Chord One-Pager")?;
    let args = session.args();
    let renderer = session.renderer();

    if !args.no_render {
        fs::create_dir_all(&args.image_dir).with_context(|| {
            format!(
                "Failed to create image directory: {}",
                args.image_dir.display()
            )
        })?;
    }

    let mut summary = RenderSummary::default();
    for scale in &scales {
        let chords = chords_in(scale, sevenths)
            .with_context(|| format!("Failed to generate chords in {}", scale.name))?;
        if args.verbose {
            print_chords(scale, &chords);
        }
        session.report_mut().cards += 1;

        let png_path = args
            .image_dir
            .join(format!("{}.png", one_pager_file_stem(scale)));
        if args.no_render {
            println!(
                "{} {} ({} chords, not rendered)",
                "INFO".yellow().bold(),
                png_path.display(),
                chords.len()
            );
            continue;
        }

        let source = chords_source(scale, &chords)
            .with_context(|| format!("Failed to build score for {}", scale.name))?;
        match render_to_file(&renderer, &source, &png_path, args.keep_source)? {
            Outcome::Rendered => {
                summary.rendered += 1;
                println!("  {} {}", "RENDERED".green(), png_path.display());
            }
            Outcome::Skipped => {
                summary.skipped += 1;
                println!("  {} {}", "SKIPPED".yellow(), png_path.display());
            }
        }
    }

    session.record_render(summary);
    Ok(())
}
