//! Intervals command implementation
//!
//! Builds one card per interval of every selected scale, writes the deck and
//! renders the card images.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use notecards_lilypond::CancelFlag;
use notecards_theory::{generate_intervals_in_scale, select_scales};

use super::Session;
use crate::card::Card;
use crate::cli_args::CommonArgs;

/// Run the intervals command
///
/// # Arguments
/// * `args` - Shared generator options
/// * `max_distance` - Largest interval in semitones
/// * `cancel` - Flag set by the signal handler
///
/// # Returns
/// Exit code: 0 success, 1 on any error
pub fn run(args: &CommonArgs, max_distance: i32, cancel: &CancelFlag) -> Result<ExitCode> {
    let mut session = Session::new("intervals", args, cancel);
    let outcome = generate(&mut session, max_distance);
    session.finish(outcome)
}

fn generate(session: &mut Session<'_>, max_distance: i32) -> Result<()> {
    let args = session.args();
    let scales = select_scales(&args.scale, args.accidentals)
        .with_context(|| format!("Failed to select scales for '{}'", args.scale))?;
    session.record_scales(&scales);
    session.print_header("Notecards Interval Generator", &scales);

    let mut cards = Vec::new();
    for scale in &scales {
        let intervals = generate_intervals_in_scale(scale, max_distance)
            .with_context(|| format!("Failed to generate intervals in {}", scale.name))?;

        if args.verbose {
            println!(
                "{} {} ({} intervals)",
                "Scale:".blue().bold(),
                scale.name,
                intervals.len()
            );
            for interval in &intervals {
                println!(
                    "  {:>2}  {} {} -> {} {}",
                    interval.distance(),
                    interval.first.name_with_modifier(),
                    interval.first.lilypond_symbol().dimmed(),
                    interval.second.name_with_modifier(),
                    interval.second.lilypond_symbol().dimmed()
                );
            }
        }

        cards.extend(intervals.into_iter().map(Card::Interval));
    }

    session.write_and_render(&cards)
}
