//! CLI command implementations

pub mod chords;
pub mod intervals;

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use notecards_lilypond::{CancelFlag, Renderer};
use notecards_theory::Scale;

use crate::card::Card;
use crate::cli_args::CommonArgs;
use crate::deck::{build_deck, build_html};
use crate::render::{render_cards, RenderOptions, RenderSummary};
use crate::report::RunReport;

/// State shared by a generator command from start to summary.
pub(crate) struct Session<'a> {
    args: &'a CommonArgs,
    cancel: &'a CancelFlag,
    report: RunReport,
    start: Instant,
}

impl<'a> Session<'a> {
    pub(crate) fn new(command: &str, args: &'a CommonArgs, cancel: &'a CancelFlag) -> Self {
        Self {
            args,
            cancel,
            report: RunReport::new(command),
            start: Instant::now(),
        }
    }

    pub(crate) fn renderer(&self) -> Renderer {
        Renderer::with_cancel(self.args.renderer_config(), self.cancel.clone())
    }

    pub(crate) fn print_header(&self, title: &str, scales: &[Scale]) {
        println!("{}", "======================================".cyan());
        println!("{}", format!("  {}", title).cyan());
        println!("{}", "======================================".cyan());
        println!();
        let names: Vec<&str> = scales.iter().map(|s| s.name).collect();
        println!("{} {}", "Scales:".blue().bold(), names.join(", "));
        println!(
            "{} {}",
            "Image directory:".blue().bold(),
            self.args.image_dir.display()
        );
        if !self.args.no_render {
            println!(
                "{} {} ({} workers)",
                "Renderer:".blue().bold(),
                self.args.backend().as_str(),
                self.args.parallelism()
            );
        }
        println!();
    }

    pub(crate) fn record_scales(&mut self, scales: &[Scale]) {
        self.report.scales = scales.iter().map(|s| s.name.to_string()).collect();
    }

    /// Writes the deck and HTML listing, then renders every card image.
    pub(crate) fn write_and_render(&mut self, cards: &[Card]) -> Result<()> {
        self.report.cards = cards.len();
        println!(
            "{} Generated {} cards",
            "INFO".blue().bold(),
            cards.len()
        );

        if let Some(deck_path) = self.args.deck_path() {
            let deck = build_deck(cards).context("Failed to build deck")?;
            write_file(&deck_path, &deck)?;
            println!("{} {}", "Deck file:".blue().bold(), deck_path.display());
            self.report.deck_file = Some(deck_path.display().to_string());
        }

        if let Some(html_path) = &self.args.html_file {
            let html = build_html(cards, &self.args.image_dir).context("Failed to build html")?;
            write_file(html_path, &html)?;
            println!("{} {}", "HTML file:".blue().bold(), html_path.display());
            self.report.html_file = Some(html_path.display().to_string());
        }

        if self.args.no_render {
            println!(
                "{} Skipping rendering (--no-render)",
                "INFO".yellow().bold()
            );
            return Ok(());
        }

        let options = RenderOptions {
            image_dir: self.args.image_dir.clone(),
            parallel: self.args.parallelism(),
            keep_source: self.args.keep_source,
            verbose: self.args.verbose,
        };
        let summary = render_cards(&self.renderer(), cards, &options)?;
        self.record_render(summary);
        Ok(())
    }

    pub(crate) fn record_render(&mut self, summary: RenderSummary) {
        self.report.rendered += summary.rendered;
        self.report.skipped += summary.skipped;
    }

    pub(crate) fn report_mut(&mut self) -> &mut RunReport {
        &mut self.report
    }

    pub(crate) fn args(&self) -> &'a CommonArgs {
        self.args
    }

    /// Prints the summary, writes the report and converts the outcome.
    pub(crate) fn finish(mut self, outcome: Result<()>) -> Result<ExitCode> {
        let elapsed = self.start.elapsed().as_secs_f64();
        self.report.finish(&outcome, elapsed);

        println!();
        println!("{}", "======================================".cyan());
        println!("{}", "  Summary".cyan());
        println!("{}", "======================================".cyan());
        println!("{} {}", "Cards:".blue().bold(), self.report.cards);
        println!("{} {}", "Rendered:".green().bold(), self.report.rendered);
        println!("{} {}", "Skipped:".yellow().bold(), self.report.skipped);
        println!("{} {:.2}s", "Total runtime:".blue().bold(), elapsed);

        if let Some(report_path) = &self.args.report {
            match self.report.write(report_path) {
                Ok(()) => println!("{} {}", "Report:".blue().bold(), report_path.display()),
                // keep the run's own error
                Err(e) if outcome.is_err() => eprintln!("{} {:#}", "WARN".yellow().bold(), e),
                Err(e) => return Err(e),
            }
        }

        outcome?;
        println!("{}", "Done.".green().bold());
        Ok(ExitCode::SUCCESS)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write file: {}", path.display()))
}
