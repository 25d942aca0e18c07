//! SIGINT/SIGTERM handling.

use anyhow::{Context, Result};
use colored::Colorize;
use notecards_lilypond::CancelFlag;

/// Sets `cancel` when the process receives SIGINT or SIGTERM.
///
/// Can be installed once per process.
pub fn install_handler(cancel: &CancelFlag) -> Result<()> {
    let flag = cancel.clone();
    ctrlc::set_handler(move || {
        if !flag.is_cancelled() {
            eprintln!(
                "{} Received termination signal, stopping renders",
                "WARN".yellow().bold()
            );
        }
        flag.cancel();
    })
    .context("Failed to install signal handler")
}
