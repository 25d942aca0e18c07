//! JSON run summary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use notecards_lilypond::RenderError;
use notecards_theory::TheoryError;
use serde::{Deserialize, Serialize};

/// Summary of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Command name (`intervals`, `chords`, `chords-one-pager`)
    pub command: String,
    /// Names of the selected scales
    pub scales: Vec<String>,
    /// Number of cards (or one-pager images) generated
    pub cards: usize,
    /// Images rendered in this run
    pub rendered: usize,
    /// Images already present and left untouched
    pub skipped: usize,
    /// Deck file written, if any
    pub deck_file: Option<String>,
    /// HTML listing written, if any
    pub html_file: Option<String>,
    /// Total runtime in seconds
    pub runtime_seconds: f64,
    /// Whether the run completed
    pub success: bool,
    /// Error message if the run failed
    pub error: Option<String>,
    /// Stable error code if the failure came from the engine or renderer
    pub error_code: Option<String>,
}

impl RunReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    /// Records the outcome of the run.
    pub fn finish(&mut self, outcome: &Result<()>, runtime_seconds: f64) {
        self.runtime_seconds = runtime_seconds;
        self.success = outcome.is_ok();
        if let Err(e) = outcome {
            self.error = Some(format!("{:#}", e));
            self.error_code = error_code(e).map(str::to_string);
        }
    }

    /// Writes the report as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}

/// Stable code of the first engine or renderer error in the chain.
pub fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<RenderError>() {
            Some(e.code())
        } else {
            cause.downcast_ref::<TheoryError>().map(TheoryError::code)
        }
    })
}

/// Whether the error chain holds a broken theory invariant.
pub fn is_invariant_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<RenderError>()
            .is_some_and(RenderError::is_fatal)
            || cause
                .downcast_ref::<TheoryError>()
                .is_some_and(TheoryError::is_fatal)
    })
}
