//! Error types for the LilyPond backend.

use std::path::PathBuf;

use notecards_theory::TheoryError;
use thiserror::Error;

/// Result type for LilyPond backend operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while building or rendering a score.
#[derive(Debug, Error)]
pub enum RenderError {
    /// LilyPond executable not found.
    #[error("LilyPond executable not found. Ensure LilyPond is installed and in PATH, or set LILYPOND_PATH environment variable")]
    LilypondNotFound,

    /// Docker executable not found.
    #[error("docker executable not found in PATH")]
    DockerNotFound,

    /// Failed to create the per-render working directory.
    #[error("Failed to create working directory under {path}: {source}")]
    CreateWorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to spawn the render process.
    #[error("Failed to spawn render process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Render process timed out.
    #[error("Render process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Render was cancelled before the process finished.
    #[error("Render cancelled")]
    Cancelled,

    /// Render process exited with non-zero status.
    #[error("error running command {command}: exit status {exit_code}: {stderr}")]
    ProcessFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Expected PNG not produced.
    #[error("Expected output file not found: {path}")]
    OutputNotFound { path: PathBuf },

    /// The interval's clef binding has no staff layout.
    #[error("not supported interval layout: {first} -> {second}")]
    UnsupportedIntervalLayout { first: String, second: String },

    /// Theory engine error while preparing a score.
    #[error(transparent)]
    Theory(#[from] TheoryError),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Creates a new process failed error.
    pub fn process_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ProcessFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::LilypondNotFound => "RENDER_001",
            RenderError::DockerNotFound => "RENDER_002",
            RenderError::CreateWorkDir { .. } => "RENDER_003",
            RenderError::SpawnFailed(_) => "RENDER_004",
            RenderError::Timeout { .. } => "RENDER_005",
            RenderError::Cancelled => "RENDER_006",
            RenderError::ProcessFailed { .. } => "RENDER_007",
            RenderError::OutputNotFound { .. } => "RENDER_008",
            RenderError::UnsupportedIntervalLayout { .. } => "RENDER_009",
            RenderError::Theory(e) => e.code(),
            RenderError::Io(_) => "RENDER_010",
        }
    }

    /// Returns true if the render stopped because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RenderError::Cancelled)
    }

    /// Returns true for errors caused by a broken theory invariant.
    pub fn is_fatal(&self) -> bool {
        match self {
            RenderError::Theory(e) => e.is_fatal(),
            RenderError::UnsupportedIntervalLayout { .. } => true,
            _ => false,
        }
    }
}
