//! Error types for the theory engine.

use thiserror::Error;

use crate::pitch::Pitch;

/// Result type for theory operations.
pub type TheoryResult<T> = Result<T, TheoryError>;

/// Broad classification of a [`TheoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input from the caller (unknown scale name, empty selection, ...).
    Configuration,
    /// A broken invariant of the pitch/scale tables. Never retry these.
    InvariantViolation,
}

/// Errors that can occur while generating theory entities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TheoryError {
    /// Scale name not present in the catalogue.
    #[error("invalid scale: {name}")]
    UnknownScale { name: String },

    /// Scale selection matched nothing.
    #[error("no scales found for: {selector} (max accidentals {max_accidentals})")]
    NoScalesMatched {
        selector: String,
        max_accidentals: usize,
    },

    /// A letter name outside c..b.
    #[error("invalid note letter: '{letter}'")]
    UnknownLetter { letter: String },

    /// Interval window reaching past the pitch list.
    #[error("interval window {start}..{end} out of range for {len} pitches")]
    WindowOutOfRange { start: usize, end: usize, len: usize },

    /// Interval distance without a name.
    #[error("interval not supported: {distance} semitones")]
    UnsupportedIntervalDistance { distance: i32 },

    /// Six semitones spelled over neither three nor four letter steps.
    #[error("invalid tritone spelling {first} -> {second}: letter step {letter_step}")]
    InvalidTritoneSpelling {
        first: String,
        second: String,
        letter_step: usize,
    },

    /// A rendering-ready pitch still bound to both clefs.
    #[error("both clefs set in note: {pitch}")]
    DualClefPitch { pitch: String },

    /// A close voicing window that does not contain the root letter.
    #[error("no root '{root}' among voiced notes {voiced}")]
    RootNotVoiced { root: char, voiced: String },

    /// Degree lookup for a letter the scale tables do not know.
    #[error("no degree for letter '{letter}' in {scale}")]
    UnknownDegreeLetter { letter: String, scale: String },
}

impl TheoryError {
    /// Creates a dual clef error for the given pitch.
    pub fn dual_clef(pitch: &Pitch) -> Self {
        Self::DualClefPitch {
            pitch: pitch.canonical_name(),
        }
    }

    /// Creates an unknown letter error.
    pub fn unknown_letter(letter: impl Into<String>) -> Self {
        Self::UnknownLetter {
            letter: letter.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            TheoryError::UnknownScale { .. } => "THEORY_001",
            TheoryError::NoScalesMatched { .. } => "THEORY_002",
            TheoryError::UnknownLetter { .. } => "THEORY_003",
            TheoryError::WindowOutOfRange { .. } => "THEORY_004",
            TheoryError::UnsupportedIntervalDistance { .. } => "THEORY_101",
            TheoryError::InvalidTritoneSpelling { .. } => "THEORY_102",
            TheoryError::DualClefPitch { .. } => "THEORY_103",
            TheoryError::RootNotVoiced { .. } => "THEORY_104",
            TheoryError::UnknownDegreeLetter { .. } => "THEORY_105",
        }
    }

    /// Classifies the error as bad input or a broken table invariant.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TheoryError::UnknownScale { .. }
            | TheoryError::NoScalesMatched { .. }
            | TheoryError::UnknownLetter { .. }
            | TheoryError::WindowOutOfRange { .. } => ErrorKind::Configuration,
            TheoryError::UnsupportedIntervalDistance { .. }
            | TheoryError::InvalidTritoneSpelling { .. }
            | TheoryError::DualClefPitch { .. }
            | TheoryError::RootNotVoiced { .. }
            | TheoryError::UnknownDegreeLetter { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// Returns true for errors that indicate a defect rather than bad input.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::InvariantViolation
    }
}
