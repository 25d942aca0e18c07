//! Notecards Theory Engine
//!
//! This crate enumerates the musical entities printed on flashcards: notes,
//! two-note intervals and three-note diatonic chords, each bound to the staff
//! (treble or bass) it is written on.
//!
//! # Overview
//!
//! - **Pitches** come from a fixed 35-entry reference table spanning the
//!   piano range that fits on a grand staff. Every entry records whether it
//!   may be written on the treble staff, the bass staff, or both.
//! - **Scales** alter letters of the reference table by a key signature
//!   ([`apply_scale`]) and provide per-degree chord qualities.
//! - **Intervals** ([`generate_intervals`]) pair pitches up to a maximum
//!   semitone distance, once per clef class.
//! - **Chords** ([`generate_all_diatonic_triads`],
//!   [`generate_all_diatonic_sevenths_without_fifth`]) are close voicings of
//!   each degree, split into every legal treble/bass layout.
//! - **Naming** gives every entity a bit-stable key and a BLAKE3-hashed file
//!   stem.
//!
//! The engine is pure: no I/O, no global state, and the reference table is
//! never modified.
//!
//! # Example
//!
//! ```
//! use notecards_theory::{generate_all_diatonic_triads, naming, scale::C_MAJOR};
//!
//! let chords = generate_all_diatonic_triads(&C_MAJOR).unwrap();
//! let tonic = chords.iter().find(|c| c.name() == "C maj").unwrap();
//! assert_eq!(tonic.roman_numeral(), "I");
//! assert!(naming::chord_file_stem(tonic).starts_with("ng-chord-"));
//! ```
//!
//! # Crate Structure
//!
//! - [`pitch`] - Letters, accidentals, pitches and the reference table
//! - [`scale`] - Scale catalogue and degree tables
//! - [`interval`] - Interval generation and naming
//! - [`chord`] - Diatonic chord voicings and clef splits
//! - [`naming`] - Canonical keys and file stems
//! - [`error`] - Error types

pub mod chord;
pub mod error;
pub mod interval;
pub mod naming;
pub mod pitch;
pub mod scale;

// Re-export main types at crate root
pub use chord::{
    chord_on_clefs, generate_all_diatonic_sevenths_without_fifth, generate_all_diatonic_triads,
    Chord, ChordOnClefs, ChordQuality, ChordShape, ChordType,
};
pub use error::{ErrorKind, TheoryError, TheoryResult};
pub use interval::{generate_intervals, generate_intervals_in_scale, Interval};
pub use pitch::{apply_scale, Accidental, Letter, Pitch, REFERENCE_PITCHES};
pub use scale::{find_scale, select_scales, Scale, ScaleDegree, ScaleMode, SCALES};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
