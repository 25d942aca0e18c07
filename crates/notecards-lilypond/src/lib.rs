//! Notecards LilyPond Backend
//!
//! This crate turns theory entities into LilyPond piano scores and renders
//! them to PNG by running LilyPond as a subprocess.
//!
//! # Architecture
//!
//! 1. **Source builder** ([`source`]) - lays intervals and chords out on a
//!    treble/bass piano staff and writes the `.ly` text
//! 2. **Renderer** ([`renderer`]) - runs LilyPond (in Docker or natively) in a
//!    scratch directory and returns the PNG bytes
//!
//! Renders observe a shared [`CancelFlag`]: a set flag kills the running
//! LilyPond process and fails the render with [`RenderError::Cancelled`].
//!
//! # Example
//!
//! ```ignore
//! use notecards_lilypond::{render_chords, Renderer, RendererConfig};
//! use notecards_theory::{generate_all_diatonic_triads, scale::C_MAJOR};
//!
//! let chords = generate_all_diatonic_triads(&C_MAJOR)?;
//! let renderer = Renderer::new(RendererConfig::with_working_dir("tmp"));
//! let png = render_chords(&renderer, &C_MAJOR, &chords[..1])?;
//! std::fs::write("chord.png", png)?;
//! ```
//!
//! # LilyPond Requirements
//!
//! The default backend needs `docker` in PATH. The native backend searches for
//! LilyPond in:
//!
//! 1. The configured path
//! 2. `LILYPOND_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations (platform-specific)

pub mod cancel;
pub mod error;
pub mod renderer;
pub mod source;

// Re-export main types at crate root
pub use cancel::CancelFlag;
pub use error::{RenderError, RenderResult};
pub use renderer::{Backend, Renderer, RendererConfig};
pub use source::{chords_source, interval_source, PianoScore, StaffChord};

use notecards_theory::{Chord, Interval, Scale};

/// Renders a single interval card.
pub fn render_interval(renderer: &Renderer, interval: &Interval) -> RenderResult<Vec<u8>> {
    let source = interval_source(interval)?;
    renderer.render_png(&source)
}

/// Renders `chords` side by side on one card.
pub fn render_chords(renderer: &Renderer, scale: &Scale, chords: &[Chord]) -> RenderResult<Vec<u8>> {
    let source = chords_source(scale, chords)?;
    renderer.render_png(&source)
}
