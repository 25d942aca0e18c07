//! Image rendering with an on-disk cache.
//!
//! Images are written to `<image-dir>/<stem>.png`. A file that already exists
//! is never rendered again, so reruns only fill in what is missing.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use colored::Colorize;
use notecards_lilypond::Renderer;

use crate::card::Card;
use crate::runner::run_in_parallel;

/// Result of writing one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    /// Image already present.
    Skipped,
}

/// Counts of a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub skipped: usize,
}

/// Options for a render pass.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub image_dir: PathBuf,
    pub parallel: usize,
    /// Also write `<image>.ly`.
    pub keep_source: bool,
    pub verbose: bool,
}

/// Path of the source file kept next to an image: `<image>.ly`.
pub fn source_path(png_path: &Path) -> PathBuf {
    let mut path = OsString::from(png_path.as_os_str());
    path.push(".ly");
    PathBuf::from(path)
}

/// Renders `source` to `png_path` unless the file already exists.
///
/// The image is written to a temporary file in the same directory and moved
/// into place, so an interrupted run never leaves a truncated image behind.
pub fn render_to_file(
    renderer: &Renderer,
    source: &str,
    png_path: &Path,
    keep_source: bool,
) -> Result<Outcome> {
    if png_path.exists() {
        return Ok(Outcome::Skipped);
    }

    let png = renderer
        .render_png(source)
        .with_context(|| format!("Failed to render image: {}", png_path.display()))?;

    let dir = png_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(&png)
        .with_context(|| format!("Failed to write png file: {}", png_path.display()))?;
    file.persist(png_path)
        .with_context(|| format!("Failed to write png file: {}", png_path.display()))?;

    if keep_source {
        let path = source_path(png_path);
        fs::write(&path, source)
            .with_context(|| format!("Failed to write source file: {}", path.display()))?;
    }

    Ok(Outcome::Rendered)
}

/// One progress dot, flushed so it shows up while the pass is running.
fn write_progress_dot(out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "{}", ".".green())?;
    out.flush()
}

/// Renders one image per card in parallel.
pub fn render_cards(
    renderer: &Renderer,
    cards: &[Card],
    options: &RenderOptions,
) -> Result<RenderSummary> {
    fs::create_dir_all(&options.image_dir).with_context(|| {
        format!(
            "Failed to create image directory: {}",
            options.image_dir.display()
        )
    })?;

    let rendered = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);

    run_in_parallel(
        renderer.cancel_flag(),
        cards.len(),
        options.parallel,
        |idx| {
            let card = &cards[idx];
            let png_path = options.image_dir.join(card.image_file_name());
            let source = card.source()?;

            match render_to_file(renderer, &source, &png_path, options.keep_source)? {
                Outcome::Rendered => {
                    rendered.fetch_add(1, Ordering::Relaxed);
                    if options.verbose {
                        println!("  {} {}", "RENDERED".green(), png_path.display());
                    } else {
                        let _ = write_progress_dot(&mut std::io::stdout().lock());
                    }
                }
                Outcome::Skipped => {
                    skipped.fetch_add(1, Ordering::Relaxed);
                    if options.verbose {
                        println!("  {} {}", "SKIPPED".yellow(), png_path.display());
                    }
                }
            }
            Ok(())
        },
    )?;

    if !options.verbose {
        println!();
    }

    Ok(RenderSummary {
        rendered: rendered.into_inner(),
        skipped: skipped.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notecards_lilypond::{CancelFlag, RendererConfig};

    #[test]
    fn test_source_path() {
        assert_eq!(
            source_path(Path::new("images/ng-abc.png")),
            PathBuf::from("images/ng-abc.png.ly")
        );
    }

    #[derive(Default)]
    struct RecordingWriter {
        written: Vec<u8>,
        flushed_len: usize,
    }

    impl Write for RecordingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed_len = self.written.len();
            Ok(())
        }
    }

    #[test]
    fn test_progress_dot_is_flushed() {
        let mut out = RecordingWriter::default();
        write_progress_dot(&mut out).unwrap();
        write_progress_dot(&mut out).unwrap();
        assert_eq!(out.written.iter().filter(|b| **b == b'.').count(), 2);
        assert_eq!(out.flushed_len, out.written.len());
    }

    #[test]
    fn test_existing_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("ng-cached.png");
        fs::write(&png_path, b"cached").unwrap();

        // a cancelled renderer fails any real render
        let cancel = CancelFlag::new();
        cancel.cancel();
        let renderer = Renderer::with_cancel(RendererConfig::default(), cancel);

        let outcome = render_to_file(&renderer, "{}", &png_path, true).unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(fs::read(&png_path).unwrap(), b"cached");
        assert!(!source_path(&png_path).exists());
    }

    #[test]
    fn test_missing_image_propagates_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("ng-missing.png");
        let cancel = CancelFlag::new();
        cancel.cancel();
        let renderer = Renderer::with_cancel(RendererConfig::default(), cancel);

        let err = render_to_file(&renderer, "{}", &png_path, false).unwrap_err();
        assert!(err.to_string().contains("ng-missing.png"));
        assert!(!png_path.exists());
    }
}
