//! Canonical keys and content-hashed file stems.
//!
//! Keys are built only from bit-stable names (scale file name and
//! [`Pitch::canonical_name`]), so a stem identifies the rendered image across
//! runs:
//! ```text
//! stem = ng-{prefix}{hex(BLAKE3(key))}-{key}
//! ```

use crate::chord::Chord;
use crate::interval::Interval;
use crate::pitch::Pitch;
use crate::scale::Scale;

/// Prefix shared by every generated file stem.
pub const STEM_PREFIX: &str = "ng";

/// Computes the lowercase hex BLAKE3 digest of a key.
pub fn key_hash(key: &str) -> String {
    blake3::hash(key.as_bytes()).to_hex().to_string()
}

fn scale_key(scale: Option<&Scale>) -> String {
    scale.map(Scale::file_safe_name).unwrap_or_default()
}

/// Identity key of an interval: `{scale}_{first}_{second}`.
pub fn interval_key(interval: &Interval) -> String {
    format!(
        "{}_{}_{}",
        scale_key(interval.scale.as_ref()),
        interval.first.canonical_name(),
        interval.second.canonical_name()
    )
}

/// Identity key of a chord: `{scale}_{p1}_{p2}_{p3}`.
pub fn chord_key(chord: &Chord) -> String {
    let pitches: Vec<String> = chord.pitches.iter().map(Pitch::canonical_name).collect();
    format!("{}_{}", chord.scale.file_safe_name(), pitches.join("_"))
}

/// File stem of an interval card.
pub fn interval_file_stem(interval: &Interval) -> String {
    let key = interval_key(interval);
    format!("{}-{}-{}", STEM_PREFIX, key_hash(&key), key)
}

/// File stem of a chord card.
pub fn chord_file_stem(chord: &Chord) -> String {
    let key = chord_key(chord);
    format!("{}-chord-{}-{}", STEM_PREFIX, key_hash(&key), key)
}

/// File stem of the image holding every chord of a scale.
pub fn one_pager_file_stem(scale: &Scale) -> String {
    format!("{}-chord-all-{}", STEM_PREFIX, scale.file_safe_name())
}
