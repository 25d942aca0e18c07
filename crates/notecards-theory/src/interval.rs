//! Interval generation and naming.

use std::ops::Range;

use crate::error::{TheoryError, TheoryResult};
use crate::pitch::{apply_scale, Pitch, REFERENCE_PITCHES};
use crate::scale::Scale;

/// Largest distance with a name.
pub const MAX_NAMED_DISTANCE: i32 = 12;

/// Names of simple intervals indexed by semitone distance.
///
/// Distance 6 is spelled out by [`Interval::name`] from the letter step.
const SIMPLE_INTERVALS: [&str; 13] = [
    "Perfect unison",
    "Minor second",
    "Major second",
    "Minor third",
    "Major third",
    "Perfect fourth",
    "Tritone",
    "Perfect fifth",
    "Minor sixth",
    "Major sixth",
    "Minor seventh",
    "Major seventh",
    "Perfect Octave",
];

/// Two pitches, optionally tagged with the scale they were generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub first: Pitch,
    pub second: Pitch,
    pub scale: Option<Scale>,
}

impl Interval {
    /// Creates an interval without a scale.
    pub fn new(first: Pitch, second: Pitch) -> Self {
        Self {
            first,
            second,
            scale: None,
        }
    }

    /// Copy of this interval tagged with `scale`.
    pub fn in_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Absolute semitone distance between the two pitches.
    pub fn distance(&self) -> i32 {
        (self.second.tone_index() - self.first.tone_index()).abs()
    }

    /// Letter steps going up from the first pitch's letter to the second's.
    pub fn letter_step(&self) -> usize {
        self.first.letter.steps_up_to(self.second.letter)
    }

    /// Qualitative interval name.
    ///
    /// Six semitones are an augmented fourth over three letter steps and a
    /// diminished fifth over four; any other spelling is rejected.
    pub fn name(&self) -> TheoryResult<&'static str> {
        let distance = self.distance();
        match distance {
            6 => match self.letter_step() {
                3 => Ok("Augmented fourth"),
                4 => Ok("Diminished fifth"),
                letter_step => Err(TheoryError::InvalidTritoneSpelling {
                    first: self.first.canonical_name(),
                    second: self.second.canonical_name(),
                    letter_step,
                }),
            },
            0..=MAX_NAMED_DISTANCE => Ok(SIMPLE_INTERVALS[distance as usize]),
            _ => Err(TheoryError::UnsupportedIntervalDistance { distance }),
        }
    }
}

/// Enumerates intervals between pitches of `window` no wider than `max_distance`.
///
/// `pitches` must be in ascending order. For every `i < j` in the window the
/// scan over `j` stops at the first pitch more than `max_distance` above
/// `pitches[i]`. Each pair is emitted once per clef class it fits:
/// bass/bass, bass/treble and treble/treble. A pair of dual-clef pitches
/// therefore appears up to three times.
pub fn generate_intervals(
    pitches: &[Pitch],
    window: Range<usize>,
    max_distance: i32,
) -> TheoryResult<Vec<Interval>> {
    if window.start > window.end || window.end > pitches.len() {
        return Err(TheoryError::WindowOutOfRange {
            start: window.start,
            end: window.end,
            len: pitches.len(),
        });
    }

    let mut intervals = Vec::new();
    for i in window.clone() {
        let first = pitches[i];
        let reachable = pitches[i + 1..window.end]
            .iter()
            .take_while(|second| second.tone_index() - first.tone_index() <= max_distance);

        for second in reachable {
            if first.bass && second.bass {
                intervals.push(Interval::new(first.on_bass(), second.on_bass()));
            }
            if first.bass && second.treble {
                intervals.push(Interval::new(first.on_bass(), second.on_treble()));
            }
            if first.treble && second.treble {
                intervals.push(Interval::new(first.on_treble(), second.on_treble()));
            }
        }
    }

    Ok(intervals)
}

/// Generates every interval of the reference table in `scale`, tagged with it.
pub fn generate_intervals_in_scale(scale: &Scale, max_distance: i32) -> TheoryResult<Vec<Interval>> {
    let pitches = apply_scale(&REFERENCE_PITCHES, scale);
    let intervals = generate_intervals(&pitches, 0..pitches.len(), max_distance)?;
    Ok(intervals
        .into_iter()
        .map(|interval| interval.in_scale(*scale))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::{Accidental, Letter};
    use crate::scale::{C_MAJOR, G_MAJOR};

    fn pitch(base_index: i32, letter: Letter) -> Pitch {
        Pitch::natural(base_index, letter, true, false)
    }

    #[test]
    fn test_simple_names() {
        let c = pitch(24, Letter::C);
        assert_eq!(Interval::new(c, c).name().unwrap(), "Perfect unison");
        assert_eq!(
            Interval::new(c, pitch(31, Letter::G)).name().unwrap(),
            "Perfect fifth"
        );
        assert_eq!(
            Interval::new(c, pitch(36, Letter::C)).name().unwrap(),
            "Perfect Octave"
        );
        assert_eq!(
            Interval::new(c, pitch(28, Letter::E)).name().unwrap(),
            "Major third"
        );
    }

    #[test]
    fn test_distance_is_absolute() {
        let c = pitch(24, Letter::C);
        let e = pitch(28, Letter::E);
        assert_eq!(Interval::new(e, c).distance(), 4);
        assert_eq!(Interval::new(c, e).distance(), 4);
    }

    #[test]
    fn test_tritone_spelling() {
        let c = pitch(24, Letter::C);
        let f_sharp = pitch(29, Letter::F).with_accidental(Accidental::Sharp);
        let g_flat = pitch(31, Letter::G).with_accidental(Accidental::Flat);
        assert_eq!(
            Interval::new(c, f_sharp).name().unwrap(),
            "Augmented fourth"
        );
        assert_eq!(
            Interval::new(c, g_flat).name().unwrap(),
            "Diminished fifth"
        );
    }

    #[test]
    fn test_invalid_tritone_spelling() {
        // six semitones over five letter steps
        let c = pitch(24, Letter::C);
        let a = pitch(30, Letter::A);
        let err = Interval::new(c, a).name().unwrap_err();
        assert!(matches!(
            err,
            TheoryError::InvalidTritoneSpelling { letter_step: 5, .. }
        ));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unsupported_distance() {
        let c = pitch(24, Letter::C);
        let d = pitch(38, Letter::D);
        assert_eq!(
            Interval::new(c, d).name(),
            Err(TheoryError::UnsupportedIntervalDistance { distance: 14 })
        );
    }

    #[test]
    fn test_generate_respects_max_distance() {
        let intervals =
            generate_intervals(&REFERENCE_PITCHES, 0..REFERENCE_PITCHES.len(), 12).unwrap();
        assert!(!intervals.is_empty());
        for interval in &intervals {
            assert!(interval.distance() <= 12);
            assert!(interval.first.tone_index() < interval.second.tone_index());
            assert!(interval.first.treble != interval.first.bass);
            assert!(interval.second.treble != interval.second.bass);
        }
    }

    #[test]
    fn test_generate_emits_per_clef_class() {
        // e and f at 16/17 are both dual-clef: bass/bass, bass/treble, treble/treble
        let intervals = generate_intervals(&REFERENCE_PITCHES, 12..14, 12).unwrap();
        assert_eq!(intervals.len(), 3);
        assert!(intervals[0].first.bass && intervals[0].second.bass);
        assert!(intervals[1].first.bass && intervals[1].second.treble);
        assert!(intervals[2].first.treble && intervals[2].second.treble);

        // two bass-only pitches yield a single interval
        let intervals = generate_intervals(&REFERENCE_PITCHES, 3..5, 12).unwrap();
        assert_eq!(intervals.len(), 1);
        assert!(!intervals[0].first.treble && !intervals[0].second.treble);
    }

    #[test]
    fn test_generate_insertion_order() {
        let intervals = generate_intervals(&REFERENCE_PITCHES, 0..4, 12).unwrap();
        let pairs: Vec<(i32, i32)> = intervals
            .iter()
            .map(|i| (i.first.base_index, i.second.base_index))
            .collect();
        assert_eq!(pairs, vec![(-5, -3), (-5, -1), (-5, 0), (-3, -1), (-3, 0), (-1, 0)]);
    }

    #[test]
    fn test_generate_window_out_of_range() {
        assert!(matches!(
            generate_intervals(&REFERENCE_PITCHES, 0..99, 12),
            Err(TheoryError::WindowOutOfRange { .. })
        ));
        assert!(generate_intervals(&REFERENCE_PITCHES, 5..5, 12)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_generate_in_scale_tags_scale() {
        let intervals = generate_intervals_in_scale(&G_MAJOR, 12).unwrap();
        assert!(intervals.iter().all(|i| i.scale == Some(G_MAJOR)));
        assert!(intervals
            .iter()
            .any(|i| i.second.letter == Letter::F && i.second.accidental == Accidental::Sharp));
        for interval in &intervals {
            assert!(interval.name().is_ok(), "{:?}", interval);
        }

        let c_major = generate_intervals_in_scale(&C_MAJOR, 12).unwrap();
        assert!(c_major
            .iter()
            .all(|i| i.first.accidental == Accidental::Natural));
    }
}
