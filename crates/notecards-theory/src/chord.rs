//! Diatonic chord derivation: close voicings per scale degree and their clef splits.
//!
//! Generation runs in three stages:
//!
//! 1. For each degree, pick the chord's three letters (root, third, fifth, or
//!    root, third, seventh for sevenths without fifth).
//! 2. Slide a three-pitch window down the scale pitches carrying those
//!    letters; every window is one close voicing.
//! 3. Enumerate every way the voicing can be written across the treble and
//!    bass staves.

use crate::error::{TheoryError, TheoryResult};
use crate::interval::Interval;
use crate::pitch::{apply_scale, Letter, Pitch, REFERENCE_PITCHES};
use crate::scale::{Scale, ScaleDegree};

/// Minimum semitone distance between any two notes of a seventh without fifth.
pub const SEVENTH_MIN_SPACING: i32 = 3;

/// Root, third and seventh letters of the seventh chord on each degree of C.
const SEVENTH_WITHOUT_FIFTH_LETTERS: [[Letter; 3]; 7] = [
    [Letter::C, Letter::E, Letter::B],
    [Letter::D, Letter::F, Letter::C],
    [Letter::E, Letter::G, Letter::D],
    [Letter::F, Letter::A, Letter::E],
    [Letter::G, Letter::B, Letter::F],
    [Letter::A, Letter::C, Letter::G],
    [Letter::B, Letter::D, Letter::A],
];

/// Harmonic quality of a scale degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Minor,
    Major,
    Diminished,
    Augmented,
}

/// Chord type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordType {
    MinorTriad,
    MajorTriad,
    DiminishedTriad,
    AugmentedTriad,
    MinorSeventh,
    MajorSeventh,
    DominantSeventh,
    DiminishedSeventh,
    HalfDiminishedSeventh,
    MinorMajorSeventh,
    AugmentedMajorSeventh,
}

impl ChordType {
    /// Whether this is one of the four triad types.
    pub fn is_triad(&self) -> bool {
        matches!(
            self,
            ChordType::MajorTriad
                | ChordType::MinorTriad
                | ChordType::DiminishedTriad
                | ChordType::AugmentedTriad
        )
    }

    /// Suffix appended to the root name.
    ///
    /// Dominant and major sevenths share " maj7". Minor-major and
    /// augmented-major sevenths have no suffix.
    pub fn name_suffix(&self) -> Option<&'static str> {
        match self {
            ChordType::MajorTriad => Some(" maj"),
            ChordType::MinorTriad => Some(" min"),
            ChordType::DiminishedTriad => Some(" dim"),
            ChordType::AugmentedTriad => Some(" aug"),
            ChordType::MinorSeventh => Some(" min7"),
            ChordType::DominantSeventh | ChordType::MajorSeventh => Some(" maj7"),
            ChordType::HalfDiminishedSeventh => Some(" halfdim7"),
            ChordType::DiminishedSeventh => Some(" dim7"),
            ChordType::MinorMajorSeventh | ChordType::AugmentedMajorSeventh => None,
        }
    }
}

/// Which chord family a generator builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordShape {
    /// Root, third, fifth.
    Triad,
    /// Root, third, seventh.
    SeventhWithoutFifth,
}

impl ChordShape {
    /// Letter triples for the seven degrees, root first.
    pub fn letter_sets(&self) -> [[Letter; 3]; 7] {
        match self {
            ChordShape::Triad => triad_letter_sets(),
            ChordShape::SeventhWithoutFifth => SEVENTH_WITHOUT_FIFTH_LETTERS,
        }
    }

    fn chord_type(&self, degree: &ScaleDegree) -> ChordType {
        match self {
            ChordShape::Triad => degree.triad_type,
            ChordShape::SeventhWithoutFifth => degree.seventh_type,
        }
    }
}

/// Letters stacked in thirds on each degree of C: ceg, dfa, ... bdf.
pub fn triad_letter_sets() -> [[Letter; 3]; 7] {
    Letter::ALL.map(|root| [root, root.offset(2), root.offset(4)])
}

/// A voiced three-note chord in a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub scale: Scale,
    /// Soprano, alto, tenor.
    pub pitches: [Pitch; 3],
    /// One of `pitches`, carrying the root letter.
    pub root: Pitch,
    pub chord_type: ChordType,
}

impl Chord {
    /// Root name plus quality suffix, e.g. `"F♯ min"`.
    pub fn name(&self) -> String {
        let root = self.root.display_name();
        match self.chord_type.name_suffix() {
            Some(suffix) => root + suffix,
            None => root,
        }
    }

    /// Roman numeral of the root's degree, triad or seventh form.
    pub fn roman_numeral(&self) -> &'static str {
        let degree = self.scale.degree(self.root.letter);
        if self.is_triad() {
            degree.roman_numeral_triad
        } else {
            degree.roman_numeral_seventh
        }
    }

    pub fn is_triad(&self) -> bool {
        self.chord_type.is_triad()
    }

    /// Whether every pair of notes is at least `min_distance` semitones apart.
    pub fn has_minimum_spacing(&self, min_distance: i32) -> bool {
        self.pitches.iter().enumerate().all(|(j, first)| {
            self.pitches[j + 1..]
                .iter()
                .all(|second| Interval::new(*first, *second).distance() >= min_distance)
        })
    }
}

/// A chord's pitches split by staff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordOnClefs {
    pub treble: Vec<Pitch>,
    pub bass: Vec<Pitch>,
}

/// Splits a clef-bound chord into treble and bass pitches.
///
/// Fails with [`TheoryError::DualClefPitch`] if a pitch is still bound to both
/// staves; chords produced by the generators never are.
pub fn chord_on_clefs(chord: &Chord) -> TheoryResult<ChordOnClefs> {
    let mut on_clefs = ChordOnClefs::default();
    for pitch in &chord.pitches {
        if pitch.treble && pitch.bass {
            return Err(TheoryError::dual_clef(pitch));
        }
        if pitch.treble {
            on_clefs.treble.push(*pitch);
        }
        if pitch.bass {
            on_clefs.bass.push(*pitch);
        }
    }
    Ok(on_clefs)
}

/// Every diatonic triad of `scale`, in every close voicing and clef split.
pub fn generate_all_diatonic_triads(scale: &Scale) -> TheoryResult<Vec<Chord>> {
    generate_diatonic(scale, ChordShape::Triad)
}

/// Every diatonic seventh chord of `scale` with the fifth omitted.
///
/// Voicings with two notes closer than [`SEVENTH_MIN_SPACING`] semitones are
/// dropped before clef splitting.
pub fn generate_all_diatonic_sevenths_without_fifth(scale: &Scale) -> TheoryResult<Vec<Chord>> {
    generate_diatonic(scale, ChordShape::SeventhWithoutFifth)
}

fn generate_diatonic(scale: &Scale, shape: ChordShape) -> TheoryResult<Vec<Chord>> {
    let mut chords = Vec::new();
    for chord in diatonic_close_voicings(scale, shape)? {
        chords.extend(split_across_clefs(&chord));
    }
    Ok(chords)
}

/// Close voicings of every degree before clef splitting.
///
/// Pitches keep the clef eligibility of the scale table. Sevenths are already
/// filtered by minimum spacing.
pub fn diatonic_close_voicings(scale: &Scale, shape: ChordShape) -> TheoryResult<Vec<Chord>> {
    let pitches = apply_scale(&REFERENCE_PITCHES, scale);

    let mut voicings = Vec::new();
    for letters in shape.letter_sets() {
        let chords = close_voicings(&pitches, letters, scale, shape)?;
        match shape {
            ChordShape::Triad => voicings.extend(chords),
            ChordShape::SeventhWithoutFifth => voicings.extend(
                chords
                    .into_iter()
                    .filter(|chord| chord.has_minimum_spacing(SEVENTH_MIN_SPACING)),
            ),
        }
    }
    Ok(voicings)
}

/// Windows of three consecutive pitches carrying `letters`, from the top down.
fn close_voicings(
    pitches: &[Pitch],
    letters: [Letter; 3],
    scale: &Scale,
    shape: ChordShape,
) -> TheoryResult<Vec<Chord>> {
    let root_letter = letters[0];
    let chord_type = shape.chord_type(scale.degree(root_letter));
    let candidates: Vec<Pitch> = pitches
        .iter()
        .filter(|pitch| letters.contains(&pitch.letter))
        .copied()
        .collect();

    let mut chords = Vec::new();
    for k in (2..candidates.len()).rev() {
        let voiced = [candidates[k], candidates[k - 1], candidates[k - 2]];
        let root = voiced
            .iter()
            .find(|pitch| pitch.letter == root_letter)
            .copied()
            .ok_or_else(|| TheoryError::RootNotVoiced {
                root: root_letter.as_char(),
                voiced: voiced
                    .iter()
                    .map(Pitch::canonical_name)
                    .collect::<Vec<_>>()
                    .join(" "),
            })?;

        chords.push(Chord {
            scale: *scale,
            pitches: voiced,
            root,
            chord_type,
        });
    }
    Ok(chords)
}

/// Search state of the clef split: pitches bound so far and whether the
/// treble staff may still receive notes.
struct ClefSearch {
    next: usize,
    bound: Vec<Pitch>,
    treble_open: bool,
}

/// Every way to write `chord` across the two staves.
///
/// Pitches are bound in order (soprano first). Each pitch branches into its
/// [`Pitch::clef_variants`] given the flag carried from the previous binding,
/// and the chosen variant's treble flag is carried to the next pitch. Once a
/// pitch lands on the bass staff, every lower pitch stays there.
pub fn split_across_clefs(chord: &Chord) -> Vec<Chord> {
    let mut voicings = Vec::new();
    let mut stack = vec![ClefSearch {
        next: 0,
        bound: Vec::with_capacity(3),
        treble_open: true,
    }];

    while let Some(state) = stack.pop() {
        if state.bound.len() == 3 {
            voicings.push(bind_voicing(chord, &state.bound));
            continue;
        }
        if state.next >= chord.pitches.len() {
            continue;
        }

        let variants = chord.pitches[state.next].clef_variants(state.treble_open);
        // reversed so the treble branch is explored first
        for variant in variants.into_iter().rev() {
            let mut bound = state.bound.clone();
            bound.push(variant);
            stack.push(ClefSearch {
                next: state.next + 1,
                bound,
                treble_open: variant.treble,
            });
        }
    }

    voicings
}

fn bind_voicing(chord: &Chord, bound: &[Pitch]) -> Chord {
    let pitches = [bound[0], bound[1], bound[2]];
    let root = pitches
        .iter()
        .find(|pitch| {
            pitch.base_index == chord.root.base_index && pitch.letter == chord.root.letter
        })
        .copied()
        .unwrap_or(chord.root);
    Chord {
        pitches,
        root,
        ..*chord
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Accidental;
    use crate::scale::{A_MINOR, C_MAJOR};

    fn chord_with_root(root: Pitch, chord_type: ChordType) -> Chord {
        Chord {
            scale: C_MAJOR,
            pitches: [root, root, root],
            root,
            chord_type,
        }
    }

    #[test]
    fn test_chord_name() {
        let c = REFERENCE_PITCHES[3];
        let d = REFERENCE_PITCHES[4];
        assert_eq!(chord_with_root(c, ChordType::MajorTriad).name(), "C maj");
        assert_eq!(chord_with_root(d, ChordType::MinorTriad).name(), "D min");
        assert_eq!(chord_with_root(d, ChordType::DominantSeventh).name(), "D maj7");
        assert_eq!(chord_with_root(d, ChordType::MajorSeventh).name(), "D maj7");
        assert_eq!(
            chord_with_root(d.with_accidental(Accidental::Flat), ChordType::HalfDiminishedSeventh)
                .name(),
            "D♭ halfdim7"
        );
    }

    #[test]
    fn test_chord_name_fallthrough() {
        let a = REFERENCE_PITCHES[1];
        assert_eq!(chord_with_root(a, ChordType::MinorMajorSeventh).name(), "A");
        assert_eq!(chord_with_root(a, ChordType::AugmentedMajorSeventh).name(), "A");
    }

    #[test]
    fn test_roman_numeral() {
        let g = REFERENCE_PITCHES[7];
        assert_eq!(chord_with_root(g, ChordType::MajorTriad).roman_numeral(), "V");
        assert_eq!(
            chord_with_root(g, ChordType::DominantSeventh).roman_numeral(),
            "V7"
        );
        let b = REFERENCE_PITCHES[9];
        assert_eq!(
            chord_with_root(b, ChordType::DiminishedTriad).roman_numeral(),
            "vii°"
        );
    }

    #[test]
    fn test_triad_letter_sets() {
        let sets = triad_letter_sets();
        assert_eq!(sets[0], [Letter::C, Letter::E, Letter::G]);
        assert_eq!(sets[4], [Letter::G, Letter::B, Letter::D]);
        assert_eq!(sets[6], [Letter::B, Letter::D, Letter::F]);
    }

    #[test]
    fn test_close_voicings_are_descending_windows() {
        let voicings = close_voicings(
            &REFERENCE_PITCHES,
            [Letter::C, Letter::E, Letter::G],
            &C_MAJOR,
            ChordShape::Triad,
        )
        .unwrap();
        let top = voicings[0];
        let indices: Vec<i32> = top.pitches.iter().map(|p| p.base_index).collect();
        assert_eq!(indices, vec![52, 48, 43]);
        assert_eq!(top.root.base_index, 48);
        for chord in &voicings {
            assert!(chord.pitches[0].tone_index() > chord.pitches[1].tone_index());
            assert!(chord.pitches[1].tone_index() > chord.pitches[2].tone_index());
            assert!(chord.pitches.contains(&chord.root));
            assert_eq!(chord.root.letter, Letter::C);
        }
    }

    #[test]
    fn test_split_all_dual_branches() {
        // e g c (28, 24, 19): all three may sit on either staff
        let chord = Chord {
            scale: C_MAJOR,
            pitches: [REFERENCE_PITCHES[19], REFERENCE_PITCHES[17], REFERENCE_PITCHES[14]],
            root: REFERENCE_PITCHES[17],
            chord_type: ChordType::MajorTriad,
        };
        let splits = split_across_clefs(&chord);
        assert_eq!(splits.len(), 4);
        // treble-first exploration order
        let layouts: Vec<[bool; 3]> = splits
            .iter()
            .map(|c| [c.pitches[0].treble, c.pitches[1].treble, c.pitches[2].treble])
            .collect();
        assert_eq!(
            layouts,
            vec![
                [true, true, true],
                [true, true, false],
                [true, false, false],
                [false, false, false],
            ]
        );
        for split in &splits {
            assert!(split.pitches.contains(&split.root));
            assert!(chord_on_clefs(split).is_ok());
        }
    }

    #[test]
    fn test_split_without_dual_pitches() {
        let chord = Chord {
            scale: C_MAJOR,
            pitches: [REFERENCE_PITCHES[31], REFERENCE_PITCHES[29], REFERENCE_PITCHES[26]],
            root: REFERENCE_PITCHES[31],
            chord_type: ChordType::MajorTriad,
        };
        let splits = split_across_clefs(&chord);
        assert_eq!(splits, vec![chord]);
    }

    #[test]
    fn test_chord_on_clefs_partitions() {
        let chord = Chord {
            scale: C_MAJOR,
            pitches: [
                REFERENCE_PITCHES[19].on_treble(),
                REFERENCE_PITCHES[17].on_bass(),
                REFERENCE_PITCHES[14].on_bass(),
            ],
            root: REFERENCE_PITCHES[17].on_bass(),
            chord_type: ChordType::MajorTriad,
        };
        let on_clefs = chord_on_clefs(&chord).unwrap();
        assert_eq!(on_clefs.treble, vec![chord.pitches[0]]);
        assert_eq!(on_clefs.bass, vec![chord.pitches[1], chord.pitches[2]]);
    }

    #[test]
    fn test_chord_on_clefs_rejects_dual_pitch() {
        let chord = Chord {
            scale: C_MAJOR,
            pitches: [REFERENCE_PITCHES[19], REFERENCE_PITCHES[17], REFERENCE_PITCHES[14]],
            root: REFERENCE_PITCHES[17],
            chord_type: ChordType::MajorTriad,
        };
        let err = chord_on_clefs(&chord).unwrap_err();
        assert!(matches!(err, TheoryError::DualClefPitch { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_minimum_spacing() {
        let chord = Chord {
            scale: C_MAJOR,
            pitches: [REFERENCE_PITCHES[10], REFERENCE_PITCHES[9], REFERENCE_PITCHES[5]],
            root: REFERENCE_PITCHES[10],
            chord_type: ChordType::MajorSeventh,
        };
        // b (11) and c (12) are a semitone apart
        assert!(!chord.has_minimum_spacing(SEVENTH_MIN_SPACING));
        assert!(chord.has_minimum_spacing(1));
    }

    #[test]
    fn test_sevenths_use_seventh_types() {
        let chords = generate_all_diatonic_sevenths_without_fifth(&C_MAJOR).unwrap();
        assert!(!chords.is_empty());
        for chord in &chords {
            assert!(!chord.is_triad());
            assert!(chord.has_minimum_spacing(SEVENTH_MIN_SPACING));
            assert_eq!(chord.chord_type, C_MAJOR.degree(chord.root.letter).seventh_type);
        }
    }

    #[test]
    fn test_harmonic_minor_triads() {
        let chords = generate_all_diatonic_triads(&A_MINOR).unwrap();
        let dominant = chords
            .iter()
            .find(|c| c.root.letter == Letter::E)
            .unwrap();
        assert_eq!(dominant.chord_type, ChordType::MajorTriad);
        assert!(dominant
            .pitches
            .iter()
            .any(|p| p.letter == Letter::G && p.accidental == Accidental::Sharp));
        let mediant = chords
            .iter()
            .find(|c| c.root.letter == Letter::C)
            .unwrap();
        assert_eq!(mediant.name(), "C aug");
        assert_eq!(mediant.roman_numeral(), "III+");
    }
}
