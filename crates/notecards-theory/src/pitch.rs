//! Pitch model: letters, accidentals, clef eligibility and the reference keyboard table.
//!
//! A [`Pitch`] is a plain `Copy` value. The reference table is never modified;
//! scales and voicings work on derived copies.

use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;
use crate::scale::Scale;

/// The C-based letter cycle used for degree and letter-step arithmetic.
pub const LETTER_CYCLE: &str = "cdefgabcdefgab";

/// Base letter of a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters in cycle order.
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position of the letter in the C-based cycle (c = 0 .. b = 6).
    pub fn index(self) -> usize {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Letter at `index` in the cycle, wrapping past b.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 7]
    }

    /// Lower-case letter name.
    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'c',
            Letter::D => 'd',
            Letter::E => 'e',
            Letter::F => 'f',
            Letter::G => 'g',
            Letter::A => 'a',
            Letter::B => 'b',
        }
    }

    /// Parses a single letter name (case-insensitive).
    pub fn from_char(c: char) -> Result<Self, TheoryError> {
        match c.to_ascii_lowercase() {
            'c' => Ok(Letter::C),
            'd' => Ok(Letter::D),
            'e' => Ok(Letter::E),
            'f' => Ok(Letter::F),
            'g' => Ok(Letter::G),
            'a' => Ok(Letter::A),
            'b' => Ok(Letter::B),
            _ => Err(TheoryError::unknown_letter(c.to_string())),
        }
    }

    /// Number of letter steps going up from `self` to `other`, in 1..=7.
    ///
    /// The same letter counts as a full cycle (7), matching a search for the
    /// next occurrence of `other` strictly after `self` in [`LETTER_CYCLE`].
    pub fn steps_up_to(self, other: Letter) -> usize {
        (other.index() + 6 - self.index()) % 7 + 1
    }

    /// Letter `steps` positions above `self` in the cycle.
    pub fn offset(self, steps: usize) -> Letter {
        Letter::from_index(self.index() + steps)
    }
}

impl FromStr for Letter {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::from_char(c),
            _ => Err(TheoryError::unknown_letter(s)),
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Accidental applied to a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    /// Semitone offset: +1 sharp, -1 flat, 0 natural.
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// Octave marks for LilyPond absolute pitch, indexed by octave + 1.
const LILYPOND_OCTAVE_MARKS: [&str; 6] = [",,", ",", "", "'", "''", "'''"];

/// File-name safe octave marks, indexed by octave + 1.
const FILE_OCTAVE_MARKS: [&str; 6] = ["ll", "l", "", "u", "uu", "uuu"];

/// A single named tone with an absolute height and clef eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    /// Base letter.
    pub letter: Letter,
    /// Accidental applied on top of the letter.
    pub accidental: Accidental,
    /// Semitone index of the natural letter (c of the lowest full octave = 0).
    pub base_index: i32,
    /// May be written on the treble staff.
    pub treble: bool,
    /// May be written on the bass staff.
    pub bass: bool,
}

impl Pitch {
    /// A natural pitch at `base_index`.
    pub const fn natural(base_index: i32, letter: Letter, treble: bool, bass: bool) -> Self {
        Self {
            letter,
            accidental: Accidental::Natural,
            base_index,
            treble,
            bass,
        }
    }

    /// Absolute height: base index plus accidental offset.
    pub fn tone_index(&self) -> i32 {
        self.base_index + self.accidental.offset()
    }

    /// Copy of this pitch with another accidental.
    pub fn with_accidental(mut self, accidental: Accidental) -> Self {
        self.accidental = accidental;
        self
    }

    /// Copy bound to the treble staff only.
    pub fn on_treble(mut self) -> Self {
        self.bass = false;
        self
    }

    /// Copy bound to the bass staff only.
    pub fn on_bass(mut self) -> Self {
        self.treble = false;
        self
    }

    /// Clef-bound copies of this pitch.
    ///
    /// A treble copy is offered only when the pitch is treble-eligible and
    /// `treble_open` is set; a bass copy whenever the pitch is bass-eligible.
    pub fn clef_variants(&self, treble_open: bool) -> Vec<Pitch> {
        let mut variants = Vec::with_capacity(2);
        if self.treble && treble_open {
            variants.push(self.on_treble());
        }
        if self.bass {
            variants.push(self.on_bass());
        }
        variants
    }

    /// Octave number relative to the reference table (-1..=4).
    pub fn octave(&self) -> i32 {
        self.base_index.div_euclid(12)
    }

    fn octave_slot(&self) -> usize {
        (self.octave() + 1).clamp(0, 5) as usize
    }

    /// LilyPond (Dutch) note name without octave, e.g. `fis`, `bes`, `es`.
    pub fn name_with_modifier(&self) -> String {
        let letter = self.letter.as_char();
        match self.accidental {
            Accidental::Natural => letter.to_string(),
            Accidental::Sharp => format!("{}is", letter),
            Accidental::Flat => match self.letter {
                Letter::E | Letter::A => format!("{}s", letter),
                _ => format!("{}es", letter),
            },
        }
    }

    /// Human-readable name, e.g. `C`, `F♯`, `B♭`.
    pub fn display_name(&self) -> String {
        let letter = self.letter.as_char().to_ascii_uppercase();
        match self.accidental {
            Accidental::Natural => letter.to_string(),
            Accidental::Sharp => format!("{}♯", letter),
            Accidental::Flat => format!("{}♭", letter),
        }
    }

    /// LilyPond absolute pitch, e.g. `fis'`.
    pub fn lilypond_symbol(&self) -> String {
        format!(
            "{}{}",
            self.name_with_modifier(),
            LILYPOND_OCTAVE_MARKS[self.octave_slot()]
        )
    }

    /// File-name safe symbol, e.g. `fisu`.
    pub fn symbol(&self) -> String {
        format!(
            "{}{}",
            self.name_with_modifier(),
            FILE_OCTAVE_MARKS[self.octave_slot()]
        )
    }

    /// Bit-stable identity string used for cache keys, e.g. `fisu_s_T`.
    pub fn canonical_name(&self) -> String {
        let accidental = match self.accidental {
            Accidental::Sharp => "_s",
            Accidental::Flat => "_f",
            Accidental::Natural => "_",
        };
        let clefs = match (self.treble, self.bass) {
            (true, true) => "_TB",
            (true, false) => "_T",
            (false, true) => "_B",
            (false, false) => "",
        };
        format!("{}{}{}", self.symbol(), accidental, clefs)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

const fn bass(index: i32, letter: Letter) -> Pitch {
    Pitch::natural(index, letter, false, true)
}

const fn both(index: i32, letter: Letter) -> Pitch {
    Pitch::natural(index, letter, true, true)
}

const fn treble(index: i32, letter: Letter) -> Pitch {
    Pitch::natural(index, letter, true, false)
}

/// The full keyboard range covered by flashcards, ascending.
///
/// e (16) through a (33) may be written on either staff.
pub static REFERENCE_PITCHES: [Pitch; 35] = [
    bass(-5, Letter::G),
    bass(-3, Letter::A),
    bass(-1, Letter::B),
    bass(0, Letter::C),
    bass(2, Letter::D),
    bass(4, Letter::E),
    bass(5, Letter::F),
    bass(7, Letter::G),
    bass(9, Letter::A),
    bass(11, Letter::B),
    bass(12, Letter::C),
    bass(14, Letter::D),
    both(16, Letter::E),
    both(17, Letter::F),
    both(19, Letter::G),
    both(21, Letter::A),
    both(23, Letter::B),
    both(24, Letter::C),
    both(26, Letter::D),
    both(28, Letter::E),
    both(29, Letter::F),
    both(31, Letter::G),
    both(33, Letter::A),
    treble(35, Letter::B),
    treble(36, Letter::C),
    treble(38, Letter::D),
    treble(40, Letter::E),
    treble(41, Letter::F),
    treble(43, Letter::G),
    treble(45, Letter::A),
    treble(47, Letter::B),
    treble(48, Letter::C),
    treble(50, Letter::D),
    treble(52, Letter::E),
    treble(53, Letter::F),
];

/// Applies a scale's key signature to a pitch list.
///
/// Every pitch whose letter is altered by the scale gets the scale's
/// accidental; all other pitches are copied unchanged.
pub fn apply_scale(pitches: &[Pitch], scale: &Scale) -> Vec<Pitch> {
    pitches
        .iter()
        .map(|pitch| {
            if scale.alters(pitch.letter) {
                pitch.with_accidental(scale.accidental)
            } else {
                *pitch
            }
        })
        .collect()
}
