//! LilyPond source generation.
//!
//! Every card is a piano score: a treble staff over a bass staff, no time
//! signature, the key of the card's scale, and one quarter-note chord per
//! [`StaffChord`]. A staff with nothing to play gets a spacer rest (`s4`) so
//! both staves stay aligned.

use std::fmt;

use notecards_theory::scale::C_MAJOR;
use notecards_theory::{chord_on_clefs, Chord, Interval, Pitch, Scale};

use crate::error::{RenderError, RenderResult};

/// LilyPond language version the sources are written against.
pub const LILYPOND_VERSION: &str = "2.14.1";

const PAPER_BLOCK: &str = r"\paper{
  indent=0\mm
  line-width=120\mm
  oddFooterMarkup=##f
  oddHeaderMarkup=##f
  bookTitleMarkup = ##f
  scoreTitleMarkup = ##f
}";

const SCORE_BLOCK: &str = r#"\score {
  \new PianoStaff
  <<
    \new Staff = "upper" \upper
    \new Staff = "lower" \lower
  >>
  \layout { }
  \midi { }
}"#;

const HIDE_TIME_SIGNATURE: &str = r"\once \override Staff.TimeSignature #'transparent = ##t";

/// One beat of the score: the notes written on each staff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffChord {
    pub treble: Vec<Pitch>,
    pub bass: Vec<Pitch>,
}

impl StaffChord {
    /// Creates a staff chord from explicit staff contents.
    pub fn new(treble: Vec<Pitch>, bass: Vec<Pitch>) -> Self {
        Self { treble, bass }
    }

    /// Lays out a clef-bound interval.
    ///
    /// Bass/bass goes on the bass staff, bass/treble is split across both,
    /// treble/treble goes on the treble staff.
    pub fn from_interval(interval: &Interval) -> RenderResult<Self> {
        let (first, second) = (interval.first, interval.second);
        if first.bass && second.bass {
            Ok(Self::new(Vec::new(), vec![first, second]))
        } else if first.bass && second.treble {
            Ok(Self::new(vec![second], vec![first]))
        } else if first.treble && second.treble {
            Ok(Self::new(vec![first, second], Vec::new()))
        } else {
            Err(RenderError::UnsupportedIntervalLayout {
                first: first.canonical_name(),
                second: second.canonical_name(),
            })
        }
    }

    /// Lays out a clef-bound chord.
    pub fn from_chord(chord: &Chord) -> RenderResult<Self> {
        let on_clefs = chord_on_clefs(chord)?;
        Ok(Self::new(on_clefs.treble, on_clefs.bass))
    }

    /// Treble staff entry, e.g. `<e'' c''>4`.
    pub fn treble_notes(&self) -> String {
        staff_notes(&self.treble)
    }

    /// Bass staff entry, e.g. `<c e>4`.
    pub fn bass_notes(&self) -> String {
        staff_notes(&self.bass)
    }
}

fn staff_notes(pitches: &[Pitch]) -> String {
    if pitches.is_empty() {
        return "s4".to_string();
    }
    let symbols: Vec<String> = pitches.iter().map(Pitch::lilypond_symbol).collect();
    format!("<{}>4", symbols.join(" "))
}

/// A complete piano score in one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PianoScore {
    key: String,
    chords: Vec<StaffChord>,
}

impl PianoScore {
    /// Creates an empty score in the key of `scale`.
    pub fn new(scale: &Scale) -> Self {
        Self {
            key: scale.lilypond_symbol.to_string(),
            chords: Vec::new(),
        }
    }

    /// Appends a chord.
    pub fn push(&mut self, chord: StaffChord) {
        self.chords.push(chord);
    }

    /// Builder-style [`PianoScore::push`].
    pub fn with_chord(mut self, chord: StaffChord) -> Self {
        self.push(chord);
        self
    }

    /// The `\key` argument.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn chords(&self) -> &[StaffChord] {
        &self.chords
    }

    /// Renders the score as LilyPond source.
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PianoScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"\version "{}""#, LILYPOND_VERSION)?;
        writeln!(f, r#"\include "lilypond-book-preamble.ly""#)?;
        writeln!(f)?;
        writeln!(f, "{}", PAPER_BLOCK)?;
        writeln!(f)?;

        writeln!(f, "upper = {{")?;
        writeln!(f, r"  \clef treble")?;
        writeln!(f, "  {}", HIDE_TIME_SIGNATURE)?;
        writeln!(f, r"  \key {}", self.key)?;
        writeln!(f)?;
        for chord in &self.chords {
            writeln!(f, "  {}", chord.treble_notes())?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;

        writeln!(f, "lower = {{")?;
        writeln!(f, "  {}", HIDE_TIME_SIGNATURE)?;
        writeln!(f, r"  \key {}", self.key)?;
        writeln!(f)?;
        writeln!(f, r"  \clef bass")?;
        writeln!(f)?;
        for chord in &self.chords {
            writeln!(f, "  {}", chord.bass_notes())?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;

        writeln!(f, "{}", SCORE_BLOCK)
    }
}

/// Source of a single-interval card. Intervals without a scale use C major.
pub fn interval_source(interval: &Interval) -> RenderResult<String> {
    let scale = interval.scale.unwrap_or(C_MAJOR);
    let score = PianoScore::new(&scale).with_chord(StaffChord::from_interval(interval)?);
    Ok(score.to_source())
}

/// Source of a card holding `chords` side by side, in the key of `scale`.
pub fn chords_source(scale: &Scale, chords: &[Chord]) -> RenderResult<String> {
    let mut score = PianoScore::new(scale);
    for chord in chords {
        score.push(StaffChord::from_chord(chord)?);
    }
    Ok(score.to_source())
}
