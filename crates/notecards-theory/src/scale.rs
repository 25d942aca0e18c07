//! Scale model: key signatures, degree tables and the built-in scale catalogue.

use crate::chord::{ChordQuality, ChordType};
use crate::error::{TheoryError, TheoryResult};
use crate::pitch::{Accidental, Letter};

/// Scale mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleMode {
    Major,
    /// Harmonic minor: the raised seventh is part of the altered letters.
    MinorHarmonic,
}

impl ScaleMode {
    /// Selector keyword that picks every scale of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::Major => "major",
            ScaleMode::MinorHarmonic => "minor",
        }
    }

    /// Fixed degree table of this mode.
    pub fn degrees(&self) -> &'static [ScaleDegree; 7] {
        match self {
            ScaleMode::Major => &MAJOR_SCALE_DEGREES,
            ScaleMode::MinorHarmonic => &HARMONIC_MINOR_SCALE_DEGREES,
        }
    }
}

/// Harmonic role of one scale degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleDegree {
    /// 1-based degree number.
    pub degree: u8,
    pub quality: ChordQuality,
    pub roman_numeral_triad: &'static str,
    pub roman_numeral_seventh: &'static str,
    pub triad_type: ChordType,
    pub seventh_type: ChordType,
}

/// Degree table of the major mode (I ii iii IV V vi vii°).
pub static MAJOR_SCALE_DEGREES: [ScaleDegree; 7] = [
    ScaleDegree {
        degree: 1,
        quality: ChordQuality::Major,
        roman_numeral_triad: "I",
        roman_numeral_seventh: "I7",
        triad_type: ChordType::MajorTriad,
        seventh_type: ChordType::MajorSeventh,
    },
    ScaleDegree {
        degree: 2,
        quality: ChordQuality::Minor,
        roman_numeral_triad: "ii",
        roman_numeral_seventh: "ii7",
        triad_type: ChordType::MinorTriad,
        seventh_type: ChordType::MinorSeventh,
    },
    ScaleDegree {
        degree: 3,
        quality: ChordQuality::Minor,
        roman_numeral_triad: "iii",
        roman_numeral_seventh: "iii7",
        triad_type: ChordType::MinorTriad,
        seventh_type: ChordType::MinorSeventh,
    },
    ScaleDegree {
        degree: 4,
        quality: ChordQuality::Major,
        roman_numeral_triad: "IV",
        roman_numeral_seventh: "IV7",
        triad_type: ChordType::MajorTriad,
        seventh_type: ChordType::MajorSeventh,
    },
    ScaleDegree {
        degree: 5,
        quality: ChordQuality::Major,
        roman_numeral_triad: "V",
        roman_numeral_seventh: "V7",
        triad_type: ChordType::MajorTriad,
        seventh_type: ChordType::DominantSeventh,
    },
    ScaleDegree {
        degree: 6,
        quality: ChordQuality::Minor,
        roman_numeral_triad: "vi",
        roman_numeral_seventh: "vi7",
        triad_type: ChordType::MinorTriad,
        seventh_type: ChordType::MinorSeventh,
    },
    ScaleDegree {
        degree: 7,
        quality: ChordQuality::Diminished,
        roman_numeral_triad: "vii°",
        roman_numeral_seventh: "vii⦰7",
        triad_type: ChordType::DiminishedTriad,
        seventh_type: ChordType::HalfDiminishedSeventh,
    },
];

/// Degree table of the harmonic minor mode (i ii° III+ iv V VI vii°).
pub static HARMONIC_MINOR_SCALE_DEGREES: [ScaleDegree; 7] = [
    ScaleDegree {
        degree: 1,
        quality: ChordQuality::Minor,
        roman_numeral_triad: "i",
        roman_numeral_seventh: "i(maj7)",
        triad_type: ChordType::MinorTriad,
        seventh_type: ChordType::MinorMajorSeventh,
    },
    ScaleDegree {
        degree: 2,
        quality: ChordQuality::Diminished,
        roman_numeral_triad: "ii°",
        roman_numeral_seventh: "ii⦰7",
        triad_type: ChordType::DiminishedTriad,
        seventh_type: ChordType::HalfDiminishedSeventh,
    },
    ScaleDegree {
        degree: 3,
        quality: ChordQuality::Augmented,
        roman_numeral_triad: "III+",
        roman_numeral_seventh: "III+maj7",
        triad_type: ChordType::AugmentedTriad,
        seventh_type: ChordType::AugmentedMajorSeventh,
    },
    ScaleDegree {
        degree: 4,
        quality: ChordQuality::Minor,
        roman_numeral_triad: "iv",
        roman_numeral_seventh: "iv7",
        triad_type: ChordType::MinorTriad,
        seventh_type: ChordType::MinorSeventh,
    },
    ScaleDegree {
        degree: 5,
        quality: ChordQuality::Major,
        roman_numeral_triad: "V",
        roman_numeral_seventh: "V7",
        triad_type: ChordType::MajorTriad,
        seventh_type: ChordType::DominantSeventh,
    },
    ScaleDegree {
        degree: 6,
        quality: ChordQuality::Major,
        roman_numeral_triad: "VI",
        roman_numeral_seventh: "VI7",
        triad_type: ChordType::MajorTriad,
        seventh_type: ChordType::MajorSeventh,
    },
    ScaleDegree {
        degree: 7,
        quality: ChordQuality::Diminished,
        roman_numeral_triad: "vii°",
        roman_numeral_seventh: "vii°7",
        triad_type: ChordType::DiminishedTriad,
        seventh_type: ChordType::DiminishedSeventh,
    },
];

/// A key signature: tonic, mode, and which letters it alters by how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scale {
    pub tonic: Letter,
    pub mode: ScaleMode,
    /// Accidental applied to every letter in `altered`.
    pub accidental: Accidental,
    pub altered: &'static [Letter],
    /// Display name, also the catalogue key (e.g. `"b flat major"`).
    pub name: &'static str,
    /// LilyPond `\key` argument (e.g. `bes \major`).
    pub lilypond_symbol: &'static str,
}

impl Scale {
    /// Whether the key signature alters `letter`.
    pub fn alters(&self, letter: Letter) -> bool {
        self.altered.contains(&letter)
    }

    /// Number of accidentals in the key signature.
    pub fn accidental_count(&self) -> usize {
        self.altered.len()
    }

    /// Zero-based degree of `letter`: its letter distance above the tonic.
    pub fn degree_index(&self, letter: Letter) -> usize {
        (letter.index() + 7 - self.tonic.index()) % 7
    }

    /// Harmonic role of the degree built on `letter`.
    pub fn degree(&self, letter: Letter) -> &'static ScaleDegree {
        &self.mode.degrees()[self.degree_index(letter)]
    }

    /// Degree lookup from a textual letter name.
    ///
    /// A name that is not a letter is a broken table invariant, not bad input.
    pub fn degree_of_name(&self, name: &str) -> TheoryResult<&'static ScaleDegree> {
        let letter: Letter = name
            .parse()
            .map_err(|_| TheoryError::UnknownDegreeLetter {
                letter: name.to_string(),
                scale: self.name.to_string(),
            })?;
        Ok(self.degree(letter))
    }

    /// Scale name with spaces replaced, safe for file names.
    pub fn file_safe_name(&self) -> String {
        self.name.replace(' ', "_")
    }
}

pub const C_MAJOR: Scale = Scale {
    tonic: Letter::C,
    mode: ScaleMode::Major,
    accidental: Accidental::Natural,
    altered: &[],
    name: "c major",
    lilypond_symbol: r"c \major",
};

pub const A_MINOR: Scale = Scale {
    tonic: Letter::A,
    mode: ScaleMode::MinorHarmonic,
    accidental: Accidental::Sharp,
    altered: &[Letter::G],
    name: "a minor",
    lilypond_symbol: r"a \minor",
};

pub const G_MAJOR: Scale = Scale {
    tonic: Letter::G,
    mode: ScaleMode::Major,
    accidental: Accidental::Sharp,
    altered: &[Letter::F],
    name: "g major",
    lilypond_symbol: r"g \major",
};

pub const E_MINOR: Scale = Scale {
    tonic: Letter::E,
    mode: ScaleMode::MinorHarmonic,
    accidental: Accidental::Sharp,
    altered: &[Letter::F, Letter::D],
    name: "e minor",
    lilypond_symbol: r"e \minor",
};

pub const D_MAJOR: Scale = Scale {
    tonic: Letter::D,
    mode: ScaleMode::Major,
    accidental: Accidental::Sharp,
    altered: &[Letter::C, Letter::F],
    name: "d major",
    lilypond_symbol: r"d \major",
};

pub const B_MINOR: Scale = Scale {
    tonic: Letter::B,
    mode: ScaleMode::MinorHarmonic,
    accidental: Accidental::Sharp,
    altered: &[Letter::C, Letter::F, Letter::A],
    name: "b minor",
    lilypond_symbol: r"b \minor",
};

pub const A_MAJOR: Scale = Scale {
    tonic: Letter::A,
    mode: ScaleMode::Major,
    accidental: Accidental::Sharp,
    altered: &[Letter::C, Letter::F, Letter::G],
    name: "a major",
    lilypond_symbol: r"a \major",
};

pub const F_SHARP_MINOR: Scale = Scale {
    tonic: Letter::F,
    mode: ScaleMode::MinorHarmonic,
    accidental: Accidental::Sharp,
    altered: &[Letter::C, Letter::F, Letter::G, Letter::E],
    name: "f sharp minor",
    lilypond_symbol: r"fis \minor",
};

pub const E_MAJOR: Scale = Scale {
    tonic: Letter::E,
    mode: ScaleMode::Major,
    accidental: Accidental::Sharp,
    altered: &[Letter::C, Letter::F, Letter::G, Letter::D],
    name: "e major",
    lilypond_symbol: r"e \major",
};

pub const C_SHARP_MINOR: Scale = Scale {
    tonic: Letter::C,
    mode: ScaleMode::MinorHarmonic,
    accidental: Accidental::Sharp,
    altered: &[Letter::C, Letter::F, Letter::G, Letter::D, Letter::B],
    name: "c sharp minor",
    lilypond_symbol: r"cis \minor",
};

pub const B_MAJOR: Scale = Scale {
    tonic: Letter::B,
    mode: ScaleMode::Major,
    accidental: Accidental::Sharp,
    altered: &[Letter::C, Letter::F, Letter::G, Letter::D, Letter::A],
    name: "b major",
    lilypond_symbol: r"b \major",
};

pub const F_SHARP_MAJOR: Scale = Scale {
    tonic: Letter::F,
    mode: ScaleMode::Major,
    accidental: Accidental::Sharp,
    altered: &[
        Letter::F,
        Letter::C,
        Letter::G,
        Letter::D,
        Letter::A,
        Letter::E,
    ],
    name: "f sharp major",
    lilypond_symbol: r"fis \major",
};

pub const F_MAJOR: Scale = Scale {
    tonic: Letter::F,
    mode: ScaleMode::Major,
    accidental: Accidental::Flat,
    altered: &[Letter::B],
    name: "f major",
    lilypond_symbol: r"f \major",
};

pub const B_FLAT_MAJOR: Scale = Scale {
    tonic: Letter::B,
    mode: ScaleMode::Major,
    accidental: Accidental::Flat,
    altered: &[Letter::B, Letter::E],
    name: "b flat major",
    lilypond_symbol: r"bes \major",
};

pub const E_FLAT_MAJOR: Scale = Scale {
    tonic: Letter::E,
    mode: ScaleMode::Major,
    accidental: Accidental::Flat,
    altered: &[Letter::B, Letter::E, Letter::A],
    name: "e flat major",
    lilypond_symbol: r"es \major",
};

pub const A_FLAT_MAJOR: Scale = Scale {
    tonic: Letter::A,
    mode: ScaleMode::Major,
    accidental: Accidental::Flat,
    altered: &[Letter::B, Letter::E, Letter::A, Letter::D],
    name: "a flat major",
    lilypond_symbol: r"as \major",
};

pub const D_FLAT_MAJOR: Scale = Scale {
    tonic: Letter::D,
    mode: ScaleMode::Major,
    accidental: Accidental::Flat,
    altered: &[Letter::B, Letter::E, Letter::A, Letter::D, Letter::G],
    name: "d flat major",
    lilypond_symbol: r"des \major",
};

pub const G_FLAT_MAJOR: Scale = Scale {
    tonic: Letter::G,
    mode: ScaleMode::Major,
    accidental: Accidental::Flat,
    altered: &[
        Letter::B,
        Letter::E,
        Letter::A,
        Letter::D,
        Letter::G,
        Letter::C,
    ],
    name: "g flat major",
    lilypond_symbol: r"ges \major",
};

/// Every supported scale. Enharmonic extremes (7 accidentals) are excluded.
pub static SCALES: [Scale; 18] = [
    C_MAJOR,
    A_MINOR,
    G_MAJOR,
    E_MINOR,
    D_MAJOR,
    B_MINOR,
    A_MAJOR,
    F_SHARP_MINOR,
    E_MAJOR,
    C_SHARP_MINOR,
    B_MAJOR,
    F_SHARP_MAJOR,
    F_MAJOR,
    B_FLAT_MAJOR,
    E_FLAT_MAJOR,
    A_FLAT_MAJOR,
    D_FLAT_MAJOR,
    G_FLAT_MAJOR,
];

/// Looks up a scale by its display name (case-insensitive).
pub fn find_scale(name: &str) -> TheoryResult<Scale> {
    let wanted = name.trim().to_lowercase();
    SCALES
        .iter()
        .find(|scale| scale.name == wanted)
        .copied()
        .ok_or(TheoryError::UnknownScale {
            name: name.to_string(),
        })
}

/// Resolves a scale selector into a non-empty list of scales.
///
/// `"major"` and `"minor"` select every scale of that mode with at most
/// `max_accidentals` accidentals, in catalogue order. Any other selector is
/// looked up by name and the accidental limit does not apply.
pub fn select_scales(selector: &str, max_accidentals: usize) -> TheoryResult<Vec<Scale>> {
    let wanted = selector.trim().to_lowercase();
    let mode = [ScaleMode::Major, ScaleMode::MinorHarmonic]
        .into_iter()
        .find(|mode| mode.as_str() == wanted);

    let scales: Vec<Scale> = match mode {
        Some(mode) => SCALES
            .iter()
            .filter(|scale| scale.mode == mode && scale.accidental_count() <= max_accidentals)
            .copied()
            .collect(),
        None => vec![find_scale(&wanted)?],
    };

    if scales.is_empty() {
        return Err(TheoryError::NoScalesMatched {
            selector: selector.to_string(),
            max_accidentals,
        });
    }

    Ok(scales)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_index_c_major() {
        for (expected, letter) in Letter::ALL.iter().enumerate() {
            assert_eq!(C_MAJOR.degree_index(*letter), expected);
        }
    }

    #[test]
    fn test_degree_index_a_major() {
        assert_eq!(A_MAJOR.degree_index(Letter::A), 0);
        assert_eq!(A_MAJOR.degree_index(Letter::B), 1);
        assert_eq!(A_MAJOR.degree_index(Letter::C), 2);
        assert_eq!(A_MAJOR.degree_index(Letter::D), 3);
        assert_eq!(A_MAJOR.degree_index(Letter::E), 4);
        assert_eq!(A_MAJOR.degree_index(Letter::F), 5);
        assert_eq!(A_MAJOR.degree_index(Letter::G), 6);
    }

    #[test]
    fn test_degree_of_name() {
        assert_eq!(C_MAJOR.degree_of_name("g").unwrap().roman_numeral_triad, "V");
        assert_eq!(A_MINOR.degree_of_name("C").unwrap().roman_numeral_triad, "III+");

        let err = C_MAJOR.degree_of_name("x").unwrap_err();
        assert_eq!(
            err,
            TheoryError::UnknownDegreeLetter {
                letter: "x".to_string(),
                scale: "c major".to_string(),
            }
        );
        assert!(err.is_fatal());
        assert_eq!(err.code(), "THEORY_105");
    }

    #[test]
    fn test_degree_tables_are_numbered() {
        for mode in [ScaleMode::Major, ScaleMode::MinorHarmonic] {
            for (i, degree) in mode.degrees().iter().enumerate() {
                assert_eq!(degree.degree as usize, i + 1);
                assert!(degree.triad_type.is_triad());
                assert!(!degree.seventh_type.is_triad());
            }
        }
    }

    #[test]
    fn test_harmonic_minor_degrees() {
        assert_eq!(A_MINOR.degree(Letter::A).triad_type, ChordType::MinorTriad);
        assert_eq!(A_MINOR.degree(Letter::C).triad_type, ChordType::AugmentedTriad);
        assert_eq!(A_MINOR.degree(Letter::E).seventh_type, ChordType::DominantSeventh);
        assert_eq!(A_MINOR.degree(Letter::G).seventh_type, ChordType::DiminishedSeventh);
    }

    #[test]
    fn test_catalogue_accidentals() {
        for scale in SCALES.iter() {
            assert!(scale.accidental_count() <= 6, "{}", scale.name);
            assert_eq!(
                scale.accidental == Accidental::Natural,
                scale.altered.is_empty(),
                "{}",
                scale.name
            );
        }
        assert_eq!(D_FLAT_MAJOR.tonic, Letter::D);
    }

    #[test]
    fn test_find_scale() {
        assert_eq!(find_scale("c major").unwrap(), C_MAJOR);
        assert_eq!(find_scale(" B Flat Major ").unwrap(), B_FLAT_MAJOR);
        assert!(matches!(
            find_scale("h major"),
            Err(TheoryError::UnknownScale { .. })
        ));
    }

    #[test]
    fn test_select_scales_by_mode() {
        let majors = select_scales("major", 7).unwrap();
        assert_eq!(majors.len(), 13);
        assert!(majors.iter().all(|s| s.mode == ScaleMode::Major));

        let few = select_scales("major", 1).unwrap();
        let names: Vec<&str> = few.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["c major", "g major", "f major"]);

        let minors = select_scales("minor", 2).unwrap();
        let names: Vec<&str> = minors.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a minor", "e minor"]);
    }

    #[test]
    fn test_select_scales_errors() {
        assert!(matches!(
            select_scales("minor", 0),
            Err(TheoryError::NoScalesMatched { .. })
        ));
        assert!(matches!(
            select_scales("x major", 7),
            Err(TheoryError::UnknownScale { .. })
        ));
        // a named scale ignores the accidental limit
        assert_eq!(select_scales("g flat major", 0).unwrap(), vec![G_FLAT_MAJOR]);
    }
}
