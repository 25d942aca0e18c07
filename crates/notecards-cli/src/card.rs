//! Flashcards: the entity on the front and its description on the back.

use std::cmp::Ordering;

use notecards_lilypond::{chords_source, interval_source, RenderResult};
use notecards_theory::naming::{chord_file_stem, interval_file_stem};
use notecards_theory::{Chord, Interval, Scale, TheoryResult};

/// One flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Interval(Interval),
    Chord(Chord),
}

impl Card {
    pub fn scale(&self) -> Option<Scale> {
        match self {
            Card::Interval(interval) => interval.scale,
            Card::Chord(chord) => Some(chord.scale),
        }
    }

    /// Content-hashed image file stem.
    pub fn file_stem(&self) -> String {
        match self {
            Card::Interval(interval) => interval_file_stem(interval),
            Card::Chord(chord) => chord_file_stem(chord),
        }
    }

    /// Image name of the front side.
    pub fn image_file_name(&self) -> String {
        format!("{}.png", self.file_stem())
    }

    /// Deck front: an image tag with quotes doubled for the CSV field.
    pub fn front_text(&self) -> String {
        format!("<img src=\"\"{}\"\">", self.image_file_name())
    }

    /// Deck back, e.g. `Perfect fifth (7), c -> g` or `F♯ min`.
    pub fn back_text(&self) -> TheoryResult<String> {
        match self {
            Card::Interval(interval) => Ok(format!(
                "{} ({}), {} -> {}",
                interval.name()?,
                interval.distance(),
                interval.first.name_with_modifier(),
                interval.second.name_with_modifier()
            )),
            Card::Chord(chord) => Ok(chord.name()),
        }
    }

    /// LilyPond source of the front image.
    pub fn source(&self) -> RenderResult<String> {
        match self {
            Card::Interval(interval) => interval_source(interval),
            Card::Chord(chord) => chords_source(&chord.scale, std::slice::from_ref(chord)),
        }
    }
}

/// Listing order: fewer accidentals first, then scale name, then interval
/// distance or chord root, then pitch heights.
pub fn listing_order(a: &Card, b: &Card) -> Ordering {
    let scale_key = |card: &Card| {
        card.scale()
            .map(|scale| (scale.accidental_count(), scale.name))
            .unwrap_or((0, ""))
    };

    scale_key(a)
        .cmp(&scale_key(b))
        .then_with(|| match (a, b) {
            (Card::Interval(x), Card::Interval(y)) => x
                .distance()
                .cmp(&y.distance())
                .then(x.first.tone_index().cmp(&y.first.tone_index()))
                .then(x.second.tone_index().cmp(&y.second.tone_index())),
            (Card::Chord(x), Card::Chord(y)) => x
                .root
                .letter
                .as_char()
                .cmp(&y.root.letter.as_char())
                .then_with(|| {
                    let heights = |chord: &Chord| chord.pitches.map(|p| p.tone_index());
                    heights(x).cmp(&heights(y))
                }),
            (Card::Interval(_), Card::Chord(_)) => Ordering::Less,
            (Card::Chord(_), Card::Interval(_)) => Ordering::Greater,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notecards_theory::scale::{C_MAJOR, G_MAJOR};
    use notecards_theory::{ChordType, REFERENCE_PITCHES};
    use pretty_assertions::assert_eq;

    fn interval(first: usize, second: usize) -> Card {
        Card::Interval(
            Interval::new(
                REFERENCE_PITCHES[first].on_treble(),
                REFERENCE_PITCHES[second].on_treble(),
            )
            .in_scale(C_MAJOR),
        )
    }

    #[test]
    fn test_interval_back_text() {
        // c' to g'
        assert_eq!(
            interval(17, 21).back_text().unwrap(),
            "Perfect fifth (7), c -> g"
        );
    }

    #[test]
    fn test_front_text() {
        let card = interval(17, 21);
        let front = card.front_text();
        assert!(front.starts_with("<img src=\"\"ng-"));
        assert!(front.ends_with("-c_major_cu__T_gu__T.png\"\">"));
    }

    #[test]
    fn test_chord_back_text() {
        let chord = Chord {
            scale: C_MAJOR,
            pitches: [
                REFERENCE_PITCHES[21].on_treble(),
                REFERENCE_PITCHES[19].on_treble(),
                REFERENCE_PITCHES[17].on_treble(),
            ],
            root: REFERENCE_PITCHES[17].on_treble(),
            chord_type: ChordType::MajorTriad,
        };
        assert_eq!(Card::Chord(chord).back_text().unwrap(), "C maj");
        assert!(Card::Chord(chord).source().unwrap().contains("<g' e' c'>4"));
    }

    #[test]
    fn test_listing_order() {
        let mut cards = vec![interval(17, 24), interval(19, 21), interval(17, 19)];
        let g_major = Card::Interval(
            Interval::new(REFERENCE_PITCHES[3], REFERENCE_PITCHES[4]).in_scale(G_MAJOR),
        );
        cards.insert(0, g_major);
        cards.sort_by(listing_order);

        let distances: Vec<i32> = cards
            .iter()
            .map(|card| match card {
                Card::Interval(i) => i.distance(),
                Card::Chord(_) => unreachable!(),
            })
            .collect();
        // c major (no accidentals) first, g major last
        assert_eq!(distances, vec![3, 4, 12, 2]);
        assert_eq!(cards[3], g_major);
    }
}
