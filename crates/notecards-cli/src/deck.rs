//! Deck (CSV) and HTML listing writers.
//!
//! The deck is a semicolon-separated file importable as flashcards: one
//! `"front";"back"` line per card, sorted so reruns produce identical files.

use std::path::Path;

use notecards_theory::TheoryResult;

use crate::card::{listing_order, Card};

/// One deck line: `"<img src=""stem.png"">";"back"`.
pub fn deck_line(card: &Card) -> TheoryResult<String> {
    Ok(format!(
        "\"{}\";\"{}\"",
        card.front_text(),
        card.back_text()?.replace('"', "\"\"")
    ))
}

/// The whole deck: lines sorted lexicographically, joined by newlines.
pub fn build_deck(cards: &[Card]) -> TheoryResult<String> {
    let mut lines = cards.iter().map(deck_line).collect::<TheoryResult<Vec<_>>>()?;
    lines.sort();
    Ok(lines.join("\n"))
}

/// An HTML page listing every card image next to its back text.
///
/// `image_dir` is the image directory as referenced from the page.
pub fn build_html(cards: &[Card], image_dir: &Path) -> TheoryResult<String> {
    let mut sorted = cards.to_vec();
    sorted.sort_by(listing_order);

    let image_dir = image_dir.to_string_lossy().replace('\\', "/");
    let mut rows = Vec::with_capacity(sorted.len());
    for card in &sorted {
        rows.push(format!(
            r#"<div><img style="vertical-align:middle" src="{}/{}" width="150"><span style="margin-left: 30pt;">{}</span></div><br><hr>"#,
            image_dir.trim_end_matches('/'),
            card.image_file_name(),
            card.back_text()?
        ));
    }

    Ok(format!(
        "<html>\n<body>\n{}\n</body>\n</html>\n",
        rows.join("\n")
    ))
}
