//! Client-side phrase board.
//!
//! The board is the page session's copy of the phrase list. It is filled from a
//! full list fetch and thrown away on the next one; rendering is a pure
//! projection over it and never writes back.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::Phrase;

/// The phrases currently held by one page session.
#[derive(Debug, Clone, Default)]
pub struct PhraseBoard {
    phrases: Vec<Phrase>,
}

impl PhraseBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list with a fresh fetch result.
    pub fn replace(&mut self, phrases: Vec<Phrase>) {
        self.phrases = phrases;
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Looks up a phrase by id, e.g. to prefill an edit form.
    pub fn get(&self, id: i64) -> Option<&Phrase> {
        self.phrases.iter().find(|p| p.id == id)
    }
}

/// One visual card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseCard {
    /// Position among the displayed cards; drives the staggered fade-in.
    pub position: usize,
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Result of rendering the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cards", rename_all = "snake_case")]
pub enum View {
    Cards(Vec<PhraseCard>),
    /// Nothing stored, or nothing matched the filter.
    Empty,
}

impl View {
    pub fn cards(&self) -> &[PhraseCard] {
        match self {
            View::Cards(cards) => cards,
            View::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, View::Empty)
    }
}

/// Case-insensitive substring match on title or content.
pub fn matches_filter(phrase: &Phrase, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    phrase.title.to_lowercase().contains(&needle)
        || phrase.content.to_lowercase().contains(&needle)
}

/// Projects the board through `filter`, keeping the stored order.
pub fn render(board: &PhraseBoard, filter: &str) -> View {
    let cards: Vec<PhraseCard> = board
        .phrases()
        .iter()
        .filter(|p| matches_filter(p, filter))
        .enumerate()
        .map(|(position, p)| PhraseCard {
            position,
            id: p.id,
            title: p.title.clone(),
            content: p.content.clone(),
        })
        .collect();

    if cards.is_empty() {
        View::Empty
    } else {
        View::Cards(cards)
    }
}

/// Display order: newest first, higher id first on equal timestamps.
pub fn newest_first(a: &Phrase, b: &Phrase) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Sorts phrases into display order.
pub fn sort_newest_first(phrases: &mut [Phrase]) {
    phrases.sort_by(newest_first);
}
