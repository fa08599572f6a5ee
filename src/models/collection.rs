use serde::{Deserialize, Serialize};

use crate::models::card::CardRecord;

// ---------------------------------------------------------------------------
// CollectionEntry — one owned card
// ---------------------------------------------------------------------------

/// Bookkeeping record for one owned card.
///
/// The card snapshot is embedded by value, not referenced. `quantity` is
/// always >= 1 — removal below 1 deletes the entry instead. `added_at` is
/// set once at creation (epoch milliseconds) and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    pub card: CardRecord,
    pub quantity: u32,
    #[serde(default)]
    pub is_foil: bool,
    pub added_at: i64,
}

impl CollectionEntry {
    pub fn new(card: CardRecord, added_at: i64) -> Self {
        Self {
            card,
            quantity: 1,
            is_foil: false,
            added_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

/// A named, user-curated multiset of cards.
///
/// `id` is generated client-side (UUID v4) and is authoritative — backends
/// store it verbatim. Each card id appears in `cards` at most once; repeat
/// adds accumulate quantity on the existing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<DeckCard>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    pub card: CardRecord,
    pub quantity: u32,
}

impl Deck {
    pub fn new(id: String, name: String, created_at: i64) -> Self {
        Self {
            id,
            name,
            cards: Vec::new(),
            created_at,
        }
    }

    /// Total number of cards, counting quantities.
    pub fn total_cards(&self) -> u32 {
        self.cards.iter().map(|c| c.quantity).sum()
    }

    /// Quantity of one card in this deck, 0 when absent.
    pub fn card_quantity(&self, card_id: &str) -> u32 {
        self.cards
            .iter()
            .find(|c| c.card.id == card_id)
            .map(|c| c.quantity)
            .unwrap_or(0)
    }

    /// Plain-text deck list, one `<quantity> <name>` line per card.
    pub fn export_text(&self) -> String {
        self.cards
            .iter()
            .map(|c| format!("{} {}", c.quantity, c.card.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
