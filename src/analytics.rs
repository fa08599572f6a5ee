//! Pure read-model analytics: deck charts, collection value, and
//! filter/sort views. No I/O and no mutation — everything here derives from
//! snapshots the manager already owns.

use std::collections::HashMap;

use crate::models::{CollectionEntry, DeckCard};

/// Main card types in distribution priority order: a multi-typed line
/// counts as the first match (an Artifact Creature is a Creature).
const MAIN_TYPES: [&str; 8] = [
    "Creature",
    "Land",
    "Instant",
    "Sorcery",
    "Planeswalker",
    "Enchantment",
    "Artifact",
    "Battle",
];

// ---------------------------------------------------------------------------
// Deck charts
// ---------------------------------------------------------------------------

/// Mana-curve histogram, quantity-weighted: buckets for converted costs
/// 0 through 6, with everything 7 and up in the last bucket.
pub fn mana_curve(cards: &[DeckCard]) -> [u32; 8] {
    let mut buckets = [0u32; 8];
    for item in cards {
        let cmc = item.card.cmc.max(0.0);
        let index = (cmc.floor() as usize).min(7);
        buckets[index] += item.quantity;
    }
    buckets
}

/// Quantity-weighted counts per main card type, sorted by count descending
/// (name ascending on ties, so the order is stable).
pub fn type_distribution(cards: &[DeckCard]) -> Vec<(String, u32)> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for item in cards {
        let main = MAIN_TYPES
            .iter()
            .find(|t| item.card.type_line.contains(**t))
            .copied()
            .unwrap_or("Other");
        *counts.entry(main).or_insert(0) += item.quantity;
    }

    let mut sorted: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(t, n)| (t.to_string(), n))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

// ---------------------------------------------------------------------------
// Collection stats
// ---------------------------------------------------------------------------

/// Total USD value of the given entries. Foil entries use the foil price
/// point; missing or unparsable prices count as zero.
pub fn collection_value<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a CollectionEntry>,
{
    entries
        .into_iter()
        .map(|e| e.card.usd_price(e.is_foil).unwrap_or(0.0) * e.quantity as f64)
        .sum()
}

// ---------------------------------------------------------------------------
// CollectionFilter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Highest regular USD price first.
    #[default]
    PriceDesc,
    PriceAsc,
    NameAsc,
}

/// Filter and sort parameters for collection views.
///
/// All filters are optional; `None` (or an empty color list) skips the
/// corresponding condition.
#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    /// Case-insensitive substring over name, printed name, set name, and
    /// type line.
    pub text: Option<String>,
    /// Exact set-name match.
    pub set_name: Option<String>,
    /// Exact rarity match.
    pub rarity: Option<String>,
    /// Keep cards sharing at least one of these colors. Colorless cards
    /// never match a non-empty color filter.
    pub colors: Vec<String>,
    pub sort: SortOrder,
}

impl CollectionFilter {
    /// Apply the filter to a set of entries, returning matches in sorted
    /// order.
    pub fn apply<'a, I>(&self, entries: I) -> Vec<&'a CollectionEntry>
    where
        I: IntoIterator<Item = &'a CollectionEntry>,
    {
        let mut result: Vec<&CollectionEntry> = entries
            .into_iter()
            .filter(|e| self.matches(e))
            .collect();

        match self.sort {
            SortOrder::NameAsc => {
                result.sort_by(|a, b| {
                    a.card
                        .display_name()
                        .to_lowercase()
                        .cmp(&b.card.display_name().to_lowercase())
                });
            }
            SortOrder::PriceDesc => {
                result.sort_by(|a, b| {
                    let pa = a.card.usd_price(false).unwrap_or(0.0);
                    let pb = b.card.usd_price(false).unwrap_or(0.0);
                    pb.total_cmp(&pa)
                });
            }
            SortOrder::PriceAsc => {
                result.sort_by(|a, b| {
                    let pa = a.card.usd_price(false).unwrap_or(0.0);
                    let pb = b.card.usd_price(false).unwrap_or(0.0);
                    pa.total_cmp(&pb)
                });
            }
        }

        result
    }

    fn matches(&self, entry: &CollectionEntry) -> bool {
        let card = &entry.card;

        if let Some(term) = &self.text {
            let term = term.to_lowercase();
            let hit = card.name.to_lowercase().contains(&term)
                || card
                    .printed_name
                    .as_ref()
                    .map(|n| n.to_lowercase().contains(&term))
                    .unwrap_or(false)
                || card.set_name.to_lowercase().contains(&term)
                || card.type_line.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(set) = &self.set_name {
            if &card.set_name != set {
                return false;
            }
        }

        if let Some(rarity) = &self.rarity {
            if &card.rarity != rarity {
                return false;
            }
        }

        if !self.colors.is_empty() && !self.colors.iter().any(|c| card.colors.contains(c)) {
            return false;
        }

        true
    }
}
