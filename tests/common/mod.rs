//! Shared fixtures for the cardbinder integration tests.
//!
//! Provides card factories, a temp-dir backed local store, and an
//! always-failing store stub for exercising the optimistic-update
//! guarantees.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use cardbinder::error::{BinderError, Result};
use cardbinder::models::{CardRecord, CollectionEntry, Deck, DeckCard, PriceSnapshot};
use cardbinder::store::{CollectionStore, LocalStore};

/// A minimal but fully-populated card record.
pub fn sample_card(id: &str, name: &str) -> CardRecord {
    CardRecord {
        id: id.to_string(),
        name: name.to_string(),
        printed_name: None,
        lang: Some("en".to_string()),
        set_name: "Masters 25".to_string(),
        set_code: Some("a25".to_string()),
        collector_number: "141".to_string(),
        rarity: "uncommon".to_string(),
        cmc: 1.0,
        type_line: "Instant".to_string(),
        mana_cost: Some("{R}".to_string()),
        colors: vec!["R".to_string()],
        prices: PriceSnapshot {
            usd: Some("1.50".to_string()),
            usd_foil: Some("9.99".to_string()),
            eur: None,
            eur_foil: None,
        },
        image_uris: None,
    }
}

/// Card with a specific mana value and type line, for analytics tests.
pub fn card_with(id: &str, name: &str, cmc: f64, type_line: &str) -> CardRecord {
    let mut card = sample_card(id, name);
    card.cmc = cmc;
    card.type_line = type_line.to_string();
    card
}

/// Card with specific USD price points (`None` clears the sample default).
pub fn priced_card(id: &str, name: &str, usd: Option<&str>, usd_foil: Option<&str>) -> CardRecord {
    let mut card = sample_card(id, name);
    card.prices = PriceSnapshot {
        usd: usd.map(str::to_string),
        usd_foil: usd_foil.map(str::to_string),
        eur: None,
        eur_foil: None,
    };
    card
}

pub fn deck_card(card: CardRecord, quantity: u32) -> DeckCard {
    DeckCard { card, quantity }
}

/// Local store rooted in a fresh temp dir. Keep the `TempDir` alive for the
/// duration of the test.
pub fn setup_local_store() -> (Arc<LocalStore>, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::open(Some(tmp.path().to_path_buf())).unwrap();
    (Arc::new(store), tmp)
}

/// Backend stub whose every operation fails with `StorageUnavailable`.
pub struct FailingStore;

fn unavailable() -> BinderError {
    BinderError::StorageUnavailable("stub backend is down".to_string())
}

#[async_trait]
impl CollectionStore for FailingStore {
    async fn load_collection(&self) -> Result<Vec<CollectionEntry>> {
        Err(unavailable())
    }

    async fn load_decks(&self) -> Result<Vec<Deck>> {
        Err(unavailable())
    }

    async fn upsert_entry(&self, _entry: &CollectionEntry) -> Result<()> {
        Err(unavailable())
    }

    async fn delete_entry(&self, _card_id: &str) -> Result<()> {
        Err(unavailable())
    }

    async fn insert_deck(&self, _deck: &Deck) -> Result<()> {
        Err(unavailable())
    }

    async fn update_deck_cards(&self, _deck_id: &str, _cards: &[DeckCard]) -> Result<()> {
        Err(unavailable())
    }

    async fn delete_deck(&self, _deck_id: &str) -> Result<()> {
        Err(unavailable())
    }
}
