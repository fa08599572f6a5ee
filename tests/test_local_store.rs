//! Local JSON-slot store: round-trips, idempotent upserts, and failure
//! contracts.

mod common;

use cardbinder::error::BinderError;
use cardbinder::models::{CollectionEntry, Deck};
use cardbinder::store::CollectionStore;

use common::{deck_card, sample_card, setup_local_store};

// ---------------------------------------------------------------------------
// loads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_slots_load_empty() {
    let (store, _tmp) = setup_local_store();

    assert!(store.load_collection().await.unwrap().is_empty());
    assert!(store.load_decks().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_slot_is_storage_unavailable_and_left_in_place() {
    let (store, tmp) = setup_local_store();
    let path = tmp.path().join("collection.json");
    std::fs::write(&path, "][ definitely not json").unwrap();

    let err = store.load_collection().await.unwrap_err();
    assert!(matches!(err, BinderError::StorageUnavailable(_)));
    // The slot is not destroyed on a failed read.
    assert!(path.exists());
}

// ---------------------------------------------------------------------------
// collection round-trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collection_round_trips_content() {
    let (store, _tmp) = setup_local_store();

    let mut a = CollectionEntry::new(sample_card("bolt", "Lightning Bolt"), 1_700_000_000_000);
    a.quantity = 4;
    a.is_foil = true;
    let b = CollectionEntry::new(sample_card("counterspell", "Counterspell"), 1_700_000_000_001);

    store.upsert_entry(&a).await.unwrap();
    store.upsert_entry(&b).await.unwrap();

    let mut loaded = store.load_collection().await.unwrap();
    loaded.sort_by(|x, y| x.card.id.cmp(&y.card.id));

    assert_eq!(loaded, vec![a, b]);
}

#[tokio::test]
async fn upsert_is_idempotent_on_card_id() {
    let (store, _tmp) = setup_local_store();

    let mut entry = CollectionEntry::new(sample_card("bolt", "Lightning Bolt"), 1);
    store.upsert_entry(&entry).await.unwrap();

    entry.quantity = 3;
    entry.is_foil = true;
    store.upsert_entry(&entry).await.unwrap();

    let loaded = store.load_collection().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].quantity, 3);
    assert!(loaded[0].is_foil);
}

#[tokio::test]
async fn delete_entry_removes_only_that_card() {
    let (store, _tmp) = setup_local_store();

    store
        .upsert_entry(&CollectionEntry::new(sample_card("bolt", "Lightning Bolt"), 1))
        .await
        .unwrap();
    store
        .upsert_entry(&CollectionEntry::new(sample_card("shock", "Shock"), 2))
        .await
        .unwrap();

    store.delete_entry("bolt").await.unwrap();

    let loaded = store.load_collection().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].card.id, "shock");
}

#[tokio::test]
async fn delete_of_absent_entry_is_a_noop() {
    let (store, _tmp) = setup_local_store();

    store.delete_entry("no-such-card").await.unwrap();
    assert!(store.load_collection().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// deck slots
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decks_round_trip_content() {
    let (store, _tmp) = setup_local_store();

    let mut deck = Deck::new("deck-1".to_string(), "Burn".to_string(), 1_700_000_000_000);
    deck.cards.push(deck_card(sample_card("bolt", "Lightning Bolt"), 4));
    let other = Deck::new("deck-2".to_string(), "Control".to_string(), 1_700_000_000_001);

    store.insert_deck(&deck).await.unwrap();
    store.insert_deck(&other).await.unwrap();

    let mut loaded = store.load_decks().await.unwrap();
    loaded.sort_by(|x, y| x.id.cmp(&y.id));

    assert_eq!(loaded, vec![deck, other]);
}

#[tokio::test]
async fn update_deck_cards_replaces_the_whole_list() {
    let (store, _tmp) = setup_local_store();

    let mut deck = Deck::new("deck-1".to_string(), "Burn".to_string(), 1);
    deck.cards.push(deck_card(sample_card("bolt", "Lightning Bolt"), 4));
    store.insert_deck(&deck).await.unwrap();

    let replacement = vec![deck_card(sample_card("shock", "Shock"), 2)];
    store.update_deck_cards("deck-1", &replacement).await.unwrap();

    let loaded = store.load_decks().await.unwrap();
    assert_eq!(loaded[0].cards, replacement);
}

#[tokio::test]
async fn update_deck_cards_for_unknown_deck_is_a_noop() {
    let (store, _tmp) = setup_local_store();

    store
        .update_deck_cards("no-such-deck", &[deck_card(sample_card("bolt", "Bolt"), 1)])
        .await
        .unwrap();

    assert!(store.load_decks().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_deck_removes_the_row() {
    let (store, _tmp) = setup_local_store();

    let deck = Deck::new("deck-1".to_string(), "Burn".to_string(), 1);
    store.insert_deck(&deck).await.unwrap();
    store.delete_deck("deck-1").await.unwrap();
    store.delete_deck("deck-1").await.unwrap(); // absent: still fine

    assert!(store.load_decks().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// slot wire shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slots_use_the_camel_case_layout() {
    let (store, tmp) = setup_local_store();

    store
        .upsert_entry(&CollectionEntry::new(sample_card("bolt", "Lightning Bolt"), 42))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(tmp.path().join("collection.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(parsed[0]["addedAt"], 42);
    assert_eq!(parsed[0]["isFoil"], false);
    assert_eq!(parsed[0]["card"]["name"], "Lightning Bolt");
}
