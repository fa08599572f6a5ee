//! Collection state manager — the single owner of in-memory collection and
//! deck state.
//!
//! Every mutation applies to memory first, so the UI always sees the
//! intended result immediately, then dispatches the matching backend call
//! as a detached task. Backend failures are logged and never roll the
//! optimistic update back; durability lags until the next successful write.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::{CardRecord, CollectionEntry, Deck, DeckCard};
use crate::store::CollectionStore;

/// Current time as epoch milliseconds.
fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Owns the in-memory collection and deck set for one session (guest or
/// authenticated) and keeps the active backend trailing behind it.
///
/// Mutations are synchronous against memory; persistence happens on
/// detached tasks, so callers must be running inside a Tokio runtime.
/// Writes for the same entity are issued in call order but their network
/// round-trips may complete out of order — an accepted property of the
/// remote backend's read-modify-write upsert.
pub struct CollectionManager {
    collection: HashMap<String, CollectionEntry>,
    decks: HashMap<String, Deck>,
    store: Arc<dyn CollectionStore>,
    pending: Vec<JoinHandle<()>>,
}

impl CollectionManager {
    /// Create an empty manager bound to `store`. Call
    /// [`initialize`](Self::initialize) to load durable state.
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            collection: HashMap::new(),
            decks: HashMap::new(),
            store,
            pending: Vec::new(),
        }
    }

    // -- Session lifecycle -------------------------------------------------

    /// Bind to the backend selected for a (possibly new) identity and
    /// reload from it.
    ///
    /// This is a full replace, never a merge: switching from guest to an
    /// account discards unsynced guest state. An unreadable backend logs
    /// and starts empty. In-flight writes from the previous session are
    /// not cancelled; a late write can still land on the old backend.
    pub async fn initialize(&mut self, store: Arc<dyn CollectionStore>) {
        self.store = store;
        self.collection.clear();
        self.decks.clear();

        match self.store.load_collection().await {
            Ok(entries) => {
                self.collection = entries
                    .into_iter()
                    .map(|e| (e.card.id.clone(), e))
                    .collect();
            }
            Err(e) => tracing::warn!(error = %e, "collection unreadable, starting empty"),
        }

        match self.store.load_decks().await {
            Ok(decks) => {
                self.decks = decks.into_iter().map(|d| (d.id.clone(), d)).collect();
            }
            Err(e) => tracing::warn!(error = %e, "decks unreadable, starting empty"),
        }
    }

    /// Await all in-flight persistence tasks. Useful at shutdown and in
    /// tests; failures have already been logged by the tasks themselves.
    pub async fn flush(&mut self) {
        for handle in self.pending.drain(..) {
            let _ = handle.await;
        }
    }

    // -- Collection mutations ----------------------------------------------

    /// Add one copy of `card`. A repeat add increments the existing entry's
    /// quantity and leaves every other field (including `added_at`) alone;
    /// a first add creates a quantity-1 non-foil entry stamped now.
    pub fn add_card(&mut self, card: CardRecord) {
        let entry = match self.collection.entry(card.id.clone()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.quantity += 1;
                entry.clone()
            }
            Entry::Vacant(vacant) => vacant
                .insert(CollectionEntry::new(card, now_millis()))
                .clone(),
        };

        let store = Arc::clone(&self.store);
        self.spawn_write("upsert_entry", async move { store.upsert_entry(&entry).await });
    }

    /// Remove one copy. The entry is deleted when its quantity would reach
    /// zero. Unknown card ids are a no-op.
    pub fn remove_card(&mut self, card_id: &str) {
        let Some(entry) = self.collection.get_mut(card_id) else {
            return;
        };

        if entry.quantity > 1 {
            entry.quantity -= 1;
            let entry = entry.clone();
            let store = Arc::clone(&self.store);
            self.spawn_write("upsert_entry", async move { store.upsert_entry(&entry).await });
        } else {
            self.collection.remove(card_id);
            let card_id = card_id.to_string();
            let store = Arc::clone(&self.store);
            self.spawn_write("delete_entry", async move { store.delete_entry(&card_id).await });
        }
    }

    /// Flip the foil flag on an entry. Unknown card ids are a no-op.
    pub fn toggle_foil(&mut self, card_id: &str) {
        let Some(entry) = self.collection.get_mut(card_id) else {
            return;
        };
        entry.is_foil = !entry.is_foil;

        let entry = entry.clone();
        let store = Arc::clone(&self.store);
        self.spawn_write("upsert_entry", async move { store.upsert_entry(&entry).await });
    }

    // -- Deck mutations ----------------------------------------------------

    /// Create a new empty deck and return its id. Empty or whitespace-only
    /// names are rejected with `None`.
    pub fn create_deck(&mut self, name: &str) -> Option<String> {
        if name.trim().is_empty() {
            return None;
        }

        let deck = Deck::new(Uuid::new_v4().to_string(), name.to_string(), now_millis());
        let id = deck.id.clone();
        self.decks.insert(id.clone(), deck.clone());

        let store = Arc::clone(&self.store);
        self.spawn_write("insert_deck", async move { store.insert_deck(&deck).await });
        Some(id)
    }

    /// Add `quantity` copies of `card` to a deck, accumulating on an
    /// existing element. Unknown deck ids and zero quantities are no-ops.
    /// The core places no upper bound on deck quantities.
    pub fn add_card_to_deck(&mut self, deck_id: &str, card: CardRecord, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let Some(deck) = self.decks.get_mut(deck_id) else {
            return;
        };

        match deck.cards.iter_mut().find(|c| c.card.id == card.id) {
            Some(existing) => existing.quantity += quantity,
            None => deck.cards.push(DeckCard { card, quantity }),
        }

        self.persist_deck_cards(deck_id);
    }

    /// Drop a card from a deck entirely. Unknown deck or card ids are
    /// no-ops.
    pub fn remove_card_from_deck(&mut self, deck_id: &str, card_id: &str) {
        let Some(deck) = self.decks.get_mut(deck_id) else {
            return;
        };
        let before = deck.cards.len();
        deck.cards.retain(|c| c.card.id != card_id);
        if deck.cards.len() == before {
            return;
        }

        self.persist_deck_cards(deck_id);
    }

    /// Delete a deck. Unknown deck ids are a no-op.
    pub fn delete_deck(&mut self, deck_id: &str) {
        if self.decks.remove(deck_id).is_none() {
            return;
        }

        let deck_id = deck_id.to_string();
        let store = Arc::clone(&self.store);
        self.spawn_write("delete_deck", async move { store.delete_deck(&deck_id).await });
    }

    // -- Read model ----------------------------------------------------------

    pub fn collection(&self) -> impl Iterator<Item = &CollectionEntry> + '_ {
        self.collection.values()
    }

    pub fn entry(&self, card_id: &str) -> Option<&CollectionEntry> {
        self.collection.get(card_id)
    }

    pub fn decks(&self) -> impl Iterator<Item = &Deck> + '_ {
        self.decks.values()
    }

    pub fn deck(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.get(deck_id)
    }

    /// Total owned cards, counting quantities.
    pub fn total_cards(&self) -> u32 {
        self.collection.values().map(|e| e.quantity).sum()
    }

    /// Number of distinct owned cards.
    pub fn unique_cards(&self) -> usize {
        self.collection.len()
    }

    // -- Internals -----------------------------------------------------------

    /// Replace a deck's persisted card list with the in-memory one.
    fn persist_deck_cards(&mut self, deck_id: &str) {
        // Caller has already mutated the deck; missing ids were rejected there.
        let Some(deck) = self.decks.get(deck_id) else {
            return;
        };
        let cards = deck.cards.clone();
        let deck_id = deck_id.to_string();
        let store = Arc::clone(&self.store);
        self.spawn_write("update_deck_cards", async move {
            store.update_deck_cards(&deck_id, &cards).await
        });
    }

    /// Run one backend write as a detached task, logging any failure.
    fn spawn_write<F>(&mut self, op: &'static str, fut: F)
    where
        F: Future<Output = crate::error::Result<()>> + Send + 'static,
    {
        self.pending.retain(|h| !h.is_finished());
        self.pending.push(tokio::spawn(async move {
            if let Err(e) = fut.await {
                tracing::warn!(op, error = %e, "backend write failed; durable state is behind");
            }
        }));
    }
}
