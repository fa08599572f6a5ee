//! Device-local persistence: two named JSON slots on disk.
//!
//! Mirrors the guest-mode storage layout — one slot holds the serialized
//! collection, one the serialized deck set. Writes rewrite the whole slot
//! through a temp file and rename, so an interrupted write never leaves a
//! corrupt slot behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config;
use crate::error::{BinderError, Result};
use crate::models::{CollectionEntry, Deck, DeckCard};
use crate::store::CollectionStore;

/// JSON-slot store rooted at a data directory.
///
/// Operations are synchronous file I/O behind a mutex; on a device they are
/// effectively instantaneous, which is what makes guest mode immune to the
/// remote store's read-modify-write race.
pub struct LocalStore {
    data_dir: PathBuf,
    // Serializes slot read-modify-write cycles.
    lock: Mutex<()>,
}

impl LocalStore {
    /// Open (creating if needed) a store at `data_dir`, or the platform
    /// default directory when `None`.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            data_dir: dir,
            lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.data_dir.join(slot)
    }

    /// Read and parse one slot. A missing slot is empty; an unreadable or
    /// corrupt slot is `StorageUnavailable` (the file is left in place).
    fn read_slot<T: DeserializeOwned>(&self, slot: &str) -> Result<Vec<T>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| BinderError::StorageUnavailable(format!("{}: {}", slot, e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| BinderError::StorageUnavailable(format!("{}: {}", slot, e)))
    }

    /// Serialize `items` and replace the slot atomically (temp + rename).
    fn write_slot<T: Serialize>(&self, slot: &str, items: &[T]) -> Result<()> {
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(items)
            .map_err(|e| BinderError::StorageUnavailable(format!("{}: {}", slot, e)))?;

        let result = fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| BinderError::StorageUnavailable(format!("{}: {}", slot, e)));

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

#[async_trait]
impl CollectionStore for LocalStore {
    async fn load_collection(&self) -> Result<Vec<CollectionEntry>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_slot(config::COLLECTION_SLOT)
    }

    async fn load_decks(&self) -> Result<Vec<Deck>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_slot(config::DECKS_SLOT)
    }

    async fn upsert_entry(&self, entry: &CollectionEntry) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries: Vec<CollectionEntry> = self.read_slot(config::COLLECTION_SLOT)?;
        match entries.iter_mut().find(|e| e.card.id == entry.card.id) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }
        self.write_slot(config::COLLECTION_SLOT, &entries)
    }

    async fn delete_entry(&self, card_id: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries: Vec<CollectionEntry> = self.read_slot(config::COLLECTION_SLOT)?;
        let before = entries.len();
        entries.retain(|e| e.card.id != card_id);
        if entries.len() == before {
            return Ok(());
        }
        self.write_slot(config::COLLECTION_SLOT, &entries)
    }

    async fn insert_deck(&self, deck: &Deck) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut decks: Vec<Deck> = self.read_slot(config::DECKS_SLOT)?;
        match decks.iter_mut().find(|d| d.id == deck.id) {
            Some(existing) => *existing = deck.clone(),
            None => decks.push(deck.clone()),
        }
        self.write_slot(config::DECKS_SLOT, &decks)
    }

    async fn update_deck_cards(&self, deck_id: &str, cards: &[DeckCard]) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut decks: Vec<Deck> = self.read_slot(config::DECKS_SLOT)?;
        if let Some(deck) = decks.iter_mut().find(|d| d.id == deck_id) {
            deck.cards = cards.to_vec();
            self.write_slot(config::DECKS_SLOT, &decks)
        } else {
            Ok(())
        }
    }

    async fn delete_deck(&self, deck_id: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut decks: Vec<Deck> = self.read_slot(config::DECKS_SLOT)?;
        let before = decks.len();
        decks.retain(|d| d.id != deck_id);
        if decks.len() == before {
            return Ok(());
        }
        self.write_slot(config::DECKS_SLOT, &decks)
    }
}
