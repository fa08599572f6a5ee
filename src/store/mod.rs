pub mod local;
pub mod remote;

pub use local::LocalStore;
pub use remote::RemoteStore;

use async_trait::async_trait;

use crate::auth::Identity;
use crate::error::Result;
use crate::models::{CollectionEntry, Deck, DeckCard};

/// Persistence backend contract, implemented by the device-local store and
/// the identity-scoped remote store.
///
/// Every operation is best-effort from the caller's point of view: the
/// collection manager applies its in-memory update first and only then
/// dispatches the matching call here, logging (not propagating) failures.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Load all collection entries. `StorageUnavailable` when the medium
    /// cannot be read; callers treat that as empty.
    async fn load_collection(&self) -> Result<Vec<CollectionEntry>>;

    /// Load all decks. Same failure contract as [`load_collection`](Self::load_collection).
    async fn load_decks(&self) -> Result<Vec<Deck>>;

    /// Insert or update the entry for `entry.card.id`. Idempotent on the
    /// card id. The remote variant resolves the existing row before
    /// deciding (read-modify-write), so two concurrent upserts for the
    /// same card may race and under-count.
    async fn upsert_entry(&self, entry: &CollectionEntry) -> Result<()>;

    /// Remove the entry for `card_id`. Absent is a no-op, not an error.
    async fn delete_entry(&self, card_id: &str) -> Result<()>;

    /// Create a new deck row. The client-generated deck id is stored
    /// verbatim.
    async fn insert_deck(&self, deck: &Deck) -> Result<()>;

    /// Replace the full card list of a deck. Coarse-grained, not a diff.
    async fn update_deck_cards(&self, deck_id: &str, cards: &[DeckCard]) -> Result<()>;

    /// Remove a deck. Absent is a no-op.
    async fn delete_deck(&self, deck_id: &str) -> Result<()>;
}

/// Which backend a session is bound to.
///
/// Resolved once per identity-change event, never re-derived per call, so a
/// mutation issued mid-session cannot silently land on the wrong backend.
#[derive(Debug, Clone)]
pub enum BackendKind {
    /// Guest mode: device-local slots.
    Local,
    /// Authenticated: remote rows scoped to this identity.
    Remote(Identity),
}

impl BackendKind {
    /// Map the current identity to a backend choice.
    pub fn for_identity(identity: Option<&Identity>) -> Self {
        match identity {
            Some(id) => BackendKind::Remote(id.clone()),
            None => BackendKind::Local,
        }
    }
}
