//! Hosted row-store backend, scoped to one identity.
//!
//! Speaks the hosted database's REST dialect: one `collection` table keyed
//! by (user id, card id) and one `decks` table keyed by deck id. Every
//! request filters on the bound identity's user id; the store's own row
//! policy is the real enforcement — this client never sees other users'
//! rows.

use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::config;
use crate::error::{BinderError, Result};
use crate::models::{CardRecord, CollectionEntry, Deck, DeckCard};
use crate::store::CollectionStore;

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Row shapes (snake_case table columns)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct CollectionRow {
    user_id: String,
    card_id: String,
    quantity: u32,
    is_foil: bool,
    added_at: i64,
    card: CardRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct DeckRow {
    id: String,
    user_id: String,
    name: String,
    cards: Vec<DeckCard>,
    created_at: i64,
}

impl From<CollectionRow> for CollectionEntry {
    fn from(row: CollectionRow) -> Self {
        Self {
            card: row.card,
            quantity: row.quantity,
            is_foil: row.is_foil,
            added_at: row.added_at,
        }
    }
}

impl From<DeckRow> for Deck {
    fn from(row: DeckRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cards: row.cards,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteStore
// ---------------------------------------------------------------------------

/// Remote backend bound to one identity for its whole lifetime. A new
/// identity means a new `RemoteStore`, selected at the identity-change
/// event — never re-derived per call.
pub struct RemoteStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    identity: Identity,
}

impl RemoteStore {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        identity: Identity,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            identity,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach the auth headers every row request needs.
    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.identity.access_token)
    }

    fn unavailable(e: impl std::fmt::Display) -> BinderError {
        BinderError::StorageUnavailable(e.to_string())
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        filter: &str,
    ) -> Result<Vec<T>> {
        let url = format!("{}?{}&select=*", self.table_url(table), filter);
        let resp = self
            .authed(self.http.get(&url))
            .send()
            .await
            .map_err(Self::unavailable)?
            .error_for_status()
            .map_err(Self::unavailable)?;
        resp.json().await.map_err(Self::unavailable)
    }
}

#[async_trait]
impl CollectionStore for RemoteStore {
    async fn load_collection(&self) -> Result<Vec<CollectionEntry>> {
        let filter = format!("user_id=eq.{}", self.identity.user_id);
        let rows: Vec<CollectionRow> = self.fetch_rows(config::COLLECTION_TABLE, &filter).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn load_decks(&self) -> Result<Vec<Deck>> {
        let filter = format!("user_id=eq.{}", self.identity.user_id);
        let rows: Vec<DeckRow> = self.fetch_rows(config::DECKS_TABLE, &filter).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_entry(&self, entry: &CollectionEntry) -> Result<()> {
        // Read-modify-write: the table has no atomic increment, so the
        // existing row decides between PATCH and POST. Two in-flight
        // upserts for the same card can race and under-count.
        let filter = format!(
            "user_id=eq.{}&card_id=eq.{}",
            self.identity.user_id, entry.card.id
        );
        let existing: Vec<CollectionRow> = self.fetch_rows(config::COLLECTION_TABLE, &filter).await?;

        if existing.is_empty() {
            let row = CollectionRow {
                user_id: self.identity.user_id.clone(),
                card_id: entry.card.id.clone(),
                quantity: entry.quantity,
                is_foil: entry.is_foil,
                added_at: entry.added_at,
                card: entry.card.clone(),
            };
            self.authed(self.http.post(self.table_url(config::COLLECTION_TABLE)))
                .header("Prefer", "return=minimal")
                .json(&row)
                .send()
                .await
                .map_err(Self::unavailable)?
                .error_for_status()
                .map_err(Self::unavailable)?;
        } else {
            let url = format!("{}?{}", self.table_url(config::COLLECTION_TABLE), filter);
            self.authed(self.http.patch(&url))
                .json(&serde_json::json!({
                    "quantity": entry.quantity,
                    "is_foil": entry.is_foil,
                }))
                .send()
                .await
                .map_err(Self::unavailable)?
                .error_for_status()
                .map_err(Self::unavailable)?;
        }
        Ok(())
    }

    async fn delete_entry(&self, card_id: &str) -> Result<()> {
        // Deleting a missing row matches zero rows, which is the wanted
        // no-op behavior.
        let url = format!(
            "{}?user_id=eq.{}&card_id=eq.{}",
            self.table_url(config::COLLECTION_TABLE),
            self.identity.user_id,
            card_id
        );
        self.authed(self.http.delete(&url))
            .send()
            .await
            .map_err(Self::unavailable)?
            .error_for_status()
            .map_err(Self::unavailable)?;
        Ok(())
    }

    async fn insert_deck(&self, deck: &Deck) -> Result<()> {
        let row = DeckRow {
            id: deck.id.clone(),
            user_id: self.identity.user_id.clone(),
            name: deck.name.clone(),
            cards: deck.cards.clone(),
            created_at: deck.created_at,
        };
        self.authed(self.http.post(self.table_url(config::DECKS_TABLE)))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(Self::unavailable)?
            .error_for_status()
            .map_err(Self::unavailable)?;
        Ok(())
    }

    async fn update_deck_cards(&self, deck_id: &str, cards: &[DeckCard]) -> Result<()> {
        let url = format!(
            "{}?id=eq.{}&user_id=eq.{}",
            self.table_url(config::DECKS_TABLE),
            deck_id,
            self.identity.user_id
        );
        self.authed(self.http.patch(&url))
            .json(&serde_json::json!({ "cards": cards }))
            .send()
            .await
            .map_err(Self::unavailable)?
            .error_for_status()
            .map_err(Self::unavailable)?;
        Ok(())
    }

    async fn delete_deck(&self, deck_id: &str) -> Result<()> {
        let url = format!(
            "{}?id=eq.{}&user_id=eq.{}",
            self.table_url(config::DECKS_TABLE),
            deck_id,
            self.identity.user_id
        );
        self.authed(self.http.delete(&url))
            .send()
            .await
            .map_err(Self::unavailable)?
            .error_for_status()
            .map_err(Self::unavailable)?;
        Ok(())
    }
}
