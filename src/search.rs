//! Card-search collaborator client.
//!
//! Thin wrapper over a Scryfall-compatible REST API. Results are consumed
//! as immutable [`CardRecord`] snapshots; nothing here is cached or
//! refreshed after capture.

use crate::error::{BinderError, Result};
use crate::models::CardRecord;

use serde::Deserialize;

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Vec<CardRecord>,
}

/// Query interface for the hosted card-search API.
pub struct CardSearch {
    http: reqwest::Client,
    base_url: String,
}

impl CardSearch {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Full-syntax search returning every matching printing.
    ///
    /// An empty query and a "no results" (404) response both yield an empty
    /// vec; transport or server errors surface as [`BinderError::Lookup`].
    pub async fn search(&self, query: &str) -> Result<Vec<CardRecord>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        // unique=prints so each printing (set/number) comes back separately.
        let url = format!("{}/cards/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("q", query), ("unique", "prints")])
            .send()
            .await
            .map_err(|e| BinderError::Lookup(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            return Err(BinderError::Lookup(format!(
                "search returned {}",
                resp.status()
            )));
        }

        let page: SearchPage = resp
            .json()
            .await
            .map_err(|e| BinderError::Lookup(e.to_string()))?;
        Ok(page.data)
    }

    /// Look one card up by name, exactly or fuzzily. `None` when nothing
    /// matches.
    pub async fn named(&self, name: &str, fuzzy: bool) -> Result<Option<CardRecord>> {
        let url = format!("{}/cards/named", self.base_url);
        let param = if fuzzy { "fuzzy" } else { "exact" };
        let resp = self
            .http
            .get(&url)
            .query(&[(param, name)])
            .send()
            .await
            .map_err(|e| BinderError::Lookup(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(BinderError::Lookup(format!(
                "named lookup returned {}",
                resp.status()
            )));
        }

        let card: CardRecord = resp
            .json()
            .await
            .map_err(|e| BinderError::Lookup(e.to_string()))?;
        Ok(Some(card))
    }
}

/// Build an exact-printing search query from an identification hint.
///
/// `!"Name"` pins the exact name; `set:` and `cn:` qualifiers narrow the
/// match down to a single printing when the scanner could read them.
pub fn precise_query(name: &str, set_code: Option<&str>, collector_number: Option<&str>) -> String {
    let mut query = format!("!\"{}\"", name);
    if let Some(set) = set_code {
        query.push_str(&format!(" set:{}", set));
    }
    if let Some(cn) = collector_number {
        query.push_str(&format!(" cn:{}", cn));
    }
    query
}
