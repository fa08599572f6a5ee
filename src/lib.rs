//! Cardbinder — personal card-collection tracker core.
//!
//! Tracks owned Magic: The Gathering cards and decks. Cards come in through
//! a hosted search API or a generative-vision scan; owned copies live in an
//! in-memory collection that is persisted to one of two interchangeable
//! backends — device-local JSON slots in guest mode, an identity-scoped
//! hosted row store when signed in. All mutations are optimistic: memory
//! updates first, persistence trails best-effort.
//!
//! # Quick start
//!
//! ```no_run
//! use cardbinder::Cardbinder;
//!
//! #[tokio::main]
//! async fn main() -> cardbinder::Result<()> {
//!     let mut binder = Cardbinder::builder().build()?;
//!     binder.init().await;
//!
//!     // Look a card up and add a copy to the collection
//!     let cards = binder.search("Lightning Bolt").await?;
//!     if let Some(card) = cards.into_iter().next() {
//!         binder.manager_mut().add_card(card);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod search;
pub mod store;
pub mod vision;

pub use analytics::{CollectionFilter, SortOrder};
pub use auth::{AuthClient, Identity};
pub use error::{BinderError, Result};
pub use manager::CollectionManager;
pub use models::{CardRecord, CollectionEntry, Deck, DeckCard, ImageUris, PriceSnapshot};
pub use search::{precise_query, CardSearch};
pub use store::{BackendKind, CollectionStore, LocalStore, RemoteStore};
pub use vision::{CardHint, CardVision, Identification};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CardbinderBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Cardbinder`] instance.
///
/// Use [`Cardbinder::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CardbinderBuilder::build).
pub struct CardbinderBuilder {
    data_dir: Option<PathBuf>,
    search_base: String,
    vision_base: String,
    vision_api_key: Option<String>,
    sync_base: Option<String>,
    sync_api_key: Option<String>,
    timeout: Duration,
}

impl Default for CardbinderBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            search_base: config::SEARCH_API_BASE.to_string(),
            vision_base: config::VISION_API_BASE.to_string(),
            vision_api_key: None,
            sync_base: None,
            sync_api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl CardbinderBuilder {
    /// Set a custom directory for the guest-mode JSON slots.
    ///
    /// Defaults to the platform data directory (e.g. `~/.local/share/cardbinder`
    /// on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Override the card-search API base URL.
    pub fn search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_base = url.into();
        self
    }

    /// Configure the vision model used for card scanning. Without a key,
    /// [`Cardbinder::identify`] is unavailable.
    pub fn vision_api_key(mut self, key: impl Into<String>) -> Self {
        self.vision_api_key = Some(key.into());
        self
    }

    /// Override the vision API base URL.
    pub fn vision_base_url(mut self, url: impl Into<String>) -> Self {
        self.vision_base = url.into();
        self
    }

    /// Configure cloud sync: the hosted store's project URL and publishable
    /// API key. Without this, the client is local-only and sign-in is
    /// unavailable.
    pub fn sync(mut self, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.sync_base = Some(base_url.into());
        self.sync_api_key = Some(api_key.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client. Opens (creating if needed) the local store; does
    /// not load any state — call [`Cardbinder::init`] for that.
    pub fn build(self) -> Result<Cardbinder> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        let local = Arc::new(LocalStore::open(self.data_dir)?);
        let manager = CollectionManager::new(local.clone());

        let search = CardSearch::new(http.clone(), self.search_base);
        let vision = self
            .vision_api_key
            .map(|key| CardVision::new(http.clone(), self.vision_base, key));

        let sync = match (self.sync_base, self.sync_api_key) {
            (Some(base), Some(key)) => Some(SyncConfig {
                auth: AuthClient::new(http.clone(), base.clone(), key.clone()),
                base_url: base,
                api_key: key,
            }),
            _ => None,
        };

        Ok(Cardbinder {
            http,
            search,
            vision,
            sync,
            local,
            manager,
        })
    }
}

struct SyncConfig {
    base_url: String,
    api_key: String,
    auth: AuthClient,
}

// ---------------------------------------------------------------------------
// Cardbinder
// ---------------------------------------------------------------------------

/// The main entry point: owns the collaborator clients, the persistence
/// backends, and the collection state manager.
pub struct Cardbinder {
    http: reqwest::Client,
    search: CardSearch,
    vision: Option<CardVision>,
    sync: Option<SyncConfig>,
    local: Arc<LocalStore>,
    manager: CollectionManager,
}

impl Cardbinder {
    /// Create a new builder for configuring the client.
    pub fn builder() -> CardbinderBuilder {
        CardbinderBuilder::default()
    }

    /// Load state from the backend matching the current identity. Call once
    /// after [`build()`](CardbinderBuilder::build); called again internally
    /// on every sign-in/out.
    pub async fn init(&mut self) {
        let store = self.select_store();
        self.manager.initialize(store).await;
    }

    // -- Card lookup -------------------------------------------------------

    /// Search the card API with full query syntax.
    pub async fn search(&self, query: &str) -> Result<Vec<CardRecord>> {
        self.search.search(query).await
    }

    /// Look one card up by name.
    pub async fn named(&self, name: &str, fuzzy: bool) -> Result<Option<CardRecord>> {
        self.search.named(name, fuzzy).await
    }

    /// Identify the card in a JPEG photo via the vision model.
    pub async fn identify(&self, image_jpeg: &[u8]) -> Result<Identification> {
        match &self.vision {
            Some(vision) => vision.identify(image_jpeg).await,
            None => Err(BinderError::InvalidArgument(
                "vision API key not configured".to_string(),
            )),
        }
    }

    /// Identify a card photo and resolve it against the search API in one
    /// step: the scan flow. `Ok(vec![])` when the photo had no card or the
    /// hint matched nothing.
    pub async fn scan(&self, image_jpeg: &[u8]) -> Result<Vec<CardRecord>> {
        match self.identify(image_jpeg).await? {
            Identification::NoCard => Ok(Vec::new()),
            Identification::Card(hint) => {
                let query = precise_query(
                    &hint.name,
                    hint.set_code.as_deref(),
                    hint.collector_number.as_deref(),
                );
                self.search.search(&query).await
            }
        }
    }

    // -- Session -----------------------------------------------------------

    /// Sign in and switch the session to the identity's remote backend.
    /// The in-memory state is fully replaced by the remote rows — guest
    /// data does not migrate.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Identity> {
        let identity = match self.sync.as_mut() {
            Some(sync) => sync.auth.sign_in(email, password).await?,
            None => {
                return Err(BinderError::InvalidArgument(
                    "cloud sync is not configured".to_string(),
                ))
            }
        };
        self.init().await;
        Ok(identity)
    }

    /// Create an account. When the host auto-starts a session the backend
    /// switches immediately and the identity is returned; otherwise the
    /// user must confirm and sign in.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<Option<Identity>> {
        let identity = match self.sync.as_mut() {
            Some(sync) => sync.auth.sign_up(email, password).await?,
            None => {
                return Err(BinderError::InvalidArgument(
                    "cloud sync is not configured".to_string(),
                ))
            }
        };
        if identity.is_some() {
            self.init().await;
        }
        Ok(identity)
    }

    /// Sign out and fall back to the local guest backend.
    pub async fn sign_out(&mut self) {
        if let Some(sync) = self.sync.as_mut() {
            sync.auth.sign_out().await;
        }
        self.init().await;
    }

    /// The signed-in identity, or `None` in guest mode.
    pub fn identity(&self) -> Option<&Identity> {
        self.sync.as_ref().and_then(|s| s.auth.current())
    }

    // -- State access ------------------------------------------------------

    pub fn manager(&self) -> &CollectionManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut CollectionManager {
        &mut self.manager
    }

    // -- Internals -----------------------------------------------------------

    /// Resolve the backend for the current identity. Done once per
    /// identity-change event (via [`init`](Self::init)), never per call.
    fn select_store(&self) -> Arc<dyn CollectionStore> {
        let identity = self.sync.as_ref().and_then(|s| s.auth.current());
        match (BackendKind::for_identity(identity), &self.sync) {
            (BackendKind::Remote(id), Some(sync)) => Arc::new(RemoteStore::new(
                self.http.clone(),
                sync.base_url.clone(),
                sync.api_key.clone(),
                id,
            )),
            _ => self.local.clone(),
        }
    }
}
