use std::path::PathBuf;

/// Card-search API base (Scryfall-compatible REST).
pub const SEARCH_API_BASE: &str = "https://api.scryfall.com";

/// Generative-vision API base used for card identification.
pub const VISION_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Vision model invoked for identification requests.
pub const VISION_MODEL: &str = "gemini-2.0-flash";

/// Local storage slot holding the serialized collection.
pub const COLLECTION_SLOT: &str = "collection.json";

/// Local storage slot holding the serialized deck set.
pub const DECKS_SLOT: &str = "decks.json";

/// Remote table keyed by (user id, card id).
pub const COLLECTION_TABLE: &str = "collection";

/// Remote table keyed by deck id, scoped by user id.
pub const DECKS_TABLE: &str = "decks";

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("cardbinder")
    } else {
        PathBuf::from(".cardbinder")
    }
}
