use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardRecord — immutable snapshot of one printing, as returned by the
// card-search API
// ---------------------------------------------------------------------------

/// A single card printing, captured verbatim at acquisition time.
///
/// Identity is `id`; every other field is presentation data frozen at the
/// moment the card was looked up. Prices in particular are a snapshot and
/// are never refreshed once an entry owns the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub name: String,
    /// Localized name on non-English printings.
    pub printed_name: Option<String>,
    pub lang: Option<String>,
    #[serde(default)]
    pub set_name: String,
    /// Three-to-five letter set code, when the source provides one.
    #[serde(rename = "set")]
    pub set_code: Option<String>,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub rarity: String,
    /// Converted mana cost. Non-negative; absent upstream means 0.
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub type_line: String,
    pub mana_cost: Option<String>,
    /// Single-letter color codes (W/U/B/R/G); empty for colorless.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub prices: PriceSnapshot,
    pub image_uris: Option<ImageUris>,
}

// ---------------------------------------------------------------------------
// PriceSnapshot
// ---------------------------------------------------------------------------

/// Price points at acquisition time, as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub eur: Option<String>,
    pub eur_foil: Option<String>,
}

// ---------------------------------------------------------------------------
// ImageUris
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub png: Option<String>,
}

impl CardRecord {
    /// Name to show the user: the localized printing when present.
    pub fn display_name(&self) -> &str {
        self.printed_name.as_deref().unwrap_or(&self.name)
    }

    /// USD price for the given finish, parsed from the snapshot.
    ///
    /// Returns `None` when the snapshot has no price for that finish or the
    /// stored string is not a number.
    pub fn usd_price(&self, foil: bool) -> Option<f64> {
        let raw = if foil {
            self.prices.usd_foil.as_deref()
        } else {
            self.prices.usd.as_deref()
        };
        raw.and_then(|p| p.parse::<f64>().ok())
    }
}
