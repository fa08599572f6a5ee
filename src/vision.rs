//! Generative-vision card identification.
//!
//! Sends a captured card photo to a hosted vision model and asks for a
//! JSON-only answer. The model is treated as opaque and unreliable: fenced
//! or malformed output is tolerated, plain text falls back to a raw name
//! guess, and "no card in frame" is an outcome of its own, distinct from a
//! transport failure.

use base64::Engine;
use serde::Deserialize;

use crate::config;
use crate::error::{BinderError, Result};

// ---------------------------------------------------------------------------
// Identification outcome
// ---------------------------------------------------------------------------

/// What the model read off the photo. Enough for a precise search-API
/// lookup when set code and collector number were legible.
#[derive(Debug, Clone, PartialEq)]
pub struct CardHint {
    pub name: String,
    pub set_code: Option<String>,
    pub collector_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identification {
    Card(CardHint),
    /// The model answered but saw no card in the frame.
    NoCard,
}

#[derive(Deserialize)]
struct RawIdentification {
    name: Option<String>,
    set_code: Option<String>,
    collector_number: Option<String>,
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// CardVision
// ---------------------------------------------------------------------------

const IDENTIFY_PROMPT: &str = "Identify the Magic: The Gathering card in this image. \
Return ONLY a valid JSON object with these fields: \
{\"name\": \"English card name\", \
\"set_code\": \"three-letter set code if visible (e.g. MID, NEO)\", \
\"collector_number\": \"collector number if visible\"}. \
If no card is visible, return {\"error\": \"NO CARD\"}. \
Do NOT use markdown fences. Only the raw JSON.";

/// Client for the hosted vision model.
pub struct CardVision {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CardVision {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: config::VISION_MODEL.to_string(),
        }
    }

    /// Identify the card in a JPEG photo.
    pub async fn identify(&self, image_jpeg: &[u8]) -> Result<Identification> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_jpeg);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": IDENTIFY_PROMPT },
                    { "inline_data": { "mime_type": "image/jpeg", "data": encoded } },
                ]
            }]
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BinderError::Lookup(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(BinderError::Lookup(format!(
                "vision API returned {}",
                resp.status()
            )));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| BinderError::Lookup(e.to_string()))?;

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| BinderError::Lookup("vision response had no text part".to_string()))?;

        Ok(parse_identification(text))
    }
}

/// Parse the model's answer into an identification outcome.
///
/// Markdown fences are stripped even though the prompt forbids them. Text
/// that is not JSON at all becomes a raw name guess; an explicit
/// `{"error": "NO CARD"}` or a missing/blank name means no card.
pub fn parse_identification(text: &str) -> Identification {
    let cleaned = text
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string();

    let raw: RawIdentification = match serde_json::from_str(&cleaned) {
        Ok(raw) => raw,
        Err(_) => {
            // Not JSON: take the whole answer as a name guess.
            if cleaned.is_empty() {
                return Identification::NoCard;
            }
            return Identification::Card(CardHint {
                name: cleaned,
                set_code: None,
                collector_number: None,
            });
        }
    };

    if raw.error.as_deref() == Some("NO CARD") {
        return Identification::NoCard;
    }

    match raw.name {
        Some(name) if !name.trim().is_empty() => Identification::Card(CardHint {
            name,
            set_code: raw.set_code.filter(|s| !s.trim().is_empty()),
            collector_number: raw
                .collector_number
                .map(clean_collector_number)
                .filter(|s| !s.is_empty()),
        }),
        _ => Identification::NoCard,
    }
}

/// Normalize a printed collector number: the model often reads "46/281",
/// but only the part before the slash is the lookup key.
pub fn clean_collector_number(raw: String) -> String {
    raw.split('/').next().unwrap_or("").trim().to_string()
}
