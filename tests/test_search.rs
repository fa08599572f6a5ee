//! Search-query construction and card wire-shape deserialization.

mod common;

use cardbinder::models::CardRecord;
use cardbinder::search::precise_query;

// ---------------------------------------------------------------------------
// precise_query
// ---------------------------------------------------------------------------

#[test]
fn precise_query_pins_the_exact_name() {
    assert_eq!(precise_query("Lightning Bolt", None, None), "!\"Lightning Bolt\"");
}

#[test]
fn precise_query_appends_set_and_collector_number() {
    assert_eq!(
        precise_query("Lightning Bolt", Some("clb"), Some("187")),
        "!\"Lightning Bolt\" set:clb cn:187"
    );
}

#[test]
fn precise_query_with_only_a_set_code() {
    assert_eq!(
        precise_query("Delver of Secrets", Some("mid"), None),
        "!\"Delver of Secrets\" set:mid"
    );
}

// ---------------------------------------------------------------------------
// CardRecord wire shape
// ---------------------------------------------------------------------------

#[test]
fn card_record_parses_a_search_api_payload() {
    let payload = serde_json::json!({
        "id": "e3285e6b-3e79-4d7c-bf96-d920f973b122",
        "name": "Lightning Bolt",
        "lang": "en",
        "set": "clb",
        "set_name": "Commander Legends: Battle for Baldur's Gate",
        "collector_number": "187",
        "rarity": "uncommon",
        "cmc": 1.0,
        "type_line": "Instant",
        "mana_cost": "{R}",
        "colors": ["R"],
        "prices": { "usd": "1.02", "usd_foil": "2.47", "eur": "0.95", "eur_foil": null },
        "image_uris": { "small": "https://img.example/s.jpg", "normal": "https://img.example/n.jpg" }
    });

    let card: CardRecord = serde_json::from_value(payload).unwrap();
    assert_eq!(card.name, "Lightning Bolt");
    assert_eq!(card.set_code.as_deref(), Some("clb"));
    assert_eq!(card.collector_number, "187");
    assert_eq!(card.cmc, 1.0);
    assert_eq!(card.colors, vec!["R".to_string()]);
    assert_eq!(card.prices.usd.as_deref(), Some("1.02"));
    assert_eq!(card.prices.eur_foil, None);
    assert_eq!(
        card.image_uris.as_ref().unwrap().normal.as_deref(),
        Some("https://img.example/n.jpg")
    );
    assert_eq!(card.usd_price(false), Some(1.02));
    assert_eq!(card.usd_price(true), Some(2.47));
}

#[test]
fn card_record_tolerates_sparse_payloads() {
    // Localized or digital-only printings omit many fields.
    let payload = serde_json::json!({
        "id": "some-id",
        "name": "Counterspell",
        "printed_name": "Contrahechizo",
        "lang": "es"
    });

    let card: CardRecord = serde_json::from_value(payload).unwrap();
    assert_eq!(card.display_name(), "Contrahechizo");
    assert_eq!(card.cmc, 0.0);
    assert!(card.colors.is_empty());
    assert_eq!(card.usd_price(false), None);
    assert!(card.image_uris.is_none());
}

#[test]
fn display_name_falls_back_to_the_english_name() {
    let card = common::sample_card("bolt", "Lightning Bolt");
    assert_eq!(card.display_name(), "Lightning Bolt");
}
