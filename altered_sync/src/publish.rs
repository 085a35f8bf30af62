//! Publication of the user's unique cards to their tradelist

use crate::api::{AlteredClient, TradelistEntry};
use crate::error::{Result, SyncError};
use crate::merge::CanonicalCard;
use crate::output::load_json;
use std::collections::BTreeMap;
use std::path::Path;

const UNIQUE_RARITY: &str = "UNIQUE";

/// One tradelist entry per unique card of the catalog, in id order
pub fn unique_entries(cards: &BTreeMap<String, CanonicalCard>) -> Vec<TradelistEntry> {
    cards
        .values()
        .filter(|card| card.rarity == UNIQUE_RARITY)
        .map(|card| TradelistEntry::single(&card.id))
        .collect()
}

/// Load a harvested catalog and put all its uniques on the tradelist.
/// Returns how many cards were published; nothing is sent when there are none.
pub fn publish_uniques(client: &AlteredClient, catalog: &Path) -> Result<usize> {
    if !catalog.exists() {
        return Err(SyncError::MissingCatalog(catalog.to_path_buf()));
    }

    let cards: BTreeMap<String, CanonicalCard> = load_json(catalog)?;
    let entries = unique_entries(&cards);
    log::info!(
        "Found {} unique cards out of {} in {}",
        entries.len(),
        cards.len(),
        catalog.display()
    );

    // The PUT replaces the whole list, so an empty payload would wipe it
    if entries.is_empty() {
        log::warn!("No unique cards to publish, leaving the tradelist untouched");
        return Ok(0);
    }

    client.put_tradelist(&entries)?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::dump_json;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog() -> BTreeMap<String, CanonicalCard> {
        let card = |id: &str, rarity: &str| -> CanonicalCard {
            serde_json::from_value(json!({
                "id": id,
                "type": "CHARACTER",
                "subtypes": [],
                "assets": [],
                "mainFaction": "AX",
                "rarity": rarity,
                "name": { "en": "Card" },
                "imagePath": { "en": "" },
                "collectorNumberFormatted": { "en": "BTG-001-U-7" },
                "collectorNumberPrinted": "BTG-001-U-7",
                "elements": {}
            }))
            .unwrap()
        };
        [
            ("ALT_CORE_B_AX_01_C", card("ALT_CORE_B_AX_01_C", "COMMON")),
            ("ALT_CORE_B_AX_01_U_7", card("ALT_CORE_B_AX_01_U_7", "UNIQUE")),
        ]
        .into_iter()
        .map(|(id, card)| (id.to_string(), card))
        .collect()
    }

    #[test]
    fn only_uniques_are_selected() {
        let entries = unique_entries(&catalog());
        assert_eq!(entries, vec![TradelistEntry::single("ALT_CORE_B_AX_01_U_7")]);
        assert_eq!(entries[0].card, "/cards/ALT_CORE_B_AX_01_U_7");
    }

    #[test]
    fn missing_catalog_is_reported() {
        let client = AlteredClient::new("http://127.0.0.1:9", Some("t".into())).unwrap();
        let result = publish_uniques(&client, Path::new("/nonexistent/cards.json"));
        assert!(matches!(result, Err(SyncError::MissingCatalog(_))));
    }

    #[tokio::test]
    async fn catalog_without_uniques_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/ownership_lists/tradelist"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("cards.json");
        let mut commons = catalog();
        commons.retain(|_, card| card.rarity != UNIQUE_RARITY);
        dump_json(&commons, &catalog_path).unwrap();

        let base_url = mock_server.uri();
        let published = tokio::task::spawn_blocking(move || {
            let client = AlteredClient::new(&base_url, Some("token".into())).unwrap();
            publish_uniques(&client, &catalog_path)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(published, 0);
    }

    #[tokio::test]
    async fn publishes_uniques_from_catalog_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/ownership_lists/tradelist"))
            .and(body_json(json!({
                "cards": [{ "card": "/cards/ALT_CORE_B_AX_01_U_7", "quantity": 1 }]
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("cards.json");
        dump_json(&catalog(), &catalog_path).unwrap();

        let base_url = mock_server.uri();
        let published = tokio::task::spawn_blocking(move || {
            let client = AlteredClient::new(&base_url, Some("token".into())).unwrap();
            publish_uniques(&client, &catalog_path)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(published, 1);
    }
}
