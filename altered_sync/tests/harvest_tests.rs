use altered_common::{ApiResult, HydraPage, Language};
use altered_sync::api::{Endpoint, PageQuery, PageSource};
use altered_sync::merge::CanonicalElement;
use altered_sync::output::{load_json, CARDS_FILE, FACTIONS_FILE, TYPES_FILE};
use altered_sync::{harvest, Config, Diagnostic, SyncError};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory Altered API: whole catalogs per (endpoint, language, faction),
/// paginated on request.
#[derive(Default)]
struct FakeApi {
    catalogs: HashMap<(Endpoint, Language, Option<String>), Vec<Value>>,
    requests: Cell<usize>,
}

impl FakeApi {
    fn add(&mut self, endpoint: Endpoint, language: Language, faction: Option<&str>, records: Vec<Value>) {
        self.catalogs
            .insert((endpoint, language, faction.map(String::from)), records);
    }
}

impl PageSource for FakeApi {
    fn fetch_page<T: DeserializeOwned>(&self, query: &PageQuery, page: u32) -> ApiResult<HydraPage<T>> {
        self.requests.set(self.requests.get() + 1);
        let key = (query.endpoint, query.language, query.faction.clone());
        let records = self.catalogs.get(&key).cloned().unwrap_or_default();
        let start = (page as usize - 1) * query.items_per_page;
        let members = records
            .iter()
            .skip(start)
            .take(query.items_per_page)
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(HydraPage {
            members,
            total_items: records.len(),
        })
    }
}

fn card(reference: &str, lang: &str, faction: &str, cost: &str) -> Value {
    json!({
        "reference": reference,
        "name": format!("{reference} {lang}"),
        "cardType": { "reference": "CHARACTER", "name": format!("Character {lang}") },
        "cardSubTypes": [{ "reference": "MAGE", "name": format!("Mage {lang}") }],
        "mainFaction": { "reference": faction, "name": format!("{faction} {lang}") },
        "rarity": { "reference": "COMMON", "name": format!("Common {lang}") },
        "imagePath": format!("https://example.com/{lang}/{reference}.jpg"),
        "elements": {
            "MAIN_COST": cost,
            "RECALL_COST": "",
            "PERMANENT": "",
            "MAIN_EFFECT": format!("effect {lang}")
        },
        "collectorNumberFormatted": format!("BTG-010-C-{}", lang.to_uppercase())
    })
}

fn config(languages: Vec<Language>) -> Config {
    Config {
        languages,
        factions: vec!["AX".to_string(), "LY".to_string()],
        items_per_page: 2,
        ..Config::default()
    }
}

fn two_language_api() -> FakeApi {
    let mut api = FakeApi::default();
    for (lang, code) in [(Language::English, "en"), (Language::French, "fr")] {
        api.add(
            Endpoint::Cards,
            lang,
            Some("AX"),
            vec![
                card("ALT_CORE_B_AX_01_C", code, "AX", "1"),
                card("ALT_CORE_B_AX_02_C", code, "AX", "2"),
                card("ALT_CORE_P_AX_03_R1", code, "AX", "3"),
            ],
        );
    }
    api.add(
        Endpoint::Cards,
        Language::English,
        Some("LY"),
        vec![card("ALT_CORE_B_LY_05_C", "en", "LY", "4")],
    );
    api
}

#[test]
fn harvest_reconciles_languages_and_factions() {
    let api = two_language_api();

    let result = harvest(&api, &config(vec![Language::English, Language::French]), false).unwrap();

    // Promo card filtered out, LY card only in English but still kept
    let ids: Vec<&String> = result.cards.keys().collect();
    assert_eq!(
        ids,
        vec!["ALT_CORE_B_AX_01_C", "ALT_CORE_B_AX_02_C", "ALT_CORE_B_LY_05_C"]
    );

    let card = &result.cards["ALT_CORE_B_AX_02_C"];
    assert_eq!(card.name["en"], "ALT_CORE_B_AX_02_C en");
    assert_eq!(card.name["fr"], "ALT_CORE_B_AX_02_C fr");
    assert_eq!(card.collector_number_printed, "BTG-010-C");
    assert_eq!(card.elements["MAIN_COST"], CanonicalElement::Invariant(json!("2")));
    assert_eq!(card.elements["RECALL_COST"], CanonicalElement::Invariant(Value::Null));

    let english_only = &result.cards["ALT_CORE_B_LY_05_C"];
    assert!(!english_only.name.contains_key("fr"));
    assert!(result.diagnostics.contains(&Diagnostic::MissingInLocale {
        id: "ALT_CORE_B_LY_05_C".to_string(),
        language: Language::French,
    }));

    assert_eq!(result.lookups.factions["AX"]["fr"], "AX fr");
    assert_eq!(result.lookups.factions["LY"].len(), 1);
    assert_eq!(result.lookups.subtypes["MAGE"]["en"], "Mage en");
}

#[test]
fn harvest_skip_incomplete_drops_partial_cards() {
    let api = two_language_api();
    let config = Config {
        skip_not_all_languages: true,
        ..config(vec![Language::English, Language::French])
    };

    let result = harvest(&api, &config, false).unwrap();

    assert!(!result.cards.contains_key("ALT_CORE_B_LY_05_C"));
    assert_eq!(result.cards.len(), 2);
}

#[test]
fn harvest_overlays_stats_only_when_authenticated() {
    let mut api = two_language_api();
    api.add(
        Endpoint::CardStats,
        Language::English,
        Some("AX"),
        vec![json!({ "reference": "ALT_CORE_B_AX_01_C", "inMyCollection": 2, "inMyWantlist": false })],
    );
    let config = config(vec![Language::English, Language::French]);

    let with_stats = harvest(&api, &config, true).unwrap();
    let owned = serde_json::to_value(&with_stats.cards["ALT_CORE_B_AX_01_C"]).unwrap();
    assert_eq!(owned["inMyCollection"], 2);
    assert_eq!(owned["inMyWantlist"], false);
    assert!(owned.get("foiled").is_none());

    let not_owned = serde_json::to_value(&with_stats.cards["ALT_CORE_B_AX_02_C"]).unwrap();
    assert!(not_owned.get("inMyCollection").is_none());

    let anonymous = harvest(&api, &config, false).unwrap();
    let card = serde_json::to_value(&anonymous.cards["ALT_CORE_B_AX_01_C"]).unwrap();
    assert!(card.get("inMyCollection").is_none());
}

#[test]
fn harvest_drops_incomplete_promo_before_parsing_it() {
    let mut api = FakeApi::default();
    api.add(
        Endpoint::Cards,
        Language::English,
        None,
        vec![
            card("ALT_CORE_B_AX_01_C", "en", "AX", "1"),
            json!({
                "reference": "ALT_CORE_P_AX_99_R1",
                "name": "promo",
                "collectorNumberFormatted": "P-1"
            }),
        ],
    );
    let config = Config {
        factions: Vec::new(),
        ..config(vec![Language::English])
    };

    let result = harvest(&api, &config, false).unwrap();

    assert_eq!(result.cards.len(), 1);
    assert!(result.cards.contains_key("ALT_CORE_B_AX_01_C"));
}

#[test]
fn harvest_fails_on_incomplete_card_that_is_kept() {
    let mut api = FakeApi::default();
    api.add(
        Endpoint::Cards,
        Language::English,
        None,
        vec![json!({ "reference": "ALT_CORE_B_AX_02_C", "name": "broken" })],
    );
    let config = Config {
        factions: Vec::new(),
        ..config(vec![Language::English])
    };

    let result = harvest(&api, &config, false);

    assert!(matches!(result, Err(SyncError::Json(_))));
}

#[test]
fn unowned_cards_do_not_count_as_warnings() {
    let mut api = two_language_api();
    api.add(
        Endpoint::CardStats,
        Language::English,
        Some("AX"),
        vec![json!({ "reference": "ALT_CORE_B_AX_01_C", "inMyCollection": 1 })],
    );

    let result = harvest(&api, &config(vec![Language::English]), true).unwrap();

    assert!(!result.diagnostics.is_empty());
    assert_eq!(result.warning_count(), 0);
}

#[test]
fn harvest_output_documents_round_trip() {
    let api = two_language_api();
    let dir = tempfile::tempdir().unwrap();

    let result = harvest(&api, &config(vec![Language::French, Language::English]), false).unwrap();
    result.write(dir.path()).unwrap();

    let cards: Value = load_json(&dir.path().join(CARDS_FILE)).unwrap();
    assert_eq!(cards["ALT_CORE_B_AX_01_C"]["type"], "CHARACTER");
    assert_eq!(cards["ALT_CORE_B_AX_01_C"]["elements"]["MAIN_EFFECT"]["fr"], "effect fr");
    assert_eq!(cards["ALT_CORE_B_AX_01_C"]["collectorNumberFormatted"]["en"], "BTG-010-C-EN");

    let types: Value = load_json(&dir.path().join(TYPES_FILE)).unwrap();
    assert_eq!(types["CHARACTER"]["en"], "Character en");
    let factions: Value = load_json(&dir.path().join(FACTIONS_FILE)).unwrap();
    assert_eq!(factions["AX"]["fr"], "AX fr");
}

#[test]
fn harvest_dumps_temp_files_when_enabled() {
    let api = two_language_api();
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        dump_temp_files: true,
        temp_folder: dir.path().join("temp"),
        ..config(vec![Language::English])
    };

    harvest(&api, &config, false).unwrap();

    for name in ["raw_cards_data_en", "cards_en", "types_en", "rarities_en"] {
        assert!(
            dir.path().join("temp").join(format!("{name}.json")).exists(),
            "{name} should be dumped"
        );
    }
}

#[test]
fn harvest_rejects_invalid_config_before_fetching() {
    let api = two_language_api();

    let result = harvest(&api, &config(vec![]), false);

    assert!(matches!(result, Err(SyncError::Config(_))));
    assert_eq!(api.requests.get(), 0);
}
