//! Wire records returned by the Altered API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A code/display-name pair (card type, subtype, faction, rarity).
/// `reference` is locale-invariant, `name` follows the request locale.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NamedRef {
    pub reference: String,
    pub name: String,
}

/// The part of a card record the category checks read. Parsed on its own so
/// that records with incomplete bodies can still be filtered out.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CardHeader {
    pub reference: String,
    #[serde(default)]
    pub rarity: Option<CodeRef>,
}

impl CardHeader {
    pub fn rarity_code(&self) -> Option<&str> {
        self.rarity.as_ref().map(|r| r.reference.as_str())
    }
}

/// A code without its display name
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CodeRef {
    pub reference: String,
}

/// One card as returned by the `cards` endpoint for a single locale
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    pub reference: String,
    pub name: String,
    pub card_type: NamedRef,
    #[serde(default)]
    pub card_sub_types: Option<Vec<NamedRef>>,
    pub main_faction: NamedRef,
    pub rarity: NamedRef,
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub assets: Option<Value>,
    #[serde(default)]
    pub elements: BTreeMap<String, Value>,
    pub collector_number_formatted: String,
}

/// Per-user ownership data from the `cards/stats` endpoint.
/// The API omits a flag entirely when it does not apply.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_my_collection: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_my_wantlist: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foiled: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_my_tradelist: Option<Value>,
}

/// Hydra collection envelope wrapping every paginated response
#[derive(Debug, Deserialize)]
pub struct HydraPage<T> {
    #[serde(rename = "hydra:member")]
    pub members: Vec<T>,
    #[serde(rename = "hydra:totalItems")]
    pub total_items: usize,
}
