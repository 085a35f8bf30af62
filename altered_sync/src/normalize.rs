//! Projection of raw API cards into per-locale normalized records

use crate::lookup::LocaleTables;
use crate::stats::Ownership;
use altered_common::RawCard;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Printed numbers the API gets wrong: (reference prefix, wrong, right)
const COLLECTOR_NUMBER_FIXES: [(&str, &str, &str); 3] = [
    // Ouroboros Trickster KS
    ("ALT_COREKS_B_LY_06_", "BTG-070", "BTG-065"),
    // Lyra Navigator KS
    ("ALT_COREKS_B_LY_12_", "BTG-074", "BTG-070"),
    // Ouroboros Inkcaster KS
    ("ALT_COREKS_B_LY_10_", "BTG-065", "BTG-074"),
];

/// How an element code behaves across locales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// `*EFFECT*`: rules text, one value per locale
    Text,
    /// `*COST*` / `*POWER*`: number as sent, absent when empty
    Numeric,
    /// `PERMANENT` / `RESERVE`: integer, absent when empty
    Integer,
    /// Anything else, identical in every locale
    Scalar,
}

impl ElementRole {
    pub fn of(code: &str) -> Self {
        if code.contains("EFFECT") {
            ElementRole::Text
        } else if code.contains("COST") || code.contains("POWER") {
            ElementRole::Numeric
        } else if code == "PERMANENT" || code == "RESERVE" {
            ElementRole::Integer
        } else {
            ElementRole::Scalar
        }
    }
}

/// Element value once its role has been applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ElementValue {
    Localized(String),
    /// `Null` stands for an absent value
    Invariant(Value),
}

/// One card in one locale, with every field in its final shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCard {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub subtypes: Vec<String>,
    pub image_path: String,
    pub assets: Value,
    pub main_faction: String,
    pub rarity: String,
    pub elements: BTreeMap<String, ElementValue>,
    pub collector_number_formatted: String,
    #[serde(flatten)]
    pub ownership: Ownership,
}

/// Patch known upstream data errors in place
pub fn apply_known_corrections(card: &mut RawCard) {
    for (prefix, wrong, right) in COLLECTOR_NUMBER_FIXES {
        if card.reference.starts_with(prefix) && card.collector_number_formatted.contains(wrong) {
            log::debug!(
                "Correcting collector number of {}: {} -> {}",
                card.reference,
                wrong,
                right
            );
            card.collector_number_formatted = card.collector_number_formatted.replace(wrong, right);
        }
    }
}

/// Normalize `card`, recording its code/name pairs in the locale's `tables`
pub fn normalize(card: RawCard, tables: &mut LocaleTables) -> NormalizedCard {
    tables.record(&card);

    let elements = card
        .elements
        .into_iter()
        .map(|(code, value)| {
            let value = coerce_element(&card.reference, &code, value);
            (code, value)
        })
        .collect();

    NormalizedCard {
        id: card.reference,
        name: card.name,
        card_type: card.card_type.reference,
        subtypes: card
            .card_sub_types
            .unwrap_or_default()
            .into_iter()
            .map(|subtype| subtype.reference)
            .collect(),
        image_path: card.image_path,
        assets: card.assets.unwrap_or_else(|| Value::Array(Vec::new())),
        main_faction: card.main_faction.reference,
        rarity: card.rarity.reference,
        elements,
        collector_number_formatted: card.collector_number_formatted,
        ownership: Ownership::default(),
    }
}

fn coerce_element(card_id: &str, code: &str, value: Value) -> ElementValue {
    match ElementRole::of(code) {
        ElementRole::Text => ElementValue::Localized(match value {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        }),
        ElementRole::Numeric => ElementValue::Invariant(match value {
            Value::String(ref s) if s.is_empty() => Value::Null,
            other => other,
        }),
        ElementRole::Integer => ElementValue::Invariant(match value {
            Value::String(s) if s.is_empty() => Value::Null,
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => {
                    log::warn!("Element {} of card {} is not an integer: {:?}", code, card_id, s);
                    Value::Null
                }
            },
            other => other,
        }),
        ElementRole::Scalar => ElementValue::Invariant(value),
    }
}
