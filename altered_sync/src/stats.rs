//! Overlay of the user's ownership flags on normalized cards
//!
//! Ownership does not depend on the locale, so the stats endpoint is read
//! once (in English) and the same snapshot is applied to every locale.

use crate::normalize::NormalizedCard;
use altered_common::StatsRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Ownership flags of one card. A flag the API did not send stays `None`
/// and is omitted from the output rather than written as false/null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ownership {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foiled: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_my_tradelist: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_my_collection: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_my_wantlist: Option<Value>,
}

impl Ownership {
    pub fn is_empty(&self) -> bool {
        self.foiled.is_none()
            && self.in_my_tradelist.is_none()
            && self.in_my_collection.is_none()
            && self.in_my_wantlist.is_none()
    }
}

impl From<StatsRecord> for Ownership {
    fn from(stats: StatsRecord) -> Self {
        Self {
            foiled: stats.foiled,
            in_my_tradelist: stats.in_my_tradelist,
            in_my_collection: stats.in_my_collection,
            in_my_wantlist: stats.in_my_wantlist,
        }
    }
}

/// Ownership snapshot indexed by card reference
#[derive(Debug, Default)]
pub struct OwnershipIndex {
    by_id: HashMap<String, Ownership>,
}

impl OwnershipIndex {
    pub fn new(records: Vec<StatsRecord>) -> Self {
        let by_id = records
            .into_iter()
            .map(|record| (record.reference.clone(), Ownership::from(record)))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, card_id: &str) -> Option<&Ownership> {
        self.by_id.get(card_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Copy whatever flags exist for `card`; no match leaves it untouched
    pub fn attach(&self, card: &mut NormalizedCard) {
        if let Some(ownership) = self.get(&card.id) {
            card.ownership = ownership.clone();
        }
    }
}
