//! Code → name lookup tables (types, subtypes, factions, rarities)

use altered_common::{Language, RawCard};
use std::collections::BTreeMap;

/// code → display name, for one locale
pub type NameTable = BTreeMap<String, String>;

/// code → locale code → display name
pub type LocalizedTable = BTreeMap<String, BTreeMap<String, String>>;

/// The four name tables of one locale, filled while normalizing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleTables {
    pub types: NameTable,
    pub subtypes: NameTable,
    pub factions: NameTable,
    pub rarities: NameTable,
}

impl LocaleTables {
    /// Record every code/name pair carried by `card`
    pub fn record(&mut self, card: &RawCard) {
        self.types
            .insert(card.card_type.reference.clone(), card.card_type.name.clone());
        for subtype in card.card_sub_types.iter().flatten() {
            self.subtypes
                .insert(subtype.reference.clone(), subtype.name.clone());
        }
        self.factions.insert(
            card.main_faction.reference.clone(),
            card.main_faction.name.clone(),
        );
        self.rarities
            .insert(card.rarity.reference.clone(), card.rarity.name.clone());
    }
}

/// Merged tables, ready to be written out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTables {
    pub types: LocalizedTable,
    pub subtypes: LocalizedTable,
    pub factions: LocalizedTable,
    pub rarities: LocalizedTable,
}

impl LookupTables {
    /// Merge the per-locale tables of every locale, category by category
    pub fn merge(per_locale: &[(Language, LocaleTables)]) -> Self {
        Self {
            types: merge_category(per_locale, |t| &t.types),
            subtypes: merge_category(per_locale, |t| &t.subtypes),
            factions: merge_category(per_locale, |t| &t.factions),
            rarities: merge_category(per_locale, |t| &t.rarities),
        }
    }
}

fn merge_category(
    per_locale: &[(Language, LocaleTables)],
    select: fn(&LocaleTables) -> &NameTable,
) -> LocalizedTable {
    let tables: Vec<(Language, &NameTable)> = per_locale
        .iter()
        .map(|(language, tables)| (*language, select(tables)))
        .collect();
    merge_lookup(&tables)
}

/// Re-key locale → (code → name) into code → (locale → name)
pub fn merge_lookup(per_locale: &[(Language, &NameTable)]) -> LocalizedTable {
    let mut merged = LocalizedTable::new();
    for (language, table) in per_locale {
        for (code, name) in table.iter() {
            merged
                .entry(code.clone())
                .or_default()
                .insert(language.code().to_string(), name.clone());
        }
    }
    merged
}
