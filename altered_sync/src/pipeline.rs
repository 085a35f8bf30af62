//! End-to-end harvest: collect every locale, filter, normalize, merge

use crate::api::{Endpoint, PageQuery, PageSource};
use crate::collector::Collector;
use crate::config::Config;
use crate::error::Result;
use crate::filter::{self, CategoryPolicy};
use crate::lookup::{LocaleTables, LookupTables};
use crate::merge::{merge_cards, CanonicalCard, Diagnostic};
use crate::normalize::{apply_known_corrections, normalize, NormalizedCard};
use crate::output::{self, TempDumps};
use crate::stats::OwnershipIndex;
use altered_common::{CardHeader, Language, RawCard, StatsRecord};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Ownership does not vary by locale; stats are always read in this one
const STATS_LANGUAGE: Language = Language::English;

/// Everything a successful run produces
#[derive(Debug, Default)]
pub struct Harvest {
    pub cards: BTreeMap<String, CanonicalCard>,
    pub lookups: LookupTables,
    pub diagnostics: Vec<Diagnostic>,
}

impl Harvest {
    /// Diagnostics that point at inconsistent upstream data
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Write the five catalog documents
    pub fn write(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        output::write_catalog(folder, &self.cards, &self.lookups)
    }
}

/// Filter, correct, normalize and overlay ownership on one locale's cards.
///
/// Records are filtered on their header first; only kept records must carry
/// a complete card body.
pub fn treat_cards(
    records: Vec<Value>,
    policy: &CategoryPolicy,
    ownership: Option<&OwnershipIndex>,
) -> Result<(Vec<NormalizedCard>, LocaleTables)> {
    let mut tables = LocaleTables::default();
    let total = records.len();
    let mut cards = Vec::with_capacity(total);

    for record in records {
        let header = CardHeader::deserialize(&record)?;
        if !filter::keep(&header, policy) {
            continue;
        }

        let mut card: RawCard = serde_json::from_value(record)?;
        apply_known_corrections(&mut card);
        let mut normalized = normalize(card, &mut tables);
        if let Some(index) = ownership {
            index.attach(&mut normalized);
        }
        cards.push(normalized);
    }

    log::info!("Kept {} of {} cards", cards.len(), total);
    Ok((cards, tables))
}

/// Run a full harvest against `source`.
///
/// `authenticated` tells whether `source` sends a token; ownership stats are
/// only requested in that case and when the config asks for them.
pub fn harvest<S: PageSource>(source: &S, config: &Config, authenticated: bool) -> Result<Harvest> {
    config.validate()?;

    let temp = TempDumps::new(config.temp_dump_folder());
    let collector = Collector::new(source).with_max_restarts(config.max_restarts);
    let policy = config.category_policy();

    let ownership = if authenticated && config.include_stats {
        log::info!("Importing stats data");
        let query = PageQuery::new(Endpoint::CardStats, STATS_LANGUAGE, config.items_per_page)
            .with_rarities(config.rarities.clone());
        let records: Vec<StatsRecord> = collector.collect_factions(&query, &config.factions)?;
        temp.dump("raw_stats_data", &records)?;
        let index = OwnershipIndex::new(records);
        if index.is_empty() {
            log::warn!("No collection stats returned, ownership fields will be absent");
        } else {
            log::info!("Loaded stats for {} cards", index.len());
        }
        Some(index)
    } else {
        None
    };

    let mut cards_per_locale = Vec::with_capacity(config.languages.len());
    let mut tables_per_locale = Vec::with_capacity(config.languages.len());

    for &language in &config.languages {
        log::info!("Importing card data for language {}", language);
        let query = PageQuery::new(Endpoint::Cards, language, config.items_per_page)
            .with_rarities(config.rarities.clone());
        let records: Vec<Value> = collector.collect_factions(&query, &config.factions)?;
        temp.dump(&format!("raw_cards_data_{language}"), &records)?;

        let (cards, tables) = treat_cards(records, &policy, ownership.as_ref())?;
        temp.dump(&format!("cards_{language}"), &cards)?;
        temp.dump(&format!("types_{language}"), &tables.types)?;
        temp.dump(&format!("subtypes_{language}"), &tables.subtypes)?;
        temp.dump(&format!("factions_{language}"), &tables.factions)?;
        temp.dump(&format!("rarities_{language}"), &tables.rarities)?;

        cards_per_locale.push((language, cards));
        tables_per_locale.push((language, tables));
    }

    let outcome = merge_cards(&cards_per_locale, config.merge_options(ownership.is_some()));
    let lookups = LookupTables::merge(&tables_per_locale);

    Ok(Harvest {
        cards: outcome.cards,
        lookups,
        diagnostics: outcome.diagnostics,
    })
}
