//! Paginated collection of one fetch unit
//!
//! A unit is one (endpoint, language, faction, rarities) combination. The
//! remote catalog is live: when its total changes while we paginate, every
//! page fetched so far is discarded and the unit starts over from page 1.

use crate::api::{PageQuery, PageSource};
use crate::error::{Result, SyncError};
use serde::de::DeserializeOwned;

/// Default cap on restarts caused by a changing total
pub const DEFAULT_MAX_RESTARTS: u32 = 5;

/// Outcome of one pass over all pages of a unit
enum Pass<T> {
    Complete(Vec<T>),
    TotalChanged { expected: usize, found: usize },
}

/// Drives a [`PageSource`] until a unit is fully retrieved
pub struct Collector<'a, S> {
    source: &'a S,
    max_restarts: u32,
}

impl<'a, S: PageSource> Collector<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_restarts: DEFAULT_MAX_RESTARTS,
        }
    }

    pub fn with_max_restarts(mut self, max_restarts: u32) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Fetch every record of `query`, restarting when the total drifts
    pub fn collect<T: DeserializeOwned>(&self, query: &PageQuery) -> Result<Vec<T>> {
        let mut restarts = 0;
        loop {
            match self.collect_once(query)? {
                Pass::Complete(records) => return Ok(records),
                Pass::TotalChanged { expected, found } => {
                    if restarts >= self.max_restarts {
                        return Err(SyncError::TotalNeverStabilized { restarts });
                    }
                    restarts += 1;
                    log::warn!(
                        "Restarting because the total number of records changed ({} -> {}), restart {}/{}",
                        expected,
                        found,
                        restarts,
                        self.max_restarts
                    );
                }
            }
        }
    }

    /// Fetch one unit per faction and concatenate them, in faction order.
    /// An empty faction list fetches the whole catalog as a single unit.
    pub fn collect_factions<T: DeserializeOwned>(
        &self,
        query: &PageQuery,
        factions: &[String],
    ) -> Result<Vec<T>> {
        if factions.is_empty() {
            return self.collect(query);
        }

        let mut records = Vec::new();
        for faction in factions {
            log::info!("==== Faction {} ====", faction);
            let unit = query.clone().with_faction(Some(faction.clone()));
            records.extend(self.collect::<T>(&unit)?);
        }
        Ok(records)
    }

    fn collect_once<T: DeserializeOwned>(&self, query: &PageQuery) -> Result<Pass<T>> {
        log::info!("  page 1");
        let first = self.source.fetch_page::<T>(query, 1)?;
        let total = first.total_items;
        let pages = total.div_ceil(query.items_per_page.max(1));

        let mut records = first.members;
        for page in 2..=pages {
            log::info!("  page {}/{}", page, pages);
            let next = self.source.fetch_page::<T>(query, page as u32)?;
            if next.total_items != total {
                return Ok(Pass::TotalChanged {
                    expected: total,
                    found: next.total_items,
                });
            }
            records.extend(next.members);
        }

        if records.len() != total {
            return Err(SyncError::PageCountMismatch {
                expected: total,
                actual: records.len(),
            });
        }

        Ok(Pass::Complete(records))
    }
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
