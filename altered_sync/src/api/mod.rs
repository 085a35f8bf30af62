//! Altered API access
//!
//! The collector only sees the [`PageSource`] trait, so tests can drive it
//! with in-memory pages while the binary uses the blocking [`AlteredClient`].

mod client;

pub use client::{AlteredClient, DEFAULT_BASE_URL, MAX_ATTEMPTS};

use altered_common::{ApiResult, HydraPage, Language};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Paginated endpoints the harvester reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Card catalog, one locale per request
    Cards,
    /// Ownership flags for the authenticated user
    CardStats,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Cards => "cards",
            Endpoint::CardStats => "cards/stats",
        }
    }
}

/// Everything that identifies one paginated fetch unit, except the page number
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub endpoint: Endpoint,
    pub language: Language,
    /// Restrict to one faction (`factions[]`), or the whole catalog when `None`
    pub faction: Option<String>,
    /// Restrict to these rarities (`rarity[]`), or all rarities when empty
    pub rarities: Vec<String>,
    pub items_per_page: usize,
}

impl PageQuery {
    pub fn new(endpoint: Endpoint, language: Language, items_per_page: usize) -> Self {
        Self {
            endpoint,
            language,
            faction: None,
            rarities: Vec::new(),
            items_per_page,
        }
    }

    pub fn with_faction(mut self, faction: Option<String>) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_rarities(mut self, rarities: Vec<String>) -> Self {
        self.rarities = rarities;
        self
    }
}

/// Something that can return one page of a paginated endpoint
pub trait PageSource {
    /// Fetch page `page` (1-based) of `query`
    fn fetch_page<T: DeserializeOwned>(&self, query: &PageQuery, page: u32)
        -> ApiResult<HydraPage<T>>;
}

/// One line of the ownership list payload
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TradelistEntry {
    /// IRI of the card, e.g. `/cards/ALT_CORE_B_AX_04_U_12`
    pub card: String,
    pub quantity: u32,
}

impl TradelistEntry {
    pub fn single(card_id: &str) -> Self {
        Self {
            card: format!("/cards/{card_id}"),
            quantity: 1,
        }
    }
}
