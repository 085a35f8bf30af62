//! Altered Sync - Altered card catalog harvester
//!
//! Fetches the card catalog from the Altered API in every configured
//! language and reconciles the per-language results into one catalog:
//! one record per card, locale-invariant fields stored once, localized
//! fields keyed by language, plus code → name lookup tables.

pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod merge;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod stats;

pub use api::{AlteredClient, Endpoint, PageQuery, PageSource};
pub use collector::Collector;
pub use config::Config;
pub use error::{Result, SyncError};
pub use filter::CategoryPolicy;
pub use lookup::LookupTables;
pub use merge::{merge_cards, CanonicalCard, Diagnostic, MergeOptions, MergeOutcome};
pub use normalize::NormalizedCard;
pub use pipeline::{harvest, Harvest};
