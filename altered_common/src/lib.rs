//! Shared types for the Altered card catalog
//!
//! Wire records returned by the Altered API, decoded card references,
//! supported languages and the transport error type used by every caller.

pub mod error;
pub mod language;
pub mod models;
pub mod reference;

pub use error::{ApiError, ApiResult};
pub use language::Language;
pub use models::{CardHeader, CodeRef, HydraPage, NamedRef, RawCard, StatsRecord};
pub use reference::CardReference;
