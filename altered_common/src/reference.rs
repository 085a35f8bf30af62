//! Decoding of card references
//!
//! A reference looks like `ALT_<SET>_<PRODUCT>_<FACTION>_<NUMBER>_<RARITY>[_<SERIAL>]`,
//! e.g. `ALT_COREKS_B_LY_06_U_1234`. Category checks work on the decoded
//! segments rather than on substrings of the whole identifier.

const PREFIX: &str = "ALT";
const FOILER_SEGMENT: &str = "FOILER";
const LIMITED_EDITION_SUFFIX: &str = "KS";
const PROMO_PRODUCT: &str = "P";
const UNIQUE_RARITY: &str = "U";

/// Decoded view over a card reference. Decoding never fails: identifiers
/// that do not follow the usual shape simply carry no markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardReference<'a> {
    set: Option<&'a str>,
    product: Option<&'a str>,
    rarity: Option<&'a str>,
    foiler: bool,
}

impl<'a> CardReference<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let segments: Vec<&'a str> = raw.split('_').collect();
        let foiler = segments.iter().any(|s| *s == FOILER_SEGMENT);

        if segments[0] != PREFIX || segments.len() < 3 {
            log::debug!("Reference {} does not follow the ALT_ layout", raw);
            return Self {
                set: None,
                product: None,
                rarity: None,
                foiler,
            };
        }

        // Foiler references do not carry the faction/number/rarity tail
        let rarity = if foiler || segments.len() < 6 {
            None
        } else {
            Some(segments[5])
        };

        Self {
            set: Some(segments[1]),
            product: Some(segments[2]),
            rarity,
            foiler,
        }
    }

    /// Foil-only artifact
    pub fn is_foiler(&self) -> bool {
        self.foiler
    }

    /// Kickstarter / limited-edition print run
    pub fn is_limited_edition(&self) -> bool {
        self.set.is_some_and(|set| {
            set.len() > LIMITED_EDITION_SUFFIX.len() && set.ends_with(LIMITED_EDITION_SUFFIX)
        })
    }

    pub fn is_promo(&self) -> bool {
        self.product == Some(PROMO_PRODUCT)
    }

    pub fn is_unique(&self) -> bool {
        self.rarity == Some(UNIQUE_RARITY)
    }
}
