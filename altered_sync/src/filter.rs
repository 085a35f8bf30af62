//! Category filter: which special cards make it into the catalog

use altered_common::{CardHeader, CardReference};

const UNIQUE_RARITY_CODE: &str = "UNIQUE";

/// Inclusion switches for special card categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPolicy {
    pub include_foilers: bool,
    pub include_kickstarter: bool,
    pub include_promo_cards: bool,
    pub include_uniques: bool,
    /// Keep Kickstarter uniques even when Kickstarter cards are excluded.
    /// Only effective together with `include_uniques`.
    pub force_include_ks_uniques: bool,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self {
            include_foilers: false,
            include_kickstarter: true,
            include_promo_cards: false,
            include_uniques: true,
            force_include_ks_uniques: false,
        }
    }
}

impl CategoryPolicy {
    /// Uniques are part of the harvest unless a rarity restriction leaves them out
    pub fn uniques_requested(rarities: &[String]) -> bool {
        rarities.is_empty() || rarities.iter().any(|r| r == UNIQUE_RARITY_CODE)
    }
}

/// One category check. Rules are evaluated in declaration order and the
/// first rule that rejects a card drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Foiler,
    LimitedEdition,
    Promo,
}

const RULES: [Rule; 3] = [Rule::Foiler, Rule::LimitedEdition, Rule::Promo];

impl Rule {
    fn rejects(
        self,
        card: &CardHeader,
        reference: &CardReference,
        policy: &CategoryPolicy,
    ) -> bool {
        match self {
            Rule::Foiler => reference.is_foiler() && !policy.include_foilers,
            Rule::LimitedEdition => {
                if !reference.is_limited_edition() || policy.include_kickstarter {
                    return false;
                }
                let unique =
                    reference.is_unique() || card.rarity_code() == Some(UNIQUE_RARITY_CODE);
                !(unique && policy.include_uniques && policy.force_include_ks_uniques)
            }
            // Promo prints commonly ship with incomplete stats
            Rule::Promo => reference.is_promo() && !policy.include_promo_cards,
        }
    }
}

/// Whether `card` is retained under `policy`. Only the header is read, so
/// this runs before the full record is parsed.
pub fn keep(card: &CardHeader, policy: &CategoryPolicy) -> bool {
    let reference = CardReference::parse(&card.reference);
    match RULES
        .iter()
        .find(|rule| rule.rejects(card, &reference, policy))
    {
        Some(rule) => {
            log::debug!("Dropping {} ({:?})", card.reference, rule);
            false
        }
        None => true,
    }
}
