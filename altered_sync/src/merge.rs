//! Cross-locale reconciliation of normalized cards
//!
//! Every identity is folded independently over the locales, in the order
//! they were requested. Locale-invariant fields are set by the first locale
//! that reports them; a later locale disagreeing produces a [`Diagnostic`]
//! and never overwrites. Locale-variant fields go into maps keyed by locale
//! code, and only locales that reported the card get an entry.

use crate::normalize::{ElementValue, NormalizedCard};
use crate::stats::Ownership;
use altered_common::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// locale code → value
pub type Localized = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Drop a card entirely when any locale is missing it
    pub skip_incomplete: bool,
    /// Reconcile ownership flags as invariant fields
    pub include_ownership: bool,
}

/// Consistency findings. These are warnings: the merge always continues.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    MissingInLocale {
        id: String,
        language: Language,
    },
    SkippedIncomplete {
        id: String,
    },
    FieldMismatch {
        id: String,
        field: String,
        language: Language,
        kept: Value,
        rejected: Value,
    },
    MissingField {
        id: String,
        field: &'static str,
        language: Language,
    },
}

impl Diagnostic {
    /// `MissingField` is the normal case for cards the user does not own;
    /// everything else points at inconsistent upstream data.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Diagnostic::MissingField { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingInLocale { id, language } => {
                write!(f, "Card {} not found in {}", id, language)
            }
            Diagnostic::SkippedIncomplete { id } => {
                write!(f, "Skipping card {}: not available in every language", id)
            }
            Diagnostic::FieldMismatch {
                id,
                field,
                language,
                kept,
                rejected,
            } => write!(
                f,
                "Property {} is different for card {} in {}: {} != {}",
                field, id, language, kept, rejected
            ),
            Diagnostic::MissingField {
                id,
                field,
                language,
            } => write!(f, "Property {} not in card {} ({})", field, id, language),
        }
    }
}

/// An element of the merged card: rules text per locale, or one shared value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalElement {
    Localized(Localized),
    Invariant(Value),
}

/// One card, reconciled across every locale that reported it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCard {
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub subtypes: Vec<String>,
    pub assets: Value,
    pub main_faction: String,
    pub rarity: String,
    #[serde(flatten)]
    pub ownership: Ownership,
    pub name: Localized,
    pub image_path: Localized,
    pub collector_number_formatted: Localized,
    pub collector_number_printed: String,
    pub elements: BTreeMap<String, CanonicalElement>,
}

/// Result of merging every locale
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub cards: BTreeMap<String, CanonicalCard>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Strip the trailing locale/print marker of a formatted collector number:
/// a final `-` segment of one or two letters (`BTG-001-C-EN` → `BTG-001-C`).
pub fn printed_collector_number(formatted: &str) -> &str {
    match formatted.rsplit_once('-') {
        Some((head, suffix))
            if !head.is_empty()
                && (1..=2).contains(&suffix.chars().count())
                && suffix.chars().all(char::is_alphabetic) =>
        {
            head
        }
        _ => formatted,
    }
}

/// Merge the normalized cards of every locale into one card per identity
pub fn merge_cards(
    per_locale: &[(Language, Vec<NormalizedCard>)],
    options: MergeOptions,
) -> MergeOutcome {
    let indexes: Vec<(Language, HashMap<&str, &NormalizedCard>)> = per_locale
        .iter()
        .map(|(language, cards)| {
            let index = cards.iter().map(|card| (card.id.as_str(), card)).collect();
            (*language, index)
        })
        .collect();

    let all_ids: BTreeSet<&str> = indexes
        .iter()
        .flat_map(|(_, index)| index.keys().copied())
        .collect();

    let mut outcome = MergeOutcome::default();
    for id in all_ids {
        let partials: Vec<(Language, Option<&NormalizedCard>)> = indexes
            .iter()
            .map(|(language, index)| (*language, index.get(id).copied()))
            .collect();

        let (card, diagnostics) = fold_identity(id, &partials, options);
        outcome.diagnostics.extend(diagnostics);
        if let Some(card) = card {
            outcome.cards.insert(id.to_string(), card);
        }
    }

    log::info!(
        "Merged {} cards from {} languages ({} diagnostics)",
        outcome.cards.len(),
        per_locale.len(),
        outcome.diagnostics.len()
    );
    outcome
}

/// Fold one identity over its locale-tagged records, in locale order.
/// `None` in a slot means the locale did not report the card.
pub fn fold_identity(
    id: &str,
    partials: &[(Language, Option<&NormalizedCard>)],
    options: MergeOptions,
) -> (Option<CanonicalCard>, Vec<Diagnostic>) {
    let mut fold = CardFold::default();
    let mut report = Report {
        id,
        diagnostics: Vec::new(),
    };

    for (language, card) in partials {
        let Some(card) = card else {
            report.push(Diagnostic::MissingInLocale {
                id: id.to_string(),
                language: *language,
            });
            if options.skip_incomplete {
                report.push(Diagnostic::SkippedIncomplete { id: id.to_string() });
                return (None, report.diagnostics);
            }
            continue;
        };
        fold.absorb(*language, card, options.include_ownership, &mut report);
    }

    (fold.finish(id), report.diagnostics)
}

struct Report<'a> {
    id: &'a str,
    diagnostics: Vec<Diagnostic>,
}

impl Report<'_> {
    fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            log::warn!("{}", diagnostic);
        } else {
            log::debug!("{}", diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Set `slot` if empty, otherwise report a differing value
    fn set_once<T>(&mut self, slot: &mut Option<T>, value: T, field: &str, language: Language)
    where
        T: PartialEq + Clone + Into<Value>,
    {
        match slot {
            None => *slot = Some(value),
            Some(kept) if *kept == value => {}
            Some(kept) => self.push(Diagnostic::FieldMismatch {
                id: self.id.to_string(),
                field: field.to_string(),
                language,
                kept: kept.clone().into(),
                rejected: value.into(),
            }),
        }
    }
}

#[derive(Default)]
struct CardFold {
    contributed: bool,
    card_type: Option<String>,
    subtypes: Option<Vec<String>>,
    assets: Option<Value>,
    main_faction: Option<String>,
    rarity: Option<String>,
    foiled: Option<Value>,
    in_my_tradelist: Option<Value>,
    in_my_collection: Option<Value>,
    in_my_wantlist: Option<Value>,
    name: Localized,
    image_path: Localized,
    collector_number_formatted: Localized,
    collector_number_printed: Option<String>,
    elements: BTreeMap<String, CanonicalElement>,
}

impl CardFold {
    fn absorb(
        &mut self,
        language: Language,
        card: &NormalizedCard,
        include_ownership: bool,
        report: &mut Report,
    ) {
        self.contributed = true;

        report.set_once(&mut self.card_type, card.card_type.clone(), "type", language);
        report.set_once(&mut self.subtypes, card.subtypes.clone(), "subtypes", language);
        report.set_once(&mut self.assets, card.assets.clone(), "assets", language);
        report.set_once(
            &mut self.main_faction,
            card.main_faction.clone(),
            "mainFaction",
            language,
        );
        report.set_once(&mut self.rarity, card.rarity.clone(), "rarity", language);

        if include_ownership {
            let flags = [
                ("foiled", &mut self.foiled, &card.ownership.foiled),
                (
                    "inMyTradelist",
                    &mut self.in_my_tradelist,
                    &card.ownership.in_my_tradelist,
                ),
                (
                    "inMyCollection",
                    &mut self.in_my_collection,
                    &card.ownership.in_my_collection,
                ),
                (
                    "inMyWantlist",
                    &mut self.in_my_wantlist,
                    &card.ownership.in_my_wantlist,
                ),
            ];
            for (field, slot, value) in flags {
                match value {
                    Some(value) => report.set_once(slot, value.clone(), field, language),
                    None => report.push(Diagnostic::MissingField {
                        id: card.id.clone(),
                        field,
                        language,
                    }),
                }
            }
        }

        let locale = language.code().to_string();
        self.name.insert(locale.clone(), card.name.clone());
        self.image_path
            .insert(locale.clone(), card.image_path.clone());
        self.collector_number_formatted
            .insert(locale.clone(), card.collector_number_formatted.clone());

        let printed = printed_collector_number(&card.collector_number_formatted).to_string();
        report.set_once(
            &mut self.collector_number_printed,
            printed,
            "collectorNumberPrinted",
            language,
        );

        for (code, value) in &card.elements {
            self.absorb_element(&locale, language, code, value, report);
        }
    }

    fn absorb_element(
        &mut self,
        locale: &str,
        language: Language,
        code: &str,
        value: &ElementValue,
        report: &mut Report,
    ) {
        let field = format!("elements.{code}");
        match (self.elements.get_mut(code), value) {
            (None, ElementValue::Localized(text)) => {
                let texts = Localized::from([(locale.to_string(), text.clone())]);
                self.elements
                    .insert(code.to_string(), CanonicalElement::Localized(texts));
            }
            (None, ElementValue::Invariant(v)) => {
                self.elements
                    .insert(code.to_string(), CanonicalElement::Invariant(v.clone()));
            }
            (Some(CanonicalElement::Localized(texts)), ElementValue::Localized(text)) => {
                texts.insert(locale.to_string(), text.clone());
            }
            (Some(CanonicalElement::Invariant(kept)), ElementValue::Invariant(v)) => {
                if kept != v {
                    report.push(Diagnostic::FieldMismatch {
                        id: report.id.to_string(),
                        field,
                        language,
                        kept: kept.clone(),
                        rejected: v.clone(),
                    });
                }
            }
            // Roles come from the code name, so this only happens on corrupt input
            (Some(existing), other) => {
                let kept = match existing {
                    CanonicalElement::Localized(texts) => serde_json::to_value(&*texts),
                    CanonicalElement::Invariant(v) => Ok(v.clone()),
                };
                let rejected = serde_json::to_value(other);
                report.push(Diagnostic::FieldMismatch {
                    id: report.id.to_string(),
                    field,
                    language,
                    kept: kept.unwrap_or(Value::Null),
                    rejected: rejected.unwrap_or(Value::Null),
                });
            }
        }
    }

    fn finish(self, id: &str) -> Option<CanonicalCard> {
        if !self.contributed {
            return None;
        }

        Some(CanonicalCard {
            id: id.to_string(),
            card_type: self.card_type.unwrap_or_default(),
            subtypes: self.subtypes.unwrap_or_default(),
            assets: self.assets.unwrap_or(Value::Array(Vec::new())),
            main_faction: self.main_faction.unwrap_or_default(),
            rarity: self.rarity.unwrap_or_default(),
            ownership: Ownership {
                foiled: self.foiled,
                in_my_tradelist: self.in_my_tradelist,
                in_my_collection: self.in_my_collection,
                in_my_wantlist: self.in_my_wantlist,
            },
            name: self.name,
            image_path: self.image_path,
            collector_number_formatted: self.collector_number_formatted,
            collector_number_printed: self.collector_number_printed.unwrap_or_default(),
            elements: self.elements,
        })
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
