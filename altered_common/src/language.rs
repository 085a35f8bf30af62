use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Languages the Altered API serves card text in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Language {
    English,
    French,
    Spanish,
    Italian,
    German,
}

impl Language {
    /// Returns the ISO 639-1 language code (e.g., "en", "de")
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::German => "de",
        }
    }

    /// Returns the locale expected by the API `locale` query parameter
    pub fn api_locale(&self) -> &'static str {
        match self {
            Language::English => "en-us",
            Language::French => "fr-fr",
            Language::Spanish => "es-es",
            Language::Italian => "it-it",
            Language::German => "de-de",
        }
    }

    /// Parse a language code (e.g., "en", "de") into a Language
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::English),
            "fr" => Some(Language::French),
            "es" => Some(Language::Spanish),
            "it" => Some(Language::Italian),
            "de" => Some(Language::German),
            _ => None,
        }
    }

    /// Parse an API locale (e.g., "fr-fr") into a Language
    pub fn from_api_locale(locale: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|lang| lang.api_locale().eq_ignore_ascii_case(locale.trim()))
    }

    /// Parse either a language code or an API locale
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_code(s).or_else(|| Self::from_api_locale(s))
    }

    /// Returns all supported languages, in the order the catalog is usually fetched
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::French,
            Language::Spanish,
            Language::Italian,
            Language::German,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unsupported language: {s}"))
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
