//! Run configuration: `config.toml`, command-line overrides and the token file

use crate::api::DEFAULT_BASE_URL;
use crate::collector::DEFAULT_MAX_RESTARTS;
use crate::error::{Result, SyncError};
use crate::filter::CategoryPolicy;
use crate::merge::MergeOptions;
use altered_common::Language;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Page size the Altered web client uses
pub const DEFAULT_ITEMS_PER_PAGE: usize = 36;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_TOKEN_FILE: &str = "secret_token.txt";

const ALL_FACTIONS: [&str; 7] = ["AX", "BR", "LY", "MU", "OR", "YZ", "NE"];

/// Settings of a harvesting run. Every key of `config.toml` is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Languages to fetch, in order. The first language reporting an
    /// invariant field decides its value.
    pub languages: Vec<Language>,
    /// Factions fetched one at a time; empty fetches the catalog unrestricted
    pub factions: Vec<String>,
    /// Rarity restriction; empty fetches every rarity
    pub rarities: Vec<String>,
    pub items_per_page: usize,
    pub dump_temp_files: bool,
    pub temp_folder: PathBuf,
    pub output_folder: PathBuf,
    pub skip_not_all_languages: bool,
    pub include_promo_cards: bool,
    pub include_kickstarter: bool,
    pub force_include_ks_uniques: bool,
    pub include_foilers: bool,
    /// With a token, only fetch cards from the user's collection
    pub only_load_collection: bool,
    /// With a token, overlay ownership flags on the catalog
    pub include_stats: bool,
    pub max_restarts: u32,
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: Language::all().to_vec(),
            factions: ALL_FACTIONS.iter().map(|f| f.to_string()).collect(),
            rarities: Vec::new(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            dump_temp_files: false,
            temp_folder: PathBuf::from("temp"),
            output_folder: PathBuf::from("results"),
            skip_not_all_languages: false,
            include_promo_cards: false,
            include_kickstarter: true,
            force_include_ks_uniques: false,
            include_foilers: false,
            only_load_collection: true,
            include_stats: true,
            max_restarts: DEFAULT_MAX_RESTARTS,
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(SyncError::Config("at least one language is required".into()));
        }
        for (i, language) in self.languages.iter().enumerate() {
            if self.languages[..i].contains(language) {
                return Err(SyncError::Config(format!(
                    "language {} is listed twice",
                    language
                )));
            }
        }
        if self.items_per_page == 0 {
            return Err(SyncError::Config("items_per_page must be positive".into()));
        }
        Ok(())
    }

    pub fn category_policy(&self) -> CategoryPolicy {
        CategoryPolicy {
            include_foilers: self.include_foilers,
            include_kickstarter: self.include_kickstarter,
            include_promo_cards: self.include_promo_cards,
            include_uniques: CategoryPolicy::uniques_requested(&self.rarities),
            force_include_ks_uniques: self.force_include_ks_uniques,
        }
    }

    /// Ownership flags are only merged when stats were actually fetched
    pub fn merge_options(&self, stats_loaded: bool) -> MergeOptions {
        MergeOptions {
            skip_incomplete: self.skip_not_all_languages,
            include_ownership: stats_loaded,
        }
    }

    pub fn temp_dump_folder(&self) -> Option<PathBuf> {
        self.dump_temp_files.then(|| self.temp_folder.clone())
    }
}

/// Read the authentication token. A missing or blank file means no token.
pub fn load_token(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        log::info!("No token file at {}, collection stats disabled", path.display());
        return Ok(None);
    }

    let token = std::fs::read_to_string(path)?.trim().to_string();
    if token.is_empty() {
        log::warn!("Token file {} is empty, collection stats disabled", path.display());
        return Ok(None);
    }
    Ok(Some(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.languages.len(), 5);
        assert_eq!(config.factions.len(), 7);
        assert_eq!(config.items_per_page, 36);
        assert!(config.include_kickstarter);
    }

    #[test]
    fn parses_overrides() {
        let config = Config::from_toml(
            r#"
            languages = ["fr", "en"]
            factions = []
            rarities = ["COMMON", "RARE"]
            skip_not_all_languages = true
            include_foilers = true
            output_folder = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.languages, vec![Language::French, Language::English]);
        assert!(config.factions.is_empty());
        assert!(config.skip_not_all_languages);
        assert_eq!(config.output_folder, PathBuf::from("out"));

        let policy = config.category_policy();
        assert!(policy.include_foilers);
        assert!(!policy.include_uniques);
    }

    #[test]
    fn rejects_unknown_language() {
        let result = Config::from_toml(r#"languages = ["en", "jp"]"#);
        assert!(matches!(result, Err(SyncError::Toml(_))));
    }

    #[test]
    fn rejects_duplicate_language_and_empty_pages() {
        assert!(matches!(
            Config::from_toml(r#"languages = ["en", "en"]"#),
            Err(SyncError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("items_per_page = 0"),
            Err(SyncError::Config(_))
        ));
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn token_is_trimmed_and_blank_means_none() {
        let mut token_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(token_file, "  Bearer abc.def  ").unwrap();
        assert_eq!(
            load_token(token_file.path()).unwrap(),
            Some("Bearer abc.def".to_string())
        );

        let blank = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(load_token(blank.path()).unwrap(), None);
        assert_eq!(load_token(Path::new("/nonexistent/token.txt")).unwrap(), None);
    }

    #[test]
    fn merge_options_follow_stats_and_skip_flag() {
        let config = Config {
            skip_not_all_languages: true,
            ..Config::default()
        };
        let options = config.merge_options(false);
        assert!(options.skip_incomplete);
        assert!(!options.include_ownership);
        assert!(config.merge_options(true).include_ownership);
    }
}
