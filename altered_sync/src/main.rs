//! Altered Sync - Altered card catalog harvester
//!
//! Fetches every card in every configured language, reconciles them and
//! writes `cards.json` plus the four lookup tables.

use altered_common::Language;
use altered_sync::config::{load_token, DEFAULT_CONFIG_FILE, DEFAULT_TOKEN_FILE};
use altered_sync::output::CARDS_FILE;
use altered_sync::{harvest, publish, AlteredClient, Config, Result, SyncError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Altered card catalog harvester
#[derive(Parser, Debug)]
#[command(name = "altered_sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (defaults apply when it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// File holding the Altered authentication token
    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and reconcile the catalog (default)
    Harvest(HarvestArgs),
    /// Put every unique card of a harvested catalog on your tradelist
    PublishUniques {
        /// Catalog to read (default: <output_folder>/cards.json)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct HarvestArgs {
    /// Output folder for the catalog documents
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comma-separated languages, in priority order (e.g. en,fr)
    #[arg(long, value_delimiter = ',')]
    languages: Vec<Language>,

    /// Drop cards that are missing from any language
    #[arg(long, default_value_t = false)]
    skip_incomplete: bool,

    /// Dump intermediate per-language data to the temp folder
    #[arg(long, default_value_t = false)]
    dump_temp: bool,

    /// Do not fetch collection stats even when a token is present
    #[arg(long, default_value_t = false)]
    no_stats: bool,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(&cli.config)?;
    let token = load_token(&cli.token_file)?;

    match cli.command.unwrap_or(Command::Harvest(HarvestArgs::default())) {
        Command::Harvest(overrides) => {
            apply_overrides(&mut config, overrides);
            run_harvest(&config, token)
        }
        Command::PublishUniques { catalog } => {
            let token = token.ok_or_else(|| SyncError::MissingToken(cli.token_file.clone()))?;
            let catalog = catalog.unwrap_or_else(|| config.output_folder.join(CARDS_FILE));
            let client = AlteredClient::new(&config.api_base_url, Some(token))?;
            let count = publish::publish_uniques(&client, &catalog)?;
            log::info!("Published {} unique cards to the tradelist", count);
            Ok(())
        }
    }
}

fn apply_overrides(config: &mut Config, overrides: HarvestArgs) {
    if let Some(output) = overrides.output {
        config.output_folder = output;
    }
    if !overrides.languages.is_empty() {
        config.languages = overrides.languages;
    }
    if overrides.skip_incomplete {
        config.skip_not_all_languages = true;
    }
    if overrides.dump_temp {
        config.dump_temp_files = true;
    }
    if overrides.no_stats {
        config.include_stats = false;
    }
}

fn run_harvest(config: &Config, token: Option<String>) -> Result<()> {
    log::info!(
        "Harvesting {} language(s): {}",
        config.languages.len(),
        config
            .languages
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let client = AlteredClient::new(&config.api_base_url, token)?
        .with_only_load_collection(config.only_load_collection);
    let result = harvest(&client, config, client.is_authenticated())?;

    let warnings = result.warning_count();
    if warnings > 0 {
        log::warn!("{} consistency warnings, see log above", warnings);
    }

    result.write(&config.output_folder)?;
    log::info!(
        "Harvest completed: {} cards written to {}",
        result.cards.len(),
        config.output_folder.display()
    );
    Ok(())
}
