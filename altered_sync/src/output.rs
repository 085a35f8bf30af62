//! JSON persistence: intermediate dumps and the final catalog documents

use crate::error::Result;
use crate::lookup::LookupTables;
use crate::merge::CanonicalCard;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const CARDS_FILE: &str = "cards.json";
pub const TYPES_FILE: &str = "types.json";
pub const SUBTYPES_FILE: &str = "subtypes.json";
pub const FACTIONS_FILE: &str = "factions.json";
pub const RARITIES_FILE: &str = "rarities.json";

/// Write `value` as indented UTF-8 JSON, creating parent directories.
/// The file is written next to its destination then renamed over it, so a
/// failed write never leaves a truncated document behind.
pub fn dump_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Read a JSON document written by [`dump_json`]
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Optional dumps of intermediate per-locale data, for debugging
pub struct TempDumps {
    folder: Option<PathBuf>,
}

impl TempDumps {
    pub fn new(folder: Option<PathBuf>) -> Self {
        Self { folder }
    }

    /// Write `<folder>/<name>.json` when dumps are enabled
    pub fn dump<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        match self.folder {
            Some(ref folder) => dump_json(value, &folder.join(format!("{name}.json"))),
            None => Ok(()),
        }
    }
}

/// Write the five catalog documents into `folder`, returning their paths
pub fn write_catalog(
    folder: &Path,
    cards: &BTreeMap<String, CanonicalCard>,
    lookups: &LookupTables,
) -> Result<Vec<PathBuf>> {
    let written = vec![
        write_document(folder, CARDS_FILE, cards)?,
        write_document(folder, TYPES_FILE, &lookups.types)?,
        write_document(folder, SUBTYPES_FILE, &lookups.subtypes)?,
        write_document(folder, FACTIONS_FILE, &lookups.factions)?,
        write_document(folder, RARITIES_FILE, &lookups.rarities)?,
    ];
    Ok(written)
}

fn write_document<T: Serialize + ?Sized>(folder: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    let path = folder.join(file_name);
    dump_json(value, &path)?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}
