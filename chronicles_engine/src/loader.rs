//! Loader utilities for building a `Catalog` from the plain-text data files.
//!
//! Quests live in `quests.txt` and items in `items.txt` inside the data directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chronicles_data::{Catalog, ValidationError, parse_items, parse_quests, validate_catalog};
use log::info;

pub const QUESTS_FILE: &str = "quests.txt";
pub const ITEMS_FILE: &str = "items.txt";

const DEFAULT_QUESTS: &str = "\
QUEST_ID: starter_quest
TITLE: First Steps
DESCRIPTION: Begin your journey.
REWARD_XP: 50
REWARD_GOLD: 20
REQUIRED_LEVEL: 1
PREREQUISITE: NONE
";

const DEFAULT_ITEMS: &str = "\
ITEM_ID: potion_small
NAME: Small Health Potion
TYPE: consumable
EFFECT: health:20
COST: 10
DESCRIPTION: Restores a small amount of health.
";

/// Load and validate the quest and item catalogs in `data_dir`.
///
/// # Errors
/// Errors bubble up from file IO or record parsing; validation problems are
/// aggregated into one error listing all of them.
pub fn load_catalog(data_dir: &Path) -> Result<Catalog> {
    let quests_path = data_dir.join(QUESTS_FILE);
    let items_path = data_dir.join(ITEMS_FILE);

    let quest_text = fs::read_to_string(&quests_path)
        .with_context(|| format!("reading quest catalog from '{}'", quests_path.display()))?;
    let quests =
        parse_quests(&quest_text).with_context(|| format!("parsing quest catalog '{}'", quests_path.display()))?;

    let item_text = fs::read_to_string(&items_path)
        .with_context(|| format!("reading item catalog from '{}'", items_path.display()))?;
    let items = parse_items(&item_text).with_context(|| format!("parsing item catalog '{}'", items_path.display()))?;

    let (catalog, mut errors) = Catalog::from_defs(quests, items);
    errors.extend(validate_catalog(&catalog));
    check_errors(errors)?;

    info!("{} quests loaded from '{}'", catalog.quests.len(), quests_path.display());
    info!("{} items loaded from '{}'", catalog.items.len(), items_path.display());
    Ok(catalog)
}

/// Write the starter quest and item files into `data_dir` unless they already exist.
///
/// # Errors
/// Returns an error if the directory or a file cannot be written.
pub fn create_default_data_files(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir).with_context(|| format!("creating data directory '{}'", data_dir.display()))?;
    for (file, contents) in [(QUESTS_FILE, DEFAULT_QUESTS), (ITEMS_FILE, DEFAULT_ITEMS)] {
        let path = data_dir.join(file);
        if path.exists() {
            continue;
        }
        fs::write(&path, contents).with_context(|| format!("writing default data to '{}'", path.display()))?;
        info!("created default data file '{}'", path.display());
    }
    Ok(())
}

/// Load the catalog, first creating the default files if either is missing.
///
/// # Errors
/// See [`create_default_data_files`] and [`load_catalog`].
pub fn load_or_create_catalog(data_dir: &Path) -> Result<Catalog> {
    if !data_dir.join(QUESTS_FILE).exists() || !data_dir.join(ITEMS_FILE).exists() {
        create_default_data_files(data_dir)?;
    }
    load_catalog(data_dir)
}

/// Turn collected validation errors into a single aggregated error.
fn check_errors(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("catalog validation failed:\n{details}");
}
