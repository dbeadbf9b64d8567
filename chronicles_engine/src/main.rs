#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Quest Chronicles **
//! Loads configuration and the catalog, then reports what is available.

use chronicles_engine::config::config_path;
use chronicles_engine::quest::validate_prerequisites;
use chronicles_engine::save_files::SaveFileStatus;
use chronicles_engine::{CHRONICLES_VERSION, load_config, load_or_create_catalog};

use anyhow::{Context, Result};
use log::{info, warn};

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: Quest Chronicles v{CHRONICLES_VERSION}");

    let config = load_config(&config_path());
    let catalog = load_or_create_catalog(&config.data_dir).context("while loading the catalog")?;
    validate_prerequisites(&catalog).context("while checking quest prerequisites")?;
    info!(
        "catalog ready: {} quests, {} items",
        catalog.quests.len(),
        catalog.items.len()
    );

    let store = config.save_store();
    let entries = store.entries().context("while listing saved characters")?;
    info!("{} saved characters in '{}'", entries.len(), store.root().display());
    for entry in entries {
        match entry.status {
            SaveFileStatus::Ready => info!(
                "  {} (level {} {})",
                entry.name,
                entry.level.unwrap_or_default(),
                entry.class.map(|class| class.to_string()).unwrap_or_default()
            ),
            SaveFileStatus::Corrupted { message } => warn!("  {} is unusable: {message}", entry.name),
        }
    }
    Ok(())
}
