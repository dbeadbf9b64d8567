//! Runtime configuration loaded from `chronicles.toml`.
//!
//! Every field is optional in the file. A missing or unreadable file is not an
//! error: the detected defaults are used and a warning is logged.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use crate::data_paths::data_root;
use crate::save_files::SaveStore;

pub const CONFIG_FILE: &str = "chronicles.toml";
/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "CHRONICLES_CONFIG";
pub const SAVE_DIR_NAME: &str = "save_games";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Directory holding `quests.txt` and `items.txt`.
    pub data_dir: PathBuf,
    /// Directory holding `<name>_save.txt` files.
    pub save_dir: PathBuf,
}

/// On-disk form; absent keys fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    save_dir: Option<PathBuf>,
}

impl GameConfig {
    /// Configuration rooted at `data_dir`, saving into its `save_games` subdirectory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> GameConfig {
        let data_dir = data_dir.into();
        GameConfig {
            save_dir: data_dir.join(SAVE_DIR_NAME),
            data_dir,
        }
    }

    pub fn save_store(&self) -> SaveStore {
        SaveStore::new(&self.save_dir)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::with_data_dir(data_root())
    }
}

/// Path of the config file: `$CHRONICLES_CONFIG` if set, else `chronicles.toml`.
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
}

/// Load configuration from `path`, falling back to defaults on error.
///
/// This function never fails.
pub fn load_config(path: &Path) -> GameConfig {
    match try_load_config(path) {
        Ok(config) => {
            info!("configuration loaded from '{}'", path.display());
            config
        },
        Err(e) => {
            warn!("Could not load configuration from '{}': {e:#}. Using defaults.", path.display());
            GameConfig::default()
        },
    }
}

fn try_load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading configuration from '{}'", path.display()))?;
    let file: ConfigFile =
        toml::from_str(&text).with_context(|| format!("parsing configuration from '{}'", path.display()))?;

    let mut config = file.data_dir.map_or_else(GameConfig::default, GameConfig::with_data_dir);
    if let Some(save_dir) = file.save_dir {
        config.save_dir = save_dir;
    }
    Ok(config)
}
