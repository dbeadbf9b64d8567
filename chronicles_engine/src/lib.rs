#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! Character, save, and rule engines for the Quest Chronicles text RPG.

pub const CHRONICLES_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod character;
pub mod combat;
pub mod config;
pub mod data_paths;
pub mod error;
pub mod inventory;
pub mod loader;
pub mod progression;
pub mod quest;
pub mod save_files;
pub mod session;

// Re-exports for convenience
pub use character::{Character, CharacterClass};
pub use combat::{Battle, BattleState, CombatEvent, Enemy, EnemyKind, PlayerAction, run_battle};
pub use config::{GameConfig, load_config};
pub use error::GameError;
pub use loader::{load_catalog, load_or_create_catalog};
pub use progression::Rewards;
pub use save_files::SaveStore;
pub use session::GameSession;
