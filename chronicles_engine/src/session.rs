//! Game session -- the active character paired with the loaded catalog.
//!
//! Engine functions take the character and catalog explicitly; a `GameSession`
//! owns both and forwards to them, so callers never juggle lookups.

use chronicles_data::{Catalog, Id, ItemDef, ItemKind};

use crate::character::Character;
use crate::combat::{Battle, enemy_for_level};
use crate::error::GameError;
use crate::inventory;
use crate::progression::Rewards;
use crate::quest;
use crate::save_files::SaveStore;

#[derive(Debug, Clone)]
pub struct GameSession {
    pub character: Character,
    pub catalog: Catalog,
}

impl GameSession {
    pub fn new(character: Character, catalog: Catalog) -> GameSession {
        GameSession { character, catalog }
    }

    /// Resume a saved character.
    ///
    /// # Errors
    /// Any [`SaveStore::load`] error.
    pub fn load(store: &SaveStore, name: &str, catalog: Catalog) -> Result<GameSession, GameError> {
        Ok(GameSession::new(store.load(name)?, catalog))
    }

    /// Persist the character.
    ///
    /// # Errors
    /// Any [`SaveStore::save`] error.
    pub fn save(&self, store: &SaveStore) -> Result<(), GameError> {
        store.save(&self.character).map(|_| ())
    }

    /// # Errors
    /// See [`quest::accept`].
    pub fn accept_quest(&mut self, quest_id: &str) -> Result<(), GameError> {
        quest::accept(&mut self.character, quest_id, &self.catalog)
    }

    /// # Errors
    /// See [`quest::complete`].
    pub fn complete_quest(&mut self, quest_id: &str) -> Result<Rewards, GameError> {
        quest::complete(&mut self.character, quest_id, &self.catalog)
    }

    /// # Errors
    /// See [`quest::abandon`].
    pub fn abandon_quest(&mut self, quest_id: &str) -> Result<(), GameError> {
        quest::abandon(&mut self.character, quest_id)
    }

    /// # Errors
    /// `ItemNotFound` if the item is not in the catalog, otherwise see [`inventory::purchase`].
    pub fn buy(&mut self, item_id: &str) -> Result<i64, GameError> {
        let item = lookup_item(&self.catalog, item_id)?;
        inventory::purchase(&mut self.character, item)
    }

    /// # Errors
    /// `ItemNotFound` if the item is not in the catalog, otherwise see [`inventory::sell`].
    pub fn sell(&mut self, item_id: &str) -> Result<i64, GameError> {
        let item = lookup_item(&self.catalog, item_id)?;
        inventory::sell(&mut self.character, item)
    }

    /// # Errors
    /// `ItemNotFound` if the item is not in the catalog, otherwise see [`inventory::use_item`].
    pub fn use_item(&mut self, item_id: &str) -> Result<String, GameError> {
        let item = lookup_item(&self.catalog, item_id)?;
        inventory::use_item(&mut self.character, item)
    }

    /// Equip a weapon or armor, choosing the slot from the item's kind.
    ///
    /// # Errors
    /// `ItemNotFound` if the item is not in the catalog, `ItemType` for consumables,
    /// otherwise see [`inventory::equip`].
    pub fn equip(&mut self, item_id: &str) -> Result<String, GameError> {
        let item = lookup_item(&self.catalog, item_id)?;
        match item.kind {
            ItemKind::Weapon => inventory::equip_weapon(&mut self.character, item, &self.catalog),
            ItemKind::Armor => inventory::equip_armor(&mut self.character, item, &self.catalog),
            ItemKind::Consumable => Err(GameError::ItemType {
                item_id: item.id.clone(),
                actual: item.kind,
                reason: "consumables cannot be equipped".into(),
            }),
        }
    }

    /// # Errors
    /// See [`inventory::unequip`].
    pub fn unequip_weapon(&mut self) -> Result<Option<Id>, GameError> {
        inventory::unequip_weapon(&mut self.character, &self.catalog)
    }

    /// # Errors
    /// See [`inventory::unequip`].
    pub fn unequip_armor(&mut self) -> Result<Option<Id>, GameError> {
        inventory::unequip_armor(&mut self.character, &self.catalog)
    }

    /// Start a battle against an enemy suited to the character's level.
    ///
    /// # Errors
    /// - `CharacterDead` if the character cannot fight
    pub fn encounter(&mut self) -> Result<Battle<'_>, GameError> {
        let enemy = enemy_for_level(self.character.level);
        Battle::new(&mut self.character, enemy)
    }
}

fn lookup_item<'a>(catalog: &'a Catalog, item_id: &str) -> Result<&'a ItemDef, GameError> {
    catalog.item(item_id).ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))
}
