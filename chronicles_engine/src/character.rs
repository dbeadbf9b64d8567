//! Character -- the player's persistent state record.
//!
//! A `Character` is created once per new game, mutated in place by the engine
//! modules for the whole session, and written to / read from a save file by
//! [`crate::save_files`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chronicles_data::{Id, is_valid_id};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Maximum number of occupied inventory slots.
pub const INVENTORY_CAPACITY: usize = 20;

/// Gold every new character starts with.
pub const STARTING_GOLD: i64 = 100;

/// Playable classes. Each class has fixed base stats and one special ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Starting vitals for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub health: i64,
    pub strength: i64,
    pub magic: i64,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Cleric,
    ];

    pub fn base_stats(self) -> BaseStats {
        let (health, strength, magic) = match self {
            CharacterClass::Warrior => (120, 15, 5),
            CharacterClass::Mage => (80, 8, 20),
            CharacterClass::Rogue => (90, 12, 10),
            CharacterClass::Cleric => (100, 10, 15),
        };
        BaseStats {
            health,
            strength,
            magic,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
        };
        f.write_str(label)
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidClass(s.to_string()))
    }
}

/// The player character.
///
/// Equipped items are not in `inventory`; their stat bonuses are already folded
/// into `strength`, `magic`, or `max_health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: i64,
    pub health: i64,
    pub max_health: i64,
    pub strength: i64,
    pub magic: i64,
    pub experience: i64,
    pub gold: i64,
    pub inventory: Vec<Id>,
    pub active_quests: Vec<Id>,
    pub completed_quests: Vec<Id>,
    pub equipped_weapon: Option<Id>,
    pub equipped_armor: Option<Id>,
}

impl Character {
    /// Create a level 1 character with the class's base stats.
    ///
    /// # Errors
    /// - `InvalidName` if the name is blank or contains characters that would break the save file
    pub fn new(name: &str, class: CharacterClass) -> Result<Character, GameError> {
        validate_name(name)?;
        let base = class.base_stats();
        info!("created {class} '{name}'");
        Ok(Character {
            name: name.to_string(),
            class,
            level: 1,
            health: base.health,
            max_health: base.health,
            strength: base.strength,
            magic: base.magic,
            experience: 0,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
        })
    }

    /// Create a character from a class name as typed by a player.
    ///
    /// # Errors
    /// - `InvalidClass` if `class` is not one of the four playable classes
    /// - `InvalidName` as for [`Character::new`]
    pub fn create(name: &str, class: &str) -> Result<Character, GameError> {
        let class = class.parse::<CharacterClass>()?;
        Character::new(name, class)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|id| id == item_id)
    }

    pub fn count_item(&self, item_id: &str) -> usize {
        self.inventory.iter().filter(|id| *id == item_id).count()
    }

    pub fn space_remaining(&self) -> usize {
        INVENTORY_CAPACITY.saturating_sub(self.inventory.len())
    }

    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= INVENTORY_CAPACITY
    }

    /// Reduce health, saturating at zero.
    pub fn take_damage(&mut self, amount: i64) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    /// Check every state invariant.
    ///
    /// # Errors
    /// - `InvalidCharacterData` naming the first violated invariant
    pub fn validate(&self) -> Result<(), GameError> {
        let fail = |msg: String| Err(GameError::InvalidCharacterData(msg));

        if validate_name(&self.name).is_err() {
            return fail(format!("invalid name '{}'", self.name));
        }
        if self.level < 1 {
            return fail(format!("level {} is below 1", self.level));
        }
        if self.max_health < 1 {
            return fail(format!("max health {} is below 1", self.max_health));
        }
        if !(0..=self.max_health).contains(&self.health) {
            return fail(format!("health {} outside 0..={}", self.health, self.max_health));
        }
        for (label, value) in [
            ("strength", self.strength),
            ("magic", self.magic),
            ("experience", self.experience),
            ("gold", self.gold),
        ] {
            if value < 0 {
                return fail(format!("{label} {value} is negative"));
            }
        }
        if self.inventory.len() > INVENTORY_CAPACITY {
            return fail(format!(
                "inventory holds {} items (capacity {INVENTORY_CAPACITY})",
                self.inventory.len()
            ));
        }
        let ids = self
            .inventory
            .iter()
            .chain(&self.active_quests)
            .chain(&self.completed_quests)
            .chain(&self.equipped_weapon)
            .chain(&self.equipped_armor);
        for id in ids {
            if !is_valid_id(id) {
                return fail(format!("invalid id '{id}'"));
            }
        }
        let active = unique_ids("active quests", &self.active_quests)?;
        let completed = unique_ids("completed quests", &self.completed_quests)?;
        if let Some(both) = active.intersection(&completed).next() {
            return fail(format!("quest '{both}' is both active and completed"));
        }
        Ok(())
    }
}

fn unique_ids<'a>(label: &str, ids: &'a [Id]) -> Result<HashSet<&'a str>, GameError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(GameError::InvalidCharacterData(format!("duplicate '{id}' in {label}")));
        }
    }
    Ok(seen)
}

fn validate_name(name: &str) -> Result<(), GameError> {
    let bad_char = |ch: char| ch.is_control() || matches!(ch, '/' | '\\' | ',' | ':');
    if name.trim().is_empty() || name.trim() != name || name.chars().any(bad_char) {
        return Err(GameError::InvalidName(name.to_string()));
    }
    Ok(())
}
