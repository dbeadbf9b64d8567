//! Inventory & equipment -- bounded item slots, consumables, gear, and the shop.
//!
//! Equipped items leave the inventory and their effect is folded into the
//! character's stats; unequipping reverses the effect exactly.

use chronicles_data::{Catalog, Effect, Id, ItemDef, ItemKind, Stat, is_valid_id};
use log::info;

use crate::character::{Character, INVENTORY_CAPACITY};
use crate::error::GameError;

/// The two equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

impl EquipSlot {
    /// Item kind accepted by this slot.
    pub fn kind(self) -> ItemKind {
        match self {
            EquipSlot::Weapon => ItemKind::Weapon,
            EquipSlot::Armor => ItemKind::Armor,
        }
    }

    fn get(self, character: &Character) -> Option<&Id> {
        match self {
            EquipSlot::Weapon => character.equipped_weapon.as_ref(),
            EquipSlot::Armor => character.equipped_armor.as_ref(),
        }
    }

    fn get_mut(self, character: &mut Character) -> &mut Option<Id> {
        match self {
            EquipSlot::Weapon => &mut character.equipped_weapon,
            EquipSlot::Armor => &mut character.equipped_armor,
        }
    }
}

/// Put one copy of `item_id` into the first free slot.
///
/// # Errors
/// - `InventoryFull` if every slot is taken
/// - `InvalidCharacterData` if the id could not be written to a save file
pub fn add_item(character: &mut Character, item_id: &str) -> Result<(), GameError> {
    if !is_valid_id(item_id) {
        return Err(GameError::InvalidCharacterData(format!("invalid item id '{item_id}'")));
    }
    if character.inventory_full() {
        return Err(GameError::InventoryFull(INVENTORY_CAPACITY));
    }
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Remove exactly one copy of `item_id`.
///
/// # Errors
/// - `ItemNotFound` if the character does not carry the item
pub fn remove_item(character: &mut Character, item_id: &str) -> Result<(), GameError> {
    let pos = character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    character.inventory.remove(pos);
    Ok(())
}

/// Empty the inventory, returning what was in it.
pub fn clear_inventory(character: &mut Character) -> Vec<Id> {
    std::mem::take(&mut character.inventory)
}

/// Consume one copy of a consumable and apply its effect. Returns a summary of what happened.
///
/// Health effects are clamped to `0..=max_health`.
///
/// # Errors
/// - `ItemNotFound` if the character does not carry the item
/// - `ItemType` if the item is not a consumable
/// - `StatOutOfRange` if the effect would push a stat out of its valid range
pub fn use_item(character: &mut Character, item: &ItemDef) -> Result<String, GameError> {
    if !character.has_item(&item.id) {
        return Err(GameError::ItemNotFound(item.id.clone()));
    }
    if item.kind != ItemKind::Consumable {
        return Err(GameError::ItemType {
            item_id: item.id.clone(),
            actual: item.kind,
            reason: "only consumables can be used".into(),
        });
    }

    let mut staged = character.clone();
    let change = apply_effect(&mut staged, item.effect)?;
    remove_item(&mut staged, &item.id)?;
    *character = staged;

    info!("{} used '{}' ({} {change:+})", character.name, item.id, item.effect.stat);
    Ok(format!("Used {} ({} {change:+})", item.name, item.effect.stat))
}

/// Equip a weapon from the inventory, swapping out any weapon already held.
///
/// # Errors
/// See [`equip`].
pub fn equip_weapon(character: &mut Character, item: &ItemDef, catalog: &Catalog) -> Result<String, GameError> {
    equip(character, item, catalog, EquipSlot::Weapon)
}

/// Equip armor from the inventory, swapping out any armor already worn.
///
/// # Errors
/// See [`equip`].
pub fn equip_armor(character: &mut Character, item: &ItemDef, catalog: &Catalog) -> Result<String, GameError> {
    equip(character, item, catalog, EquipSlot::Armor)
}

/// Move `item` from the inventory into `slot` and apply its bonus.
///
/// An occupied slot is emptied first, which needs a free inventory slot even
/// though the new item frees one afterwards. Raising max health does not
/// change current health. On any error the character is unchanged.
///
/// # Errors
/// - `ItemNotFound` if the item is not carried, or the currently equipped item is not in `catalog`
/// - `ItemType` if the item does not fit the slot or its effect targets current health
/// - `InventoryFull` if the slot is occupied and there is no room to return the old item
/// - `StatOutOfRange` if a bonus change would push a stat out of its valid range
pub fn equip(character: &mut Character, item: &ItemDef, catalog: &Catalog, slot: EquipSlot) -> Result<String, GameError> {
    if !character.has_item(&item.id) {
        return Err(GameError::ItemNotFound(item.id.clone()));
    }
    check_equipment(item, slot)?;

    let mut staged = character.clone();
    let previous = unequip(&mut staged, catalog, slot)?;
    apply_bonus(&mut staged, item.effect)?;
    remove_item(&mut staged, &item.id)?;
    *slot.get_mut(&mut staged) = Some(item.id.clone());
    *character = staged;

    if let Some(previous) = previous {
        info!("{} swapped '{previous}' for '{}'", character.name, item.id);
    } else {
        info!("{} equipped '{}'", character.name, item.id);
    }
    Ok(format!("Equipped {} ({})", item.name, item.effect))
}

/// Return the equipped weapon to the inventory. `Ok(None)` if no weapon is equipped.
///
/// # Errors
/// See [`unequip`].
pub fn unequip_weapon(character: &mut Character, catalog: &Catalog) -> Result<Option<Id>, GameError> {
    unequip(character, catalog, EquipSlot::Weapon)
}

/// Return the equipped armor to the inventory. `Ok(None)` if no armor is worn.
///
/// # Errors
/// See [`unequip`].
pub fn unequip_armor(character: &mut Character, catalog: &Catalog) -> Result<Option<Id>, GameError> {
    unequip(character, catalog, EquipSlot::Armor)
}

/// Empty `slot`, reversing its bonus and putting the item back in the inventory.
///
/// Health is clamped if max health drops below it.
///
/// # Errors
/// - `InventoryFull` if there is no free slot for the item
/// - `ItemNotFound` if the equipped item is not in `catalog`
/// - `StatOutOfRange` if removing the bonus would push a stat out of range
pub fn unequip(character: &mut Character, catalog: &Catalog, slot: EquipSlot) -> Result<Option<Id>, GameError> {
    let Some(item_id) = slot.get(character).cloned() else {
        return Ok(None);
    };
    if character.inventory_full() {
        return Err(GameError::InventoryFull(INVENTORY_CAPACITY));
    }
    let item = catalog
        .item(&item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.clone()))?;

    let reversed = Effect {
        stat: item.effect.stat,
        amount: -item.effect.amount,
    };
    apply_bonus(character, reversed)?;
    character.inventory.push(item_id.clone());
    *slot.get_mut(character) = None;
    Ok(Some(item_id))
}

/// Buy one copy of `item`, returning the gold left.
///
/// # Errors
/// - `InsufficientGold` if the character cannot afford the item
/// - `InventoryFull` if there is no free slot
pub fn purchase(character: &mut Character, item: &ItemDef) -> Result<i64, GameError> {
    if character.gold < item.cost {
        return Err(GameError::InsufficientGold {
            cost: item.cost,
            available: character.gold,
        });
    }
    if character.inventory_full() {
        return Err(GameError::InventoryFull(INVENTORY_CAPACITY));
    }
    add_item(character, &item.id)?;
    character.gold -= item.cost;
    info!("{} bought '{}' for {} gold", character.name, item.id, item.cost);
    Ok(character.gold)
}

/// Sell one copy of `item` for half its cost (rounded down), returning the price paid.
///
/// # Errors
/// - `ItemNotFound` if the character does not carry the item
pub fn sell(character: &mut Character, item: &ItemDef) -> Result<i64, GameError> {
    remove_item(character, &item.id)?;
    let price = item.sell_price();
    character.gold += price;
    info!("{} sold '{}' for {price} gold", character.name, item.id);
    Ok(price)
}

fn check_equipment(item: &ItemDef, slot: EquipSlot) -> Result<(), GameError> {
    let reason = if item.kind != slot.kind() {
        format!("not {}", slot.kind())
    } else if item.effect.stat == Stat::Health {
        "equipment cannot modify current health".to_string()
    } else {
        return Ok(());
    };
    Err(GameError::ItemType {
        item_id: item.id.clone(),
        actual: item.kind,
        reason,
    })
}

/// Apply a consumable effect, returning the change actually made to the stat.
fn apply_effect(character: &mut Character, effect: Effect) -> Result<i64, GameError> {
    if effect.stat == Stat::Health {
        let before = character.health;
        character.health = character
            .health
            .saturating_add(effect.amount)
            .clamp(0, character.max_health);
        return Ok(character.health - before);
    }
    apply_bonus(character, effect)?;
    Ok(effect.amount)
}

/// Shift strength, magic, or max health, keeping each in range.
fn apply_bonus(character: &mut Character, effect: Effect) -> Result<(), GameError> {
    let out_of_range = || GameError::StatOutOfRange {
        stat: effect.stat,
        amount: effect.amount,
    };
    let (field, min) = match effect.stat {
        Stat::Strength => (&mut character.strength, 0),
        Stat::Magic => (&mut character.magic, 0),
        Stat::MaxHealth => (&mut character.max_health, 1),
        Stat::Health => return Err(out_of_range()),
    };
    let value = field.checked_add(effect.amount).ok_or_else(out_of_range)?;
    if value < min {
        return Err(out_of_range());
    }
    *field = value;
    character.health = character.health.min(character.max_health);
    Ok(())
}
