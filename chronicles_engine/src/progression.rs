//! Progression -- experience, leveling, healing, death and revival.
//!
//! Every path that grants experience ends up in [`gain_experience`], so after any
//! successful call `experience < level * XP_PER_LEVEL` holds.

use log::info;

use crate::character::Character;
use crate::error::GameError;

/// Experience needed per level: reaching level `n + 1` costs `n * XP_PER_LEVEL`.
pub const XP_PER_LEVEL: i64 = 100;
pub const LEVEL_UP_MAX_HEALTH: i64 = 10;
pub const LEVEL_UP_STRENGTH: i64 = 2;
pub const LEVEL_UP_MAGIC: i64 = 2;

/// Experience and gold credited by one reward, with the level-ups it caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rewards {
    pub xp: i64,
    pub gold: i64,
    pub levels_gained: u32,
}

/// Experience required to leave `level`.
pub fn xp_threshold(level: i64) -> i64 {
    level.saturating_mul(XP_PER_LEVEL)
}

/// Add experience and apply every level-up it pays for, returning how many occurred.
///
/// Each level-up uses the threshold of the level being left, raises max health,
/// strength and magic, and restores health to the new maximum.
///
/// # Errors
/// - `CharacterDead` if the character has no health left
/// - `NegativeAmount` if `amount < 0`
pub fn gain_experience(character: &mut Character, amount: i64) -> Result<u32, GameError> {
    if !character.is_alive() {
        return Err(GameError::CharacterDead(character.name.clone()));
    }
    if amount < 0 {
        return Err(GameError::NegativeAmount(amount));
    }

    character.experience = character.experience.saturating_add(amount);
    let mut levels_gained = 0;
    while character.experience >= xp_threshold(character.level) {
        character.experience -= xp_threshold(character.level);
        character.level += 1;
        character.max_health += LEVEL_UP_MAX_HEALTH;
        character.strength += LEVEL_UP_STRENGTH;
        character.magic += LEVEL_UP_MAGIC;
        character.health = character.max_health;
        levels_gained += 1;
        info!("{} reached level {}", character.name, character.level);
    }
    Ok(levels_gained)
}

/// Restore up to `amount` health without passing max health. Returns the health actually restored.
pub fn heal(character: &mut Character, amount: i64) -> i64 {
    let before = character.health;
    character.health = character
        .health
        .saturating_add(amount.max(0))
        .min(character.max_health);
    character.health - before
}

pub fn is_dead(character: &Character) -> bool {
    character.health <= 0
}

/// Bring a dead character back at half health. Returns false if the character was alive.
pub fn revive(character: &mut Character) -> bool {
    if character.is_alive() {
        return false;
    }
    // a 1 HP maximum would otherwise revive to 0
    character.health = (character.max_health / 2).max(1);
    info!("{} revived with {} health", character.name, character.health);
    true
}

/// Apply a gold change and return the new total.
///
/// # Errors
/// - `InsufficientGold` if the change would leave a negative balance
pub fn add_gold(character: &mut Character, delta: i64) -> Result<i64, GameError> {
    let total = character.gold.saturating_add(delta);
    if total < 0 {
        return Err(GameError::InsufficientGold {
            cost: delta.saturating_neg(),
            available: character.gold,
        });
    }
    character.gold = total;
    Ok(total)
}

/// Credit a quest or battle reward through the leveling rules.
///
/// # Errors
/// - `CharacterDead` if the character has no health left
/// - `NegativeAmount` if either amount is negative
pub fn grant_rewards(character: &mut Character, xp: i64, gold: i64) -> Result<Rewards, GameError> {
    if !character.is_alive() {
        return Err(GameError::CharacterDead(character.name.clone()));
    }
    if let Some(bad) = [xp, gold].into_iter().find(|amount| *amount < 0) {
        return Err(GameError::NegativeAmount(bad));
    }

    add_gold(character, gold)?;
    let levels_gained = gain_experience(character, xp)?;
    Ok(Rewards {
        xp,
        gold,
        levels_gained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn hero() -> Character {
        Character::new("Hero", CharacterClass::Warrior).unwrap()
    }

    #[test]
    fn two_hundred_fifty_xp_levels_once_and_carries_remainder() {
        let mut hero = hero();
        hero.health = 30;
        let gained = gain_experience(&mut hero, 250).unwrap();
        assert_eq!(gained, 1);
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 150);
        assert_eq!(hero.max_health, 130);
        assert_eq!(hero.health, 130);
        assert_eq!(hero.strength, 17);
        assert_eq!(hero.magic, 7);
    }

    #[test]
    fn large_grants_apply_every_level_in_sequence() {
        let mut hero = hero();
        // 100 + 200 + 300 = 600 to reach level 4
        let gained = gain_experience(&mut hero, 650).unwrap();
        assert_eq!(gained, 3);
        assert_eq!(hero.level, 4);
        assert_eq!(hero.experience, 50);
        assert_eq!(hero.max_health, 150);
        assert_eq!(hero.strength, 21);
        assert!(hero.experience < xp_threshold(hero.level));
    }

    #[test]
    fn threshold_behaviour_is_exact() {
        let mut hero = hero();
        assert_eq!(gain_experience(&mut hero, 0).unwrap(), 0);
        assert_eq!(hero.level, 1);

        assert_eq!(gain_experience(&mut hero, 100).unwrap(), 1);
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 0);

        assert_eq!(gain_experience(&mut hero, 199).unwrap(), 0);
        assert_eq!(hero.level, 2);
    }

    #[test]
    fn dead_characters_cannot_gain_experience() {
        let mut hero = hero();
        hero.health = 0;
        let before = hero.clone();
        assert!(matches!(gain_experience(&mut hero, 50), Err(GameError::CharacterDead(_))));
        assert!(matches!(grant_rewards(&mut hero, 50, 10), Err(GameError::CharacterDead(_))));
        assert_eq!(hero, before);
    }

    #[test]
    fn heal_clamps_and_reports_actual_amount() {
        let mut hero = hero();
        hero.health = 100;
        assert_eq!(heal(&mut hero, 50), 20);
        assert_eq!(hero.health, 120);
        assert_eq!(heal(&mut hero, 10), 0);
        assert_eq!(heal(&mut hero, -5), 0);
    }

    #[test]
    fn revive_only_affects_the_dead() {
        let mut hero = hero();
        assert!(!revive(&mut hero));
        assert_eq!(hero.health, 120);

        hero.health = 0;
        assert!(is_dead(&hero));
        assert!(revive(&mut hero));
        assert_eq!(hero.health, 60);

        let mut frail = hero.clone();
        frail.max_health = 1;
        frail.health = 0;
        assert!(revive(&mut frail));
        assert_eq!(frail.health, 1);
    }

    #[test]
    fn gold_never_goes_negative() {
        let mut hero = hero();
        assert_eq!(add_gold(&mut hero, -40).unwrap(), 60);
        assert!(matches!(
            add_gold(&mut hero, -61),
            Err(GameError::InsufficientGold { cost: 61, available: 60 })
        ));
        assert_eq!(hero.gold, 60);
    }

    #[test]
    fn rewards_go_through_leveling() {
        let mut hero = hero();
        let rewards = grant_rewards(&mut hero, 120, 30).unwrap();
        assert_eq!(
            rewards,
            Rewards {
                xp: 120,
                gold: 30,
                levels_gained: 1
            }
        );
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 20);
        assert_eq!(hero.gold, 130);

        assert!(matches!(grant_rewards(&mut hero, 10, -5), Err(GameError::NegativeAmount(-5))));
        assert_eq!(hero.gold, 130);
    }
}
