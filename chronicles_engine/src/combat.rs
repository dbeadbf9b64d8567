//! Combat -- turn-based battles between a character and one enemy.
//!
//! Each round the player acts first, then the enemy. A battle starts
//! [`BattleState::Active`] and ends in victory, defeat, or escape. Random
//! outcomes (flee attempts, rogue critical strikes) draw from a caller-supplied
//! [`rand::Rng`].

pub mod enemy;
#[cfg(test)]
mod scripted_rng;

pub use enemy::{Enemy, EnemyKind, enemy_for_level};

use log::{debug, info};
use rand::Rng;
use variantly::Variantly;

use crate::character::{Character, CharacterClass};
use crate::error::GameError;
use crate::progression::{self, Rewards};

/// Chance that a flee attempt succeeds.
pub const FLEE_CHANCE: f64 = 0.5;
/// Chance that a rogue's critical strike lands.
pub const CRITICAL_STRIKE_CHANCE: f64 = 0.5;
/// Most health a cleric's heal restores.
pub const HEAL_LIMIT: i64 = 30;

/// Damage for a basic attack: attacker strength less a quarter of defender strength, never below 1.
pub fn calculate_damage(attacker_strength: i64, defender_strength: i64) -> i64 {
    (attacker_strength - defender_strength.div_euclid(4)).max(1)
}

/// Whether the character is able to start a battle.
pub fn can_fight(character: &Character) -> bool {
    character.is_alive()
}

/// Class-specific ability used by [`PlayerAction::Special`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAbility {
    /// Warrior: twice strength as damage.
    PowerStrike,
    /// Mage: twice magic as damage.
    Fireball,
    /// Rogue: even odds of triple strength as damage.
    CriticalStrike,
    /// Cleric: restore up to [`HEAL_LIMIT`] health.
    Heal,
}

impl CharacterClass {
    pub fn special_ability(self) -> SpecialAbility {
        match self {
            CharacterClass::Warrior => SpecialAbility::PowerStrike,
            CharacterClass::Mage => SpecialAbility::Fireball,
            CharacterClass::Rogue => SpecialAbility::CriticalStrike,
            CharacterClass::Cleric => SpecialAbility::Heal,
        }
    }
}

/// What the player does on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    Special,
    Flee,
    /// Anything unrecognized; the turn is wasted.
    Hesitate,
}

impl PlayerAction {
    /// Read a menu choice (`1`/`attack`, `2`/`special`, `3`/`flee`/`run`).
    pub fn parse(input: &str) -> PlayerAction {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "attack" => PlayerAction::Attack,
            "2" | "special" => PlayerAction::Special,
            "3" | "flee" | "run" => PlayerAction::Flee,
            _ => PlayerAction::Hesitate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Variantly)]
pub enum BattleState {
    Active,
    PlayerVictory,
    EnemyVictory,
    Escaped,
}

/// Something that happened during a round, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    PlayerAttack { damage: i64 },
    AbilityDamage { ability: SpecialAbility, damage: i64 },
    AbilityHeal { ability: SpecialAbility, healed: i64 },
    AbilityMissed { ability: SpecialAbility },
    FleeSucceeded,
    FleeFailed,
    Hesitated,
    EnemyAttack { damage: i64 },
    EnemyDefeated { rewards: Rewards },
    PlayerDefeated,
}

/// Result of one call to [`Battle::play_round`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub events: Vec<CombatEvent>,
    pub state: BattleState,
}

/// One encounter between a character and an enemy.
#[derive(Debug)]
pub struct Battle<'a> {
    character: &'a mut Character,
    enemy: Enemy,
    state: BattleState,
    round: u32,
}

impl<'a> Battle<'a> {
    /// Begin a battle.
    ///
    /// # Errors
    /// - `CharacterDead` if the character has no health left
    pub fn new(character: &'a mut Character, enemy: Enemy) -> Result<Battle<'a>, GameError> {
        if !can_fight(character) {
            return Err(GameError::CharacterDead(character.name.clone()));
        }
        info!("{} engages a {}", character.name, enemy.name);
        Ok(Battle {
            character,
            enemy,
            state: BattleState::Active,
            round: 1,
        })
    }

    pub fn character(&self) -> &Character {
        &*self.character
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Current round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Resolve the player's action and, unless the battle ended, the enemy's reply.
    ///
    /// Victory rewards are granted through the leveling rules.
    ///
    /// # Errors
    /// - `CombatNotActive` if the battle has already ended
    pub fn play_round<R: Rng + ?Sized>(&mut self, action: PlayerAction, rng: &mut R) -> Result<RoundReport, GameError> {
        if !self.state.is_active() {
            return Err(GameError::CombatNotActive);
        }
        let round = self.round;
        let mut events = Vec::new();

        match action {
            PlayerAction::Attack => {
                let damage = calculate_damage(self.character.strength, self.enemy.strength);
                self.enemy.take_damage(damage);
                events.push(CombatEvent::PlayerAttack { damage });
            },
            PlayerAction::Special => events.push(self.use_special(rng)),
            PlayerAction::Flee => {
                if rng.random_bool(FLEE_CHANCE) {
                    events.push(CombatEvent::FleeSucceeded);
                    self.state = BattleState::Escaped;
                    info!("{} fled from the {}", self.character.name, self.enemy.name);
                    return Ok(self.report(round, events));
                }
                events.push(CombatEvent::FleeFailed);
            },
            PlayerAction::Hesitate => events.push(CombatEvent::Hesitated),
        }

        if !self.enemy.is_alive() {
            events.push(self.win()?);
            return Ok(self.report(round, events));
        }

        let damage = calculate_damage(self.enemy.strength, self.character.strength);
        self.character.take_damage(damage);
        events.push(CombatEvent::EnemyAttack { damage });
        debug!(
            "round {round}: {} {}/{} vs {} {}/{}",
            self.character.name,
            self.character.health,
            self.character.max_health,
            self.enemy.name,
            self.enemy.health,
            self.enemy.max_health
        );

        if !self.character.is_alive() {
            events.push(CombatEvent::PlayerDefeated);
            self.state = BattleState::EnemyVictory;
            info!("{} was defeated by the {}", self.character.name, self.enemy.name);
        } else {
            self.round += 1;
        }
        Ok(self.report(round, events))
    }

    fn use_special<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CombatEvent {
        let ability = self.character.class.special_ability();
        let damage = match ability {
            SpecialAbility::PowerStrike => self.character.strength * 2,
            SpecialAbility::Fireball => self.character.magic * 2,
            SpecialAbility::CriticalStrike => {
                if !rng.random_bool(CRITICAL_STRIKE_CHANCE) {
                    return CombatEvent::AbilityMissed { ability };
                }
                self.character.strength * 3
            },
            SpecialAbility::Heal => {
                let healed = HEAL_LIMIT.min(self.character.max_health - self.character.health);
                let healed = progression::heal(self.character, healed);
                return CombatEvent::AbilityHeal { ability, healed };
            },
        };
        self.enemy.take_damage(damage);
        CombatEvent::AbilityDamage { ability, damage }
    }

    fn win(&mut self) -> Result<CombatEvent, GameError> {
        let rewards = progression::grant_rewards(self.character, self.enemy.xp_reward, self.enemy.gold_reward)?;
        self.state = BattleState::PlayerVictory;
        info!(
            "{} defeated the {} (+{} xp, +{} gold)",
            self.character.name, self.enemy.name, rewards.xp, rewards.gold
        );
        Ok(CombatEvent::EnemyDefeated { rewards })
    }

    fn report(&self, round: u32, events: Vec<CombatEvent>) -> RoundReport {
        RoundReport {
            round,
            events,
            state: self.state,
        }
    }
}

/// Play rounds until the battle ends, asking `choose` for each player action.
///
/// `choose` must eventually pick actions that can end the battle; a cleric
/// healing forever against a weak enemy never finishes.
///
/// # Errors
/// - `CombatNotActive` if the battle has already ended
pub fn run_battle<R, F>(battle: &mut Battle<'_>, rng: &mut R, mut choose: F) -> Result<Vec<RoundReport>, GameError>
where
    R: Rng + ?Sized,
    F: FnMut(&Battle<'_>) -> PlayerAction,
{
    if !battle.state().is_active() {
        return Err(GameError::CombatNotActive);
    }
    let mut reports = Vec::new();
    while battle.state().is_active() {
        let action = choose(battle);
        reports.push(battle.play_round(action, rng)?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::scripted_rng::Scripted;
    use super::*;

    fn hero(class: CharacterClass) -> Character {
        Character::new("Hero", class).unwrap()
    }

    #[test]
    fn damage_is_strength_less_quarter_defense() {
        assert_eq!(calculate_damage(15, 4), 14);
        assert_eq!(calculate_damage(15, 8), 13);
        assert_eq!(calculate_damage(8, 15), 5);
    }

    #[test]
    fn damage_never_drops_below_one() {
        assert_eq!(calculate_damage(1, 400), 1);
        assert_eq!(calculate_damage(0, 0), 1);
        assert_eq!(calculate_damage(-10, 1000), 1);
    }

    #[test]
    fn menu_choices_parse() {
        assert_eq!(PlayerAction::parse("1"), PlayerAction::Attack);
        assert_eq!(PlayerAction::parse(" Special "), PlayerAction::Special);
        assert_eq!(PlayerAction::parse("run"), PlayerAction::Flee);
        assert_eq!(PlayerAction::parse("dance"), PlayerAction::Hesitate);
    }

    #[test]
    fn dead_characters_cannot_start_battles() {
        let mut hero = hero(CharacterClass::Warrior);
        hero.health = 0;
        assert!(matches!(
            Battle::new(&mut hero, enemy_for_level(1)),
            Err(GameError::CharacterDead(_))
        ));
    }

    #[test]
    fn attack_round_trades_blows() {
        let mut hero = hero(CharacterClass::Warrior);
        let mut rng = Scripted::new(&[]);
        let mut battle = Battle::new(&mut hero, enemy_for_level(1)).unwrap();
        let report = battle.play_round(PlayerAction::Attack, &mut rng).unwrap();

        // warrior 15 vs goblin 8: 13 dealt; goblin 8 vs warrior 15: 5 taken
        assert_eq!(
            report.events,
            vec![CombatEvent::PlayerAttack { damage: 13 }, CombatEvent::EnemyAttack { damage: 5 }]
        );
        assert_eq!(report.round, 1);
        assert_eq!(report.state, BattleState::Active);
        assert_eq!(battle.round(), 2);
        assert_eq!(battle.enemy().health, 37);
        assert_eq!(battle.character().health, 115);
    }

    #[test]
    fn killing_blow_ends_the_round_and_pays_out() {
        let mut hero = hero(CharacterClass::Warrior);
        let mut rng = Scripted::new(&[]);
        let mut goblin = enemy_for_level(1);
        goblin.health = 10;
        let mut battle = Battle::new(&mut hero, goblin).unwrap();
        let report = battle.play_round(PlayerAction::Attack, &mut rng).unwrap();

        assert_eq!(report.state, BattleState::PlayerVictory);
        assert_eq!(report.events.len(), 2);
        assert!(matches!(
            report.events[1],
            CombatEvent::EnemyDefeated {
                rewards: Rewards { xp: 25, gold: 10, .. }
            }
        ));
        assert!(matches!(
            battle.play_round(PlayerAction::Attack, &mut rng),
            Err(GameError::CombatNotActive)
        ));
        drop(battle);
        assert_eq!(hero.health, 120);
        assert_eq!(hero.experience, 25);
        assert_eq!(hero.gold, 110);
    }

    #[test]
    fn successful_flee_skips_the_enemy_turn() {
        let mut hero = hero(CharacterClass::Mage);
        let mut rng = Scripted::new(&[true]);
        let mut battle = Battle::new(&mut hero, enemy_for_level(9)).unwrap();
        let report = battle.play_round(PlayerAction::Flee, &mut rng).unwrap();
        assert_eq!(report.events, vec![CombatEvent::FleeSucceeded]);
        assert!(battle.state().is_escaped());
        drop(battle);
        assert_eq!(hero.health, 80);
        assert_eq!(hero.gold, 100);
    }

    #[test]
    fn failed_flee_and_hesitation_let_the_enemy_act() {
        let mut hero = hero(CharacterClass::Mage);
        let mut rng = Scripted::new(&[false]);
        let mut battle = Battle::new(&mut hero, enemy_for_level(1)).unwrap();
        let report = battle.play_round(PlayerAction::Flee, &mut rng).unwrap();
        assert_eq!(report.events[0], CombatEvent::FleeFailed);
        assert!(matches!(report.events[1], CombatEvent::EnemyAttack { damage: 6 }));

        let report = battle.play_round(PlayerAction::Hesitate, &mut rng).unwrap();
        assert_eq!(report.events[0], CombatEvent::Hesitated);
        assert_eq!(report.round, 2);
        assert_eq!(battle.enemy().health, 50);
    }

    #[test]
    fn class_abilities_dispatch_by_variant() {
        let mut rng = Scripted::new(&[]);

        let mut warrior = hero(CharacterClass::Warrior);
        let mut battle = Battle::new(&mut warrior, enemy_for_level(9)).unwrap();
        let report = battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert_eq!(
            report.events[0],
            CombatEvent::AbilityDamage {
                ability: SpecialAbility::PowerStrike,
                damage: 30
            }
        );

        let mut mage = hero(CharacterClass::Mage);
        let mut battle = Battle::new(&mut mage, enemy_for_level(9)).unwrap();
        let report = battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert!(matches!(
            report.events[0],
            CombatEvent::AbilityDamage {
                ability: SpecialAbility::Fireball,
                damage: 40
            }
        ));
    }

    #[test]
    fn critical_strike_depends_on_the_roll() {
        let mut rng = Scripted::new(&[true, false]);
        let mut rogue = hero(CharacterClass::Rogue);
        let mut battle = Battle::new(&mut rogue, enemy_for_level(9)).unwrap();

        let hit = battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert!(matches!(hit.events[0], CombatEvent::AbilityDamage { damage: 36, .. }));
        let miss = battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert_eq!(
            miss.events[0],
            CombatEvent::AbilityMissed {
                ability: SpecialAbility::CriticalStrike
            }
        );
        assert_eq!(battle.enemy().health, 200 - 36);
    }

    #[test]
    fn cleric_heal_is_capped() {
        let mut rng = Scripted::new(&[]);
        let mut cleric = hero(CharacterClass::Cleric);
        cleric.health = 40;
        let mut battle = Battle::new(&mut cleric, enemy_for_level(1)).unwrap();
        let report = battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert!(matches!(report.events[0], CombatEvent::AbilityHeal { healed: 30, .. }));

        let mut topped = hero(CharacterClass::Cleric);
        topped.health = 95;
        let mut battle = Battle::new(&mut topped, enemy_for_level(1)).unwrap();
        let report = battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert!(matches!(report.events[0], CombatEvent::AbilityHeal { healed: 5, .. }));
    }

    #[test]
    fn losing_a_battle_leaves_the_character_dead() {
        let mut rng = Scripted::new(&[]);
        let mut mage = hero(CharacterClass::Mage);
        mage.health = 3;
        let mut battle = Battle::new(&mut mage, enemy_for_level(1)).unwrap();
        let reports = run_battle(&mut battle, &mut rng, |_| PlayerAction::Hesitate).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].events.last(), Some(&CombatEvent::PlayerDefeated));
        assert!(battle.state().is_enemy_victory());
        assert!(run_battle(&mut battle, &mut rng, |_| PlayerAction::Attack).is_err());
    }

    #[test]
    fn run_battle_fights_to_the_end() {
        let mut rng = Scripted::new(&[]);
        let mut warrior = hero(CharacterClass::Warrior);
        let mut battle = Battle::new(&mut warrior, enemy_for_level(1)).unwrap();
        let reports = run_battle(&mut battle, &mut rng, |_| PlayerAction::Attack).unwrap();
        // goblin has 50 health and takes 13 per hit
        assert_eq!(reports.len(), 4);
        assert!(battle.state().is_player_victory());
        drop(battle);
        assert_eq!(warrior.health, 120 - 3 * 5);
        assert_eq!(warrior.experience, 25);
    }
}
