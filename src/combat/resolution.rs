//! Battle resolution
//!
//! Both sides roll at once: every unit throws one die per point of attack
//! (or defense) and scores a hit on a roll at or below its kind's threshold.
//! Hits become casualties on the other side, cheapest unit first with ties
//! going to the lowest unit id. A side with no strength throws nothing.

use serde::{Deserialize, Serialize};

use crate::combat::dice::{DiceRoller, SeededDice};
use crate::core::config::RulesConfig;
use crate::core::error::{ConquestError, Result};
use crate::core::types::{PlayerId, TerritoryId, UnitId};
use crate::game::state::{GameState, PendingBattle};
use crate::units::{attack_strength, defense_strength, Unit};

/// Dice and casualties of one exchange, before anything is applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    pub attack_dice: u32,
    pub defense_dice: u32,
    pub attacker_hits: u32,
    pub defender_hits: u32,
    /// Attacking units removed by defender hits
    pub attacker_casualties: Vec<UnitId>,
    /// Defending units removed by attacker hits
    pub defender_casualties: Vec<UnitId>,
}

/// What happened in a resolved battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    pub territory: TerritoryId,
    pub attacker: PlayerId,
    pub defender: Option<PlayerId>,
    pub attack_strength: u32,
    pub defense_strength: u32,
    pub attack_dice: u32,
    pub defense_dice: u32,
    pub attacker_hits: u32,
    pub defender_hits: u32,
    pub attacker_losses: Vec<UnitId>,
    pub defender_losses: Vec<UnitId>,
    /// Attacking units still alive after the exchange
    pub survivors: Vec<UnitId>,
    pub captured: bool,
}

/// Choose which units die: cheapest first, then lowest id
pub fn select_casualties(units: &[Unit], hits: u32) -> Vec<UnitId> {
    let mut order: Vec<&Unit> = units.iter().collect();
    order.sort_by_key(|u| (u.cost(), u.id));
    order
        .into_iter()
        .take(hits as usize)
        .map(|u| u.id)
        .collect()
}

pub struct CombatEngine {
    rules: RulesConfig,
    dice: Box<dyn DiceRoller>,
}

impl CombatEngine {
    pub fn new(rules: RulesConfig, dice: impl DiceRoller + 'static) -> Self {
        Self { rules, dice: Box::new(dice) }
    }

    pub fn seeded(rules: RulesConfig, seed: u64) -> Self {
        Self::new(rules, SeededDice::new(seed))
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Roll `dice_per_unit(unit)` dice for each unit; returns (dice, hits)
    fn roll_side(&mut self, units: &[Unit], dice_per_unit: fn(&Unit) -> u32) -> (u32, u32) {
        let mut ordered: Vec<&Unit> = units.iter().collect();
        ordered.sort_by_key(|u| u.id);

        let sides = self.rules.die_sides;
        let mut dice = 0;
        let mut hits = 0;
        for unit in ordered {
            let threshold = self.rules.threshold_for(unit.kind);
            for _ in 0..dice_per_unit(unit) {
                dice += 1;
                if self.dice.roll(sides) <= threshold {
                    hits += 1;
                }
            }
        }
        (dice, hits)
    }

    /// Roll one exchange between two unit groups
    ///
    /// Against an empty defending side nothing is rolled.
    pub fn exchange(&mut self, attackers: &[Unit], defenders: &[Unit]) -> Exchange {
        if attackers.is_empty() || defenders.is_empty() {
            return Exchange::default();
        }

        let (attack_dice, attacker_hits) = self.roll_side(attackers, Unit::attack);
        let (defense_dice, defender_hits) = self.roll_side(defenders, Unit::defense);

        Exchange {
            attack_dice,
            defense_dice,
            attacker_hits,
            defender_hits,
            attacker_casualties: select_casualties(attackers, defender_hits),
            defender_casualties: select_casualties(defenders, attacker_hits),
        }
    }

    /// Resolve a committed battle against the territory's current garrison
    ///
    /// Defender casualties leave the garrison. If the garrison is wiped out,
    /// ownership transfers and the surviving attackers (possibly none)
    /// become the new garrison; otherwise the survivors return to the
    /// territories they were committed from.
    pub fn resolve_battle(&mut self, state: &mut GameState, battle: PendingBattle) -> Result<CombatReport> {
        let territory = state
            .board()
            .territory(battle.territory)
            .ok_or(ConquestError::TerritoryNotFound(battle.territory))?;
        let defender = territory.owner();
        let defenders = territory.garrison().to_vec();
        let attackers: Vec<Unit> = battle.units().copied().collect();

        let exchange = self.exchange(&attackers, &defenders);

        if let Some(record) = state.board_mut().territory_mut(battle.territory) {
            for id in &exchange.defender_casualties {
                record.remove_unit(*id);
            }
        }

        let (lost, surviving): (Vec<_>, Vec<_>) = battle
            .committed
            .into_iter()
            .partition(|c| exchange.attacker_casualties.contains(&c.unit.id));
        debug_assert_eq!(lost.len(), exchange.attacker_casualties.len());

        let garrison_left = state
            .board()
            .territory(battle.territory)
            .map_or(0, |t| t.garrison().len());
        let captured = garrison_left == 0;
        let survivors: Vec<UnitId> = surviving.iter().map(|c| c.unit.id).collect();

        if captured {
            state.transfer_territory(battle.territory, Some(battle.attacker))?;
            if let Some(record) = state.board_mut().territory_mut(battle.territory) {
                for committed in &surviving {
                    record.add_unit(committed.unit);
                }
            }
        } else {
            state.return_to_origin(surviving);
        }

        let report = CombatReport {
            territory: battle.territory,
            attacker: battle.attacker,
            defender,
            attack_strength: attack_strength(&attackers),
            defense_strength: defense_strength(&defenders),
            attack_dice: exchange.attack_dice,
            defense_dice: exchange.defense_dice,
            attacker_hits: exchange.attacker_hits,
            defender_hits: exchange.defender_hits,
            attacker_losses: exchange.attacker_casualties,
            defender_losses: exchange.defender_casualties,
            survivors,
            captured,
        };

        tracing::info!(
            territory = %report.territory,
            attacker = %report.attacker,
            attacker_hits = report.attacker_hits,
            defender_hits = report.defender_hits,
            captured = report.captured,
            "battle resolved"
        );

        Ok(report)
    }
}

impl std::fmt::Debug for CombatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEngine").field("rules", &self.rules).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::ScriptedDice;
    use crate::units::UnitKind;

    fn unit(id: u64, kind: UnitKind, owner: u32) -> Unit {
        Unit::new(UnitId(id), kind, PlayerId(owner))
    }

    #[test]
    fn test_casualties_cheapest_then_lowest_id() {
        let units = vec![
            unit(5, UnitKind::Tank, 1),
            unit(9, UnitKind::Infantry, 1),
            unit(2, UnitKind::Infantry, 1),
        ];
        assert_eq!(select_casualties(&units, 2), vec![UnitId(2), UnitId(9)]);
        assert_eq!(select_casualties(&units, 10).len(), 3);
        assert!(select_casualties(&units, 0).is_empty());
    }

    #[test]
    fn test_all_hits() {
        let mut engine = CombatEngine::new(RulesConfig::default(), ScriptedDice::always(1));
        let attackers = vec![unit(1, UnitKind::Tank, 1)];
        let defenders = vec![unit(2, UnitKind::Infantry, 2)];

        let exchange = engine.exchange(&attackers, &defenders);
        assert_eq!(exchange.attack_dice, 3);
        assert_eq!(exchange.defense_dice, 2);
        assert_eq!(exchange.attacker_hits, 3);
        assert_eq!(exchange.defender_hits, 2);
        assert_eq!(exchange.defender_casualties, vec![UnitId(2)]);
        assert_eq!(exchange.attacker_casualties, vec![UnitId(1)]);
    }

    #[test]
    fn test_all_misses() {
        let mut engine = CombatEngine::new(RulesConfig::default(), ScriptedDice::always(6));
        let exchange = engine.exchange(&[unit(1, UnitKind::Tank, 1)], &[unit(2, UnitKind::Infantry, 2)]);
        assert_eq!(exchange.attacker_hits, 0);
        assert_eq!(exchange.defender_hits, 0);
        assert!(exchange.attacker_casualties.is_empty());
    }

    #[test]
    fn test_zero_defense_rolls_nothing() {
        let mut engine = CombatEngine::new(RulesConfig::default(), ScriptedDice::always(1));
        let exchange = engine.exchange(&[unit(1, UnitKind::Tank, 1)], &[]);
        assert_eq!(exchange, Exchange::default());
    }

    #[test]
    fn test_per_kind_threshold() {
        let mut rules = RulesConfig::default();
        rules.unit_hit_thresholds.push(crate::core::config::UnitHitThreshold {
            kind: UnitKind::Tank,
            threshold: 5,
        });
        // Tank rolls 3 dice of 4: hits only with the raised threshold.
        let mut engine = CombatEngine::new(rules, ScriptedDice::new([4, 4, 4], 6));
        let exchange = engine.exchange(&[unit(1, UnitKind::Tank, 1)], &[unit(2, UnitKind::Infantry, 2)]);
        assert_eq!(exchange.attacker_hits, 3);
        assert_eq!(exchange.defender_hits, 0);
    }
}
