//! Single entry point for turn actions
//!
//! `perform` checks phase legality, then the acting player, then every
//! precondition of the specific action. Effects are applied only after all
//! checks pass, so a rejected action leaves the state untouched. Accepted
//! actions are recorded in the history and announced on the bus.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::actions::action::{ActionKind, CombatAction, DiplomaticAction, NonCombatAction, PurchaseAction, TurnAction};
use crate::actions::outcome::{ActionOutcome, ActionResult};
use crate::actions::rejection::{MovementError, Rejection};
use crate::combat::CombatEngine;
use crate::core::config::RulesConfig;
use crate::core::types::{PlayerId, TerritoryId, UnitId};
use crate::events::{ActionTopic, Event, EventBus, GameTopic, Payload, Topic};
use crate::game::faction::Country;
use crate::game::player::PendingPurchase;
use crate::game::state::{CommittedUnit, GameState};
use crate::turn::Phase;

pub struct ActionDispatcher {
    bus: EventBus,
    combat: CombatEngine,
}

impl ActionDispatcher {
    pub fn new(bus: EventBus, combat: CombatEngine) -> Self {
        Self { bus, combat }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn rules(&self) -> &RulesConfig {
        self.combat.rules()
    }

    /// Validate and apply one action
    pub fn perform(&mut self, state: &mut GameState, action: TurnAction) -> ActionResult {
        let turn = state.turn();
        let phase = state.phase();

        let result = self.execute(state, &action);
        match &result {
            Ok(outcome) => {
                tracing::info!(kind = %action.kind(), turn, %phase, "action accepted");
                state.history_mut().record(turn, phase, action.player(), outcome.clone());
                self.announce(state, &action, outcome);
            }
            Err(reason) => {
                tracing::debug!(kind = %action.kind(), %phase, %reason, "action rejected");
            }
        }
        result
    }

    fn execute(&mut self, state: &mut GameState, action: &TurnAction) -> ActionResult {
        let kind = action.kind();
        if kind != ActionKind::ChangePhase {
            if !state.machine().can_perform(kind) {
                return Err(Rejection::IllegalAction { kind, phase: state.phase() });
            }
            if let Some(player) = action.player() {
                check_active(state, player)?;
            }
        }

        match action {
            TurnAction::ChangePhase(_) => Ok(self.change_phase(state)),
            TurnAction::Diplomatic(diplomacy) => self.diplomacy(state, diplomacy),
            TurnAction::Purchase(purchase) => self.purchase(state, purchase),
            TurnAction::Combat(CombatAction::Commit { player, from, to, units }) => {
                self.commit(state, *player, *from, *to, units)
            }
            TurnAction::Combat(CombatAction::Resolve { player, territory }) => {
                self.resolve(state, *player, *territory)
            }
            TurnAction::NonCombat(movement) => self.move_units(state, movement),
            TurnAction::CollectIncome(collect) => self.collect_income(state, collect.player),
            TurnAction::Mobilize(mobilize) => self.mobilize(state, mobilize.player),
        }
    }

    fn change_phase(&mut self, state: &mut GameState) -> ActionOutcome {
        if state.phase() == Phase::CombatResolution {
            let withdrawn = state.take_all_battles();
            for battle in withdrawn {
                tracing::warn!(
                    territory = %battle.territory,
                    units = battle.committed.len(),
                    "unresolved battle withdrawn"
                );
                state.return_to_origin(battle.committed);
            }
        }

        let transition = state.advance_phase();
        tracing::debug!(from = %transition.from, to = %transition.to, turn = transition.turn, "phase changed");
        ActionOutcome::PhaseChanged(transition)
    }

    fn diplomacy(&mut self, state: &mut GameState, action: &DiplomaticAction) -> ActionResult {
        match *action {
            DiplomaticAction::DeclareWar { player, against } => {
                let own = country(state, player)?;
                if own.is_ally_of(against) {
                    return Err(Rejection::AlliedTarget(own, against));
                }
                if !state.wars_mut().declare(own, against) {
                    return Err(Rejection::AlreadyAtWar(own, against));
                }
                Ok(ActionOutcome::WarDeclared { aggressor: own, target: against })
            }
            DiplomaticAction::MakePeace { player, with } => {
                let own = country(state, player)?;
                if !state.wars_mut().make_peace(own, with) {
                    return Err(Rejection::NotAtWar(own, with));
                }
                Ok(ActionOutcome::PeaceMade { a: own, b: with })
            }
        }
    }

    fn purchase(&mut self, state: &mut GameState, action: &PurchaseAction) -> ActionResult {
        let PurchaseAction { player, kind, destination } = *action;
        let territory = state
            .board()
            .territory(destination)
            .ok_or(Rejection::UnknownTerritory(destination))?;
        if territory.owner() != Some(player) {
            return Err(Rejection::PlacementNotOwned(destination));
        }
        if !territory.has_industry() {
            return Err(Rejection::NoIndustry(destination));
        }
        let cost = kind.cost();
        let buyer = state.player(player).ok_or(Rejection::UnknownPlayer(player))?;
        if !buyer.can_afford(cost) {
            return Err(Rejection::InsufficientFunds { kind, cost, wallet: buyer.wallet });
        }

        let unit = state.allocate_unit(player, kind);
        let buyer = state.player_mut(player).ok_or(Rejection::UnknownPlayer(player))?;
        buyer.wallet -= cost;
        buyer.purchase_queue.push(PendingPurchase { unit, destination });

        Ok(ActionOutcome::UnitPurchased {
            player,
            unit: unit.id,
            kind,
            destination,
            cost,
            wallet: buyer.wallet,
        })
    }

    fn commit(
        &mut self,
        state: &mut GameState,
        player: PlayerId,
        from: TerritoryId,
        to: TerritoryId,
        units: &[UnitId],
    ) -> ActionResult {
        let batch = check_move(state, player, from, to, units)?;

        let target_owner = state
            .board()
            .territory(to)
            .ok_or(Rejection::UnknownTerritory(to))?
            .owner();
        if let Some(defender) = target_owner {
            let own = country(state, player)?;
            let theirs = country(state, defender)?;
            if defender == player || own.is_ally_of(theirs) {
                return Err(MovementError::FriendlyTarget(to).into());
            }
            if self.rules().require_war_for_combat && !state.wars().is_at_war(own, theirs) {
                return Err(Rejection::NotAtWar(own, theirs));
            }
        }
        if state.pending_battle(to).is_some_and(|b| b.attacker != player) {
            return Err(MovementError::HostileDestination(to).into());
        }

        let mut committed = Vec::with_capacity(batch.len());
        if let Some(origin) = state.board_mut().territory_mut(from) {
            for id in &batch {
                if let Some(unit) = origin.remove_unit(*id) {
                    committed.push(CommittedUnit { unit, origin: from });
                }
            }
        }
        state.commit_to_battle(to, player, committed);

        Ok(ActionOutcome::ForcesCommitted { player, from, to, units: batch })
    }

    fn resolve(&mut self, state: &mut GameState, player: PlayerId, territory: TerritoryId) -> ActionResult {
        if !state.pending_battle(territory).is_some_and(|b| b.attacker == player) {
            return Err(Rejection::NoPendingBattle(territory));
        }
        if state.board().territory(territory).is_none() {
            return Err(Rejection::UnknownTerritory(territory));
        }
        let battle = state
            .take_battle(territory)
            .ok_or(Rejection::NoPendingBattle(territory))?;

        let report = self.combat.resolve_battle(state, battle).map_err(|err| {
            tracing::warn!(%territory, %player, %err, "battle resolution failed");
            Rejection::UnknownTerritory(territory)
        })?;
        Ok(ActionOutcome::CombatResolved(report))
    }

    fn move_units(&mut self, state: &mut GameState, action: &NonCombatAction) -> ActionResult {
        let NonCombatAction { player, from, to, ref units } = *action;
        let batch = check_move(state, player, from, to, units)?;

        let friendly = state
            .board()
            .territory(to)
            .and_then(|t| t.owner())
            .is_some_and(|owner| state.are_friendly(player, owner));
        if !friendly {
            return Err(MovementError::HostileDestination(to).into());
        }

        let mut moving = Vec::with_capacity(batch.len());
        if let Some(origin) = state.board_mut().territory_mut(from) {
            moving.extend(batch.iter().filter_map(|id| origin.remove_unit(*id)));
        }
        if let Some(destination) = state.board_mut().territory_mut(to) {
            for unit in moving {
                destination.add_unit(unit);
            }
        }

        Ok(ActionOutcome::UnitsMoved { player, from, to, units: batch })
    }

    fn collect_income(&mut self, state: &mut GameState, player: PlayerId) -> ActionResult {
        let turn = state.turn();
        let amount = state.income_of(player);
        let collector = state.player_mut(player).ok_or(Rejection::UnknownPlayer(player))?;
        if collector.has_collected_income(turn) {
            return Err(Rejection::IncomeAlreadyCollected(player));
        }

        collector.wallet = collector.wallet.saturating_add(amount);
        collector.mark_income_collected(turn);
        Ok(ActionOutcome::IncomeCollected { player, amount, wallet: collector.wallet })
    }

    fn mobilize(&mut self, state: &mut GameState, player: PlayerId) -> ActionResult {
        let queue = std::mem::take(
            &mut state
                .player_mut(player)
                .ok_or(Rejection::UnknownPlayer(player))?
                .purchase_queue,
        );

        let mut placed = Vec::new();
        let mut reserved = Vec::new();
        for PendingPurchase { unit, destination } in queue {
            let record = state
                .board_mut()
                .territory_mut(destination)
                .filter(|t| t.owner() == Some(player));
            match record {
                Some(territory) => {
                    territory.add_unit(unit);
                    placed.push((unit.id, destination));
                }
                None => {
                    if let Some(owner) = state.player_mut(player) {
                        owner.reserve.push(unit);
                    }
                    reserved.push(unit.id);
                }
            }
        }

        Ok(ActionOutcome::UnitsMobilized { player, placed, reserved })
    }

    /// Publish the events that follow from an accepted action
    fn announce(&self, state: &GameState, action: &TurnAction, outcome: &ActionOutcome) {
        let mut territories: Vec<TerritoryId> = Vec::new();

        match outcome {
            ActionOutcome::WarDeclared { .. } | ActionOutcome::PeaceMade { .. } => {
                self.publish_action(ActionTopic::Diplomacy, action, outcome);
            }
            ActionOutcome::UnitPurchased { .. } => {
                self.publish_action(ActionTopic::Purchase, action, outcome);
            }
            ActionOutcome::ForcesCommitted { from, to, .. } => {
                self.publish_action(ActionTopic::Attack, action, outcome);
                territories.extend([*from, *to]);
            }
            ActionOutcome::CombatResolved(report) => {
                self.publish_action(ActionTopic::Attack, action, outcome);
                self.publish(Topic::Game(GameTopic::CombatResolved), report, None);
                if report.captured {
                    tracing::info!(territory = %report.territory, attacker = %report.attacker, "territory captured");
                    self.publish(Topic::Game(GameTopic::TerritoryCaptured), report, None);
                }
                territories.push(report.territory);
                for origin in state.board().ids() {
                    let returned = state
                        .board()
                        .territory(origin)
                        .is_some_and(|t| report.survivors.iter().any(|id| t.contains_unit(*id)));
                    if returned && origin != report.territory {
                        territories.push(origin);
                    }
                }
            }
            ActionOutcome::UnitsMoved { from, to, .. } => {
                self.publish_action(ActionTopic::Move, action, outcome);
                territories.extend([*from, *to]);
            }
            ActionOutcome::UnitsMobilized { placed, .. } => {
                self.publish_action(ActionTopic::Mobilize, action, outcome);
                territories.extend(placed.iter().map(|(_, t)| *t));
            }
            ActionOutcome::IncomeCollected { .. } => {
                self.publish_action(ActionTopic::Income, action, outcome);
            }
            ActionOutcome::PhaseChanged(transition) => {
                self.publish(Topic::Game(GameTopic::PhaseChanged), &transition.to, Some(action));
                if transition.turn_ended {
                    self.publish(Topic::Game(GameTopic::TurnEnded), transition, None);
                }
            }
        }

        let territories: BTreeSet<TerritoryId> = territories.into_iter().collect();
        for id in territories {
            if let Some(territory) = state.board().territory(id) {
                self.publish(Topic::Territory(id), territory, None);
            }
        }
    }

    fn publish_action(&self, topic: ActionTopic, action: &TurnAction, outcome: &ActionOutcome) {
        self.publish(Topic::Action(topic), outcome, Some(action));
    }

    fn publish<T: Serialize>(&self, topic: Topic, data: &T, action: Option<&TurnAction>) {
        let mut event = Event::new(topic);
        if let Some(action) = action {
            event = event.with_action(action.clone());
        }
        match Payload::encode(data) {
            Ok(payload) => event = event.with_payload(payload),
            Err(err) => tracing::warn!(%topic, %err, "event payload could not be encoded"),
        }
        self.bus.publish(&topic, event);
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("bus", &self.bus)
            .field("combat", &self.combat)
            .finish()
    }
}

fn country(state: &GameState, player: PlayerId) -> Result<Country, Rejection> {
    state.country_of(player).ok_or(Rejection::UnknownPlayer(player))
}

fn check_active(state: &GameState, player: PlayerId) -> Result<(), Rejection> {
    if state.player(player).is_none() {
        return Err(Rejection::UnknownPlayer(player));
    }
    let active = state.active_player();
    if active != Some(player) {
        return Err(Rejection::NotActivePlayer { player, active });
    }
    Ok(())
}

/// Checks shared by combat and non-combat moves; returns the deduplicated batch
fn check_move(
    state: &GameState,
    player: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    units: &[UnitId],
) -> Result<Vec<UnitId>, Rejection> {
    if units.is_empty() {
        return Err(MovementError::EmptyBatch.into());
    }
    let origin = state.board().territory(from).ok_or(Rejection::UnknownTerritory(from))?;
    if state.board().territory(to).is_none() {
        return Err(Rejection::UnknownTerritory(to));
    }
    if origin.owner() != Some(player) {
        return Err(MovementError::NotOwner(from).into());
    }
    if !origin.is_adjacent(to) {
        return Err(MovementError::NotAdjacent { from, to }.into());
    }

    let mut batch = Vec::with_capacity(units.len());
    let mut missing = Vec::new();
    for &id in units {
        if batch.contains(&id) {
            continue;
        }
        if origin.units_owned_by(player).any(|u| u.id == id) {
            batch.push(id);
        } else {
            missing.push(id);
        }
    }
    if !missing.is_empty() {
        return Err(MovementError::UnitsNotPresent { territory: from, missing }.into());
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Territory};
    use crate::combat::ScriptedDice;
    use crate::events::Subscription;
    use crate::units::UnitKind;

    struct Fixture {
        state: GameState,
        dispatcher: ActionDispatcher,
        germany: PlayerId,
        italy: PlayerId,
        france: PlayerId,
    }

    const BERLIN: TerritoryId = TerritoryId(1);
    const PARIS: TerritoryId = TerritoryId(2);
    const ROME: TerritoryId = TerritoryId(3);

    fn fixture(dice: ScriptedDice) -> Fixture {
        let board = Board::new([
            Territory::new(BERLIN, "Berlin").with_output(10).with_adjacent([PARIS, ROME]),
            Territory::new(PARIS, "Paris").with_output(6).with_adjacent([BERLIN, ROME]),
            Territory::new(ROME, "Rome").with_adjacent([BERLIN, PARIS]),
        ])
        .unwrap();
        let mut state = GameState::new(board);
        let germany = state.add_player("Germany", Country::Germany, 20).unwrap();
        let italy = state.add_player("Italy", Country::Italy, 0).unwrap();
        let france = state.add_player("France", Country::France, 0).unwrap();
        state.assign_territory(BERLIN, germany).unwrap();
        state.assign_territory(PARIS, france).unwrap();
        state.assign_territory(ROME, italy).unwrap();

        let engine = CombatEngine::new(RulesConfig::default(), dice);
        let dispatcher = ActionDispatcher::new(EventBus::new(), engine);
        Fixture { state, dispatcher, germany, italy, france }
    }

    fn advance_to(fx: &mut Fixture, phase: Phase) {
        while fx.state.phase() != phase {
            fx.dispatcher.perform(&mut fx.state, TurnAction::change_phase()).unwrap();
        }
    }

    fn drain(sub: &mut Subscription) -> Vec<Event> {
        std::iter::from_fn(|| sub.try_next()).collect()
    }

    #[test]
    fn test_wrong_phase_rejected_without_effect() {
        let mut fx = fixture(ScriptedDice::always(1));
        let action = TurnAction::Purchase(PurchaseAction {
            player: fx.germany,
            kind: UnitKind::Infantry,
            destination: BERLIN,
        });

        let err = fx.dispatcher.perform(&mut fx.state, action).unwrap_err();
        assert_eq!(err, Rejection::IllegalAction { kind: ActionKind::Purchase, phase: Phase::Diplomacy });
        assert_eq!(fx.state.player(fx.germany).unwrap().wallet, 20);
        assert!(fx.state.history().is_empty());
    }

    #[test]
    fn test_only_active_player_may_act() {
        let mut fx = fixture(ScriptedDice::always(1));
        let action = TurnAction::Diplomatic(DiplomaticAction::DeclareWar {
            player: fx.france,
            against: Country::Germany,
        });
        let err = fx.dispatcher.perform(&mut fx.state, action).unwrap_err();
        assert_eq!(err, Rejection::NotActivePlayer { player: fx.france, active: Some(fx.germany) });
    }

    #[test]
    fn test_declare_war_on_ally_rejected() {
        let mut fx = fixture(ScriptedDice::always(1));
        let action = TurnAction::Diplomatic(DiplomaticAction::DeclareWar {
            player: fx.germany,
            against: Country::Italy,
        });
        let err = fx.dispatcher.perform(&mut fx.state, action).unwrap_err();
        assert_eq!(err, Rejection::AlliedTarget(Country::Germany, Country::Italy));
        assert!(fx.state.wars().is_empty());
    }

    #[test]
    fn test_purchase_and_mobilize() {
        let mut fx = fixture(ScriptedDice::always(1));
        advance_to(&mut fx, Phase::Purchase);
        let germany = fx.germany;
        let buy = |kind| TurnAction::Purchase(PurchaseAction { player: germany, kind, destination: BERLIN });

        fx.dispatcher.perform(&mut fx.state, buy(UnitKind::Tank)).unwrap();
        let err = fx.dispatcher.perform(&mut fx.state, buy(UnitKind::Battleship)).unwrap_err();
        assert_eq!(err, Rejection::InsufficientFunds { kind: UnitKind::Battleship, cost: 24, wallet: 15 });

        let player = fx.state.player(fx.germany).unwrap();
        assert_eq!(player.wallet, 15);
        assert_eq!(player.purchase_queue.len(), 1);

        advance_to(&mut fx, Phase::Mobilization);
        let outcome = fx
            .dispatcher
            .perform(&mut fx.state, TurnAction::Mobilize(crate::actions::MobilizeAction { player: fx.germany }))
            .unwrap();
        assert!(matches!(outcome, ActionOutcome::UnitsMobilized { ref placed, .. } if placed.len() == 1));
        assert_eq!(fx.state.board().territory(BERLIN).unwrap().garrison().len(), 1);
        assert!(fx.state.player(fx.germany).unwrap().purchase_queue.is_empty());
    }

    #[test]
    fn test_purchase_needs_industry() {
        let mut fx = fixture(ScriptedDice::always(1));
        fx.state.assign_territory(ROME, fx.germany).unwrap();
        advance_to(&mut fx, Phase::Purchase);
        let action = TurnAction::Purchase(PurchaseAction {
            player: fx.germany,
            kind: UnitKind::Infantry,
            destination: ROME,
        });
        assert_eq!(fx.dispatcher.perform(&mut fx.state, action), Err(Rejection::NoIndustry(ROME)));
    }

    #[test]
    fn test_attack_requires_war() {
        let mut fx = fixture(ScriptedDice::always(1));
        let tank = fx.state.deploy_unit(fx.germany, UnitKind::Tank, BERLIN).unwrap();
        advance_to(&mut fx, Phase::CombatMove);

        let commit = TurnAction::Combat(CombatAction::Commit {
            player: fx.germany,
            from: BERLIN,
            to: PARIS,
            units: vec![tank],
        });
        let err = fx.dispatcher.perform(&mut fx.state, commit).unwrap_err();
        assert_eq!(err, Rejection::NotAtWar(Country::Germany, Country::France));
        assert!(fx.state.board().territory(BERLIN).unwrap().contains_unit(tank));
    }

    #[test]
    fn test_attack_on_ally_rejected() {
        let mut fx = fixture(ScriptedDice::always(1));
        let tank = fx.state.deploy_unit(fx.germany, UnitKind::Tank, BERLIN).unwrap();
        advance_to(&mut fx, Phase::CombatMove);
        let commit = TurnAction::Combat(CombatAction::Commit {
            player: fx.germany,
            from: BERLIN,
            to: ROME,
            units: vec![tank],
        });
        assert_eq!(
            fx.dispatcher.perform(&mut fx.state, commit),
            Err(Rejection::InvalidMovement(MovementError::FriendlyTarget(ROME)))
        );
    }

    #[test]
    fn test_commit_and_capture_publish_events() {
        // Tank rolls three hits, the infantry's two dice miss.
        let mut fx = fixture(ScriptedDice::new([1, 1, 1], 6));
        let tank = fx.state.deploy_unit(fx.germany, UnitKind::Tank, BERLIN).unwrap();
        fx.state.deploy_unit(fx.france, UnitKind::Infantry, PARIS).unwrap();
        let mut captures = fx.dispatcher.bus().subscribe([
            Topic::Game(GameTopic::TerritoryCaptured),
            Topic::Territory(PARIS),
        ]);

        let war = TurnAction::Diplomatic(DiplomaticAction::DeclareWar {
            player: fx.germany,
            against: Country::France,
        });
        fx.dispatcher.perform(&mut fx.state, war).unwrap();
        advance_to(&mut fx, Phase::CombatMove);
        fx.dispatcher
            .perform(
                &mut fx.state,
                TurnAction::Combat(CombatAction::Commit {
                    player: fx.germany,
                    from: BERLIN,
                    to: PARIS,
                    units: vec![tank],
                }),
            )
            .unwrap();
        assert!(fx.state.board().territory(BERLIN).unwrap().garrison().is_empty());

        advance_to(&mut fx, Phase::CombatResolution);
        let outcome = fx
            .dispatcher
            .perform(
                &mut fx.state,
                TurnAction::Combat(CombatAction::Resolve { player: fx.germany, territory: PARIS }),
            )
            .unwrap();

        let ActionOutcome::CombatResolved(report) = outcome else {
            panic!("expected a combat report");
        };
        assert!(report.captured);
        assert_eq!(report.defender, Some(fx.france));
        assert_eq!(fx.state.board().territory(PARIS).unwrap().owner(), Some(fx.germany));
        fx.state.check_ownership_invariant().unwrap();

        let topics: Vec<Topic> = drain(&mut captures).iter().map(|e| *e.topic()).collect();
        assert!(topics.contains(&Topic::Game(GameTopic::TerritoryCaptured)));
        assert!(topics.contains(&Topic::Territory(PARIS)));
    }

    #[test]
    fn test_unresolved_battle_withdrawn_on_phase_change() {
        let mut fx = fixture(ScriptedDice::always(6));
        let tank = fx.state.deploy_unit(fx.germany, UnitKind::Tank, BERLIN).unwrap();
        fx.state.wars_mut().declare(Country::Germany, Country::France);
        advance_to(&mut fx, Phase::CombatMove);
        fx.dispatcher
            .perform(
                &mut fx.state,
                TurnAction::Combat(CombatAction::Commit {
                    player: fx.germany,
                    from: BERLIN,
                    to: PARIS,
                    units: vec![tank],
                }),
            )
            .unwrap();

        advance_to(&mut fx, Phase::NonCombatMove);
        assert!(fx.state.pending_battles().is_empty());
        assert!(fx.state.board().territory(BERLIN).unwrap().contains_unit(tank));
    }

    #[test]
    fn test_non_combat_move_into_ally() {
        let mut fx = fixture(ScriptedDice::always(1));
        let infantry = fx.state.deploy_unit(fx.germany, UnitKind::Infantry, BERLIN).unwrap();
        advance_to(&mut fx, Phase::NonCombatMove);

        let to_france = TurnAction::NonCombat(NonCombatAction {
            player: fx.germany,
            from: BERLIN,
            to: PARIS,
            units: vec![infantry],
        });
        assert_eq!(
            fx.dispatcher.perform(&mut fx.state, to_france),
            Err(Rejection::InvalidMovement(MovementError::HostileDestination(PARIS)))
        );

        let to_italy = TurnAction::NonCombat(NonCombatAction {
            player: fx.germany,
            from: BERLIN,
            to: ROME,
            units: vec![infantry, infantry],
        });
        let outcome = fx.dispatcher.perform(&mut fx.state, to_italy).unwrap();
        assert!(matches!(outcome, ActionOutcome::UnitsMoved { ref units, .. } if units == &vec![infantry]));
        assert!(fx.state.board().territory(ROME).unwrap().contains_unit(infantry));
        assert_eq!(fx.state.player(fx.italy).unwrap().territories().len(), 1);
    }

    #[test]
    fn test_move_missing_units_is_all_or_nothing() {
        let mut fx = fixture(ScriptedDice::always(1));
        let infantry = fx.state.deploy_unit(fx.germany, UnitKind::Infantry, BERLIN).unwrap();
        advance_to(&mut fx, Phase::NonCombatMove);

        let action = TurnAction::NonCombat(NonCombatAction {
            player: fx.germany,
            from: BERLIN,
            to: ROME,
            units: vec![infantry, UnitId(999)],
        });
        let err = fx.dispatcher.perform(&mut fx.state, action).unwrap_err();
        assert_eq!(
            err,
            Rejection::InvalidMovement(MovementError::UnitsNotPresent {
                territory: BERLIN,
                missing: vec![UnitId(999)],
            })
        );
        assert!(fx.state.board().territory(BERLIN).unwrap().contains_unit(infantry));
    }

    #[test]
    fn test_income_once_per_turn() {
        let mut fx = fixture(ScriptedDice::always(1));
        advance_to(&mut fx, Phase::CollectIncome);
        let collect = TurnAction::CollectIncome(crate::actions::CollectIncomeAction { player: fx.germany });

        let outcome = fx.dispatcher.perform(&mut fx.state, collect.clone()).unwrap();
        assert_eq!(outcome, ActionOutcome::IncomeCollected { player: fx.germany, amount: 10, wallet: 30 });
        assert_eq!(
            fx.dispatcher.perform(&mut fx.state, collect),
            Err(Rejection::IncomeAlreadyCollected(fx.germany))
        );
    }

    #[test]
    fn test_income_saturates_full_wallet() {
        let mut fx = fixture(ScriptedDice::always(1));
        if let Some(germany) = fx.state.player_mut(fx.germany) {
            germany.wallet = u32::MAX - 1;
        }
        advance_to(&mut fx, Phase::CollectIncome);

        let collect = TurnAction::CollectIncome(crate::actions::CollectIncomeAction { player: fx.germany });
        let outcome = fx.dispatcher.perform(&mut fx.state, collect).unwrap();
        assert_eq!(outcome, ActionOutcome::IncomeCollected { player: fx.germany, amount: 10, wallet: u32::MAX });
    }

    #[test]
    fn test_phase_change_payload_is_new_phase() {
        let mut fx = fixture(ScriptedDice::always(1));
        let mut sub = fx.dispatcher.bus().subscribe([Topic::Game(GameTopic::PhaseChanged)]);
        fx.dispatcher.perform(&mut fx.state, TurnAction::change_phase()).unwrap();

        let events = drain(&mut sub);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].decode::<Phase>().unwrap(), Some(Phase::Purchase));
        assert_eq!(events[0].action(), Some(&TurnAction::change_phase()));
    }
}
