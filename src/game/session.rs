//! A running game: state, dispatcher, bus and victory conditions together
//!
//! The session is the only owner of the game state. Callers either invoke
//! [`GameSession::perform`] directly or publish on the input topics and let
//! [`GameSession::serve`] drive the game from a subscription.

use serde::{Deserialize, Serialize};

use crate::actions::{ActionDispatcher, ActionResult, Rejection, TurnAction};
use crate::combat::CombatEngine;
use crate::core::error::Result;
use crate::core::types::{PlayerId, Turn};
use crate::events::{DataRequest, Event, EventBus, GameTopic, Payload, Subscription, Topic, UserInteraction};
use crate::game::faction::Camp;
use crate::game::snapshot::GameSnapshot;
use crate::game::state::GameState;
use crate::game::victory::VictoryRegistry;
use crate::turn::Phase;

/// Answer to a current-phase request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: Phase,
    pub turn: Turn,
    pub active_player: Option<PlayerId>,
}

/// Payload of the game-over event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub condition: String,
    pub winner: Option<Camp>,
    pub turn: Turn,
}

pub struct GameSession {
    state: GameState,
    dispatcher: ActionDispatcher,
    victory: VictoryRegistry,
    game_over: Option<GameOverReport>,
}

impl GameSession {
    pub fn new(state: GameState, bus: EventBus, combat: CombatEngine) -> Self {
        Self {
            state,
            dispatcher: ActionDispatcher::new(bus, combat),
            victory: VictoryRegistry::new(),
            game_over: None,
        }
    }

    pub fn with_victory(mut self, victory: VictoryRegistry) -> Self {
        self.victory = victory;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn bus(&self) -> &EventBus {
        self.dispatcher.bus()
    }

    pub fn victory_mut(&mut self) -> &mut VictoryRegistry {
        &mut self.victory
    }

    pub fn game_over(&self) -> Option<&GameOverReport> {
        self.game_over.as_ref()
    }

    /// Perform one action, then re-check the victory conditions
    pub fn perform(&mut self, action: TurnAction) -> ActionResult {
        if self.game_over.is_some() {
            return Err(Rejection::GameOver);
        }
        let outcome = self.dispatcher.perform(&mut self.state, action)?;
        self.is_game_over();
        Ok(outcome)
    }

    /// True once any victory condition holds; announces game-over once
    pub fn is_game_over(&mut self) -> bool {
        if self.game_over.is_some() {
            return true;
        }
        let Some(condition) = self.victory.satisfied(&self.state) else {
            return false;
        };

        let report = GameOverReport {
            condition: condition.id().to_string(),
            winner: condition.winner(&self.state),
            turn: self.state.turn(),
        };
        tracing::info!(condition = %report.condition, winner = ?report.winner, "game over");
        self.respond(Topic::Game(GameTopic::GameOver), &report);
        self.game_over = Some(report);
        true
    }

    /// Subscribe to every topic the session answers
    pub fn subscribe_inputs(&self) -> Subscription {
        let mut topics = vec![
            Topic::Request(DataRequest::CurrentPhase),
            Topic::Request(DataRequest::Snapshot),
            Topic::UserInteraction(UserInteraction::SelectNextPhase),
            Topic::UserInteraction(UserInteraction::SelectPhase),
            Topic::UserInteraction(UserInteraction::EndTurn),
            Topic::UserInteraction(UserInteraction::SubmitAction),
        ];
        topics.extend(
            self.state
                .board()
                .ids()
                .map(|id| Topic::Request(DataRequest::Territory(id))),
        );
        self.bus().subscribe(topics)
    }

    /// React to one input event
    ///
    /// Requests are answered on the matching response topic. Phase
    /// interactions and submitted actions are performed; their rejections
    /// are logged, since the outcome is visible on the action topics.
    pub fn handle_event(&mut self, event: &Event) -> Result<()> {
        match *event.topic() {
            Topic::Request(request) => self.answer(request)?,
            Topic::UserInteraction(UserInteraction::SelectNextPhase) => {
                log_rejection(self.perform(TurnAction::change_phase()));
            }
            Topic::UserInteraction(UserInteraction::SelectPhase) => {
                if let Some(target) = event.decode::<Phase>()? {
                    self.advance_until(|state| state.phase() == target);
                }
            }
            Topic::UserInteraction(UserInteraction::EndTurn) => {
                let turn = self.state.turn();
                self.advance_until(|state| state.turn() > turn);
            }
            Topic::UserInteraction(UserInteraction::SubmitAction) => {
                if let Some(action) = event.action() {
                    log_rejection(self.perform(action.clone()));
                }
            }
            topic => tracing::trace!(%topic, "ignored input"),
        }
        Ok(())
    }

    /// Handle input events until the bus shuts down or the game ends
    ///
    /// Returns the number of events handled.
    pub async fn serve(&mut self, mut inputs: Subscription) -> usize {
        let mut handled = 0;
        while let Some(event) = inputs.next().await {
            if let Err(err) = self.handle_event(&event) {
                tracing::warn!(topic = %event.topic(), %err, "input event failed");
            }
            handled += 1;
            if self.is_game_over() {
                break;
            }
        }
        handled
    }

    fn answer(&self, request: DataRequest) -> Result<()> {
        let topic = Topic::Response(request.response());
        let payload = match request {
            DataRequest::Territory(id) => Payload::encode(&self.state.board().territory(id))?,
            DataRequest::CurrentPhase => Payload::encode(&PhaseReport {
                phase: self.state.phase(),
                turn: self.state.turn(),
                active_player: self.state.active_player(),
            })?,
            DataRequest::Snapshot => Payload::encode(&GameSnapshot::capture(&self.state))?,
        };
        self.bus().publish(&topic, Event::new(topic).with_payload(payload));
        Ok(())
    }

    /// Change phase until `done` holds, at most one full cycle
    fn advance_until(&mut self, done: impl Fn(&GameState) -> bool) {
        for _ in 0..Phase::COUNT {
            if done(&self.state) {
                return;
            }
            if let Err(reason) = self.perform(TurnAction::change_phase()) {
                tracing::debug!(%reason, "phase change refused");
                return;
            }
        }
    }

    fn respond<T: Serialize>(&self, topic: Topic, data: &T) {
        match Event::new(topic).with_data(data) {
            Ok(event) => {
                self.bus().publish(&topic, event);
            }
            Err(err) => tracing::warn!(%topic, %err, "event payload could not be encoded"),
        }
    }
}

fn log_rejection(result: ActionResult) {
    if let Err(reason) = result {
        tracing::debug!(%reason, "input action rejected");
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.state.phase())
            .field("turn", &self.state.turn())
            .field("victory", &self.victory)
            .field("game_over", &self.game_over)
            .finish()
    }
}
