//! Headless Skirmish
//!
//! Plays a scripted game between the Axis and the Allies on the classic
//! board and prints a summary. Every player follows the same simple plan:
//! declare war on the other camp, buy what the wallet allows, attack the
//! weakest adjacent enemy, mobilize and collect income.

use std::path::PathBuf;

use clap::Parser;
use conquest_engine::actions::{
    CollectIncomeAction, CombatAction, DiplomaticAction, MobilizeAction, PurchaseAction, TurnAction,
};
use conquest_engine::board::{BoardProvider, ClassicBoard};
use conquest_engine::combat::{CombatEngine, CombatReport};
use conquest_engine::core::{PlayerId, RulesConfig, Turn};
use conquest_engine::events::{EventBus, GameTopic, Topic};
use conquest_engine::game::{Camp, Country, GameSession, GameState, VictoryRegistry};
use conquest_engine::turn::Phase;
use conquest_engine::units::{attack_strength, defense_strength, Unit, UnitKind};
use conquest_engine::Result;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Skirmish - scripted Axis vs Allies game
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Play a scripted game on the classic board and print a summary")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Player turns before the game is called
    #[arg(long, default_value_t = 27)]
    turns: Turn,

    /// Combined camp output that wins outright
    #[arg(long, default_value_t = 80)]
    economic_target: u32,

    /// Rules TOML file (defaults apply when omitted)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Starting territories per country
const SETUP: [(Country, &[&str]); 9] = [
    (Country::Germany, &["Germany", "Eastern Europe"]),
    (Country::Japan, &["Japan", "Southeast Asia"]),
    (Country::UnitedStates, &["Eastern United States", "Western United States", "Central United States"]),
    (Country::UnitedKingdom, &["United Kingdom"]),
    (Country::China, &["China"]),
    (Country::Italy, &["Africa"]),
    (Country::Commonwealth, &["Canada", "India", "Australia"]),
    (Country::France, &["Western Europe"]),
    (Country::Russia, &["Russia"]),
];

#[derive(Debug, Default)]
struct Tally {
    battles: usize,
    captures: usize,
    attacker_losses: usize,
    defender_losses: usize,
}

#[derive(Serialize)]
struct PlayerSummary {
    country: Country,
    wallet: u32,
    territories: usize,
    units_on_board: usize,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    turns_played: Turn,
    condition: Option<String>,
    winner: Option<Camp>,
    battles: usize,
    captures: usize,
    attacker_losses: usize,
    defender_losses: usize,
    axis_territories: usize,
    allied_territories: usize,
    players: Vec<PlayerSummary>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("conquest_engine=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let rules = match &args.rules {
        Some(path) => RulesConfig::load(path)?,
        None => RulesConfig::default(),
    };

    let state = setup(&rules)?;
    let bus = EventBus::new();
    let mut feed = bus.subscribe([
        Topic::Game(GameTopic::CombatResolved),
        Topic::Game(GameTopic::TerritoryCaptured),
    ]);
    let observer = tokio::spawn(async move {
        let mut tally = Tally::default();
        while let Some(event) = feed.next().await {
            let Ok(Some(report)) = event.decode::<CombatReport>() else {
                continue;
            };
            match event.topic() {
                Topic::Game(GameTopic::CombatResolved) => {
                    tally.battles += 1;
                    tally.attacker_losses += report.attacker_losses.len();
                    tally.defender_losses += report.defender_losses.len();
                }
                Topic::Game(GameTopic::TerritoryCaptured) => tally.captures += 1,
                _ => {}
            }
        }
        tally
    });

    let victory = VictoryRegistry::standard(args.turns, args.economic_target);
    let mut session = GameSession::new(state, bus.clone(), CombatEngine::seeded(rules, seed)).with_victory(victory);
    tracing::info!(seed, turns = args.turns, "skirmish starting");

    while !session.is_game_over() {
        let Some(player) = session.state().active_player() else {
            break;
        };
        if !play_turn(&mut session, player) {
            break;
        }
    }

    bus.shutdown();
    let tally = observer.await.unwrap_or_default();
    let summary = summarize(&session, seed, tally);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn setup(rules: &RulesConfig) -> Result<GameState> {
    let mut state = GameState::new(ClassicBoard.build_board()?);
    for (country, territories) in SETUP {
        let player = state.add_player(country.name(), country, rules.starting_wallet)?;
        for name in territories {
            let territory = state.board().id_of(name)?;
            state.assign_territory(territory, player)?;
            state.deploy_unit(player, UnitKind::Infantry, territory)?;
            state.deploy_unit(player, UnitKind::Tank, territory)?;
        }
    }
    state.check_ownership_invariant()?;
    Ok(state)
}

/// Play every phase of one player turn; false once the game is over
fn play_turn(session: &mut GameSession, player: PlayerId) -> bool {
    for _ in 0..Phase::COUNT {
        for action in plan(session.state(), player) {
            if let Err(reason) = session.perform(action) {
                tracing::debug!(%reason, "planned action refused");
            }
        }
        if session.perform(TurnAction::change_phase()).is_err() {
            return false;
        }
    }
    true
}

/// Actions a player takes in the current phase
fn plan(state: &GameState, player: PlayerId) -> Vec<TurnAction> {
    let Some(me) = state.player(player) else {
        return Vec::new();
    };

    match state.phase() {
        Phase::Diplomacy => state
            .players()
            .iter()
            .filter(|p| p.camp() != me.camp() && !state.wars().is_at_war(me.country, p.country))
            .map(|p| {
                TurnAction::Diplomatic(DiplomaticAction::DeclareWar {
                    player,
                    against: p.country,
                })
            })
            .collect(),
        Phase::Purchase => {
            let Some(factory) = me
                .territories()
                .iter()
                .filter_map(|id| state.board().territory(*id))
                .filter(|t| t.has_industry())
                .max_by_key(|t| (t.industrial_output, std::cmp::Reverse(t.id)))
            else {
                return Vec::new();
            };

            let mut wallet = me.wallet;
            let mut actions = Vec::new();
            for kind in [UnitKind::Tank, UnitKind::Tank, UnitKind::Infantry, UnitKind::Infantry] {
                if wallet >= kind.cost() {
                    wallet -= kind.cost();
                    actions.push(TurnAction::Purchase(PurchaseAction {
                        player,
                        kind,
                        destination: factory.id,
                    }));
                }
            }
            actions
        }
        Phase::CombatMove => {
            let mut actions = Vec::new();
            for origin in me.territories().iter().filter_map(|id| state.board().territory(*id)) {
                let mut mine: Vec<Unit> = origin.units_owned_by(player).copied().collect();
                if mine.len() < 2 {
                    continue;
                }
                // The cheapest unit stays behind.
                mine.sort_by_key(|u| (u.cost(), u.id));
                let strike = &mine[1..];

                let target = origin
                    .adjacency()
                    .iter()
                    .filter_map(|id| state.board().territory(*id))
                    .filter(|t| match t.owner() {
                        None => true,
                        Some(owner) => state.players_at_war(player, owner),
                    })
                    .min_by_key(|t| (defense_strength(t.garrison()), t.id));

                if let Some(target) = target {
                    if attack_strength(strike) > defense_strength(target.garrison()) {
                        actions.push(TurnAction::Combat(CombatAction::Commit {
                            player,
                            from: origin.id,
                            to: target.id,
                            units: strike.iter().map(|u| u.id).collect(),
                        }));
                    }
                }
            }
            actions
        }
        Phase::CombatResolution => state
            .pending_battles()
            .iter()
            .filter(|b| b.attacker == player)
            .map(|b| {
                TurnAction::Combat(CombatAction::Resolve {
                    player,
                    territory: b.territory,
                })
            })
            .collect(),
        Phase::NonCombatMove => Vec::new(),
        Phase::Mobilization => vec![TurnAction::Mobilize(MobilizeAction { player })],
        Phase::CollectIncome => vec![TurnAction::CollectIncome(CollectIncomeAction { player })],
    }
}

fn summarize(session: &GameSession, seed: u64, tally: Tally) -> Summary {
    let state = session.state();
    let players = state
        .players()
        .iter()
        .map(|p| PlayerSummary {
            country: p.country,
            wallet: p.wallet,
            territories: p.territories().len(),
            units_on_board: state
                .board()
                .territories()
                .map(|t| t.units_owned_by(p.id).count())
                .sum(),
        })
        .collect();

    Summary {
        seed,
        turns_played: state.turn().saturating_sub(1),
        condition: session.game_over().map(|g| g.condition.clone()),
        winner: session.game_over().and_then(|g| g.winner),
        battles: tally.battles,
        captures: tally.captures,
        attacker_losses: tally.attacker_losses,
        defender_losses: tally.defender_losses,
        axis_territories: state.camp_territory_count(Camp::Axis),
        allied_territories: state.camp_territory_count(Camp::Allies),
        players,
    }
}

fn print_summary(summary: &Summary) {
    println!("=== Skirmish (seed {}) ===", summary.seed);
    println!("Turns played: {}", summary.turns_played);
    match (&summary.condition, summary.winner) {
        (Some(condition), Some(winner)) => println!("Result: {winner:?} win by {condition}"),
        (Some(condition), None) => println!("Result: draw ({condition})"),
        (None, _) => println!("Result: unfinished"),
    }
    println!(
        "Battles: {} ({} captures, {} attacking and {} defending units lost)",
        summary.battles, summary.captures, summary.attacker_losses, summary.defender_losses
    );
    println!(
        "Territories: Axis {} / Allies {}",
        summary.axis_territories, summary.allied_territories
    );
    for player in &summary.players {
        println!(
            "  {:<16} wallet {:>4}  territories {:>2}  units {:>3}",
            player.country.name(),
            player.wallet,
            player.territories,
            player.units_on_board
        );
    }
}
