//! External CFR solver bridge and pure-relay engine.
//!
//! The bridge is a data relay toward a headless CFR solver binary: it
//! never modifies or reinterprets the frequencies the solver computed.
//! When no solver can answer, the relay returns the `gto_unavailable`
//! sentinel instead of guessing.

use crate::cards::{Card, HoleCards, Street};
use crate::charts;
use crate::context::GameContext;
use crate::range::Range;
use crate::solver::adjust::adjust_for_icm;
use crate::solver::estimator::estimate_preflop_range;
use crate::solver::preflop::PreflopSolver;
use crate::solver::types::{
    ActionFrequency, ActionSequence, Solver, SolverResult, Source, SpotKey, StrategyNode,
};
use crate::state::{Action, GameState, PlayerState, PriorAction};
use crate::texture::StackBucket;
use crate::icm::survival_premium;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Wide default used when a range converts to an empty string.
const DEFAULT_RANGE: &str = "AA,KK,QQ,JJ,TT,99,88,77,66,55,44,33,22,AKs,AKo";

/// Configuration for an external GTO solver binary.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    pub solver_type: String,
    pub binary_path: PathBuf,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,
    /// Convergence target as % of pot.
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    #[serde(default = "default_max_solve_seconds")]
    pub max_solve_seconds: u64,
    #[serde(default)]
    pub extra_options: FxHashMap<String, String>,
}

fn default_thread_count() -> usize {
    4
}

fn default_accuracy() -> f64 {
    0.5
}

fn default_max_solve_seconds() -> u64 {
    120
}

/// Load solver configuration from a JSON file.
///
/// Returns None when the file is missing or malformed, letting the
/// caller degrade to `gto_unavailable` rather than fail.
pub fn load_solver_config(path: &Path) -> Option<SolverConfig> {
    if !path.exists() {
        return None;
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("failed to read solver config at {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("failed to parse solver config at {}: {}", path.display(), e);
            None
        }
    }
}

/// Failure from an external solver backend. Never triggers a heuristic
/// fallback; it propagates as `gto_unavailable`.
#[derive(Debug)]
pub enum BridgeError {
    /// Binary missing or not executable.
    Unavailable(String),
    /// Solver process failed to launch or crashed.
    Process(std::io::Error),
    /// Solver output could not be parsed.
    Protocol(String),
    /// Solve exceeded the configured time budget.
    Timeout(u64),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Unavailable(what) => write!(f, "solver unavailable: {}", what),
            BridgeError::Process(e) => write!(f, "solver process failed: {}", e),
            BridgeError::Protocol(what) => write!(f, "unparseable solver output: {}", what),
            BridgeError::Timeout(secs) => write!(f, "solver exceeded {}s budget", secs),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Process(e) => Some(e),
            _ => None,
        }
    }
}

/// Standardized input for an external solve request. The bridge
/// implementation formats this into the solver's wire format.
#[derive(Debug, Clone)]
pub struct SolverInput {
    pub board: Vec<Card>,
    pub hero: HoleCards,
    pub pot: f64,
    pub effective_stack: f64,
    pub hero_is_ip: bool,
    pub ip_range: String,
    pub oop_range: String,
    pub street: Street,
}

/// Parsed output from an external solver. Frequencies come straight
/// from the CFR run, unmodified.
#[derive(Debug, Clone)]
pub struct SolverOutput {
    pub hero_strategy: Vec<(Action, f64)>,
    pub hero_ev: f64,
    pub converged: bool,
    pub exploitability: f64,
}

/// Interface for external GTO solver backends.
///
/// Implementations validate the binary, format `SolverInput`, run the
/// subprocess, and parse its output. Pure relay: no interpretation.
pub trait SolverBridge {
    /// Whether the solver binary exists and is executable.
    fn is_available(&self) -> bool;

    /// Run the solver, blocking until done or timed out.
    fn solve(&self, input: &SolverInput) -> Result<SolverOutput, BridgeError>;

    /// Release temp files and running processes.
    fn cleanup(&self) {}
}

/// Sentinel for "no GTO answer exists": empty strategy, zero
/// confidence. Callers render this as an explicit warning, never as a
/// fake recommendation.
pub fn gto_unavailable() -> SolverResult {
    SolverResult::new(StrategyNode::default(), Source::GtoUnavailable, 0.0, 0.0)
}

/// Pure GTO relay engine.
///
/// Preflop routes to the tiered table solver; postflop goes to the
/// external bridge or reports `gto_unavailable`. No heuristic tier.
pub struct RelaySolver {
    preflop: PreflopSolver,
    bridge: Option<Box<dyn SolverBridge>>,
}

impl RelaySolver {
    pub fn new(preflop: PreflopSolver, bridge: Option<Box<dyn SolverBridge>>) -> Self {
        Self { preflop, bridge }
    }

    pub fn cleanup(&self) {
        if let Some(bridge) = &self.bridge {
            bridge.cleanup();
        }
    }

    fn solve_postflop(
        &self,
        hero: &PlayerState,
        hole: &HoleCards,
        game_state: &GameState,
        action_history: &[PriorAction],
        opponent_range: Option<&Range>,
    ) -> SolverResult {
        let bridge = match &self.bridge {
            Some(bridge) => bridge,
            None => {
                log::info!("no solver bridge configured");
                return gto_unavailable();
            }
        };
        if !bridge.is_available() {
            log::warn!("solver bridge not available (binary missing or not executable)");
            return gto_unavailable();
        }

        let input = self.build_input(hero, hole, game_state, action_history, opponent_range);
        let started = Instant::now();
        match bridge.solve(&input) {
            Ok(output) => {
                log::debug!(
                    "external solve: {:.1}ms (converged={}, exploitability={:.3}%)",
                    started.elapsed().as_secs_f64() * 1000.0,
                    output.converged,
                    output.exploitability,
                );
                map_output(&output, hero, game_state)
            }
            Err(e) => {
                log::error!("external solver failed: {}", e);
                gto_unavailable()
            }
        }
    }

    fn build_input(
        &self,
        hero: &PlayerState,
        hole: &HoleCards,
        game_state: &GameState,
        action_history: &[PriorAction],
        opponent_range: Option<&Range>,
    ) -> SolverInput {
        let villains: Vec<_> = game_state
            .active_players()
            .filter(|p| p.name != hero.name)
            .collect();
        let villain_positions: Vec<_> = villains.iter().map(|p| p.position).collect();
        let hero_is_ip = hero.position.is_in_position(&villain_positions);

        let hero_range = charts::opening_range(hero.position);
        let hero_range_str = range_string(&hero_range);

        let opp_range = match opponent_range {
            Some(range) => range.clone(),
            None => {
                estimate_preflop_range(villain_positions.first().copied(), action_history)
            }
        };
        let opp_range_str = range_string(&opp_range);

        let (ip_range, oop_range) = if hero_is_ip {
            (hero_range_str, opp_range_str)
        } else {
            (opp_range_str, hero_range_str)
        };

        let effective_stack = villains
            .iter()
            .map(|p| p.chips)
            .fold(hero.chips, f64::min);

        SolverInput {
            board: game_state.community_cards.clone(),
            hero: *hole,
            pot: game_state.pot,
            effective_stack,
            hero_is_ip,
            ip_range,
            oop_range,
            street: game_state.current_street(),
        }
    }
}

fn range_string(range: &Range) -> String {
    if range.is_empty() {
        DEFAULT_RANGE.to_string()
    } else {
        range.to_string()
    }
}

/// Map solver output into a `SolverResult`, translating action names
/// only. Raises get a default pot-relative sizing from the solve tree.
fn map_output(output: &SolverOutput, hero: &PlayerState, game_state: &GameState) -> SolverResult {
    let actions = output
        .hero_strategy
        .iter()
        .map(|&(action, frequency)| {
            let amount = if action == Action::Raise {
                game_state.pot * 0.75
            } else {
                0.0
            };
            ActionFrequency::new(action, frequency, amount, output.hero_ev * frequency)
        })
        .collect();

    let strategy = StrategyNode::new(actions).normalized();
    let confidence = if output.converged { 0.95 } else { 0.80 };
    let ev = output.hero_ev;
    SolverResult::new(strategy, Source::ExternalSolver, confidence, ev).with_spot_key(SpotKey {
        street: game_state.current_street(),
        position: hero.position,
        action_sequence: ActionSequence::FirstToAct,
        stack_bucket: StackBucket::from_bb(hero.chips),
        board_bucket: None,
        spr_bucket: None,
        hand_category: None,
    })
}

impl Solver for RelaySolver {
    fn solve(
        &self,
        game_state: &GameState,
        context: &GameContext,
        hero_index: usize,
        action_history: &[PriorAction],
        opponent_range: Option<&Range>,
    ) -> SolverResult {
        let started = Instant::now();
        let hero = &game_state.players[hero_index];

        let hole = match &hero.hole_cards {
            Some(hole) => *hole,
            None => {
                log::debug!("no hole cards for hero");
                return gto_unavailable();
            }
        };

        let premium = if context.is_tournament() {
            survival_premium(context)
        } else {
            1.0
        };

        let mut result = if game_state.current_street() == Street::Preflop {
            self.preflop.get_strategy(
                &hole,
                hero.position,
                action_history,
                context.stack_depth_bb,
                premium,
            )
        } else {
            self.solve_postflop(hero, &hole, game_state, action_history, opponent_range)
        };

        if context.is_tournament()
            && premium < 0.95
            && result.source != Source::GtoUnavailable
        {
            log::debug!("ICM adjustment: premium={:.2}", premium);
            result.strategy = adjust_for_icm(&result.strategy, premium);
            result.ev *= premium;
        }

        let rec = match result.strategy.recommended_action() {
            Some(rec) => format!("{} {:.0}%", rec.action.label(), rec.frequency * 100.0),
            None => "none".to_string(),
        };
        log::info!(
            "{} -> {} (source={}, confidence={:.0}%, ev={:.2}, {:.1}ms)",
            game_state.current_street().label(),
            rec,
            result.source,
            result.confidence * 100.0,
            result.ev,
            started.elapsed().as_secs_f64() * 1000.0,
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::state::Position;

    struct FixedBridge {
        available: bool,
        output: Option<SolverOutput>,
    }

    impl SolverBridge for FixedBridge {
        fn is_available(&self) -> bool {
            self.available
        }

        fn solve(&self, _input: &SolverInput) -> Result<SolverOutput, BridgeError> {
            self.output
                .clone()
                .ok_or_else(|| BridgeError::Protocol("no output".into()))
        }
    }

    fn flop_state() -> GameState {
        let players = vec![
            PlayerState::new("hero", 100.0, Position::Btn)
                .with_hole_cards("AhKh".parse().unwrap()),
            PlayerState::new("villain", 80.0, Position::Bb),
        ];
        GameState::new(players, 0.5, 1.0)
            .with_board(parse_cards("Ad 7s 2c").unwrap())
            .with_pot(6.0)
    }

    fn engine_with(bridge: Option<Box<dyn SolverBridge>>) -> RelaySolver {
        RelaySolver::new(PreflopSolver::new(), bridge)
    }

    #[test]
    fn test_no_bridge_is_gto_unavailable() {
        let engine = engine_with(None);
        let context = GameContext::cash_game(100.0, 2);
        let result = engine.solve(&flop_state(), &context, 0, &[], None);
        assert_eq!(result.source, Source::GtoUnavailable);
        assert!(result.strategy.actions.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_unavailable_binary_is_gto_unavailable() {
        let engine = engine_with(Some(Box::new(FixedBridge {
            available: false,
            output: None,
        })));
        let context = GameContext::cash_game(100.0, 2);
        let result = engine.solve(&flop_state(), &context, 0, &[], None);
        assert_eq!(result.source, Source::GtoUnavailable);
    }

    #[test]
    fn test_bridge_failure_is_gto_unavailable() {
        let engine = engine_with(Some(Box::new(FixedBridge {
            available: true,
            output: None,
        })));
        let context = GameContext::cash_game(100.0, 2);
        let result = engine.solve(&flop_state(), &context, 0, &[], None);
        assert_eq!(result.source, Source::GtoUnavailable);
    }

    #[test]
    fn test_bridge_output_relayed_unmodified() {
        let engine = engine_with(Some(Box::new(FixedBridge {
            available: true,
            output: Some(SolverOutput {
                hero_strategy: vec![(Action::Raise, 0.6), (Action::Check, 0.4)],
                hero_ev: 2.0,
                converged: true,
                exploitability: 0.3,
            }),
        })));
        let context = GameContext::cash_game(100.0, 2);
        let result = engine.solve(&flop_state(), &context, 0, &[], None);

        assert_eq!(result.source, Source::ExternalSolver);
        assert!((result.confidence - 0.95).abs() < 1e-9);
        assert!((result.strategy.frequency_of(Action::Raise) - 0.6).abs() < 1e-9);
        // Raise sizing defaults to 3/4 pot from the solve tree
        let raise = result
            .strategy
            .actions
            .iter()
            .find(|a| a.action == Action::Raise)
            .unwrap();
        assert!((raise.amount - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_unconverged_solve_lowers_confidence() {
        let engine = engine_with(Some(Box::new(FixedBridge {
            available: true,
            output: Some(SolverOutput {
                hero_strategy: vec![(Action::Check, 1.0)],
                hero_ev: 0.5,
                converged: false,
                exploitability: 4.0,
            }),
        })));
        let context = GameContext::cash_game(100.0, 2);
        let result = engine.solve(&flop_state(), &context, 0, &[], None);
        assert!((result.confidence - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_preflop_routes_to_tables() {
        let engine = engine_with(None);
        let context = GameContext::cash_game(100.0, 2);
        let players = vec![
            PlayerState::new("hero", 100.0, Position::Btn)
                .with_hole_cards("AhAs".parse().unwrap()),
            PlayerState::new("villain", 80.0, Position::Bb),
        ];
        let state = GameState::new(players, 0.5, 1.0);
        let result = engine.solve(&state, &context, 0, &[], None);
        assert_eq!(result.source, Source::Heuristic);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Raise
        );
    }

    #[test]
    fn test_no_hole_cards_is_gto_unavailable() {
        let engine = engine_with(None);
        let context = GameContext::cash_game(100.0, 2);
        let players = vec![
            PlayerState::new("hero", 100.0, Position::Btn),
            PlayerState::new("villain", 80.0, Position::Bb),
        ];
        let state = GameState::new(players, 0.5, 1.0);
        let result = engine.solve(&state, &context, 0, &[], None);
        assert_eq!(result.source, Source::GtoUnavailable);
    }

    #[test]
    fn test_missing_config_is_none() {
        assert!(load_solver_config(Path::new("/nonexistent/solver_config.json")).is_none());
    }
}
