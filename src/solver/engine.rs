//! Top-level hybrid solver orchestrator.
//!
//! Routes preflop spots to the tiered table solver and postflop spots
//! to the lookup/heuristic solver, applies tournament ICM adjustment,
//! and wraps everything in a failure boundary that degrades to a safe
//! pure fold rather than propagating a panic into the caller.

use crate::context::GameContext;
use crate::eval::HandEvaluator;
use crate::icm::survival_premium;
use crate::range::Range;
use crate::solver::adjust::adjust_for_icm;
use crate::solver::estimator::hand_strength_score;
use crate::solver::postflop::{PostflopSolver, PostflopSpot};
use crate::solver::preflop::PreflopSolver;
use crate::solver::types::{Solver, SolverResult, Source, StrategyNode};
use crate::state::{GameState, PlayerState, PriorAction};
use crate::cards::Street;
use crate::texture::BoardTexture;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Safe result when the solve fails unexpectedly: always fold, zero
/// confidence, so callers fall back to their own heuristics.
fn fallback_result() -> SolverResult {
    SolverResult::new(StrategyNode::pure_fold(), Source::Fallback, 0.0, 0.0)
}

/// Hybrid solver engine.
///
/// Implements [`Solver`] so it can be swapped for the external relay or
/// a test double.
#[derive(Debug, Default)]
pub struct SolverEngine {
    preflop: PreflopSolver,
    postflop: PostflopSolver,
}

impl SolverEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from preconfigured solvers (loaded tables, seeded equity).
    pub fn with_solvers(preflop: PreflopSolver, postflop: PostflopSolver) -> Self {
        Self { preflop, postflop }
    }

    fn solve_inner(
        &self,
        game_state: &GameState,
        context: &GameContext,
        hero_index: usize,
        action_history: &[PriorAction],
        opponent_range: Option<&Range>,
    ) -> SolverResult {
        let hero = &game_state.players[hero_index];

        let hole = match &hero.hole_cards {
            Some(hole) => *hole,
            None => {
                log::debug!("no hole cards for hero, returning fold");
                return SolverResult::new(StrategyNode::pure_fold(), Source::NoCards, 0.0, 0.0);
            }
        };

        let premium = if context.is_tournament() {
            survival_premium(context)
        } else {
            1.0
        };
        if context.is_tournament() {
            log::debug!(
                "tournament mode: phase={:?}, premium={:.2}",
                context.tournament_phase,
                premium
            );
        }

        let mut result = if game_state.current_street() == Street::Preflop {
            let t0 = Instant::now();
            let result = self.preflop.get_strategy(
                &hole,
                hero.position,
                action_history,
                context.stack_depth_bb,
                premium,
            );
            log::debug!(
                "preflop lookup: {:.1}ms (source={})",
                t0.elapsed().as_secs_f64() * 1000.0,
                result.source
            );
            result
        } else {
            self.solve_postflop(hero, &hole, game_state, context, action_history, opponent_range)
        };

        if context.is_tournament() && premium < 0.95 {
            log::debug!("applying ICM adjustment: premium={:.2}", premium);
            result.strategy = adjust_for_icm(&result.strategy, premium);
            result.ev *= premium;
        }

        result
    }

    fn solve_postflop(
        &self,
        hero: &PlayerState,
        hole: &crate::cards::HoleCards,
        game_state: &GameState,
        context: &GameContext,
        action_history: &[PriorAction],
        opponent_range: Option<&Range>,
    ) -> SolverResult {
        let t0 = Instant::now();

        let mut cards = hole.cards().to_vec();
        cards.extend_from_slice(&game_state.community_cards);
        let hand_result = match HandEvaluator::evaluate(&cards) {
            Ok(result) => result,
            Err(e) => {
                log::error!("postflop evaluation failed: {}", e);
                return fallback_result();
            }
        };
        let hand_strength = hand_strength_score(&hand_result, &game_state.community_cards);

        let texture = BoardTexture::analyze(&game_state.community_cards);
        let has_draw = texture.has_flush_draw || texture.has_straight_draw;
        let draw_strength = if texture.has_flush_draw {
            0.5
        } else if texture.has_straight_draw {
            0.35
        } else {
            0.0
        };

        let num_opponents = game_state.players_in_hand().saturating_sub(1).max(1);
        let villain_positions: Vec<_> = game_state
            .active_players()
            .filter(|p| p.name != hero.name)
            .map(|p| p.position)
            .collect();
        let is_ip = hero.position.is_in_position(&villain_positions);

        let opponent_stats = game_state
            .active_players()
            .filter(|p| p.name != hero.name)
            .find_map(|p| context.stats_for(&p.name));

        let spot = PostflopSpot {
            hero: hole,
            board: &game_state.community_cards,
            position: hero.position,
            pot: game_state.pot,
            hero_stack: hero.chips,
            big_blind: game_state.big_blind,
            action_history,
            hand_strength,
            has_draw,
            draw_strength,
            opponent_range,
            num_opponents,
            is_ip,
            opponent_stats,
        };
        let result = self.postflop.get_strategy(&spot);

        log::debug!(
            "postflop solve: {:.1}ms (source={}, hand_strength={:.2}, category={:?}, board={:?})",
            t0.elapsed().as_secs_f64() * 1000.0,
            result.source,
            hand_strength,
            result.spot_key.and_then(|k| k.hand_category),
            result.spot_key.and_then(|k| k.board_bucket),
        );
        result
    }
}

impl Solver for SolverEngine {
    /// Solve for the optimal mixed strategy.
    ///
    /// Any panic inside the solve is caught, logged, and converted to
    /// the pure-fold fallback so one bad spot cannot take down a
    /// session.
    fn solve(
        &self,
        game_state: &GameState,
        context: &GameContext,
        hero_index: usize,
        action_history: &[PriorAction],
        opponent_range: Option<&Range>,
    ) -> SolverResult {
        let started = Instant::now();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.solve_inner(
                game_state,
                context,
                hero_index,
                action_history,
                opponent_range,
            )
        }));

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let result = match outcome {
            Ok(result) => result,
            Err(_) => {
                log::error!(
                    "solver failed after {:.1}ms, returning safe fallback",
                    elapsed_ms
                );
                return fallback_result();
            }
        };

        let rec = match result.strategy.recommended_action() {
            Some(rec) => format!("{} {:.0}%", rec.action.label(), rec.frequency * 100.0),
            None => "none".to_string(),
        };
        let (street, position) = match &result.spot_key {
            Some(key) => (key.street.label(), key.position.label()),
            None => ("unknown", "?"),
        };
        log::info!(
            "{} {} -> {} (source={}, confidence={:.0}%, ev={:.2}, {:.1}ms)",
            street,
            position,
            rec,
            result.source,
            result.confidence * 100.0,
            result.ev,
            elapsed_ms,
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::context::{PayoutStructure, TournamentPhase};
    use crate::state::{Action, Position};

    fn players(hero_cards: Option<&str>) -> Vec<PlayerState> {
        let mut hero = PlayerState::new("hero", 100.0, Position::Btn);
        if let Some(cards) = hero_cards {
            hero = hero.with_hole_cards(cards.parse().unwrap());
        }
        vec![hero, PlayerState::new("villain", 80.0, Position::Bb)]
    }

    fn tournament_context(phase: TournamentPhase) -> GameContext {
        let payouts = PayoutStructure::new([(1, 500.0), (2, 300.0), (3, 200.0)]);
        GameContext::tournament(20.0, phase, 12, Some(payouts))
    }

    #[test]
    fn test_preflop_spot_resolves() {
        let engine = SolverEngine::new();
        let state = GameState::new(players(Some("AsAd")), 0.5, 1.0);
        let context = GameContext::cash_game(100.0, 2);

        let result = engine.solve(&state, &context, 0, &[], None);
        assert_eq!(result.source, Source::Heuristic);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Raise
        );
    }

    #[test]
    fn test_postflop_spot_resolves() {
        let engine = SolverEngine::new();
        let state = GameState::new(players(Some("AsAd")), 0.5, 1.0)
            .with_board(parse_cards("Ah 8d 3c").unwrap())
            .with_pot(6.0);
        let context = GameContext::cash_game(100.0, 2);

        let result = engine.solve(&state, &context, 0, &[], None);
        assert_eq!(result.source, Source::Heuristic);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Raise
        );
        let key = result.spot_key.unwrap();
        assert_eq!(key.street, Street::Flop);
    }

    #[test]
    fn test_no_hole_cards_folds_with_zero_confidence() {
        let engine = SolverEngine::new();
        let state = GameState::new(players(None), 0.5, 1.0);
        let context = GameContext::cash_game(100.0, 2);

        let result = engine.solve(&state, &context, 0, &[], None);
        assert_eq!(result.source, Source::NoCards);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Fold
        );
    }

    #[test]
    fn test_out_of_bounds_hero_hits_failure_boundary() {
        let engine = SolverEngine::new();
        let state = GameState::new(players(Some("AsAd")), 0.5, 1.0);
        let context = GameContext::cash_game(100.0, 2);

        let result = engine.solve(&state, &context, 99, &[], None);
        assert_eq!(result.source, Source::Fallback);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Fold
        );
    }

    #[test]
    fn test_bubble_tightens_strategy() {
        let engine = SolverEngine::new();
        let state = GameState::new(players(Some("AsQd")), 0.5, 1.0);

        let cash = engine.solve(&state, &GameContext::cash_game(20.0, 6), 0, &[], None);
        let bubble = engine.solve(
            &state,
            &tournament_context(TournamentPhase::Bubble),
            0,
            &[],
            None,
        );

        assert!(
            bubble.strategy.frequency_of(Action::Fold)
                >= cash.strategy.frequency_of(Action::Fold)
        );
        assert!(bubble.strategy.frequency_of(Action::Raise) < cash.strategy.frequency_of(Action::Raise));
    }
}
