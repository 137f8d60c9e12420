//! Core data structures for the solver engine.
//!
//! `ActionFrequency` is a single weighted action; `StrategyNode` is a
//! mixed strategy over them; `SolverResult` carries the strategy with
//! provenance and confidence; `SpotKey` identifies a situation for
//! precomputed lookup. The `Solver` trait is the seam any backend
//! implements.

use crate::cards::Street;
use crate::context::GameContext;
use crate::range::Range;
use crate::state::{Action, GameState, Position, PriorAction};
use crate::texture::{BoardBucket, SprBucket, StackBucket};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single action in a mixed strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionFrequency {
    pub action: Action,
    /// How often to take this action, in [0, 1].
    pub frequency: f64,
    /// Bet/raise-to amount (0 for fold/check).
    #[serde(default)]
    pub amount: f64,
    /// Expected value in big blinds.
    #[serde(default)]
    pub ev: f64,
}

impl ActionFrequency {
    pub fn new(action: Action, frequency: f64, amount: f64, ev: f64) -> Self {
        Self {
            action,
            frequency,
            amount,
            ev,
        }
    }
}

/// A mixed strategy: weighted actions summing to 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyNode {
    pub actions: Vec<ActionFrequency>,
}

impl StrategyNode {
    pub fn new(actions: Vec<ActionFrequency>) -> Self {
        Self { actions }
    }

    /// A strategy with a single always-taken action.
    pub fn pure(action: Action, amount: f64, ev: f64) -> Self {
        Self {
            actions: vec![ActionFrequency::new(action, 1.0, amount, ev)],
        }
    }

    pub fn pure_fold() -> Self {
        Self::pure(Action::Fold, 0.0, 0.0)
    }

    /// The highest-frequency action.
    pub fn recommended_action(&self) -> Option<&ActionFrequency> {
        self.actions
            .iter()
            .max_by(|a, b| a.frequency.total_cmp(&b.frequency))
    }

    /// Sample an action according to the mixed frequencies. Used for
    /// unexploitable mixing in live play.
    pub fn sample_action<R: Rng>(&self, rng: &mut R) -> Option<&ActionFrequency> {
        if self.actions.len() <= 1 {
            return self.actions.first();
        }
        let r: f64 = rng.gen();
        let mut cumulative = 0.0;
        for action in &self.actions {
            cumulative += action.frequency;
            if r <= cumulative {
                return Some(action);
            }
        }
        // Floating-point rounding can leave the tail uncovered
        self.actions.last()
    }

    /// Whether this is effectively a pure strategy.
    pub fn is_pure(&self) -> bool {
        self.actions.len() <= 1 || self.actions.iter().any(|a| a.frequency >= 0.99)
    }

    /// EV of the single best action (0 for an empty node).
    pub fn best_ev(&self) -> f64 {
        if self.actions.is_empty() {
            return 0.0;
        }
        self.actions
            .iter()
            .map(|a| a.ev)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Frequency-weighted EV of the strategy.
    pub fn weighted_ev(&self) -> f64 {
        self.actions.iter().map(|a| a.frequency * a.ev).sum()
    }

    /// Copy with frequencies scaled to sum to 1. Idempotent; a node whose
    /// frequencies sum to zero is returned unchanged.
    pub fn normalized(&self) -> StrategyNode {
        let total: f64 = self.actions.iter().map(|a| a.frequency).sum();
        if total <= 0.0 {
            return self.clone();
        }
        StrategyNode {
            actions: self
                .actions
                .iter()
                .map(|a| ActionFrequency {
                    frequency: a.frequency / total,
                    ..*a
                })
                .collect(),
        }
    }

    /// Frequency of a specific action (0 when absent).
    pub fn frequency_of(&self, action: Action) -> f64 {
        self.actions
            .iter()
            .filter(|a| a.action == action)
            .map(|a| a.frequency)
            .sum()
    }
}

/// Betting sequence bucket. The first four variants key preflop tables
/// (from the raise count); the rest summarize postflop lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSequence {
    Open,
    VsRaise,
    #[serde(rename = "vs_3bet")]
    Vs3bet,
    #[serde(rename = "vs_4bet")]
    Vs4bet,
    FirstToAct,
    Checked,
    Bet,
    CheckRaise,
    RaiseRaise,
}

impl ActionSequence {
    pub fn from_history(history: &[PriorAction]) -> ActionSequence {
        let raises = history.iter().filter(|a| a.action.is_aggressive()).count();
        match raises {
            0 => ActionSequence::Open,
            1 => ActionSequence::VsRaise,
            2 => ActionSequence::Vs3bet,
            _ => ActionSequence::Vs4bet,
        }
    }

    pub fn from_postflop_history(history: &[PriorAction]) -> ActionSequence {
        let raises = history.iter().filter(|a| a.action.is_aggressive()).count();
        let checks = history
            .iter()
            .filter(|a| a.action == Action::Check)
            .count();
        if raises >= 2 {
            ActionSequence::RaiseRaise
        } else if raises == 1 {
            if checks == 0 {
                ActionSequence::Bet
            } else {
                ActionSequence::CheckRaise
            }
        } else if checks >= 1 {
            ActionSequence::Checked
        } else {
            ActionSequence::FirstToAct
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionSequence::Open => "open",
            ActionSequence::VsRaise => "vs_raise",
            ActionSequence::Vs3bet => "vs_3bet",
            ActionSequence::Vs4bet => "vs_4bet",
            ActionSequence::FirstToAct => "first_to_act",
            ActionSequence::Checked => "checked",
            ActionSequence::Bet => "bet",
            ActionSequence::CheckRaise => "check_raise",
            ActionSequence::RaiseRaise => "raise_raise",
        }
    }
}

impl fmt::Display for ActionSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Made-hand/draw category for postflop lookup keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    Nuts,
    StrongMade,
    MediumMade,
    WeakMade,
    StrongDraw,
    MediumDraw,
    WeakDraw,
    Air,
}

impl HandCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HandCategory::Nuts => "nuts",
            HandCategory::StrongMade => "strong_made",
            HandCategory::MediumMade => "medium_made",
            HandCategory::WeakMade => "weak_made",
            HandCategory::StrongDraw => "strong_draw",
            HandCategory::MediumDraw => "medium_draw",
            HandCategory::WeakDraw => "weak_draw",
            HandCategory::Air => "air",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hashable identifier for a specific game situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotKey {
    pub street: Street,
    pub position: Position,
    pub action_sequence: ActionSequence,
    pub stack_bucket: StackBucket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_bucket: Option<BoardBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spr_bucket: Option<SprBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_category: Option<HandCategory>,
}

impl SpotKey {
    pub fn preflop(
        position: Position,
        action_sequence: ActionSequence,
        stack_bucket: StackBucket,
    ) -> Self {
        Self {
            street: Street::Preflop,
            position,
            action_sequence,
            stack_bucket,
            board_bucket: None,
            spr_bucket: None,
            hand_category: None,
        }
    }
}

/// Where a strategy came from. Confidence below 0.5 marks low trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Solver-depth exact preflop table hit.
    PreflopExact,
    /// Coarse preflop table hit.
    PreflopLookup,
    /// Binary range-membership heuristic.
    Heuristic,
    /// Precomputed postflop bucket table hit.
    PostflopLookup,
    /// Heuristic refined by Monte Carlo equity.
    MonteCarlo,
    /// External CFR solver bridge.
    ExternalSolver,
    /// Bridge absent or failed; no strategy available.
    GtoUnavailable,
    /// Hero hole cards missing from the input.
    NoCards,
    /// Engine failure boundary tripped.
    Fallback,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::PreflopExact => "preflop_exact",
            Source::PreflopLookup => "preflop_lookup",
            Source::Heuristic => "heuristic",
            Source::PostflopLookup => "postflop_lookup",
            Source::MonteCarlo => "monte_carlo",
            Source::ExternalSolver => "external_solver",
            Source::GtoUnavailable => "gto_unavailable",
            Source::NoCards => "no_cards",
            Source::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete solver output for a spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub strategy: StrategyNode,
    pub source: Source,
    /// Trust in the strategy, in [0, 1].
    pub confidence: f64,
    /// Expected value in big blinds.
    pub ev: f64,
    pub spot_key: Option<SpotKey>,
}

impl SolverResult {
    pub fn new(strategy: StrategyNode, source: Source, confidence: f64, ev: f64) -> Self {
        Self {
            strategy,
            source,
            confidence,
            ev,
            spot_key: None,
        }
    }

    pub fn with_spot_key(mut self, spot_key: SpotKey) -> Self {
        self.spot_key = Some(spot_key);
        self
    }
}

/// Interface any solver backend implements, allowing the hybrid engine,
/// the external relay, and test doubles to be swapped freely.
pub trait Solver {
    fn solve(
        &self,
        game_state: &GameState,
        context: &GameContext,
        hero_index: usize,
        action_history: &[PriorAction],
        opponent_range: Option<&Range>,
    ) -> SolverResult;
}

/// Persisted-table action tag: `fold`, `call`, `raise_2.5`, `raise_all_in`.
pub fn parse_action_tag(tag: &str) -> Option<(Action, f64)> {
    match tag {
        "fold" => return Some((Action::Fold, 0.0)),
        "check" => return Some((Action::Check, 0.0)),
        "call" => return Some((Action::Call, 0.0)),
        "limp" => return Some((Action::Limp, 1.0)),
        "all_in" | "raise_all_in" => return Some((Action::AllIn, 0.0)),
        "raise" => return Some((Action::Raise, 0.0)),
        _ => {}
    }
    let amount = tag.strip_prefix("raise_")?.parse::<f64>().ok()?;
    Some((Action::Raise, amount))
}

/// Render an action and amount back into its table tag.
pub fn action_tag(action: Action, amount: f64) -> String {
    match action {
        Action::Raise if amount > 0.0 => format!("raise_{}", amount),
        Action::AllIn => "raise_all_in".to_string(),
        other => other.label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn node(freqs: &[(Action, f64)]) -> StrategyNode {
        StrategyNode::new(
            freqs
                .iter()
                .map(|&(a, f)| ActionFrequency::new(a, f, 0.0, 0.0))
                .collect(),
        )
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let raw = node(&[(Action::Raise, 2.0), (Action::Fold, 1.0), (Action::Call, 1.0)]);
        let normalized = raw.normalized();
        let total: f64 = normalized.actions.iter().map(|a| a.frequency).sum();
        assert!((total - 1.0).abs() < 1e-3);
        assert!((normalized.frequency_of(Action::Raise) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_idempotent() {
        let raw = node(&[(Action::Raise, 0.6), (Action::Fold, 0.9)]);
        let once = raw.normalized();
        let twice = once.normalized();
        for (a, b) in once.actions.iter().zip(&twice.actions) {
            assert!((a.frequency - b.frequency).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalized_zero_total_unchanged() {
        let zero = node(&[(Action::Raise, 0.0), (Action::Fold, 0.0)]);
        assert_eq!(zero.normalized(), zero);
    }

    #[test]
    fn test_recommended_action() {
        let strategy = node(&[(Action::Fold, 0.3), (Action::Raise, 0.7)]);
        assert_eq!(strategy.recommended_action().unwrap().action, Action::Raise);
        assert!(StrategyNode::default().recommended_action().is_none());
    }

    #[test]
    fn test_sample_action_respects_frequencies() {
        let strategy = node(&[(Action::Fold, 0.25), (Action::Raise, 0.75)]);
        let mut rng = StdRng::seed_from_u64(99);
        let mut raises = 0u32;
        for _ in 0..2000 {
            if strategy.sample_action(&mut rng).unwrap().action == Action::Raise {
                raises += 1;
            }
        }
        let observed = raises as f64 / 2000.0;
        assert!((observed - 0.75).abs() < 0.05, "observed {}", observed);
    }

    #[test]
    fn test_is_pure() {
        assert!(StrategyNode::pure_fold().is_pure());
        assert!(node(&[(Action::Raise, 0.995), (Action::Fold, 0.005)]).is_pure());
        assert!(!node(&[(Action::Raise, 0.6), (Action::Fold, 0.4)]).is_pure());
    }

    #[test]
    fn test_weighted_ev() {
        let strategy = StrategyNode::new(vec![
            ActionFrequency::new(Action::Raise, 0.5, 2.5, 1.0),
            ActionFrequency::new(Action::Fold, 0.5, 0.0, 0.0),
        ]);
        assert!((strategy.weighted_ev() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_action_sequence_from_history() {
        use Position::*;
        let open: &[PriorAction] = &[PriorAction::new(Utg, Action::Fold, 0.0)];
        assert_eq!(ActionSequence::from_history(open), ActionSequence::Open);

        let vs_raise = &[PriorAction::new(Co, Action::Raise, 2.5)];
        assert_eq!(
            ActionSequence::from_history(vs_raise),
            ActionSequence::VsRaise
        );

        let vs_3bet = &[
            PriorAction::new(Co, Action::Raise, 2.5),
            PriorAction::new(Btn, Action::Raise, 7.5),
        ];
        assert_eq!(ActionSequence::from_history(vs_3bet), ActionSequence::Vs3bet);

        let vs_4bet = &[
            PriorAction::new(Co, Action::Raise, 2.5),
            PriorAction::new(Btn, Action::Raise, 7.5),
            PriorAction::new(Co, Action::AllIn, 100.0),
        ];
        assert_eq!(ActionSequence::from_history(vs_4bet), ActionSequence::Vs4bet);
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(parse_action_tag("fold"), Some((Action::Fold, 0.0)));
        assert_eq!(parse_action_tag("raise_2.5"), Some((Action::Raise, 2.5)));
        assert_eq!(parse_action_tag("raise_all_in"), Some((Action::AllIn, 0.0)));
        assert_eq!(parse_action_tag("donk"), None);
        assert_eq!(parse_action_tag("raise_abc"), None);

        assert_eq!(action_tag(Action::Raise, 2.5), "raise_2.5");
        assert_eq!(action_tag(Action::AllIn, 0.0), "raise_all_in");
        assert_eq!(action_tag(Action::Fold, 0.0), "fold");
    }
}
