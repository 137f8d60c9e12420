//! Tiered preflop strategy lookup.
//!
//! Resolution order: exact table (stack-ladder depth, solver exports),
//! then the coarse generated table, then a binary range-membership
//! heuristic. Each tier carries its own confidence so callers can see
//! how much to trust the answer.

use crate::cards::HoleCards;
use crate::charts;
use crate::range::{hand_to_notation, HandNotation, Range};
use crate::solver::adjust::adjust_for_icm;
use crate::solver::types::{
    parse_action_tag, ActionFrequency, ActionSequence, SolverResult, Source, SpotKey, StrategyNode,
};
use crate::state::{Action, Position, PriorAction};
use crate::texture::{nearest_stack_bb, StackBucket};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Table loading failure.
#[derive(Debug)]
pub enum TableError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnknownTag(String),
    InvalidHand(String),
    UnknownKey(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Io(e) => write!(f, "failed to read strategy table: {}", e),
            TableError::Json(e) => write!(f, "failed to parse strategy table: {}", e),
            TableError::UnknownTag(tag) => write!(f, "unknown action tag: {:?}", tag),
            TableError::InvalidHand(hand) => write!(f, "invalid hand notation: {:?}", hand),
            TableError::UnknownKey(key) => write!(f, "unknown table key: {:?}", key),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Io(e) => Some(e),
            TableError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        TableError::Io(e)
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        TableError::Json(e)
    }
}

/// One persisted strategy row in the exact table.
#[derive(Debug, Clone, Deserialize)]
pub struct ExactRow {
    pub position: Position,
    pub action_sequence: ActionSequence,
    pub stack_bb: u32,
    pub hand: String,
    pub tag: String,
    pub frequency: f64,
    #[serde(default)]
    pub ev: f64,
}

/// One action entry in the coarse generated table.
#[derive(Debug, Clone, Deserialize)]
struct CoarseAction {
    action: String,
    frequency: f64,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    ev: f64,
}

type CoarseTable = FxHashMap<String, FxHashMap<String, FxHashMap<String, Vec<CoarseAction>>>>;

fn sequence_from_label(label: &str) -> Option<ActionSequence> {
    match label {
        "open" => Some(ActionSequence::Open),
        "vs_raise" => Some(ActionSequence::VsRaise),
        "vs_3bet" => Some(ActionSequence::Vs3bet),
        "vs_4bet" => Some(ActionSequence::Vs4bet),
        _ => None,
    }
}

fn position_from_label(label: &str) -> Option<Position> {
    Position::ALL.iter().copied().find(|p| p.label() == label)
}

/// Tiered preflop strategy solver.
///
/// Both tables are optional; an empty solver answers every spot from the
/// range heuristic at low confidence.
#[derive(Debug, Default)]
pub struct PreflopSolver {
    exact: FxHashMap<(Position, ActionSequence, u32, HandNotation), StrategyNode>,
    coarse: FxHashMap<(Position, ActionSequence, HandNotation), StrategyNode>,
}

impl PreflopSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the coarse generated table from a JSON file.
    pub fn with_coarse_table(mut self, path: &Path) -> Result<Self, TableError> {
        let raw: CoarseTable = serde_json::from_str(&fs::read_to_string(path)?)?;
        self.load_coarse(raw)?;
        Ok(self)
    }

    /// Load exact solver-export rows from a JSON file.
    pub fn with_exact_table(mut self, path: &Path) -> Result<Self, TableError> {
        let rows: Vec<ExactRow> = serde_json::from_str(&fs::read_to_string(path)?)?;
        self.load_exact(rows)?;
        Ok(self)
    }

    /// Insert exact rows directly (used by importers and tests).
    pub fn load_exact(&mut self, rows: Vec<ExactRow>) -> Result<(), TableError> {
        for row in rows {
            let hand: HandNotation = row
                .hand
                .parse()
                .map_err(|_| TableError::InvalidHand(row.hand.clone()))?;
            let (action, amount) =
                parse_action_tag(&row.tag).ok_or_else(|| TableError::UnknownTag(row.tag.clone()))?;
            let key = (row.position, row.action_sequence, row.stack_bb, hand);
            self.exact
                .entry(key)
                .or_insert_with(StrategyNode::default)
                .actions
                .push(ActionFrequency::new(action, row.frequency, amount, row.ev));
        }
        Ok(())
    }

    fn load_coarse(&mut self, raw: CoarseTable) -> Result<(), TableError> {
        for (pos_label, by_seq) in raw {
            let position = position_from_label(&pos_label)
                .ok_or_else(|| TableError::UnknownKey(pos_label.clone()))?;
            for (seq_label, by_hand) in by_seq {
                let sequence = sequence_from_label(&seq_label)
                    .ok_or_else(|| TableError::UnknownKey(seq_label.clone()))?;
                for (hand_str, entries) in by_hand {
                    let hand: HandNotation = hand_str
                        .parse()
                        .map_err(|_| TableError::InvalidHand(hand_str.clone()))?;
                    let mut actions = Vec::with_capacity(entries.len());
                    for entry in entries {
                        let (action, tag_amount) = parse_action_tag(&entry.action)
                            .ok_or_else(|| TableError::UnknownTag(entry.action.clone()))?;
                        let amount = if entry.amount > 0.0 {
                            entry.amount
                        } else {
                            tag_amount
                        };
                        actions.push(ActionFrequency::new(
                            action,
                            entry.frequency,
                            amount,
                            entry.ev,
                        ));
                    }
                    self.coarse
                        .insert((position, sequence, hand), StrategyNode::new(actions));
                }
            }
        }
        Ok(())
    }

    pub fn exact_len(&self) -> usize {
        self.exact.len()
    }

    pub fn coarse_len(&self) -> usize {
        self.coarse.len()
    }

    /// Resolve a complete strategy for a preflop spot.
    ///
    /// `survival_premium` below 0.95 triggers the ICM frequency shift on
    /// table hits; the heuristic tier folds it into the raise frequency
    /// directly.
    pub fn get_strategy(
        &self,
        hole: &HoleCards,
        position: Position,
        action_history: &[PriorAction],
        stack_bb: f64,
        survival_premium: f64,
    ) -> SolverResult {
        let hand = hand_to_notation(hole);
        let sequence = ActionSequence::from_history(action_history);
        let spot_key = SpotKey::preflop(position, sequence, StackBucket::from_bb(stack_bb));

        let ladder_stack = nearest_stack_bb(stack_bb);
        if let Some(node) = self.exact.get(&(position, sequence, ladder_stack, hand)) {
            log::debug!(
                "exact preflop hit: {} {} {}bb {}",
                position.label(),
                sequence.label(),
                ladder_stack,
                hand
            );
            let node = adjust_for_icm(&node.normalized(), survival_premium);
            let ev = node.weighted_ev();
            return SolverResult::new(node, Source::PreflopExact, 0.95, ev)
                .with_spot_key(spot_key);
        }

        if let Some(node) = self.coarse.get(&(position, sequence, hand)) {
            let node = adjust_for_icm(node, survival_premium);
            let ev = node.weighted_ev();
            return SolverResult::new(node, Source::PreflopLookup, 0.85, ev)
                .with_spot_key(spot_key);
        }

        let node = heuristic_fallback(&hand, position, sequence, survival_premium);
        let ev = node.weighted_ev();
        SolverResult::new(node, Source::Heuristic, 0.4, ev).with_spot_key(spot_key)
    }
}

/// Binary range-membership fallback when no table covers the spot.
fn heuristic_fallback(
    hand: &HandNotation,
    position: Position,
    sequence: ActionSequence,
    survival_premium: f64,
) -> StrategyNode {
    let target_range: Range = match sequence {
        ActionSequence::Open => charts::opening_range(position),
        ActionSequence::VsRaise => charts::three_bet_range(position),
        ActionSequence::Vs3bet => charts::four_bet_range(position),
        _ => Range::new(),
    };

    if !target_range.is_empty() && target_range.contains_notation(hand) {
        let amount = match sequence {
            ActionSequence::VsRaise => 7.5,
            ActionSequence::Vs3bet => 22.0,
            _ => 2.5,
        };
        let freq = survival_premium.max(0.5);
        StrategyNode::new(vec![
            ActionFrequency::new(Action::Raise, freq, amount, 0.3),
            ActionFrequency::new(Action::Fold, 1.0 - freq, 0.0, 0.0),
        ])
    } else {
        StrategyNode::new(vec![
            ActionFrequency::new(Action::Fold, 0.95, 0.0, 0.0),
            ActionFrequency::new(Action::Raise, 0.05, 2.5, -0.5),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(s: &str) -> HoleCards {
        s.parse().unwrap()
    }

    fn raise_history() -> Vec<PriorAction> {
        vec![PriorAction::new(Position::Co, Action::Raise, 2.5)]
    }

    fn exact_row(
        position: Position,
        sequence: ActionSequence,
        stack_bb: u32,
        hand: &str,
        tag: &str,
        frequency: f64,
        ev: f64,
    ) -> ExactRow {
        ExactRow {
            position,
            action_sequence: sequence,
            stack_bb,
            hand: hand.to_string(),
            tag: tag.to_string(),
            frequency,
            ev,
        }
    }

    #[test]
    fn test_exact_tier_preferred() {
        let mut solver = PreflopSolver::new();
        solver
            .load_exact(vec![
                exact_row(Position::Sb, ActionSequence::Open, 100, "T7o", "limp", 0.83, -0.08),
                exact_row(Position::Sb, ActionSequence::Open, 100, "T7o", "fold", 0.17, -0.42),
            ])
            .unwrap();

        let result = solver.get_strategy(&hole("Th7d"), Position::Sb, &[], 97.0, 1.0);
        assert_eq!(result.source, Source::PreflopExact);
        assert!((result.confidence - 0.95).abs() < 1e-9);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Limp
        );
        // 97bb snaps to the 100bb rung
        let key = result.spot_key.unwrap();
        assert_eq!(key.action_sequence, ActionSequence::Open);
    }

    #[test]
    fn test_exact_tier_sized_raise_tag() {
        let mut solver = PreflopSolver::new();
        solver
            .load_exact(vec![
                exact_row(Position::Btn, ActionSequence::Open, 50, "A5s", "raise_2.5", 0.7, 0.4),
                exact_row(Position::Btn, ActionSequence::Open, 50, "A5s", "fold", 0.3, 0.0),
            ])
            .unwrap();

        let result = solver.get_strategy(&hole("Ah5h"), Position::Btn, &[], 50.0, 1.0);
        let raise = result
            .strategy
            .actions
            .iter()
            .find(|a| a.action == Action::Raise)
            .unwrap();
        assert!((raise.amount - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tag_rejected_at_load() {
        let mut solver = PreflopSolver::new();
        let err = solver
            .load_exact(vec![exact_row(
                Position::Btn,
                ActionSequence::Open,
                50,
                "A5s",
                "donk",
                1.0,
                0.0,
            )])
            .unwrap_err();
        assert!(matches!(err, TableError::UnknownTag(_)));
    }

    #[test]
    fn test_coarse_tier() {
        let mut solver = PreflopSolver::new();
        let json = r#"{
            "BTN": {
                "open": {
                    "AKs": [
                        {"action": "raise", "frequency": 1.0, "amount": 2.5, "ev": 2.0}
                    ]
                }
            }
        }"#;
        let raw: CoarseTable = serde_json::from_str(json).unwrap();
        solver.load_coarse(raw).unwrap();

        let result = solver.get_strategy(&hole("AsKs"), Position::Btn, &[], 60.0, 1.0);
        assert_eq!(result.source, Source::PreflopLookup);
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Raise
        );
    }

    #[test]
    fn test_heuristic_in_range() {
        let solver = PreflopSolver::new();
        let result = solver.get_strategy(&hole("AsAd"), Position::Utg, &[], 100.0, 1.0);
        assert_eq!(result.source, Source::Heuristic);
        assert!((result.confidence - 0.4).abs() < 1e-9);
        let raise = result.strategy.recommended_action().unwrap();
        assert_eq!(raise.action, Action::Raise);
        assert!((raise.amount - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_vs_raise_sizing() {
        let solver = PreflopSolver::new();
        let result =
            solver.get_strategy(&hole("KsKd"), Position::Btn, &raise_history(), 100.0, 1.0);
        let raise = result.strategy.recommended_action().unwrap();
        assert_eq!(raise.action, Action::Raise);
        assert!((raise.amount - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_out_of_range_folds() {
        let solver = PreflopSolver::new();
        let result = solver.get_strategy(&hole("7h2c"), Position::Utg, &[], 100.0, 1.0);
        let rec = result.strategy.recommended_action().unwrap();
        assert_eq!(rec.action, Action::Fold);
        assert!((rec.frequency - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_icm_shifts_table_hit_toward_fold() {
        let mut solver = PreflopSolver::new();
        solver
            .load_exact(vec![
                exact_row(Position::Btn, ActionSequence::Open, 20, "A5s", "raise_2.5", 0.7, 0.4),
                exact_row(Position::Btn, ActionSequence::Open, 20, "A5s", "fold", 0.3, 0.0),
            ])
            .unwrap();

        let chip_ev = solver.get_strategy(&hole("Ah5h"), Position::Btn, &[], 20.0, 1.0);
        let bubble = solver.get_strategy(&hole("Ah5h"), Position::Btn, &[], 20.0, 0.6);
        assert!(
            bubble.strategy.frequency_of(Action::Fold)
                > chip_ev.strategy.frequency_of(Action::Fold)
        );
    }

    #[test]
    fn test_heuristic_premium_tightens_raise_frequency() {
        let solver = PreflopSolver::new();
        let chip_ev = solver.get_strategy(&hole("AsAd"), Position::Utg, &[], 100.0, 1.0);
        let bubble = solver.get_strategy(&hole("AsAd"), Position::Utg, &[], 100.0, 0.65);
        assert!(
            bubble.strategy.frequency_of(Action::Raise)
                < chip_ev.strategy.frequency_of(Action::Raise)
        );
    }
}
