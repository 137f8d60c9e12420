//! Postflop strategy solver: precomputed bucket lookup with a
//! heuristic-plus-Monte-Carlo fallback.
//!
//! Lookup keys are (board bucket, hand category, SPR bucket). When the
//! table misses, a category/texture heuristic supplies the baseline and
//! close decisions are refined with equity simulation against the
//! opponent's range. Positional, multiway, and exploitative multipliers
//! are applied on top of either path.

use crate::cards::{Card, HoleCards, Street};
use crate::context::OpponentStats;
use crate::equity::EquityCalculator;
use crate::range::Range;
use crate::solver::estimator::categorize_hand;
use crate::solver::preflop::TableError;
use crate::solver::sizing::compute_bet_amount;
use crate::solver::types::{
    parse_action_tag, ActionFrequency, ActionSequence, HandCategory, SolverResult, Source, SpotKey,
    StrategyNode,
};
use crate::state::{Action, Position, PriorAction};
use crate::texture::{BoardBucket, BoardTexture, SprBucket, StackBucket, TextureClass};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// GTO baseline stats used when the observed sample is too small.
const GTO_FOLD_TO_CBET: f64 = 50.0;
const GTO_AGGRESSION_FACTOR: f64 = 2.0;

/// Minimum observations before exploitative adjustments begin, and the
/// multiple of that threshold at which the observed stat gets full weight.
const MIN_SAMPLE_AGGRESSION: u32 = 30;
const MIN_SAMPLE_FOLD_TO_CBET: u32 = 10;
const FULL_CONFIDENCE_MULT: u32 = 3;

const REFINEMENT_SIMULATIONS: u64 = 1500;

/// A postflop spot to solve, bundled to keep the call site readable.
#[derive(Debug, Clone)]
pub struct PostflopSpot<'a> {
    pub hero: &'a HoleCards,
    pub board: &'a [Card],
    pub position: Position,
    pub pot: f64,
    pub hero_stack: f64,
    pub big_blind: f64,
    pub action_history: &'a [PriorAction],
    /// Made-hand strength in [0, 1].
    pub hand_strength: f64,
    pub has_draw: bool,
    pub draw_strength: f64,
    pub opponent_range: Option<&'a Range>,
    pub num_opponents: usize,
    pub is_ip: bool,
    pub opponent_stats: Option<&'a OpponentStats>,
}

#[derive(Debug, Clone, Deserialize)]
struct TableAction {
    action: String,
    frequency: f64,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    ev: f64,
}

type RawTable = FxHashMap<String, FxHashMap<String, FxHashMap<String, Vec<TableAction>>>>;

fn bucket_from_label(label: &str) -> Option<BoardBucket> {
    BoardBucket::ALL.iter().copied().find(|b| b.label() == label)
}

fn category_from_label(label: &str) -> Option<HandCategory> {
    use HandCategory::*;
    [
        Nuts, StrongMade, MediumMade, WeakMade, StrongDraw, MediumDraw, WeakDraw, Air,
    ]
    .into_iter()
    .find(|c| c.label() == label)
}

fn spr_from_label(label: &str) -> Option<Option<SprBucket>> {
    match label {
        "any" => Some(None),
        "low" => Some(Some(SprBucket::Low)),
        "medium" => Some(Some(SprBucket::Medium)),
        "high" => Some(Some(SprBucket::High)),
        _ => None,
    }
}

/// Postflop solver over an optional precomputed table.
#[derive(Debug, Default)]
pub struct PostflopSolver {
    table: FxHashMap<(BoardBucket, HandCategory, Option<SprBucket>), StrategyNode>,
    equity: EquityCalculator,
}

impl PostflopSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic equity refinement, for reproducible tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            table: FxHashMap::default(),
            equity: EquityCalculator::with_seed(seed),
        }
    }

    /// Load the precomputed strategy table from a JSON file.
    pub fn with_table(mut self, path: &Path) -> Result<Self, TableError> {
        let raw: RawTable = serde_json::from_str(&fs::read_to_string(path)?)?;
        self.load_table(raw)?;
        Ok(self)
    }

    fn load_table(&mut self, raw: RawTable) -> Result<(), TableError> {
        for (bucket_label, by_category) in raw {
            let bucket = bucket_from_label(&bucket_label)
                .ok_or_else(|| TableError::UnknownKey(bucket_label.clone()))?;
            for (category_label, by_spr) in by_category {
                let category = category_from_label(&category_label)
                    .ok_or_else(|| TableError::UnknownKey(category_label.clone()))?;
                for (spr_label, entries) in by_spr {
                    let spr = spr_from_label(&spr_label)
                        .ok_or_else(|| TableError::UnknownKey(spr_label.clone()))?;
                    let mut actions = Vec::with_capacity(entries.len());
                    for entry in entries {
                        let (action, _) = parse_action_tag(&entry.action)
                            .ok_or_else(|| TableError::UnknownTag(entry.action.clone()))?;
                        actions.push(ActionFrequency::new(
                            action,
                            entry.frequency,
                            entry.amount,
                            entry.ev,
                        ));
                    }
                    self.table
                        .insert((bucket, category, spr), StrategyNode::new(actions));
                }
            }
        }
        Ok(())
    }

    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Resolve a mixed strategy for a postflop spot.
    pub fn get_strategy(&self, spot: &PostflopSpot<'_>) -> SolverResult {
        let texture = BoardTexture::analyze(spot.board);
        let board_bucket = BoardBucket::from_texture(&texture);
        let spr = if spot.pot > 0.0 {
            spot.hero_stack / spot.pot
        } else {
            f64::INFINITY
        };
        let spr_bucket = SprBucket::from_spr(spr);
        let hand_category =
            categorize_hand(spot.hand_strength, spot.has_draw, spot.draw_strength);

        let spot_key = SpotKey {
            street: Street::from_board_len(spot.board.len()),
            position: spot.position,
            action_sequence: ActionSequence::from_postflop_history(spot.action_history),
            stack_bucket: StackBucket::from_bb(spot.hero_stack),
            board_bucket: Some(board_bucket),
            spr_bucket: Some(spr_bucket),
            hand_category: Some(hand_category),
        };

        if let Some(node) = self.lookup(board_bucket, hand_category, spr_bucket) {
            let node = resolve_amounts(&node, spot.pot, spot.hero_stack, spot.big_blind);
            let node = self.apply_adjustments(node, spot, hand_category);
            let ev = node.weighted_ev();
            return SolverResult::new(node, Source::PostflopLookup, 0.75, ev)
                .with_spot_key(spot_key);
        }

        let mut node = heuristic_strategy(
            hand_category,
            board_bucket,
            spot.pot,
            spot.hero_stack,
            spot.big_blind,
        );
        let mut confidence = 0.6;

        // Close decisions are worth a real simulation
        if let Some(range) = spot.opponent_range {
            if (0.30..=0.75).contains(&spot.hand_strength) {
                match self.equity.parallel_hand_vs_range(
                    spot.hero,
                    range,
                    spot.board,
                    REFINEMENT_SIMULATIONS,
                ) {
                    Ok(result) => {
                        node = refine_with_equity(&node, result.equity, spr);
                        confidence = 0.70;
                    }
                    Err(e) => {
                        log::debug!("equity refinement skipped: {}", e);
                    }
                }
            }
        }

        let node = self.apply_adjustments(node, spot, hand_category);
        let source = if confidence < 0.65 {
            Source::Heuristic
        } else {
            Source::MonteCarlo
        };
        let ev = node.weighted_ev();
        SolverResult::new(node, source, confidence, ev).with_spot_key(spot_key)
    }

    fn lookup(
        &self,
        bucket: BoardBucket,
        category: HandCategory,
        spr: SprBucket,
    ) -> Option<StrategyNode> {
        self.table
            .get(&(bucket, category, Some(spr)))
            .or_else(|| self.table.get(&(bucket, category, None)))
            .cloned()
    }

    fn apply_adjustments(
        &self,
        node: StrategyNode,
        spot: &PostflopSpot<'_>,
        hand_category: HandCategory,
    ) -> StrategyNode {
        let mut node = apply_position_adjustment(&node, spot.is_ip, hand_category);
        if spot.num_opponents >= 2 {
            node = apply_multiway_adjustment(&node, spot.num_opponents, hand_category);
        }
        if let Some(stats) = spot.opponent_stats {
            node = apply_exploit_adjustment(&node, stats, hand_category);
        }
        node
    }
}

/// Heuristic strategies by hand category and coarse texture class.
fn heuristic_spec(
    category: HandCategory,
    class: TextureClass,
) -> &'static [(Action, f64, f64)] {
    use Action::{Call, Check, Fold, Raise};
    use HandCategory::*;
    use TextureClass::*;
    match (category, class) {
        (Nuts, Dry) | (Nuts, Paired) => {
            &[(Raise, 0.85, 0.33), (Call, 0.10, 0.0), (Check, 0.05, 0.0)]
        }
        (Nuts, Wet) => &[(Raise, 0.90, 0.66), (Call, 0.05, 0.0), (Check, 0.05, 0.0)],
        (Nuts, Monotone) => &[(Raise, 0.80, 0.75), (Call, 0.15, 0.0), (Check, 0.05, 0.0)],
        (StrongMade, Dry) | (StrongMade, Paired) => {
            &[(Raise, 0.70, 0.33), (Call, 0.20, 0.0), (Check, 0.10, 0.0)]
        }
        (StrongMade, Wet) => &[(Raise, 0.75, 0.66), (Call, 0.15, 0.0), (Check, 0.10, 0.0)],
        (StrongMade, Monotone) => {
            &[(Raise, 0.65, 0.75), (Call, 0.25, 0.0), (Check, 0.10, 0.0)]
        }
        (MediumMade, Dry) | (MediumMade, Paired) => {
            &[(Raise, 0.35, 0.33), (Call, 0.40, 0.0), (Check, 0.25, 0.0)]
        }
        (MediumMade, Wet) => &[(Raise, 0.40, 0.50), (Call, 0.35, 0.0), (Check, 0.25, 0.0)],
        (MediumMade, Monotone) => {
            &[(Raise, 0.25, 0.75), (Call, 0.40, 0.0), (Check, 0.35, 0.0)]
        }
        (WeakMade, Dry) => &[
            (Check, 0.55, 0.0),
            (Call, 0.30, 0.0),
            (Raise, 0.10, 0.33),
            (Fold, 0.05, 0.0),
        ],
        (WeakMade, Wet) => &[
            (Check, 0.45, 0.0),
            (Call, 0.30, 0.0),
            (Raise, 0.15, 0.50),
            (Fold, 0.10, 0.0),
        ],
        (WeakMade, Monotone) => &[
            (Check, 0.50, 0.0),
            (Fold, 0.25, 0.0),
            (Call, 0.20, 0.0),
            (Raise, 0.05, 0.75),
        ],
        (WeakMade, Paired) => &[
            (Check, 0.55, 0.0),
            (Call, 0.30, 0.0),
            (Fold, 0.10, 0.0),
            (Raise, 0.05, 0.33),
        ],
        (StrongDraw, Dry) => &[(Raise, 0.50, 0.66), (Call, 0.35, 0.0), (Check, 0.15, 0.0)],
        (StrongDraw, Wet) => &[(Raise, 0.55, 0.66), (Call, 0.30, 0.0), (Check, 0.15, 0.0)],
        (StrongDraw, Monotone) => {
            &[(Raise, 0.45, 0.75), (Call, 0.35, 0.0), (Check, 0.20, 0.0)]
        }
        (StrongDraw, Paired) => {
            &[(Raise, 0.45, 0.50), (Call, 0.35, 0.0), (Check, 0.20, 0.0)]
        }
        (MediumDraw, Dry) | (MediumDraw, Paired) => {
            &[(Check, 0.45, 0.0), (Call, 0.35, 0.0), (Raise, 0.20, 0.50)]
        }
        (MediumDraw, Wet) => &[(Call, 0.40, 0.0), (Check, 0.35, 0.0), (Raise, 0.25, 0.66)],
        (MediumDraw, Monotone) => {
            &[(Call, 0.40, 0.0), (Check, 0.40, 0.0), (Raise, 0.20, 0.75)]
        }
        (WeakDraw, Dry) | (WeakDraw, Paired) => {
            &[(Check, 0.55, 0.0), (Fold, 0.30, 0.0), (Call, 0.15, 0.0)]
        }
        (WeakDraw, Wet) => &[(Check, 0.45, 0.0), (Fold, 0.35, 0.0), (Call, 0.20, 0.0)],
        (WeakDraw, Monotone) => &[(Fold, 0.45, 0.0), (Check, 0.40, 0.0), (Call, 0.15, 0.0)],
        (Air, Dry) => &[(Fold, 0.60, 0.0), (Check, 0.25, 0.0), (Raise, 0.15, 0.66)],
        (Air, Wet) => &[(Fold, 0.70, 0.0), (Check, 0.20, 0.0), (Raise, 0.10, 0.66)],
        (Air, Monotone) => &[(Fold, 0.75, 0.0), (Check, 0.20, 0.0), (Raise, 0.05, 0.75)],
        (Air, Paired) => &[(Fold, 0.60, 0.0), (Check, 0.25, 0.0), (Raise, 0.15, 0.33)],
    }
}

fn heuristic_strategy(
    category: HandCategory,
    bucket: BoardBucket,
    pot: f64,
    hero_stack: f64,
    big_blind: f64,
) -> StrategyNode {
    let spec = heuristic_spec(category, bucket.texture_class());
    let actions = spec
        .iter()
        .map(|&(action, frequency, sizing_frac)| {
            let amount = if action == Action::Raise && sizing_frac > 0.0 {
                compute_bet_amount(pot, hero_stack, sizing_frac, big_blind * 2.0)
            } else {
                0.0
            };
            ActionFrequency::new(action, frequency, amount, 0.0)
        })
        .collect();
    StrategyNode::new(actions)
}

/// Convert pot-fraction raise sizings in table data to actual amounts.
/// Fractions are stored at 2.0 or below; larger values are already bb.
fn resolve_amounts(node: &StrategyNode, pot: f64, hero_stack: f64, big_blind: f64) -> StrategyNode {
    let resolved = node
        .actions
        .iter()
        .map(|af| {
            if af.action == Action::Raise && af.amount > 0.0 && af.amount <= 2.0 {
                ActionFrequency {
                    amount: compute_bet_amount(pot, hero_stack, af.amount, big_blind * 2.0),
                    ..*af
                }
            } else {
                *af
            }
        })
        .collect();
    StrategyNode::new(resolved)
}

fn apply_position_adjustment(
    node: &StrategyNode,
    is_ip: bool,
    hand_category: HandCategory,
) -> StrategyNode {
    let adjusted = node
        .actions
        .iter()
        .map(|af| {
            let mut frequency = af.frequency;
            let mut amount = af.amount;
            if is_ip {
                match af.action {
                    Action::Raise => {
                        frequency *= 1.15;
                        amount *= 0.85;
                        if hand_category == HandCategory::Air {
                            frequency *= 1.20;
                        }
                    }
                    Action::Check => frequency *= 0.80,
                    _ => {}
                }
            } else {
                match af.action {
                    Action::Check => frequency *= 1.20,
                    Action::Raise => {
                        frequency *= 0.85;
                        amount *= 1.15;
                    }
                    Action::Fold => frequency *= 1.10,
                    _ => {}
                }
            }
            ActionFrequency {
                frequency,
                amount,
                ..*af
            }
        })
        .collect();
    StrategyNode::new(adjusted).normalized()
}

fn apply_multiway_adjustment(
    node: &StrategyNode,
    num_opponents: usize,
    hand_category: HandCategory,
) -> StrategyNode {
    let n = num_opponents as f64;
    let raise_mult = 1.0 / n.powf(0.3);
    let fold_mult = 1.0 + 0.15 * (n - 1.0);
    let bluff_raise_mult = 1.0 / n.sqrt();

    let adjusted = node
        .actions
        .iter()
        .map(|af| {
            let mut frequency = af.frequency;
            let mut amount = af.amount;
            match af.action {
                Action::Raise => {
                    frequency *= if hand_category == HandCategory::Air {
                        bluff_raise_mult
                    } else {
                        raise_mult
                    };
                    amount *= 0.85;
                }
                Action::Fold => frequency *= fold_mult,
                _ => {}
            }
            ActionFrequency {
                frequency,
                amount,
                ..*af
            }
        })
        .collect();
    StrategyNode::new(adjusted).normalized()
}

/// Blend an observed stat toward its GTO default by sample confidence.
/// Below `threshold` samples the default wins outright; the observed
/// value reaches full weight at three times the threshold.
fn effective_stat(observed: f64, gto_default: f64, threshold: u32, sample_size: u32) -> f64 {
    if sample_size < threshold {
        return gto_default;
    }
    let full_at = threshold * FULL_CONFIDENCE_MULT;
    let weight = ((sample_size - threshold) as f64 / (full_at - threshold) as f64).min(1.0);
    gto_default + weight * (observed - gto_default)
}

fn apply_exploit_adjustment(
    node: &StrategyNode,
    stats: &OpponentStats,
    hand_category: HandCategory,
) -> StrategyNode {
    let fold_cbet = effective_stat(
        stats.fold_to_cbet_pct(),
        GTO_FOLD_TO_CBET,
        MIN_SAMPLE_FOLD_TO_CBET,
        stats.cbet_faced,
    );
    let agg_sample = stats.aggression_actions + stats.passive_actions;
    let agg = effective_stat(
        stats.aggression_factor().min(10.0),
        GTO_AGGRESSION_FACTOR,
        MIN_SAMPLE_AGGRESSION,
        agg_sample,
    );

    let is_bluff_class =
        matches!(hand_category, HandCategory::Air | HandCategory::WeakDraw);
    let is_value_class =
        matches!(hand_category, HandCategory::Nuts | HandCategory::StrongMade);

    let adjusted = node
        .actions
        .iter()
        .map(|af| {
            let mut frequency = af.frequency;
            let mut amount = af.amount;
            match af.action {
                Action::Raise => {
                    if hand_category == HandCategory::Air {
                        if fold_cbet > 60.0 {
                            frequency *= 1.30;
                        } else if fold_cbet < 30.0 {
                            frequency *= 0.50;
                        }
                    } else if fold_cbet < 30.0 {
                        // Thin value vs stations
                        frequency *= 1.20;
                    }
                    if agg < 1.0 && is_bluff_class {
                        frequency *= 1.15;
                    }
                    if fold_cbet > 60.0 && amount > 0.0 {
                        amount *= 0.85;
                    }
                }
                Action::Check => {
                    // Trap more vs hyper-aggressive opponents
                    if agg > 3.0 && is_value_class {
                        frequency *= 1.25;
                    }
                }
                Action::Fold => {
                    // Passive opponents don't bluff enough to pay off folds
                    if agg < 1.0 {
                        frequency *= 0.85;
                    }
                }
                _ => {}
            }
            ActionFrequency {
                frequency,
                amount,
                ..*af
            }
        })
        .collect();
    StrategyNode::new(adjusted).normalized()
}

/// Tilt a heuristic baseline toward aggression or passivity based on
/// simulated equity.
fn refine_with_equity(node: &StrategyNode, equity: f64, spr: f64) -> StrategyNode {
    let adjusted = node
        .actions
        .iter()
        .map(|af| match af.action {
            Action::Raise | Action::Call => {
                let factor = 1.0 + (equity - 0.5) * 0.5;
                ActionFrequency {
                    frequency: af.frequency * factor.max(0.1),
                    ev: equity * spr,
                    ..*af
                }
            }
            Action::Fold => {
                let factor = 1.0 - (equity - 0.3) * 0.3;
                ActionFrequency {
                    frequency: af.frequency * factor.max(0.05),
                    ev: 0.0,
                    ..*af
                }
            }
            _ => *af,
        })
        .collect();
    StrategyNode::new(adjusted).normalized()
}

impl fmt::Display for PostflopSpot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} ({} pot {:.1}bb)",
            self.hero,
            self.board
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(""),
            self.position.label(),
            self.pot,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::charts;

    fn spot<'a>(
        hero: &'a HoleCards,
        board: &'a [Card],
        hand_strength: f64,
        opponent_range: Option<&'a Range>,
    ) -> PostflopSpot<'a> {
        PostflopSpot {
            hero,
            board,
            position: Position::Btn,
            pot: 10.0,
            hero_stack: 90.0,
            big_blind: 1.0,
            action_history: &[],
            hand_strength,
            has_draw: false,
            draw_strength: 0.0,
            opponent_range,
            num_opponents: 1,
            is_ip: true,
            opponent_stats: None,
        }
    }

    #[test]
    fn test_heuristic_nuts_raises() {
        let hero: HoleCards = "AsAd".parse().unwrap();
        let board = parse_cards("Ah Kd 3c").unwrap();
        let result = PostflopSolver::with_seed(7).get_strategy(&spot(&hero, &board, 0.97, None));

        assert_eq!(result.source, Source::Heuristic);
        assert!((result.confidence - 0.6).abs() < 1e-9);
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Raise
        );
        let key = result.spot_key.unwrap();
        assert_eq!(key.hand_category, Some(HandCategory::Nuts));
        assert_eq!(key.street, Street::Flop);
    }

    #[test]
    fn test_heuristic_air_mostly_folds() {
        let hero: HoleCards = "7h2c".parse().unwrap();
        let board = parse_cards("Ah Kd 9c").unwrap();
        let result = PostflopSolver::with_seed(7).get_strategy(&spot(&hero, &board, 0.05, None));
        assert_eq!(
            result.strategy.recommended_action().unwrap().action,
            Action::Fold
        );
    }

    #[test]
    fn test_monte_carlo_refinement_for_close_spots() {
        let hero: HoleCards = "Th9h".parse().unwrap();
        let board = parse_cards("Ts 6d 2c").unwrap();
        let range = charts::opening_range(Position::Co);
        let result =
            PostflopSolver::with_seed(42).get_strategy(&spot(&hero, &board, 0.65, Some(&range)));

        assert_eq!(result.source, Source::MonteCarlo);
        assert!((result.confidence - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_no_refinement_outside_close_band() {
        let hero: HoleCards = "AsAd".parse().unwrap();
        let board = parse_cards("Ah Kd 3c").unwrap();
        let range = charts::opening_range(Position::Co);
        let result =
            PostflopSolver::with_seed(42).get_strategy(&spot(&hero, &board, 0.97, Some(&range)));
        assert_eq!(result.source, Source::Heuristic);
    }

    #[test]
    fn test_lookup_tier() {
        let mut solver = PostflopSolver::with_seed(1);
        let json = r#"{
            "dry_high_rainbow": {
                "nuts": {
                    "any": [
                        {"action": "raise", "frequency": 0.9, "amount": 0.33, "ev": 3.0},
                        {"action": "check", "frequency": 0.1}
                    ]
                }
            }
        }"#;
        let raw: RawTable = serde_json::from_str(json).unwrap();
        solver.load_table(raw).unwrap();

        let hero: HoleCards = "AsAd".parse().unwrap();
        let board = parse_cards("Ah 8d 3c").unwrap();
        let result = solver.get_strategy(&spot(&hero, &board, 0.97, None));

        assert_eq!(result.source, Source::PostflopLookup);
        assert!((result.confidence - 0.75).abs() < 1e-9);
        // 0.33 is a pot fraction, so the amount must be resolved to bb
        let raise = result
            .strategy
            .actions
            .iter()
            .find(|a| a.action == Action::Raise)
            .unwrap();
        assert!(raise.amount > 2.0, "unresolved sizing: {}", raise.amount);
    }

    #[test]
    fn test_position_adjustment_favors_ip_aggression() {
        let base = StrategyNode::new(vec![
            ActionFrequency::new(Action::Raise, 0.5, 6.0, 0.0),
            ActionFrequency::new(Action::Check, 0.5, 0.0, 0.0),
        ]);
        let ip = apply_position_adjustment(&base, true, HandCategory::MediumMade);
        let oop = apply_position_adjustment(&base, false, HandCategory::MediumMade);
        assert!(ip.frequency_of(Action::Raise) > oop.frequency_of(Action::Raise));
        assert!(oop.frequency_of(Action::Check) > ip.frequency_of(Action::Check));
    }

    #[test]
    fn test_multiway_dampens_bluffs_hardest() {
        let base = StrategyNode::new(vec![
            ActionFrequency::new(Action::Raise, 0.4, 6.0, 0.0),
            ActionFrequency::new(Action::Fold, 0.6, 0.0, 0.0),
        ]);
        let value = apply_multiway_adjustment(&base, 3, HandCategory::StrongMade);
        let bluff = apply_multiway_adjustment(&base, 3, HandCategory::Air);
        assert!(bluff.frequency_of(Action::Raise) < value.frequency_of(Action::Raise));
        assert!(value.frequency_of(Action::Fold) > base.frequency_of(Action::Fold));
    }

    #[test]
    fn test_effective_stat_gating() {
        // Below threshold: pure default
        assert!((effective_stat(80.0, 50.0, 10, 5) - 50.0).abs() < 1e-9);
        // At 3x threshold: pure observed
        assert!((effective_stat(80.0, 50.0, 10, 30) - 80.0).abs() < 1e-9);
        // Halfway: linear blend
        let mid = effective_stat(80.0, 50.0, 10, 20);
        assert!(mid > 50.0 && mid < 80.0);
    }

    #[test]
    fn test_exploit_bluffs_more_vs_folders() {
        let base = StrategyNode::new(vec![
            ActionFrequency::new(Action::Raise, 0.2, 6.0, 0.0),
            ActionFrequency::new(Action::Fold, 0.8, 0.0, 0.0),
        ]);

        let mut folder = OpponentStats::new("folder");
        folder.cbet_faced = 40;
        folder.fold_to_cbet_count = 32; // 80% fold to cbet

        let mut station = OpponentStats::new("station");
        station.cbet_faced = 40;
        station.fold_to_cbet_count = 4; // 10% fold to cbet

        let vs_folder = apply_exploit_adjustment(&base, &folder, HandCategory::Air);
        let vs_station = apply_exploit_adjustment(&base, &station, HandCategory::Air);
        assert!(
            vs_folder.frequency_of(Action::Raise) > vs_station.frequency_of(Action::Raise)
        );
    }

    #[test]
    fn test_refine_with_equity_direction() {
        let base = StrategyNode::new(vec![
            ActionFrequency::new(Action::Raise, 0.3, 5.0, 0.0),
            ActionFrequency::new(Action::Call, 0.3, 0.0, 0.0),
            ActionFrequency::new(Action::Fold, 0.4, 0.0, 0.0),
        ]);
        let strong = refine_with_equity(&base, 0.8, 5.0);
        let weak = refine_with_equity(&base, 0.2, 5.0);
        assert!(strong.frequency_of(Action::Raise) > weak.frequency_of(Action::Raise));
        assert!(weak.frequency_of(Action::Fold) > strong.frequency_of(Action::Fold));
    }
}
