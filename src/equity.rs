//! Monte Carlo equity calculation.
//!
//! Estimates win probability of hands and ranges by simulating random
//! runouts of the remaining community cards. The parallel variant splits
//! simulations across a small rayon pool for >500-sim workloads.

use crate::cards::{Card, Deck, HoleCards};
use crate::eval::HandEvaluator;
use crate::range::Range;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;

/// Worker cap for parallel Monte Carlo: one core left for the caller,
/// at most 4 (diminishing returns beyond that), at least 1.
fn max_workers() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    cores.saturating_sub(1).clamp(1, 4)
}

/// Below this count the fan-out overhead outweighs the parallelism.
const PARALLEL_THRESHOLD: u64 = 500;

/// Errors from equity calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquityError {
    /// Dead-card filtering left no playable combos in a range.
    EmptyCombos,
    /// Every range-vs-range trial drew overlapping hands.
    NoValidTrials,
    /// The worker pool could not be built.
    Pool(String),
}

impl fmt::Display for EquityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquityError::EmptyCombos => {
                write!(f, "no valid combos in range given known cards")
            }
            EquityError::NoValidTrials => {
                write!(f, "no valid simulations, ranges may fully overlap")
            }
            EquityError::Pool(e) => write!(f, "worker pool: {}", e),
        }
    }
}

impl std::error::Error for EquityError {}

/// Result of an equity calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityResult {
    /// Win probability in [0, 1], ties counted half.
    pub equity: f64,
    pub win_count: u64,
    pub tie_count: u64,
    pub loss_count: u64,
    /// Valid trials the counts were taken over.
    pub simulations: u64,
}

impl EquityResult {
    fn from_counts(wins: u64, ties: u64, losses: u64) -> Self {
        let simulations = wins + ties + losses;
        let equity = if simulations == 0 {
            0.0
        } else {
            (wins as f64 + ties as f64 * 0.5) / simulations as f64
        };
        Self {
            equity,
            win_count: wins,
            tie_count: ties,
            loss_count: losses,
            simulations,
        }
    }

    pub fn win_pct(&self) -> f64 {
        self.equity * 100.0
    }

    pub fn tie_pct(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.tie_count as f64 / self.simulations as f64 * 100.0
        }
    }
}

impl fmt::Display for EquityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Equity: {:.1}% (W: {}, T: {}, L: {}, sims: {})",
            self.win_pct(),
            self.win_count,
            self.tie_count,
            self.loss_count,
            self.simulations
        )
    }
}

/// Monte Carlo equity calculator.
///
/// An optional base seed makes runs reproducible; parallel chunks derive
/// their seeds as `base_seed + chunk_index`.
#[derive(Debug, Clone, Default)]
pub struct EquityCalculator {
    base_seed: Option<u64>,
}

impl EquityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            base_seed: Some(seed),
        }
    }

    fn rng(&self) -> StdRng {
        match self.base_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Equity of `hand1` against `hand2` over random runouts.
    pub fn hand_vs_hand(
        &self,
        hand1: &HoleCards,
        hand2: &HoleCards,
        board: &[Card],
        simulations: u64,
    ) -> EquityResult {
        let cards_needed = 5 - board.len();
        let mut dead: Vec<Card> = board.to_vec();
        dead.extend(hand1.cards());
        dead.extend(hand2.cards());

        let mut deck = Deck::without(&dead);
        let mut rng = self.rng();
        let (mut wins, mut ties, mut losses) = (0u64, 0u64, 0u64);
        let mut runout = Vec::with_capacity(5);

        for _ in 0..simulations {
            deck.rewind();
            deck.shuffle(&mut rng);
            runout.clear();
            runout.extend_from_slice(board);
            runout.extend(deck.deal_n(cards_needed));

            match compare_showdown(hand1, hand2, &runout) {
                std::cmp::Ordering::Greater => wins += 1,
                std::cmp::Ordering::Equal => ties += 1,
                std::cmp::Ordering::Less => losses += 1,
            }
        }

        EquityResult::from_counts(wins, ties, losses)
    }

    /// Equity of a specific hand against an opponent's range.
    ///
    /// Each trial samples an opponent combo (pre-filtered against known
    /// cards) and a random runout.
    pub fn hand_vs_range(
        &self,
        hand: &HoleCards,
        opponent_range: &Range,
        board: &[Card],
        simulations: u64,
    ) -> Result<EquityResult, EquityError> {
        let combos = filter_combos(opponent_range, hand, board)?;
        let mut rng = self.rng();
        let (wins, ties, losses) =
            simulate_hand_vs_range(hand, &combos, board, simulations, &mut rng);
        Ok(EquityResult::from_counts(wins, ties, losses))
    }

    /// Equity of `range1` against `range2`.
    ///
    /// Trials that draw overlapping hands are discarded; counts are
    /// reported over the valid trials only.
    pub fn range_vs_range(
        &self,
        range1: &Range,
        range2: &Range,
        board: &[Card],
        simulations: u64,
    ) -> Result<EquityResult, EquityError> {
        let cards_needed = 5 - board.len();
        let combos1 = filter_board_combos(range1, board)?;
        let combos2 = filter_board_combos(range2, board)?;

        let mut rng = self.rng();
        let (mut wins, mut ties, mut losses) = (0u64, 0u64, 0u64);
        let mut dead: Vec<Card> = Vec::with_capacity(9);
        let mut runout = Vec::with_capacity(5);

        for _ in 0..simulations {
            let c1 = combos1[rng.gen_range(0..combos1.len())];
            let c2 = combos2[rng.gen_range(0..combos2.len())];
            if c1.conflicts_with(&c2) {
                continue;
            }

            dead.clear();
            dead.extend_from_slice(board);
            dead.extend(c1.cards());
            dead.extend(c2.cards());
            let mut deck = Deck::without(&dead);
            deck.shuffle(&mut rng);

            runout.clear();
            runout.extend_from_slice(board);
            runout.extend(deck.deal_n(cards_needed));

            match compare_showdown(&c1, &c2, &runout) {
                std::cmp::Ordering::Greater => wins += 1,
                std::cmp::Ordering::Equal => ties += 1,
                std::cmp::Ordering::Less => losses += 1,
            }
        }

        if wins + ties + losses == 0 {
            return Err(EquityError::NoValidTrials);
        }
        Ok(EquityResult::from_counts(wins, ties, losses))
    }

    /// Parallel hand-vs-range equity over a bounded rayon pool.
    ///
    /// Simulations are split into near-equal chunks, one per worker; chunk
    /// `i` runs with seed `base_seed + i` and returns only its three
    /// counters, which are summed after the join. Small workloads run
    /// sequentially.
    pub fn parallel_hand_vs_range(
        &self,
        hand: &HoleCards,
        opponent_range: &Range,
        board: &[Card],
        simulations: u64,
    ) -> Result<EquityResult, EquityError> {
        if simulations < PARALLEL_THRESHOLD {
            return self.hand_vs_range(hand, opponent_range, board, simulations);
        }

        let combos = filter_combos(opponent_range, hand, board)?;
        let workers = max_workers() as u64;
        let chunk_size = simulations / workers;
        let remainder = simulations % workers;
        let base_seed = self.base_seed.unwrap_or_else(rand::random);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers as usize)
            .build()
            .map_err(|e| EquityError::Pool(e.to_string()))?;

        let (wins, ties, losses) = pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map(|i| {
                    let sims = chunk_size + u64::from(i < remainder);
                    let mut rng = StdRng::seed_from_u64(base_seed + i);
                    simulate_hand_vs_range(hand, &combos, board, sims, &mut rng)
                })
                .reduce(
                    || (0, 0, 0),
                    |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2),
                )
        });

        Ok(EquityResult::from_counts(wins, ties, losses))
    }
}

/// Core hand-vs-range simulation loop shared by the sequential and
/// parallel paths.
fn simulate_hand_vs_range(
    hand: &HoleCards,
    combos: &[HoleCards],
    board: &[Card],
    simulations: u64,
    rng: &mut StdRng,
) -> (u64, u64, u64) {
    let cards_needed = 5 - board.len();
    let (mut wins, mut ties, mut losses) = (0u64, 0u64, 0u64);
    let mut dead: Vec<Card> = Vec::with_capacity(9);
    let mut runout = Vec::with_capacity(5);

    for _ in 0..simulations {
        let opp = combos[rng.gen_range(0..combos.len())];

        dead.clear();
        dead.extend_from_slice(board);
        dead.extend(hand.cards());
        dead.extend(opp.cards());
        let mut deck = Deck::without(&dead);
        deck.shuffle(rng);

        runout.clear();
        runout.extend_from_slice(board);
        runout.extend(deck.deal_n(cards_needed));

        match compare_showdown(hand, &opp, &runout) {
            std::cmp::Ordering::Greater => wins += 1,
            std::cmp::Ordering::Equal => ties += 1,
            std::cmp::Ordering::Less => losses += 1,
        }
    }

    (wins, ties, losses)
}

/// Showdown comparison of two hands over a complete 5-card runout.
fn compare_showdown(hand1: &HoleCards, hand2: &HoleCards, runout: &[Card]) -> std::cmp::Ordering {
    let mut cards1: Vec<Card> = runout.to_vec();
    cards1.extend(hand1.cards());
    let mut cards2: Vec<Card> = runout.to_vec();
    cards2.extend(hand2.cards());
    // 7 cards always present, evaluation cannot fail
    let eval1 = HandEvaluator::evaluate(&cards1).expect("runout is complete");
    let eval2 = HandEvaluator::evaluate(&cards2).expect("runout is complete");
    eval1.cmp(&eval2)
}

/// Expand a range and drop combos conflicting with the hero hand or board.
fn filter_combos(
    range: &Range,
    hand: &HoleCards,
    board: &[Card],
) -> Result<Vec<HoleCards>, EquityError> {
    let combos: Vec<HoleCards> = range
        .to_combos()
        .into_iter()
        .filter(|c| !c.conflicts_with(hand) && !board.iter().any(|&b| c.contains(b)))
        .collect();
    if combos.is_empty() {
        return Err(EquityError::EmptyCombos);
    }
    Ok(combos)
}

/// Expand a range and drop combos conflicting with the board.
fn filter_board_combos(range: &Range, board: &[Card]) -> Result<Vec<HoleCards>, EquityError> {
    let combos: Vec<HoleCards> = range
        .to_combos()
        .into_iter()
        .filter(|c| !board.iter().any(|&b| c.contains(b)))
        .collect();
    if combos.is_empty() {
        return Err(EquityError::EmptyCombos);
    }
    Ok(combos)
}
