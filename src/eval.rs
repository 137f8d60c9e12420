//! Hand evaluation for Texas Hold'em.
//!
//! Evaluates the best 5-card hand from 5-7 cards by enumerating all
//! 5-card subsets (at most C(7,5) = 21) and scoring each with a pure
//! classification function. `HandResult` carries the made-hand cards and
//! kickers and implements the full showdown ordering, with the wheel
//! (A-2-3-4-5) comparing as a five-high straight.

use crate::cards::{Card, RANK_5, RANK_A};
use std::cmp::Ordering;
use std::fmt;

/// Hand ranking categories, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandRanking {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandRanking {
    pub fn label(&self) -> &'static str {
        match self {
            HandRanking::HighCard => "high card",
            HandRanking::OnePair => "one pair",
            HandRanking::TwoPair => "two pair",
            HandRanking::ThreeOfAKind => "three of a kind",
            HandRanking::Straight => "straight",
            HandRanking::Flush => "flush",
            HandRanking::FullHouse => "full house",
            HandRanking::FourOfAKind => "four of a kind",
            HandRanking::StraightFlush => "straight flush",
            HandRanking::RoyalFlush => "royal flush",
        }
    }
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from hand evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Fewer than 5 cards were supplied.
    InsufficientCards { got: usize },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::InsufficientCards { got } => {
                write!(f, "need at least 5 cards, got {}", got)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Result of evaluating a hand.
///
/// `best_cards` are the cards making the ranking (the pair, the trips, all
/// five for straights and flushes); `kickers` break remaining ties. For a
/// full house the kickers hold the pair. Ordering and equality ignore suits.
#[derive(Debug, Clone)]
pub struct HandResult {
    pub ranking: HandRanking,
    pub best_cards: Vec<Card>,
    pub kickers: Vec<Card>,
}

impl HandResult {
    /// Rank values used for tie-breaks: made cards descending, then kickers
    /// descending. In a wheel the ace counts as 1 so A-2-3-4-5 loses to any
    /// higher straight.
    pub fn tiebreak_values(&self) -> Vec<u8> {
        let mut best: Vec<u8> = self.best_cards.iter().map(|c| c.rank()).collect();
        best.sort_unstable_by(|a, b| b.cmp(a));
        if self.is_wheel() {
            best = vec![RANK_5, 4, 3, 2, 1];
        }
        let mut kick: Vec<u8> = self.kickers.iter().map(|c| c.rank()).collect();
        kick.sort_unstable_by(|a, b| b.cmp(a));
        best.extend(kick);
        best
    }

    /// The effective high card of the hand (5 for a wheel).
    pub fn high_card_value(&self) -> u8 {
        self.tiebreak_values().first().copied().unwrap_or(0)
    }

    fn is_wheel(&self) -> bool {
        matches!(
            self.ranking,
            HandRanking::Straight | HandRanking::StraightFlush
        ) && self.best_cards.iter().any(|c| c.rank() == RANK_A)
            && self.best_cards.iter().any(|c| c.rank() == RANK_5)
    }
}

impl PartialEq for HandResult {
    fn eq(&self, other: &Self) -> bool {
        self.ranking == other.ranking && self.tiebreak_values() == other.tiebreak_values()
    }
}

impl Eq for HandResult {}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ranking
            .cmp(&other.ranking)
            .then_with(|| self.tiebreak_values().cmp(&other.tiebreak_values()))
    }
}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Evaluates poker hands.
pub struct HandEvaluator;

impl HandEvaluator {
    /// Evaluate the best 5-card hand from 5-7 cards.
    pub fn evaluate(cards: &[Card]) -> Result<HandResult, EvalError> {
        if cards.len() < 5 {
            return Err(EvalError::InsufficientCards { got: cards.len() });
        }
        let mut best: Option<HandResult> = None;
        for_each_5_subset(cards, |combo| {
            let result = evaluate_five(combo);
            if best.as_ref().map_or(true, |b| result > *b) {
                best = Some(result);
            }
        });
        // cards.len() >= 5 guarantees at least one subset
        Ok(best.unwrap())
    }
}

/// Call `f` with every 5-card subset of `cards`.
fn for_each_5_subset<F: FnMut(&[Card; 5])>(cards: &[Card], mut f: F) {
    let n = cards.len();
    let mut combo = [cards[0]; 5];
    for a in 0..n - 4 {
        combo[0] = cards[a];
        for b in a + 1..n - 3 {
            combo[1] = cards[b];
            for c in b + 1..n - 2 {
                combo[2] = cards[c];
                for d in c + 1..n - 1 {
                    combo[3] = cards[d];
                    for e in d + 1..n {
                        combo[4] = cards[e];
                        f(&combo);
                    }
                }
            }
        }
    }
}

/// Classify exactly 5 cards.
fn evaluate_five(cards: &[Card; 5]) -> HandResult {
    let mut sorted = *cards;
    sorted.sort_unstable_by(|a, b| b.rank().cmp(&a.rank()));

    let is_flush = sorted.iter().all(|c| c.suit() == sorted[0].suit());
    let straight_high = straight_high(&sorted);

    // Rank histogram indexed by rank value.
    let mut counts = [0u8; 15];
    for card in &sorted {
        counts[card.rank() as usize] += 1;
    }
    let mut shape: Vec<u8> = counts.iter().copied().filter(|&c| c > 0).collect();
    shape.sort_unstable_by(|a, b| b.cmp(a));

    if is_flush {
        if let Some(high) = straight_high {
            let ranking = if high == RANK_A {
                HandRanking::RoyalFlush
            } else {
                HandRanking::StraightFlush
            };
            return HandResult {
                ranking,
                best_cards: sorted.to_vec(),
                kickers: Vec::new(),
            };
        }
    }

    match shape.as_slice() {
        [4, 1] => group_result(HandRanking::FourOfAKind, &sorted, &counts, 4),
        [3, 2] => group_result(HandRanking::FullHouse, &sorted, &counts, 3),
        _ if is_flush => HandResult {
            ranking: HandRanking::Flush,
            best_cards: sorted.to_vec(),
            kickers: Vec::new(),
        },
        _ if straight_high.is_some() => HandResult {
            ranking: HandRanking::Straight,
            best_cards: sorted.to_vec(),
            kickers: Vec::new(),
        },
        [3, 1, 1] => group_result(HandRanking::ThreeOfAKind, &sorted, &counts, 3),
        [2, 2, 1] => {
            let best: Vec<Card> = sorted
                .iter()
                .copied()
                .filter(|c| counts[c.rank() as usize] == 2)
                .collect();
            let kickers: Vec<Card> = sorted
                .iter()
                .copied()
                .filter(|c| counts[c.rank() as usize] != 2)
                .collect();
            HandResult {
                ranking: HandRanking::TwoPair,
                best_cards: best,
                kickers,
            }
        }
        [2, 1, 1, 1] => group_result(HandRanking::OnePair, &sorted, &counts, 2),
        _ => HandResult {
            ranking: HandRanking::HighCard,
            best_cards: sorted[..1].to_vec(),
            kickers: sorted[1..].to_vec(),
        },
    }
}

/// High rank of a straight among 5 rank-sorted cards, or None.
/// The wheel (A-2-3-4-5) reports a high of 5.
fn straight_high(sorted: &[Card; 5]) -> Option<u8> {
    let ranks: Vec<u8> = sorted.iter().map(|c| c.rank()).collect();
    for window in ranks.windows(2) {
        if window[0] == window[1] {
            return None;
        }
    }
    if ranks[0] - ranks[4] == 4 {
        return Some(ranks[0]);
    }
    if ranks == [RANK_A, RANK_5, 4, 3, 2] {
        return Some(RANK_5);
    }
    None
}

/// Build a result for group-based hands (pair, trips, quads, full house).
fn group_result(
    ranking: HandRanking,
    sorted: &[Card; 5],
    counts: &[u8; 15],
    group_size: u8,
) -> HandResult {
    let best: Vec<Card> = sorted
        .iter()
        .copied()
        .filter(|c| counts[c.rank() as usize] == group_size)
        .collect();
    let kickers: Vec<Card> = sorted
        .iter()
        .copied()
        .filter(|c| counts[c.rank() as usize] != group_size)
        .collect();
    HandResult {
        ranking,
        best_cards: best,
        kickers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(s: &str) -> HandResult {
        HandEvaluator::evaluate(&parse_cards(s).unwrap()).unwrap()
    }

    #[test]
    fn test_insufficient_cards() {
        let cards = parse_cards("AhKh").unwrap();
        assert_eq!(
            HandEvaluator::evaluate(&cards),
            Err(EvalError::InsufficientCards { got: 2 })
        );
    }

    #[test]
    fn test_royal_flush() {
        let result = eval("AsKsQsJsTs2h3d");
        assert_eq!(result.ranking, HandRanking::RoyalFlush);
    }

    #[test]
    fn test_straight_flush() {
        let result = eval("9sKsQsJsTs2h3d");
        assert_eq!(result.ranking, HandRanking::StraightFlush);
        assert_eq!(result.high_card_value(), 13);
    }

    #[test]
    fn test_wheel_is_five_high() {
        let wheel = eval("Ah2c3d4s5h9cKd");
        assert_eq!(wheel.ranking, HandRanking::Straight);
        assert_eq!(wheel.high_card_value(), 5);

        let six_high = eval("2c3d4s5h6hTcJd");
        assert_eq!(six_high.ranking, HandRanking::Straight);
        assert!(six_high > wheel, "6-high straight must beat the wheel");
    }

    #[test]
    fn test_steel_wheel() {
        let result = eval("Ah2h3h4h5hKcKd");
        assert_eq!(result.ranking, HandRanking::StraightFlush);
        assert_eq!(result.high_card_value(), 5);
    }

    #[test]
    fn test_four_of_a_kind() {
        let result = eval("AhAdAcAs2h3d4c");
        assert_eq!(result.ranking, HandRanking::FourOfAKind);
        assert_eq!(result.best_cards.len(), 4);
        assert_eq!(result.kickers.len(), 1);
        // Best kicker chosen from the remainder
        assert_eq!(result.kickers[0].rank(), 4);
    }

    #[test]
    fn test_full_house_kicker_is_pair() {
        let result = eval("AhAdAcKsKh2d3c");
        assert_eq!(result.ranking, HandRanking::FullHouse);
        assert_eq!(result.best_cards.len(), 3);
        assert_eq!(result.kickers.len(), 2);
        assert!(result.kickers.iter().all(|c| c.rank() == 13));
    }

    #[test]
    fn test_two_pair_kicker() {
        let result = eval("AhAdKcKs2h");
        assert_eq!(result.ranking, HandRanking::TwoPair);
        assert_eq!(result.best_cards.len(), 4);
        assert_eq!(result.kickers.len(), 1);
        assert_eq!(result.kickers[0].rank(), 2);
    }

    #[test]
    fn test_kicker_ordering() {
        let ak = eval("AhAd Kc 7s 4h 3d 2c");
        let aq = eval("AsAc Qc 7d 4d 3h 2d");
        assert_eq!(ak.ranking, HandRanking::OnePair);
        assert!(ak > aq);
    }

    #[test]
    fn test_equality_ignores_suits() {
        let a = eval("AhKhQdJc9s");
        let b = eval("AsKcQsJd9d");
        assert_eq!(a, b);
    }

    #[test]
    fn test_total_order_across_rankings() {
        let hands = [
            eval("AhKdQc8s4h"),  // high card
            eval("AhAdQc8s4h"),  // pair
            eval("AhAdQcQs4h"),  // two pair
            eval("AhAdAcQs4h"),  // trips
            eval("Ah2c3d4s5d"),  // wheel
            eval("5h6c7d8s9d"),  // 9-high straight
            eval("Ah9h7h4h2h"),  // flush
            eval("AhAdAcQsQh"),  // full house
            eval("AhAdAcAsQh"),  // quads
            eval("4h5h6h7h8h"),  // straight flush
            eval("AsKsQsJsTs"),  // royal flush
        ];
        for pair in hands.windows(2) {
            assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_best_of_seven() {
        // Board plays a straight but the hole cards make a flush
        let result = eval("AhKh4h7h9h8cTc");
        assert_eq!(result.ranking, HandRanking::Flush);
    }
}
