//! Opponent range estimation and narrowing from action history.
//!
//! Preflop ranges come from the position charts keyed by the villain's
//! aggression level; postflop actions then narrow the range street by
//! street using action type, bet sizing, and hand-class ordering.

use crate::cards::{Card, Street};
use crate::charts;
use crate::eval::{HandRanking, HandResult};
use crate::icm::hand_strength_key;
use crate::range::Range;
use crate::solver::types::HandCategory;
use crate::state::{Action, Position, PriorAction};

/// Fallback when a position has no call-vs-raise chart.
const DEFAULT_CALL_RANGE: &str = "TT,99,88,77,66,AQs,AJs,ATs,KQs,KJs,QJs,JTs,T9s,98s,87s";

/// Wide range assumed for a player who only checked or limped.
const LIMP_CHECK_RANGE: &str = "22+,A2s+,A7o+,K7s+,KTo+,Q8s+,QTo+,J8s+,JTo,\
                                T8s+,97s+,86s+,75s+,64s+,54s";

/// Estimate a villain's preflop range from their actions.
///
/// An unknown position defaults to CO. Raise count selects the chart
/// family: 3+ raises means a 4-bet range, 2 a 3-bet range, 1 an opening
/// range; a cold call maps to the call-vs-raise chart, and a pure
/// check/limp line keeps a wide range.
pub fn estimate_preflop_range(
    villain_position: Option<Position>,
    action_history: &[PriorAction],
) -> Range {
    let mut villain_raises = 0;
    let mut villain_called = false;
    for a in action_history {
        if let Some(pos) = villain_position {
            if a.position != pos {
                continue;
            }
        }
        if a.action.is_aggressive() {
            villain_raises += 1;
        } else if a.action == Action::Call {
            villain_called = true;
        }
    }

    let pos = villain_position.unwrap_or(Position::Co);

    if villain_raises >= 3 {
        return charts::four_bet_range(pos);
    }
    if villain_raises >= 2 {
        return charts::three_bet_range(pos);
    }
    if villain_raises >= 1 {
        return charts::opening_range(pos);
    }
    if villain_called {
        let calling = charts::call_vs_raise_range(pos);
        if !calling.is_empty() {
            return calling;
        }
        return Range::parse(DEFAULT_CALL_RANGE).expect("chart notation is valid");
    }

    Range::parse(LIMP_CHECK_RANGE).expect("chart notation is valid")
}

/// Narrow a range based on a postflop action.
///
/// Aggressive actions keep a polarized subset (top hands plus bottom
/// bluffs, more polarized at larger sizings); calls and checks keep
/// linear top portions. Later streets narrow harder.
pub fn narrow_for_postflop_action(
    base_range: &Range,
    action: Action,
    bet_size_fraction: f64,
    street: Street,
) -> Range {
    if base_range.is_empty() {
        return base_range.clone();
    }

    let keep_pct = match action {
        Action::Raise | Action::AllIn => {
            if bet_size_fraction >= 0.75 {
                0.35
            } else if bet_size_fraction >= 0.5 {
                0.45
            } else {
                0.55
            }
        }
        Action::Call => 0.70,
        Action::Check => 0.85,
        _ => return base_range.clone(),
    };

    let street_factor = match street {
        Street::Turn => 0.85,
        Street::River => 0.70,
        _ => 1.0,
    };

    let mut sorted: Vec<_> = base_range.iter().copied().collect();
    sorted.sort_by_key(|h| std::cmp::Reverse(hand_strength_key(h)));

    let total = sorted.len();
    let keep_count = ((total as f64 * keep_pct * street_factor) as usize).max(1);

    let mut narrowed = Range::new();
    if action.is_aggressive() {
        let value_count = ((keep_count as f64 * 0.7) as usize).max(1);
        let bluff_count = keep_count.saturating_sub(value_count);
        for hand in sorted.iter().take(value_count) {
            narrowed.insert(*hand);
        }
        if bluff_count > 0 && total > value_count {
            for hand in sorted.iter().rev().take(bluff_count) {
                narrowed.insert(*hand);
            }
        }
    } else {
        for hand in sorted.iter().take(keep_count) {
            narrowed.insert(*hand);
        }
    }
    narrowed
}

/// Bucket a hand into a strategic category from made-hand strength and
/// draw quality, both in [0, 1].
pub fn categorize_hand(hand_strength: f64, has_draw: bool, draw_strength: f64) -> HandCategory {
    if hand_strength >= 0.95 {
        return HandCategory::Nuts;
    }
    if hand_strength >= 0.85 {
        return HandCategory::StrongMade;
    }
    if hand_strength >= 0.65 {
        return HandCategory::MediumMade;
    }
    if hand_strength >= 0.40 {
        if has_draw && draw_strength >= 0.5 {
            return HandCategory::StrongDraw;
        }
        return HandCategory::WeakMade;
    }
    if has_draw {
        if draw_strength >= 0.5 {
            return HandCategory::StrongDraw;
        }
        if draw_strength >= 0.25 {
            return HandCategory::MediumDraw;
        }
        return HandCategory::WeakDraw;
    }
    if hand_strength >= 0.15 {
        return HandCategory::WeakDraw;
    }
    HandCategory::Air
}

/// Score a made hand on a 0-1 scale relative to the board.
///
/// Base score comes from the ranking; one pair is upgraded when it is
/// top pair or better against the visible board.
pub fn hand_strength_score(hand_result: &HandResult, community_cards: &[Card]) -> f64 {
    let base = match hand_result.ranking {
        HandRanking::HighCard => 0.10,
        HandRanking::OnePair => 0.40,
        HandRanking::TwoPair => 0.65,
        HandRanking::ThreeOfAKind => 0.85,
        HandRanking::Straight => 0.88,
        HandRanking::Flush => 0.90,
        HandRanking::FullHouse => 0.94,
        HandRanking::FourOfAKind => 0.97,
        HandRanking::StraightFlush => 0.99,
        HandRanking::RoyalFlush => 1.00,
    };

    let mut score: f64 = base;
    if hand_result.ranking == HandRanking::OnePair && !community_cards.is_empty() {
        let mut board_ranks: Vec<u8> = community_cards.iter().map(|c| c.rank()).collect();
        board_ranks.sort_unstable_by(|a, b| b.cmp(a));
        let pair_rank = hand_result
            .best_cards
            .iter()
            .map(|c| c.rank())
            .max()
            .unwrap_or(0);
        if pair_rank >= board_ranks[0] {
            score += 0.25; // top pair or overpair
        } else if board_ranks.len() >= 2 && pair_rank >= board_ranks[1] {
            score += 0.10; // second pair
        }
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::eval::HandEvaluator;
    use crate::range::HandNotation;

    fn history(entries: &[(Position, Action)]) -> Vec<PriorAction> {
        entries
            .iter()
            .map(|&(p, a)| PriorAction::new(p, a, 0.0))
            .collect()
    }

    #[test]
    fn test_estimate_range_by_aggression() {
        let open = estimate_preflop_range(
            Some(Position::Btn),
            &history(&[(Position::Btn, Action::Raise)]),
        );
        assert_eq!(open, charts::opening_range(Position::Btn));

        let three_bet = estimate_preflop_range(
            Some(Position::Btn),
            &history(&[(Position::Btn, Action::Raise), (Position::Btn, Action::Raise)]),
        );
        assert_eq!(three_bet, charts::three_bet_range(Position::Btn));
        assert!(three_bet.len() < open.len());

        let four_bet = estimate_preflop_range(
            Some(Position::Btn),
            &history(&[
                (Position::Btn, Action::Raise),
                (Position::Btn, Action::Raise),
                (Position::Btn, Action::AllIn),
            ]),
        );
        assert_eq!(four_bet, charts::four_bet_range(Position::Btn));
    }

    #[test]
    fn test_estimate_range_ignores_other_positions() {
        let range = estimate_preflop_range(
            Some(Position::Bb),
            &history(&[(Position::Co, Action::Raise), (Position::Bb, Action::Call)]),
        );
        // BB only called, so the raise must not count toward them
        assert_eq!(range, charts::call_vs_raise_range(Position::Bb));
    }

    #[test]
    fn test_estimate_range_passive_is_wide() {
        let range = estimate_preflop_range(Some(Position::Bb), &[]);
        assert!(range.len() > 40, "limp/check range too narrow: {}", range.len());
        let aks: HandNotation = "AKs".parse().unwrap();
        let small_suited: HandNotation = "54s".parse().unwrap();
        assert!(range.contains_notation(&aks));
        assert!(range.contains_notation(&small_suited));
    }

    #[test]
    fn test_unknown_position_defaults_to_co() {
        let range =
            estimate_preflop_range(None, &history(&[(Position::Co, Action::Raise)]));
        assert_eq!(range, charts::opening_range(Position::Co));
    }

    #[test]
    fn test_narrow_keeps_top_hands_on_call() {
        let base = charts::opening_range(Position::Btn);
        let narrowed =
            narrow_for_postflop_action(&base, Action::Call, 0.0, Street::Flop);
        assert!(narrowed.len() < base.len());
        let aces: HandNotation = "AA".parse().unwrap();
        assert!(narrowed.contains_notation(&aces));
    }

    #[test]
    fn test_narrow_polarizes_on_raise() {
        let base = charts::opening_range(Position::Btn);
        let narrowed =
            narrow_for_postflop_action(&base, Action::Raise, 0.8, Street::Flop);
        assert!(narrowed.len() < base.len());

        let mut sorted: Vec<_> = base.iter().copied().collect();
        sorted.sort_by_key(|h| std::cmp::Reverse(hand_strength_key(h)));
        // Polarized raising range retains the weakest hand as a bluff
        assert!(narrowed.contains_notation(sorted.last().unwrap()));
        assert!(narrowed.contains_notation(&sorted[0]));
    }

    #[test]
    fn test_narrow_tightens_by_street() {
        let base = charts::opening_range(Position::Btn);
        let flop = narrow_for_postflop_action(&base, Action::Call, 0.0, Street::Flop);
        let river = narrow_for_postflop_action(&base, Action::Call, 0.0, Street::River);
        assert!(river.len() < flop.len());
    }

    #[test]
    fn test_narrow_empty_range_unchanged() {
        let empty = Range::new();
        let narrowed = narrow_for_postflop_action(&empty, Action::Raise, 1.0, Street::Turn);
        assert!(narrowed.is_empty());
    }

    #[test]
    fn test_categorize_hand_thresholds() {
        assert_eq!(categorize_hand(0.97, false, 0.0), HandCategory::Nuts);
        assert_eq!(categorize_hand(0.88, false, 0.0), HandCategory::StrongMade);
        assert_eq!(categorize_hand(0.70, false, 0.0), HandCategory::MediumMade);
        assert_eq!(categorize_hand(0.50, false, 0.0), HandCategory::WeakMade);
        assert_eq!(categorize_hand(0.50, true, 0.6), HandCategory::StrongDraw);
        assert_eq!(categorize_hand(0.20, true, 0.3), HandCategory::MediumDraw);
        assert_eq!(categorize_hand(0.20, true, 0.1), HandCategory::WeakDraw);
        assert_eq!(categorize_hand(0.20, false, 0.0), HandCategory::WeakDraw);
        assert_eq!(categorize_hand(0.05, false, 0.0), HandCategory::Air);
    }

    #[test]
    fn test_hand_strength_score_top_pair_bonus() {
        let board = parse_cards("Kh 8d 3c").unwrap();

        let top_pair = HandEvaluator::evaluate(&[parse_cards("Ks Qd").unwrap(), board.clone()].concat())
            .unwrap();
        let score_top = hand_strength_score(&top_pair, &board);
        assert!((score_top - 0.65).abs() < 1e-9);

        let second_pair =
            HandEvaluator::evaluate(&[parse_cards("8s Qd").unwrap(), board.clone()].concat())
                .unwrap();
        let score_second = hand_strength_score(&second_pair, &board);
        assert!((score_second - 0.50).abs() < 1e-9);

        let bottom_pair =
            HandEvaluator::evaluate(&[parse_cards("3s Qd").unwrap(), board.clone()].concat())
                .unwrap();
        assert!((hand_strength_score(&bottom_pair, &board) - 0.40).abs() < 1e-9);
    }

    #[test]
    fn test_hand_strength_score_rankings_ordered() {
        let board = parse_cards("Kh 8d 3c 7s 2h").unwrap();
        let flush_board = parse_cards("Kh 8h 3h 7h 2s").unwrap();

        let high_card =
            HandEvaluator::evaluate(&[parse_cards("Ad Qd").unwrap(), board.clone()].concat())
                .unwrap();
        let flush =
            HandEvaluator::evaluate(&[parse_cards("Ah Qh").unwrap(), flush_board.clone()].concat())
                .unwrap();
        assert!(
            hand_strength_score(&high_card, &board) < hand_strength_score(&flush, &flush_board)
        );
    }
}
