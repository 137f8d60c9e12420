//! Tournament equity math: ICM, bubble factors, and survival premium.
//!
//! Implements the Malmuth-Harville model exactly for small player counts
//! and falls back to weighted Monte Carlo sampling for larger fields.

use crate::context::GameContext;
use crate::range::{HandNotation, HandType, Range};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Player count above which exact ICM becomes too expensive.
const EXACT_ICM_LIMIT: usize = 7;

/// Default Monte Carlo iterations for large fields.
const DEFAULT_MC_ITERATIONS: u64 = 10_000;

/// ICM equities for all players.
#[derive(Debug, Clone, PartialEq)]
pub struct IcmResult {
    /// Tournament equity for each player, in payout units.
    pub equities: Vec<f64>,
    pub chip_stacks: Vec<f64>,
}

impl IcmResult {
    pub fn total_equity(&self) -> f64 {
        self.equities.iter().sum()
    }

    pub fn equity_for(&self, player_index: usize) -> f64 {
        self.equities[player_index]
    }

    /// Chip-proportional EV for comparison with ICM equity.
    pub fn chip_ev(&self, player_index: usize, total_prize: f64) -> f64 {
        let total_chips: f64 = self.chip_stacks.iter().sum();
        if total_chips == 0.0 {
            0.0
        } else {
            self.chip_stacks[player_index] / total_chips * total_prize
        }
    }
}

/// Calculate ICM equity for each player.
///
/// Payouts are ordered 1st, 2nd, 3rd, ... and are padded with zeros when
/// shorter than the player count. Exact recursion is used for fields of
/// up to 7 players unless `iterations` forces Monte Carlo.
pub fn calculate_icm(stacks: &[f64], payouts: &[f64], iterations: Option<u64>) -> IcmResult {
    let n = stacks.len();
    let total_chips: f64 = stacks.iter().sum();
    if total_chips == 0.0 {
        return IcmResult {
            equities: vec![0.0; n],
            chip_stacks: stacks.to_vec(),
        };
    }

    let mut padded: Vec<f64> = payouts.to_vec();
    if padded.len() < n {
        padded.resize(n, 0.0);
    }

    let equities = if n <= EXACT_ICM_LIMIT && iterations.is_none() {
        icm_exact(stacks, &padded)
    } else {
        icm_monte_carlo(stacks, &padded, iterations.unwrap_or(DEFAULT_MC_ITERATIONS))
    };

    IcmResult {
        equities,
        chip_stacks: stacks.to_vec(),
    }
}

fn icm_exact(stacks: &[f64], payouts: &[f64]) -> Vec<f64> {
    let mut equities = vec![0.0; stacks.len()];
    let active: Vec<usize> = (0..stacks.len()).filter(|&i| stacks[i] > 0.0).collect();
    icm_recurse(stacks, payouts, &active, 0, 1.0, &mut equities);
    equities
}

/// Walk the finish-order probability tree, accumulating payout-weighted
/// placement probabilities.
fn icm_recurse(
    stacks: &[f64],
    payouts: &[f64],
    remaining: &[usize],
    place: usize,
    prob: f64,
    equities: &mut [f64],
) {
    if place >= payouts.len() || remaining.is_empty() {
        return;
    }
    let remaining_total: f64 = remaining.iter().map(|&r| stacks[r]).sum();
    if remaining_total == 0.0 {
        return;
    }

    for (i, &player) in remaining.iter().enumerate() {
        if stacks[player] == 0.0 {
            continue;
        }
        let p = stacks[player] / remaining_total * prob;
        equities[player] += p * payouts[place];

        if remaining.len() > 1 && place + 1 < payouts.len() {
            let mut next: Vec<usize> = Vec::with_capacity(remaining.len() - 1);
            next.extend_from_slice(&remaining[..i]);
            next.extend_from_slice(&remaining[i + 1..]);
            icm_recurse(stacks, payouts, &next, place + 1, p, equities);
        }
    }
}

/// Monte Carlo ICM: sample finish orders weighted by chip stacks
/// without replacement.
fn icm_monte_carlo(stacks: &[f64], payouts: &[f64], iterations: u64) -> Vec<f64> {
    let n = stacks.len();
    let places = payouts.len().min(n);
    let mut equities = vec![0.0; n];
    let mut rng = StdRng::from_entropy();

    for _ in 0..iterations {
        let mut remaining: Vec<usize> = (0..n).collect();
        for place in 0..places {
            let total: f64 = remaining.iter().map(|&i| stacks[i]).sum();
            if total == 0.0 {
                break;
            }
            let mut target = rng.gen::<f64>() * total;
            let mut chosen_local = remaining.len() - 1;
            for (local, &i) in remaining.iter().enumerate() {
                target -= stacks[i];
                if target <= 0.0 {
                    chosen_local = local;
                    break;
                }
            }
            let chosen = remaining.swap_remove(chosen_local);
            equities[chosen] += payouts[place];
        }
    }

    for eq in &mut equities {
        *eq /= iterations as f64;
    }
    equities
}

/// ICM risk/reward ratio for a specific matchup.
///
/// A factor above 1 means chips lost cost more equity than the same
/// chips gained are worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleFactor {
    /// Ratio of equity lost (if losing) to equity gained (if winning).
    pub risk_factor: f64,
    pub description: &'static str,
}

impl BubbleFactor {
    /// Multiply required chip-EV equity by this for the ICM-adjusted
    /// calling requirement.
    pub fn effective_pot_odds_multiplier(&self) -> f64 {
        self.risk_factor
    }
}

/// Bubble factor for hero versus villain, both identified by index into
/// `stacks`, over an effective-stack confrontation.
pub fn calculate_bubble_factor(
    hero_index: usize,
    villain_index: usize,
    stacks: &[f64],
    payouts: &[f64],
) -> BubbleFactor {
    let hero_stack = stacks[hero_index];
    let villain_stack = stacks[villain_index];
    let pot_size = hero_stack.min(villain_stack);

    let current_eq = calculate_icm(stacks, payouts, None).equity_for(hero_index);

    // Hero wins the effective stack
    let mut win_stacks = stacks.to_vec();
    win_stacks[hero_index] += pot_size;
    win_stacks[villain_index] -= pot_size;
    let win_eq = if win_stacks[villain_index] <= 0.0 {
        let filtered: Vec<f64> = win_stacks
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != villain_index)
            .map(|(_, &s)| s)
            .collect();
        let shifted = if villain_index > hero_index {
            hero_index
        } else {
            hero_index - 1
        };
        calculate_icm(&filtered, payouts, None).equity_for(shifted)
    } else {
        calculate_icm(&win_stacks, payouts, None).equity_for(hero_index)
    };

    // Hero loses the effective stack
    let mut lose_stacks = stacks.to_vec();
    lose_stacks[hero_index] -= pot_size;
    lose_stacks[villain_index] += pot_size;
    let lose_eq = if lose_stacks[hero_index] <= 0.0 {
        0.0
    } else {
        calculate_icm(&lose_stacks, payouts, None).equity_for(hero_index)
    };

    let equity_gained = win_eq - current_eq;
    let equity_lost = current_eq - lose_eq;

    let (risk_factor, description) = if equity_gained <= 0.0 {
        (f64::INFINITY, "extremely unfavorable, avoid confrontation")
    } else if equity_lost <= 0.0 {
        (0.0, "freeroll, no downside risk")
    } else {
        let factor = equity_lost / equity_gained;
        let desc = if factor >= 3.0 {
            "extreme bubble pressure, play very tight"
        } else if factor >= 2.0 {
            "high bubble pressure, play tight"
        } else if factor >= 1.5 {
            "moderate bubble pressure, tighten up"
        } else if factor >= 1.1 {
            "slight bubble pressure, minor adjustments"
        } else {
            "minimal pressure, play close to chip-EV"
        };
        (factor, desc)
    };

    BubbleFactor {
        risk_factor,
        description,
    }
}

/// Survival premium multiplier for tournament play.
///
/// Returns a range-width multiplier in [0.3, 1.0]; 1.0 is chip-EV play
/// and lower values demand tighter ranges. Highest pressure is on the
/// bubble and near big payout jumps.
pub fn survival_premium(context: &GameContext) -> f64 {
    use crate::context::TournamentPhase::*;

    if !context.is_tournament() {
        return 1.0;
    }

    let mut base: f64 = match context.tournament_phase {
        Some(Early) | None => 1.0,
        Some(Middle) => 0.90,
        Some(Bubble) => 0.65,
        Some(InTheMoney) => 0.85,
        Some(FinalTable) => 0.75,
    };

    if context.average_stack_bb > 0.0 {
        let stack_ratio = context.stack_depth_bb / context.average_stack_bb;
        if stack_ratio < 0.5 {
            // Short relative to the field, survival first
            base *= 0.85;
        } else if stack_ratio > 2.0 {
            // Big stack can apply pressure
            base = (base * 1.15).min(1.0);
        }
    }

    if context.is_near_payout_jump() {
        base *= 0.85;
    }

    base.clamp(0.3, 1.0)
}

/// Narrow a range for tournament pressure, keeping the strongest
/// `premium` fraction of hands.
pub fn adjust_range_for_tournament(base_range: &Range, context: &GameContext) -> Range {
    if !context.is_tournament() {
        return base_range.clone();
    }
    let premium = survival_premium(context);
    if premium >= 0.95 {
        return base_range.clone();
    }

    let mut hands: Vec<HandNotation> = base_range.iter().copied().collect();
    hands.sort_by_key(|h| std::cmp::Reverse(hand_strength_key(h)));

    let keep_count = ((hands.len() as f64 * premium) as usize).max(1);
    let mut kept = Range::new();
    for hand in hands.into_iter().take(keep_count) {
        kept.insert(hand);
    }
    kept
}

/// Sort key for notation strength: pairs above suited above offsuit,
/// higher ranks first within each class.
pub(crate) fn hand_strength_key(hand: &HandNotation) -> (u8, u8, u8) {
    let type_bonus = match hand.hand_type {
        HandType::Pair => 200,
        HandType::Suited => 100,
        HandType::Offsuit => 0,
    };
    (type_bonus, hand.rank1, hand.rank2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TournamentPhase;

    #[test]
    fn test_icm_equities_sum_to_payouts() {
        let stacks = [5000.0, 3000.0, 2000.0];
        let payouts = [50.0, 30.0, 20.0];
        let result = calculate_icm(&stacks, &payouts, None);
        assert!((result.total_equity() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_stacks_equal_equities() {
        let stacks = [1000.0; 4];
        let payouts = [40.0, 30.0, 20.0, 10.0];
        let result = calculate_icm(&stacks, &payouts, None);
        for eq in &result.equities {
            assert!((eq - 25.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_two_player_winner_take_all_is_chip_proportional() {
        let stacks = [7000.0, 3000.0];
        let payouts = [100.0, 0.0];
        let result = calculate_icm(&stacks, &payouts, None);
        assert!((result.equities[0] - 70.0).abs() < 1e-9);
        assert!((result.equities[1] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_big_stack_equity_less_than_chip_ev() {
        // ICM flattens equity: the chip leader is worth less than
        // chip-proportional, the short stack more
        let stacks = [6000.0, 2000.0, 2000.0];
        let payouts = [50.0, 30.0, 20.0];
        let result = calculate_icm(&stacks, &payouts, None);
        assert!(result.equities[0] < result.chip_ev(0, 100.0));
        assert!(result.equities[1] > result.chip_ev(1, 100.0));
    }

    #[test]
    fn test_monte_carlo_large_field() {
        let stacks = [1000.0; 9];
        let payouts = [50.0, 30.0, 20.0];
        let result = calculate_icm(&stacks, &payouts, None);
        // Every iteration hands out the full prize pool
        assert!((result.total_equity() - 100.0).abs() < 1e-6);
        // Equal stacks should land near equal equity
        for eq in &result.equities {
            assert!((eq - 100.0 / 9.0).abs() < 2.0, "equity {} too far off", eq);
        }
    }

    #[test]
    fn test_zero_stacks() {
        let result = calculate_icm(&[0.0, 0.0], &[100.0], None);
        assert_eq!(result.equities, vec![0.0, 0.0]);
    }

    #[test]
    fn test_bubble_factor_pressure() {
        // 4 players, 3 paid: losing a flip on the bubble costs more than
        // winning one gains
        let stacks = [3000.0, 3000.0, 2000.0, 2000.0];
        let payouts = [50.0, 30.0, 20.0];
        let factor = calculate_bubble_factor(0, 1, &stacks, &payouts);
        assert!(
            factor.risk_factor > 1.0,
            "bubble factor {} should exceed 1",
            factor.risk_factor
        );
        assert!(factor.effective_pot_odds_multiplier() > 1.0);
    }

    #[test]
    fn test_bubble_factor_flat_payouts() {
        // Equal payouts leave no equity to gain
        let stacks = [5000.0, 5000.0];
        let payouts = [50.0, 50.0];
        let factor = calculate_bubble_factor(0, 1, &stacks, &payouts);
        assert!(factor.risk_factor.is_infinite());
    }

    #[test]
    fn test_survival_premium_phases() {
        let cash = GameContext::cash_game(100.0, 6);
        assert_eq!(survival_premium(&cash), 1.0);

        let early = GameContext::tournament(50.0, TournamentPhase::Early, 100, None);
        assert_eq!(survival_premium(&early), 1.0);

        let bubble = GameContext::tournament(50.0, TournamentPhase::Bubble, 20, None);
        assert!((survival_premium(&bubble) - 0.65).abs() < 1e-9);

        let final_table = GameContext::tournament(50.0, TournamentPhase::FinalTable, 6, None);
        assert!((survival_premium(&final_table) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_survival_premium_stack_ratio() {
        let short = GameContext::tournament(10.0, TournamentPhase::Bubble, 20, None)
            .with_average_stack(40.0);
        assert!((survival_premium(&short) - 0.65 * 0.85).abs() < 1e-9);

        let big = GameContext::tournament(100.0, TournamentPhase::Bubble, 20, None)
            .with_average_stack(40.0);
        assert!((survival_premium(&big) - 0.65 * 1.15).abs() < 1e-9);

        // Big stack boost never exceeds 1.0
        let big_early = GameContext::tournament(100.0, TournamentPhase::Early, 100, None)
            .with_average_stack(40.0);
        assert_eq!(survival_premium(&big_early), 1.0);
    }

    #[test]
    fn test_tournament_range_tightening() {
        let base = Range::parse("22+,A2s+,A2o+,K9s+,QTs+,JTs,T9s").unwrap();
        let bubble = GameContext::tournament(50.0, TournamentPhase::Bubble, 20, None);
        let tightened = adjust_range_for_tournament(&base, &bubble);
        assert!(tightened.len() < base.len());
        assert!(tightened.is_subset_of(&base));
        // Strongest hands always survive the cut
        assert!(tightened.contains_notation(&"AA".parse().unwrap()));

        let cash = GameContext::cash_game(100.0, 6);
        assert_eq!(adjust_range_for_tournament(&base, &cash), base);
    }
}
