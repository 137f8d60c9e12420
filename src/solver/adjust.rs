//! ICM-to-strategy adjustment layer.
//!
//! Shifts mixed-strategy frequencies under tournament ICM pressure:
//! folds become more frequent, aggressive actions less so, and EVs are
//! taxed by the survival premium.

use crate::solver::types::{ActionFrequency, StrategyNode};
use crate::state::Action;

/// Adjust a mixed strategy for ICM pressure.
///
/// `survival_premium` is in [0.3, 1.0]; 1.0 means chip-EV play. Premiums
/// at or above 0.95 are treated as chip-EV and the strategy is returned
/// untouched. Otherwise fold frequency gains `(1 - premium) * 0.3`,
/// raises and all-ins are scaled down by half the ICM factor, calls by
/// 0.3 of it, checks are untouched, and the result is renormalized.
pub fn adjust_for_icm(strategy: &StrategyNode, survival_premium: f64) -> StrategyNode {
    if survival_premium >= 0.95 || strategy.actions.is_empty() {
        return strategy.clone();
    }

    let icm_factor = 1.0 - survival_premium;

    let adjusted = strategy
        .actions
        .iter()
        .map(|af| match af.action {
            Action::Fold => ActionFrequency {
                frequency: af.frequency + icm_factor * 0.3,
                ..*af
            },
            Action::Raise | Action::AllIn => ActionFrequency {
                frequency: (af.frequency * (1.0 - icm_factor * 0.5)).max(0.0),
                ev: af.ev * survival_premium,
                ..*af
            },
            Action::Call => ActionFrequency {
                frequency: (af.frequency * (1.0 - icm_factor * 0.3)).max(0.0),
                ev: af.ev * survival_premium,
                ..*af
            },
            // Check carries no chip risk
            _ => *af,
        })
        .collect();

    StrategyNode::new(adjusted).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> StrategyNode {
        StrategyNode::new(vec![
            ActionFrequency::new(Action::Raise, 0.5, 2.5, 1.2),
            ActionFrequency::new(Action::Call, 0.3, 0.0, 0.4),
            ActionFrequency::new(Action::Fold, 0.2, 0.0, 0.0),
        ])
    }

    #[test]
    fn test_chip_ev_premium_is_noop() {
        let strategy = mixed();
        assert_eq!(adjust_for_icm(&strategy, 1.0), strategy);
        assert_eq!(adjust_for_icm(&strategy, 0.95), strategy);
    }

    #[test]
    fn test_empty_strategy_unchanged() {
        let empty = StrategyNode::default();
        assert_eq!(adjust_for_icm(&empty, 0.5), empty);
    }

    #[test]
    fn test_pressure_shifts_toward_fold() {
        let base = mixed();
        let adjusted = adjust_for_icm(&base, 0.6);

        assert!(adjusted.frequency_of(Action::Fold) > base.frequency_of(Action::Fold));
        assert!(adjusted.frequency_of(Action::Raise) < base.frequency_of(Action::Raise));

        let total: f64 = adjusted.actions.iter().map(|a| a.frequency).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ev_taxed_on_risky_actions() {
        let adjusted = adjust_for_icm(&mixed(), 0.6);
        let raise = adjusted
            .actions
            .iter()
            .find(|a| a.action == Action::Raise)
            .unwrap();
        assert!((raise.ev - 1.2 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_check_untouched_before_renormalization() {
        let base = StrategyNode::new(vec![
            ActionFrequency::new(Action::Check, 0.7, 0.0, 0.1),
            ActionFrequency::new(Action::Raise, 0.3, 5.0, 0.8),
        ]);
        let adjusted = adjust_for_icm(&base, 0.5);
        // Raise scaled down, so check's share must grow after renormalizing
        assert!(adjusted.frequency_of(Action::Check) > 0.7);
        let check = adjusted
            .actions
            .iter()
            .find(|a| a.action == Action::Check)
            .unwrap();
        assert!((check.ev - 0.1).abs() < 1e-9);
    }
}
