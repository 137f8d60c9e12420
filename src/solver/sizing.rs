//! Bet sizing by board texture, plus multi-street geometric sizing.

use crate::texture::BoardBucket;

/// A bet sizing option expressed as a fraction of the pot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingOption {
    pub fraction: f64,
    pub label: &'static str,
}

impl SizingOption {
    const fn new(fraction: f64, label: &'static str) -> Self {
        Self { fraction, label }
    }
}

const DEFAULT_SIZINGS: [SizingOption; 2] = [
    SizingOption::new(0.50, "1/2 pot (default)"),
    SizingOption::new(0.66, "2/3 pot (default)"),
];

/// Recommended sizings for a board texture, most preferred first.
pub fn texture_sizings(bucket: BoardBucket) -> &'static [SizingOption] {
    use BoardBucket::*;
    match bucket {
        DryHighRainbow | DryLowRainbow => const { &[
            SizingOption::new(0.33, "1/3 pot (dry board c-bet)"),
            SizingOption::new(0.25, "1/4 pot (probe bet)"),
        ] },
        DryMedium => const { &[
            SizingOption::new(0.33, "1/3 pot (dry board)"),
            SizingOption::new(0.50, "1/2 pot (standard)"),
        ] },
        WetConnected => const { &[
            SizingOption::new(0.66, "2/3 pot (protect vs draws)"),
            SizingOption::new(0.75, "3/4 pot (heavy protection)"),
        ] },
        WetTwoTone => const { &[
            SizingOption::new(0.66, "2/3 pot (protect vs flush draw)"),
            SizingOption::new(0.50, "1/2 pot (standard)"),
        ] },
        MonotoneHigh | MonotoneLow => const { &[
            SizingOption::new(0.75, "3/4 pot (polarized on monotone)"),
            SizingOption::new(0.33, "1/3 pot (block bet)"),
        ] },
        PairedHigh => const { &[
            SizingOption::new(0.33, "1/3 pot (dry paired board)"),
            SizingOption::new(0.50, "1/2 pot (standard)"),
        ] },
        PairedLow => const { &[
            SizingOption::new(0.33, "1/3 pot (dry paired board)"),
            SizingOption::new(0.25, "1/4 pot (probe)"),
        ] },
        BroadwayHeavy => const { &[
            SizingOption::new(0.50, "1/2 pot (broadway texture)"),
            SizingOption::new(0.66, "2/3 pot (protection)"),
        ] },
        ConnectedLow => const { &[
            SizingOption::new(0.66, "2/3 pot (protect vs draws)"),
            SizingOption::new(0.50, "1/2 pot (standard)"),
        ] },
        Dynamic => const { &[
            SizingOption::new(0.75, "3/4 pot (dynamic board)"),
            SizingOption::new(1.0, "pot (overbet for polarization)"),
        ] },
    }
}

/// The primary (most common) pot fraction for a texture.
pub fn primary_sizing(bucket: BoardBucket) -> f64 {
    texture_sizings(bucket)
        .first()
        .map(|s| s.fraction)
        .unwrap_or(DEFAULT_SIZINGS[0].fraction)
}

/// Geometric bet size to get all-in over the remaining streets.
///
/// Solves `pot * (1 + x)^n = pot + stack` for the per-street pot fraction
/// x, clamped to [0.2, 2.0]. Returns 0 for degenerate inputs.
pub fn geometric_sizing(pot: f64, stack: f64, streets_remaining: u32) -> f64 {
    if pot <= 0.0 || stack <= 0.0 || streets_remaining == 0 {
        return 0.0;
    }
    let ratio = 1.0 + stack / pot;
    let per_street = ratio.powf(1.0 / streets_remaining as f64) - 1.0;
    per_street.clamp(0.2, 2.0)
}

/// Actual bet amount from a pot fraction, clamped to [min_bet, stack].
pub fn compute_bet_amount(pot: f64, stack: f64, sizing_fraction: f64, min_bet: f64) -> f64 {
    (pot * sizing_fraction).max(min_bet).min(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_sizings_preferred_first() {
        assert!((primary_sizing(BoardBucket::DryHighRainbow) - 0.33).abs() < 1e-9);
        assert!((primary_sizing(BoardBucket::WetConnected) - 0.66).abs() < 1e-9);
        assert!((primary_sizing(BoardBucket::MonotoneHigh) - 0.75).abs() < 1e-9);
        assert!((primary_sizing(BoardBucket::Dynamic) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_geometric_sizing_one_street_is_spr() {
        // One street left: bet the whole stack, fraction = stack/pot
        let frac = geometric_sizing(10.0, 10.0, 1);
        assert!((frac - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometric_sizing_pots_grow_to_all_in() {
        let pot = 10.0;
        let stack = 50.0;
        let frac = geometric_sizing(pot, stack, 3);
        let mut p = pot;
        let mut remaining = stack;
        for _ in 0..3 {
            let bet = p * frac;
            remaining -= bet;
            p += bet;
        }
        assert!(remaining.abs() < 1e-6, "leftover stack {}", remaining);
    }

    #[test]
    fn test_geometric_sizing_clamped() {
        assert!((geometric_sizing(100.0, 1.0, 3) - 0.2).abs() < 1e-9);
        assert!((geometric_sizing(1.0, 1000.0, 1) - 2.0).abs() < 1e-9);
        assert_eq!(geometric_sizing(0.0, 50.0, 2), 0.0);
        assert_eq!(geometric_sizing(10.0, 50.0, 0), 0.0);
    }

    #[test]
    fn test_compute_bet_amount_clamps() {
        assert!((compute_bet_amount(10.0, 100.0, 0.5, 2.0) - 5.0).abs() < 1e-9);
        // Min bet floor
        assert!((compute_bet_amount(2.0, 100.0, 0.25, 2.0) - 2.0).abs() < 1e-9);
        // Stack ceiling
        assert!((compute_bet_amount(100.0, 20.0, 1.0, 2.0) - 20.0).abs() < 1e-9);
    }
}
