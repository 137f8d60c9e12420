//! Offline generator: builds the coarse preflop strategy table from the
//! position charts.
//!
//! Converts binary range membership into mixed strategies: core hands
//! get pure actions, border hands get mixed frequencies keyed to hand
//! strength, and calling ranges call at high frequency.
//!
//! Usage:
//!     generate_tables [output.json]

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use holdem_solver::charts;
use holdem_solver::range::{HandNotation, HandType, Range};
use holdem_solver::state::Position;

const DEFAULT_OUTPUT: &str = "data/preflop_strategies.json";

#[derive(Debug, Serialize)]
struct StrategyRow {
    action: &'static str,
    frequency: f64,
    amount: f64,
    ev: f64,
}

type HandStrategies = BTreeMap<String, Vec<StrategyRow>>;
type PositionStrategies = BTreeMap<String, HandStrategies>;

/// Score a notation hand 0-1 for core/border classification.
fn hand_strength_score(hand: &HandNotation) -> f64 {
    let r1 = (hand.rank1 - 1) as f64;
    let r2 = (hand.rank2 - 1) as f64;
    match hand.hand_type {
        HandType::Pair => 0.5 + (r1 / 13.0) * 0.5,
        HandType::Suited => (r1 + r2) / 26.0 * 0.8,
        HandType::Offsuit => (r1 + r2) / 26.0 * 0.6,
    }
}

/// Sort key mirroring range-tightening order: pairs first, then suited,
/// then offsuit, higher ranks first.
fn strength_key(hand: &HandNotation) -> (u8, u8, u8) {
    let type_bonus = match hand.hand_type {
        HandType::Pair => 200,
        HandType::Suited => 100,
        HandType::Offsuit => 0,
    };
    (type_bonus, hand.rank1, hand.rank2)
}

/// Split a range into core (top 60%) and border (bottom 40%) hands.
fn classify_hands(range: &Range) -> (Vec<HandNotation>, Vec<HandNotation>) {
    let mut sorted: Vec<_> = range.iter().copied().collect();
    sorted.sort_by_key(|h| std::cmp::Reverse(strength_key(h)));
    let split = ((sorted.len() as f64 * 0.6) as usize).max(1).min(sorted.len());
    let border = sorted.split_off(split);
    (sorted, border)
}

fn open_strategies(open_range: &Range) -> HandStrategies {
    let (core, border) = classify_hands(open_range);
    let mut strategies = HandStrategies::new();

    for hand in core {
        strategies.insert(
            hand.to_string(),
            vec![StrategyRow {
                action: "raise",
                frequency: 1.0,
                amount: 2.5,
                ev: 0.5,
            }],
        );
    }

    for hand in border {
        let raise_freq = hand_strength_score(&hand).clamp(0.3, 0.7);
        strategies.insert(
            hand.to_string(),
            vec![
                StrategyRow {
                    action: "raise",
                    frequency: raise_freq,
                    amount: 2.5,
                    ev: 0.2,
                },
                StrategyRow {
                    action: "fold",
                    frequency: 1.0 - raise_freq,
                    amount: 0.0,
                    ev: 0.0,
                },
            ],
        );
    }

    strategies
}

fn vs_raise_strategies(three_bet_range: &Range, call_range: &Range) -> HandStrategies {
    let (core, border) = classify_hands(three_bet_range);
    let mut strategies = HandStrategies::new();

    for hand in core {
        strategies.insert(
            hand.to_string(),
            vec![StrategyRow {
                action: "raise",
                frequency: 1.0,
                amount: 7.5,
                ev: 1.0,
            }],
        );
    }

    for hand in border {
        let raise_freq = hand_strength_score(&hand).clamp(0.3, 0.7);
        strategies.insert(
            hand.to_string(),
            vec![
                StrategyRow {
                    action: "raise",
                    frequency: raise_freq,
                    amount: 7.5,
                    ev: 0.5,
                },
                StrategyRow {
                    action: "call",
                    frequency: 1.0 - raise_freq,
                    amount: 2.5,
                    ev: 0.2,
                },
            ],
        );
    }

    // Flat-calling hands not already covered by the 3-bet range
    for hand in call_range.iter() {
        let key = hand.to_string();
        if strategies.contains_key(&key) {
            continue;
        }
        strategies.insert(
            key,
            vec![
                StrategyRow {
                    action: "call",
                    frequency: 0.9,
                    amount: 2.5,
                    ev: 0.1,
                },
                StrategyRow {
                    action: "fold",
                    frequency: 0.1,
                    amount: 0.0,
                    ev: 0.0,
                },
            ],
        );
    }

    strategies
}

fn vs_3bet_strategies(four_bet_range: &Range) -> HandStrategies {
    let (core, border) = classify_hands(four_bet_range);
    let mut strategies = HandStrategies::new();

    for hand in core {
        strategies.insert(
            hand.to_string(),
            vec![StrategyRow {
                action: "raise",
                frequency: 1.0,
                amount: 22.0,
                ev: 2.0,
            }],
        );
    }

    for hand in border {
        let raise_freq = hand_strength_score(&hand).clamp(0.4, 0.8);
        strategies.insert(
            hand.to_string(),
            vec![
                StrategyRow {
                    action: "raise",
                    frequency: raise_freq,
                    amount: 22.0,
                    ev: 1.0,
                },
                StrategyRow {
                    action: "call",
                    frequency: 1.0 - raise_freq,
                    amount: 7.5,
                    ev: 0.3,
                },
            ],
        );
    }

    strategies
}

fn generate() -> BTreeMap<String, PositionStrategies> {
    let positions = [
        Position::Utg,
        Position::Mp,
        Position::Co,
        Position::Btn,
        Position::Sb,
        Position::Bb,
    ];

    let bar = ProgressBar::new(positions.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("progress template is valid"),
    );

    let mut data = BTreeMap::new();
    for position in positions {
        bar.set_message(position.label());
        let mut by_sequence = PositionStrategies::new();

        let open_range = charts::opening_range(position);
        if !open_range.is_empty() {
            by_sequence.insert("open".to_string(), open_strategies(&open_range));
        }

        let three_bet = charts::three_bet_range(position);
        let calling = charts::call_vs_raise_range(position);
        if !three_bet.is_empty() || !calling.is_empty() {
            by_sequence.insert(
                "vs_raise".to_string(),
                vs_raise_strategies(&three_bet, &calling),
            );
        }

        let four_bet = charts::four_bet_range(position);
        if !four_bet.is_empty() {
            by_sequence.insert("vs_3bet".to_string(), vs_3bet_strategies(&four_bet));
        }

        data.insert(position.label().to_string(), by_sequence);
        bar.inc(1);
    }
    bar.finish_and_clear();

    data
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let out_path: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let started = Instant::now();
    let data = generate();

    let hand_count: usize = data
        .values()
        .flat_map(|by_seq| by_seq.values())
        .map(|hands| hands.len())
        .sum();

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(&out_path, &json)?;

    log::info!(
        "generated {} strategy entries in {:.1}ms",
        hand_count,
        started.elapsed().as_secs_f64() * 1000.0
    );
    println!(
        "Generated {} ({} bytes, {} hand entries)",
        out_path.display(),
        json.len(),
        hand_count
    );

    Ok(())
}
