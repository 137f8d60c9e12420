//! Baseline GTO preflop ranges.
//!
//! Approximate equilibrium ranges for 6-max No-Limit Hold'em at 100bb,
//! plus push/fold charts and stack-depth range adjustments. These back
//! the heuristic preflop tier and the offline table generator.

use crate::context::GameContext;
use crate::range::Range;
use crate::state::Position;
use crate::texture::StackBucket;
use std::sync::OnceLock;

fn build(notation: &str) -> Range {
    Range::parse(notation).expect("chart notation is valid")
}

// === Opening ranges (raise first in) ===

static UTG_OPEN: OnceLock<Range> = OnceLock::new();
static MP_OPEN: OnceLock<Range> = OnceLock::new();
static CO_OPEN: OnceLock<Range> = OnceLock::new();
static BTN_OPEN: OnceLock<Range> = OnceLock::new();
static SB_OPEN: OnceLock<Range> = OnceLock::new();

/// Opening range for a position. BB has no open range.
pub fn opening_range(position: Position) -> Range {
    match position {
        Position::Utg => UTG_OPEN
            .get_or_init(|| {
                build(
                    "AA,KK,QQ,JJ,TT,99,88,77,\
                     AKs,AQs,AJs,ATs,A5s,A4s,\
                     AKo,AQo,AJo,\
                     KQs,KJs,KTs,KQo,\
                     QJs,QTs,JTs,T9s,98s,87s",
                )
            })
            .clone(),
        Position::Mp => MP_OPEN
            .get_or_init(|| {
                build(
                    "AA,KK,QQ,JJ,TT,99,88,77,66,\
                     AKs,AQs,AJs,ATs,A9s,A5s,A4s,A3s,\
                     AKo,AQo,AJo,ATo,\
                     KQs,KJs,KTs,K9s,KQo,\
                     QJs,QTs,Q9s,\
                     JTs,J9s,T9s,T8s,98s,87s,76s",
                )
            })
            .clone(),
        Position::Co => CO_OPEN
            .get_or_init(|| {
                build(
                    "AA,KK,QQ,JJ,TT,99,88,77,66,55,\
                     AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                     AKo,AQo,AJo,ATo,A9o,\
                     KQs,KJs,KTs,K9s,K8s,KQo,KJo,KTo,\
                     QJs,QTs,Q9s,Q8s,QJo,\
                     JTs,J9s,J8s,JTo,\
                     T9s,T8s,98s,97s,87s,86s,76s,75s,65s,54s",
                )
            })
            .clone(),
        Position::Btn => BTN_OPEN
            .get_or_init(|| {
                build(
                    "AA,KK,QQ,JJ,TT,99,88,77,66,55,44,33,22,\
                     AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                     AKo,AQo,AJo,ATo,A9o,A8o,A7o,A6o,A5o,A4o,A3o,A2o,\
                     KQs,KJs,KTs,K9s,K8s,K7s,K6s,K5s,K4s,\
                     KQo,KJo,KTo,K9o,\
                     QJs,QTs,Q9s,Q8s,Q7s,Q6s,QJo,QTo,Q9o,\
                     JTs,J9s,J8s,J7s,JTo,J9o,\
                     T9s,T8s,T7s,T9o,\
                     98s,97s,96s,87s,86s,76s,75s,\
                     65s,64s,54s,53s,43s",
                )
            })
            .clone(),
        Position::Sb => SB_OPEN
            .get_or_init(|| {
                build(
                    "AA,KK,QQ,JJ,TT,99,88,77,66,55,44,33,22,\
                     AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                     AKo,AQo,AJo,ATo,A9o,A8o,A7o,A6o,A5o,A4o,\
                     KQs,KJs,KTs,K9s,K8s,K7s,K6s,K5s,K4s,K3s,K2s,\
                     KQo,KJo,KTo,K9o,K8o,\
                     QJs,QTs,Q9s,Q8s,Q7s,Q6s,Q5s,QJo,QTo,Q9o,\
                     JTs,J9s,J8s,J7s,J6s,JTo,J9o,\
                     T9s,T8s,T7s,T6s,T9o,\
                     98s,97s,96s,98o,87s,86s,85s,76s,75s,\
                     65s,64s,54s,53s,43s",
                )
            })
            .clone(),
        Position::Bb => Range::new(),
    }
}

// === 3-bet ranges (vs open raise) ===

static THREE_BET: OnceLock<[Range; 6]> = OnceLock::new();

pub fn three_bet_range(position: Position) -> Range {
    let tables = THREE_BET.get_or_init(|| {
        [
            // SB
            build(
                "AA,KK,QQ,JJ,TT,99,\
                 AKs,AQs,AJs,ATs,A9s,AKo,AQo,AJo,\
                 A5s,A4s,A3s,A2s,\
                 KQs,KJs,KTs,QJs,QTs,JTs,T9s,98s,\
                 87s,76s,65s,54s",
            ),
            // BB
            build(
                "AA,KK,QQ,JJ,TT,\
                 AKs,AQs,AJs,AKo,AQo,\
                 A5s,A4s,A3s,KQs,\
                 76s,65s,54s",
            ),
            // UTG
            build("AA,KK,QQ,AKs,AKo"),
            // MP
            build("AA,KK,QQ,JJ,AKs,AQs,AKo,A5s,A4s"),
            // CO
            build("AA,KK,QQ,JJ,TT,AKs,AQs,AJs,AKo,AQo,A5s,A4s,KQs"),
            // BTN
            build(
                "AA,KK,QQ,JJ,TT,\
                 AKs,AQs,AJs,ATs,AKo,AQo,\
                 A5s,A4s,A3s,KQs,KJs,QJs,\
                 76s,65s,54s",
            ),
        ]
    });
    tables[position as usize].clone()
}

// === 4-bet ranges (vs 3-bet) ===

static FOUR_BET: OnceLock<[Range; 6]> = OnceLock::new();

pub fn four_bet_range(position: Position) -> Range {
    let tables = FOUR_BET.get_or_init(|| {
        [
            // SB
            build("AA,KK,QQ,JJ,AKs,AQs,AKo,A5s,A4s"),
            // BB
            build("AA,KK,QQ,AKs,AKo,A5s,A4s"),
            // UTG
            build("AA,KK,AKs,A5s"),
            // MP
            build("AA,KK,QQ,AKs,AKo,A5s,A4s"),
            // CO
            build("AA,KK,QQ,AKs,AQs,AKo,A5s,A4s"),
            // BTN
            build("AA,KK,QQ,AKs,AQs,AKo,A5s,A4s,A3s"),
        ]
    });
    tables[position as usize].clone()
}

// === Calling ranges (vs open raise) ===

static MP_CALL: OnceLock<Range> = OnceLock::new();
static CO_CALL: OnceLock<Range> = OnceLock::new();
static BTN_CALL: OnceLock<Range> = OnceLock::new();
static BB_CALL: OnceLock<Range> = OnceLock::new();

/// Cold-call (or BB defend) range vs an open raise. UTG and SB play
/// 3-bet-or-fold and have no calling range.
pub fn call_vs_raise_range(position: Position) -> Range {
    match position {
        Position::Mp => MP_CALL
            .get_or_init(|| {
                build(
                    "TT,99,88,77,66,\
                     AQs,AJs,ATs,A9s,AQo,\
                     KQs,KJs,QJs,QTs,JTs,T9s,98s,87s",
                )
            })
            .clone(),
        Position::Co => CO_CALL
            .get_or_init(|| {
                build(
                    "TT,99,88,77,66,55,\
                     AQs,AJs,ATs,A9s,A8s,AQo,AJo,\
                     KQs,KJs,KTs,KQo,\
                     QJs,QTs,Q9s,JTs,J9s,T9s,T8s,\
                     98s,97s,87s,86s,76s,65s",
                )
            })
            .clone(),
        Position::Btn => BTN_CALL
            .get_or_init(|| {
                build(
                    "TT,99,88,77,66,55,44,\
                     AQs,AJs,ATs,A9s,A8s,A7s,A6s,AQo,AJo,ATo,\
                     KQs,KJs,KTs,K9s,KQo,KJo,\
                     QJs,QTs,Q9s,QJo,\
                     JTs,J9s,J8s,JTo,\
                     T9s,T8s,T9o,\
                     98s,97s,87s,86s,76s,75s,\
                     65s,64s,54s",
                )
            })
            .clone(),
        Position::Bb => BB_CALL
            .get_or_init(|| {
                build(
                    "TT,99,88,77,66,55,44,33,22,\
                     AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                     AJo,ATo,A9o,A8o,A7o,A6o,A5o,\
                     KQs,KJs,KTs,K9s,K8s,K7s,K6s,K5s,\
                     KQo,KJo,KTo,K9o,\
                     QJs,QTs,Q9s,Q8s,Q7s,QJo,QTo,Q9o,\
                     JTs,J9s,J8s,J7s,JTo,J9o,\
                     T9s,T8s,T7s,T9o,T8o,\
                     98s,97s,96s,98o,87s,86s,85s,87o,\
                     76s,75s,65s,64s,54s,53s,43s",
                )
            })
            .clone(),
        _ => Range::new(),
    }
}

// === Push/fold charts (critical stacks) ===

static PUSH_10BB: OnceLock<[Range; 6]> = OnceLock::new();
static PUSH_5BB: OnceLock<[Range; 6]> = OnceLock::new();

fn push_10bb() -> &'static [Range; 6] {
    PUSH_10BB.get_or_init(|| {
        [
            // SB
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,66,55,44,33,22,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,A9o,A8o,A7o,A6o,A5o,A4o,A3o,A2o,\
                 KQs,KJs,KTs,K9s,K8s,K7s,K6s,K5s,K4s,K3s,K2s,\
                 KQo,KJo,KTo,K9o,K8o,\
                 QJs,QTs,Q9s,Q8s,Q7s,Q6s,Q5s,QJo,QTo,Q9o,\
                 JTs,J9s,J8s,J7s,J6s,JTo,J9o,\
                 T9s,T8s,T7s,T6s,T9o,\
                 98s,97s,96s,87s,86s,85s,76s,75s,\
                 65s,64s,54s,53s,43s",
            ),
            // BB (defend-only seat, no open shove chart)
            Range::new(),
            // UTG
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,\
                 KQs,KJs,KTs,KQo",
            ),
            // MP
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,66,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,A9o,\
                 KQs,KJs,KTs,K9s,KQo,KJo,\
                 QJs,QTs,JTs",
            ),
            // CO
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,66,55,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,A9o,A8o,A7o,\
                 KQs,KJs,KTs,K9s,K8s,KQo,KJo,KTo,\
                 QJs,QTs,Q9s,QJo,\
                 JTs,J9s,T9s,98s",
            ),
            // BTN
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,66,55,44,33,22,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,A9o,A8o,A7o,A6o,A5o,A4o,A3o,A2o,\
                 KQs,KJs,KTs,K9s,K8s,K7s,K6s,K5s,\
                 KQo,KJo,KTo,K9o,\
                 QJs,QTs,Q9s,Q8s,Q7s,QJo,QTo,\
                 JTs,J9s,J8s,J7s,JTo,\
                 T9s,T8s,T7s,98s,97s,87s,86s,\
                 76s,75s,65s,54s",
            ),
        ]
    })
}

fn push_5bb() -> &'static [Range; 6] {
    PUSH_5BB.get_or_init(|| {
        [
            // SB
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,66,55,44,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,A9o,A8o,A7o,\
                 KQs,KJs,KTs,K9s,K8s,K7s,KQo,KJo,KTo,\
                 QJs,QTs,Q9s,Q8s,QJo,QTo,\
                 JTs,J9s,J8s,JTo,\
                 T9s,T8s,98s,97s,87s,86s,76s,65s,54s",
            ),
            // BB
            Range::new(),
            // UTG
            build("AA,KK,QQ,JJ,TT,99,AKs,AQs,AJs,ATs,A9s,AKo,AQo,KQs"),
            // MP
            build(
                "AA,KK,QQ,JJ,TT,99,88,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,\
                 AKo,AQo,AJo,KQs,KJs,QJs",
            ),
            // CO
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,\
                 KQs,KJs,KTs,KQo,QJs,QTs,JTs",
            ),
            // BTN
            build(
                "AA,KK,QQ,JJ,TT,99,88,77,66,55,\
                 AKs,AQs,AJs,ATs,A9s,A8s,A7s,A6s,A5s,A4s,A3s,A2s,\
                 AKo,AQo,AJo,ATo,A9o,A8o,\
                 KQs,KJs,KTs,K9s,K8s,KQo,KJo,\
                 QJs,QTs,Q9s,QJo,\
                 JTs,J9s,T9s,98s,87s",
            ),
        ]
    })
}

/// Nash push range for a critical stack, or None above push/fold depth.
pub fn push_fold_range(stack_bb: f64, position: Position) -> Option<Range> {
    if stack_bb > 15.0 {
        return None;
    }
    let chart = if stack_bb <= 7.0 {
        push_5bb()
    } else {
        push_10bb()
    };
    let range = chart[position as usize].clone();
    if range.is_empty() {
        None
    } else {
        Some(range)
    }
}

// === Stack-depth range adjustments ===

// Speculative hands added when deep (implied odds)
const DEEP_STACK_ADD: &str = "55,44,33,22,\
    A9s-A2s,K9s-K6s,Q9s-Q7s,J9s-J7s,T9s-T7s,\
    98s-96s,87s-85s,76s-74s,65s-63s,54s-53s,43s";

const MEDIUM_STACK_REMOVE: &str =
    "43s,53s,64s,63s,74s,75s,85s,86s,96s,97s,T7s,J7s,Q7s,K6s,K7s";

const SHORT_STACK_REMOVE: &str = "22,33,44,\
    A2s,A3s,A4s,A6s,A7s,A8s,\
    K8s,K9s,Q8s,Q9s,J8s,J9s,T8s,T9s,\
    97s,98s,86s,87s,75s,76s,65s,64s,54s,53s,43s";

/// Adjust a standard opening range for the effective stack depth.
///
/// Deep stacks widen with speculative hands; shorter stacks shed them.
/// Very short and critical stacks get the tightest cut; the push/fold
/// charts handle their open-shove decisions separately.
pub fn adjust_range_for_stack(base: &Range, context: &GameContext) -> Range {
    let mut adjusted = base.clone();
    match context.stack_category() {
        StackBucket::Deep => {
            adjusted
                .add(DEEP_STACK_ADD)
                .expect("chart notation is valid");
        }
        StackBucket::Medium => {
            adjusted
                .remove(MEDIUM_STACK_REMOVE)
                .expect("chart notation is valid");
        }
        StackBucket::Short | StackBucket::VeryShort | StackBucket::Critical => {
            adjusted
                .remove(SHORT_STACK_REMOVE)
                .expect("chart notation is valid");
        }
    }
    adjusted
}
