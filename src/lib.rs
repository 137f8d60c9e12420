//! # Hold'em Solver
//!
//! A hybrid GTO decision engine for No-Limit Texas Hold'em: exact hand
//! evaluation, Monte Carlo equity, tournament ICM math, and a tiered
//! solver that blends precomputed strategy tables with real-time
//! refinement.
//!
//! ## Features
//!
//! - **Hand Evaluation**: exact best-5-of-7 ranking with full tie-break
//!   ordering
//! - **Equity Engine**: seeded Monte Carlo hand/range simulations with a
//!   bounded parallel fan-out
//! - **Ranges**: standard notation parsing (`JJ+`, `ATs+`, `A5s-A2s`)
//!   and position-based charts
//! - **ICM**: Malmuth-Harville equities, bubble factors, and survival
//!   premium adjustments
//! - **Tiered Solver**: exact/coarse preflop tables, postflop bucket
//!   lookup, heuristic + Monte Carlo fallback, external CFR relay
//!
//! ## Quick Start
//!
//! ```ignore
//! use holdem_solver::solver::{Solver, SolverEngine};
//!
//! let engine = SolverEngine::new();
//! let result = engine.solve(&game_state, &context, hero_index, &history, None);
//! println!("{:?}", result.strategy.recommended_action());
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: cards, hole cards, streets, deck
//! - [`eval`]: 7-card hand evaluator
//! - [`range`]: hand notation and ranges
//! - [`equity`]: Monte Carlo equity calculator
//! - [`charts`]: position-based preflop charts
//! - [`icm`]: tournament equity model
//! - [`texture`]: board/stack/SPR bucketing
//! - [`solver`]: the hybrid solver engine

pub mod cards;
pub mod charts;
pub mod context;
pub mod equity;
pub mod eval;
pub mod icm;
pub mod range;
pub mod solver;
pub mod state;
pub mod texture;

pub use cards::{Card, Deck, HoleCards, Street};
pub use context::{GameContext, GameType, OpponentStats, PayoutStructure, TournamentPhase};
pub use equity::{EquityCalculator, EquityResult};
pub use eval::{HandEvaluator, HandRanking, HandResult};
pub use icm::{calculate_bubble_factor, calculate_icm, survival_premium, IcmResult};
pub use range::{HandNotation, Range};
pub use solver::{Solver, SolverEngine, SolverResult, StrategyNode};
pub use state::{Action, GameState, PlayerState, Position, PriorAction};
pub use texture::{BoardBucket, BoardTexture, SprBucket, StackBucket};
