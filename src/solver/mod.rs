//! Hybrid GTO solver: tiered preflop lookup, postflop bucket lookup
//! with Monte Carlo refinement, ICM adjustment, and an external CFR
//! solver relay, all behind the [`Solver`] trait.

pub mod adjust;
pub mod bridge;
pub mod engine;
pub mod estimator;
pub mod postflop;
pub mod preflop;
pub mod sizing;
pub mod types;

pub use adjust::adjust_for_icm;
pub use bridge::{
    gto_unavailable, load_solver_config, BridgeError, RelaySolver, SolverBridge, SolverConfig,
    SolverInput, SolverOutput,
};
pub use engine::SolverEngine;
pub use estimator::{
    categorize_hand, estimate_preflop_range, hand_strength_score, narrow_for_postflop_action,
};
pub use postflop::{PostflopSolver, PostflopSpot};
pub use preflop::{ExactRow, PreflopSolver, TableError};
pub use types::{
    ActionFrequency, ActionSequence, HandCategory, Solver, SolverResult, Source, SpotKey,
    StrategyNode,
};
