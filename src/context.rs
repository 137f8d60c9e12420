//! Game context for cash games and tournaments.
//!
//! `GameContext` carries everything strategy adjustment needs beyond the
//! cards: game type, stack depths, tournament phase, payout structure,
//! and per-opponent statistics. It is read-only within the engine.

use crate::texture::StackBucket;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    Cash,
    Tournament,
    SitAndGo,
}

/// Tournament stage, used to scale survival pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentPhase {
    /// Blinds small relative to stacks.
    Early,
    /// Antes kick in, stacks shrink.
    Middle,
    /// One or few eliminations from the money.
    Bubble,
    /// Past the bubble, pay jumps matter.
    InTheMoney,
    FinalTable,
}

impl fmt::Display for TournamentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TournamentPhase::Early => "EARLY",
            TournamentPhase::Middle => "MIDDLE",
            TournamentPhase::Bubble => "BUBBLE",
            TournamentPhase::InTheMoney => "IN_THE_MONEY",
            TournamentPhase::FinalTable => "FINAL_TABLE",
        };
        f.write_str(label)
    }
}

/// A single blind level in a tournament structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlindLevel {
    pub small_blind: f64,
    pub big_blind: f64,
    pub ante: f64,
    pub level_number: u32,
    pub duration_minutes: u32,
}

impl BlindLevel {
    pub fn new(small_blind: f64, big_blind: f64, ante: f64) -> Self {
        Self {
            small_blind,
            big_blind,
            ante,
            level_number: 1,
            duration_minutes: 0,
        }
    }

    /// Dead money in the pot before any action (blinds plus antes, 6-max).
    pub fn total_pot_preflop(&self) -> f64 {
        self.small_blind + self.big_blind + self.ante * 6.0
    }
}

/// Tournament payout structure: finishing position (1-indexed) to amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoutStructure {
    pub total_prize_pool: f64,
    pub payouts: BTreeMap<u32, f64>,
    pub total_entries: u32,
}

impl PayoutStructure {
    pub fn new(payouts: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let payouts: BTreeMap<u32, f64> = payouts.into_iter().collect();
        let total_prize_pool = payouts.values().sum();
        Self {
            total_prize_pool,
            payouts,
            total_entries: 0,
        }
    }

    /// Last position that receives a payout.
    pub fn min_cash_position(&self) -> u32 {
        self.payouts.keys().max().copied().unwrap_or(0)
    }

    pub fn payout_for(&self, position: u32) -> f64 {
        self.payouts.get(&position).copied().unwrap_or(0.0)
    }

    /// Payouts still reachable given how many players remain.
    pub fn remaining_payouts(&self, players_left: u32) -> Vec<f64> {
        self.payouts
            .iter()
            .filter(|(&pos, _)| pos <= players_left)
            .map(|(_, &amt)| amt)
            .collect()
    }
}

/// Tracked statistics for a single opponent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentStats {
    pub name: String,
    pub hands_seen: u32,
    pub vpip_count: u32,
    pub pfr_count: u32,
    pub three_bet_count: u32,
    /// Bets and raises.
    pub aggression_actions: u32,
    /// Checks and calls.
    pub passive_actions: u32,
    /// Times faced a continuation bet.
    pub cbet_faced: u32,
    pub fold_to_cbet_count: u32,
}

/// Player style classification from VPIP/PFR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerType {
    Unknown,
    LooseAggressive,
    LoosePassive,
    TightAggressive,
    TightPassive,
    Average,
}

impl OpponentStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn vpip_pct(&self) -> f64 {
        pct(self.vpip_count, self.hands_seen)
    }

    pub fn pfr_pct(&self) -> f64 {
        pct(self.pfr_count, self.hands_seen)
    }

    pub fn three_bet_pct(&self) -> f64 {
        pct(self.three_bet_count, self.hands_seen)
    }

    pub fn fold_to_cbet_pct(&self) -> f64 {
        pct(self.fold_to_cbet_count, self.cbet_faced)
    }

    pub fn aggression_factor(&self) -> f64 {
        if self.passive_actions == 0 {
            f64::INFINITY
        } else {
            self.aggression_actions as f64 / self.passive_actions as f64
        }
    }

    pub fn player_type(&self) -> PlayerType {
        if self.hands_seen < 5 {
            return PlayerType::Unknown;
        }
        let vpip = self.vpip_pct();
        let pfr = self.pfr_pct();
        if vpip > 35.0 && pfr > 25.0 {
            PlayerType::LooseAggressive
        } else if vpip > 35.0 {
            PlayerType::LoosePassive
        } else if vpip <= 25.0 && pfr > 18.0 {
            PlayerType::TightAggressive
        } else if vpip <= 25.0 {
            PlayerType::TightPassive
        } else {
            PlayerType::Average
        }
    }
}

fn pct(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Complete context for strategic decision-making.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub game_type: GameType,
    /// Hero's stack in big blinds.
    pub stack_depth_bb: f64,
    /// Players at the table.
    pub num_players: usize,

    pub tournament_phase: Option<TournamentPhase>,
    pub players_remaining: u32,
    pub payout_structure: Option<PayoutStructure>,
    pub blind_level: Option<BlindLevel>,
    pub average_stack_bb: f64,

    /// Stack sizes at the table, in big blinds.
    pub table_stack_sizes_bb: Vec<f64>,

    /// Opponent statistics by player name.
    pub opponent_stats: FxHashMap<String, OpponentStats>,
}

impl GameContext {
    pub fn cash_game(stack_bb: f64, num_players: usize) -> Self {
        Self {
            game_type: GameType::Cash,
            stack_depth_bb: stack_bb,
            num_players,
            tournament_phase: None,
            players_remaining: 0,
            payout_structure: None,
            blind_level: None,
            average_stack_bb: 0.0,
            table_stack_sizes_bb: Vec::new(),
            opponent_stats: FxHashMap::default(),
        }
    }

    pub fn tournament(
        stack_bb: f64,
        phase: TournamentPhase,
        players_remaining: u32,
        payout_structure: Option<PayoutStructure>,
    ) -> Self {
        Self {
            game_type: GameType::Tournament,
            stack_depth_bb: stack_bb,
            num_players: 6,
            tournament_phase: Some(phase),
            players_remaining,
            payout_structure,
            blind_level: None,
            average_stack_bb: stack_bb,
            table_stack_sizes_bb: Vec::new(),
            opponent_stats: FxHashMap::default(),
        }
    }

    pub fn with_average_stack(mut self, average_stack_bb: f64) -> Self {
        self.average_stack_bb = average_stack_bb;
        self
    }

    pub fn with_blind_level(mut self, blind_level: BlindLevel) -> Self {
        self.blind_level = Some(blind_level);
        self
    }

    pub fn is_tournament(&self) -> bool {
        matches!(self.game_type, GameType::Tournament | GameType::SitAndGo)
    }

    pub fn is_cash(&self) -> bool {
        self.game_type == GameType::Cash
    }

    /// Stack depth tier for strategy selection.
    pub fn stack_category(&self) -> StackBucket {
        StackBucket::from_bb(self.stack_depth_bb)
    }

    /// Harrington's M: orbits survivable without playing a hand.
    pub fn m_ratio(&self) -> f64 {
        let Some(level) = &self.blind_level else {
            return self.stack_depth_bb;
        };
        let pot = level.total_pot_preflop();
        if pot == 0.0 {
            return f64::INFINITY;
        }
        self.stack_depth_bb * level.big_blind / pot
    }

    pub fn is_on_bubble(&self) -> bool {
        self.tournament_phase == Some(TournamentPhase::Bubble)
    }

    /// Whether busting now versus lasting one spot changes the payout by 1.5x.
    pub fn is_near_payout_jump(&self) -> bool {
        let Some(ps) = &self.payout_structure else {
            return false;
        };
        if self.players_remaining == 0 {
            return false;
        }
        let current = ps.payout_for(self.players_remaining);
        if current == 0.0 {
            return false;
        }
        ps.payout_for(self.players_remaining - 1) / current >= 1.5
    }

    pub fn stats_for(&self, name: &str) -> Option<&OpponentStats> {
        self.opponent_stats.get(name)
    }
}
