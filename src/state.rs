//! Table state as consumed from the driving harness.
//!
//! `GameState` is a read-only snapshot of a hand in progress: players,
//! blinds, pot, board, and the current betting round. The engine never
//! mutates it; dealing and pot management belong to the caller.

use crate::cards::{Card, HoleCards, Street};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Table position, ordered by postflop acting order (SB acts first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Sb,
    Bb,
    Utg,
    Mp,
    Co,
    Btn,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::Sb => "SB",
            Position::Bb => "BB",
            Position::Utg => "UTG",
            Position::Mp => "MP",
            Position::Co => "CO",
            Position::Btn => "BTN",
        }
    }

    pub const ALL: [Position; 6] = [
        Position::Sb,
        Position::Bb,
        Position::Utg,
        Position::Mp,
        Position::Co,
        Position::Btn,
    ];

    /// Whether this seat acts after every given opponent seat postflop.
    pub fn is_in_position(&self, villains: &[Position]) -> bool {
        villains.iter().all(|v| self > v)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A poker action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
    Limp,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call => "call",
            Action::Raise => "raise",
            Action::AllIn => "all_in",
            Action::Limp => "limp",
        }
    }

    /// Whether this action puts chips in voluntarily with initiative.
    pub fn is_aggressive(&self) -> bool {
        matches!(self, Action::Raise | Action::AllIn)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One action already taken in the hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorAction {
    pub position: Position,
    pub action: Action,
    pub amount: f64,
}

impl PriorAction {
    pub fn new(position: Position, action: Action, amount: f64) -> Self {
        Self {
            position,
            action,
            amount,
        }
    }
}

/// State of a single player at the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub chips: f64,
    pub position: Position,
    pub hole_cards: Option<HoleCards>,
    pub is_active: bool,
    pub current_bet: f64,
    pub is_all_in: bool,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, chips: f64, position: Position) -> Self {
        Self {
            name: name.into(),
            chips,
            position,
            hole_cards: None,
            is_active: chips > 0.0,
            current_bet: 0.0,
            is_all_in: false,
        }
    }

    pub fn with_hole_cards(mut self, hole_cards: HoleCards) -> Self {
        self.hole_cards = Some(hole_cards);
        self
    }
}

/// Snapshot of a Texas Hold'em hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    pub small_blind: f64,
    pub big_blind: f64,
    pub community_cards: Vec<Card>,
    pub pot: f64,
    pub current_bet: f64,
    pub dealer_position: usize,
}

impl GameState {
    pub fn new(players: Vec<PlayerState>, small_blind: f64, big_blind: f64) -> Self {
        Self {
            players,
            small_blind,
            big_blind,
            community_cards: Vec::new(),
            pot: 0.0,
            current_bet: 0.0,
            dealer_position: 0,
        }
    }

    pub fn with_board(mut self, community_cards: Vec<Card>) -> Self {
        self.community_cards = community_cards;
        self
    }

    pub fn with_pot(mut self, pot: f64) -> Self {
        self.pot = pot;
        self
    }

    /// The betting round implied by the board.
    pub fn current_street(&self) -> Street {
        Street::from_board_len(self.community_cards.len())
    }

    /// Players still contesting the hand.
    pub fn active_players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().filter(|p| p.is_active)
    }

    pub fn players_in_hand(&self) -> usize {
        self.active_players().count()
    }

    /// Smallest stack among the hero and active opponents.
    pub fn effective_stack(&self, hero_index: usize) -> f64 {
        let hero_chips = self.players[hero_index].chips;
        self.players
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != hero_index && p.is_active)
            .map(|(_, p)| p.chips)
            .fold(hero_chips, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn test_position_order() {
        assert!(Position::Btn > Position::Co);
        assert!(Position::Bb > Position::Sb);
        assert!(Position::Utg < Position::Mp);
    }

    #[test]
    fn test_is_in_position() {
        assert!(Position::Btn.is_in_position(&[Position::Sb, Position::Bb]));
        assert!(Position::Co.is_in_position(&[Position::Utg]));
        assert!(!Position::Sb.is_in_position(&[Position::Bb]));
        assert!(!Position::Mp.is_in_position(&[Position::Co, Position::Sb]));
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::AllIn.label(), "all_in");
        assert!(Action::Raise.is_aggressive());
        assert!(!Action::Call.is_aggressive());
    }

    #[test]
    fn test_street_from_state() {
        let players = vec![
            PlayerState::new("hero", 100.0, Position::Btn),
            PlayerState::new("villain", 100.0, Position::Bb),
        ];
        let mut state = GameState::new(players, 0.5, 1.0);
        assert_eq!(state.current_street(), Street::Preflop);

        state.community_cards = parse_cards("AhKs2d").unwrap();
        assert_eq!(state.current_street(), Street::Flop);
    }

    #[test]
    fn test_effective_stack() {
        let players = vec![
            PlayerState::new("hero", 120.0, Position::Btn),
            PlayerState::new("short", 35.0, Position::Sb),
            PlayerState::new("deep", 300.0, Position::Bb),
        ];
        let state = GameState::new(players, 0.5, 1.0);
        assert_eq!(state.effective_stack(0), 35.0);
    }
}
