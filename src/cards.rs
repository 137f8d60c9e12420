//! Card primitives for Texas Hold'em.
//!
//! Provides the fundamental types used throughout the engine:
//! - `Card`: a single playing card, ordered by rank then suit
//! - `HoleCards`: a player's two private cards (higher rank first)
//! - `Street`: betting round, derivable from the board size
//! - `Deck`: the 52-card deck with dead-card filtering and dealing

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Rank values 2-14 (deuce through ace, ace high).
pub const RANK_2: u8 = 2;
pub const RANK_3: u8 = 3;
pub const RANK_4: u8 = 4;
pub const RANK_5: u8 = 5;
pub const RANK_6: u8 = 6;
pub const RANK_7: u8 = 7;
pub const RANK_8: u8 = 8;
pub const RANK_9: u8 = 9;
pub const RANK_T: u8 = 10;
pub const RANK_J: u8 = 11;
pub const RANK_Q: u8 = 12;
pub const RANK_K: u8 = 13;
pub const RANK_A: u8 = 14;

/// Suit of a card (0-3).
pub const SUIT_CLUBS: u8 = 0;
pub const SUIT_DIAMONDS: u8 = 1;
pub const SUIT_HEARTS: u8 = 2;
pub const SUIT_SPADES: u8 = 3;

const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// Convert a rank value (2-14) to its display character.
pub fn rank_char(rank: u8) -> char {
    RANK_CHARS[(rank - 2) as usize]
}

/// Parse a rank character ('2'-'9', 'T', 'J', 'Q', 'K', 'A') to its value.
pub fn rank_from_char(c: char) -> Option<u8> {
    RANK_CHARS
        .iter()
        .position(|&r| r == c.to_ascii_uppercase())
        .map(|i| i as u8 + 2)
}

/// A single playing card.
///
/// Stored as a compact index 0-51 ((rank - 2) * 4 + suit). The total order
/// is by rank first, then suit, so sorting a hand sorts by rank.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    id: u8,
}

impl Card {
    /// Create a card from rank (2-14) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!((RANK_2..=RANK_A).contains(&rank), "rank must be 2-14");
        debug_assert!(suit < 4, "suit must be 0-3");
        Self {
            id: (rank - 2) * 4 + suit,
        }
    }

    /// Create a card from its index (0-51).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52, "card id must be 0-51");
        Self { id }
    }

    /// The card's index (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The card's rank value (2-14, ace high).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4 + 2
    }

    /// The card's suit (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    pub fn rank_char(&self) -> char {
        rank_char(self.rank())
    }

    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.rank(), self.suit()).cmp(&(other.rank(), other.suit()))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Error parsing a card or hole-card string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardError {
    input: String,
}

impl fmt::Display for ParseCardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid card: {:?}", self.input)
    }
}

impl std::error::Error for ParseCardError {}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parse a card from a string like "As", "Kh", "2c".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCardError {
            input: s.to_string(),
        };
        let mut chars = s.chars();
        let (rc, sc) = (chars.next().ok_or_else(err)?, chars.next().ok_or_else(err)?);
        if chars.next().is_some() {
            return Err(err());
        }
        let rank = rank_from_char(rc).ok_or_else(err)?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == sc.to_ascii_lowercase())
            .ok_or_else(err)? as u8;
        Ok(Self::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a run of cards like "AhKsQd" or "Ah Ks Qd".
pub fn parse_cards(s: &str) -> Result<Vec<Card>, ParseCardError> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        return Err(ParseCardError {
            input: s.to_string(),
        });
    }
    let mut cards = Vec::with_capacity(compact.len() / 2);
    let bytes: Vec<char> = compact.chars().collect();
    for pair in bytes.chunks(2) {
        let token: String = pair.iter().collect();
        cards.push(token.parse()?);
    }
    Ok(cards)
}

/// A player's two hole cards, higher rank first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoleCards {
    pub card1: Card,
    pub card2: Card,
}

impl HoleCards {
    /// Create hole cards, ordering by rank (higher first).
    pub fn new(card1: Card, card2: Card) -> Self {
        if card1.rank() >= card2.rank() {
            Self { card1, card2 }
        } else {
            Self {
                card1: card2,
                card2: card1,
            }
        }
    }

    pub fn is_suited(&self) -> bool {
        self.card1.suit() == self.card2.suit()
    }

    pub fn is_pair(&self) -> bool {
        self.card1.rank() == self.card2.rank()
    }

    pub fn cards(&self) -> [Card; 2] {
        [self.card1, self.card2]
    }

    /// Whether either hole card matches the given card.
    pub fn contains(&self, card: Card) -> bool {
        self.card1 == card || self.card2 == card
    }

    /// Whether these hole cards share a card with another pair.
    pub fn conflicts_with(&self, other: &HoleCards) -> bool {
        self.contains(other.card1) || self.contains(other.card2)
    }
}

impl FromStr for HoleCards {
    type Err = ParseCardError;

    /// Parse hole cards from a string like "AhKs" or "Ah Ks".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s)?;
        if cards.len() != 2 || cards[0] == cards[1] {
            return Err(ParseCardError {
                input: s.to_string(),
            });
        }
        Ok(Self::new(cards[0], cards[1]))
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.card1, self.card2)
    }
}

impl fmt::Debug for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Derive the street from the number of community cards.
    pub fn from_board_len(n: usize) -> Street {
        match n {
            0..=2 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }

    pub fn num_board_cards(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A deck of up to 52 cards with dead cards removed up front.
#[derive(Clone)]
pub struct Deck {
    cards: Vec<Card>,
    index: usize,
}

impl Deck {
    /// Full 52-card deck in standard order.
    pub fn new() -> Self {
        Self::without(&[])
    }

    /// Deck with the given cards removed.
    pub fn without(dead: &[Card]) -> Self {
        let mut mask = 0u64;
        for card in dead {
            mask |= 1u64 << card.id();
        }
        let cards = (0..52)
            .map(Card::from_id)
            .filter(|c| mask & (1u64 << c.id()) == 0)
            .collect();
        Self { cards, index: 0 }
    }

    /// Shuffle the undealt portion of the deck.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards[self.index..].shuffle(rng);
    }

    /// Deal the next card.
    pub fn deal(&mut self) -> Option<Card> {
        let card = self.cards.get(self.index).copied()?;
        self.index += 1;
        Some(card)
    }

    /// Deal `n` cards (fewer if the deck runs out).
    pub fn deal_n(&mut self, n: usize) -> Vec<Card> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            match self.deal() {
                Some(card) => out.push(card),
                None => break,
            }
        }
        out
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.index
    }

    /// Rewind so all cards (minus the original dead cards) are dealable again.
    pub fn rewind(&mut self) {
        self.index = 0;
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} remaining)", self.remaining())
    }
}
