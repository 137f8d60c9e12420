//! Hand ranges and standard poker range notation.
//!
//! Hand notation:
//!   - "AA"   -> pocket pair (6 combos)
//!   - "AKs"  -> suited (4 combos)
//!   - "AKo"  -> offsuit (12 combos)
//!   - "AK"   -> both suited and offsuit (16 combos)
//!   - "JJ+"  -> JJ, QQ, KK, AA
//!   - "ATs+" -> ATs, AJs, AQs, AKs
//!   - "JJ-88" -> JJ, TT, 99, 88
//!   - "A5s-A2s" -> A5s, A4s, A3s, A2s

use crate::cards::{rank_char, rank_from_char, Card, HoleCards, RANK_A};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Total number of 2-card starting combinations.
pub const TOTAL_COMBOS: usize = 1326;

/// Errors from range notation parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    InvalidNotation(String),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::InvalidNotation(s) => write!(f, "invalid range notation: {:?}", s),
        }
    }
}

impl std::error::Error for RangeError {}

/// Suitedness class of a starting hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandType {
    Pair,
    Suited,
    Offsuit,
}

/// A starting hand in standard notation (e.g. AKs, JJ, T9o).
///
/// `rank1` is always the higher rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandNotation {
    pub rank1: u8,
    pub rank2: u8,
    pub hand_type: HandType,
}

impl HandNotation {
    pub fn new(rank1: u8, rank2: u8, hand_type: HandType) -> Self {
        let (rank1, rank2) = if rank1 >= rank2 {
            (rank1, rank2)
        } else {
            (rank2, rank1)
        };
        debug_assert!(rank1 != rank2 || hand_type == HandType::Pair);
        Self {
            rank1,
            rank2,
            hand_type,
        }
    }

    pub fn pair(rank: u8) -> Self {
        Self::new(rank, rank, HandType::Pair)
    }

    /// Expand into all specific card combinations.
    pub fn to_combos(&self) -> Vec<HoleCards> {
        match self.hand_type {
            HandType::Pair => {
                let mut combos = Vec::with_capacity(6);
                for s1 in 0..4u8 {
                    for s2 in s1 + 1..4 {
                        combos.push(HoleCards::new(
                            Card::new(self.rank1, s1),
                            Card::new(self.rank2, s2),
                        ));
                    }
                }
                combos
            }
            HandType::Suited => (0..4u8)
                .map(|s| HoleCards::new(Card::new(self.rank1, s), Card::new(self.rank2, s)))
                .collect(),
            HandType::Offsuit => {
                let mut combos = Vec::with_capacity(12);
                for s1 in 0..4u8 {
                    for s2 in 0..4u8 {
                        if s1 != s2 {
                            combos.push(HoleCards::new(
                                Card::new(self.rank1, s1),
                                Card::new(self.rank2, s2),
                            ));
                        }
                    }
                }
                combos
            }
        }
    }

    pub fn combo_count(&self) -> usize {
        match self.hand_type {
            HandType::Pair => 6,
            HandType::Suited => 4,
            HandType::Offsuit => 12,
        }
    }
}

impl FromStr for HandNotation {
    type Err = RangeError;

    /// Parse notation like "AKs", "JJ", "T9o". A 2-character non-pair
    /// parses as offsuit; use [`expand_notation`] to get both classes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RangeError::InvalidNotation(s.to_string());
        let chars: Vec<char> = s.chars().collect();
        if chars.len() < 2 || chars.len() > 3 {
            return Err(err());
        }
        let r1 = rank_from_char(chars[0]).ok_or_else(err)?;
        let r2 = rank_from_char(chars[1]).ok_or_else(err)?;

        if r1 == r2 {
            if chars.len() != 2 {
                return Err(err());
            }
            return Ok(Self::pair(r1));
        }

        let hand_type = match chars.get(2) {
            Some('s') => HandType::Suited,
            Some('o') | None => HandType::Offsuit,
            Some(_) => return Err(err()),
        };
        Ok(Self::new(r1, r2, hand_type))
    }
}

impl fmt::Display for HandNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", rank_char(self.rank1), rank_char(self.rank2))?;
        match self.hand_type {
            HandType::Pair => Ok(()),
            HandType::Suited => f.write_str("s"),
            HandType::Offsuit => f.write_str("o"),
        }
    }
}

impl Serialize for HandNotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HandNotation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Classify concrete hole cards as a notation hand.
pub fn hand_to_notation(hole: &HoleCards) -> HandNotation {
    let hand_type = if hole.is_pair() {
        HandType::Pair
    } else if hole.is_suited() {
        HandType::Suited
    } else {
        HandType::Offsuit
    };
    HandNotation::new(hole.card1.rank(), hole.card2.rank(), hand_type)
}

/// Expand a single notation token into its hands.
///
/// Supports single hands ("AKs", "JJ"), both-class shorthand ("AK"),
/// plus notation ("JJ+", "ATs+"), and dash ranges ("JJ-88", "A5s-A2s").
pub fn expand_notation(notation: &str) -> Result<Vec<HandNotation>, RangeError> {
    let notation = notation.trim();
    let err = || RangeError::InvalidNotation(notation.to_string());

    if let Some((start, end)) = notation.split_once('-') {
        return expand_dash(start.trim(), end.trim());
    }

    if let Some(base) = notation.strip_suffix('+') {
        return expand_plus(base);
    }

    let chars: Vec<char> = notation.chars().collect();
    if chars.len() == 2 {
        let r1 = rank_from_char(chars[0]).ok_or_else(err)?;
        let r2 = rank_from_char(chars[1]).ok_or_else(err)?;
        if r1 != r2 {
            // "AK" means both AKs and AKo
            return Ok(vec![
                HandNotation::new(r1, r2, HandType::Suited),
                HandNotation::new(r1, r2, HandType::Offsuit),
            ]);
        }
    }

    Ok(vec![notation.parse()?])
}

fn expand_plus(base: &str) -> Result<Vec<HandNotation>, RangeError> {
    let hand: HandNotation = base.parse()?;

    if hand.hand_type == HandType::Pair {
        // JJ+ -> JJ, QQ, KK, AA
        return Ok((hand.rank1..=RANK_A).map(HandNotation::pair).collect());
    }

    // ATs+ -> ATs, AJs, AQs, AKs (low card walks up to just below the high)
    Ok((hand.rank2..hand.rank1)
        .map(|r2| HandNotation::new(hand.rank1, r2, hand.hand_type))
        .collect())
}

fn expand_dash(start: &str, end: &str) -> Result<Vec<HandNotation>, RangeError> {
    let h_start: HandNotation = start.parse()?;
    let h_end: HandNotation = end.parse()?;
    let err = || RangeError::InvalidNotation(format!("{}-{}", start, end));

    if h_start.hand_type == HandType::Pair && h_end.hand_type == HandType::Pair {
        let lo = h_start.rank1.min(h_end.rank1);
        let hi = h_start.rank1.max(h_end.rank1);
        return Ok((lo..=hi).map(HandNotation::pair).collect());
    }

    // Non-pair range: same high card, same type, varying low card
    if h_start.rank1 != h_end.rank1 || h_start.hand_type != h_end.hand_type {
        return Err(err());
    }
    let lo = h_start.rank2.min(h_end.rank2);
    let hi = h_start.rank2.max(h_end.rank2);
    Ok((lo..=hi)
        .map(|r2| HandNotation::new(h_start.rank1, r2, h_start.hand_type))
        .collect())
}

/// A set of starting hands representing a player's range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    hands: FxHashSet<HandNotation>,
}

impl Range {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a range from comma-separated notation, e.g. "JJ+,ATs+,KQs".
    pub fn parse(notation: &str) -> Result<Self, RangeError> {
        let mut range = Self::new();
        range.add(notation)?;
        Ok(range)
    }

    /// Add hands using comma-separated notation.
    pub fn add(&mut self, notation: &str) -> Result<(), RangeError> {
        for part in notation.split(',') {
            let part = part.trim();
            if !part.is_empty() {
                self.hands.extend(expand_notation(part)?);
            }
        }
        Ok(())
    }

    /// Remove hands using comma-separated notation.
    pub fn remove(&mut self, notation: &str) -> Result<(), RangeError> {
        for part in notation.split(',') {
            let part = part.trim();
            if !part.is_empty() {
                for hand in expand_notation(part)? {
                    self.hands.remove(&hand);
                }
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, hand: HandNotation) {
        self.hands.insert(hand);
    }

    /// Expand the range into all specific card combinations.
    pub fn to_combos(&self) -> Vec<HoleCards> {
        let mut combos = Vec::with_capacity(self.combo_count());
        for hand in &self.hands {
            combos.extend(hand.to_combos());
        }
        combos
    }

    /// Total number of specific card combinations.
    pub fn combo_count(&self) -> usize {
        self.hands.iter().map(|h| h.combo_count()).sum()
    }

    /// Percentage of all 1326 starting combinations.
    pub fn percentage(&self) -> f64 {
        self.combo_count() as f64 / TOTAL_COMBOS as f64 * 100.0
    }

    /// Whether specific hole cards fall within this range.
    pub fn contains(&self, hole: &HoleCards) -> bool {
        self.hands.contains(&hand_to_notation(hole))
    }

    pub fn contains_notation(&self, hand: &HandNotation) -> bool {
        self.hands.contains(hand)
    }

    pub fn is_subset_of(&self, other: &Range) -> bool {
        self.hands.is_subset(&other.hands)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandNotation> {
        self.hands.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.hands.iter().map(|h| h.to_string()).collect();
        names.sort();
        f.write_str(&names.join(","))
    }
}
