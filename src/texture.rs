//! Board texture analysis and bucketing.
//!
//! Reduces the combinatorial space of boards, stacks, and pot ratios into
//! small closed enums used as strategy lookup keys: ~12 board buckets,
//! 5 stack tiers, and 3 SPR tiers.

use crate::cards::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the community card texture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoardTexture {
    /// All one suit.
    pub is_monotone: bool,
    /// Exactly two suits, neither with three cards.
    pub is_two_tone: bool,
    /// Three or more suits.
    pub is_rainbow: bool,
    /// Board has a pair.
    pub is_paired: bool,
    /// Any three cards within a five-rank window.
    pub is_connected: bool,
    pub high_card_rank: u8,
    /// Cards ten or higher.
    pub num_broadway: usize,
    /// Three or more of one suit.
    pub has_flush_draw: bool,
    pub has_straight_draw: bool,
}

impl BoardTexture {
    /// Analyze the texture of the community cards.
    pub fn analyze(board: &[Card]) -> BoardTexture {
        if board.is_empty() {
            return BoardTexture::default();
        }

        let mut suit_counts = [0usize; 4];
        for card in board {
            suit_counts[card.suit() as usize] += 1;
        }
        let max_suit_count = suit_counts.iter().copied().max().unwrap_or(0);
        let unique_suits = suit_counts.iter().filter(|&&c| c > 0).count();

        let mut values: Vec<u8> = board.iter().map(|c| c.rank()).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));

        // Connected when any 3 cards fit a 5-rank window
        let connected = values
            .windows(3)
            .any(|w| w[0] - w[2] <= 4);

        let mut rank_counts = [0u8; 15];
        for card in board {
            rank_counts[card.rank() as usize] += 1;
        }
        let is_paired = rank_counts.iter().any(|&c| c >= 2);

        BoardTexture {
            is_monotone: unique_suits == 1,
            is_two_tone: max_suit_count == 2 && unique_suits == 2,
            is_rainbow: unique_suits >= 3,
            is_paired,
            is_connected: connected,
            high_card_rank: values[0],
            num_broadway: values.iter().filter(|&&v| v >= 10).count(),
            has_flush_draw: max_suit_count >= 3,
            has_straight_draw: connected,
        }
    }
}

/// Coarse texture family used by the heuristic strategy tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureClass {
    Dry,
    Wet,
    Monotone,
    Paired,
}

/// Board texture bucket for precomputed strategy lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardBucket {
    DryHighRainbow,
    DryLowRainbow,
    DryMedium,
    WetConnected,
    WetTwoTone,
    MonotoneHigh,
    MonotoneLow,
    PairedHigh,
    PairedLow,
    BroadwayHeavy,
    ConnectedLow,
    Dynamic,
}

impl BoardBucket {
    pub const ALL: [BoardBucket; 12] = [
        BoardBucket::DryHighRainbow,
        BoardBucket::DryLowRainbow,
        BoardBucket::DryMedium,
        BoardBucket::WetConnected,
        BoardBucket::WetTwoTone,
        BoardBucket::MonotoneHigh,
        BoardBucket::MonotoneLow,
        BoardBucket::PairedHigh,
        BoardBucket::PairedLow,
        BoardBucket::BroadwayHeavy,
        BoardBucket::ConnectedLow,
        BoardBucket::Dynamic,
    ];

    /// Classify a board texture into its bucket.
    pub fn from_texture(texture: &BoardTexture) -> BoardBucket {
        let high = texture.high_card_rank;

        if texture.is_monotone {
            return if high >= 10 {
                BoardBucket::MonotoneHigh
            } else {
                BoardBucket::MonotoneLow
            };
        }

        if texture.is_paired {
            return if high >= 10 {
                BoardBucket::PairedHigh
            } else {
                BoardBucket::PairedLow
            };
        }

        if texture.has_flush_draw && texture.has_straight_draw {
            return BoardBucket::Dynamic;
        }

        if texture.is_connected {
            if texture.is_two_tone {
                return BoardBucket::WetTwoTone;
            }
            if high >= 10 && texture.num_broadway >= 2 {
                return BoardBucket::BroadwayHeavy;
            }
            if high < 8 {
                return BoardBucket::ConnectedLow;
            }
            return BoardBucket::WetConnected;
        }

        if texture.is_two_tone {
            return BoardBucket::WetTwoTone;
        }

        if texture.is_rainbow {
            if high >= 10 {
                return BoardBucket::DryHighRainbow;
            }
            if high <= 8 {
                return BoardBucket::DryLowRainbow;
            }
        }

        BoardBucket::DryMedium
    }

    /// Classify a board directly.
    pub fn from_board(board: &[Card]) -> BoardBucket {
        Self::from_texture(&BoardTexture::analyze(board))
    }

    /// Coarse texture family for heuristic strategy selection.
    pub fn texture_class(&self) -> TextureClass {
        match self {
            BoardBucket::DryHighRainbow | BoardBucket::DryLowRainbow | BoardBucket::DryMedium => {
                TextureClass::Dry
            }
            BoardBucket::WetConnected
            | BoardBucket::WetTwoTone
            | BoardBucket::BroadwayHeavy
            | BoardBucket::ConnectedLow
            | BoardBucket::Dynamic => TextureClass::Wet,
            BoardBucket::MonotoneHigh | BoardBucket::MonotoneLow => TextureClass::Monotone,
            BoardBucket::PairedHigh | BoardBucket::PairedLow => TextureClass::Paired,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoardBucket::DryHighRainbow => "dry_high_rainbow",
            BoardBucket::DryLowRainbow => "dry_low_rainbow",
            BoardBucket::DryMedium => "dry_medium",
            BoardBucket::WetConnected => "wet_connected",
            BoardBucket::WetTwoTone => "wet_two_tone",
            BoardBucket::MonotoneHigh => "monotone_high",
            BoardBucket::MonotoneLow => "monotone_low",
            BoardBucket::PairedHigh => "paired_high",
            BoardBucket::PairedLow => "paired_low",
            BoardBucket::BroadwayHeavy => "broadway_heavy",
            BoardBucket::ConnectedLow => "connected_low",
            BoardBucket::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for BoardBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stack depth tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackBucket {
    /// <10bb, push/fold territory.
    Critical,
    /// 10-19bb, reshove territory.
    VeryShort,
    /// 20-39bb, limited postflop play.
    Short,
    /// 40-99bb, standard play.
    Medium,
    /// 100bb+, full postflop game.
    Deep,
}

impl StackBucket {
    pub fn from_bb(stack_bb: f64) -> StackBucket {
        if stack_bb < 10.0 {
            StackBucket::Critical
        } else if stack_bb < 20.0 {
            StackBucket::VeryShort
        } else if stack_bb < 40.0 {
            StackBucket::Short
        } else if stack_bb < 100.0 {
            StackBucket::Medium
        } else {
            StackBucket::Deep
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StackBucket::Critical => "critical",
            StackBucket::VeryShort => "very_short",
            StackBucket::Short => "short",
            StackBucket::Medium => "medium",
            StackBucket::Deep => "deep",
        }
    }
}

impl fmt::Display for StackBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stack-to-pot ratio tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprBucket {
    /// SPR <4, committed or near-committed.
    Low,
    /// SPR 4-10, standard postflop play.
    Medium,
    /// SPR >10, deep relative to pot.
    High,
}

impl SprBucket {
    pub fn from_spr(spr: f64) -> SprBucket {
        if spr < 4.0 {
            SprBucket::Low
        } else if spr <= 10.0 {
            SprBucket::Medium
        } else {
            SprBucket::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SprBucket::Low => "low",
            SprBucket::Medium => "medium",
            SprBucket::High => "high",
        }
    }
}

impl fmt::Display for SprBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stack depths covered by exact preflop tables, in big blinds.
pub const STACK_LADDER: [u32; 11] = [10, 15, 20, 25, 30, 40, 50, 75, 100, 150, 200];

/// Snap an effective stack to the nearest ladder rung.
pub fn nearest_stack_bb(stack_bb: f64) -> u32 {
    let mut best = STACK_LADDER[0];
    let mut best_dist = f64::INFINITY;
    for &rung in &STACK_LADDER {
        let dist = (stack_bb - rung as f64).abs();
        if dist < best_dist {
            best = rung;
            best_dist = dist;
        }
    }
    best
}
