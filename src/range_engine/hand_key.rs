//! The 169 starting-hand classes and their 13×13 grid layout.
//!
//! Row and column `0` are the Ace, `12` the deuce. The diagonal holds the
//! pairs, the upper triangle (`col > row`) the suited hands and the lower
//! triangle the offsuit hands, always written higher rank first.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::range_engine::{
    error::RangeError,
    models::Rank,
};

/// Number of distinct two-card starting hands.
pub const COMBO_TOTAL: u32 = 1326;

/// Side length of the range grid.
pub const GRID: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandShape {
    Pair,
    Suited,
    Offsuit,
}

impl HandShape {
    /// Concrete card combinations behind one hand of this shape.
    pub fn combos(self) -> u32 {
        match self {
            HandShape::Pair    => 6,
            HandShape::Suited  => 4,
            HandShape::Offsuit => 12,
        }
    }
}

/// One of the 169 canonical hand classes, e.g. `AA`, `AKs`, `T9o`.
///
/// Serialized as its notation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Hand169 {
    high: Rank,
    low: Rank,
    shape: HandShape,
}

/// Hand class for grid cell `(i, j)`.
///
/// Panics in debug builds when an index is outside `0..13`.
pub fn encode(i: usize, j: usize) -> Hand169 {
    debug_assert!(i < GRID && j < GRID, "grid index out of range: ({i}, {j})");
    let ri = Rank(14 - i as u8);
    let rj = Rank(14 - j as u8);
    if i == j {
        return Hand169 { high: ri, low: rj, shape: HandShape::Pair };
    }
    let shape = if j > i { HandShape::Suited } else { HandShape::Offsuit };
    let (high, low) = if i < j { (ri, rj) } else { (rj, ri) };
    Hand169 { high, low, shape }
}

/// Every grid cell in row-major order with its hand class.
pub fn grid_cells() -> impl Iterator<Item = (usize, usize, Hand169)> {
    (0..GRID).flat_map(|i| (0..GRID).map(move |j| (i, j, encode(i, j))))
}

/// All 169 hand classes in row-major grid order.
pub fn all_hands() -> impl Iterator<Item = Hand169> {
    grid_cells().map(|(_, _, hand)| hand)
}

/// Grid cell holding `hand`, found by scanning the grid.
pub fn grid_position(hand: Hand169) -> Option<(usize, usize)> {
    grid_cells()
        .find(|&(_, _, h)| h == hand)
        .map(|(i, j, _)| (i, j))
}

impl Hand169 {
    pub fn high(self) -> Rank {
        self.high
    }

    pub fn low(self) -> Rank {
        self.low
    }

    pub fn shape(self) -> HandShape {
        self.shape
    }

    /// Combination weight: 6 for pairs, 4 suited, 12 offsuit.
    pub fn combos(self) -> u32 {
        self.shape.combos()
    }
}

impl fmt::Display for Hand169 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            HandShape::Pair    => write!(f, "{}{}", self.high, self.low),
            HandShape::Suited  => write!(f, "{}{}s", self.high, self.low),
            HandShape::Offsuit => write!(f, "{}{}o", self.high, self.low),
        }
    }
}

impl FromStr for Hand169 {
    type Err = RangeError;

    /// Accepts `AA`, `AKs`, `akO`; the ranks may come in either order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidHand(s.to_string());
        let chars: Vec<char> = s.trim().chars().collect();
        let (a, b, suffix) = match chars.as_slice() {
            [a, b] => (*a, *b, None),
            [a, b, c] => (*a, *b, Some(c.to_ascii_lowercase())),
            _ => return Err(invalid()),
        };
        let ra = Rank::from_symbol(a).ok_or_else(invalid)?;
        let rb = Rank::from_symbol(b).ok_or_else(invalid)?;
        let (high, low) = if ra >= rb { (ra, rb) } else { (rb, ra) };

        let shape = match (high == low, suffix) {
            (true, None) => HandShape::Pair,
            (false, Some('s')) => HandShape::Suited,
            (false, Some('o')) => HandShape::Offsuit,
            _ => return Err(invalid()),
        };
        Ok(Hand169 { high, low, shape })
    }
}

impl From<Hand169> for String {
    fn from(hand: Hand169) -> Self {
        hand.to_string()
    }
}

impl TryFrom<String> for Hand169 {
    type Error = RangeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn grid_yields_169_distinct_hands() {
        let hands: HashSet<String> = all_hands().map(|h| h.to_string()).collect();
        assert_eq!(hands.len(), 169);
    }

    #[test]
    fn diagonal_is_pairs_and_suffix_follows_triangle() {
        for i in 0..GRID {
            for j in 0..GRID {
                let text = encode(i, j).to_string();
                if i == j {
                    assert_eq!(text.len(), 2, "{text}");
                    assert_eq!(&text[..1], &text[1..2]);
                } else {
                    let suffix = if j > i { 's' } else { 'o' };
                    assert_eq!(text.chars().last(), Some(suffix), "({i},{j}) -> {text}");
                }
            }
        }
    }

    #[test]
    fn higher_rank_is_written_first() {
        assert_eq!(encode(0, 1).to_string(), "AKs");
        assert_eq!(encode(1, 0).to_string(), "AKo");
        assert_eq!(encode(12, 4).to_string(), "T2o");
        assert_eq!(encode(4, 12).to_string(), "T2s");
        assert_eq!(encode(0, 0).to_string(), "AA");
        assert_eq!(encode(12, 12).to_string(), "22");
    }

    #[test]
    fn grid_position_finds_every_cell() {
        for (i, j, hand) in grid_cells() {
            assert_eq!(grid_position(hand), Some((i, j)));
        }
    }

    #[test]
    fn parse_accepts_loose_notation() {
        assert_eq!("AKs".parse::<Hand169>().unwrap(), encode(0, 1));
        assert_eq!("kao".parse::<Hand169>().unwrap(), encode(1, 0));
        assert_eq!("tt".parse::<Hand169>().unwrap(), encode(4, 4));
        assert!("AK".parse::<Hand169>().is_err());
        assert!("AAs".parse::<Hand169>().is_err());
        assert!("AKx".parse::<Hand169>().is_err());
        assert!("A".parse::<Hand169>().is_err());
    }

    #[test]
    fn combo_weights_sum_to_1326() {
        let total: u32 = all_hands().map(Hand169::combos).sum();
        assert_eq!(total, COMBO_TOTAL);
    }
}
