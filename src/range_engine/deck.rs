use rand::Rng;
use crate::range_engine::{
    hand_key::{Hand169, HandShape},
    models::{Card, Suit},
};

/// Every concrete two-card holding behind a hand class.
///
/// Yields 6 holdings for a pair, 4 for a suited hand and 12 for an offsuit one.
pub fn hole_combos(hand: Hand169) -> Vec<[Card; 2]> {
    let mut combos = Vec::with_capacity(hand.combos() as usize);
    for (a, &s1) in Suit::ALL.iter().enumerate() {
        for (b, &s2) in Suit::ALL.iter().enumerate() {
            let keep = match hand.shape() {
                HandShape::Pair    => a < b,
                HandShape::Suited  => a == b,
                HandShape::Offsuit => a != b,
            };
            if keep {
                combos.push([
                    Card { rank: hand.high(), suit: s1 },
                    Card { rank: hand.low(), suit: s2 },
                ]);
            }
        }
    }
    combos
}

/// Pick one concrete holding for display, uniformly over the class's combos.
pub fn deal_hole_cards<R: Rng>(rng: &mut R, hand: Hand169) -> [Card; 2] {
    let combos = hole_combos(hand);
    combos[rng.gen_range(0..combos.len())]
}
