//! Piece generation - seeded 7-bag randomizer
//!
//! Each bag holds one of every kind, shuffled with a small LCG so a seed reproduces the
//! exact same piece sequence. Dealing a whole bag before reshuffling bounds the gap
//! between two pieces of the same kind to 12 draws.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in `[0, max)`
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceBag {
    bag: [PieceKind; 7],
    /// Next undealt position in `bag`; 7 means the bag is exhausted.
    cursor: usize,
    rng: SimpleRng,
    seed: u32,
}

impl PieceBag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::ALL,
            cursor: 0,
            rng: SimpleRng::new(seed),
            seed,
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.cursor = 0;
    }

    /// Deal the next piece kind, reshuffling when the bag runs dry.
    pub fn draw(&mut self) -> PieceKind {
        if self.cursor >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.cursor];
        self.cursor += 1;
        kind
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.cursor..]
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_bag_deals_every_kind_once() {
        let mut bag = PieceBag::new(7);

        for _ in 0..3 {
            let mut drawn: Vec<PieceKind> = (0..7).map(|_| bag.draw()).collect();
            drawn.sort_by_key(|k| k.color_id());
            assert_eq!(drawn, PieceKind::ALL.to_vec());
        }
    }

    #[test]
    fn test_no_kind_starved_beyond_bound() {
        let mut bag = PieceBag::new(99);
        let mut last_seen = [0usize; 7];

        for draw in 1..=700 {
            let kind = bag.draw();
            let slot = (kind.color_id() - 1) as usize;
            assert!(draw - last_seen[slot] <= 13, "{:?} starved", kind);
            last_seen[slot] = draw;
        }
    }

    #[test]
    fn test_remaining_shrinks_then_refills() {
        let mut bag = PieceBag::new(1);
        assert_eq!(bag.remaining().len(), 7);

        for _ in 0..7 {
            bag.draw();
        }
        assert!(bag.remaining().is_empty());

        bag.draw();
        assert_eq!(bag.remaining().len(), 6);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceBag::new(4242);
        let mut b = PieceBag::new(4242);
        let first: Vec<PieceKind> = (0..10).map(|_| a.draw()).collect();
        let second: Vec<PieceKind> = (0..10).map(|_| b.draw()).collect();

        assert_eq!(first, second);
        assert_eq!(a.seed(), 4242);
    }
}
