//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm: each bag holds one of
//! every piece, shuffled; draws empty the bag and then a new one is dealt.
//! A small LCG keeps the whole thing deterministic from a seed, which also
//! makes tests reproducible.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceBag {
    bag: Vec<PieceKind>,
    bag_index: usize,
    rng: SimpleRng,
}

impl PieceBag {
    /// Create a new bag generator with the given seed
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: Vec::with_capacity(7),
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL.to_vec();
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece, dealing a fresh bag when this one runs out
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Discard the current bag and reshuffle, used on game restart
    pub fn reset(&mut self) {
        self.refill();
    }

    #[cfg(test)]
    fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}
