use crate::symbols::{Symbol, SYMBOL_COUNT};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::Index;

/// Symbols on a single reel strip.
pub const REEL_LENGTH: usize = 13;
/// Reels on the machine.
pub const NUM_REELS: usize = 5;
/// Rows shown per reel (top, middle, bottom).
pub const VISIBLE_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reel([Symbol; REEL_LENGTH]);

impl Reel {
    pub fn new(symbols: [Symbol; REEL_LENGTH]) -> Self {
        Self(symbols)
    }

    pub fn symbols(&self) -> &[Symbol; REEL_LENGTH] {
        &self.0
    }

    pub fn len(&self) -> usize {
        REEL_LENGTH
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Index<usize> for Reel {
    type Output = Symbol;

    fn index(&self, idx: usize) -> &Symbol {
        &self.0[idx]
    }
}

/// The five reel strips in play for one spin. Replaced wholesale on every spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReelSet([Reel; NUM_REELS]);

impl ReelSet {
    pub fn new(reels: [Reel; NUM_REELS]) -> Self {
        Self(reels)
    }

    /// Build a set whose strips start with the given top, middle and bottom rows.
    /// Strip positions past the visible rows are filled by walking the alphabet.
    pub fn from_rows(
        top: [Symbol; NUM_REELS],
        middle: [Symbol; NUM_REELS],
        bottom: [Symbol; NUM_REELS],
    ) -> Self {
        Self(std::array::from_fn(|r| {
            Reel(std::array::from_fn(|i| match i {
                0 => top[r],
                1 => middle[r],
                2 => bottom[r],
                _ => Symbol::from_index((r + i) as u8),
            }))
        }))
    }

    pub fn reels(&self) -> &[Reel; NUM_REELS] {
        &self.0
    }

    /// Symbols at strip position `row` across all reels.
    pub fn row(&self, row: usize) -> [Symbol; NUM_REELS] {
        std::array::from_fn(|r| self.0[r][row])
    }
}

impl Index<usize> for ReelSet {
    type Output = Reel;

    fn index(&self, idx: usize) -> &Reel {
        &self.0[idx]
    }
}

pub fn generate_reel<R: Rng + ?Sized>(rng: &mut R) -> Reel {
    Reel(std::array::from_fn(|_| {
        Symbol::ALL[rng.gen_range(0..SYMBOL_COUNT)]
    }))
}

pub fn generate_reel_set<R: Rng + ?Sized>(rng: &mut R) -> ReelSet {
    ReelSet(std::array::from_fn(|_| generate_reel(&mut *rng)))
}

/// Supplies a fresh reel set for every spin and restart.
pub trait ReelSource {
    fn next_reel_set(&mut self) -> ReelSet;
}

/// Uniformly random reels drawn from an `Rng`.
#[derive(Debug, Clone)]
pub struct RandomReels<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomReels<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomReels<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> ReelSource for RandomReels<R> {
    fn next_reel_set(&mut self) -> ReelSet {
        generate_reel_set(&mut self.rng)
    }
}

/// Serves reel sets in a fixed order, repeating the last one once the script runs out.
#[derive(Debug, Clone)]
pub struct ScriptedReels {
    queue: VecDeque<ReelSet>,
    last: ReelSet,
}

impl ScriptedReels {
    pub fn new(first: ReelSet) -> Self {
        Self {
            queue: VecDeque::from([first]),
            last: first,
        }
    }

    pub fn then(mut self, next: ReelSet) -> Self {
        self.queue.push_back(next);
        self
    }
}

impl ReelSource for ScriptedReels {
    fn next_reel_set(&mut self) -> ReelSet {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.last
    }
}
