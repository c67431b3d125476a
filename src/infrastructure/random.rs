//! Concrete `RandomSource` (C6 collaborator) backed by `ChaCha8Rng`, matching
//! the teacher's `ChaCha8Rng::seed_from_u64` convention in the old game
//! service. Seedable for deterministic tests, entropy-seeded in production.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::repositories::RandomSource;
use crate::domain::value_objects::Card;

pub struct SeededRandomSource {
    rng: ChaCha8Rng,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }
}

impl RandomSource for SeededRandomSource {
    fn shuffle(&mut self, cards: &mut Vec<Card>) {
        cards.shuffle(&mut self.rng);
    }

    fn gen_range(&mut self, len: usize) -> usize {
        use rand::Rng;
        self.rng.gen_range(0..len)
    }
}
