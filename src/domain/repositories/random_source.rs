//! Random source collaborator (C6). Pure trait so the shuffler and any
//! skill-card randomness can be seeded deterministically in tests,
//! mirroring the teacher's `PartyRepository`-behind-a-trait pattern.

use crate::domain::value_objects::Card;

pub trait RandomSource: Send + Sync {
    /// Uniform-random in-place permutation.
    fn shuffle(&mut self, cards: &mut Vec<Card>);

    /// Uniform-random index in `0..len`. Used by tie-break helpers that
    /// need a random pick without pulling in `rand` directly.
    fn gen_range(&mut self, len: usize) -> usize;
}
