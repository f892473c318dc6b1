use crate::direction::Direction;
use rand::Rng;

// A chromosome is a candidate route: the moves taken from the start cell, in order.
pub type Chromosome = Vec<Direction>;

pub fn random_chromosome<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Chromosome {
    (0..length).map(|_| rng.gen()).collect()
}

/// Compact letter form, e.g. `UURRD`.
pub fn to_letters(chromosome: &[Direction]) -> String {
    chromosome.iter().map(|d| d.letter()).collect()
}
