use crate::chromosome::Chromosome;
use crate::direction::Direction;
use crate::finder::Finder;
use crate::grid::GridEnvironment;
use rand::Rng;
use std::fmt::Debug;

// This trait represents an operator which only takes effect with a given
// probability, decided by a fresh Bernoulli trial on every invocation
pub trait ProbabilityOperator {
    fn probability(&self) -> f64;

    fn test_probability<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.probability()
    }
}

// This trait represents the mixing of two parents into two children
pub trait Cross: ProbabilityOperator + Debug {
    fn cross<R: Rng + ?Sized>(
        &self,
        parent_1: &[Direction],
        parent_2: &[Direction],
        rng: &mut R,
    ) -> (Chromosome, Chromosome);
}

// This trait represents picking the single offspring of a mating
pub trait Choose: Debug {
    fn choose<R: Rng + ?Sized>(&self, child_1: Chromosome, child_2: Chromosome, rng: &mut R)
        -> Chromosome;
}

// This trait represents a mutation applied to a single offspring
pub trait Mutation: ProbabilityOperator + Debug {
    fn mutate<R: Rng + ?Sized>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome;
}

// This trait represents the score used to rank chromosomes; higher is better
pub trait Fitness: Send + Sync + Debug {
    fn evaluate(&self, env: &GridEnvironment, chromosome: &[Direction]) -> f64;
}

// This trait represents the stopping condition of the search
pub trait Evaluator: Debug {
    fn can_terminate(&mut self, finder: &Finder) -> bool;
}
