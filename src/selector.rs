use crate::chromosome::Chromosome;
use crate::population::Population;
use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::WeightedAliasIndex;

pub trait Selector<'a> {
    /// Draws `count` parent pairs from the population.
    fn select<R: Rng + ?Sized>(&self, count: usize, rng: &mut R)
        -> Vec<(&'a Chromosome, &'a Chromosome)>;
}

/// Rank-weighted sampling with replacement: the best of `N` chromosomes gets
/// weight `N`, the worst weight 1.
#[derive(Debug)]
pub struct RankingSelector<'a> {
    population: &'a Population,
}

impl<'a> RankingSelector<'a> {
    pub fn new(population: &'a Population) -> Self {
        Self { population }
    }

    fn rank_weights(&self) -> Vec<f64> {
        let n = self.population.len();
        (0..n).map(|i| (n - i) as f64).collect()
    }
}

impl<'a> Selector<'a> for RankingSelector<'a> {
    fn select<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Vec<(&'a Chromosome, &'a Chromosome)> {
        let ranked = self.population.ranked();
        let index = WeightedAliasIndex::new(self.rank_weights())
            .expect("a population is never empty and rank weights are positive");

        let first: Vec<usize> = (0..count).map(|_| index.sample(rng)).collect();
        let second: Vec<usize> = (0..count).map(|_| index.sample(rng)).collect();

        first
            .into_iter()
            .zip(second)
            .map(|(a, b)| (&ranked[a].chromosome, &ranked[b].chromosome))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::random_chromosome;
    use crate::fitness::FitnessKind;
    use crate::grid::{Grid, GridEnvironment};
    use crate::point::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(size: usize, seed: u64) -> Population {
        let env = GridEnvironment::new(Grid::new(6, 6), Point::new(0, 0), Point::new(5, 5))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let items = (0..size).map(|i| random_chromosome(&mut rng, i + 1)).collect();
        Population::new(items, &env, &FitnessKind::RewardLength)
    }

    #[test]
    fn returns_requested_pair_count() {
        let population = population(10, 1);
        let selector = RankingSelector::new(&population);
        let mut rng = StdRng::seed_from_u64(2);
        for count in [0, 1, 9, 40] {
            assert_eq!(selector.select(count, &mut rng).len(), count);
        }
    }

    #[test]
    fn parents_come_from_the_population() {
        let population = population(12, 3);
        let selector = RankingSelector::new(&population);
        let mut rng = StdRng::seed_from_u64(4);
        for (a, b) in selector.select(30, &mut rng) {
            assert!(population.items().any(|c| std::ptr::eq(c, a)));
            assert!(population.items().any(|c| std::ptr::eq(c, b)));
        }
    }

    #[test]
    fn weights_favour_the_top() {
        let population = population(5, 5);
        let selector = RankingSelector::new(&population);
        assert_eq!(selector.rank_weights(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);

        let mut rng = StdRng::seed_from_u64(6);
        let pairs = selector.select(3000, &mut rng);
        let top = population.top_item();
        let last = &population.ranked()[4].chromosome;
        let top_hits = pairs.iter().filter(|(a, _)| std::ptr::eq(*a, top)).count();
        let last_hits = pairs.iter().filter(|(a, _)| std::ptr::eq(*a, last)).count();
        // expected 1000 vs 200
        assert!(top_hits > 2 * last_hits);
    }

    #[test]
    fn reproducible_under_seed() {
        let population = population(8, 7);
        let selector = RankingSelector::new(&population);
        let a = selector.select(16, &mut StdRng::seed_from_u64(9));
        let b = selector.select(16, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn single_member_mates_with_itself() {
        let population = population(1, 8);
        let selector = RankingSelector::new(&population);
        let pairs = selector.select(4, &mut StdRng::seed_from_u64(1));
        assert!(pairs.iter().all(|(a, b)| std::ptr::eq(*a, *b)));
    }
}
