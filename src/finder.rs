use crate::chromosome::{random_chromosome, Chromosome};
use crate::fitness::FitnessKind;
use crate::genetic_algorithm::Fitness;
use crate::grid::GridEnvironment;
use crate::operators::{OperationSequence, OperatorRates};
use crate::population::Population;
use crate::selector::{RankingSelector, Selector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

pub const DEFAULT_ELITISM_FACTOR: f64 = 0.05;

#[derive(Clone, Debug)]
pub struct FinderConfig {
    pub population_size: usize,
    pub elitism_factor: f64,
    pub rates: OperatorRates,
    pub fitness: FitnessKind,
    pub seed: u64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            elitism_factor: DEFAULT_ELITISM_FACTOR,
            rates: OperatorRates::default(),
            fitness: FitnessKind::RewardLength,
            seed: 0,
        }
    }
}

/// Runs the genetic search on one environment, one generation at a time.
#[derive(Debug)]
pub struct Finder {
    env: GridEnvironment,
    config: FinderConfig,
    min_dist: u32,
    operations: OperationSequence,
    fitness: Box<dyn Fitness>,
    population: Population,
    generation: u32,
    rng: StdRng,
}

impl Finder {
    pub fn new(env: GridEnvironment, config: FinderConfig) -> Self {
        let fitness = Box::new(config.fitness);
        Self::with_fitness(env, config, fitness)
    }

    /// Builds a finder scored by a custom fitness function instead of
    /// `config.fitness`.
    pub fn with_fitness(
        env: GridEnvironment,
        config: FinderConfig,
        fitness: Box<dyn Fitness>,
    ) -> Self {
        assert!(config.population_size > 0, "population size must be positive");

        let mut rng = StdRng::seed_from_u64(config.seed);
        let min_dist = env.min_distance();
        let operations = OperationSequence::new(min_dist, &config.rates);

        // half taut, half slack: twice the target size on the first generation
        let short = min_dist as usize;
        let mut initial: Vec<Chromosome> = (0..config.population_size)
            .map(|_| random_chromosome(&mut rng, short))
            .collect();
        initial.extend(
            (0..config.population_size).map(|_| random_chromosome(&mut rng, short * 2)),
        );
        let population = Population::new(initial, &env, fitness.as_ref());

        Self {
            env,
            config,
            min_dist,
            operations,
            fitness,
            population,
            generation: 0,
            rng,
        }
    }

    pub fn env(&self) -> &GridEnvironment {
        &self.env
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn min_dist(&self) -> u32 {
        self.min_dist
    }

    pub fn operations(&self) -> &OperationSequence {
        &self.operations
    }

    /// Copies of the top chromosome carried over unchanged. Always at least one.
    pub fn elite_count(&self) -> usize {
        let size = self.config.population_size;
        let elites = (size as f64 * self.config.elitism_factor).ceil() as usize;
        elites.clamp(1, size)
    }

    /// Breeds the next generation and replaces the population with it.
    pub fn run_generation(&mut self) {
        let elite_count = self.elite_count();
        let mut items: Vec<Chromosome> = Vec::with_capacity(self.config.population_size);
        items.extend((0..elite_count).map(|_| self.population.top_item().clone()));

        let remaining = self.config.population_size - elite_count;
        let selector = RankingSelector::new(&self.population);
        for (parent_1, parent_2) in selector.select(remaining, &mut self.rng) {
            items.push(self.operations.breed(parent_1, parent_2, &mut self.rng));
        }

        self.population = Population::new(items, &self.env, self.fitness.as_ref());
        self.generation += 1;

        debug!(
            generation = self.generation,
            top_fitness = self.population.top_fitness(),
            top_length = self.population.top_item().len(),
            "generation complete"
        );
    }
}
