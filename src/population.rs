use crate::chromosome::Chromosome;
use crate::genetic_algorithm::Fitness;
use crate::grid::GridEnvironment;
use rayon::prelude::*;
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq)]
pub struct RankedItem {
    pub fitness: f64,
    pub chromosome: Chromosome,
}

/// The chromosomes of one generation, ranked by fitness from best to worst.
/// A population is never modified; every generation builds a new one.
#[derive(Clone, Debug)]
pub struct Population {
    ranked: Vec<RankedItem>,
    median_index: usize,
}

impl Population {
    /// Scores every chromosome and ranks them. Panics when `items` is empty.
    pub fn new(items: Vec<Chromosome>, env: &GridEnvironment, fitness: &dyn Fitness) -> Self {
        assert!(!items.is_empty(), "a population needs at least one chromosome");

        // scoring is pure, so the parallel map gives the same order as a sequential one
        let mut ranked: Vec<RankedItem> = items
            .into_par_iter()
            .map(|chromosome| RankedItem {
                fitness: fitness.evaluate(env, &chromosome),
                chromosome,
            })
            .collect();

        ranked.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));

        let median_index = ranked.len() / 2;
        Self {
            ranked,
            median_index,
        }
    }

    pub fn ranked(&self) -> &[RankedItem] {
        &self.ranked
    }

    pub fn items(&self) -> impl Iterator<Item = &Chromosome> + '_ {
        self.ranked.iter().map(|item| &item.chromosome)
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn top_item(&self) -> &Chromosome {
        &self.ranked[0].chromosome
    }

    pub fn top_fitness(&self) -> f64 {
        self.ranked[0].fitness
    }

    pub fn median_item(&self) -> &Chromosome {
        &self.ranked[self.median_index].chromosome
    }

    pub fn median_fitness(&self) -> f64 {
        self.ranked[self.median_index].fitness
    }

    pub fn median_index(&self) -> usize {
        self.median_index
    }
}
