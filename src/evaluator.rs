use crate::finder::Finder;
use crate::genetic_algorithm::Evaluator;
use colored::Colorize;
use tracing::{info, warn};

pub const DEFAULT_MAX_STAGNATION: u32 = 1500;

/// Stops once the best chromosome reaches the target with a near-minimal length,
/// or once the top fitness has not improved for `max_stagnation` generations.
#[derive(Debug)]
pub struct StagnationEvaluator {
    pub max_stagnation: u32,
    pub length_slack: usize,
    pub verbose: bool,
    best_fitness: f64,
    no_change_count: u32,
}

impl StagnationEvaluator {
    pub fn new(max_stagnation: u32, length_slack: usize) -> Self {
        Self {
            max_stagnation,
            length_slack,
            verbose: false,
            best_fitness: f64::NEG_INFINITY,
            no_change_count: 0,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn no_change_count(&self) -> u32 {
        self.no_change_count
    }

    /// The goal condition alone, without the stagnation guard.
    pub fn is_solved(&self, finder: &Finder) -> bool {
        let top = finder.population().top_item();
        finder.env().reaches_target(top)
            && top.len() <= finder.min_dist() as usize + self.length_slack
    }

    fn print_top(&self, finder: &Finder) {
        let top = finder.population().top_item();
        println!(
            "{} - Best fitness: {:.6}, length: {}, distance: {}",
            format!("Generation {:4}", finder.generation()).bold().red(),
            finder.population().top_fitness(),
            top.len(),
            finder.env().calculate_distance(top),
        );
        print!("{}", finder.env().to_table(Some(top), true));
    }
}

impl Default for StagnationEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STAGNATION, 0)
    }
}

impl Evaluator for StagnationEvaluator {
    fn can_terminate(&mut self, finder: &Finder) -> bool {
        if self.is_solved(finder) {
            return true;
        }

        let top_fitness = finder.population().top_fitness();
        let dist = finder.env().calculate_distance(finder.population().top_item());

        if top_fitness > self.best_fitness {
            self.best_fitness = top_fitness;
            self.no_change_count = 0;
            info!(generation = finder.generation(), distance = dist, "new top fitness");
            if self.verbose {
                self.print_top(finder);
            }
        } else {
            self.no_change_count += 1;
        }

        if top_fitness < self.best_fitness {
            self.best_fitness = top_fitness;
            warn!(generation = finder.generation(), distance = dist, "lost the top score");
            if self.verbose {
                self.print_top(finder);
            }
        }

        self.no_change_count >= self.max_stagnation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::FinderConfig;
    use crate::grid::{Grid, GridEnvironment};
    use crate::point::Point;

    fn config(seed: u64) -> FinderConfig {
        FinderConfig {
            population_size: 10,
            seed,
            ..Default::default()
        }
    }

    fn finder(seed: u64) -> Finder {
        let env =
            GridEnvironment::new(Grid::new(6, 6), Point::new(0, 0), Point::new(5, 5)).unwrap();
        Finder::new(env, config(seed))
    }

    /// The target sits behind a full-height wall, so no chromosome ever arrives.
    fn sealed_finder(seed: u64) -> Finder {
        let mut grid = Grid::new(6, 6);
        for y in 0..6 {
            grid.block(3, y);
        }
        let env = GridEnvironment::new(grid, Point::new(0, 0), Point::new(5, 5)).unwrap();
        Finder::new(env, config(seed))
    }

    #[test]
    fn stagnation_limit_stops_the_run() {
        let finder = sealed_finder(1);
        let mut evaluator = StagnationEvaluator::new(3, 0);
        assert!(!evaluator.is_solved(&finder));
        // the same population never improves on itself
        assert!(!evaluator.can_terminate(&finder));
        assert!(!evaluator.can_terminate(&finder));
        assert!(!evaluator.can_terminate(&finder));
        assert!(evaluator.can_terminate(&finder));
        assert_eq!(evaluator.no_change_count(), 3);
    }

    #[test]
    fn improvement_resets_the_counter() {
        let mut finder = finder(2);
        let mut evaluator = StagnationEvaluator::new(u32::MAX, 0);
        let initial = finder.population().top_fitness();
        evaluator.can_terminate(&finder);
        evaluator.can_terminate(&finder);

        while finder.population().top_fitness() <= initial && finder.generation() < 500 {
            finder.run_generation();
        }

        assert!(finder.population().top_fitness() > initial);
        assert!(!evaluator.is_solved(&finder));
        assert_eq!(evaluator.no_change_count(), 1);
        assert!(!evaluator.can_terminate(&finder));
        assert_eq!(evaluator.no_change_count(), 0);
        assert_eq!(evaluator.best_fitness(), finder.population().top_fitness());
    }

    #[test]
    fn slack_relaxes_the_goal() {
        let finder = finder(3);
        let strict = StagnationEvaluator::new(10, 0);
        let loose = StagnationEvaluator::new(10, usize::MAX / 2);
        let top = finder.population().top_item();
        assert!(finder.env().reaches_target(top));
        assert!(loose.is_solved(&finder));
        assert_eq!(strict.is_solved(&finder), top.len() <= finder.min_dist() as usize);
    }

    #[test]
    fn sealed_target_is_never_solved() {
        let finder = sealed_finder(3);
        let loose = StagnationEvaluator::new(10, usize::MAX / 2);
        assert!(!finder.env().reaches_target(finder.population().top_item()));
        assert!(!loose.is_solved(&finder));
    }
}
