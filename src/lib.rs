//! Evolutionary path finding on an occupancy grid.
//!
//! A [`Finder`] evolves move sequences (chromosomes) from a start cell towards a
//! target cell, ranking them with a [`Fitness`] function, breeding them through
//! crossover and mutation, and keeping the best one alive each generation.

pub mod chromosome;
pub mod direction;
pub mod environments;
pub mod error;
pub mod evaluator;
pub mod finder;
pub mod fitness;
pub mod genetic_algorithm;
pub mod grid;
pub mod logging;
pub mod operators;
pub mod point;
pub mod population;
pub mod reporter;
pub mod runner;
pub mod selector;
pub mod visualization;

pub use chromosome::Chromosome;
pub use direction::Direction;
pub use error::{Error, InvalidPointError, Result};
pub use finder::{Finder, FinderConfig};
pub use fitness::FitnessKind;
pub use genetic_algorithm::{Evaluator, Fitness};
pub use grid::{Grid, GridEnvironment};
pub use point::{distance, Point};
pub use population::Population;
