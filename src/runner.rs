use crate::environments::{EnvKind, Size, ENV_KINDS, SIZES};
use crate::error::Result;
use crate::evaluator::{StagnationEvaluator, DEFAULT_MAX_STAGNATION};
use crate::finder::{Finder, FinderConfig};
use crate::genetic_algorithm::Evaluator;
use crate::grid::GridEnvironment;
use crate::reporter::Reporter;
use itertools::iproduct;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

pub const POPULATION_SIZES: [usize; 3] = [20, 40, 60];

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub out: PathBuf,
    pub finder: FinderConfig,
    pub max_stagnation: u32,
    pub length_slack: usize,
    pub show_grids: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            out: PathBuf::from("out"),
            finder: FinderConfig::default(),
            max_stagnation: DEFAULT_MAX_STAGNATION,
            length_slack: 0,
            show_grids: false,
        }
    }
}

/// The configurations swept by one invocation: every environment × size ×
/// population size combination.
#[derive(Clone, Debug)]
pub struct SweepPlan {
    pub envs: Vec<EnvKind>,
    pub sizes: Vec<Size>,
    pub population_sizes: Vec<usize>,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            envs: ENV_KINDS.to_vec(),
            sizes: SIZES.to_vec(),
            population_sizes: POPULATION_SIZES.to_vec(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RunResult {
    pub name: String,
    pub population_size: usize,
    pub seed: u64,
    pub generations: u32,
    pub arrived: bool,
    pub top_length: usize,
    pub top_distance: u32,
    pub min_distance: u32,
    pub top_fitness: f64,
    pub runtime: f64,
}

pub fn run_name(env: EnvKind, size: Size, population_size: usize) -> String {
    format!("{}-{}-{}", env.name(), size.name(), population_size)
}

/// Runs one configuration until it is solved or stagnates, recording every
/// generation.
pub fn run_for_env(name: &str, env: GridEnvironment, config: &RunConfig) -> Result<RunResult> {
    info!(name, "starting execution");
    if !env.is_solvable() {
        warn!(name, "target is unreachable, the run will end by stagnation");
    }

    let mut finder = Finder::new(env, config.finder.clone());
    let mut evaluator = StagnationEvaluator::new(config.max_stagnation, config.length_slack)
        .with_verbose(config.show_grids);
    let mut reporter = Reporter::open(&finder, &config.out, name)?;

    let start = Instant::now();
    loop {
        reporter.report(&finder);
        if evaluator.can_terminate(&finder) {
            break;
        }
        finder.run_generation();
    }
    let runtime = start.elapsed().as_secs_f64();

    reporter.finish(&finder)?;

    let top = finder.population().top_item();
    let result = RunResult {
        name: name.to_string(),
        population_size: config.finder.population_size,
        seed: config.finder.seed,
        generations: finder.generation(),
        arrived: finder.env().reaches_target(top),
        top_length: top.len(),
        top_distance: finder.env().calculate_distance(top),
        min_distance: finder.min_dist(),
        top_fitness: finder.population().top_fitness(),
        runtime,
    };
    info!(
        name,
        generations = result.generations,
        arrived = result.arrived,
        top_length = result.top_length,
        "execution done"
    );
    Ok(result)
}

/// Runs every configuration of the plan in parallel. Each run gets its own seed,
/// derived from the base seed and its position in the plan.
pub fn sweep(plan: &SweepPlan, config: &RunConfig) -> Result<Vec<RunResult>> {
    let runs: Vec<(EnvKind, usize, Size)> = iproduct!(
        plan.envs.iter().copied(),
        plan.population_sizes.iter().copied(),
        plan.sizes.iter().copied()
    )
    .collect();

    runs.into_par_iter()
        .enumerate()
        .map(|(index, (env, population_size, size))| {
            let mut run_config = config.clone();
            run_config.finder.population_size = population_size;
            run_config.finder.seed = config.finder.seed.wrapping_add(index as u64);
            run_for_env(&run_name(env, size, population_size), env.create(size)?, &run_config)
        })
        .collect()
}

/// Appends one row per run to the summary file, writing the header only when the
/// file is new.
pub fn write_summary(results: &[RunResult], path: &Path) -> Result<()> {
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::Reader;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "genetic_path_finder_{tag}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn run_names() {
        assert_eq!(run_name(EnvKind::Wall, Size::Medium, 40), "wall_env-MEDIUM-40");
    }

    #[test]
    fn default_plan_covers_every_combination() {
        let plan = SweepPlan::default();
        assert_eq!(plan.envs.len() * plan.sizes.len() * plan.population_sizes.len(), 54);
    }

    #[test]
    fn short_run_records_every_generation() {
        let out = scratch_dir("runner");
        let config = RunConfig {
            out: out.clone(),
            max_stagnation: 5,
            finder: FinderConfig {
                population_size: 10,
                seed: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = run_for_env("peek", EnvKind::Peekhole.create(Size::Small).unwrap(), &config).unwrap();
        let stats = Reader::new(out.join("peek")).read().unwrap();
        assert_eq!(stats.len() as u32, result.generations + 1);
        assert_eq!(result.min_distance, 18);
        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn sweep_and_summary() {
        let out = scratch_dir("sweep");
        let config = RunConfig {
            out: out.clone(),
            max_stagnation: 3,
            ..Default::default()
        };
        let plan = SweepPlan {
            envs: vec![EnvKind::Empty, EnvKind::Wall],
            sizes: vec![Size::Small],
            population_sizes: vec![10],
        };
        let results = sweep(&plan, &config).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "empty_env-SMALL-10");
        assert_eq!(results[1].name, "wall_env-SMALL-10");
        assert_ne!(results[0].seed, results[1].seed);

        let summary = out.join("summary.csv");
        write_summary(&results, &summary).unwrap();
        write_summary(&results, &summary).unwrap();
        let text = fs::read_to_string(&summary).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert_eq!(text.matches("population_size").count(), 1);
        fs::remove_dir_all(&out).unwrap();
    }
}
