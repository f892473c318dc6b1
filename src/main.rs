use chrono::Local;
use clap::{Args, Parser, Subcommand};
use genetic_path_finder::environments::{EnvKind, Size, ENV_KINDS, SIZES};
use genetic_path_finder::evaluator::DEFAULT_MAX_STAGNATION;
use genetic_path_finder::finder::FinderConfig;
use genetic_path_finder::fitness::FitnessKind;
use genetic_path_finder::logging::init_logging;
use genetic_path_finder::runner::{sweep, write_summary, RunConfig, SweepPlan, POPULATION_SIZES};
use genetic_path_finder::visualization::GraphCreator;
use genetic_path_finder::Result;
use itertools::iproduct;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "path_finder", about = "Find grid paths with a genetic algorithm")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the search for every environment × population size × grid size,
    /// or only the ones selected
    Run(RunArgs),
    /// Draw charts from the reports of previous runs
    Graphs(GraphsArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Only run this environment
    #[arg(long, value_enum)]
    env: Option<EnvKind>,

    /// Only run this population size
    #[arg(long)]
    pop_size: Option<usize>,

    /// Only run this grid size
    #[arg(long, value_enum)]
    size: Option<Size>,

    #[arg(long, value_enum, default_value_t = FitnessKind::RewardLength)]
    fitness: FitnessKind,

    /// Base seed; each configuration derives its own from it
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Generations without improvement before a run gives up
    #[arg(long, default_value_t = DEFAULT_MAX_STAGNATION)]
    max_stagnation: u32,

    /// Extra moves over the start-to-target distance still accepted as solved
    #[arg(long, default_value_t = 0)]
    length_slack: usize,

    /// Print the grid with the best path whenever the top fitness changes
    #[arg(long)]
    show_grids: bool,
}

#[derive(Debug, Args)]
struct GraphsArgs {
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

fn run(args: RunArgs) -> Result<()> {
    let plan = SweepPlan {
        envs: args.env.map_or_else(|| ENV_KINDS.to_vec(), |env| vec![env]),
        sizes: args.size.map_or_else(|| SIZES.to_vec(), |size| vec![size]),
        population_sizes: args
            .pop_size
            .map_or_else(|| POPULATION_SIZES.to_vec(), |size| vec![size]),
    };
    let config = RunConfig {
        out: args.out,
        finder: FinderConfig {
            fitness: args.fitness,
            seed: args.seed,
            ..Default::default()
        },
        max_stagnation: args.max_stagnation,
        length_slack: args.length_slack,
        show_grids: args.show_grids,
    };

    let results = sweep(&plan, &config)?;

    let date_str = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let summary = config.out.join(format!("run_results_{}.csv", date_str));
    write_summary(&results, &summary)?;

    let solved = results.iter().filter(|r| r.arrived).count();
    info!(
        runs = results.len(),
        solved,
        summary = %summary.display(),
        "sweep finished"
    );
    Ok(())
}

fn graphs(args: GraphsArgs) -> Result<()> {
    for (env, size) in iproduct!(ENV_KINDS, SIZES) {
        let written = GraphCreator::new(&args.out, env, size)?.create_graphs(&POPULATION_SIZES)?;
        if !written.is_empty() {
            info!(env = env.name(), size = size.name(), charts = written.len(), "done");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();

    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::Graphs(args) => graphs(args),
    }
}
