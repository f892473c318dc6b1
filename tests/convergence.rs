use genetic_path_finder::environments::{
    empty_env, peekhole_env, wall_env, DEFAULT_SPACE_PERCENTAGE,
};
use genetic_path_finder::{Finder, FinderConfig, FitnessKind, GridEnvironment};

fn finder(env: GridEnvironment, population_size: usize, seed: u64) -> Finder {
    Finder::new(
        env,
        FinderConfig {
            population_size,
            fitness: FitnessKind::RewardLength,
            seed,
            ..Default::default()
        },
    )
}

fn solved_within(finder: &Finder, max_length: usize) -> bool {
    let top = finder.population().top_item();
    finder.env().reaches_target(top) && top.len() <= max_length
}

/// Runs until the top chromosome arrives with at most `max_length` moves.
fn run_until_solved(finder: &mut Finder, max_length: usize, max_generations: u32) {
    while !solved_within(finder, max_length) && finder.generation() < max_generations {
        finder.run_generation();
    }
}

#[test]
fn empty_grid_converges_to_a_short_path() {
    let env = empty_env(10).unwrap();
    assert_eq!(env.min_distance(), 18);

    let mut finder = finder(env, 20, 2024);
    run_until_solved(&mut finder, 20, 1500);

    let top = finder.population().top_item();
    assert!(
        solved_within(&finder, 20),
        "no short path after {} generations: length {}, distance {}",
        finder.generation(),
        top.len(),
        finder.env().calculate_distance(top)
    );
    assert!(top.len() >= 18);
}

#[test]
fn convergence_is_reproducible() {
    let mut a = finder(empty_env(10).unwrap(), 20, 2024);
    let mut b = finder(empty_env(10).unwrap(), 20, 2024);
    run_until_solved(&mut a, 20, 1500);
    run_until_solved(&mut b, 20, 1500);

    assert_eq!(a.generation(), b.generation());
    assert_eq!(a.population().top_item(), b.population().top_item());
    assert_eq!(a.population().top_fitness(), b.population().top_fitness());
}

#[test]
fn finds_the_gap_in_a_blocked_row() {
    let mut finder = finder(peekhole_env(10).unwrap(), 40, 7);
    let mut best = finder.population().top_fitness();

    while !finder.env().reaches_target(finder.population().top_item())
        && finder.generation() < 3000
    {
        finder.run_generation();
        let top_fitness = finder.population().top_fitness();
        assert!(top_fitness >= best, "top fitness dropped at {}", finder.generation());
        best = top_fitness;
    }

    assert!(finder.env().reaches_target(finder.population().top_item()));
}

#[test]
fn elitism_keeps_top_fitness_behind_a_wall() {
    let env = wall_env(10, DEFAULT_SPACE_PERCENTAGE).unwrap();
    assert!(env.is_solvable());

    let mut finder = finder(env, 20, 11);
    let mut history = vec![finder.population().top_fitness()];
    for _ in 0..400 {
        finder.run_generation();
        history.push(finder.population().top_fitness());
    }

    assert!(history.windows(2).all(|w| w[1] >= w[0]));
}
