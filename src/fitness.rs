use crate::direction::Direction;
use crate::genetic_algorithm::Fitness;
use crate::grid::GridEnvironment;
use clap::ValueEnum;

/// Upper bound of the exploration bonus long chromosomes earn before arriving.
/// Kept below 1 so it never outweighs a one-cell distance improvement.
pub const REWARD_LENGTH_CAP: f64 = 0.9999;
pub const DISTANCE_GROUPS_CAP: f64 = 0.2;
pub const DISTANCE_BANDS: f64 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum FitnessKind {
    /// Always penalises length, even before reaching the target.
    Naive,
    /// Ignores length until the target is reached, then rewards shortness.
    ArrivalLength,
    /// Rewards exploration before arriving and shortness after.
    #[default]
    RewardLength,
    /// Like `reward-length`, with distance coarsened into bands.
    RewardLengthDistanceGroups,
}

impl FitnessKind {
    pub fn name(&self) -> &'static str {
        match self {
            FitnessKind::Naive => "naive",
            FitnessKind::ArrivalLength => "arrival_length",
            FitnessKind::RewardLength => "reward_length",
            FitnessKind::RewardLengthDistanceGroups => "reward_length_distance_groups",
        }
    }
}

impl Fitness for FitnessKind {
    fn evaluate(&self, env: &GridEnvironment, chromosome: &[Direction]) -> f64 {
        let area = env.area() as f64;
        let length = chromosome.len() as f64 / area;
        let dist = env.calculate_distance(chromosome);

        match self {
            FitnessKind::Naive => area - dist as f64 - length,
            FitnessKind::ArrivalLength => {
                if dist != 0 {
                    area - dist as f64
                } else {
                    area - length
                }
            }
            FitnessKind::RewardLength => {
                if dist != 0 {
                    area - dist as f64 + length.min(REWARD_LENGTH_CAP)
                } else {
                    // the extra 1 makes any arrival beat the exploration bonus
                    area + 1.0 - length
                }
            }
            FitnessKind::RewardLengthDistanceGroups => {
                if dist != 0 {
                    let band = env.width() as f64 / DISTANCE_BANDS;
                    let group = (dist as f64 / band).ceil();
                    area - group + length.min(DISTANCE_GROUPS_CAP)
                } else {
                    area + 1.0 - length
                }
            }
        }
    }
}
