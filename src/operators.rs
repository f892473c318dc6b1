use crate::chromosome::Chromosome;
use crate::direction::{random_direction, Direction};
use crate::genetic_algorithm::{Choose, Cross, Mutation, ProbabilityOperator};
use rand::Rng;

/// Base rates for the genetic operators. Mutation rates are scaled down by the
/// start-to-target distance when the operator sequence is built, so the expected
/// number of mutations per chromosome stays roughly constant across grid sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatorRates {
    pub cross: f64,
    pub switch: f64,
    pub add: f64,
    pub remove: f64,
    pub remove_pair: f64,
}

impl Default for OperatorRates {
    fn default() -> Self {
        Self {
            // elitism already keeps the best, so always cross
            cross: 1.0,
            switch: 0.1,
            add: 0.05,
            remove: 0.05,
            remove_pair: 0.05,
        }
    }
}

fn scaled_probability(base: f64, divisor: u32) -> f64 {
    (base / divisor.max(1) as f64).clamp(0.0, 1.0)
}

#[derive(Clone, Debug)]
pub struct PathFinderCross {
    probability: f64,
}

impl PathFinderCross {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Swaps the tails of both parents at the given cut points.
    pub fn cross_at(
        parent_1: &[Direction],
        parent_2: &[Direction],
        cut_1: usize,
        cut_2: usize,
    ) -> (Chromosome, Chromosome) {
        let mut child_1 = Vec::with_capacity(cut_1 + parent_2.len() - cut_2);
        let mut child_2 = Vec::with_capacity(cut_2 + parent_1.len() - cut_1);

        child_1.extend_from_slice(&parent_1[..cut_1]);
        child_1.extend_from_slice(&parent_2[cut_2..]);
        child_2.extend_from_slice(&parent_2[..cut_2]);
        child_2.extend_from_slice(&parent_1[cut_1..]);

        (child_1, child_2)
    }
}

impl Default for PathFinderCross {
    fn default() -> Self {
        Self::new(OperatorRates::default().cross)
    }
}

impl ProbabilityOperator for PathFinderCross {
    fn probability(&self) -> f64 {
        self.probability
    }
}

impl Cross for PathFinderCross {
    fn cross<R: Rng + ?Sized>(
        &self,
        parent_1: &[Direction],
        parent_2: &[Direction],
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        if !self.test_probability(rng) {
            return (parent_1.to_vec(), parent_2.to_vec());
        }

        // both ends inclusive: taking nothing or everything are valid cuts
        let cut_1 = rng.gen_range(0..=parent_1.len());
        let cut_2 = rng.gen_range(0..=parent_2.len());
        Self::cross_at(parent_1, parent_2, cut_1, cut_2)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PathFinderChoose;

impl Choose for PathFinderChoose {
    fn choose<R: Rng + ?Sized>(
        &self,
        child_1: Chromosome,
        child_2: Chromosome,
        rng: &mut R,
    ) -> Chromosome {
        if rng.gen_bool(0.5) {
            child_1
        } else {
            child_2
        }
    }
}

/// Replaces each gene with a random direction.
#[derive(Clone, Debug)]
pub struct SwitchMutation {
    probability: f64,
}

impl SwitchMutation {
    pub fn new(min_dist: u32, base: f64) -> Self {
        Self {
            probability: scaled_probability(base, min_dist),
        }
    }
}

impl ProbabilityOperator for SwitchMutation {
    fn probability(&self) -> f64 {
        self.probability
    }
}

impl Mutation for SwitchMutation {
    fn mutate<R: Rng + ?Sized>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome {
        chromosome
            .into_iter()
            .map(|gene| {
                if self.test_probability(rng) {
                    random_direction(rng)
                } else {
                    gene
                }
            })
            .collect()
    }
}

/// Inserts random directions into the gaps around and between genes.
#[derive(Clone, Debug)]
pub struct AddMutation {
    probability: f64,
}

impl AddMutation {
    pub fn new(min_dist: u32, base: f64) -> Self {
        Self {
            probability: scaled_probability(base, min_dist),
        }
    }

    fn maybe_push<R: Rng + ?Sized>(&self, chromosome: &mut Chromosome, rng: &mut R) {
        if self.test_probability(rng) {
            chromosome.push(random_direction(rng));
        }
    }
}

impl ProbabilityOperator for AddMutation {
    fn probability(&self) -> f64 {
        self.probability
    }
}

impl Mutation for AddMutation {
    fn mutate<R: Rng + ?Sized>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome {
        let mut mutated = Vec::with_capacity(chromosome.len() + 2);
        self.maybe_push(&mut mutated, rng);
        for gene in chromosome {
            mutated.push(gene);
            self.maybe_push(&mut mutated, rng);
        }
        mutated
    }
}

#[derive(Clone, Debug)]
pub struct RemoveMutation {
    probability: f64,
}

impl RemoveMutation {
    pub fn new(min_dist: u32, base: f64) -> Self {
        Self {
            probability: scaled_probability(base, min_dist),
        }
    }
}

impl ProbabilityOperator for RemoveMutation {
    fn probability(&self) -> f64 {
        self.probability
    }
}

impl Mutation for RemoveMutation {
    fn mutate<R: Rng + ?Sized>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome {
        chromosome
            .into_iter()
            .filter(|_| !self.test_probability(rng))
            .collect()
    }
}

/// Drops consecutive pairs of genes. A trailing odd gene forms its own group.
#[derive(Clone, Debug)]
pub struct RemovePairMutation {
    probability: f64,
}

impl RemovePairMutation {
    pub fn new(min_dist: u32, base: f64) -> Self {
        Self {
            probability: scaled_probability(base, min_dist / 2),
        }
    }
}

impl ProbabilityOperator for RemovePairMutation {
    fn probability(&self) -> f64 {
        self.probability
    }
}

impl Mutation for RemovePairMutation {
    fn mutate<R: Rng + ?Sized>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome {
        chromosome
            .chunks(2)
            .filter(|_| !self.test_probability(rng))
            .flatten()
            .copied()
            .collect()
    }
}

#[derive(Clone, Debug)]
pub enum MutationStage {
    Switch(SwitchMutation),
    Add(AddMutation),
    Remove(RemoveMutation),
    RemovePair(RemovePairMutation),
}

impl MutationStage {
    pub fn apply<R: Rng + ?Sized>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome {
        match self {
            MutationStage::Switch(m) => m.mutate(chromosome, rng),
            MutationStage::Add(m) => m.mutate(chromosome, rng),
            MutationStage::Remove(m) => m.mutate(chromosome, rng),
            MutationStage::RemovePair(m) => m.mutate(chromosome, rng),
        }
    }

    pub fn probability(&self) -> f64 {
        match self {
            MutationStage::Switch(m) => m.probability(),
            MutationStage::Add(m) => m.probability(),
            MutationStage::Remove(m) => m.probability(),
            MutationStage::RemovePair(m) => m.probability(),
        }
    }
}

/// The fixed breeding pipeline: cross, choose, then every mutation stage in order.
#[derive(Clone, Debug)]
pub struct OperationSequence {
    pub cross: PathFinderCross,
    pub choose: PathFinderChoose,
    pub mutations: Vec<MutationStage>,
}

impl OperationSequence {
    pub fn new(min_dist: u32, rates: &OperatorRates) -> Self {
        Self {
            cross: PathFinderCross::new(rates.cross),
            choose: PathFinderChoose,
            mutations: vec![
                MutationStage::Switch(SwitchMutation::new(min_dist, rates.switch)),
                MutationStage::Add(AddMutation::new(min_dist, rates.add)),
                MutationStage::Remove(RemoveMutation::new(min_dist, rates.remove)),
                MutationStage::RemovePair(RemovePairMutation::new(min_dist, rates.remove_pair)),
            ],
        }
    }

    pub fn breed<R: Rng + ?Sized>(
        &self,
        parent_1: &[Direction],
        parent_2: &[Direction],
        rng: &mut R,
    ) -> Chromosome {
        let (child_1, child_2) = self.cross.cross(parent_1, parent_2, rng);
        let mut chromosome = self.choose.choose(child_1, child_2, rng);
        for mutation in &self.mutations {
            chromosome = mutation.apply(chromosome, rng);
        }
        chromosome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::random_chromosome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use Direction::*;

    #[test]
    fn cross_at_boundaries_swaps_parents() {
        let p1 = vec![Up, Up, Up];
        let p2 = vec![Left, Right];
        let (c1, c2) = PathFinderCross::cross_at(&p1, &p2, 0, p2.len());
        assert_eq!(c1, Vec::<Direction>::new());
        assert_eq!(c2, [p2.clone(), p1.clone()].concat());

        let (c1, c2) = PathFinderCross::cross_at(&p1, &p2, 0, 0);
        assert_eq!(c1, p2);
        assert_eq!(c2, p1);
    }

    #[test]
    fn cross_at_swaps_tails() {
        let p1 = vec![Up, Up, Up, Up];
        let p2 = vec![Down, Down];
        let (c1, c2) = PathFinderCross::cross_at(&p1, &p2, 3, 1);
        assert_eq!(c1, vec![Up, Up, Up, Down]);
        assert_eq!(c2, vec![Down, Up]);
    }

    #[test]
    fn cross_preserves_total_genes() {
        let mut rng = StdRng::seed_from_u64(11);
        let cross = PathFinderCross::default();
        for _ in 0..50 {
            let p1 = random_chromosome(&mut rng, 12);
            let p2 = random_chromosome(&mut rng, 7);
            let (c1, c2) = cross.cross(&p1, &p2, &mut rng);
            assert_eq!(c1.len() + c2.len(), 19);
        }
    }

    #[test]
    fn failed_cross_trial_returns_parents() {
        let mut rng = StdRng::seed_from_u64(5);
        let cross = PathFinderCross::new(0.0);
        let p1 = vec![Up, Right];
        let p2 = vec![Down];
        assert_eq!(cross.cross(&p1, &p2, &mut rng), (p1, p2));
    }

    #[test]
    fn choose_returns_one_of_the_children() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = vec![Up];
        let b = vec![Down, Down];
        let mut picked_a = false;
        let mut picked_b = false;
        for _ in 0..64 {
            let chosen = PathFinderChoose.choose(a.clone(), b.clone(), &mut rng);
            picked_a |= chosen == a;
            picked_b |= chosen == b;
            assert!(chosen == a || chosen == b);
        }
        assert!(picked_a && picked_b);
    }

    #[test]
    fn mutation_rates_scale_with_distance() {
        assert!((SwitchMutation::new(10, 0.1).probability() - 0.01).abs() < 1e-12);
        assert!((AddMutation::new(10, 0.05).probability() - 0.005).abs() < 1e-12);
        assert!((RemoveMutation::new(10, 0.05).probability() - 0.005).abs() < 1e-12);
        assert!((RemovePairMutation::new(10, 0.05).probability() - 0.01).abs() < 1e-12);
        // degenerate distances do not divide by zero
        assert_eq!(RemovePairMutation::new(1, 0.05).probability(), 0.05);
        assert_eq!(SwitchMutation::new(0, 0.1).probability(), 0.1);
    }

    #[test]
    fn certain_mutations() {
        let mut rng = StdRng::seed_from_u64(8);
        let chrom = random_chromosome(&mut rng, 9);

        let added = AddMutation::new(1, 1.0).mutate(chrom.clone(), &mut rng);
        assert_eq!(added.len(), 2 * chrom.len() + 1);
        // originals sit at the odd positions
        let originals: Vec<Direction> = added.iter().skip(1).step_by(2).copied().collect();
        assert_eq!(originals, chrom);

        assert!(RemoveMutation::new(1, 1.0).mutate(chrom.clone(), &mut rng).is_empty());
        assert!(RemovePairMutation::new(1, 1.0)
            .mutate(chrom.clone(), &mut rng)
            .is_empty());
        assert_eq!(SwitchMutation::new(1, 1.0).mutate(chrom.clone(), &mut rng).len(), 9);
    }

    #[test]
    fn zero_rate_mutations_are_identity() {
        let mut rng = StdRng::seed_from_u64(4);
        let chrom = random_chromosome(&mut rng, 15);
        let rates = OperatorRates {
            cross: 0.0,
            switch: 0.0,
            add: 0.0,
            remove: 0.0,
            remove_pair: 0.0,
        };
        let seq = OperationSequence::new(15, &rates);
        for stage in &seq.mutations {
            assert_eq!(stage.apply(chrom.clone(), &mut rng), chrom);
        }
        // no crossing: the offspring is one of the parents untouched
        let other = random_chromosome(&mut rng, 4);
        let child = seq.breed(&chrom, &other, &mut rng);
        assert!(child == chrom || child == other);
    }

    #[test]
    fn remove_pair_keeps_pairs_aligned() {
        let mut rng = StdRng::seed_from_u64(21);
        let chrom = vec![Up, Up, Down, Down, Left, Left, Right];
        let mutation = RemovePairMutation::new(2, 0.5);
        for _ in 0..32 {
            let mutated = mutation.mutate(chrom.clone(), &mut rng);
            for pair in mutated.chunks(2) {
                if pair.len() == 2 {
                    assert_eq!(pair[0], pair[1]);
                }
            }
        }
    }

    #[test]
    fn pipeline_order() {
        let seq = OperationSequence::new(10, &OperatorRates::default());
        let kinds: Vec<&str> = seq
            .mutations
            .iter()
            .map(|m| match m {
                MutationStage::Switch(_) => "switch",
                MutationStage::Add(_) => "add",
                MutationStage::Remove(_) => "remove",
                MutationStage::RemovePair(_) => "remove_pair",
            })
            .collect();
        assert_eq!(kinds, ["switch", "add", "remove", "remove_pair"]);
    }
}
