//! Generic genetic algorithm runner.
//!
//! Domain-agnostic generational GA: the problem supplies individual
//! creation, evaluation, crossover and mutation through [`GaProblem`]; the
//! runner owns population management, tournament selection, elitism and
//! termination.
//!
//! # Algorithm
//!
//! 1. Create and evaluate `population_size` individuals.
//! 2. Per generation: tournament-select parents, apply crossover with
//!    probability `crossover_rate` to consecutive pairs, mutate each child
//!    with probability `mutation_rate`, evaluate, keep `elite_count` best
//!    individuals of the previous generation.
//! 3. Track the best individual ever seen; stop after `max_generations`
//!    or as soon as `target_fitness` is reached.
//!
//! # Determinism
//!
//! All randomness comes from one RNG seeded from `GaConfig::seed`.
//! Evaluation is the only parallel step and must be a pure function, so a
//! fixed seed gives the same result with or without `parallel`. Ties are
//! broken by lowest fitness, then lowest population index, then earliest
//! generation.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization, and
//! Machine Learning"; Bäck et al. (2000), "Evolutionary Computation 1"

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

/// An individual with a cached fitness (lower = better).
pub trait Individual: Clone + Send + Sync {
    /// Cached fitness; `f64::INFINITY` when not evaluated.
    fn fitness(&self) -> f64;

    /// Stores an evaluated fitness.
    fn set_fitness(&mut self, fitness: f64);
}

/// Problem definition consumed by [`GaRunner`].
pub trait GaProblem: Send + Sync {
    /// Encoded candidate solution.
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Fitness of an individual (lower = better). Must be pure.
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Produces children from two parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> Vec<Self::Individual>;

    /// Mutates an individual in place.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);
}

/// GA parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generation limit.
    pub max_generations: usize,
    /// Probability that a parent pair is recombined.
    pub crossover_rate: f64,
    /// Probability that a child is mutated.
    pub mutation_rate: f64,
    /// Contestants per tournament.
    pub tournament_size: usize,
    /// Best individuals copied unchanged into the next generation.
    pub elite_count: usize,
    /// Stop once the best fitness is at or below this value.
    pub target_fitness: Option<f64>,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Evaluate the population on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 50,
            crossover_rate: 0.5,
            mutation_rate: 0.2,
            tournament_size: 3,
            elite_count: 1,
            target_fitness: None,
            seed: None,
            parallel: true,
        }
    }
}

impl GaConfig {
    /// Parameters of the classic `eaSimple` setup: default sizes and rates,
    /// seed 64, no elitism.
    pub fn classic() -> Self {
        Self {
            elite_count: 0,
            seed: Some(64),
            ..Self::default()
        }
    }

    /// Sets the population size (at least 2).
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    /// Sets the generation limit.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover probability (clamped to `[0, 1]`, NaN becomes 0).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = probability(rate);
        self
    }

    /// Sets the mutation probability (clamped to `[0, 1]`, NaN becomes 0).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = probability(rate);
        self
    }

    /// Sets the tournament size (at least 1).
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the early-stop fitness.
    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks that both rates are probabilities.
    ///
    /// The public fields bypass the clamping builders, so a deserialized or
    /// hand-built config may carry any value.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first rate outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// Clamps a rate to `[0, 1]`; NaN becomes 0.
fn probability(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

/// Fitness statistics of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,
    /// Best fitness in the population.
    pub min: f64,
    /// Worst fitness in the population.
    pub max: f64,
    /// Mean fitness.
    pub avg: f64,
}

impl GenerationStats {
    fn of<I: Individual>(generation: usize, population: &[I]) -> Self {
        let n = population.len().max(1) as f64;
        let (min, max, sum) = population.iter().map(Individual::fitness).fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), f| (min.min(f), max.max(f), sum + f),
        );
        Self {
            generation,
            min,
            max,
            avg: sum / n,
        }
    }
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    /// Best individual ever seen.
    pub best: I,
    /// Its fitness.
    pub best_fitness: f64,
    /// Generations completed (excluding the initial population).
    pub generations: usize,
    /// Total fitness evaluations.
    pub evaluations: usize,
    /// Per-generation statistics, starting with the initial population.
    pub history: Vec<GenerationStats>,
}

/// Runs a [`GaProblem`] to completion.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let pop_size = config.population_size.max(2);
        let crossover_rate = probability(config.crossover_rate);
        let mutation_rate = probability(config.mutation_rate);

        info!(
            event = "ga_start",
            population = pop_size,
            max_generations = config.max_generations,
            seed = ?config.seed,
        );

        let mut population: Vec<P::Individual> =
            (0..pop_size).map(|_| problem.create_individual(&mut rng)).collect();
        let mut evaluations = evaluate_population(problem, &mut population, config.parallel);

        let mut history = vec![GenerationStats::of(0, &population)];
        let mut best = population[best_index(&population)].clone();
        let mut generations = 0;

        while generations < config.max_generations && !reached(config, best.fitness()) {
            let mut offspring: Vec<P::Individual> = (0..pop_size)
                .map(|_| tournament(&population, config.tournament_size, &mut rng).clone())
                .collect();

            let mut i = 0;
            while i + 1 < offspring.len() {
                if rng.random_bool(crossover_rate) {
                    let children = problem.crossover(&offspring[i], &offspring[i + 1], &mut rng);
                    for (slot, mut child) in children.into_iter().take(2).enumerate() {
                        child.set_fitness(f64::INFINITY);
                        offspring[i + slot] = child;
                    }
                }
                i += 2;
            }

            for child in &mut offspring {
                if rng.random_bool(mutation_rate) {
                    problem.mutate(child, &mut rng);
                    child.set_fitness(f64::INFINITY);
                }
            }

            evaluations += evaluate_population(problem, &mut offspring, config.parallel);

            let elites = elite_indices(&population, config.elite_count.min(pop_size));
            for (slot, idx) in worst_indices(&offspring, elites.len()).into_iter().zip(elites) {
                offspring[slot] = population[idx].clone();
            }

            population = offspring;
            generations += 1;

            let stats = GenerationStats::of(generations, &population);
            debug!(
                event = "ga_generation",
                generation = generations,
                min = stats.min,
                max = stats.max,
                avg = stats.avg,
            );
            history.push(stats);

            let candidate = &population[best_index(&population)];
            if candidate.fitness() < best.fitness() {
                best = candidate.clone();
            }
        }

        info!(
            event = "ga_end",
            generations = generations,
            evaluations = evaluations,
            best_fitness = best.fitness(),
        );

        GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            evaluations,
            history,
        }
    }
}

fn reached(config: &GaConfig, fitness: f64) -> bool {
    config.target_fitness.is_some_and(|target| fitness <= target)
}

/// Evaluates individuals whose fitness is not cached. Returns the count.
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) -> usize {
    let count = population
        .iter()
        .filter(|ind| ind.fitness().is_infinite())
        .count();
    if parallel {
        population
            .par_iter_mut()
            .filter(|ind| ind.fitness().is_infinite())
            .for_each(|ind| {
                let f = problem.evaluate(ind);
                ind.set_fitness(f);
            });
    } else {
        for ind in population.iter_mut().filter(|ind| ind.fitness().is_infinite()) {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
    count
}

/// Index of the lowest fitness; the lowest index wins ties.
fn best_index<I: Individual>(population: &[I]) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.fitness() < population[best].fitness() {
            best = i;
        }
    }
    best
}

/// Indices of the `count` worst individuals, worst first; higher index first on ties.
fn worst_indices<I: Individual>(population: &[I], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        population[b]
            .fitness()
            .total_cmp(&population[a].fitness())
            .then(b.cmp(&a))
    });
    order.truncate(count);
    order
}

/// Indices of the `count` best individuals, best first.
fn elite_indices<I: Individual>(population: &[I], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        population[a]
            .fitness()
            .total_cmp(&population[b].fitness())
            .then(a.cmp(&b))
    });
    order.truncate(count);
    order
}

fn tournament<'a, I: Individual, R: Rng>(population: &'a [I], size: usize, rng: &mut R) -> &'a I {
    let mut winner = rng.random_range(0..population.len());
    for _ in 1..size.max(1) {
        let challenger = rng.random_range(0..population.len());
        if population[challenger].fitness() < population[winner].fitness() {
            winner = challenger;
        }
    }
    &population[winner]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bit string individual; fitness = number of ones.
    #[derive(Debug, Clone)]
    struct Bits {
        genes: Vec<bool>,
        fitness: f64,
    }

    impl Individual for Bits {
        fn fitness(&self) -> f64 {
            self.fitness
        }

        fn set_fitness(&mut self, fitness: f64) {
            self.fitness = fitness;
        }
    }

    struct OneMin {
        len: usize,
    }

    impl GaProblem for OneMin {
        type Individual = Bits;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> Bits {
            Bits {
                genes: (0..self.len).map(|_| rng.random_bool(0.5)).collect(),
                fitness: f64::INFINITY,
            }
        }

        fn evaluate(&self, individual: &Bits) -> f64 {
            individual.genes.iter().filter(|&&b| b).count() as f64
        }

        fn crossover<R: Rng>(&self, p1: &Bits, p2: &Bits, rng: &mut R) -> Vec<Bits> {
            let cut = rng.random_range(0..self.len);
            let mut c1 = p1.clone();
            let mut c2 = p2.clone();
            c1.genes[cut..].copy_from_slice(&p2.genes[cut..]);
            c2.genes[cut..].copy_from_slice(&p1.genes[cut..]);
            vec![c1, c2]
        }

        fn mutate<R: Rng>(&self, individual: &mut Bits, rng: &mut R) {
            let i = rng.random_range(0..self.len);
            individual.genes[i] = !individual.genes[i];
        }
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(30)
            .with_max_generations(40)
            .with_mutation_rate(0.5)
            .with_seed(42)
    }

    #[test]
    fn test_improves_fitness() {
        let problem = OneMin { len: 20 };
        let result = GaRunner::run(&problem, &config());

        assert_eq!(result.history.len(), result.generations + 1);
        assert!(result.best_fitness <= result.history[0].min);
        assert!(result.best_fitness < 5.0);
        assert!(result.evaluations >= 30);
    }

    #[test]
    fn test_seed_reproducible_parallel_or_not() {
        let problem = OneMin { len: 16 };
        let a = GaRunner::run(&problem, &config().with_parallel(true));
        let b = GaRunner::run(&problem, &config().with_parallel(false));

        assert_eq!(a.best.genes, b.best.genes);
        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_target_fitness_stops_early() {
        let problem = OneMin { len: 4 };
        let result = GaRunner::run(
            &problem,
            &config().with_max_generations(500).with_target_fitness(0.0),
        );
        assert_eq!(result.best_fitness, 0.0);
        assert!(result.generations < 500);
    }

    #[test]
    fn test_elitism_never_loses_best() {
        let problem = OneMin { len: 24 };
        let result = GaRunner::run(&problem, &config().with_elite_count(2));
        for pair in result.history.windows(2) {
            assert!(pair[1].min <= pair[0].min);
        }
    }

    #[test]
    fn test_zero_generations() {
        let problem = OneMin { len: 8 };
        let result = GaRunner::run(&problem, &config().with_max_generations(0));
        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.evaluations, 30);
    }

    #[test]
    fn test_best_index_ties_lowest_index() {
        let pop = vec![
            Bits { genes: vec![], fitness: 3.0 },
            Bits { genes: vec![], fitness: 1.0 },
            Bits { genes: vec![], fitness: 1.0 },
        ];
        assert_eq!(best_index(&pop), 1);
        assert_eq!(elite_indices(&pop, 2), vec![1, 2]);
        assert_eq!(worst_indices(&pop, 2), vec![0, 2]);
    }

    #[test]
    fn test_rates_outside_unit_interval() {
        let mut bad = config();
        bad.crossover_rate = 1.5;
        bad.mutation_rate = f64::NAN;
        assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))));
        assert!(config().validate().is_ok());

        // The runner clamps instead of panicking
        let problem = OneMin { len: 8 };
        let result = GaRunner::run(&problem, &bad.with_max_generations(3));
        assert_eq!(result.generations, 3);

        let built = GaConfig::default()
            .with_crossover_rate(f64::NAN)
            .with_mutation_rate(-2.0);
        assert_eq!(built.crossover_rate, 0.0);
        assert_eq!(built.mutation_rate, 0.0);
        assert!(built.validate().is_ok());
    }

    #[test]
    fn test_classic_config() {
        let c = GaConfig::classic();
        assert_eq!(c.population_size, 100);
        assert_eq!(c.max_generations, 50);
        assert_eq!(c.tournament_size, 3);
        assert_eq!(c.seed, Some(64));
        assert_eq!(c.elite_count, 0);
    }
}
