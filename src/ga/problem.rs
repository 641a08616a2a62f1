//! Roster GA problem definition.
//!
//! Implements [`GaProblem`] for rostering. Fitness is the constraint
//! evaluator's score of the decoded schedule, so the GA minimizes exactly
//! what the auditor reports.

use rand::Rng;

use super::chromosome::RosterChromosome;
use super::engine::GaProblem;
use super::operators::GeneticOperators;
use crate::config::RosterConfig;
use crate::error::StructuralError;
use crate::evaluation::ConstraintEvaluator;
use crate::models::{ScheduleModel, VacationRequests};

/// GA problem definition for rostering.
///
/// # Example
/// ```
/// use u_roster::config::RosterConfig;
/// use u_roster::ga::{GaConfig, GaRunner, RosterGaProblem};
/// use u_roster::models::VacationRequests;
///
/// let config = RosterConfig::default();
/// let vacations = VacationRequests::new().with_request(0, [0, 1]);
/// let problem = RosterGaProblem::new(&config, &vacations);
/// let ga = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(5)
///     .with_seed(1);
/// let result = GaRunner::run(&problem, &ga);
/// assert!(result.best_fitness.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct RosterGaProblem<'a> {
    config: &'a RosterConfig,
    vacations: &'a VacationRequests,
    operators: GeneticOperators,
}

impl<'a> RosterGaProblem<'a> {
    /// Creates a problem with default operators.
    pub fn new(config: &'a RosterConfig, vacations: &'a VacationRequests) -> Self {
        Self {
            config,
            vacations,
            operators: GeneticOperators::default(),
        }
    }

    /// Sets the genetic operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// Decodes a chromosome into a schedule.
    pub fn decode(&self, chromosome: &RosterChromosome) -> Result<ScheduleModel, StructuralError> {
        chromosome.decode(self.config.days, self.config.staff)
    }

    /// The evaluator shared with auditing.
    pub fn evaluator(&self) -> ConstraintEvaluator<'a> {
        ConstraintEvaluator::new(self.config, self.vacations)
    }
}

impl GaProblem for RosterGaProblem<'_> {
    type Individual = RosterChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> RosterChromosome {
        RosterChromosome::random(self.config.days, self.config.staff, rng)
    }

    /// Constraint score of the decoded schedule; malformed chromosomes
    /// get `f64::INFINITY`.
    fn evaluate(&self, individual: &RosterChromosome) -> f64 {
        self.decode(individual)
            .and_then(|schedule| self.evaluator().score(&schedule))
            .map_or(f64::INFINITY, f64::from)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &RosterChromosome,
        parent2: &RosterChromosome,
        rng: &mut R,
    ) -> Vec<RosterChromosome> {
        let (c1, c2) = self.operators.crossover(parent1, parent2, rng);
        vec![c1, c2]
    }

    fn mutate<R: Rng>(&self, individual: &mut RosterChromosome, rng: &mut R) {
        self.operators.mutate(individual, self.config.staff, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::engine::{GaConfig, GaRunner};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn vacations() -> VacationRequests {
        VacationRequests::new().with_request(0, [0, 1, 5]).with_request(2, [3])
    }

    #[test]
    fn test_evaluate_matches_evaluator() {
        let config = RosterConfig::default();
        let v = vacations();
        let problem = RosterGaProblem::new(&config, &v);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let ch = problem.create_individual(&mut rng);
            let schedule = problem.decode(&ch).unwrap();
            let score = problem.evaluator().score(&schedule).unwrap();
            assert_eq!(problem.evaluate(&ch), f64::from(score));
        }
    }

    #[test]
    fn test_malformed_chromosome_is_infinite() {
        let config = RosterConfig::default();
        let v = vacations();
        let problem = RosterGaProblem::new(&config, &v);
        let ch = RosterChromosome::from_genes(vec![0; 5]);
        assert_eq!(problem.evaluate(&ch), f64::INFINITY);
    }

    #[test]
    fn test_ga_runner_integration() {
        let config = RosterConfig::default();
        let v = vacations();
        let problem = RosterGaProblem::new(&config, &v);
        let ga = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(30)
            .with_seed(42);

        let result = GaRunner::run(&problem, &ga);
        assert!(result.best_fitness.is_finite());
        assert!(result.best_fitness <= result.history[0].min);
        assert!(result.generations > 0);

        let schedule = problem.decode(&result.best).unwrap();
        assert_eq!(
            f64::from(problem.evaluator().score(&schedule).unwrap()),
            result.best_fitness
        );
    }

    #[test]
    fn test_crossover_and_mutation() {
        let config = RosterConfig::default();
        let v = vacations();
        let problem = RosterGaProblem::new(&config, &v);
        let mut rng = SmallRng::seed_from_u64(42);

        let p1 = problem.create_individual(&mut rng);
        let p2 = problem.create_individual(&mut rng);

        let children = problem.crossover(&p1, &p2, &mut rng);
        assert_eq!(children.len(), 2);

        let mut child = children[0].clone();
        problem.mutate(&mut child, &mut rng);
        assert_eq!(child.genes.len(), p1.genes.len());
    }
}
