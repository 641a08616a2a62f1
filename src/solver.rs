//! Interchangeable roster solvers.
//!
//! Every solver takes a [`RosterProblem`] and returns a [`SolveOutcome`];
//! callers hold them as `&dyn ScheduleSolver`. Returned schedules are
//! always re-scored with the shared [`ConstraintEvaluator`], so scores are
//! comparable across solvers.
//!
//! # Solvers
//!
//! | Solver | Strategy | Guarantee |
//! |--------|----------|-----------|
//! | [`StochasticSearch`] | Genetic algorithm on a slot-vector encoding | Best found; score may be > 0 |
//! | [`ExactSearch`] | 0-1 MILP, bounded by a wall-clock limit | Zero score, or proof of infeasibility |

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RosterConfig;
use crate::error::{ConfigError, RosterError};
use crate::evaluation::ConstraintEvaluator;
use crate::exact::{MilpOutcome, RosterMilpBuilder};
use crate::ga::operators::GeneticOperators;
use crate::ga::{GaConfig, GaRunner, RosterGaProblem};
use crate::models::{ScheduleModel, ShiftKind, VacationRequests, ValidationMode};
use crate::validation::{validate_input, validate_schedule};

/// A roster instance: dimensions, thresholds and vacation requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterProblem {
    /// Horizon, roster size and thresholds.
    pub config: RosterConfig,
    /// Requested days off.
    pub vacations: VacationRequests,
}

impl RosterProblem {
    /// Creates a problem.
    pub fn new(config: RosterConfig, vacations: VacationRequests) -> Self {
        Self { config, vacations }
    }

    /// One week, five staff, default thresholds; staff 0 off on days 0, 1
    /// and 5, staff 2 off on day 3.
    pub fn demo() -> Self {
        Self::new(
            RosterConfig::default(),
            VacationRequests::new()
                .with_request(0, [0, 1, 5])
                .with_request(2, [3]),
        )
    }

    /// Evaluator bound to this problem.
    pub fn evaluator(&self) -> ConstraintEvaluator<'_> {
        ConstraintEvaluator::new(&self.config, &self.vacations)
    }

    /// Checks the configuration, then every vacation request.
    ///
    /// All vacation issues are logged; the first one is returned.
    fn validate(&self) -> Result<(), RosterError> {
        self.config.validate()?;
        if let Err(errors) = validate_input(&self.vacations, &self.config) {
            for error in &errors {
                warn!(event = "invalid_input", error = %error);
            }
            if let Some(first) = errors.into_iter().next() {
                return Err(first.into());
            }
        }
        Ok(())
    }
}

/// A schedule produced by a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedSchedule {
    /// The schedule.
    pub schedule: ScheduleModel,
    /// Constraint score of `schedule` (0 = no violation).
    pub score: u32,
    /// Name of the solver that produced it.
    pub solver: &'static str,
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// A schedule was produced.
    Solved(SolvedSchedule),
    /// No schedule satisfies the hard model.
    Infeasible {
        /// Engine-provided explanation, if any.
        diagnostic: Option<String>,
    },
    /// The time limit expired first.
    ///
    /// The exact solver's worker thread is not cancelled: it keeps running
    /// detached until the engine returns, and its result is dropped.
    Timeout,
}

impl SolveOutcome {
    /// The solved schedule, if any.
    pub fn solved(&self) -> Option<&SolvedSchedule> {
        match self {
            Self::Solved(solved) => Some(solved),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the solved schedule, if any.
    pub fn into_solved(self) -> Option<SolvedSchedule> {
        match self {
            Self::Solved(solved) => Some(solved),
            _ => None,
        }
    }
}

/// A roster solving strategy.
pub trait ScheduleSolver {
    /// Short solver name.
    fn name(&self) -> &'static str;

    /// Solves a problem.
    ///
    /// # Errors
    /// [`RosterError`] for invalid configuration or out-of-range vacations.
    /// Infeasibility and timeouts are reported through [`SolveOutcome`].
    fn solve(&self, problem: &RosterProblem) -> Result<SolveOutcome, RosterError>;
}

/// Scores a solver's schedule. Solver output must hold at most one staff
/// per slot; audits of arbitrary schedules tolerate more.
fn solved(
    problem: &RosterProblem,
    schedule: ScheduleModel,
    solver: &'static str,
) -> Result<SolveOutcome, RosterError> {
    validate_schedule(&schedule, &problem.config, ValidationMode::Strict)?;
    let score = problem.evaluator().score(&schedule)?;
    info!(event = "solve_end", solver = solver, score = score);
    Ok(SolveOutcome::Solved(SolvedSchedule {
        schedule,
        score,
        solver,
    }))
}

// ======================== Stochastic search ========================

/// Genetic-algorithm roster search.
///
/// Minimizes the constraint score; stops early at score 0. Needs at least
/// as many staff as shifts per day.
///
/// # Example
/// ```
/// use u_roster::solver::{RosterProblem, ScheduleSolver, StochasticSearch};
/// use u_roster::ga::GaConfig;
///
/// let search = StochasticSearch::new().with_ga(
///     GaConfig::default()
///         .with_population_size(30)
///         .with_max_generations(10)
///         .with_seed(7),
/// );
/// let outcome = search.solve(&RosterProblem::demo()).unwrap();
/// assert!(outcome.solved().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct StochasticSearch {
    /// GA parameters. The target fitness is always forced to 0.
    pub ga: GaConfig,
    /// Crossover and mutation strategies.
    pub operators: GeneticOperators,
}

impl Default for StochasticSearch {
    fn default() -> Self {
        Self {
            ga: GaConfig::default().with_seed(64),
            operators: GeneticOperators::default(),
        }
    }
}

impl StochasticSearch {
    /// Creates a search with default parameters (seed 64).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GA parameters.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Sets the genetic operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ga.seed = Some(seed);
        self
    }
}

impl ScheduleSolver for StochasticSearch {
    fn name(&self) -> &'static str {
        "stochastic"
    }

    fn solve(&self, problem: &RosterProblem) -> Result<SolveOutcome, RosterError> {
        problem.validate()?;
        self.ga.validate()?;
        if problem.config.staff < ShiftKind::COUNT {
            return Err(ConfigError::Invalid(format!(
                "stochastic search needs at least {} staff, got {}",
                ShiftKind::COUNT,
                problem.config.staff
            ))
            .into());
        }

        info!(
            event = "solve_start",
            solver = self.name(),
            days = problem.config.days,
            staff = problem.config.staff,
        );

        let ga_problem = RosterGaProblem::new(&problem.config, &problem.vacations)
            .with_operators(self.operators.clone());
        let ga = self.ga.clone().with_target_fitness(0.0);
        let result = GaRunner::run(&ga_problem, &ga);

        let schedule = ga_problem.decode(&result.best)?;
        solved(problem, schedule, self.name())
    }
}

// ======================== Exact search ========================

/// MILP roster search on a worker thread.
///
/// The caller waits at most `time_limit`. The MILP engine cannot be
/// interrupted, so on expiry the worker thread stays alive, detached,
/// until the engine returns; its result is then discarded. Each timed-out
/// solve therefore leaves one busy thread behind, and repeated timeouts on
/// hard instances accumulate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactSearch {
    /// Wall-clock limit.
    pub time_limit: Duration,
}

impl Default for ExactSearch {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(60),
        }
    }
}

impl ExactSearch {
    /// Creates a search with the default 60 s limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }
}

impl ScheduleSolver for ExactSearch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, problem: &RosterProblem) -> Result<SolveOutcome, RosterError> {
        problem.validate()?;

        info!(
            event = "solve_start",
            solver = self.name(),
            days = problem.config.days,
            staff = problem.config.staff,
            time_limit_ms = u64::try_from(self.time_limit.as_millis()).unwrap_or(u64::MAX),
        );

        let config = problem.config;
        let vacations = problem.vacations.clone();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("roster-milp".to_string())
            .spawn(move || {
                let outcome = RosterMilpBuilder::new(&config, &vacations).build().solve();
                // The receiver is gone after a timeout.
                let _ = tx.send(outcome);
            })
            .map_err(ConfigError::from)?;

        match rx.recv_timeout(self.time_limit) {
            Ok(Ok(MilpOutcome::Feasible(schedule))) => solved(problem, schedule, self.name()),
            Ok(Ok(MilpOutcome::Infeasible(diagnostic))) => {
                info!(event = "solve_end", solver = self.name(), outcome = "infeasible");
                Ok(SolveOutcome::Infeasible {
                    diagnostic: Some(diagnostic),
                })
            }
            Ok(Err(e)) => Err(e.into()),
            Err(RecvTimeoutError::Timeout) => {
                warn!(event = "solve_timeout", solver = self.name());
                Ok(SolveOutcome::Timeout)
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!(event = "solve_aborted", solver = self.name());
                Ok(SolveOutcome::Infeasible {
                    diagnostic: Some("solver thread terminated without a result".to_string()),
                })
            }
        }
    }
}
