//! MILP-based exact roster formulation.
//!
//! Builds a 0-1 integer program from a [`RosterConfig`] and
//! [`VacationRequests`] with `good_lp`, solves it with the pure-Rust
//! `microlp` backend, and decodes the solution into a [`ScheduleModel`].
//!
//! # Formulation
//!
//! Variables:
//! - `x[p][d][s]`: staff `p` works shift `s` on day `d`
//! - `w[p][d]`: staff `p` works on day `d`, linked by `x ≤ w ≤ Σ_s x`
//!
//! Constraints:
//! - every slot has exactly one staff: `Σ_p x[p][d][s] = 1`
//! - workload: `Σ_d w ≤ max_total_shifts`, `Σ x[.][.][Night] ≤ max_night_shifts`
//! - run length: every window of `k + 1` days has `Σ w ≤ k`
//! - days off: `Σ_d w[p][d] ≤ days - min_off`
//! - off gaps: `w[d] - w[d+1] + w[d+j] ≤ 1` for `j ∈ 2..=min_off`, so an
//!   off run between two working days is never shorter than `min_off`
//! - vacations: `w[p][d] = 0`
//!
//! The objective is constant; any feasible point is a zero-score roster.
//!
//! # Reference
//! - Burke et al. (2004), "The state of the art of nurse rostering"
//! - Wolsey (1998), "Integer Programming"

use good_lp::{
    constraint, default_solver, variable, variables, Constraint, Expression, ProblemVariables,
    Solution, SolverModel, Variable,
};
use tracing::debug;

use crate::config::RosterConfig;
use crate::error::StructuralError;
use crate::models::{ScheduleModel, ShiftKind, VacationRequests};

/// Result of solving a [`RosterMilp`].
#[derive(Debug, Clone, PartialEq)]
pub enum MilpOutcome {
    /// A schedule satisfying every constraint.
    Feasible(ScheduleModel),
    /// The engine proved there is none, or gave up; carries its message.
    Infeasible(String),
}

/// Builds a MILP model from roster inputs.
///
/// # Example
/// ```
/// use u_roster::config::RosterConfig;
/// use u_roster::exact::{MilpOutcome, RosterMilpBuilder};
/// use u_roster::models::VacationRequests;
///
/// let config = RosterConfig::new(3, 3);
/// let vacations = VacationRequests::new();
/// let milp = RosterMilpBuilder::new(&config, &vacations).build();
/// assert_eq!(milp.variable_count(), 3 * 3 * 3 + 3 * 3);
/// ```
pub struct RosterMilpBuilder<'a> {
    config: &'a RosterConfig,
    vacations: &'a VacationRequests,
}

impl<'a> RosterMilpBuilder<'a> {
    /// Creates a new MILP builder.
    pub fn new(config: &'a RosterConfig, vacations: &'a VacationRequests) -> Self {
        Self { config, vacations }
    }

    /// Builds the model.
    ///
    /// Vacation entries outside the configured horizon are ignored here;
    /// input validation rejects them before solving.
    pub fn build(&self) -> RosterMilp {
        let days = self.config.days;
        let staff = self.config.staff;
        let c = &self.config.constraints;

        let mut vars = variables!();
        let assign: Vec<Vec<Vec<Variable>>> = (0..staff)
            .map(|_| {
                (0..days)
                    .map(|_| {
                        (0..ShiftKind::COUNT)
                            .map(|_| vars.add(variable().binary()))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        let works: Vec<Vec<Variable>> = (0..staff)
            .map(|_| (0..days).map(|_| vars.add(variable().binary())).collect())
            .collect();

        let mut constraints = Vec::new();

        // Coverage: exactly one staff per slot
        for d in 0..days {
            for s in 0..ShiftKind::COUNT {
                let covered: Expression = (0..staff).map(|p| assign[p][d][s]).sum();
                constraints.push(constraint!(covered == 1.0));
            }
        }

        let window = c.max_consecutive_working_days + 1;
        let max_work_days = days as f64 - c.min_consecutive_days_off as f64;

        for p in 0..staff {
            // Day indicator linking
            for d in 0..days {
                let w = works[p][d];
                let any: Expression = assign[p][d].iter().copied().sum();
                for &x in &assign[p][d] {
                    constraints.push(constraint!(x <= w));
                }
                constraints.push(constraint!(w <= any));
            }

            // Workload, in days worked
            let total: Expression = works[p].iter().copied().sum();
            constraints.push(constraint!(total <= c.max_total_shifts as f64));
            let nights: Expression = assign[p]
                .iter()
                .map(|day| day[ShiftKind::Night.index()])
                .sum();
            constraints.push(constraint!(nights <= c.max_night_shifts as f64));

            // Run length
            if window <= days {
                for start in 0..=days - window {
                    let run: Expression = works[p][start..start + window].iter().copied().sum();
                    constraints.push(constraint!(run <= c.max_consecutive_working_days as f64));
                }
            }

            // Total days off
            let worked: Expression = works[p].iter().copied().sum();
            constraints.push(constraint!(worked <= max_work_days));

            // Off gaps between working days
            for d in 0..days.saturating_sub(1) {
                for j in 2..=c.min_consecutive_days_off {
                    if d + j >= days {
                        break;
                    }
                    let (a, b, e) = (works[p][d], works[p][d + 1], works[p][d + j]);
                    constraints.push(constraint!(a - b + e <= 1.0));
                }
            }

            // Vacations
            for d in self.vacations.days_for(p).filter(|&d| d < days) {
                let w = works[p][d];
                constraints.push(constraint!(w == 0.0));
            }
        }

        debug!(
            event = "milp_build",
            days = days,
            staff = staff,
            constraints = constraints.len(),
        );

        RosterMilp {
            days,
            staff,
            vars,
            assign,
            works,
            constraints,
        }
    }
}

/// A built roster MILP, ready to solve.
pub struct RosterMilp {
    days: usize,
    staff: usize,
    vars: ProblemVariables,
    assign: Vec<Vec<Vec<Variable>>>,
    works: Vec<Vec<Variable>>,
    constraints: Vec<Constraint>,
}

impl RosterMilp {
    /// Number of decision variables.
    pub fn variable_count(&self) -> usize {
        self.assign.iter().flatten().map(Vec::len).sum::<usize>()
            + self.works.iter().map(Vec::len).sum::<usize>()
    }

    /// Number of linear constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Solves the model and decodes the assignment.
    ///
    /// Engine failures (proven infeasible, or any other resolution error)
    /// become [`MilpOutcome::Infeasible`] with the engine's message.
    pub fn solve(self) -> Result<MilpOutcome, StructuralError> {
        let mut model = self
            .vars
            .minimise(Expression::from(0.0))
            .using(default_solver);
        for c in self.constraints {
            model = model.with(c);
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(e) => return Ok(MilpOutcome::Infeasible(e.to_string())),
        };

        let mut schedule = ScheduleModel::new(self.days, self.staff);
        for (p, per_day) in self.assign.iter().enumerate() {
            for (d, per_shift) in per_day.iter().enumerate() {
                for (s, &x) in per_shift.iter().enumerate() {
                    if solution.value(x) > 0.5 {
                        schedule.assign(d, ShiftKind::ALL[s], p)?;
                    }
                }
            }
        }
        Ok(MilpOutcome::Feasible(schedule))
    }
}
