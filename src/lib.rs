//! Staff rostering framework.
//!
//! Assigns staff to the Morning, Afternoon and Night shifts of every day in
//! a planning horizon under workload, rest and vacation rules, and checks
//! the result independently.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ScheduleModel`, `ShiftKind`,
//!   `VacationRequests`, `ConstraintSet`, `ConstraintViolation`
//! - **`config`**: `RosterConfig` (horizon, roster size, thresholds), TOML loading
//! - **`evaluation`**: Rule predicates and `ConstraintEvaluator` (score + audit)
//! - **`ga`**: Genetic algorithm engine and roster encoding
//! - **`exact`**: 0-1 MILP formulation
//! - **`solver`**: `ScheduleSolver` strategies (`StochasticSearch`, `ExactSearch`)
//! - **`report`**: Textual schedule report format and parser
//! - **`verify`**: `Verifier` and its plain-language explanation
//! - **`validation`**: Input shape checks
//!
//! # Example
//!
//! ```
//! use u_roster::report::ScheduleReport;
//! use u_roster::solver::{ExactSearch, RosterProblem, ScheduleSolver};
//! use u_roster::verify::Verifier;
//!
//! let problem = RosterProblem::demo();
//! let solved = ExactSearch::new().solve(&problem).unwrap().into_solved().unwrap();
//! assert_eq!(solved.score, 0);
//!
//! let text = ScheduleReport::from_schedule(&solved.schedule, &problem.vacations).to_string();
//! let report = Verifier::new(&problem.config).verify_report(&text).unwrap();
//! assert!(report.accepted);
//! ```
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The state of the art of nurse rostering"

pub mod config;
pub mod error;
pub mod evaluation;
pub mod exact;
pub mod ga;
pub mod models;
pub mod report;
pub mod solver;
pub mod validation;
pub mod verify;

pub use error::{ConfigError, ReportParseError, Result, RosterError, StructuralError};
