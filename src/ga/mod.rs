//! GA-based roster optimization.
//!
//! A small generational GA engine ([`engine`]) plus the rostering encoding
//! on top of it. Fitness is the shared constraint score, minimized.
//!
//! # Encoding
//!
//! One gene per shift slot holding the staff id that works it, day-major.
//! Coverage and one-staff-per-slot hold by construction; the search only
//! has to deal with vacations, workload and run-length rules.
//!
//! # Submodules
//!
//! - [`engine`]: Problem-agnostic GA runner (`GaProblem`, `GaConfig`, `GaRunner`)
//! - [`operators`]: Runtime-selectable crossover and mutation strategies

mod chromosome;
pub mod engine;
pub mod operators;
mod problem;

pub use chromosome::{
    day_exchange_mutation, day_swap_mutation, reassign_mutation, two_point_day_crossover,
    uniform_day_crossover, RosterChromosome,
};
pub use engine::{GaConfig, GaProblem, GaResult, GaRunner, GenerationStats, Individual};
pub use problem::RosterGaProblem;
