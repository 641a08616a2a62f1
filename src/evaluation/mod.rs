//! Constraint evaluation.
//!
//! One rule layer, two outputs. [`rules`] holds the per-rule predicates;
//! [`ConstraintEvaluator`] runs them and derives both the scalar score used
//! by stochastic search and the structured audit used for verification,
//! so the two can never disagree.

pub mod rules;

mod evaluator;

pub use evaluator::{ConstraintEvaluator, Evaluation};
