//! Configurable genetic operators for rostering.
//!
//! Provides runtime-selectable crossover and mutation strategies
//! via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_roster::ga::operators::{GeneticOperators, CrossoverType, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::TwoPoint);
//! assert_eq!(ops.mutation_type, MutationType::Mixed);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    day_exchange_mutation, day_swap_mutation, reassign_mutation, two_point_day_crossover,
    uniform_day_crossover, RosterChromosome,
};

/// Crossover strategy for roster chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Swap the days between two random day boundaries.
    TwoPoint,
    /// Inherit each day from either parent.
    UniformDay,
}

/// Mutation strategy for roster chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationType {
    /// Hand one slot to someone not working that day.
    Reassign,
    /// Swap two shifts within one day.
    DaySwap,
    /// Swap the rosters of two days.
    DayExchange,
    /// Reassign half the time, otherwise a day swap or day exchange.
    Mixed,
}

/// Runtime-selectable genetic operators for the roster GA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::TwoPoint,
            mutation_type: MutationType::Mixed,
        }
    }
}

impl GeneticOperators {
    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(
        &self,
        p1: &RosterChromosome,
        p2: &RosterChromosome,
        rng: &mut R,
    ) -> (RosterChromosome, RosterChromosome) {
        match self.crossover_type {
            CrossoverType::TwoPoint => two_point_day_crossover(p1, p2, rng),
            CrossoverType::UniformDay => uniform_day_crossover(p1, p2, rng),
        }
    }

    /// Performs mutation using the configured strategy.
    pub fn mutate<R: Rng>(&self, chromosome: &mut RosterChromosome, staff: usize, rng: &mut R) {
        match self.mutation_type {
            MutationType::Reassign => reassign_mutation(chromosome, staff, rng),
            MutationType::DaySwap => day_swap_mutation(chromosome, rng),
            MutationType::DayExchange => day_exchange_mutation(chromosome, rng),
            MutationType::Mixed => {
                if rng.random_bool(0.5) {
                    reassign_mutation(chromosome, staff, rng);
                } else if rng.random_bool(0.5) {
                    day_swap_mutation(chromosome, rng);
                } else {
                    day_exchange_mutation(chromosome, rng);
                }
            }
        }
    }
}
