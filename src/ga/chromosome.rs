//! Slot-vector chromosome for rostering.
//!
//! # Encoding
//!
//! One gene per shift slot, laid out day-major: gene
//! `day * ShiftKind::COUNT + shift.index()` holds the staff id working that
//! slot. Every slot is staffed by exactly one person by construction, so
//! decoded schedules never have coverage gaps or duplicate assignments.
//!
//! Random chromosomes sample staff *without replacement* within a day, so
//! nobody starts with two shifts on the same day. The day-aligned operators
//! below keep that property; the reassign mutation only picks staff not yet
//! working that day.
//!
//! # Reference
//! Burke et al. (2004), "The state of the art of nurse rostering"

use rand::prelude::IndexedRandom;
use rand::Rng;

use super::engine::Individual;
use crate::error::StructuralError;
use crate::models::{ScheduleModel, ShiftKind};

/// Staff-per-slot chromosome.
///
/// Lower fitness = better roster (minimization convention).
#[derive(Debug, Clone, PartialEq)]
pub struct RosterChromosome {
    /// Staff id per slot, day-major.
    pub genes: Vec<usize>,
    /// Fitness value (lower = better).
    pub fitness: f64,
}

impl Individual for RosterChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl RosterChromosome {
    /// Wraps an existing gene vector (unevaluated).
    pub fn from_genes(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
        }
    }

    /// Creates a random chromosome: per day, `ShiftKind::COUNT` distinct staff.
    ///
    /// Requires `staff >= ShiftKind::COUNT`; with fewer staff, each day's
    /// sample is topped up with repeats.
    pub fn random<R: Rng>(days: usize, staff: usize, rng: &mut R) -> Self {
        let pool: Vec<usize> = (0..staff).collect();
        let mut genes = Vec::with_capacity(days * ShiftKind::COUNT);
        for _ in 0..days {
            let mut day: Vec<usize> = pool
                .choose_multiple(rng, ShiftKind::COUNT)
                .copied()
                .collect();
            while day.len() < ShiftKind::COUNT && staff > 0 {
                day.push(rng.random_range(0..staff));
            }
            genes.extend(day);
        }
        Self::from_genes(genes)
    }

    /// Number of days encoded.
    pub fn days(&self) -> usize {
        self.genes.len() / ShiftKind::COUNT
    }

    /// Genes of one day, in shift order.
    pub fn day(&self, day: usize) -> &[usize] {
        let start = day * ShiftKind::COUNT;
        &self.genes[start..start + ShiftKind::COUNT]
    }

    /// Staff working `(day, shift)`.
    pub fn staff_for(&self, day: usize, shift: ShiftKind) -> Option<usize> {
        self.genes.get(day * ShiftKind::COUNT + shift.index()).copied()
    }

    /// Decodes into a schedule.
    ///
    /// # Errors
    /// [`StructuralError::EncodingLength`] if the gene count doesn't match
    /// the horizon; [`StructuralError::StaffOutOfRange`] for an unknown id.
    pub fn decode(&self, days: usize, staff: usize) -> Result<ScheduleModel, StructuralError> {
        let expected = days * ShiftKind::COUNT;
        if self.genes.len() != expected {
            return Err(StructuralError::EncodingLength {
                expected,
                actual: self.genes.len(),
            });
        }
        let mut schedule = ScheduleModel::new(days, staff);
        for (idx, &person) in self.genes.iter().enumerate() {
            let shift = ShiftKind::ALL[idx % ShiftKind::COUNT];
            schedule.assign(idx / ShiftKind::COUNT, shift, person)?;
        }
        Ok(schedule)
    }

    /// Whether no staff holds two slots on the same day.
    pub fn is_day_distinct(&self) -> bool {
        (0..self.days()).all(|d| {
            let genes = self.day(d);
            genes
                .iter()
                .enumerate()
                .all(|(i, g)| !genes[i + 1..].contains(g))
        })
    }
}

// ======================== Crossover operators ========================

/// Day-aligned two-point crossover.
///
/// Picks two day boundaries and swaps the whole days between them, so
/// each child day comes intact from one parent.
pub fn two_point_day_crossover<R: Rng>(
    p1: &RosterChromosome,
    p2: &RosterChromosome,
    rng: &mut R,
) -> (RosterChromosome, RosterChromosome) {
    let days = p1.days().min(p2.days());
    if days < 2 {
        return (p1.clone(), p2.clone());
    }
    let mut a = rng.random_range(0..=days);
    let mut b = rng.random_range(0..=days);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    let (lo, hi) = (a * ShiftKind::COUNT, b * ShiftKind::COUNT);

    let mut c1 = p1.genes.clone();
    let mut c2 = p2.genes.clone();
    c1[lo..hi].copy_from_slice(&p2.genes[lo..hi]);
    c2[lo..hi].copy_from_slice(&p1.genes[lo..hi]);
    (
        RosterChromosome::from_genes(c1),
        RosterChromosome::from_genes(c2),
    )
}

/// Uniform day crossover: each day is inherited from either parent with
/// equal probability (the other child gets the complement).
pub fn uniform_day_crossover<R: Rng>(
    p1: &RosterChromosome,
    p2: &RosterChromosome,
    rng: &mut R,
) -> (RosterChromosome, RosterChromosome) {
    let days = p1.days().min(p2.days());
    let mut c1 = p1.genes.clone();
    let mut c2 = p2.genes.clone();
    for d in 0..days {
        if rng.random_bool(0.5) {
            let range = d * ShiftKind::COUNT..(d + 1) * ShiftKind::COUNT;
            c1[range.clone()].copy_from_slice(&p2.genes[range.clone()]);
            c2[range.clone()].copy_from_slice(&p1.genes[range]);
        }
    }
    (
        RosterChromosome::from_genes(c1),
        RosterChromosome::from_genes(c2),
    )
}

// ======================== Mutation operators ========================

/// Reassign mutation: gives one random slot to a staff member not already
/// working that day. No-op when everybody works that day.
pub fn reassign_mutation<R: Rng>(chromosome: &mut RosterChromosome, staff: usize, rng: &mut R) {
    let days = chromosome.days();
    if days == 0 || staff == 0 {
        return;
    }
    let day = rng.random_range(0..days);
    let shift = rng.random_range(0..ShiftKind::COUNT);
    let busy = chromosome.day(day).to_vec();
    let free: Vec<usize> = (0..staff).filter(|s| !busy.contains(s)).collect();
    if let Some(&person) = free.choose(rng) {
        chromosome.genes[day * ShiftKind::COUNT + shift] = person;
    }
}

/// In-day swap mutation: exchanges the staff of two shifts on one day.
pub fn day_swap_mutation<R: Rng>(chromosome: &mut RosterChromosome, rng: &mut R) {
    let days = chromosome.days();
    if days == 0 {
        return;
    }
    let day = rng.random_range(0..days);
    let i = rng.random_range(0..ShiftKind::COUNT);
    let j = rng.random_range(0..ShiftKind::COUNT);
    let base = day * ShiftKind::COUNT;
    chromosome.genes.swap(base + i, base + j);
}

/// Day exchange mutation: swaps the whole rosters of two days.
pub fn day_exchange_mutation<R: Rng>(chromosome: &mut RosterChromosome, rng: &mut R) {
    let days = chromosome.days();
    if days < 2 {
        return;
    }
    let a = rng.random_range(0..days);
    let b = rng.random_range(0..days);
    for k in 0..ShiftKind::COUNT {
        chromosome
            .genes
            .swap(a * ShiftKind::COUNT + k, b * ShiftKind::COUNT + k);
    }
}
