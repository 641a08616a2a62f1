//! Constraint evaluator.
//!
//! Runs every rule in [`super::rules`] over a schedule once and exposes the
//! result two ways:
//! - [`ConstraintEvaluator::score`]: sum of violation weights, minimized
//!   by stochastic search. Zero iff the schedule violates nothing.
//! - [`ConstraintEvaluator::audit`]: every violation as a record, sorted
//!   by staff, day, rule kind and shift.
//!
//! Both are pure functions of the schedule and the borrowed configuration.

use tracing::trace;

use super::rules;
use crate::config::RosterConfig;
use crate::error::StructuralError;
use crate::models::{ConstraintViolation, ScheduleModel, ValidationMode, VacationRequests, ViolationKind};
use crate::validation::{validate_schedule, validate_vacations};

/// Evaluates schedules against a fixed configuration and vacation set.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintEvaluator<'a> {
    config: &'a RosterConfig,
    vacations: &'a VacationRequests,
}

/// All violations of one schedule, in audit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    violations: Vec<ConstraintViolation>,
}

impl Evaluation {
    fn new(mut violations: Vec<ConstraintViolation>) -> Self {
        violations.sort_by_key(ConstraintViolation::sort_key);
        Self { violations }
    }

    /// Violations in audit order.
    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    /// Consumes the evaluation, returning the violations.
    pub fn into_violations(self) -> Vec<ConstraintViolation> {
        self.violations
    }

    /// Sum of violation weights.
    pub fn score(&self) -> u32 {
        self.violations.iter().map(ConstraintViolation::weight).sum()
    }

    /// Whether no rule is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations of one kind.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

impl<'a> ConstraintEvaluator<'a> {
    /// Creates an evaluator over borrowed configuration.
    pub fn new(config: &'a RosterConfig, vacations: &'a VacationRequests) -> Self {
        Self { config, vacations }
    }

    /// The configuration being evaluated against.
    pub fn config(&self) -> &'a RosterConfig {
        self.config
    }

    /// The vacation requests being evaluated against.
    pub fn vacations(&self) -> &'a VacationRequests {
        self.vacations
    }

    /// Runs every rule once.
    ///
    /// # Errors
    /// [`StructuralError`] if the schedule or vacations don't fit the
    /// configuration. Double-booked slots are *not* errors here; they are
    /// reported as [`ViolationKind::DuplicateAssignment`].
    pub fn evaluate(&self, schedule: &ScheduleModel) -> Result<Evaluation, StructuralError> {
        validate_schedule(schedule, self.config, ValidationMode::Audit)?;
        validate_vacations(self.vacations, self.config)?;

        let constraints = &self.config.constraints;
        let mut violations = rules::coverage(schedule);
        violations.extend(rules::vacations(schedule, self.vacations));
        violations.extend(rules::consecutive_working_days(schedule, constraints));
        violations.extend(rules::min_days_off(schedule, constraints));
        violations.extend(rules::workload(schedule, constraints));
        violations.extend(rules::duplicates(schedule));

        let evaluation = Evaluation::new(violations);
        trace!(
            violations = evaluation.violations.len(),
            score = evaluation.score(),
            "schedule evaluated"
        );
        Ok(evaluation)
    }

    /// Scalar penalty: sum of violation weights, `0` when fully valid.
    pub fn score(&self, schedule: &ScheduleModel) -> Result<u32, StructuralError> {
        self.evaluate(schedule).map(|e| e.score())
    }

    /// Structured violations in stable order.
    pub fn audit(&self, schedule: &ScheduleModel) -> Result<Vec<ConstraintViolation>, StructuralError> {
        self.evaluate(schedule).map(Evaluation::into_violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftKind;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// Random schedule: each slot gets 0, 1 or 2 random staff.
    fn random_schedule(config: &RosterConfig, rng: &mut SmallRng) -> ScheduleModel {
        let mut s = ScheduleModel::new(config.days, config.staff);
        for day in 0..config.days {
            for shift in ShiftKind::ALL {
                let n = rng.random_range(0..=2);
                for _ in 0..n {
                    s.assign(day, shift, rng.random_range(0..config.staff)).unwrap();
                }
            }
        }
        s
    }

    /// Each day is worked entirely by one staff member: staff `day % staff`.
    fn one_staff_per_day(config: &RosterConfig) -> ScheduleModel {
        let mut s = ScheduleModel::new(config.days, config.staff);
        for day in 0..config.days {
            for shift in ShiftKind::ALL {
                s.assign(day, shift, day % config.staff).unwrap();
            }
        }
        s
    }

    #[test]
    fn test_score_zero_iff_audit_empty() {
        let config = RosterConfig::default();
        let vacations = VacationRequests::new().with_request(0, [0, 1, 5]).with_request(2, [3]);
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..200 {
            let s = random_schedule(&config, &mut rng);
            let score = evaluator.score(&s).unwrap();
            let audit = evaluator.audit(&s).unwrap();
            assert_eq!(score == 0, audit.is_empty());
            assert_eq!(score, audit.iter().map(|v| v.weight()).sum::<u32>());
        }
    }

    #[test]
    fn test_feasible_schedule_scores_zero() {
        // 7 days, 7 staff, each works all three shifts of one day
        let config = RosterConfig::new(7, 7);
        let vacations = VacationRequests::new();
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let s = one_staff_per_day(&config);

        let audit = evaluator.audit(&s).unwrap();
        assert!(audit.is_empty(), "unexpected violations: {audit:?}");
        assert_eq!(evaluator.score(&s).unwrap(), 0);
    }

    #[test]
    fn test_audit_idempotent_and_sorted() {
        let config = RosterConfig::default();
        let vacations = VacationRequests::new().with_request(1, [0, 1, 2, 3]);
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let mut rng = SmallRng::seed_from_u64(7);
        let s = random_schedule(&config, &mut rng);

        let a = evaluator.audit(&s).unwrap();
        let b = evaluator.audit(&s).unwrap();
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
    }

    #[test]
    fn test_vacation_roundtrip_property() {
        let config = RosterConfig::default();
        let vacations = VacationRequests::new().with_request(0, [1]);
        let evaluator = ConstraintEvaluator::new(&config, &vacations);

        let off = ScheduleModel::new(7, 5);
        let count = |s: &ScheduleModel| {
            evaluator
                .audit(s)
                .unwrap()
                .iter()
                .filter(|v| v.kind == ViolationKind::VacationViolation && v.staff == Some(0) && v.day == Some(1))
                .count()
        };
        assert_eq!(count(&off), 0);

        let on = off
            .with_assignment(1, ShiftKind::Morning, 0)
            .and_then(|s| s.with_assignment(1, ShiftKind::Night, 0))
            .unwrap();
        assert_eq!(count(&on), 1);
    }

    #[test]
    fn test_coverage_property() {
        let config = RosterConfig::new(2, 3);
        let vacations = VacationRequests::new();
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let s = ScheduleModel::new(2, 3)
            .with_assignment(0, ShiftKind::Morning, 0)
            .and_then(|s| s.with_assignment(1, ShiftKind::Night, 1))
            .and_then(|s| s.with_assignment(1, ShiftKind::Night, 2))
            .unwrap();

        let e = evaluator.evaluate(&s).unwrap();
        assert_eq!(e.count(ViolationKind::UncoveredShift), 4);
        assert_eq!(e.count(ViolationKind::DuplicateAssignment), 1);
        for v in e.violations() {
            if v.kind == ViolationKind::UncoveredShift {
                assert_ne!((v.day, v.shift), (Some(0), Some(ShiftKind::Morning)));
                assert_ne!((v.day, v.shift), (Some(1), Some(ShiftKind::Night)));
            }
        }
    }

    #[test]
    fn test_consecutive_property() {
        let config = RosterConfig::new(7, 1);
        let vacations = VacationRequests::new();
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let mut s = ScheduleModel::new(7, 1);
        for d in [2, 3, 4, 5] {
            s.assign(d, ShiftKind::Afternoon, 0).unwrap();
        }
        let e = evaluator.evaluate(&s).unwrap();
        assert!(e.count(ViolationKind::MaxConsecutiveWorkingDaysExceeded) >= 1);
    }

    #[test]
    fn test_structural_error_rejected() {
        let config = RosterConfig::default();
        let vacations = VacationRequests::new();
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let s = ScheduleModel::new(6, 5);
        assert!(matches!(
            evaluator.score(&s),
            Err(StructuralError::HorizonMismatch { .. })
        ));

        let bad_vacations = VacationRequests::new().with_request(0, [10]);
        let evaluator = ConstraintEvaluator::new(&config, &bad_vacations);
        assert!(evaluator.audit(&ScheduleModel::new(7, 5)).is_err());
    }

    #[test]
    fn test_malformed_slot_table_rejected() {
        let config = RosterConfig::default();
        let vacations = VacationRequests::new();
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let s: ScheduleModel =
            serde_json::from_str(r#"{"days":7,"staff_count":5,"slots":[]}"#).unwrap();
        assert_eq!(
            evaluator.audit(&s).unwrap_err(),
            StructuralError::SlotCountMismatch {
                expected: 21,
                actual: 0
            }
        );
        assert!(evaluator.score(&s).is_err());
    }

    #[test]
    fn test_negative_scenario_single_vacation_violation() {
        let config = RosterConfig::default();
        let vacations = VacationRequests::new().with_request(0, [1]);
        let evaluator = ConstraintEvaluator::new(&config, &vacations);
        let s = ScheduleModel::new(7, 5)
            .with_assignment(1, ShiftKind::Morning, 0)
            .unwrap();

        let e = evaluator.evaluate(&s).unwrap();
        assert_eq!(e.count(ViolationKind::VacationViolation), 1);
        assert!(!e.is_feasible());
    }
}
