//! Structural validation for rostering inputs.
//!
//! Checks the *shape* of a schedule and its vacation requests against the
//! configuration before any rule is evaluated. Detects:
//! - Horizon or roster size mismatches
//! - Slot tables that do not fit the horizon
//! - Double-booked slots (strict mode only)
//! - Vacation requests for unknown staff or days outside the horizon
//!
//! Shape errors are fatal: nothing is scored or audited on a malformed
//! input, and nothing is silently coerced.

use crate::config::RosterConfig;
use crate::error::StructuralError;
use crate::models::{ScheduleModel, ValidationMode, VacationRequests};

/// Validation result carrying every detected issue.
pub type ValidationResult = Result<(), Vec<StructuralError>>;

/// Validates a schedule's shape against the configuration.
///
/// Checks:
/// 1. Horizon length equals `config.days`
/// 2. Roster size equals `config.staff`
/// 3. Slot table shape, then occupancy per `mode` (see
///    [`ScheduleModel::validate_structure`])
pub fn validate_schedule(
    schedule: &ScheduleModel,
    config: &RosterConfig,
    mode: ValidationMode,
) -> Result<(), StructuralError> {
    if schedule.days() != config.days {
        return Err(StructuralError::HorizonMismatch {
            expected: config.days,
            actual: schedule.days(),
        });
    }
    if schedule.staff_count() != config.staff {
        return Err(StructuralError::StaffCountMismatch {
            expected: config.staff,
            actual: schedule.staff_count(),
        });
    }
    schedule.validate_structure(mode)
}

/// Validates vacation requests, stopping at the first issue.
pub fn validate_vacations(
    vacations: &VacationRequests,
    config: &RosterConfig,
) -> Result<(), StructuralError> {
    match vacation_errors(vacations, config).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Validates a full solve input, reporting every issue found.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(vacations: &VacationRequests, config: &RosterConfig) -> ValidationResult {
    let errors = vacation_errors(vacations, config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn vacation_errors(vacations: &VacationRequests, config: &RosterConfig) -> Vec<StructuralError> {
    let mut errors = Vec::new();
    for (staff, days) in vacations.iter() {
        if staff >= config.staff {
            errors.push(StructuralError::StaffOutOfRange {
                staff,
                staff_count: config.staff,
            });
            continue;
        }
        for &day in days {
            if day >= config.days {
                errors.push(StructuralError::VacationOutOfRange { staff, day });
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftKind;

    #[test]
    fn test_valid_schedule() {
        let config = RosterConfig::new(2, 3);
        let s = ScheduleModel::new(2, 3);
        assert!(validate_schedule(&s, &config, ValidationMode::Strict).is_ok());
    }

    #[test]
    fn test_horizon_mismatch() {
        let config = RosterConfig::new(7, 5);
        let s = ScheduleModel::new(6, 5);
        assert_eq!(
            validate_schedule(&s, &config, ValidationMode::Audit),
            Err(StructuralError::HorizonMismatch {
                expected: 7,
                actual: 6
            })
        );
    }

    #[test]
    fn test_staff_mismatch() {
        let config = RosterConfig::new(7, 5);
        let s = ScheduleModel::new(7, 4);
        assert!(matches!(
            validate_schedule(&s, &config, ValidationMode::Audit),
            Err(StructuralError::StaffCountMismatch { .. })
        ));
    }

    #[test]
    fn test_double_booking_strict_only() {
        let config = RosterConfig::new(1, 3);
        let s = ScheduleModel::new(1, 3)
            .with_assignment(0, ShiftKind::Morning, 0)
            .and_then(|s| s.with_assignment(0, ShiftKind::Morning, 1))
            .unwrap();

        assert!(validate_schedule(&s, &config, ValidationMode::Audit).is_ok());
        assert!(matches!(
            validate_schedule(&s, &config, ValidationMode::Strict),
            Err(StructuralError::DoubleBooked { day: 0, .. })
        ));
    }

    #[test]
    fn test_vacation_out_of_range() {
        let config = RosterConfig::new(7, 5);
        let v = VacationRequests::new()
            .with_request(0, [1, 7])
            .with_request(5, [0])
            .with_request(2, [3]);

        let errors = validate_input(&v, &config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&StructuralError::VacationOutOfRange { staff: 0, day: 7 }));
        assert!(errors.contains(&StructuralError::StaffOutOfRange {
            staff: 5,
            staff_count: 5
        }));
        assert_eq!(
            validate_vacations(&v, &config),
            Err(StructuralError::VacationOutOfRange { staff: 0, day: 7 })
        );
    }

    #[test]
    fn test_vacations_ok() {
        let config = RosterConfig::default();
        let v = VacationRequests::new().with_request(0, [0, 1, 5]).with_request(2, [3]);
        assert!(validate_input(&v, &config).is_ok());
        assert!(validate_vacations(&v, &config).is_ok());
    }
}
