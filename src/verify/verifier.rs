//! Roster verification and explanation.
//!
//! Recomputes everything about a finished schedule from scratch (per-staff
//! metrics, vacation honoring, slot coverage) and renders a plain-language
//! explanation of the verdict.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::metrics::StaffMetrics;
use crate::config::RosterConfig;
use crate::error::{RosterError, StructuralError};
use crate::evaluation::ConstraintEvaluator;
use crate::models::{ConstraintViolation, ScheduleModel, ShiftKind, VacationRequests, ValidationMode};
use crate::report::ScheduleReport;
use crate::validation::{validate_schedule, validate_vacations};

/// Per-staff verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffVerdict {
    /// Recomputed figures.
    pub metrics: StaffMetrics,
    /// Whether every per-staff threshold holds.
    pub passed: bool,
}

/// Whether one requested day off was respected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationCheck {
    /// Staff id.
    pub staff: usize,
    /// Requested day.
    pub day: usize,
    /// `true` if the staff member has no shift that day.
    pub honored: bool,
}

/// Staff assigned to one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCoverage {
    /// Day index.
    pub day: usize,
    /// Shift.
    pub shift: ShiftKind,
    /// Assigned staff, ascending.
    pub staff: Vec<usize>,
}

/// Outcome of verifying a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// One verdict per staff member, by id.
    pub staff: Vec<StaffVerdict>,
    /// One check per requested (staff, day), staff then day ascending.
    pub vacations: Vec<VacationCheck>,
    /// Every slot, day then shift order.
    pub coverage: Vec<SlotCoverage>,
    /// Slots with no staff.
    pub uncovered: Vec<(usize, ShiftKind)>,
    /// Slots with more than one staff.
    pub double_booked: Vec<(usize, ShiftKind)>,
    /// Structured audit of the same schedule.
    pub violations: Vec<ConstraintViolation>,
    /// Aggregate verdict.
    pub accepted: bool,
}

impl VerificationReport {
    /// Plain-language explanation, one sentence or table row per line.
    pub fn explanation(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for verdict in &self.staff {
            let m = &verdict.metrics;
            lines.push(format!(
                "Staff {}: {} total shifts, {} night shifts, max consecutive working days: {}, total days off: {}",
                m.staff, m.total_shifts, m.night_shifts, m.max_consecutive_working_days, m.total_days_off
            ));
            if verdict.passed {
                lines.push(format!("Staff {} meets all constraints.", m.staff));
            } else {
                lines.push(format!("Staff {} does not meet all constraints.", m.staff));
            }
        }

        for check in &self.vacations {
            if check.honored {
                lines.push(format!(
                    "Staff {}'s vacation request for Day {} is honored.",
                    check.staff, check.day
                ));
            } else {
                lines.push(format!(
                    "Violation: Staff {} was scheduled on a requested day off: Day {}.",
                    check.staff, check.day
                ));
            }
        }

        lines.push("Detailed Shift Coverage:".to_string());
        let mut current_day = None;
        for slot in &self.coverage {
            if current_day != Some(slot.day) {
                lines.push(format!("  Day {}:", slot.day));
                current_day = Some(slot.day);
            }
            if slot.staff.is_empty() {
                lines.push(format!("    Shift {}: No staff assigned (Uncovered)", slot.shift));
            } else {
                let names: Vec<String> = slot.staff.iter().map(|p| format!("Staff {p}")).collect();
                lines.push(format!("    Shift {}: {}", slot.shift, names.join(", ")));
            }
        }

        if self.uncovered.is_empty() {
            lines.push("All shifts are covered.".to_string());
        } else {
            lines.push(format!("Uncovered shifts: {}", slot_list(&self.uncovered)));
        }
        if !self.double_booked.is_empty() {
            lines.push(format!(
                "Double-booked shifts: {}",
                slot_list(&self.double_booked)
            ));
        }

        if self.accepted {
            lines.push(
                "Overall, the schedule satisfies all constraints and vacation requests.".to_string(),
            );
        } else {
            lines.push(
                "The schedule does not satisfy all constraints and/or vacation requests."
                    .to_string(),
            );
        }
        lines
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explanation().join("\n"))
    }
}

fn slot_list(slots: &[(usize, ShiftKind)]) -> String {
    slots
        .iter()
        .map(|(day, shift)| format!("Day {day} Shift {shift}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Independent checker for finished schedules.
///
/// # Example
/// ```
/// use u_roster::config::RosterConfig;
/// use u_roster::models::{ScheduleModel, VacationRequests};
/// use u_roster::verify::Verifier;
///
/// let config = RosterConfig::new(1, 3);
/// let schedule = ScheduleModel::new(1, 3);
/// let report = Verifier::new(&config)
///     .verify(&schedule, &VacationRequests::new())
///     .unwrap();
/// assert!(!report.accepted);
/// assert_eq!(report.uncovered.len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Verifier<'a> {
    config: &'a RosterConfig,
}

impl<'a> Verifier<'a> {
    /// Creates a verifier for a configuration.
    pub fn new(config: &'a RosterConfig) -> Self {
        Self { config }
    }

    /// Verifies a schedule against the configured thresholds and vacations.
    ///
    /// # Errors
    /// [`StructuralError`] if the schedule's shape doesn't match the
    /// configuration or a vacation entry is out of range.
    pub fn verify(
        &self,
        schedule: &ScheduleModel,
        vacations: &VacationRequests,
    ) -> Result<VerificationReport, StructuralError> {
        validate_schedule(schedule, self.config, ValidationMode::Audit)?;
        validate_vacations(vacations, self.config)?;

        let constraints = &self.config.constraints;
        let staff: Vec<StaffVerdict> = (0..self.config.staff)
            .map(|p| {
                let metrics = StaffMetrics::calculate(schedule, p);
                StaffVerdict {
                    metrics,
                    passed: metrics.meets(constraints),
                }
            })
            .collect();

        let vacation_checks: Vec<VacationCheck> = vacations
            .pairs()
            .map(|(staff, day)| VacationCheck {
                staff,
                day,
                honored: !schedule.worked(staff, day),
            })
            .collect();

        let coverage: Vec<SlotCoverage> = schedule
            .slots()
            .map(|(day, shift, assigned)| SlotCoverage {
                day,
                shift,
                staff: assigned.iter().copied().collect(),
            })
            .collect();
        let uncovered: Vec<(usize, ShiftKind)> = coverage
            .iter()
            .filter(|slot| slot.staff.is_empty())
            .map(|slot| (slot.day, slot.shift))
            .collect();
        let double_booked: Vec<(usize, ShiftKind)> = coverage
            .iter()
            .filter(|slot| slot.staff.len() > 1)
            .map(|slot| (slot.day, slot.shift))
            .collect();

        let violations = ConstraintEvaluator::new(self.config, vacations).audit(schedule)?;

        let accepted = staff.iter().all(|v| v.passed)
            && uncovered.is_empty()
            && double_booked.is_empty()
            && vacation_checks.iter().all(|c| c.honored);

        info!(
            event = "verify",
            accepted = accepted,
            uncovered = uncovered.len(),
            violations = violations.len(),
        );

        Ok(VerificationReport {
            staff,
            vacations: vacation_checks,
            coverage,
            uncovered,
            double_booked,
            violations,
            accepted,
        })
    }

    /// Parses a textual schedule report and verifies it.
    ///
    /// # Errors
    /// [`RosterError::Parse`] for a malformed report,
    /// [`RosterError::Structural`] for out-of-range content.
    pub fn verify_report(&self, text: &str) -> Result<VerificationReport, RosterError> {
        let report = ScheduleReport::parse(text)?;
        let vacations = report.vacations.clone();
        let schedule = report.into_schedule(self.config)?;
        Ok(self.verify(&schedule, &vacations)?)
    }
}
