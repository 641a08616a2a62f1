//! Per-rule predicates.
//!
//! Each function checks one rule family against a schedule and returns
//! every violation it finds, in ascending (staff, day, shift) order. These
//! are the only place rule semantics are written down: the scalar score and
//! the structured audit are both built from their output.
//!
//! # Run semantics
//!
//! For one staff member the horizon splits into maximal *runs* of worked
//! and not-worked days.
//! - A working run longer than the limit is flagged once per day beyond
//!   the limit, including runs that reach the end of the horizon.
//! - An off run is a *gap* only when work precedes and follows it. A gap
//!   shorter than the minimum is flagged once, on the day work resumes.
//! - Independently of gaps, a staff member with fewer days off in total
//!   than the minimum is flagged once for the whole horizon.

use tracing::trace;

use crate::models::{
    ConstraintSet, ConstraintViolation, ScheduleModel, ShiftKind, VacationRequests, ViolationKind,
};

/// Coverage: every slot needs at least one staff.
pub fn coverage(schedule: &ScheduleModel) -> Vec<ConstraintViolation> {
    let found: Vec<_> = schedule
        .slots()
        .filter(|(_, _, staff)| staff.is_empty())
        .map(|(day, shift, _)| {
            ConstraintViolation::slot(
                ViolationKind::UncoveredShift,
                day,
                shift,
                format!("Day {day}, shift {shift} has no staff assigned"),
            )
        })
        .collect();
    trace!(rule = "coverage", violations = found.len());
    found
}

/// Vacation honoring: no shift on a requested day off.
///
/// One violation per (staff, day), however many shifts that day.
pub fn vacations(schedule: &ScheduleModel, requests: &VacationRequests) -> Vec<ConstraintViolation> {
    let found: Vec<_> = requests
        .pairs()
        .filter(|&(staff, day)| schedule.worked(staff, day))
        .map(|(staff, day)| {
            let shifts = join_shifts(&schedule.shifts_worked_by(staff, day));
            ConstraintViolation::staff_day(
                ViolationKind::VacationViolation,
                staff,
                day,
                format!("Staff {staff} works shift {shifts} on requested day off {day}"),
            )
        })
        .collect();
    trace!(rule = "vacations", violations = found.len());
    found
}

/// Max consecutive working days, flagged per day past the limit.
pub fn consecutive_working_days(
    schedule: &ScheduleModel,
    constraints: &ConstraintSet,
) -> Vec<ConstraintViolation> {
    let limit = constraints.max_consecutive_working_days;
    let mut found = Vec::new();

    for staff in 0..schedule.staff_count() {
        let mut run = 0usize;
        for (day, worked) in schedule.worked_days(staff).into_iter().enumerate() {
            if !worked {
                run = 0;
                continue;
            }
            run += 1;
            if run > limit {
                found.push(ConstraintViolation::staff_day(
                    ViolationKind::MaxConsecutiveWorkingDaysExceeded,
                    staff,
                    day,
                    format!(
                        "Staff {staff} works day {day} as day {run} of a run (limit {limit})"
                    ),
                ));
            }
        }
    }
    trace!(rule = "consecutive_working_days", violations = found.len());
    found
}

/// Minimum consecutive days off between two working runs, and minimum
/// total days off.
pub fn min_days_off(schedule: &ScheduleModel, constraints: &ConstraintSet) -> Vec<ConstraintViolation> {
    let min = constraints.min_consecutive_days_off;
    let mut found = Vec::new();

    for staff in 0..schedule.staff_count() {
        let worked_days = schedule.worked_days(staff);
        let total_off = worked_days.iter().filter(|w| !**w).count();
        if total_off < min {
            found.push(ConstraintViolation::staff_total(
                ViolationKind::MinDaysOffViolated,
                staff,
                format!("Staff {staff} has {total_off} day(s) off in total (minimum {min})"),
            ));
        }

        let mut has_worked = false;
        let mut off_run = 0usize;
        for (day, worked) in worked_days.into_iter().enumerate() {
            if !worked {
                off_run += 1;
                continue;
            }
            if has_worked && off_run > 0 && off_run < min {
                found.push(ConstraintViolation::staff_day(
                    ViolationKind::MinDaysOffViolated,
                    staff,
                    day,
                    format!(
                        "Staff {staff} returns on day {day} after only {off_run} day(s) off (minimum {min})"
                    ),
                ));
            }
            has_worked = true;
            off_run = 0;
        }
    }
    trace!(rule = "min_days_off", violations = found.len());
    found
}

/// Total and night shift limits over the horizon.
///
/// The total counts days worked, so two shifts on one day count once.
/// Nights count days with a night shift.
pub fn workload(schedule: &ScheduleModel, constraints: &ConstraintSet) -> Vec<ConstraintViolation> {
    let mut found = Vec::new();

    for staff in 0..schedule.staff_count() {
        let (total, nights) = (0..schedule.days())
            .map(|day| schedule.shifts_worked_by(staff, day))
            .filter(|shifts| !shifts.is_empty())
            .fold((0usize, 0usize), |(total, nights), shifts| {
                let night = shifts.iter().any(|s| s.is_night());
                (total + 1, nights + usize::from(night))
            });

        if total > constraints.max_total_shifts {
            found.push(ConstraintViolation::staff_total(
                ViolationKind::MaxShiftsExceeded,
                staff,
                format!(
                    "Staff {staff} works {total} shifts (limit {})",
                    constraints.max_total_shifts
                ),
            ));
        }
        if nights > constraints.max_night_shifts {
            found.push(ConstraintViolation::staff_total(
                ViolationKind::MaxNightShiftsExceeded,
                staff,
                format!(
                    "Staff {staff} works {nights} night shifts (limit {})",
                    constraints.max_night_shifts
                ),
            ));
        }
    }
    trace!(rule = "workload", violations = found.len());
    found
}

/// One staff per slot.
pub fn duplicates(schedule: &ScheduleModel) -> Vec<ConstraintViolation> {
    let found: Vec<_> = schedule
        .slots()
        .filter(|(_, _, staff)| staff.len() > 1)
        .map(|(day, shift, staff)| {
            let names: Vec<String> = staff.iter().map(|s| format!("Staff {s}")).collect();
            ConstraintViolation::slot(
                ViolationKind::DuplicateAssignment,
                day,
                shift,
                format!("Day {day}, shift {shift} is assigned to {}", names.join(", ")),
            )
        })
        .collect();
    trace!(rule = "duplicates", violations = found.len());
    found
}

fn join_shifts(shifts: &[ShiftKind]) -> String {
    shifts
        .iter()
        .map(|s| s.code())
        .collect::<Vec<_>>()
        .join("+")
}
