//! Per-staff roster metrics.
//!
//! Recomputes workload and rest figures for one staff member straight from
//! the schedule, independently of the constraint rules, so the verifier is
//! a second opinion rather than a restatement of the evaluator.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total shifts | Days with any shift |
//! | Night shifts | Days with a night shift |
//! | Max consecutive working days | Longest run of days with any shift |
//! | Total days off | Days with no shift |
//! | Shortest off gap | Shortest off run between two working days |

use serde::{Deserialize, Serialize};

use crate::models::{ConstraintSet, ScheduleModel, ShiftKind};

/// Workload and rest figures of one staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMetrics {
    /// Staff id.
    pub staff: usize,
    /// Days worked.
    pub total_shifts: usize,
    /// Days with a night shift.
    pub night_shifts: usize,
    /// Longest working-day run.
    pub max_consecutive_working_days: usize,
    /// Days without any shift.
    pub total_days_off: usize,
    /// Shortest off run between two working runs; `None` without such a gap.
    pub shortest_off_gap: Option<usize>,
}

impl StaffMetrics {
    /// Computes the metrics of `staff` from a schedule.
    pub fn calculate(schedule: &ScheduleModel, staff: usize) -> Self {
        let mut total_shifts = 0;
        let mut night_shifts = 0;
        let mut max_run = 0;
        let mut run = 0;
        let mut days_off = 0;
        let mut shortest_off_gap: Option<usize> = None;
        let mut off_run = 0;
        let mut has_worked = false;

        for day in 0..schedule.days() {
            let shifts = schedule.shifts_worked_by(staff, day);

            if shifts.is_empty() {
                days_off += 1;
                off_run += 1;
                run = 0;
            } else {
                if has_worked && off_run > 0 {
                    shortest_off_gap = Some(shortest_off_gap.map_or(off_run, |g| g.min(off_run)));
                }
                has_worked = true;
                off_run = 0;
                total_shifts += 1;
                night_shifts += usize::from(shifts.contains(&ShiftKind::Night));
                run += 1;
                max_run = max_run.max(run);
            }
        }

        Self {
            staff,
            total_shifts,
            night_shifts,
            max_consecutive_working_days: max_run,
            total_days_off: days_off,
            shortest_off_gap,
        }
    }

    /// Whether every per-staff threshold holds.
    pub fn meets(&self, constraints: &ConstraintSet) -> bool {
        self.total_shifts <= constraints.max_total_shifts
            && self.night_shifts <= constraints.max_night_shifts
            && self.max_consecutive_working_days <= constraints.max_consecutive_working_days
            && self.total_days_off >= constraints.min_consecutive_days_off
            && self
                .shortest_off_gap
                .is_none_or(|gap| gap >= constraints.min_consecutive_days_off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn working_on(days: usize, staff_days: &[(usize, ShiftKind)]) -> ScheduleModel {
        let mut s = ScheduleModel::new(days, 2);
        for &(day, shift) in staff_days {
            s.assign(day, shift, 0).unwrap();
        }
        s
    }

    #[test]
    fn test_idle_staff() {
        let s = working_on(7, &[]);
        let m = StaffMetrics::calculate(&s, 0);
        assert_eq!(m.total_shifts, 0);
        assert_eq!(m.max_consecutive_working_days, 0);
        assert_eq!(m.total_days_off, 7);
        assert_eq!(m.shortest_off_gap, None);
        assert!(m.meets(&ConstraintSet::default()));
    }

    #[test]
    fn test_counts_days_and_nights() {
        let s = working_on(
            7,
            &[
                (0, ShiftKind::Morning),
                (0, ShiftKind::Night),
                (1, ShiftKind::Night),
            ],
        );
        let m = StaffMetrics::calculate(&s, 0);
        assert_eq!(m.total_shifts, 2);
        assert_eq!(m.night_shifts, 2);
        assert_eq!(m.max_consecutive_working_days, 2);
        assert_eq!(m.total_days_off, 5);
    }

    #[test]
    fn test_double_shift_days_count_once() {
        let s = working_on(
            7,
            &[0, 1, 2]
                .map(|d| [(d, ShiftKind::Morning), (d, ShiftKind::Afternoon)])
                .concat(),
        );
        let m = StaffMetrics::calculate(&s, 0);
        assert_eq!(m.total_shifts, 3);
        assert!(m.meets(&ConstraintSet::default()));
    }

    #[test]
    fn test_runs_and_gaps() {
        // W W . W W W . . W
        let s = working_on(
            9,
            &[0, 1, 3, 4, 5, 8]
                .map(|d| (d, ShiftKind::Afternoon)),
        );
        let m = StaffMetrics::calculate(&s, 0);
        assert_eq!(m.max_consecutive_working_days, 3);
        assert_eq!(m.shortest_off_gap, Some(1));
        assert_eq!(m.total_days_off, 3);
        assert!(!m.meets(&ConstraintSet::default()));
        assert!(m.meets(
            &ConstraintSet::default()
                .with_min_consecutive_days_off(1)
                .with_max_total_shifts(6)
        ));
    }

    #[test]
    fn test_edge_off_runs_are_not_gaps() {
        // . W W .
        let s = working_on(4, &[(1, ShiftKind::Morning), (2, ShiftKind::Morning)]);
        let m = StaffMetrics::calculate(&s, 0);
        assert_eq!(m.shortest_off_gap, None);
        assert!(m.meets(&ConstraintSet::default()));
    }

    #[test]
    fn test_workload_thresholds() {
        let s = working_on(
            3,
            &[
                (0, ShiftKind::Night),
                (1, ShiftKind::Night),
                (2, ShiftKind::Night),
            ],
        );
        let m = StaffMetrics::calculate(&s, 0);
        assert_eq!(m.night_shifts, 3);
        assert!(!m.meets(&ConstraintSet::default().with_min_consecutive_days_off(0)));
        assert!(m.meets(
            &ConstraintSet::default()
                .with_min_consecutive_days_off(0)
                .with_max_night_shifts(3)
        ));
    }
}
