//! Schedule (roster) model.
//!
//! A schedule maps every shift slot `(day, shift)` to the set of staff
//! working it. A valid roster has exactly one staff per slot, but the
//! model tolerates zero or many so that broken candidates can be audited
//! instead of rejected.
//!
//! Schedules are produced by decoding a GA chromosome, by reading an exact
//! solver's model, or by parsing a report. Consumers only read them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ShiftKind;
use crate::error::StructuralError;

/// How strictly slot occupancy is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Candidate generation: more than one staff in a slot is an error.
    Strict,
    /// Auditing: duplicates are tolerated and reported as violations.
    Audit,
}

/// A roster over a fixed horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleModel {
    days: usize,
    staff_count: usize,
    /// Slot `day * ShiftKind::COUNT + shift.index()` → staff ids.
    slots: Vec<BTreeSet<usize>>,
}

impl ScheduleModel {
    /// Creates an empty schedule (every slot uncovered).
    pub fn new(days: usize, staff_count: usize) -> Self {
        Self {
            days,
            staff_count,
            slots: vec![BTreeSet::new(); days * ShiftKind::COUNT],
        }
    }

    /// Horizon length in days.
    #[inline]
    pub fn days(&self) -> usize {
        self.days
    }

    /// Number of staff ids the schedule may reference.
    #[inline]
    pub fn staff_count(&self) -> usize {
        self.staff_count
    }

    /// Assigns `staff` to `(day, shift)`.
    ///
    /// Assigning the same staff twice to one slot is a no-op.
    pub fn assign(&mut self, day: usize, shift: ShiftKind, staff: usize) -> Result<(), StructuralError> {
        self.check_day(day)?;
        if staff >= self.staff_count {
            return Err(StructuralError::StaffOutOfRange {
                staff,
                staff_count: self.staff_count,
            });
        }
        self.slots[Self::slot_index(day, shift)].insert(staff);
        Ok(())
    }

    /// Builder form of [`assign`](Self::assign).
    pub fn with_assignment(mut self, day: usize, shift: ShiftKind, staff: usize) -> Result<Self, StructuralError> {
        self.assign(day, shift, staff)?;
        Ok(self)
    }

    /// Checks the slot table shape, then slot occupancy.
    ///
    /// Both modes reject a slot table whose length does not match the
    /// horizon and staff ids outside the roster; a deserialized schedule can
    /// carry either. In [`ValidationMode::Strict`] any slot holding more than
    /// one staff then fails with [`StructuralError::DoubleBooked`].
    pub fn validate_structure(&self, mode: ValidationMode) -> Result<(), StructuralError> {
        let expected = self.days * ShiftKind::COUNT;
        if self.slots.len() != expected {
            return Err(StructuralError::SlotCountMismatch {
                expected,
                actual: self.slots.len(),
            });
        }
        if let Some(&staff) = self.slots.iter().flatten().find(|&&s| s >= self.staff_count) {
            return Err(StructuralError::StaffOutOfRange {
                staff,
                staff_count: self.staff_count,
            });
        }
        if mode == ValidationMode::Audit {
            return Ok(());
        }
        for (day, shift, staff) in self.slots() {
            if staff.len() > 1 {
                return Err(StructuralError::DoubleBooked {
                    day,
                    shift,
                    staff: staff.iter().copied().collect(),
                });
            }
        }
        Ok(())
    }

    /// Staff assigned to a slot (ascending). Empty for out-of-range days.
    pub fn staff_in(&self, day: usize, shift: ShiftKind) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .get(Self::slot_index(day, shift))
            .filter(|_| day < self.days)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Number of staff assigned to a slot.
    pub fn occupancy(&self, day: usize, shift: ShiftKind) -> usize {
        self.staff_in(day, shift).count()
    }

    /// Shifts the staff member works on `day`, in shift order (empty if off).
    pub fn shifts_worked_by(&self, staff: usize, day: usize) -> Vec<ShiftKind> {
        if day >= self.days {
            return Vec::new();
        }
        ShiftKind::ALL
            .into_iter()
            .filter(|&shift| {
                self.slots
                    .get(Self::slot_index(day, shift))
                    .is_some_and(|slot| slot.contains(&staff))
            })
            .collect()
    }

    /// Whether the staff member works any shift on `day`.
    #[inline]
    pub fn worked(&self, staff: usize, day: usize) -> bool {
        !self.shifts_worked_by(staff, day).is_empty()
    }

    /// Worked / not-worked flag per day for one staff member.
    pub fn worked_days(&self, staff: usize) -> Vec<bool> {
        (0..self.days).map(|day| self.worked(staff, day)).collect()
    }

    /// All slots in day then shift order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, ShiftKind, &BTreeSet<usize>)> {
        self.slots.iter().enumerate().map(|(idx, staff)| {
            let day = idx / ShiftKind::COUNT;
            let shift = ShiftKind::ALL[idx % ShiftKind::COUNT];
            (day, shift, staff)
        })
    }

    /// Every `(day, shift, staff)` triple: day, then shift, then staff ascending.
    pub fn assignments(&self) -> impl Iterator<Item = (usize, ShiftKind, usize)> + '_ {
        self.slots()
            .flat_map(|(day, shift, staff)| staff.iter().map(move |&s| (day, shift, s)))
    }

    /// Total number of staff-slot assignments.
    pub fn assignment_count(&self) -> usize {
        self.slots.iter().map(BTreeSet::len).sum()
    }

    /// Whether nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.assignment_count() == 0
    }

    fn check_day(&self, day: usize) -> Result<(), StructuralError> {
        if day >= self.days {
            return Err(StructuralError::DayOutOfRange {
                day,
                days: self.days,
            });
        }
        Ok(())
    }

    #[inline]
    fn slot_index(day: usize, shift: ShiftKind) -> usize {
        day * ShiftKind::COUNT + shift.index()
    }
}
