//! Rostering constraints and violation records.
//!
//! The rule families are fixed; only their thresholds are configurable:
//!
//! | Rule | Parameter | Violation |
//! |------|-----------|-----------|
//! | Coverage (every slot staffed) | — | `UncoveredShift` |
//! | Vacation honoring | `VacationRequests` | `VacationViolation` |
//! | Max consecutive working days | `max_consecutive_working_days` | `MaxConsecutiveWorkingDaysExceeded` |
//! | Min consecutive days off | `min_consecutive_days_off` | `MinDaysOffViolated` |
//! | Max total shifts | `max_total_shifts` | `MaxShiftsExceeded` |
//! | Max night shifts | `max_night_shifts` | `MaxNightShiftsExceeded` |
//! | One staff per slot | — | `DuplicateAssignment` |
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering: A review of
//! applications, methods and models"

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ShiftKind;

/// Thresholds for the fixed rule families.
///
/// Coverage and vacation honoring are implicit: coverage needs no
/// parameter, vacations come from `VacationRequests`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSet {
    /// Maximum days worked per staff over the horizon.
    pub max_total_shifts: usize,
    /// Maximum night shifts per staff over the horizon.
    pub max_night_shifts: usize,
    /// Longest allowed run of consecutive working days.
    pub max_consecutive_working_days: usize,
    /// Shortest allowed run of days off between two working runs.
    /// Also the minimum total number of days off per staff.
    pub min_consecutive_days_off: usize,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            max_total_shifts: 5,
            max_night_shifts: 2,
            max_consecutive_working_days: 3,
            min_consecutive_days_off: 2,
        }
    }
}

impl ConstraintSet {
    /// Creates the default constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total shift limit.
    pub fn with_max_total_shifts(mut self, limit: usize) -> Self {
        self.max_total_shifts = limit;
        self
    }

    /// Sets the night shift limit.
    pub fn with_max_night_shifts(mut self, limit: usize) -> Self {
        self.max_night_shifts = limit;
        self
    }

    /// Sets the consecutive working day limit.
    pub fn with_max_consecutive_working_days(mut self, limit: usize) -> Self {
        self.max_consecutive_working_days = limit;
        self
    }

    /// Sets the minimum days off between working runs.
    pub fn with_min_consecutive_days_off(mut self, min: usize) -> Self {
        self.min_consecutive_days_off = min;
        self
    }
}

/// Classification of rule violations.
///
/// Declaration order is the rule order used to sort audits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A slot has no staff.
    UncoveredShift,
    /// Staff works on a requested day off.
    VacationViolation,
    /// A working run is longer than allowed.
    MaxConsecutiveWorkingDaysExceeded,
    /// An off run between two working runs is too short, or too few days
    /// off in total.
    MinDaysOffViolated,
    /// Staff works more shifts than allowed.
    MaxShiftsExceeded,
    /// Staff works more night shifts than allowed.
    MaxNightShiftsExceeded,
    /// A slot has more than one staff.
    DuplicateAssignment,
}

impl ViolationKind {
    /// All kinds in rule order.
    pub const ALL: [ViolationKind; 7] = [
        ViolationKind::UncoveredShift,
        ViolationKind::VacationViolation,
        ViolationKind::MaxConsecutiveWorkingDaysExceeded,
        ViolationKind::MinDaysOffViolated,
        ViolationKind::MaxShiftsExceeded,
        ViolationKind::MaxNightShiftsExceeded,
        ViolationKind::DuplicateAssignment,
    ];

    /// Penalty contributed to the scalar score by one violation.
    ///
    /// Every weight is positive, so a score of zero means no violation.
    pub fn weight(self) -> u32 {
        match self {
            ViolationKind::UncoveredShift => 10,
            ViolationKind::DuplicateAssignment => 10,
            ViolationKind::VacationViolation => 5,
            ViolationKind::MaxShiftsExceeded => 3,
            ViolationKind::MaxNightShiftsExceeded => 3,
            ViolationKind::MaxConsecutiveWorkingDaysExceeded => 2,
            ViolationKind::MinDaysOffViolated => 1,
        }
    }

    /// Whether the violation concerns a slot rather than a staff member.
    pub fn is_slot_level(self) -> bool {
        matches!(
            self,
            ViolationKind::UncoveredShift | ViolationKind::DuplicateAssignment
        )
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::UncoveredShift => "uncovered shift",
            ViolationKind::VacationViolation => "vacation violation",
            ViolationKind::MaxConsecutiveWorkingDaysExceeded => "too many consecutive working days",
            ViolationKind::MinDaysOffViolated => "too few consecutive days off",
            ViolationKind::MaxShiftsExceeded => "too many shifts",
            ViolationKind::MaxNightShiftsExceeded => "too many night shifts",
            ViolationKind::DuplicateAssignment => "duplicate assignment",
        };
        f.write_str(name)
    }
}

/// A single rule violation found in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Violated rule.
    pub kind: ViolationKind,
    /// Staff concerned (`None` for slot-level rules).
    pub staff: Option<usize>,
    /// Day concerned (`None` for horizon-wide counts).
    pub day: Option<usize>,
    /// Shift concerned (slot-level rules only).
    pub shift: Option<ShiftKind>,
    /// Human-readable description.
    pub message: String,
}

impl ConstraintViolation {
    /// Creates a slot-level violation.
    pub fn slot(kind: ViolationKind, day: usize, shift: ShiftKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            staff: None,
            day: Some(day),
            shift: Some(shift),
            message: message.into(),
        }
    }

    /// Creates a violation tied to one staff member on one day.
    pub fn staff_day(kind: ViolationKind, staff: usize, day: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            staff: Some(staff),
            day: Some(day),
            shift: None,
            message: message.into(),
        }
    }

    /// Creates a horizon-wide violation for one staff member.
    pub fn staff_total(kind: ViolationKind, staff: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            staff: Some(staff),
            day: None,
            shift: None,
            message: message.into(),
        }
    }

    /// Penalty weight of this violation.
    #[inline]
    pub fn weight(&self) -> u32 {
        self.kind.weight()
    }

    /// Audit sort key: staff, day, rule kind, shift.
    ///
    /// Slot-level violations (no staff) sort first; `None` sorts before `Some`.
    pub fn sort_key(&self) -> (Option<usize>, Option<usize>, ViolationKind, Option<ShiftKind>) {
        (self.staff, self.day, self.kind, self.shift)
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let c = ConstraintSet::default();
        assert_eq!(c.max_total_shifts, 5);
        assert_eq!(c.max_night_shifts, 2);
        assert_eq!(c.max_consecutive_working_days, 3);
        assert_eq!(c.min_consecutive_days_off, 2);
    }

    #[test]
    fn test_builder() {
        let c = ConstraintSet::new()
            .with_max_total_shifts(6)
            .with_max_night_shifts(3)
            .with_max_consecutive_working_days(4)
            .with_min_consecutive_days_off(1);
        assert_eq!(c.max_total_shifts, 6);
        assert_eq!(c.max_night_shifts, 3);
        assert_eq!(c.max_consecutive_working_days, 4);
        assert_eq!(c.min_consecutive_days_off, 1);
    }

    #[test]
    fn test_weights_positive() {
        for kind in ViolationKind::ALL {
            assert!(kind.weight() > 0, "{kind:?} must carry a penalty");
        }
        assert_eq!(ViolationKind::VacationViolation.weight(), 5);
        assert_eq!(ViolationKind::MaxConsecutiveWorkingDaysExceeded.weight(), 2);
        assert_eq!(ViolationKind::MinDaysOffViolated.weight(), 1);
    }

    #[test]
    fn test_kind_order_matches_rule_order() {
        let mut sorted = ViolationKind::ALL;
        sorted.sort();
        assert_eq!(sorted, ViolationKind::ALL);
    }

    #[test]
    fn test_sort_key_slot_first() {
        let slot = ConstraintViolation::slot(ViolationKind::UncoveredShift, 6, ShiftKind::Night, "x");
        let staff = ConstraintViolation::staff_day(ViolationKind::VacationViolation, 0, 0, "y");
        assert!(slot.sort_key() < staff.sort_key());
    }

    #[test]
    fn test_constraint_set_partial_toml_defaults() {
        let c: ConstraintSet = toml::from_str("max_night_shifts = 1").unwrap();
        assert_eq!(c.max_night_shifts, 1);
        assert_eq!(c.max_total_shifts, 5);
    }
}
