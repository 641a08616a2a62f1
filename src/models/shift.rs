//! Shift kinds.
//!
//! The shift list is fixed: every day has one Morning, one Afternoon and
//! one Night slot. Order matters for display and for the slot layout of
//! encodings, not for constraint semantics (except that Night is the
//! shift counted by the night-shift limit).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StructuralError;

/// One of the three daily shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShiftKind {
    /// Morning shift (`M`).
    Morning,
    /// Afternoon shift (`A`).
    Afternoon,
    /// Night shift (`N`).
    Night,
}

impl ShiftKind {
    /// All shifts in slot order.
    pub const ALL: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Night];

    /// Number of shifts per day.
    pub const COUNT: usize = Self::ALL.len();

    /// Position within a day (0-based).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ShiftKind::Morning => 0,
            ShiftKind::Afternoon => 1,
            ShiftKind::Night => 2,
        }
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Single-letter code used in reports.
    pub fn code(self) -> &'static str {
        match self {
            ShiftKind::Morning => "M",
            ShiftKind::Afternoon => "A",
            ShiftKind::Night => "N",
        }
    }

    /// Whether this shift counts toward the night-shift limit.
    #[inline]
    pub fn is_night(self) -> bool {
        self == ShiftKind::Night
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ShiftKind {
    type Err = StructuralError;

    /// Accepts the report code (`M`, `A`, `N`) or the full name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "morning" => Ok(ShiftKind::Morning),
            "a" | "afternoon" => Ok(ShiftKind::Afternoon),
            "n" | "night" => Ok(ShiftKind::Night),
            _ => Err(StructuralError::UnknownShift(s.to_string())),
        }
    }
}
