//! Error types for rostering.
//!
//! Three independent failure families, plus a crate-level wrapper:
//!
//! - [`StructuralError`]: a schedule or vacation set has a malformed shape.
//!   Fatal; rejected before any scoring or auditing.
//! - [`ReportParseError`]: a textual schedule report does not follow the
//!   interchange format. The whole report is rejected.
//! - [`ConfigError`]: configuration could not be loaded or is inconsistent.
//!
//! Infeasibility and timeouts are *outcomes* of a solve, not errors; see
//! [`crate::solver::SolveOutcome`]. Soft constraint violations are never
//! errors either; they surface through scoring and auditing.

use thiserror::Error;

use crate::models::ShiftKind;

/// A schedule, chromosome, or vacation set with an invalid shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Day index outside the scheduling horizon.
    #[error("day {day} is outside the horizon of {days} days")]
    DayOutOfRange { day: usize, days: usize },

    /// Staff id outside `[0, staff)`.
    #[error("staff {staff} is outside the roster of {staff_count} staff")]
    StaffOutOfRange { staff: usize, staff_count: usize },

    /// Schedule horizon differs from the configured one.
    #[error("schedule spans {actual} days, configuration expects {expected}")]
    HorizonMismatch { expected: usize, actual: usize },

    /// Schedule staff count differs from the configured one.
    #[error("schedule has {actual} staff, configuration expects {expected}")]
    StaffCountMismatch { expected: usize, actual: usize },

    /// Shift name not in the fixed shift list.
    #[error("unknown shift name '{0}'")]
    UnknownShift(String),

    /// More than one staff member in a slot where exactly one is required.
    #[error("day {day}, shift {shift} is assigned to {} staff", staff.len())]
    DoubleBooked {
        day: usize,
        shift: ShiftKind,
        staff: Vec<usize>,
    },

    /// Schedule slot table does not match its horizon.
    #[error("schedule holds {actual} slots, its horizon needs {expected}")]
    SlotCountMismatch { expected: usize, actual: usize },

    /// Encoded candidate has the wrong number of genes.
    #[error("encoded schedule has {actual} slots, expected {expected}")]
    EncodingLength { expected: usize, actual: usize },

    /// Vacation request naming a staff id or day outside the problem.
    #[error("vacation request for staff {staff} on day {day} is outside the problem")]
    VacationOutOfRange { staff: usize, day: usize },
}

/// A line of a schedule report that does not match the interchange format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("report line {line}: {reason} ({content:?})")]
pub struct ReportParseError {
    /// 1-based line number (one past the last line for missing sections).
    pub line: usize,
    /// Offending line, trimmed.
    pub content: String,
    /// What was wrong with it.
    pub reason: String,
}

impl ReportParseError {
    pub(crate) fn new(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main error type for rostering operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Parse(#[from] ReportParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for rostering operations.
pub type Result<T> = std::result::Result<T, RosterError>;
