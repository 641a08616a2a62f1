//! Rostering domain models.
//!
//! Provides the data types shared by every consumer of the constraint
//! model: the roster itself, shift kinds, vacation requests, rule
//! thresholds and violation records. Pure data; the rules live in
//! [`crate::evaluation`].
//!
//! # Domain Mappings
//!
//! | u-roster | Hospital | Retail | Call Center |
//! |----------|----------|--------|-------------|
//! | Staff | Nurse | Clerk | Agent |
//! | ShiftKind | Ward shift | Store shift | Phone shift |
//! | VacationRequests | Leave requests | Days off | PTO |
//! | ScheduleModel | Duty roster | Staff plan | Rota |

mod constraint;
mod schedule;
mod shift;
mod vacation;

pub use constraint::{ConstraintSet, ConstraintViolation, ViolationKind};
pub use schedule::{ScheduleModel, ValidationMode};
pub use shift::ShiftKind;
pub use vacation::VacationRequests;
