//! Schedule verification and explanation.
//!
//! Provides an independent second check of finished schedules and a
//! plain-language account of the result.
//!
//! # Verdict
//!
//! A schedule is accepted when every staff member meets the per-staff
//! thresholds ([`StaffMetrics::meets`]), every slot is covered, no slot is
//! double-booked and every vacation request is honored.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

mod metrics;
mod verifier;

pub use metrics::StaffMetrics;
pub use verifier::{SlotCoverage, StaffVerdict, VacationCheck, VerificationReport, Verifier};
