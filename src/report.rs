//! Textual schedule report.
//!
//! The interchange format between solvers and the verifier:
//!
//! ```text
//! Vacation Requirements:
//! Staff 0 requested days off: 0, 1, 5
//! Staff 2 requested days off: 3
//!
//! Generated Schedule:
//! Day 0, Staff 1, Shift M
//! Day 0, Staff 2, Shift A
//! ```
//!
//! Vacation lines are in ascending staff order with ascending days;
//! schedule lines are ordered by day, then shift, then staff. The parser
//! ignores blank lines and surrounding whitespace and accepts shift codes
//! or full names. Any line it cannot read rejects the whole report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RosterConfig;
use crate::error::{ReportParseError, StructuralError};
use crate::models::{ScheduleModel, ShiftKind, VacationRequests};
use crate::validation::validate_vacations;

const VACATION_HEADER: &str = "Vacation Requirements:";
const SCHEDULE_HEADER: &str = "Generated Schedule:";

/// One `Day d, Staff p, Shift S` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Day index.
    pub day: usize,
    /// Shift.
    pub shift: ShiftKind,
    /// Staff id.
    pub staff: usize,
}

/// A parsed or generated schedule report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// Vacation section.
    pub vacations: VacationRequests,
    /// Schedule section, day then shift then staff ascending.
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Vacations,
    Schedule,
}

impl ScheduleReport {
    /// Builds a report from a schedule and the vacations it was solved for.
    pub fn from_schedule(schedule: &ScheduleModel, vacations: &VacationRequests) -> Self {
        let mut entries: Vec<ReportEntry> = schedule
            .assignments()
            .map(|(day, shift, staff)| ReportEntry { day, shift, staff })
            .collect();
        entries.sort();
        Self {
            vacations: vacations.clone(),
            entries,
        }
    }

    /// Report lines, without trailing newlines.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![VACATION_HEADER.to_string()];
        for (staff, days) in self.vacations.iter() {
            let days: Vec<String> = days.iter().map(usize::to_string).collect();
            lines.push(format!("Staff {staff} requested days off: {}", days.join(", ")));
        }
        lines.push(String::new());
        lines.push(SCHEDULE_HEADER.to_string());
        for e in &self.entries {
            lines.push(format!("Day {}, Staff {}, Shift {}", e.day, e.staff, e.shift));
        }
        lines
    }

    /// Parses a report.
    ///
    /// # Errors
    /// [`ReportParseError`] naming the first bad line, a line outside any
    /// section, a repeated header or vacation entry, or a missing section
    /// (reported one past the last line).
    pub fn parse(text: &str) -> Result<Self, ReportParseError> {
        let mut report = Self::default();
        let mut section = Section::None;
        let mut line_count = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            line_count = line_no;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match (section, line) {
                (Section::None, VACATION_HEADER) => section = Section::Vacations,
                (Section::Vacations, SCHEDULE_HEADER) => section = Section::Schedule,
                (_, VACATION_HEADER) | (_, SCHEDULE_HEADER) => {
                    return Err(ReportParseError::new(line_no, line, "unexpected section header"));
                }
                (Section::None, _) => {
                    return Err(ReportParseError::new(line_no, line, "line before any section"));
                }
                (Section::Vacations, _) => {
                    let (staff, days) = parse_vacation_line(line)
                        .ok_or_else(|| ReportParseError::new(line_no, line, "malformed vacation line"))?;
                    if report.vacations.iter().any(|(s, _)| s == staff) {
                        return Err(ReportParseError::new(
                            line_no,
                            line,
                            "duplicate vacation entry",
                        ));
                    }
                    report.vacations.request(staff, days);
                }
                (Section::Schedule, _) => {
                    let entry = parse_schedule_line(line)
                        .ok_or_else(|| ReportParseError::new(line_no, line, "malformed schedule line"))?;
                    report.entries.push(entry);
                }
            }
        }

        match section {
            Section::Schedule => {
                report.entries.sort();
                report.entries.dedup();
                Ok(report)
            }
            Section::None => Err(ReportParseError::new(
                line_count + 1,
                "",
                "missing vacation section",
            )),
            Section::Vacations => Err(ReportParseError::new(
                line_count + 1,
                "",
                "missing schedule section",
            )),
        }
    }

    /// Builds the schedule model described by the report.
    ///
    /// # Errors
    /// [`StructuralError`] for a day, staff id or vacation outside `config`.
    pub fn into_schedule(self, config: &RosterConfig) -> Result<ScheduleModel, StructuralError> {
        validate_vacations(&self.vacations, config)?;
        let mut schedule = ScheduleModel::new(config.days, config.staff);
        for e in self.entries {
            schedule.assign(e.day, e.shift, e.staff)?;
        }
        Ok(schedule)
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.to_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// `Staff p requested days off: d, d, ...` (the day list may be empty).
fn parse_vacation_line(line: &str) -> Option<(usize, Vec<usize>)> {
    let rest = line.strip_prefix("Staff ")?;
    let (staff, days) = rest.split_once(" requested days off:")?;
    let staff = staff.trim().parse().ok()?;
    let days = days.trim();
    if days.is_empty() {
        return Some((staff, Vec::new()));
    }
    let days = days
        .split(',')
        .map(|d| d.trim().parse().ok())
        .collect::<Option<Vec<usize>>>()?;
    Some((staff, days))
}

/// `Day d, Staff p, Shift S`.
fn parse_schedule_line(line: &str) -> Option<ReportEntry> {
    let mut parts = line.split(',').map(str::trim);
    let day = parts.next()?.strip_prefix("Day ")?.trim().parse().ok()?;
    let staff = parts.next()?.strip_prefix("Staff ")?.trim().parse().ok()?;
    let shift = parts.next()?.strip_prefix("Shift ")?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ReportEntry { day, shift, staff })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScheduleReport {
        let schedule = ScheduleModel::new(2, 3)
            .with_assignment(1, ShiftKind::Night, 2)
            .unwrap()
            .with_assignment(0, ShiftKind::Afternoon, 1)
            .unwrap()
            .with_assignment(0, ShiftKind::Morning, 2)
            .unwrap()
            .with_assignment(0, ShiftKind::Morning, 0)
            .unwrap();
        let vacations = VacationRequests::new()
            .with_request(2, [0])
            .with_request(0, [1]);
        ScheduleReport::from_schedule(&schedule, &vacations)
    }

    #[test]
    fn test_render_order() {
        assert_eq!(
            sample().to_lines(),
            vec![
                "Vacation Requirements:",
                "Staff 0 requested days off: 1",
                "Staff 2 requested days off: 0",
                "",
                "Generated Schedule:",
                "Day 0, Staff 0, Shift M",
                "Day 0, Staff 2, Shift M",
                "Day 0, Staff 1, Shift A",
                "Day 1, Staff 2, Shift N",
            ]
        );
    }

    #[test]
    fn test_parse_rendered() {
        let report = sample();
        let parsed = ScheduleReport::parse(&report.to_string()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_parse_lenient_whitespace_and_names() {
        let text = "\n  Vacation Requirements:  \n\
                    Staff 1 requested days off:\n\
                    \n\
                    Generated Schedule:\n\
                    \tDay 0, Staff 0, Shift Morning\n\
                    Day 0,Staff 1,Shift night\n";
        let report = ScheduleReport::parse(text).unwrap();
        assert_eq!(report.vacations.days_for(1).count(), 0);
        assert_eq!(report.vacations.staff_count(), 1);
        assert_eq!(
            report.entries,
            vec![
                ReportEntry { day: 0, shift: ShiftKind::Morning, staff: 0 },
                ReportEntry { day: 0, shift: ShiftKind::Night, staff: 1 },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        let cases = [
            ("Day 0, Staff 0, Shift M\n", 1, "line before any section"),
            (
                "Vacation Requirements:\nStaff x requested days off: 1\nGenerated Schedule:\n",
                2,
                "malformed vacation line",
            ),
            (
                "Vacation Requirements:\nStaff 0 requested days off: 1\nStaff 0 requested days off: 2\nGenerated Schedule:\n",
                3,
                "duplicate vacation entry",
            ),
            (
                "Vacation Requirements:\nGenerated Schedule:\nDay 0, Staff 0, Shift X\n",
                3,
                "malformed schedule line",
            ),
            (
                "Vacation Requirements:\nGenerated Schedule:\nDay 0, Staff 0\n",
                3,
                "malformed schedule line",
            ),
            (
                "Vacation Requirements:\nGenerated Schedule:\nVacation Requirements:\n",
                3,
                "unexpected section header",
            ),
            ("Vacation Requirements:\nStaff 0 requested days off: 1\n", 3, "missing schedule section"),
            ("", 1, "missing vacation section"),
        ];

        for (text, line, reason) in cases {
            let err = ScheduleReport::parse(text).unwrap_err();
            assert_eq!(err.line, line, "{text:?}");
            assert_eq!(err.reason, reason, "{text:?}");
        }
    }

    #[test]
    fn test_into_schedule() {
        let config = RosterConfig::new(2, 3);
        let schedule = sample().into_schedule(&config).unwrap();
        assert_eq!(schedule.assignment_count(), 4);
        assert_eq!(schedule.occupancy(0, ShiftKind::Morning), 2);
        assert!(schedule.worked(2, 1));
    }

    #[test]
    fn test_into_schedule_out_of_range() {
        let config = RosterConfig::new(1, 3);
        let err = sample().into_schedule(&config).unwrap_err();
        assert!(matches!(
            err,
            StructuralError::VacationOutOfRange { .. } | StructuralError::DayOutOfRange { .. }
        ));

        let report = ScheduleReport::parse(
            "Vacation Requirements:\nGenerated Schedule:\nDay 0, Staff 7, Shift A\n",
        )
        .unwrap();
        assert!(matches!(
            report.into_schedule(&RosterConfig::new(1, 3)),
            Err(StructuralError::StaffOutOfRange { staff: 7, .. })
        ));
    }
}
