//! Vacation requests.
//!
//! A mapping from staff id to the days that staff member must not work.
//! Staff absent from the mapping have no request. Stored ordered so that
//! iteration (and therefore reports and audits) is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Requested days off per staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRequests {
    requests: BTreeMap<usize, BTreeSet<usize>>,
}

impl VacationRequests {
    /// Creates an empty request set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds requested days for a staff member (merged with existing days).
    pub fn with_request(mut self, staff: usize, days: impl IntoIterator<Item = usize>) -> Self {
        self.request(staff, days);
        self
    }

    /// Adds requested days for a staff member in place.
    ///
    /// A staff member with an empty day list is still recorded, so the
    /// request shows up (empty) in reports.
    pub fn request(&mut self, staff: usize, days: impl IntoIterator<Item = usize>) {
        self.requests.entry(staff).or_default().extend(days);
    }

    /// Whether `staff` asked for `day` off.
    #[inline]
    pub fn is_requested(&self, staff: usize, day: usize) -> bool {
        self.requests
            .get(&staff)
            .is_some_and(|days| days.contains(&day))
    }

    /// Requested days for one staff member (ascending).
    pub fn days_for(&self, staff: usize) -> impl Iterator<Item = usize> + '_ {
        self.requests.get(&staff).into_iter().flatten().copied()
    }

    /// All requests in ascending staff order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeSet<usize>)> {
        self.requests.iter().map(|(&staff, days)| (staff, days))
    }

    /// All (staff, day) pairs, staff then day ascending.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.requests
            .iter()
            .flat_map(|(&staff, days)| days.iter().map(move |&day| (staff, day)))
    }

    /// Number of staff with a request entry.
    pub fn staff_count(&self) -> usize {
        self.requests.len()
    }

    /// Whether no staff has a request entry.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl FromIterator<(usize, Vec<usize>)> for VacationRequests {
    fn from_iter<I: IntoIterator<Item = (usize, Vec<usize>)>>(iter: I) -> Self {
        let mut requests = Self::new();
        for (staff, days) in iter {
            requests.request(staff, days);
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_sorted() {
        let v = VacationRequests::new()
            .with_request(2, [3])
            .with_request(0, [5, 0, 1]);

        let staff: Vec<usize> = v.iter().map(|(s, _)| s).collect();
        assert_eq!(staff, vec![0, 2]);
        assert_eq!(v.days_for(0).collect::<Vec<_>>(), vec![0, 1, 5]);
        assert_eq!(v.pairs().count(), 4);
    }

    #[test]
    fn test_is_requested() {
        let v: VacationRequests = vec![(0, vec![0, 1, 5]), (2, vec![3])].into_iter().collect();
        assert!(v.is_requested(0, 1));
        assert!(!v.is_requested(0, 2));
        assert!(!v.is_requested(4, 1));
        assert_eq!(v.days_for(4).count(), 0);
    }

    #[test]
    fn test_merge_and_empty_entry() {
        let mut v = VacationRequests::new();
        v.request(1, [2]);
        v.request(1, [2, 4]);
        v.request(3, []);
        assert_eq!(v.days_for(1).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(v.staff_count(), 2);
        assert!(!v.is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let v = VacationRequests::new().with_request(0, [0, 1]);
        let json = serde_json::to_string(&v).unwrap();
        let back: VacationRequests = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
