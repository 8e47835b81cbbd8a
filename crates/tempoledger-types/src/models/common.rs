//! Tenant and period primitives shared across the engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tenant identifier.
///
/// Always supplied by the authentication layer and threaded explicitly
/// through store calls - never parsed out of a request payload.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CompanyId(pub i64);

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "company-{}", self.0)
    }
}

/// Inclusive calendar-date range for report periods.
///
/// Dates are timezone-naive, matching how worklogs are dated upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when `date` falls inside the range (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, minimum 1
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days().max(0) + 1
    }
}
