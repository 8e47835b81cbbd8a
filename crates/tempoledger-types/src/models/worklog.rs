//! Worklog entries imported from JIRA/Tempo.
//!
//! Read-only to the engine: synchronization writes them, reports read them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: i64 = 3600;

/// A single imported worklog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worklog {
    pub id: i64,
    pub issue_key: String,
    pub issue_summary: String,
    pub author_email: String,
    pub author_display_name: String,
    pub time_spent_seconds: i64,
    /// Calendar date the work started (timezone-naive, as dated upstream)
    pub started: NaiveDate,
    pub jira_instance: String,
    pub epic_key: Option<String>,
    pub epic_name: Option<String>,
    /// False when the entry was classified non-billable upstream
    pub billable: bool,
    /// Work package the entry was logged against (cascade level 1)
    pub package_template_id: Option<i64>,
    /// Issue-specific rate override (cascade level 2)
    pub issue_rate: Option<Decimal>,
    /// Epic-level rate override (cascade level 3)
    pub epic_rate: Option<Decimal>,
}

impl Worklog {
    /// Time spent as decimal hours
    pub fn hours(&self) -> Decimal {
        Decimal::from(self.time_spent_seconds) / Decimal::from(SECONDS_PER_HOUR)
    }

    /// Project key prefix: the substring of `issue_key` before the first
    /// `-`, or the whole key when there is no dash
    pub fn project_prefix(&self) -> &str {
        match self.issue_key.split_once('-') {
            Some((prefix, _)) => prefix,
            None => &self.issue_key,
        }
    }
}
