//! Error and warning types for the billing engine.
//!
//! Missing-but-expected-absent data (unconfigured cost, no resolvable rate)
//! is business-meaningful and flows through results as typed values, never
//! as errors. Only store failures and request-level misuse raise
//! [`EngineError`]; data-integrity findings degrade into [`ReportWarning`]s
//! so a report can always render partially.

use thiserror::Error;

use crate::store::StoreError;

/// Hard failures that abort a report request
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("billing client not found: {client_id}")]
    ClientNotFound { client_id: i64 },

    #[error("billing project {project_id} does not belong to client {client_id}")]
    ProjectClientMismatch { project_id: i64, client_id: i64 },
}

/// Category of a per-row warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A worklog author has no valid cost record; cost counted as zero
    UnconfiguredCost,
    /// No cascade level produced a rate; the worklog cannot be billed
    NoRate,
    /// Two contract mappings claim the same epic/prefix; first one kept
    MappingCollision,
    /// A stored contract violates the type/field invariant
    InvalidContract,
}

/// A single warning attached to a report
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReportWarning {
    pub kind: WarningKind,
    /// What the warning is about (user email, issue key, mapping key...)
    pub subject: String,
    pub message: String,
}

impl ReportWarning {
    pub fn new(kind: WarningKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Accumulator for warnings gathered while computing a report.
///
/// Reports never abort on configuration gaps; they collect warnings here
/// and keep computing, so one bad contract cannot blank a whole report.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct WarningSet {
    warnings: Vec<ReportWarning>,
}

impl WarningSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: ReportWarning) {
        self.warnings.push(warning);
    }

    pub fn warn(&mut self, kind: WarningKind, subject: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ReportWarning::new(kind, subject, message));
    }

    /// Merge another set into this one
    pub fn merge(&mut self, other: WarningSet) {
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportWarning> {
        self.warnings.iter()
    }

    /// Count of warnings of a given kind
    pub fn count_of(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}
