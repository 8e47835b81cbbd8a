//! Internal cost resolution.
//!
//! Resolves the effective hourly cost of a user at a date: a valid
//! time-bounded override wins over the role default. Cost resolution never
//! fails - an unconfigured user resolves to zero with an explicit flag, so
//! a bulk aggregation over thousands of worklogs cannot be aborted by one
//! missing record.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::snapshot::Snapshot;

/// Where a resolved cost came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostSource {
    /// A valid `hourly_cost_override` on the user's cost record
    Override,
    /// The default cost of the role on the user's cost record
    RoleDefault,
    /// No valid cost record, or a record with no role and no override.
    /// The numeric cost is zero and callers must surface the flag instead
    /// of presenting the zero as a real cost.
    Unconfigured,
}

/// Result of a cost lookup
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CostResolution {
    pub hourly_cost: Decimal,
    pub source: CostSource,
}

impl CostResolution {
    fn unconfigured() -> Self {
        Self {
            hourly_cost: Decimal::ZERO,
            source: CostSource::Unconfigured,
        }
    }

    pub fn is_unconfigured(&self) -> bool {
        self.source == CostSource::Unconfigured
    }
}

/// Resolve the effective hourly cost for `user_email` at `at`.
///
/// Picks the cost record whose validity window contains `at`. If a data
/// error left several windows covering the same instant, the most recently
/// created record wins (highest id) - a defensive tie-break, the write
/// boundary is supposed to reject overlaps.
pub fn resolve_cost(user_email: &str, at: NaiveDate, snapshot: &Snapshot) -> CostResolution {
    let record = snapshot
        .user_cost_records(user_email)
        .iter()
        .filter(|r| r.is_valid_at(at))
        .max_by_key(|r| r.id);

    let Some(record) = record else {
        tracing::debug!(user = user_email, date = %at, "no valid cost record");
        return CostResolution::unconfigured();
    };

    if let Some(override_cost) = record.hourly_cost_override {
        return CostResolution {
            hourly_cost: override_cost,
            source: CostSource::Override,
        };
    }

    let role = record.role_id.and_then(|id| snapshot.role(id));
    match role {
        Some(role) => CostResolution {
            hourly_cost: role.default_hourly_cost,
            source: CostSource::RoleDefault,
        },
        None => {
            tracing::debug!(user = user_email, "cost record has no resolvable role");
            CostResolution::unconfigured()
        }
    }
}
