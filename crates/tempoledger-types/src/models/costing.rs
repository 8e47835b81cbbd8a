//! Internal cost configuration: roles and per-user cost assignments

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A role with a default internal hourly cost.
///
/// Role names are unique per tenant; the write boundary enforces that a
/// role cannot be deleted while user cost records still reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    /// Default internal cost per hour (>= 0, enforced on write)
    pub default_hourly_cost: Decimal,
}

/// A per-user cost assignment, optionally time-bounded.
///
/// Multiple records per user represent cost changes over time. The validity
/// window is half-open: `[valid_from, valid_to)`. Both bounds `None` means
/// always valid. The write boundary rejects overlapping active windows for
/// the same user; if a data error leaves an overlap anyway, the resolver
/// falls back to the highest-id record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCost {
    /// Monotonic id; doubles as the creation-order tie-break when a data
    /// error leaves two windows covering the same instant
    pub id: i64,
    pub user_email: String,
    /// Assigned role; `None` means the user's cost is unconfigured unless
    /// an override is present
    pub role_id: Option<i64>,
    /// Overrides the role default when set
    pub hourly_cost_override: Option<Decimal>,
    /// Inclusive start of validity (None = open start)
    pub valid_from: Option<NaiveDate>,
    /// Exclusive end of validity (None = open end)
    pub valid_to: Option<NaiveDate>,
}

impl UserCost {
    /// True when the validity window contains `date`.
    ///
    /// `valid_from` is inclusive, `valid_to` is exclusive: a record with
    /// `valid_to = 2025-03-01` no longer applies on 2025-03-01.
    pub fn is_valid_at(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.valid_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.valid_to {
            if date >= to {
                return false;
            }
        }
        true
    }
}
