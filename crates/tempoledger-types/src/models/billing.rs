//! Billing configuration: clients, billing projects, package templates.
//!
//! These entities carry the rate values consulted by the sell-rate cascade.
//! Every per-level rate is nullable; `None` means "no override at this
//! level", which is distinct from a configured zero rate (non-billable
//! work).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A billable client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingClient {
    pub id: i64,
    pub name: String,
    /// ISO currency code carried through to invoices (no conversion here)
    pub currency: String,
    /// Client-level default hourly rate (cascade level 5)
    pub default_hourly_rate: Option<Decimal>,
}

/// Routes worklogs to a billing project by (JIRA instance, project prefix)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectKeyMapping {
    pub jira_instance: String,
    pub project_key: String,
}

/// A billing project under a client.
///
/// The project level is the only cascade level that may carry a discount
/// percentage, applied multiplicatively after the base rate is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingProject {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    /// Project-level hourly rate (cascade level 4)
    pub hourly_rate: Option<Decimal>,
    /// Discount in percent (0-100) applied to whichever base rate wins
    pub discount_pct: Option<Decimal>,
    /// JIRA project keys billed under this project
    pub mappings: Vec<ProjectKeyMapping>,
}

/// A work package template with an agreed package rate (cascade level 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageTemplate {
    pub id: i64,
    pub name: String,
    pub hourly_rate: Option<Decimal>,
}

/// Tenant-wide billing defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingDefaults {
    /// Tenant-wide default hourly rate, the cascade floor (level 6).
    /// `None` means worklogs with no rate at any level resolve to "no rate".
    pub default_hourly_rate: Option<Decimal>,
}
