//! Billable sell-rate resolution.
//!
//! Six-level fallback cascade, first non-null value wins:
//! package -> issue -> epic -> project -> client default -> tenant default.
//! The cascade is an ordered table of accessors rather than nested
//! conditionals, so adding a level is a one-entry change.
//!
//! A worklog where every level is null resolves to [`RateResolution::NoRate`]
//! rather than zero: zero is a legitimate configured rate (non-billable
//! work) and must stay distinguishable from misconfiguration.

use rust_decimal::Decimal;

use tempoledger_types::{BillingClient, BillingProject, PackageTemplate, Worklog};

use crate::snapshot::Snapshot;

/// Cascade level that produced a rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLevel {
    Package,
    Issue,
    Epic,
    Project,
    Client,
    TenantDefault,
}

/// Everything the cascade consults for one worklog
#[derive(Debug, Clone, Copy)]
pub struct RateContext<'a> {
    pub worklog: &'a Worklog,
    pub package: Option<&'a PackageTemplate>,
    pub project: Option<&'a BillingProject>,
    pub client: Option<&'a BillingClient>,
    pub tenant_default: Option<Decimal>,
}

impl<'a> RateContext<'a> {
    /// Assemble the context for a worklog from the snapshot: package by id,
    /// billing project (and its client) by project-key mapping, tenant
    /// default from billing defaults
    pub fn for_worklog(worklog: &'a Worklog, snapshot: &'a Snapshot) -> Self {
        let package = worklog
            .package_template_id
            .and_then(|id| snapshot.package(id));
        let project = snapshot.resolve_billing_project(worklog);
        let client = project.and_then(|p| snapshot.client(p.client_id));
        Self {
            worklog,
            package,
            project,
            client,
            tenant_default: snapshot.defaults.default_hourly_rate,
        }
    }
}

/// The cascade, in evaluation order
const CASCADE: [(RateLevel, fn(&RateContext) -> Option<Decimal>); 6] = [
    (RateLevel::Package, |ctx| ctx.package.and_then(|p| p.hourly_rate)),
    (RateLevel::Issue, |ctx| ctx.worklog.issue_rate),
    (RateLevel::Epic, |ctx| ctx.worklog.epic_rate),
    (RateLevel::Project, |ctx| ctx.project.and_then(|p| p.hourly_rate)),
    (RateLevel::Client, |ctx| ctx.client.and_then(|c| c.default_hourly_rate)),
    (RateLevel::TenantDefault, |ctx| ctx.tenant_default),
];

/// A successfully resolved rate
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ResolvedRate {
    pub hourly_rate: Decimal,
    /// Level whose base rate won
    pub level: RateLevel,
    /// True when a project-level discount was applied to the base rate
    pub discount_applied: bool,
}

/// Outcome of rate resolution
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RateResolution {
    Rate(ResolvedRate),
    /// Every cascade level was null: the worklog cannot be billed
    NoRate,
}

impl RateResolution {
    pub fn hourly_rate(&self) -> Option<Decimal> {
        match self {
            RateResolution::Rate(resolved) => Some(resolved.hourly_rate),
            RateResolution::NoRate => None,
        }
    }
}

/// Resolve the billable sell rate for a worklog context.
///
/// Evaluates the cascade in order and takes the first non-null base rate.
/// The project-level discount percentage, when present, is applied
/// multiplicatively afterwards: `rate * (1 - discount/100)` - the one
/// documented project-level pricing adjustment.
pub fn resolve_rate(ctx: &RateContext) -> RateResolution {
    for (level, accessor) in &CASCADE {
        let Some(base_rate) = accessor(ctx) else {
            continue;
        };

        let discount = ctx
            .project
            .and_then(|p| p.discount_pct)
            .filter(|d| !d.is_zero());
        let hourly_rate = match discount {
            Some(pct) => base_rate * (Decimal::ONE - pct / Decimal::ONE_HUNDRED),
            None => base_rate,
        };

        tracing::debug!(
            issue = %ctx.worklog.issue_key,
            level = ?level,
            rate = %hourly_rate,
            "rate resolved"
        );
        return RateResolution::Rate(ResolvedRate {
            hourly_rate,
            level: *level,
            discount_applied: discount.is_some(),
        });
    }
    RateResolution::NoRate
}
