//! Financial analytics over imported worklogs.
//!
//! Aggregation, margins, budget burn & exhaustion forecast, and loss
//! detection. Every computation is read-only and request-scoped: a pure
//! function of a worklog set plus a configuration snapshot, so the same
//! inputs always produce identical reports.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tempoledger_types::{Contract, DateRange, Worklog};

use crate::snapshot::Snapshot;

pub mod aggregate;
pub mod burn;
pub mod loss;
pub mod margin;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, AggregateRow, Aggregation, GroupBy, GroupKey, RevenueMode};
pub use burn::{burn_report, compute_burn, BurnOutcome, BurnReport, BurnResult, Forecast, NotComputableReason};
pub use loss::{compute_losses, DeviationRow, LossReport, OverdeliveryRow, UnbilledGroup, UnbilledReport};
pub use margin::{contract_margins, grouped_margins, MarginReport, MarginRow};

/// Planned hours for a contract.
///
/// `estimated_hours` wins when present; otherwise derived as
/// `budget_amount / hourly_sell_rate`. `None` when neither basis exists -
/// downstream overdelivery and deviation figures report N/A in that case.
pub fn planned_hours(contract: &Contract) -> Option<Decimal> {
    if let Some(estimated) = contract.estimated_hours {
        return Some(estimated);
    }
    match (contract.budget_amount, contract.hourly_sell_rate) {
        (Some(budget), Some(rate)) if !rate.is_zero() => Some(budget / rate),
        _ => None,
    }
}

/// Complete financial picture for a period: margins, burn, losses.
///
/// Convenience orchestrator for the dashboard endpoint; each report can
/// also be computed on its own.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FinancialOverview {
    pub period: DateRange,
    pub as_of: NaiveDate,
    pub margins: MarginReport,
    pub burn: BurnReport,
    pub losses: LossReport,
}

impl FinancialOverview {
    pub fn compute(
        worklogs: &[Worklog],
        period: DateRange,
        as_of: NaiveDate,
        snapshot: &Snapshot,
    ) -> Self {
        Self {
            period,
            as_of,
            margins: contract_margins(worklogs, period, snapshot),
            burn: burn_report(worklogs, as_of, snapshot),
            losses: compute_losses(worklogs, period, snapshot),
        }
    }
}
