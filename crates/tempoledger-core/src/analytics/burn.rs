//! Budget burn rate and exhaustion forecast.
//!
//! Linear extrapolation only: burn rate is average budget consumption per
//! elapsed day, the forecast projects that pace forward. Contracts missing
//! the required inputs come back as an explicit `NotComputable`, never as a
//! silent zero.

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use tempoledger_types::{Contract, ContractType, DateRange, Worklog};

use crate::analytics::aggregate::{aggregate, GroupBy, GroupKey, RevenueMode};
use crate::analytics::planned_hours;
use crate::error::WarningSet;
use crate::snapshot::Snapshot;

/// Projected budget exhaustion
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum Forecast {
    Date(NaiveDate),
    /// Burn rate is zero: the budget never exhausts at the current pace
    Indeterminate,
}

/// Burn figures for one computable contract
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BurnResult {
    pub contract_id: i64,
    pub contract_name: String,
    pub budget_amount: Decimal,
    /// Budget consumed to date, valued at the contract's revenue rate
    pub budget_consumed: Decimal,
    pub elapsed_days: i64,
    pub burn_rate_per_day: Decimal,
    pub forecast: Forecast,
    /// Forecast lands beyond the contract end date
    pub at_risk: bool,
}

/// Why a contract's burn could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotComputableReason {
    /// No `budget_amount`: nothing to burn against
    MissingBudget,
    /// No way to value consumed hours (no planned hours for fixed price,
    /// no sell rate for time & material)
    MissingRateBasis,
}

impl std::fmt::Display for NotComputableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBudget => write!(f, "no budget_amount defined"),
            Self::MissingRateBasis => write!(f, "no rate basis to value consumed hours"),
        }
    }
}

/// Per-contract burn outcome
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BurnOutcome {
    Computed(BurnResult),
    NotComputable {
        contract_id: i64,
        contract_name: String,
        reason: NotComputableReason,
    },
}

/// Burn report across all contracts
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BurnReport {
    pub as_of: NaiveDate,
    pub rows: Vec<BurnOutcome>,
    pub warnings: WarningSet,
}

/// Compute burn for one contract given its actual hours to date.
///
/// `budget_consumed` tracks the client's budget being spent, valued at the
/// revenue rate: `actual_hours x (budget / planned_hours)` for fixed price
/// when planned hours are known, `actual_hours x hourly_sell_rate` for
/// time & material. Elapsed days are clamped to a minimum of 1 so day-one
/// reports do not divide by zero.
pub fn compute_burn(contract: &Contract, actual_hours: Decimal, as_of: NaiveDate) -> BurnOutcome {
    let not_computable = |reason| BurnOutcome::NotComputable {
        contract_id: contract.id,
        contract_name: contract.name.clone(),
        reason,
    };

    let Some(budget) = contract.budget_amount else {
        return not_computable(NotComputableReason::MissingBudget);
    };

    let consumed_rate = match contract.contract_type {
        ContractType::FixedPrice => match planned_hours(contract) {
            Some(planned) if !planned.is_zero() => budget / planned,
            _ => return not_computable(NotComputableReason::MissingRateBasis),
        },
        ContractType::TimeMaterial => match contract.hourly_sell_rate {
            Some(rate) => rate,
            None => return not_computable(NotComputableReason::MissingRateBasis),
        },
    };
    let budget_consumed = actual_hours * consumed_rate;

    let elapsed_days = (as_of - contract.start_date).num_days().max(1);
    let burn_rate_per_day = budget_consumed / Decimal::from(elapsed_days);

    let forecast = if burn_rate_per_day.is_zero() {
        Forecast::Indeterminate
    } else {
        let remaining = budget - budget_consumed;
        // Already-exhausted budgets clamp to as_of
        let days = (remaining / burn_rate_per_day)
            .floor()
            .to_i64()
            .unwrap_or(0)
            .max(0);
        Forecast::Date(as_of + Duration::days(days))
    };

    let at_risk = match forecast {
        Forecast::Date(date) => date > contract.end_date,
        Forecast::Indeterminate => false,
    };

    BurnOutcome::Computed(BurnResult {
        contract_id: contract.id,
        contract_name: contract.name.clone(),
        budget_amount: budget,
        budget_consumed,
        elapsed_days,
        burn_rate_per_day,
        forecast,
        at_risk,
    })
}

/// Burn outcomes for every contract in the snapshot.
///
/// Actual hours are summed per contract in a single aggregation pass over
/// worklogs from the earliest contract start date to `as_of`. A
/// `NotComputable` contract never blanks the report; it appears as its own
/// marker row.
pub fn burn_report(worklogs: &[Worklog], as_of: NaiveDate, snapshot: &Snapshot) -> BurnReport {
    let contracts = snapshot.contracts_sorted();
    let range_start = contracts
        .iter()
        .map(|c| c.start_date)
        .min()
        .unwrap_or(as_of);
    let aggregation = aggregate(
        worklogs,
        GroupBy::Contract,
        DateRange::new(range_start, as_of),
        snapshot,
        RevenueMode::CostOnly,
    );

    let rows = contracts
        .into_iter()
        .map(|contract| {
            let actual_hours = aggregation
                .row(&GroupKey::Contract(contract.id))
                .map(|r| r.hours)
                .unwrap_or(Decimal::ZERO);
            compute_burn(contract, actual_hours, as_of)
        })
        .collect();

    BurnReport {
        as_of,
        rows,
        warnings: aggregation.warnings,
    }
}
