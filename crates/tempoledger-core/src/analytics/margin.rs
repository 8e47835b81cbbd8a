//! Margin computation per contract, epic, or client.
//!
//! margin = revenue - cost, margin % = margin / revenue. Revenue that
//! cannot be determined (contract violating its type invariant, zero
//! revenue denominator) yields `None` fields, never a fabricated zero or a
//! divide-by-zero.

use rust_decimal::Decimal;

use tempoledger_types::{ContractType, DateRange, Worklog};

use crate::analytics::aggregate::{aggregate, GroupBy, GroupKey, RevenueMode};
use crate::analytics::planned_hours;
use crate::error::{WarningKind, WarningSet};
use crate::snapshot::Snapshot;

/// One margin report row
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarginRow {
    pub key: GroupKey,
    pub label: String,
    pub hours: Decimal,
    pub cost: Decimal,
    /// `None` when revenue cannot be determined for this row
    pub revenue: Option<Decimal>,
    pub margin: Option<Decimal>,
    /// Margin as a percentage of revenue; `None` when revenue is zero or
    /// undetermined
    pub margin_pct: Option<Decimal>,
    /// Fixed-price only: actual / planned hours as a percentage, when
    /// planned hours are computable
    pub completion_pct: Option<Decimal>,
}

/// Margin report for one grouping dimension
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarginReport {
    pub group_by: GroupBy,
    pub rows: Vec<MarginRow>,
    pub warnings: WarningSet,
}

/// Per-contract margins over a period.
///
/// Cost comes from the aggregator's internal-cost sum over each contract's
/// mapped worklogs. Revenue follows the contract type: time & material is
/// hours x sell rate, fixed price is the flat budget annotated with a
/// completion percentage. Every contract gets a row, including ones with no
/// worklogs in range.
pub fn contract_margins(
    worklogs: &[Worklog],
    range: DateRange,
    snapshot: &Snapshot,
) -> MarginReport {
    let aggregation = aggregate(worklogs, GroupBy::Contract, range, snapshot, RevenueMode::CostOnly);
    let mut warnings = aggregation.warnings.clone();
    let mut rows = Vec::new();

    for contract in snapshot.contracts_sorted() {
        let key = GroupKey::Contract(contract.id);
        let (hours, cost) = aggregation
            .row(&key)
            .map(|r| (r.hours, r.cost))
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));

        let (revenue, completion_pct) = match contract.contract_type {
            ContractType::TimeMaterial => match contract.hourly_sell_rate {
                Some(rate) => (Some(hours * rate), None),
                None => {
                    warnings.warn(
                        WarningKind::InvalidContract,
                        format!("contract-{}", contract.id),
                        "time_material contract without hourly_sell_rate; revenue not computed",
                    );
                    (None, None)
                }
            },
            ContractType::FixedPrice => match contract.budget_amount {
                Some(budget) => {
                    let completion = planned_hours(contract).and_then(|planned| {
                        if planned.is_zero() {
                            None
                        } else {
                            Some(hours / planned * Decimal::ONE_HUNDRED)
                        }
                    });
                    (Some(budget), completion)
                }
                None => {
                    warnings.warn(
                        WarningKind::InvalidContract,
                        format!("contract-{}", contract.id),
                        "fixed_price contract without budget_amount; revenue not computed",
                    );
                    (None, None)
                }
            },
        };

        let margin = revenue.map(|r| r - cost);
        let margin_pct = match (revenue, margin) {
            (Some(r), Some(m)) if !r.is_zero() => Some(m / r * Decimal::ONE_HUNDRED),
            _ => None,
        };

        rows.push(MarginRow {
            key,
            label: contract.name.clone(),
            hours,
            cost,
            revenue,
            margin,
            margin_pct,
            completion_pct,
        });
    }

    MarginReport {
        group_by: GroupBy::Contract,
        rows,
        warnings,
    }
}

/// Margins grouped by epic, client, or user.
///
/// These views cut across contracts, so revenue attribution follows each
/// worklog's own resolved rate via the cascade rather than a contract's
/// blanket rate.
pub fn grouped_margins(
    worklogs: &[Worklog],
    group_by: GroupBy,
    range: DateRange,
    snapshot: &Snapshot,
) -> MarginReport {
    let aggregation = aggregate(worklogs, group_by, range, snapshot, RevenueMode::PerWorklogRate);

    let rows = aggregation
        .rows
        .iter()
        .map(|row| {
            let revenue = row.revenue;
            let margin = revenue.map(|r| r - row.cost);
            let margin_pct = match (revenue, margin) {
                (Some(r), Some(m)) if !r.is_zero() => Some(m / r * Decimal::ONE_HUNDRED),
                _ => None,
            };
            MarginRow {
                key: row.key.clone(),
                label: row.label.clone(),
                hours: row.hours,
                cost: row.cost,
                revenue,
                margin,
                margin_pct,
                completion_pct: None,
            }
        })
        .collect();

    MarginReport {
        group_by,
        rows,
        warnings: aggregation.warnings,
    }
}
