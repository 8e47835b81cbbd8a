//! Loss detection: unbilled hours, overdelivery, schedule deviation.
//!
//! Unbilled hours are worklogs whose epic/project prefix maps to no
//! contract, valued at internal cost (there is no rate to apply).
//! Overdelivery is fixed-price work beyond planned hours. Deviation is the
//! signed gap between planned and actual hours. Contracts whose planned
//! hours cannot be derived report N/A, never a fabricated number.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use tempoledger_types::{ContractType, DateRange, Worklog};

use crate::analytics::aggregate::{aggregate, GroupBy, GroupKey, RevenueMode};
use crate::analytics::planned_hours;
use crate::costs::resolve_cost;
use crate::error::WarningSet;
use crate::snapshot::Snapshot;

/// Hours and cost for one unbilled group
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UnbilledGroup {
    pub key: String,
    pub label: String,
    pub hours: Decimal,
    pub cost: Decimal,
}

/// Worklogs with no contract mapping, grouped two ways
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UnbilledReport {
    pub total_hours: Decimal,
    pub total_cost: Decimal,
    pub by_user: Vec<UnbilledGroup>,
    /// Grouped by epic key, or project prefix when the worklog has no epic
    pub by_source: Vec<UnbilledGroup>,
}

/// A fixed-price contract delivered beyond (or without computable) plan
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OverdeliveryRow {
    pub contract_id: i64,
    pub contract_name: String,
    pub actual_hours: Decimal,
    /// `None` = planned hours not computable, rendered as N/A
    pub planned_hours: Option<Decimal>,
    pub delta_hours: Option<Decimal>,
    /// Delta valued at the budget/planned per-hour equivalent. Derived, not
    /// an agreed business figure - see module docs in `analytics`.
    pub delta_cost: Option<Decimal>,
}

/// Planned-vs-actual gap for one contract
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DeviationRow {
    pub contract_id: i64,
    pub contract_name: String,
    pub planned_hours: Decimal,
    pub actual_hours: Decimal,
    /// planned - actual (positive = underdelivered)
    pub deviation_hours: Decimal,
    /// Deviation relative to planned hours, as a percentage
    pub deviation_pct: Option<Decimal>,
}

/// The three loss sub-reports
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LossReport {
    pub period: DateRange,
    pub unbilled: UnbilledReport,
    pub overdelivery: Vec<OverdeliveryRow>,
    pub deviation: Vec<DeviationRow>,
    pub warnings: WarningSet,
}

/// Detect losses over a period.
pub fn compute_losses(worklogs: &[Worklog], range: DateRange, snapshot: &Snapshot) -> LossReport {
    let aggregation = aggregate(worklogs, GroupBy::Contract, range, snapshot, RevenueMode::CostOnly);
    let unbilled = unbilled_report(&aggregation.unmatched, snapshot);

    let mut overdelivery = Vec::new();
    let mut deviation = Vec::new();

    for contract in snapshot.contracts_sorted() {
        let actual_hours = aggregation
            .row(&GroupKey::Contract(contract.id))
            .map(|r| r.hours)
            .unwrap_or(Decimal::ZERO);
        let planned = planned_hours(contract);

        if contract.contract_type == ContractType::FixedPrice {
            match planned {
                Some(planned_value) if actual_hours > planned_value => {
                    let delta = actual_hours - planned_value;
                    let delta_cost = contract.budget_amount.and_then(|budget| {
                        if planned_value.is_zero() {
                            None
                        } else {
                            Some(delta * (budget / planned_value))
                        }
                    });
                    overdelivery.push(OverdeliveryRow {
                        contract_id: contract.id,
                        contract_name: contract.name.clone(),
                        actual_hours,
                        planned_hours: Some(planned_value),
                        delta_hours: Some(delta),
                        delta_cost,
                    });
                }
                Some(_) => {} // within plan
                None => {
                    overdelivery.push(OverdeliveryRow {
                        contract_id: contract.id,
                        contract_name: contract.name.clone(),
                        actual_hours,
                        planned_hours: None,
                        delta_hours: None,
                        delta_cost: None,
                    });
                }
            }
        }

        if let Some(planned_value) = planned {
            let deviation_hours = planned_value - actual_hours;
            let deviation_pct = if planned_value.is_zero() {
                None
            } else {
                Some(deviation_hours / planned_value * Decimal::ONE_HUNDRED)
            };
            deviation.push(DeviationRow {
                contract_id: contract.id,
                contract_name: contract.name.clone(),
                planned_hours: planned_value,
                actual_hours,
                deviation_hours,
                deviation_pct,
            });
        }
    }

    // Largest absolute deviation first; contract id breaks ties
    deviation.sort_by(|a, b| {
        b.deviation_hours
            .abs()
            .cmp(&a.deviation_hours.abs())
            .then(a.contract_id.cmp(&b.contract_id))
    });

    LossReport {
        period: range,
        unbilled,
        overdelivery,
        deviation,
        warnings: aggregation.warnings,
    }
}

fn unbilled_report(unmatched: &[Worklog], snapshot: &Snapshot) -> UnbilledReport {
    let mut by_user: BTreeMap<String, UnbilledGroup> = BTreeMap::new();
    let mut by_source: BTreeMap<String, UnbilledGroup> = BTreeMap::new();
    let mut total_hours = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for worklog in unmatched {
        let hours = worklog.hours();
        let cost = hours * resolve_cost(&worklog.author_email, worklog.started, snapshot).hourly_cost;
        total_hours += hours;
        total_cost += cost;

        let user_key = worklog.author_email.to_lowercase();
        let user_entry = by_user.entry(user_key.clone()).or_insert_with(|| UnbilledGroup {
            key: user_key,
            label: worklog.author_display_name.clone(),
            hours: Decimal::ZERO,
            cost: Decimal::ZERO,
        });
        user_entry.hours += hours;
        user_entry.cost += cost;

        let source_key = worklog
            .epic_key
            .clone()
            .unwrap_or_else(|| worklog.project_prefix().to_string());
        let source_label = worklog
            .epic_name
            .clone()
            .unwrap_or_else(|| source_key.clone());
        let source_entry = by_source
            .entry(source_key.clone())
            .or_insert_with(|| UnbilledGroup {
                key: source_key,
                label: source_label,
                hours: Decimal::ZERO,
                cost: Decimal::ZERO,
            });
        source_entry.hours += hours;
        source_entry.cost += cost;
    }

    UnbilledReport {
        total_hours,
        total_cost,
        by_user: by_user.into_values().collect(),
        by_source: by_source.into_values().collect(),
    }
}
