//! Invoice building.
//!
//! Groups a client's worklogs into line items by billing project, pricing
//! each entry through the rate cascade. Worklogs that resolve to no rate
//! are excluded from totals and surfaced as line-item warnings - never
//! silently billed at zero. Monetary values are rounded to 2 decimal
//! places here, at the presentation boundary, and nowhere upstream.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde_json::json;

use tempoledger_types::{DateRange, Worklog};

use crate::error::{EngineError, ReportWarning, WarningKind, WarningSet};
use crate::rates::{resolve_rate, RateContext, RateResolution};
use crate::snapshot::Snapshot;

/// Optional narrowing of an invoice run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceFilters {
    /// Restrict to a single billing project of the client
    pub billing_project_id: Option<i64>,
}

/// One invoice line, grouped by billing project
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InvoiceLineItem {
    pub billing_project_id: i64,
    pub description: String,
    pub quantity_hours: Decimal,
    /// Effective average hourly rate (amount / hours)
    pub hourly_rate: Decimal,
    pub amount: Decimal,
    pub metadata: serde_json::Value,
    /// Rate-resolution warnings for entries excluded from this line
    pub warnings: Vec<ReportWarning>,
}

/// An invoice ready for the export layer
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Invoice {
    pub client_id: i64,
    pub client_name: String,
    pub currency: String,
    pub period: DateRange,
    pub line_items: Vec<InvoiceLineItem>,
    pub subtotal_amount: Decimal,
    /// Hours actually billed on line items
    pub billable_hours: Decimal,
    /// Hours classified non-billable upstream, excluded from line items
    pub non_billable_hours: Decimal,
    pub warnings: WarningSet,
}

#[derive(Default)]
struct LineAccumulator {
    hours: Decimal,
    amount: Decimal,
    warnings: Vec<ReportWarning>,
}

/// Build an invoice for `client_id` over `period`.
///
/// Worklogs route to the client's billing projects via their
/// (instance, project prefix) mappings; entries for other clients are
/// ignored. Non-billable entries are counted but never priced.
pub fn build_invoice(
    client_id: i64,
    period: DateRange,
    filters: &InvoiceFilters,
    worklogs: &[Worklog],
    snapshot: &Snapshot,
) -> Result<Invoice, EngineError> {
    let client = snapshot
        .client(client_id)
        .ok_or(EngineError::ClientNotFound { client_id })?;

    let selected_projects: BTreeSet<i64> = match filters.billing_project_id {
        Some(project_id) => {
            let belongs = snapshot
                .client_projects(client_id)
                .iter()
                .any(|p| p.id == project_id);
            if !belongs {
                return Err(EngineError::ProjectClientMismatch {
                    project_id,
                    client_id,
                });
            }
            BTreeSet::from([project_id])
        }
        None => snapshot
            .client_projects(client_id)
            .iter()
            .map(|p| p.id)
            .collect(),
    };

    let mut lines: BTreeMap<i64, LineAccumulator> = BTreeMap::new();
    let mut warnings = snapshot.warnings.clone();
    let mut non_billable_hours = Decimal::ZERO;

    for worklog in worklogs {
        if !period.contains(worklog.started) {
            continue;
        }
        let Some(project) = snapshot.resolve_billing_project(worklog) else {
            continue;
        };
        if !selected_projects.contains(&project.id) {
            continue;
        }

        let hours = worklog.hours();
        if !worklog.billable {
            non_billable_hours += hours;
            continue;
        }

        let line = lines.entry(project.id).or_default();
        let ctx = RateContext::for_worklog(worklog, snapshot);
        match resolve_rate(&ctx) {
            RateResolution::Rate(resolved) => {
                line.hours += hours;
                line.amount += hours * resolved.hourly_rate;
            }
            RateResolution::NoRate => {
                let warning = ReportWarning::new(
                    WarningKind::NoRate,
                    worklog.issue_key.clone(),
                    format!(
                        "no rate at any cascade level; {} hours on {} excluded from invoice",
                        hours.round_dp(2),
                        worklog.issue_key
                    ),
                );
                line.warnings.push(warning.clone());
                warnings.push(warning);
            }
        }
    }

    let mut line_items: Vec<InvoiceLineItem> = lines
        .into_iter()
        .map(|(project_id, acc)| {
            let description = snapshot
                .client_projects(client_id)
                .iter()
                .find(|p| p.id == project_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("project-{project_id}"));
            let amount = acc.amount.round_dp(2);
            let hourly_rate = if acc.hours.is_zero() {
                Decimal::ZERO
            } else {
                (acc.amount / acc.hours).round_dp(2)
            };
            InvoiceLineItem {
                billing_project_id: project_id,
                description,
                quantity_hours: acc.hours.round_dp(2),
                hourly_rate,
                amount,
                metadata: json!({ "billing_project_id": project_id }),
                warnings: acc.warnings,
            }
        })
        .collect();

    // Largest line first, project id breaks ties
    line_items.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then(a.billing_project_id.cmp(&b.billing_project_id))
    });

    let subtotal_amount: Decimal = line_items.iter().map(|li| li.amount).sum();
    let billable_hours: Decimal = line_items.iter().map(|li| li.quantity_hours).sum();

    Ok(Invoice {
        client_id,
        client_name: client.name.clone(),
        currency: client.currency.clone(),
        period,
        line_items,
        subtotal_amount,
        billable_hours,
        non_billable_hours: non_billable_hours.round_dp(2),
        warnings,
    })
}
