//! Worklog aggregation.
//!
//! Groups a worklog set by contract, epic, client, or user over a date
//! range and sums hours, internal cost and (optionally) revenue. Costs and
//! rates are resolved against the in-memory snapshot, never per-row against
//! a live store. Aggregation is a pure function of its inputs: the same
//! worklog set and snapshot always produce the same rows in the same order.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use tempoledger_types::{DateRange, Worklog};

use crate::costs::resolve_cost;
use crate::error::{WarningKind, WarningSet};
use crate::rates::{resolve_rate, RateContext, RateResolution};
use crate::snapshot::Snapshot;

/// Grouping dimension for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Contract,
    Epic,
    Client,
    User,
}

/// Key identifying one aggregate row
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Contract(i64),
    Epic(String),
    Client(i64),
    User(String),
}

/// Whether the aggregator fills the revenue column.
///
/// Revenue resolution walks the rate cascade per worklog; cost-only callers
/// (burn, losses) skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueMode {
    CostOnly,
    PerWorklogRate,
}

/// One aggregated group
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub label: String,
    pub hours: Decimal,
    pub cost: Decimal,
    /// Filled only under [`RevenueMode::PerWorklogRate`]; no-rate worklogs
    /// contribute hours and cost but no revenue (and a warning)
    pub revenue: Option<Decimal>,
}

/// Result of an aggregation pass
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Aggregation {
    pub group_by: GroupBy,
    /// Rows in deterministic key order
    pub rows: Vec<AggregateRow>,
    /// Worklogs that resolved to no contract (or no client, under client
    /// grouping) - set aside for the loss detector, never dropped
    pub unmatched: Vec<Worklog>,
    pub warnings: WarningSet,
}

impl Aggregation {
    pub fn row(&self, key: &GroupKey) -> Option<&AggregateRow> {
        self.rows.iter().find(|r| &r.key == key)
    }

    pub fn total_hours(&self) -> Decimal {
        self.rows.iter().map(|r| r.hours).sum()
    }

    pub fn total_cost(&self) -> Decimal {
        self.rows.iter().map(|r| r.cost).sum()
    }
}

#[derive(Default)]
struct GroupAccumulator {
    label: String,
    hours: Decimal,
    cost: Decimal,
    revenue: Decimal,
}

/// Group worklogs in `range` by the requested dimension.
///
/// Contract grouping resolves each worklog through its epic mapping first,
/// then its project-prefix mapping; unresolved worklogs land in
/// `unmatched`. Unconfigured-cost and no-rate findings become warnings
/// (deduplicated by subject), never aborts.
pub fn aggregate(
    worklogs: &[Worklog],
    group_by: GroupBy,
    range: DateRange,
    snapshot: &Snapshot,
    revenue_mode: RevenueMode,
) -> Aggregation {
    let mut groups: BTreeMap<GroupKey, GroupAccumulator> = BTreeMap::new();
    let mut unmatched: Vec<Worklog> = Vec::new();
    let mut warnings = snapshot.warnings.clone();
    let mut warned_subjects: BTreeSet<(WarningKind, String)> = BTreeSet::new();

    for worklog in worklogs {
        if !range.contains(worklog.started) {
            continue;
        }

        let (key, label) = match group_key(worklog, group_by, snapshot) {
            Some(pair) => pair,
            None => {
                unmatched.push(worklog.clone());
                continue;
            }
        };

        let hours = worklog.hours();
        let cost_resolution = resolve_cost(&worklog.author_email, worklog.started, snapshot);
        if cost_resolution.is_unconfigured() {
            let subject = worklog.author_email.to_lowercase();
            if warned_subjects.insert((WarningKind::UnconfiguredCost, subject.clone())) {
                warnings.warn(
                    WarningKind::UnconfiguredCost,
                    subject,
                    "no valid cost record; internal cost counted as zero",
                );
            }
        }

        let entry = groups.entry(key).or_default();
        if entry.label.is_empty() {
            entry.label = label;
        }
        entry.hours += hours;
        entry.cost += hours * cost_resolution.hourly_cost;

        if revenue_mode == RevenueMode::PerWorklogRate {
            let ctx = RateContext::for_worklog(worklog, snapshot);
            match resolve_rate(&ctx) {
                RateResolution::Rate(resolved) => {
                    entry.revenue += hours * resolved.hourly_rate;
                }
                RateResolution::NoRate => {
                    let subject = worklog.issue_key.clone();
                    if warned_subjects.insert((WarningKind::NoRate, subject.clone())) {
                        warnings.warn(
                            WarningKind::NoRate,
                            subject,
                            "no rate at any cascade level; revenue not attributed",
                        );
                    }
                }
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, acc)| AggregateRow {
            key,
            label: acc.label,
            hours: acc.hours,
            cost: acc.cost,
            revenue: match revenue_mode {
                RevenueMode::CostOnly => None,
                RevenueMode::PerWorklogRate => Some(acc.revenue),
            },
        })
        .collect();

    Aggregation {
        group_by,
        rows,
        unmatched,
        warnings,
    }
}

/// Key + display label for one worklog under a grouping dimension.
/// `None` means the worklog could not be attributed (contract/client only).
fn group_key(worklog: &Worklog, group_by: GroupBy, snapshot: &Snapshot) -> Option<(GroupKey, String)> {
    match group_by {
        GroupBy::Contract => {
            let contract_id = snapshot.resolve_contract(worklog)?;
            let label = snapshot
                .contract(contract_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("contract-{contract_id}"));
            Some((GroupKey::Contract(contract_id), label))
        }
        GroupBy::Epic => {
            // Worklogs with no epic group under their project prefix
            let key = worklog
                .epic_key
                .clone()
                .unwrap_or_else(|| worklog.project_prefix().to_string());
            let label = worklog.epic_name.clone().unwrap_or_else(|| key.clone());
            Some((GroupKey::Epic(key), label))
        }
        GroupBy::Client => {
            let project = snapshot.resolve_billing_project(worklog)?;
            let client = snapshot.client(project.client_id)?;
            Some((GroupKey::Client(client.id), client.name.clone()))
        }
        GroupBy::User => {
            let email = worklog.author_email.to_lowercase();
            Some((GroupKey::User(email), worklog.author_display_name.clone()))
        }
    }
}
