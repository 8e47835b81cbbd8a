//! Unit tests for the analytics module

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tempoledger_types::{
    BillingClient, BillingDefaults, BillingProject, CompanyId, Contract, ContractMapping,
    ContractType, DateRange, MappingTarget, PackageTemplate, ProjectKeyMapping, Role, UserCost,
    Worklog,
};

use super::*;
use crate::error::WarningKind;
use crate::invoice::{build_invoice, InvoiceFilters};
use crate::snapshot::Snapshot;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn march() -> DateRange {
    DateRange::new(d("2025-03-01"), d("2025-03-31"))
}

fn contract(
    id: i64,
    name: &str,
    contract_type: ContractType,
    budget: Option<Decimal>,
    sell_rate: Option<Decimal>,
    estimated: Option<Decimal>,
    start: &str,
    end: &str,
) -> Contract {
    Contract {
        id,
        name: name.to_string(),
        client_name: "Acme".to_string(),
        contract_type,
        budget_amount: budget,
        hourly_sell_rate: sell_rate,
        estimated_hours: estimated,
        start_date: d(start),
        end_date: d(end),
        notes: None,
    }
}

fn prefix_mapping(id: i64, contract_id: i64, prefix: &str) -> ContractMapping {
    ContractMapping {
        id,
        contract_id,
        jira_instance: "main".to_string(),
        target: MappingTarget::ProjectPrefix(prefix.to_string()),
    }
}

fn worklog(
    id: i64,
    email: &str,
    name: &str,
    issue_key: &str,
    epic_key: Option<&str>,
    hours: i64,
    started: &str,
    billable: bool,
) -> Worklog {
    Worklog {
        id,
        issue_key: issue_key.to_string(),
        issue_summary: format!("Work on {issue_key}"),
        author_email: email.to_string(),
        author_display_name: name.to_string(),
        time_spent_seconds: hours * 3600,
        started: d(started),
        jira_instance: "main".to_string(),
        epic_key: epic_key.map(str::to_string),
        epic_name: None,
        billable,
        package_template_id: None,
        issue_rate: None,
        epic_rate: None,
    }
}

/// One tenant's worth of configuration plus a March worklog set.
///
/// Costs: alice = 35 (role default), bob = 50 (override), eve = 35,
/// ghost = unconfigured. Contracts 1-6 cover fixed-price/time-material
/// with and without budgets, sell rates and estimates.
fn fixture() -> (Snapshot, Vec<Worklog>) {
    let roles = vec![Role {
        id: 1,
        name: "Developer".to_string(),
        default_hourly_cost: dec!(35),
    }];

    let cost = |id: i64, email: &str, override_cost: Option<Decimal>| UserCost {
        id,
        user_email: email.to_string(),
        role_id: Some(1),
        hourly_cost_override: override_cost,
        valid_from: None,
        valid_to: None,
    };
    let user_costs = vec![
        cost(1, "alice@example.com", None),
        cost(2, "bob@example.com", Some(dec!(50))),
        cost(3, "eve@example.com", None),
    ];

    let contracts = vec![
        contract(
            1,
            "Acme platform",
            ContractType::FixedPrice,
            Some(dec!(10000)),
            None,
            Some(dec!(100)),
            "2025-01-01",
            "2025-12-31",
        ),
        contract(
            2,
            "Beta support",
            ContractType::TimeMaterial,
            None,
            Some(dec!(80)),
            None,
            "2025-01-01",
            "2025-12-31",
        ),
        contract(
            3,
            "Gamma retainer",
            ContractType::TimeMaterial,
            Some(dec!(1000)),
            Some(dec!(100)),
            None,
            "2025-03-01",
            "2025-12-31",
        ),
        contract(
            4,
            "Delta advisory",
            ContractType::TimeMaterial,
            None,
            Some(dec!(90)),
            None,
            "2025-01-01",
            "2025-12-31",
        ),
        contract(
            5,
            "Epsilon audit",
            ContractType::FixedPrice,
            Some(dec!(4000)),
            None,
            Some(dec!(4)),
            "2025-03-01",
            "2025-03-31",
        ),
        contract(
            6,
            "Zeta rescue",
            ContractType::FixedPrice,
            Some(dec!(3000)),
            None,
            None,
            "2025-01-01",
            "2025-12-31",
        ),
    ];

    let mappings = vec![
        ContractMapping {
            id: 1,
            contract_id: 1,
            jira_instance: "main".to_string(),
            target: MappingTarget::Epic("ACME-100".to_string()),
        },
        prefix_mapping(2, 1, "ACME"),
        prefix_mapping(3, 2, "BETA"),
        prefix_mapping(4, 3, "GAMMA"),
        prefix_mapping(5, 4, "DELTA"),
        prefix_mapping(6, 5, "EPS"),
    ];

    let clients = vec![
        BillingClient {
            id: 1,
            name: "Acme".to_string(),
            currency: "EUR".to_string(),
            default_hourly_rate: Some(dec!(75)),
        },
        BillingClient {
            id: 2,
            name: "NoRateCo".to_string(),
            currency: "USD".to_string(),
            default_hourly_rate: None,
        },
    ];

    let project = |id: i64, client_id: i64, name: &str, rate: Option<Decimal>, key: &str| {
        BillingProject {
            id,
            client_id,
            name: name.to_string(),
            hourly_rate: rate,
            discount_pct: None,
            mappings: vec![ProjectKeyMapping {
                jira_instance: "main".to_string(),
                project_key: key.to_string(),
            }],
        }
    };
    let projects = vec![
        project(10, 1, "Acme platform", Some(dec!(90)), "ACME"),
        project(11, 1, "Acme support", None, "ACMS"),
        project(20, 2, "NoRateCo core", None, "NR"),
    ];

    let packages = vec![PackageTemplate {
        id: 1,
        name: "Support package".to_string(),
        hourly_rate: Some(dec!(120)),
    }];

    let snapshot = Snapshot::from_parts(
        CompanyId(1),
        roles,
        user_costs,
        contracts,
        mappings,
        clients,
        projects,
        packages,
        BillingDefaults::default(),
    );

    let mut worklogs = vec![
        worklog(1, "alice@example.com", "Alice", "ACME-1", Some("ACME-100"), 2, "2025-03-03", true),
        worklog(2, "bob@example.com", "Bob", "ACME-2", Some("ACME-100"), 3, "2025-03-04", true),
        worklog(3, "alice@example.com", "Alice", "BETA-5", None, 4, "2025-03-05", true),
        worklog(4, "ghost@example.com", "Ghost", "INT-1", None, 5, "2025-03-06", true),
        worklog(5, "alice@example.com", "Alice", "GAMMA-7", None, 2, "2025-03-05", true),
        worklog(6, "bob@example.com", "Bob", "ACME-3", Some("ACME-100"), 1, "2025-03-07", false),
        worklog(7, "alice@example.com", "Alice", "ACMS-9", None, 2, "2025-03-10", true),
        worklog(9, "eve@example.com", "Eve", "EPS-1", None, 6, "2025-03-20", true),
    ];
    let mut packaged = worklog(8, "bob@example.com", "Bob", "NR-2", None, 2, "2025-03-12", true);
    packaged.package_template_id = Some(1);
    worklogs.push(packaged);

    (snapshot, worklogs)
}

// ============================================================================
// Aggregator
// ============================================================================

#[test]
fn test_contract_grouping_sets_aside_unmatched() {
    let (snapshot, worklogs) = fixture();
    let agg = aggregate(&worklogs, GroupBy::Contract, march(), &snapshot, RevenueMode::CostOnly);

    // ACME worklogs land on contract 1 via the epic mapping
    let acme = agg.row(&GroupKey::Contract(1)).unwrap();
    assert_eq!(acme.hours, dec!(6));
    // alice 2h x 35 + bob 3h x 50 + bob 1h x 50
    assert_eq!(acme.cost, dec!(270));
    assert_eq!(acme.revenue, None);

    // INT, ACMS and NR prefixes have no contract mapping
    let unmatched_ids: Vec<i64> = agg.unmatched.iter().map(|w| w.id).collect();
    assert_eq!(unmatched_ids, vec![4, 7, 8]);
}

#[test]
fn test_unmatched_hours_never_leak_into_contract_rows() {
    let (snapshot, worklogs) = fixture();
    let agg = aggregate(&worklogs, GroupBy::Contract, march(), &snapshot, RevenueMode::CostOnly);

    let total_in_range: Decimal = worklogs.iter().map(|w| w.hours()).sum();
    let unmatched_hours: Decimal = agg.unmatched.iter().map(|w| w.hours()).sum();
    assert_eq!(agg.total_hours() + unmatched_hours, total_in_range);
}

#[test]
fn test_unconfigured_cost_counted_as_zero_with_warning() {
    let (snapshot, worklogs) = fixture();
    let agg = aggregate(&worklogs, GroupBy::User, march(), &snapshot, RevenueMode::CostOnly);

    let ghost = agg
        .row(&GroupKey::User("ghost@example.com".to_string()))
        .unwrap();
    assert_eq!(ghost.hours, dec!(5));
    assert_eq!(ghost.cost, dec!(0));
    assert_eq!(agg.warnings.count_of(WarningKind::UnconfiguredCost), 1);
}

#[test]
fn test_repeated_gaps_warn_once_per_subject() {
    let (snapshot, mut worklogs) = fixture();
    worklogs.push(worklog(
        60,
        "ghost@example.com",
        "Ghost",
        "ACME-7",
        None,
        2,
        "2025-03-08",
        true,
    ));
    let agg = aggregate(&worklogs, GroupBy::User, march(), &snapshot, RevenueMode::CostOnly);

    // Two of ghost's worklogs in range, one warning for the user
    let ghost = agg
        .row(&GroupKey::User("ghost@example.com".to_string()))
        .unwrap();
    assert_eq!(ghost.hours, dec!(7));
    assert_eq!(agg.warnings.count_of(WarningKind::UnconfiguredCost), 1);
}

#[test]
fn test_aggregation_is_idempotent() {
    let (snapshot, worklogs) = fixture();
    let first = aggregate(&worklogs, GroupBy::Contract, march(), &snapshot, RevenueMode::CostOnly);
    let second = aggregate(&worklogs, GroupBy::Contract, march(), &snapshot, RevenueMode::CostOnly);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_range_filter_excludes_out_of_period_worklogs() {
    let (snapshot, mut worklogs) = fixture();
    worklogs.push(worklog(
        99,
        "alice@example.com",
        "Alice",
        "ACME-9",
        None,
        8,
        "2025-04-01",
        true,
    ));
    let agg = aggregate(&worklogs, GroupBy::Contract, march(), &snapshot, RevenueMode::CostOnly);
    assert_eq!(agg.row(&GroupKey::Contract(1)).unwrap().hours, dec!(6));
}

// ============================================================================
// Margin engine
// ============================================================================

#[test]
fn test_fixed_price_margin_uses_budget_and_completion() {
    let (snapshot, worklogs) = fixture();
    let report = contract_margins(&worklogs, march(), &snapshot);

    let acme = report
        .rows
        .iter()
        .find(|r| r.key == GroupKey::Contract(1))
        .unwrap();
    assert_eq!(acme.revenue, Some(dec!(10000)));
    assert_eq!(acme.margin, Some(dec!(9730)));
    // 6 actual hours of 100 planned
    assert_eq!(acme.completion_pct, Some(dec!(6)));
}

#[test]
fn test_time_material_margin_is_hours_times_sell_rate() {
    let (snapshot, worklogs) = fixture();
    let report = contract_margins(&worklogs, march(), &snapshot);

    let beta = report
        .rows
        .iter()
        .find(|r| r.key == GroupKey::Contract(2))
        .unwrap();
    assert_eq!(beta.hours, dec!(4));
    assert_eq!(beta.revenue, Some(dec!(320)));
    assert_eq!(beta.cost, dec!(140));
    assert_eq!(beta.margin, Some(dec!(180)));
    assert_eq!(beta.margin_pct, Some(dec!(56.25)));
}

#[test]
fn test_margin_identity_holds_for_every_row() {
    let (snapshot, worklogs) = fixture();
    let report = contract_margins(&worklogs, march(), &snapshot);
    for row in &report.rows {
        if let (Some(revenue), Some(margin)) = (row.revenue, row.margin) {
            assert_eq!(margin, revenue - row.cost, "row {:?}", row.key);
        }
    }
}

#[test]
fn test_zero_revenue_margin_pct_is_undefined_not_an_error() {
    let (snapshot, worklogs) = fixture();
    let report = contract_margins(&worklogs, march(), &snapshot);

    // Delta advisory has no worklogs: revenue 0, margin % undefined
    let delta = report
        .rows
        .iter()
        .find(|r| r.key == GroupKey::Contract(4))
        .unwrap();
    assert_eq!(delta.revenue, Some(dec!(0)));
    assert_eq!(delta.margin, Some(dec!(0)));
    assert_eq!(delta.margin_pct, None);
}

#[test]
fn test_epic_margins_use_per_worklog_rates() {
    let (snapshot, worklogs) = fixture();
    let report = grouped_margins(&worklogs, GroupBy::Epic, march(), &snapshot);

    // ACME-100: 6h at the project rate of 90
    let epic = report
        .rows
        .iter()
        .find(|r| r.key == GroupKey::Epic("ACME-100".to_string()))
        .unwrap();
    assert_eq!(epic.revenue, Some(dec!(540)));

    // BETA-5 has no billing project and no default: revenue stays zero and
    // the gap is flagged
    let beta = report
        .rows
        .iter()
        .find(|r| r.key == GroupKey::Epic("BETA".to_string()))
        .unwrap();
    assert_eq!(beta.revenue, Some(dec!(0)));
    assert!(report.warnings.count_of(WarningKind::NoRate) >= 1);
}

// ============================================================================
// Burn & forecast engine
// ============================================================================

#[test]
fn test_burn_rate_and_forecast_linear_extrapolation() {
    let (snapshot, worklogs) = fixture();
    let report = burn_report(&worklogs, d("2025-03-11"), &snapshot);

    // Gamma retainer: 2h x 100 = 200 consumed of a 1000 budget over 10 days
    let gamma = report
        .rows
        .iter()
        .find_map(|row| match row {
            BurnOutcome::Computed(r) if r.contract_id == 3 => Some(r),
            _ => None,
        })
        .unwrap();
    assert_eq!(gamma.budget_consumed, dec!(200));
    assert_eq!(gamma.elapsed_days, 10);
    assert_eq!(gamma.burn_rate_per_day, dec!(20));
    assert_eq!(gamma.forecast, Forecast::Date(d("2025-04-20")));
    assert!(!gamma.at_risk);
}

#[test]
fn test_time_material_without_budget_is_not_computable() {
    let (snapshot, worklogs) = fixture();
    let report = burn_report(&worklogs, d("2025-03-11"), &snapshot);

    let beta = report
        .rows
        .iter()
        .find(|row| matches!(row, BurnOutcome::NotComputable { contract_id: 2, .. }))
        .unwrap();
    assert!(matches!(
        beta,
        BurnOutcome::NotComputable {
            reason: NotComputableReason::MissingBudget,
            ..
        }
    ));
}

#[test]
fn test_fixed_price_without_rate_basis_is_not_computable() {
    let (snapshot, worklogs) = fixture();
    let report = burn_report(&worklogs, d("2025-03-11"), &snapshot);

    // Zeta rescue has a budget but no estimate and no sell rate
    assert!(report.rows.iter().any(|row| matches!(
        row,
        BurnOutcome::NotComputable {
            contract_id: 6,
            reason: NotComputableReason::MissingRateBasis,
            ..
        }
    )));
}

#[test]
fn test_not_computable_contract_does_not_blank_the_report() {
    let (snapshot, worklogs) = fixture();
    let report = burn_report(&worklogs, d("2025-03-11"), &snapshot);
    assert_eq!(report.rows.len(), 6);
    assert!(report
        .rows
        .iter()
        .any(|r| matches!(r, BurnOutcome::Computed(_))));
}

#[test]
fn test_zero_burn_rate_forecast_is_indeterminate() {
    let (snapshot, worklogs) = fixture();
    // As of 2025-03-11 Epsilon audit has no hours yet (work starts on the 20th)
    let report = burn_report(&worklogs, d("2025-03-11"), &snapshot);
    let epsilon = report
        .rows
        .iter()
        .find_map(|row| match row {
            BurnOutcome::Computed(r) if r.contract_id == 5 => Some(r),
            _ => None,
        })
        .unwrap();
    assert_eq!(epsilon.burn_rate_per_day, dec!(0));
    assert_eq!(epsilon.forecast, Forecast::Indeterminate);
    assert!(!epsilon.at_risk);
}

#[test]
fn test_elapsed_days_clamped_on_day_one() {
    let c = contract(
        7,
        "Day one",
        ContractType::TimeMaterial,
        Some(dec!(1000)),
        Some(dec!(100)),
        None,
        "2025-03-01",
        "2025-12-31",
    );
    let outcome = compute_burn(&c, dec!(1), d("2025-03-01"));
    let BurnOutcome::Computed(result) = outcome else {
        panic!("expected computed burn");
    };
    assert_eq!(result.elapsed_days, 1);
    assert_eq!(result.burn_rate_per_day, dec!(100));
}

#[test]
fn test_forecast_beyond_end_date_flags_at_risk() {
    let c = contract(
        8,
        "Slow burn",
        ContractType::TimeMaterial,
        Some(dec!(10000)),
        Some(dec!(100)),
        None,
        "2025-03-01",
        "2025-03-31",
    );
    // 1h/day pace over 10 days: exhaustion lands years past end_date
    let outcome = compute_burn(&c, dec!(10), d("2025-03-11"));
    let BurnOutcome::Computed(result) = outcome else {
        panic!("expected computed burn");
    };
    assert!(result.at_risk);
}

#[test]
fn test_exhausted_budget_forecasts_as_of_date() {
    let c = contract(
        9,
        "Overspent",
        ContractType::TimeMaterial,
        Some(dec!(1000)),
        Some(dec!(100)),
        None,
        "2025-03-01",
        "2025-03-31",
    );
    let outcome = compute_burn(&c, dec!(20), d("2025-03-11"));
    let BurnOutcome::Computed(result) = outcome else {
        panic!("expected computed burn");
    };
    assert_eq!(result.forecast, Forecast::Date(d("2025-03-11")));
}

// ============================================================================
// Loss detector
// ============================================================================

#[test]
fn test_unbilled_totals_match_unmatched_worklogs() {
    let (snapshot, worklogs) = fixture();
    let losses = compute_losses(&worklogs, march(), &snapshot);
    let agg = aggregate(&worklogs, GroupBy::Contract, march(), &snapshot, RevenueMode::CostOnly);

    let unmatched_hours: Decimal = agg.unmatched.iter().map(|w| w.hours()).sum();
    assert_eq!(losses.unbilled.total_hours, unmatched_hours);
    // ghost 5h x 0 + alice 2h x 35 + bob 2h x 50
    assert_eq!(losses.unbilled.total_cost, dec!(170));

    let source_keys: Vec<&str> = losses
        .unbilled
        .by_source
        .iter()
        .map(|g| g.key.as_str())
        .collect();
    assert_eq!(source_keys, vec!["ACMS", "INT", "NR"]);
}

#[test]
fn test_overdelivery_reports_delta_at_implied_rate() {
    let (snapshot, worklogs) = fixture();
    let losses = compute_losses(&worklogs, march(), &snapshot);

    // Epsilon audit: 6 actual vs 4 planned, implied rate 4000/4 = 1000
    let epsilon = losses
        .overdelivery
        .iter()
        .find(|r| r.contract_id == 5)
        .unwrap();
    assert_eq!(epsilon.delta_hours, Some(dec!(2)));
    assert_eq!(epsilon.delta_cost, Some(dec!(2000)));
}

#[test]
fn test_overdelivery_without_planned_hours_is_na() {
    let (snapshot, worklogs) = fixture();
    let losses = compute_losses(&worklogs, march(), &snapshot);

    let zeta = losses
        .overdelivery
        .iter()
        .find(|r| r.contract_id == 6)
        .unwrap();
    assert_eq!(zeta.planned_hours, None);
    assert_eq!(zeta.delta_hours, None);
    assert_eq!(zeta.delta_cost, None);
}

#[test]
fn test_within_plan_fixed_price_has_no_overdelivery_row() {
    let (snapshot, worklogs) = fixture();
    let losses = compute_losses(&worklogs, march(), &snapshot);
    assert!(!losses.overdelivery.iter().any(|r| r.contract_id == 1));
}

#[test]
fn test_deviation_sorted_by_absolute_gap() {
    let (snapshot, worklogs) = fixture();
    let losses = compute_losses(&worklogs, march(), &snapshot);

    let ids: Vec<i64> = losses.deviation.iter().map(|r| r.contract_id).collect();
    // Acme platform (94 under), Gamma retainer (8 under), Epsilon (2 over)
    assert_eq!(ids, vec![1, 3, 5]);

    let acme = &losses.deviation[0];
    assert_eq!(acme.deviation_hours, dec!(94));
    assert_eq!(acme.deviation_pct, Some(dec!(94)));

    let epsilon = &losses.deviation[2];
    assert_eq!(epsilon.deviation_hours, dec!(-2));
    assert_eq!(epsilon.deviation_pct, Some(dec!(-50)));
}

// ============================================================================
// Invoice builder
// ============================================================================

#[test]
fn test_invoice_totals_equal_sum_of_line_items() {
    let (snapshot, worklogs) = fixture();
    let invoice = build_invoice(1, march(), &InvoiceFilters::default(), &worklogs, &snapshot)
        .unwrap();

    assert_eq!(invoice.line_items.len(), 2);
    let line_total: Decimal = invoice.line_items.iter().map(|li| li.amount).sum();
    assert_eq!(invoice.subtotal_amount, line_total);
    // ACME 5h x 90 + ACMS 2h x 75 (client default)
    assert_eq!(invoice.subtotal_amount, dec!(600.00));
    assert_eq!(invoice.billable_hours, dec!(7.00));
    assert_eq!(invoice.non_billable_hours, dec!(1.00));
}

#[test]
fn test_invoice_lines_sorted_by_amount() {
    let (snapshot, worklogs) = fixture();
    let invoice = build_invoice(1, march(), &InvoiceFilters::default(), &worklogs, &snapshot)
        .unwrap();
    assert_eq!(invoice.line_items[0].billing_project_id, 10);
    assert_eq!(invoice.line_items[0].hourly_rate, dec!(90.00));
    assert_eq!(invoice.line_items[1].billing_project_id, 11);
}

#[test]
fn test_no_rate_worklog_excluded_and_warned() {
    let (snapshot, mut worklogs) = fixture();
    worklogs.push(worklog(
        50,
        "alice@example.com",
        "Alice",
        "NR-9",
        None,
        3,
        "2025-03-15",
        true,
    ));
    let invoice = build_invoice(2, march(), &InvoiceFilters::default(), &worklogs, &snapshot)
        .unwrap();

    // Package-rated entry bills at 120; the no-rate entry is excluded
    let line = &invoice.line_items[0];
    assert_eq!(line.quantity_hours, dec!(2.00));
    assert_eq!(line.amount, dec!(240.00));
    assert_eq!(line.warnings.len(), 1);
    assert_eq!(line.warnings[0].kind, WarningKind::NoRate);
    assert_eq!(invoice.warnings.count_of(WarningKind::NoRate), 1);
}

#[test]
fn test_invoice_project_filter() {
    let (snapshot, worklogs) = fixture();
    let filters = InvoiceFilters {
        billing_project_id: Some(10),
    };
    let invoice = build_invoice(1, march(), &filters, &worklogs, &snapshot).unwrap();
    assert_eq!(invoice.line_items.len(), 1);
    assert_eq!(invoice.subtotal_amount, dec!(450.00));
}

#[test]
fn test_invoice_rejects_foreign_project_filter() {
    let (snapshot, worklogs) = fixture();
    let filters = InvoiceFilters {
        billing_project_id: Some(20), // belongs to client 2
    };
    let result = build_invoice(1, march(), &filters, &worklogs, &snapshot);
    assert!(matches!(
        result,
        Err(crate::error::EngineError::ProjectClientMismatch { .. })
    ));
}

#[test]
fn test_invoice_unknown_client() {
    let (snapshot, worklogs) = fixture();
    let result = build_invoice(999, march(), &InvoiceFilters::default(), &worklogs, &snapshot);
    assert!(matches!(
        result,
        Err(crate::error::EngineError::ClientNotFound { client_id: 999 })
    ));
}

// ============================================================================
// Full pipeline
// ============================================================================

#[test]
fn test_financial_overview_composes_all_reports() {
    let (snapshot, worklogs) = fixture();
    let overview = FinancialOverview::compute(&worklogs, march(), d("2025-03-31"), &snapshot);

    assert_eq!(overview.margins.rows.len(), 6);
    assert_eq!(overview.burn.rows.len(), 6);
    assert!(!overview.losses.unbilled.by_user.is_empty());
}

#[test]
fn test_reports_are_byte_identical_across_runs() {
    let (snapshot, worklogs) = fixture();
    let first = FinancialOverview::compute(&worklogs, march(), d("2025-03-31"), &snapshot);
    let second = FinancialOverview::compute(&worklogs, march(), d("2025-03-31"), &snapshot);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}
