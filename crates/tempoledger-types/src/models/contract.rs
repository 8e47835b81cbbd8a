//! Contracts and their epic/project mappings

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Commercial model of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Flat budget regardless of hours worked
    FixedPrice,
    /// Hours worked x an agreed sell rate
    TimeMaterial,
}

/// A client contract tracked by the financial engine.
///
/// Invariants (enforced by [`Contract::validate`] at the configuration
/// write boundary, trusted by the engine):
/// - fixed_price contracts carry `budget_amount`
/// - time_material contracts carry `hourly_sell_rate`
///
/// `estimated_hours`, when present, takes priority over
/// `budget_amount / hourly_sell_rate` as the source of planned hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    pub name: String,
    pub client_name: String,
    pub contract_type: ContractType,
    pub budget_amount: Option<Decimal>,
    pub hourly_sell_rate: Option<Decimal>,
    pub estimated_hours: Option<Decimal>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

impl Contract {
    /// Validate the type/field combination.
    ///
    /// Called by the administrative write path before persisting; the
    /// engine itself degrades to warnings when a stored row violates this.
    pub fn validate(&self) -> Result<(), String> {
        match self.contract_type {
            ContractType::FixedPrice => {
                if self.budget_amount.is_none() {
                    return Err("fixed_price contract requires budget_amount".to_string());
                }
            }
            ContractType::TimeMaterial => {
                if self.hourly_sell_rate.is_none() {
                    return Err("time_material contract requires hourly_sell_rate".to_string());
                }
            }
        }
        for (field, value) in [
            ("budget_amount", self.budget_amount),
            ("hourly_sell_rate", self.hourly_sell_rate),
            ("estimated_hours", self.estimated_hours),
        ] {
            if let Some(v) = value {
                if v < Decimal::ZERO {
                    return Err(format!("{field} must be >= 0"));
                }
            }
        }
        if self.end_date < self.start_date {
            return Err("end_date precedes start_date".to_string());
        }
        Ok(())
    }
}

/// What a contract mapping points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingTarget {
    /// A specific epic key (e.g. "PROJ-42")
    Epic(String),
    /// A project key prefix, the substring of `issue_key` before the
    /// first `-` (e.g. "PROJ")
    ProjectPrefix(String),
}

/// Associates a contract with an epic or a project-key prefix, scoped to a
/// JIRA instance.
///
/// An epic/prefix may map to at most one contract; the write boundary
/// rejects collisions, and the snapshot builder reports any residual
/// duplicates as data-integrity warnings instead of picking silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractMapping {
    pub id: i64,
    pub contract_id: i64,
    pub jira_instance: String,
    pub target: MappingTarget,
}
