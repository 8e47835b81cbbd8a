//! Store traits modeling the external worklog and configuration stores.
//!
//! The engine never queries per-worklog: each report does a handful of bulk
//! reads through these traits, builds a [`crate::snapshot::Snapshot`], and
//! resolves everything in memory. All reads are scoped by [`CompanyId`],
//! which comes from the authentication layer, never from request payloads.

use thiserror::Error;

use tempoledger_types::{
    BillingClient, BillingDefaults, BillingProject, CompanyId, Contract, ContractMapping,
    DateRange, PackageTemplate, Role, UserCost, Worklog,
};

/// Failure talking to the underlying storage
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Read access to imported worklogs
pub trait WorklogStore {
    /// Worklogs for a tenant in a date range, optionally restricted to one
    /// JIRA instance
    fn worklogs(
        &self,
        company: CompanyId,
        range: DateRange,
        jira_instance: Option<&str>,
    ) -> Result<Vec<Worklog>, StoreError>;
}

/// Read access to billing configuration, scoped by tenant
pub trait ConfigStore {
    fn roles(&self, company: CompanyId) -> Result<Vec<Role>, StoreError>;
    fn user_costs(&self, company: CompanyId) -> Result<Vec<UserCost>, StoreError>;
    fn contracts(&self, company: CompanyId) -> Result<Vec<Contract>, StoreError>;
    fn contract_mappings(&self, company: CompanyId) -> Result<Vec<ContractMapping>, StoreError>;
    fn billing_clients(&self, company: CompanyId) -> Result<Vec<BillingClient>, StoreError>;
    fn billing_projects(&self, company: CompanyId) -> Result<Vec<BillingProject>, StoreError>;
    fn package_templates(&self, company: CompanyId) -> Result<Vec<PackageTemplate>, StoreError>;
    fn billing_defaults(&self, company: CompanyId) -> Result<BillingDefaults, StoreError>;
}

/// In-memory store double.
///
/// Holds one tenant's rows; reads for any other tenant come back empty,
/// mirroring the row-filtering the real storage layer performs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub company: CompanyId,
    pub worklogs: Vec<Worklog>,
    pub roles: Vec<Role>,
    pub user_costs: Vec<UserCost>,
    pub contracts: Vec<Contract>,
    pub contract_mappings: Vec<ContractMapping>,
    pub billing_clients: Vec<BillingClient>,
    pub billing_projects: Vec<BillingProject>,
    pub package_templates: Vec<PackageTemplate>,
    pub billing_defaults: BillingDefaults,
}

impl InMemoryStore {
    pub fn new(company: CompanyId) -> Self {
        Self {
            company,
            ..Self::default()
        }
    }

    fn scoped<T: Clone>(&self, company: CompanyId, rows: &[T]) -> Vec<T> {
        if company == self.company {
            rows.to_vec()
        } else {
            Vec::new()
        }
    }
}

impl WorklogStore for InMemoryStore {
    fn worklogs(
        &self,
        company: CompanyId,
        range: DateRange,
        jira_instance: Option<&str>,
    ) -> Result<Vec<Worklog>, StoreError> {
        if company != self.company {
            return Ok(Vec::new());
        }
        Ok(self
            .worklogs
            .iter()
            .filter(|w| range.contains(w.started))
            .filter(|w| jira_instance.map_or(true, |i| w.jira_instance == i))
            .cloned()
            .collect())
    }
}

impl ConfigStore for InMemoryStore {
    fn roles(&self, company: CompanyId) -> Result<Vec<Role>, StoreError> {
        Ok(self.scoped(company, &self.roles))
    }

    fn user_costs(&self, company: CompanyId) -> Result<Vec<UserCost>, StoreError> {
        Ok(self.scoped(company, &self.user_costs))
    }

    fn contracts(&self, company: CompanyId) -> Result<Vec<Contract>, StoreError> {
        Ok(self.scoped(company, &self.contracts))
    }

    fn contract_mappings(&self, company: CompanyId) -> Result<Vec<ContractMapping>, StoreError> {
        Ok(self.scoped(company, &self.contract_mappings))
    }

    fn billing_clients(&self, company: CompanyId) -> Result<Vec<BillingClient>, StoreError> {
        Ok(self.scoped(company, &self.billing_clients))
    }

    fn billing_projects(&self, company: CompanyId) -> Result<Vec<BillingProject>, StoreError> {
        Ok(self.scoped(company, &self.billing_projects))
    }

    fn package_templates(&self, company: CompanyId) -> Result<Vec<PackageTemplate>, StoreError> {
        Ok(self.scoped(company, &self.package_templates))
    }

    fn billing_defaults(&self, company: CompanyId) -> Result<BillingDefaults, StoreError> {
        if company != self.company {
            return Ok(BillingDefaults::default());
        }
        Ok(self.billing_defaults.clone())
    }
}
