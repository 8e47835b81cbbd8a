//! Per-request configuration snapshot.
//!
//! A [`Snapshot`] is built once per report request from the config store and
//! holds everything the resolvers need, pre-indexed: cost records by user,
//! contract mappings by (instance, target), billing projects by JIRA key.
//! All engine computations are pure functions of a snapshot plus a worklog
//! set, which is what makes reports reproducible.

use std::collections::HashMap;

use tempoledger_types::{
    BillingClient, BillingDefaults, BillingProject, CompanyId, Contract, ContractMapping,
    MappingTarget, PackageTemplate, Role, UserCost, Worklog,
};

use crate::error::{EngineError, WarningKind, WarningSet};
use crate::store::ConfigStore;

/// Read-only configuration view for one tenant, one request
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub company: CompanyId,
    pub defaults: BillingDefaults,
    roles: HashMap<i64, Role>,
    /// Cost records keyed by lowercased user email
    user_costs: HashMap<String, Vec<UserCost>>,
    contracts: HashMap<i64, Contract>,
    /// (jira_instance, target) -> contract id; collisions resolved at build
    mappings: HashMap<(String, MappingTarget), i64>,
    clients: HashMap<i64, BillingClient>,
    projects: HashMap<i64, BillingProject>,
    /// (jira_instance, project key) -> billing project id
    project_keys: HashMap<(String, String), i64>,
    packages: HashMap<i64, PackageTemplate>,
    /// Data-integrity findings from the build (mapping collisions)
    pub warnings: WarningSet,
}

impl Snapshot {
    /// Load a snapshot from the configuration store
    pub fn load(company: CompanyId, store: &dyn ConfigStore) -> Result<Self, EngineError> {
        Ok(Self::from_parts(
            company,
            store.roles(company)?,
            store.user_costs(company)?,
            store.contracts(company)?,
            store.contract_mappings(company)?,
            store.billing_clients(company)?,
            store.billing_projects(company)?,
            store.package_templates(company)?,
            store.billing_defaults(company)?,
        ))
    }

    /// Assemble and index a snapshot from already-loaded rows
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        company: CompanyId,
        roles: Vec<Role>,
        user_costs: Vec<UserCost>,
        contracts: Vec<Contract>,
        contract_mappings: Vec<ContractMapping>,
        clients: Vec<BillingClient>,
        projects: Vec<BillingProject>,
        packages: Vec<PackageTemplate>,
        defaults: BillingDefaults,
    ) -> Self {
        let mut warnings = WarningSet::new();

        let roles: HashMap<i64, Role> = roles.into_iter().map(|r| (r.id, r)).collect();

        let mut costs_by_user: HashMap<String, Vec<UserCost>> = HashMap::new();
        for record in user_costs {
            costs_by_user
                .entry(record.user_email.to_lowercase())
                .or_default()
                .push(record);
        }

        let contracts: HashMap<i64, Contract> = contracts.into_iter().map(|c| (c.id, c)).collect();

        // Collisions are a write-boundary invariant; if one slipped through,
        // keep the first mapping and surface the rest as warnings
        let mut mappings: HashMap<(String, MappingTarget), i64> = HashMap::new();
        for mapping in contract_mappings {
            let key = (mapping.jira_instance.clone(), mapping.target.clone());
            if let Some(existing) = mappings.get(&key) {
                tracing::warn!(
                    instance = %mapping.jira_instance,
                    target = ?mapping.target,
                    kept = existing,
                    dropped = mapping.contract_id,
                    "contract mapping collision"
                );
                warnings.warn(
                    WarningKind::MappingCollision,
                    format!("{}/{:?}", mapping.jira_instance, mapping.target),
                    format!(
                        "mapped to contracts {} and {}; kept {}",
                        existing, mapping.contract_id, existing
                    ),
                );
                continue;
            }
            mappings.insert(key, mapping.contract_id);
        }

        let mut project_keys: HashMap<(String, String), i64> = HashMap::new();
        for project in &projects {
            for key_mapping in &project.mappings {
                project_keys.insert(
                    (
                        key_mapping.jira_instance.clone(),
                        key_mapping.project_key.clone(),
                    ),
                    project.id,
                );
            }
        }

        Self {
            company,
            defaults,
            roles,
            user_costs: costs_by_user,
            contracts,
            mappings,
            clients: clients.into_iter().map(|c| (c.id, c)).collect(),
            projects: projects.into_iter().map(|p| (p.id, p)).collect(),
            project_keys,
            packages: packages.into_iter().map(|p| (p.id, p)).collect(),
            warnings,
        }
    }

    pub fn role(&self, id: i64) -> Option<&Role> {
        self.roles.get(&id)
    }

    /// Cost records for a user (any validity window), empty when unknown
    pub fn user_cost_records(&self, user_email: &str) -> &[UserCost] {
        self.user_costs
            .get(&user_email.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contract(&self, id: i64) -> Option<&Contract> {
        self.contracts.get(&id)
    }

    /// All contracts, ordered by id for deterministic report rows
    pub fn contracts_sorted(&self) -> Vec<&Contract> {
        let mut contracts: Vec<&Contract> = self.contracts.values().collect();
        contracts.sort_by_key(|c| c.id);
        contracts
    }

    /// Resolve a worklog to its contract: epic mapping first, then the
    /// project-prefix mapping. `None` means unbilled work.
    pub fn resolve_contract(&self, worklog: &Worklog) -> Option<i64> {
        if let Some(epic_key) = &worklog.epic_key {
            let key = (
                worklog.jira_instance.clone(),
                MappingTarget::Epic(epic_key.clone()),
            );
            if let Some(contract_id) = self.mappings.get(&key) {
                return Some(*contract_id);
            }
        }
        let key = (
            worklog.jira_instance.clone(),
            MappingTarget::ProjectPrefix(worklog.project_prefix().to_string()),
        );
        self.mappings.get(&key).copied()
    }

    /// Resolve a worklog to its billing project via project key mappings
    pub fn resolve_billing_project(&self, worklog: &Worklog) -> Option<&BillingProject> {
        let key = (
            worklog.jira_instance.clone(),
            worklog.project_prefix().to_string(),
        );
        let project_id = self.project_keys.get(&key)?;
        self.projects.get(project_id)
    }

    pub fn client(&self, id: i64) -> Option<&BillingClient> {
        self.clients.get(&id)
    }

    pub fn package(&self, id: i64) -> Option<&PackageTemplate> {
        self.packages.get(&id)
    }

    /// Billing projects of one client, ordered by id
    pub fn client_projects(&self, client_id: i64) -> Vec<&BillingProject> {
        let mut projects: Vec<&BillingProject> = self
            .projects
            .values()
            .filter(|p| p.client_id == client_id)
            .collect();
        projects.sort_by_key(|p| p.id);
        projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempoledger_types::{ContractType, ProjectKeyMapping};

    fn worklog(issue_key: &str, epic_key: Option<&str>) -> Worklog {
        Worklog {
            id: 1,
            issue_key: issue_key.to_string(),
            issue_summary: String::new(),
            author_email: "dev@example.com".to_string(),
            author_display_name: "Dev".to_string(),
            time_spent_seconds: 3600,
            started: "2025-03-10".parse().unwrap(),
            jira_instance: "main".to_string(),
            epic_key: epic_key.map(str::to_string),
            epic_name: None,
            billable: true,
            package_template_id: None,
            issue_rate: None,
            epic_rate: None,
        }
    }

    fn contract(id: i64) -> Contract {
        Contract {
            id,
            name: format!("Contract {id}"),
            client_name: "Acme".to_string(),
            contract_type: ContractType::FixedPrice,
            budget_amount: Some(dec!(10000)),
            hourly_sell_rate: None,
            estimated_hours: None,
            start_date: "2025-01-01".parse().unwrap(),
            end_date: "2025-12-31".parse().unwrap(),
            notes: None,
        }
    }

    fn mapping(id: i64, contract_id: i64, target: MappingTarget) -> ContractMapping {
        ContractMapping {
            id,
            contract_id,
            jira_instance: "main".to_string(),
            target,
        }
    }

    fn snapshot_with_mappings(mappings: Vec<ContractMapping>) -> Snapshot {
        Snapshot::from_parts(
            CompanyId(1),
            vec![],
            vec![],
            vec![contract(1), contract(2)],
            mappings,
            vec![],
            vec![],
            vec![],
            BillingDefaults::default(),
        )
    }

    #[test]
    fn test_epic_mapping_beats_prefix_mapping() {
        let snapshot = snapshot_with_mappings(vec![
            mapping(1, 1, MappingTarget::ProjectPrefix("PROJ".to_string())),
            mapping(2, 2, MappingTarget::Epic("PROJ-100".to_string())),
        ]);

        let with_epic = worklog("PROJ-123", Some("PROJ-100"));
        assert_eq!(snapshot.resolve_contract(&with_epic), Some(2));

        let without_epic = worklog("PROJ-123", None);
        assert_eq!(snapshot.resolve_contract(&without_epic), Some(1));
    }

    #[test]
    fn test_unmapped_worklog_resolves_to_none() {
        let snapshot = snapshot_with_mappings(vec![mapping(
            1,
            1,
            MappingTarget::ProjectPrefix("PROJ".to_string()),
        )]);
        assert_eq!(snapshot.resolve_contract(&worklog("OTHER-5", None)), None);
    }

    #[test]
    fn test_mapping_collision_keeps_first_and_warns() {
        let snapshot = snapshot_with_mappings(vec![
            mapping(1, 1, MappingTarget::Epic("PROJ-100".to_string())),
            mapping(2, 2, MappingTarget::Epic("PROJ-100".to_string())),
        ]);

        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(
            snapshot
                .warnings
                .count_of(crate::error::WarningKind::MappingCollision),
            1
        );
        let w = worklog("PROJ-123", Some("PROJ-100"));
        assert_eq!(snapshot.resolve_contract(&w), Some(1));
    }

    #[test]
    fn test_billing_project_resolution_by_prefix() {
        let project = BillingProject {
            id: 10,
            client_id: 5,
            name: "Acme platform".to_string(),
            hourly_rate: Some(dec!(90)),
            discount_pct: None,
            mappings: vec![ProjectKeyMapping {
                jira_instance: "main".to_string(),
                project_key: "PROJ".to_string(),
            }],
        };
        let snapshot = Snapshot::from_parts(
            CompanyId(1),
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![project],
            vec![],
            BillingDefaults::default(),
        );

        assert_eq!(
            snapshot
                .resolve_billing_project(&worklog("PROJ-1", None))
                .map(|p| p.id),
            Some(10)
        );
        assert!(snapshot
            .resolve_billing_project(&worklog("OTHER-1", None))
            .is_none());
    }
}
