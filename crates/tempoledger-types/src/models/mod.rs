//! Data models for tempoledger

pub mod billing;
pub mod common;
pub mod contract;
pub mod costing;
pub mod worklog;

pub use billing::{
    BillingClient, BillingDefaults, BillingProject, PackageTemplate, ProjectKeyMapping,
};
pub use common::{CompanyId, DateRange};
pub use contract::{Contract, ContractMapping, ContractType, MappingTarget};
pub use costing::{Role, UserCost};
pub use worklog::Worklog;
