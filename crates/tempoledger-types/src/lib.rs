//! tempoledger-types - Shared data types for tempoledger
//!
//! This crate contains pure data structures without heavy dependencies.
//! No async runtime, no I/O - just serde-serializable domain entities.
//!
//! Used by:
//! - tempoledger-core (billing & analytics engine)
//! - the API layer (response serialization)

pub mod models;

// Re-export model types
pub use models::{
    BillingClient, BillingDefaults, BillingProject, CompanyId, Contract, ContractMapping,
    ContractType, DateRange, MappingTarget, PackageTemplate, ProjectKeyMapping, Role, UserCost,
    Worklog,
};
