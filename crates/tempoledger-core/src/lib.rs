//! tempoledger-core - Billing & financial analytics engine
//!
//! Converts imported JIRA/Tempo worklogs into money: sell-rate resolution
//! (six-level cascade), internal cost resolution, aggregation, margins,
//! budget burn & forecast, loss detection, and invoice building.

pub mod analytics;
pub mod costs;
pub mod error;
pub mod invoice;
pub mod rates;
pub mod snapshot;
pub mod store;

pub use analytics::{FinancialOverview, GroupBy};
pub use costs::{resolve_cost, CostResolution, CostSource};
pub use error::{EngineError, ReportWarning, WarningKind, WarningSet};
pub use invoice::{build_invoice, Invoice, InvoiceFilters, InvoiceLineItem};
pub use rates::{resolve_rate, RateContext, RateLevel, RateResolution, ResolvedRate};
pub use snapshot::Snapshot;
pub use store::{ConfigStore, InMemoryStore, StoreError, WorklogStore};
