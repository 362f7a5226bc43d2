//! Reconciliation module - records divergences between the external ledger
//! and local state.

mod reconciliation_log;
mod reconciliation_model;

pub use reconciliation_log::{ReconciliationLog, ReconciliationRepositoryTrait};
pub use reconciliation_model::{LedgerOperation, NewReconciliationEntry, ReconciliationEntry};
