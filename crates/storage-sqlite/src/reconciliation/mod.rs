//! SQLite storage implementation for the ledger reconciliation log.

mod model;
mod repository;

pub use model::ReconciliationEntryDB;
pub use repository::ReconciliationRepository;
