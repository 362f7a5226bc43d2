//! NuChain Core - Domain entities, services, and traits.
//!
//! This crate contains the investment accounting logic for NuChain: the reactor
//! catalog, the per-user token ledger, the investment coordinator and the
//! portfolio projection engine. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod investments;
pub mod ledger;
pub mod portfolio;
pub mod reactors;
pub mod reconciliation;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
