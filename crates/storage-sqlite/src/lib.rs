//! SQLite storage implementation for NuChain.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `nuchain-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for reactors, users, investments and the
//!   reconciliation log
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! Every write runs on the single writer connection inside an `IMMEDIATE`
//! transaction, so a job's reads and writes form one serializable unit.
//!
//! ```text
//!      core (domain)
//!            │
//!            ▼
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod investments;
pub mod reactors;
pub mod reconciliation;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from nuchain-core for convenience
pub use nuchain_core::errors::{DatabaseError, Error, Result};
