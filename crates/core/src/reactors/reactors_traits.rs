//! Reactor repository and service traits.

use async_trait::async_trait;

use super::reactors_model::{NewReactor, Reactor};
use crate::errors::Result;

/// Trait defining the contract for reactor catalog persistence.
///
/// The catalog is reference data: rows are provisioned by the seed step and
/// only the funding counter changes afterwards, through the investment and
/// reset transactions of the storage layer.
#[async_trait]
pub trait ReactorRepositoryTrait: Send + Sync {
    /// Retrieves a reactor by its ID.
    fn get_by_id(&self, reactor_id: &str) -> Result<Reactor>;

    /// Retrieves a reactor by its slug.
    fn get_by_slug(&self, slug: &str) -> Result<Reactor>;

    /// Lists reactors ordered by display order, then name.
    ///
    /// # Arguments
    /// * `is_active_filter` - If Some, filter by active status
    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Reactor>>;

    /// Inserts each reactor whose slug is not present yet.
    ///
    /// Existing rows are left untouched. Returns the number of rows created.
    async fn seed(&self, reactors: Vec<NewReactor>) -> Result<usize>;
}

/// Trait defining the contract for reactor catalog operations.
#[async_trait]
pub trait ReactorServiceTrait: Send + Sync {
    /// Resolves a reactor from either its ID or its slug.
    fn get_reactor(&self, slug_or_id: &str) -> Result<Reactor>;

    /// Lists reactors with an optional active-status filter.
    fn list_reactors(&self, is_active_filter: Option<bool>) -> Result<Vec<Reactor>>;

    /// Lists the reactors open for investment.
    fn get_active_reactors(&self) -> Result<Vec<Reactor>>;

    /// Provisions the default catalog. Safe to run on every start-up.
    async fn seed_default_catalog(&self) -> Result<usize>;
}
