use log::{debug, info};
use std::sync::Arc;

use super::reactors_catalog::default_catalog;
use super::reactors_model::Reactor;
use super::reactors_traits::{ReactorRepositoryTrait, ReactorServiceTrait};
use crate::errors::{Error, Result};

/// Service for browsing and provisioning the reactor catalog
pub struct ReactorService {
    repository: Arc<dyn ReactorRepositoryTrait>,
}

impl ReactorService {
    /// Creates a new ReactorService instance
    pub fn new(repository: Arc<dyn ReactorRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl ReactorServiceTrait for ReactorService {
    fn get_reactor(&self, slug_or_id: &str) -> Result<Reactor> {
        match self.repository.get_by_id(slug_or_id) {
            Ok(reactor) => Ok(reactor),
            Err(e) if e.is_not_found() => {
                debug!("No reactor with id '{}', trying slug", slug_or_id);
                self.repository.get_by_slug(slug_or_id).map_err(|e| {
                    if e.is_not_found() {
                        Error::NotFound(format!("Reactor '{}'", slug_or_id))
                    } else {
                        e
                    }
                })
            }
            Err(e) => Err(e),
        }
    }

    fn list_reactors(&self, is_active_filter: Option<bool>) -> Result<Vec<Reactor>> {
        self.repository.list(is_active_filter)
    }

    fn get_active_reactors(&self) -> Result<Vec<Reactor>> {
        self.list_reactors(Some(true))
    }

    async fn seed_default_catalog(&self) -> Result<usize> {
        let catalog = default_catalog();
        for reactor in &catalog {
            reactor.validate()?;
        }
        let created = self.repository.seed(catalog).await?;
        info!("Reactor catalog seeded: {} new reactor(s)", created);
        Ok(created)
    }
}
