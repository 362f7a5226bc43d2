//! Reactors module - the catalog of investable reactors.

mod reactors_catalog;
mod reactors_model;
mod reactors_service;
mod reactors_traits;


// Re-export the public interface
pub use reactors_catalog::default_catalog;
pub use reactors_model::{NewReactor, Reactor};
pub use reactors_service::ReactorService;
pub use reactors_traits::{ReactorRepositoryTrait, ReactorServiceTrait};
