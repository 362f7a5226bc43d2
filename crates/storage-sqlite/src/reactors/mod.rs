//! SQLite storage implementation for the reactor catalog.

mod model;
mod repository;

pub use model::{NewReactorDB, ReactorDB};
pub use repository::ReactorRepository;
pub(crate) use repository::{add_funding_in_tx, release_funding_in_tx};
