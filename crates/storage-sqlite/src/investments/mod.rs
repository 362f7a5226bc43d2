//! SQLite storage implementation for investments.

mod model;
mod repository;

pub use model::InvestmentDB;
pub use repository::InvestmentRepository;
pub(crate) use repository::{clear_for_user_in_tx, insert_in_tx};
