//! SQLite storage implementation for users and their balances.

mod model;
mod repository;

pub use model::{BalanceDB, UserDB};
pub use repository::UserRepository;
pub(crate) use repository::{debit_in_tx, load_balance_in_tx, set_balance_in_tx};
