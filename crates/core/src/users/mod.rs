//! Users module - accounts, balances and the user ledger.

mod users_model;
mod users_service;
mod users_traits;

#[cfg(test)]
mod users_service_tests;

// Re-export the public interface
pub use users_model::{
    can_afford, validate_wallet_address, Balance, NewUser, UserAccount, UserProfile,
};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
