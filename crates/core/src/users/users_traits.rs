//! User repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::users_model::{Balance, NewUser, UserAccount, UserProfile};
use crate::errors::Result;
use crate::investments::Investment;

/// Trait defining the contract for user and balance persistence.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Creates the user and its balance record in one transaction.
    async fn create(&self, new_user: NewUser, starting_balance: Decimal) -> Result<UserProfile>;

    /// Retrieves a user by ID.
    fn get_by_id(&self, user_id: &str) -> Result<UserAccount>;

    /// Retrieves the balance record of a user.
    fn get_balance(&self, user_id: &str) -> Result<Balance>;

    /// Attaches or clears the external wallet reference.
    async fn set_wallet(&self, user_id: &str, wallet_address: Option<String>)
        -> Result<UserAccount>;

    /// Checks affordability and subtracts `amount` atomically.
    ///
    /// Fails with `InsufficientFunds` and changes nothing when the balance
    /// does not cover the amount. Returns the new balance.
    async fn debit(&self, user_id: &str, amount: Decimal) -> Result<Decimal>;

    /// Deletes the user after reversing every reactor funding contribution
    /// of their investments. Balance and investments go with the user.
    ///
    /// Returns the investments that were removed.
    async fn delete(&self, user_id: &str) -> Result<Vec<Investment>>;
}

/// Trait defining the contract for user account operations.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Registers a user with the starting balance.
    async fn create_user(&self, new_user: NewUser) -> Result<UserProfile>;

    /// Retrieves a user with their current balance.
    fn get_profile(&self, user_id: &str) -> Result<UserProfile>;

    /// Attaches or clears the user's external wallet reference.
    async fn set_wallet(&self, user_id: &str, wallet_address: Option<String>)
        -> Result<UserAccount>;

    /// Deletes the user account and releases their reactor funding.
    async fn delete_user(&self, user_id: &str) -> Result<()>;
}
