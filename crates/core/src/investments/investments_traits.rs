//! Investment repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::investments_model::{
    CommittedInvestment, InvestmentCommit, InvestmentDetail, InvestmentReceipt, NewInvestment,
    WalletReset, WalletResetReceipt,
};
use crate::errors::Result;
use crate::portfolio::PortfolioSummary;

/// Trait defining the contract for investment persistence.
///
/// Inserting and clearing investment rows only happens as part of the two
/// atomic units below; neither is exposed on its own.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Lists a user's investments with their reactors, newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<InvestmentDetail>>;

    /// Retrieves one investment of a user.
    fn get_for_user(&self, user_id: &str, investment_id: &str) -> Result<InvestmentDetail>;

    /// Debits the balance, increments reactor funding and inserts the
    /// investment in one transaction.
    ///
    /// Fails with `InsufficientFunds` or `CapacityExceeded` evaluated against
    /// the state inside the transaction, in which case nothing is written.
    async fn commit_investment(&self, commit: InvestmentCommit) -> Result<CommittedInvestment>;

    /// Reverses the funding of every investment of the user, deletes them and
    /// sets the balance to `starting_balance`, in one transaction.
    async fn reset_wallet(&self, user_id: &str, starting_balance: Decimal) -> Result<WalletReset>;
}

/// Trait defining the contract for investment operations.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    /// Validates and commits an investment of the user.
    async fn invest(&self, user_id: &str, new_investment: NewInvestment)
        -> Result<InvestmentReceipt>;

    /// Lists the user's investments, newest first.
    fn list_investments(&self, user_id: &str) -> Result<Vec<InvestmentDetail>>;

    /// Retrieves one of the user's investments.
    fn get_investment(&self, user_id: &str, investment_id: &str) -> Result<InvestmentDetail>;

    /// Aggregates the user's multi-horizon projections.
    async fn portfolio_summary(&self, user_id: &str) -> Result<PortfolioSummary>;

    /// Restores the starting balance and clears every investment of the user.
    async fn reset_wallet(&self, user_id: &str) -> Result<WalletResetReceipt>;
}
