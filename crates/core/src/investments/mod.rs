//! Investments module - the investment ledger and the transaction coordinator.

mod investments_model;
mod investments_service;
mod investments_traits;

#[cfg(test)]
mod investments_model_tests;

// Re-export the public interface
pub use investments_model::{
    format_amount, validate_amount, CommittedInvestment, Investment, InvestmentCommit,
    InvestmentDetail, InvestmentReceipt, NewInvestment, WalletReset, WalletResetReceipt,
};
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
