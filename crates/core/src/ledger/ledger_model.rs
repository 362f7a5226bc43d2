//! External ledger models and errors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Failures reported by the external ledger capability.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Failed to connect to the ledger: {0}")]
    Connection(String),

    #[error("Ledger transaction reverted: {0}")]
    TransactionReverted(String),

    #[error("Ledger operator has insufficient gas: {0}")]
    InsufficientGas(String),

    #[error("Wallet has insufficient available tokens: {0}")]
    InsufficientBalance(String),

    #[error("Ledger call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected ledger response: {0}")]
    Unexpected(String),
}

impl LedgerError {
    /// The call gave up without learning whether the ledger committed it.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, LedgerError::Timeout(_))
    }
}

/// Receipt of a transaction committed on the external ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTx {
    pub tx_ref: String,
    pub block_number: Option<u64>,
}

/// Token position of one wallet on the external ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub address: String,
    pub total: Decimal,
    pub locked: Decimal,
    pub available: Decimal,
}
