//! Reconciliation log models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};

/// Ledger operation involved in a divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerOperation {
    Lock,
    UnlockAll,
    MintSignup,
    BurnAccount,
}

impl LedgerOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerOperation::Lock => "LOCK",
            LedgerOperation::UnlockAll => "UNLOCK_ALL",
            LedgerOperation::MintSignup => "MINT_SIGNUP",
            LedgerOperation::BurnAccount => "BURN_ACCOUNT",
        }
    }
}

impl fmt::Display for LedgerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LOCK" => Ok(LedgerOperation::Lock),
            "UNLOCK_ALL" => Ok(LedgerOperation::UnlockAll),
            "MINT_SIGNUP" => Ok(LedgerOperation::MintSignup),
            "BURN_ACCOUNT" => Ok(LedgerOperation::BurnAccount),
            other => Err(Error::Unexpected(format!(
                "Unknown ledger operation '{}'",
                other
            ))),
        }
    }
}

/// A divergence between the external ledger and local state that needs a manual fix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationEntry {
    pub id: String,
    pub user_id: String,
    pub wallet_address: String,
    pub operation: LedgerOperation,
    pub amount: Option<Decimal>,
    pub external_tx_ref: Option<String>,
    pub failure_reason: String,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a reconciliation gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReconciliationEntry {
    pub user_id: String,
    pub wallet_address: String,
    pub operation: LedgerOperation,
    pub amount: Option<Decimal>,
    pub external_tx_ref: Option<String>,
    pub failure_reason: String,
}
