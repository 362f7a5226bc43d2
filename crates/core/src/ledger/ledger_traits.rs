use async_trait::async_trait;
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::ledger_model::{LedgerError, LedgerResult, LedgerTx, WalletBalance};
use crate::errors::{Error, Result};

/// Capability surface of the external token ledger.
///
/// The coordinator receives an implementation at construction time; no
/// global client exists. Every call is blocking I/O from the caller's point
/// of view and either commits on the ledger or fails.
#[async_trait]
pub trait LedgerClientTrait: Send + Sync {
    /// Marks `amount` tokens of the wallet as locked.
    async fn lock(&self, wallet_ref: &str, amount: Decimal) -> LedgerResult<LedgerTx>;

    /// Releases every locked token of the wallet.
    async fn unlock_all(&self, wallet_ref: &str) -> LedgerResult<LedgerTx>;

    /// Mints the signup allowance into a freshly registered wallet.
    async fn mint_signup(&self, wallet_ref: &str) -> LedgerResult<LedgerTx>;

    /// Burns every token held by the wallet.
    async fn burn_account(&self, wallet_ref: &str) -> LedgerResult<LedgerTx>;

    /// Returns total, locked and available tokens of the wallet.
    async fn query_balance(&self, wallet_ref: &str) -> LedgerResult<WalletBalance>;
}

/// Runs a ledger call, failing with `LedgerError::Timeout` once `limit` elapses.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> LedgerResult<T>
where
    F: Future<Output = LedgerResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Timeout(limit)),
    }
}

/// Runs a workflow that pairs a ledger call with a local commit on its own
/// task. Dropping the returned future does not cancel `work`.
pub async fn run_detached<T, F>(work: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| Error::Unexpected(format!("Ledger workflow task failed: {}", e)))?
}

/// A user's wallet bound to the ledger client and call timeout used for it.
#[derive(Clone)]
pub struct LedgerWallet {
    client: Arc<dyn LedgerClientTrait>,
    timeout: Duration,
    pub address: String,
}

impl LedgerWallet {
    pub fn new(client: Arc<dyn LedgerClientTrait>, timeout: Duration, address: String) -> Self {
        Self {
            client,
            timeout,
            address,
        }
    }

    pub async fn lock(&self, amount: Decimal) -> LedgerResult<LedgerTx> {
        with_timeout(self.timeout, self.client.lock(&self.address, amount)).await
    }

    pub async fn unlock_all(&self) -> LedgerResult<LedgerTx> {
        with_timeout(self.timeout, self.client.unlock_all(&self.address)).await
    }

    pub async fn mint_signup(&self) -> LedgerResult<LedgerTx> {
        with_timeout(self.timeout, self.client.mint_signup(&self.address)).await
    }

    pub async fn burn_account(&self) -> LedgerResult<LedgerTx> {
        with_timeout(self.timeout, self.client.burn_account(&self.address)).await
    }

    pub async fn query_balance(&self) -> LedgerResult<WalletBalance> {
        with_timeout(self.timeout, self.client.query_balance(&self.address)).await
    }
}
