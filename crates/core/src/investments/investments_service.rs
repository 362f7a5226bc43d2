use async_trait::async_trait;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use super::investments_model::{
    format_amount, validate_amount, CommittedInvestment, InvestmentCommit, InvestmentDetail,
    InvestmentReceipt, NewInvestment, WalletReset, WalletResetReceipt,
};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
use crate::constants::STARTING_BALANCE;
use crate::errors::{InvestmentError, Result};
use crate::ledger::{run_detached, LedgerClientTrait, LedgerWallet, DEFAULT_LEDGER_TIMEOUT};
use crate::portfolio::{project, PortfolioSummary};
use crate::reactors::{Reactor, ReactorServiceTrait};
use crate::reconciliation::{LedgerOperation, NewReconciliationEntry, ReconciliationLog};
use crate::users::UserRepositoryTrait;

/// Coordinates investments and wallet resets across the local ledgers and the
/// optional external token ledger.
///
/// External calls run before the local transaction, and the pair runs on a
/// detached task so a dropped request cannot stop between them. When the
/// external side committed (or timed out with an unknown outcome) and the
/// local side did not, the gap is written to the reconciliation log and the
/// error is returned unchanged.
pub struct InvestmentService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
    reactor_service: Arc<dyn ReactorServiceTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    reconciliation: Arc<ReconciliationLog>,
    ledger: Option<Arc<dyn LedgerClientTrait>>,
    ledger_timeout: Duration,
}

impl InvestmentService {
    pub fn new(
        repository: Arc<dyn InvestmentRepositoryTrait>,
        reactor_service: Arc<dyn ReactorServiceTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        reconciliation: Arc<ReconciliationLog>,
    ) -> Self {
        Self {
            repository,
            reactor_service,
            user_repository,
            reconciliation,
            ledger: None,
            ledger_timeout: DEFAULT_LEDGER_TIMEOUT,
        }
    }

    /// Mirrors locks and resets on the given ledger. Investing then requires
    /// the user to have a wallet.
    pub fn with_ledger(mut self, ledger: Arc<dyn LedgerClientTrait>, timeout: Duration) -> Self {
        self.ledger = Some(ledger);
        self.ledger_timeout = timeout;
        self
    }

    /// Resolves an active reactor; unknown and inactive reactors look the same.
    fn resolve_active_reactor(&self, reactor_ref: &str) -> Result<Reactor> {
        match self.reactor_service.get_reactor(reactor_ref) {
            Ok(reactor) if reactor.is_active => Ok(reactor),
            Ok(_) => Err(InvestmentError::ReactorNotFound(reactor_ref.to_string()).into()),
            Err(e) if e.is_not_found() => {
                Err(InvestmentError::ReactorNotFound(reactor_ref.to_string()).into())
            }
            Err(e) => Err(e),
        }
    }

    fn bind_wallet(&self, wallet_address: Option<String>) -> Option<LedgerWallet> {
        match (&self.ledger, wallet_address) {
            (Some(client), Some(address)) => Some(LedgerWallet::new(
                client.clone(),
                self.ledger_timeout,
                address,
            )),
            _ => None,
        }
    }

    /// The wallet investments are locked on, or `None` without a ledger.
    fn investing_wallet(&self, user_id: &str) -> Result<Option<LedgerWallet>> {
        if self.ledger.is_none() {
            return Ok(None);
        }
        let user = self.user_repository.get_by_id(user_id)?;
        if user.wallet_address.is_none() {
            return Err(InvestmentError::NoWallet(user_id.to_string()).into());
        }
        Ok(self.bind_wallet(user.wallet_address))
    }
}

/// Locks on the ledger, then commits locally.
async fn lock_and_commit(
    repository: Arc<dyn InvestmentRepositoryTrait>,
    reconciliation: Arc<ReconciliationLog>,
    wallet: Option<LedgerWallet>,
    commit: InvestmentCommit,
) -> Result<(CommittedInvestment, Option<String>)> {
    let user_id = commit.user_id.clone();
    let amount = commit.amount;

    let lock_ref = match &wallet {
        Some(wallet) => match wallet.lock(amount).await {
            Ok(tx) => {
                debug!("Locked {} on wallet {} in tx {}", amount, wallet.address, tx.tx_ref);
                Some(tx.tx_ref)
            }
            Err(e) => {
                warn!("Lock of {} on wallet {} failed: {}", amount, wallet.address, e);
                if e.is_outcome_unknown() {
                    reconciliation
                        .record(NewReconciliationEntry {
                            user_id,
                            wallet_address: wallet.address.clone(),
                            operation: LedgerOperation::Lock,
                            amount: Some(amount),
                            external_tx_ref: None,
                            failure_reason: format!("Outcome unknown: {}", e),
                        })
                        .await;
                }
                return Err(InvestmentError::ExternalLockFailed(e).into());
            }
        },
        None => None,
    };

    match repository.commit_investment(commit).await {
        Ok(committed) => Ok((committed, lock_ref)),
        Err(e) => {
            if let (Some(wallet), Some(tx_ref)) = (wallet, lock_ref) {
                reconciliation
                    .record(NewReconciliationEntry {
                        user_id,
                        wallet_address: wallet.address,
                        operation: LedgerOperation::Lock,
                        amount: Some(amount),
                        external_tx_ref: Some(tx_ref),
                        failure_reason: e.to_string(),
                    })
                    .await;
            }
            Err(e)
        }
    }
}

/// Unlocks the whole wallet on the ledger, then resets the local account.
async fn unlock_and_reset(
    repository: Arc<dyn InvestmentRepositoryTrait>,
    reconciliation: Arc<ReconciliationLog>,
    wallet: Option<LedgerWallet>,
    user_id: String,
) -> Result<(WalletReset, Option<String>)> {
    let unlock_ref = match &wallet {
        Some(wallet) => match wallet.unlock_all().await {
            Ok(tx) => {
                debug!("Unlocked wallet {} in tx {}", wallet.address, tx.tx_ref);
                Some(tx.tx_ref)
            }
            Err(e) => {
                if e.is_outcome_unknown() {
                    reconciliation
                        .record(NewReconciliationEntry {
                            user_id,
                            wallet_address: wallet.address.clone(),
                            operation: LedgerOperation::UnlockAll,
                            amount: None,
                            external_tx_ref: None,
                            failure_reason: format!("Outcome unknown: {}", e),
                        })
                        .await;
                }
                return Err(e.into());
            }
        },
        None => None,
    };

    match repository.reset_wallet(&user_id, STARTING_BALANCE).await {
        Ok(reset) => Ok((reset, unlock_ref)),
        Err(e) => {
            if let (Some(wallet), Some(tx_ref)) = (wallet, unlock_ref) {
                reconciliation
                    .record(NewReconciliationEntry {
                        user_id,
                        wallet_address: wallet.address,
                        operation: LedgerOperation::UnlockAll,
                        amount: None,
                        external_tx_ref: Some(tx_ref),
                        failure_reason: e.to_string(),
                    })
                    .await;
            }
            Err(e)
        }
    }
}

#[async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn invest(
        &self,
        user_id: &str,
        new_investment: NewInvestment,
    ) -> Result<InvestmentReceipt> {
        let NewInvestment {
            reactor_ref,
            amount,
        } = new_investment;

        let reactor = self.resolve_active_reactor(&reactor_ref)?;
        validate_amount(amount)?;

        if !reactor.can_accept(amount) {
            warn!(
                "Rejected investment of {} in {}: capacity exceeded",
                amount, reactor.slug
            );
            return Err(InvestmentError::CapacityExceeded {
                requested: amount,
                available: reactor.available_funding().max(Decimal::ZERO),
            }
            .into());
        }

        let wallet = self.investing_wallet(user_id)?;

        // Snapshot check so tokens are not locked for a request the local
        // transaction would reject anyway. The transaction re-checks.
        let balance = self.user_repository.get_balance(user_id)?;
        if !balance.can_afford(amount) {
            warn!(
                "Rejected investment of {} by user {}: balance is {}",
                amount, user_id, balance.balance
            );
            return Err(InvestmentError::InsufficientFunds {
                requested: amount,
                available: balance.balance,
            }
            .into());
        }

        let commit = InvestmentCommit {
            user_id: user_id.to_string(),
            reactor_id: reactor.id.clone(),
            amount,
        };
        let (committed, external_tx_ref) = run_detached(lock_and_commit(
            self.repository.clone(),
            self.reconciliation.clone(),
            wallet,
            commit,
        ))
        .await?;

        info!(
            "User {} invested {} in {} (investment {})",
            user_id, amount, committed.reactor.slug, committed.investment.id
        );

        let message = format!(
            "Successfully invested {} $NUC in {}",
            format_amount(amount),
            committed.reactor.name
        );
        Ok(InvestmentReceipt {
            investment: InvestmentDetail {
                investment: committed.investment,
                reactor: committed.reactor,
            },
            message,
            remaining_balance: committed.remaining_balance,
            amount_invested: amount,
            external_tx_ref,
        })
    }

    fn list_investments(&self, user_id: &str) -> Result<Vec<InvestmentDetail>> {
        self.repository.list_for_user(user_id)
    }

    fn get_investment(&self, user_id: &str, investment_id: &str) -> Result<InvestmentDetail> {
        self.repository.get_for_user(user_id, investment_id)
    }

    async fn portfolio_summary(&self, user_id: &str) -> Result<PortfolioSummary> {
        let user = self.user_repository.get_by_id(user_id)?;
        let investments = self.repository.list_for_user(user_id)?;
        let mut summary = project(&investments);

        if let Some(wallet) = self.bind_wallet(user.wallet_address) {
            match wallet.query_balance().await {
                Ok(balance) => summary.wallet = Some(balance),
                Err(e) => warn!(
                    "Could not read ledger balance of wallet {}: {}",
                    wallet.address, e
                ),
            }
        }

        Ok(summary)
    }

    async fn reset_wallet(&self, user_id: &str) -> Result<WalletResetReceipt> {
        let user = self.user_repository.get_by_id(user_id)?;

        let (reset, external_tx_ref) = run_detached(unlock_and_reset(
            self.repository.clone(),
            self.reconciliation.clone(),
            self.bind_wallet(user.wallet_address),
            user_id.to_string(),
        ))
        .await?;

        info!(
            "Reset wallet of user {}: removed {} investment(s)",
            user_id,
            reset.removed.len()
        );

        Ok(WalletResetReceipt {
            message: format!(
                "Wallet reset successfully! Your balance is now {} $NUC.",
                format_amount(reset.balance)
            ),
            balance: reset.balance,
            investments_removed: reset.removed.len(),
            external_tx_ref,
        })
    }
}
