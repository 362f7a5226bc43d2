use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

use super::users_model::{validate_wallet_address, NewUser, UserAccount, UserProfile};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::constants::STARTING_BALANCE;
use crate::errors::Result;
use crate::ledger::{run_detached, LedgerClientTrait, LedgerWallet, DEFAULT_LEDGER_TIMEOUT};
use crate::reconciliation::{LedgerOperation, NewReconciliationEntry, ReconciliationLog};

/// Service for user accounts and their balance records
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    reconciliation: Arc<ReconciliationLog>,
    ledger: Option<Arc<dyn LedgerClientTrait>>,
    ledger_timeout: Duration,
}

impl UserService {
    /// Creates a new UserService without an external ledger
    pub fn new(repository: Arc<dyn UserRepositoryTrait>, reconciliation: Arc<ReconciliationLog>) -> Self {
        Self {
            repository,
            reconciliation,
            ledger: None,
            ledger_timeout: DEFAULT_LEDGER_TIMEOUT,
        }
    }

    /// Mirrors signups and deletions on the given ledger.
    pub fn with_ledger(mut self, ledger: Arc<dyn LedgerClientTrait>, timeout: Duration) -> Self {
        self.ledger = Some(ledger);
        self.ledger_timeout = timeout;
        self
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
}

/// Creates the local account, then mints its allowance on the ledger.
async fn create_and_mint(
    repository: Arc<dyn UserRepositoryTrait>,
    reconciliation: Arc<ReconciliationLog>,
    wallet: Option<LedgerWallet>,
    new_user: NewUser,
) -> Result<UserProfile> {
    let profile = repository.create(new_user, STARTING_BALANCE).await?;
    info!(
        "Created user {} with starting balance {}",
        profile.user.id, profile.balance
    );

    // The local account is the source of truth for the starting balance, a
    // failed mint leaves the wallet short and is queued for follow-up.
    if let Some(wallet) = wallet {
        if let Err(e) = wallet.mint_signup().await {
            warn!("Signup mint failed for user {}: {}", profile.user.id, e);
            reconciliation
                .record(NewReconciliationEntry {
                    user_id: profile.user.id.clone(),
                    wallet_address: wallet.address,
                    operation: LedgerOperation::MintSignup,
                    amount: Some(STARTING_BALANCE),
                    external_tx_ref: None,
                    failure_reason: e.to_string(),
                })
                .await;
        }
    }

    Ok(profile)
}

/// Burns the wallet on the ledger, then deletes the local account.
async fn burn_and_delete(
    repository: Arc<dyn UserRepositoryTrait>,
    reconciliation: Arc<ReconciliationLog>,
    wallet: Option<LedgerWallet>,
    user_id: String,
) -> Result<()> {
    let burn_ref = match &wallet {
        Some(wallet) => match wallet.burn_account().await {
            Ok(tx) => Some(tx.tx_ref),
            Err(e) => {
                if e.is_outcome_unknown() {
                    reconciliation
                        .record(NewReconciliationEntry {
                            user_id,
                            wallet_address: wallet.address.clone(),
                            operation: LedgerOperation::BurnAccount,
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

    match repository.delete(&user_id).await {
        Ok(removed) => {
            info!(
                "Deleted user {} and released {} investment(s)",
                user_id,
                removed.len()
            );
            Ok(())
        }
        Err(e) => {
            if let (Some(wallet), Some(tx_ref)) = (wallet, burn_ref) {
                reconciliation
                    .record(NewReconciliationEntry {
                        user_id,
                        wallet_address: wallet.address,
                        operation: LedgerOperation::BurnAccount,
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

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn create_user(&self, mut new_user: NewUser) -> Result<UserProfile> {
        new_user.validate()?;
        new_user.wallet_address = new_user.wallet_address.map(|w| w.trim().to_string());

        let wallet = self.bind_wallet(new_user.wallet_address.clone());
        run_detached(create_and_mint(
            self.repository.clone(),
            self.reconciliation.clone(),
            wallet,
            new_user,
        ))
        .await
    }

    fn get_profile(&self, user_id: &str) -> Result<UserProfile> {
        let user = self.repository.get_by_id(user_id)?;
        let balance = self.repository.get_balance(user_id)?;
        Ok(UserProfile {
            user,
            balance: balance.balance,
        })
    }

    async fn set_wallet(
        &self,
        user_id: &str,
        wallet_address: Option<String>,
    ) -> Result<UserAccount> {
        validate_wallet_address(wallet_address.as_deref())?;
        let wallet_address = wallet_address.map(|w| w.trim().to_string());
        debug!("Setting wallet for user {}: {:?}", user_id, wallet_address);
        self.repository.set_wallet(user_id, wallet_address).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let user = self.repository.get_by_id(user_id)?;
        run_detached(burn_and_delete(
            self.repository.clone(),
            self.reconciliation.clone(),
            self.bind_wallet(user.wallet_address),
            user_id.to_string(),
        ))
        .await
    }
}
