#[cfg(test)]
mod tests {
    use crate::constants::STARTING_BALANCE;
    use crate::errors::{DatabaseError, Error, Result};
    use crate::investments::Investment;
    use crate::ledger::{LedgerClientTrait, LedgerError, LedgerResult, LedgerTx, WalletBalance};
    use crate::reconciliation::{
        LedgerOperation, NewReconciliationEntry, ReconciliationEntry, ReconciliationLog,
        ReconciliationRepositoryTrait,
    };
    use crate::users::*;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // --- Mock UserRepository ---
    #[derive(Default)]
    struct MockUserRepository {
        users: Mutex<HashMap<String, UserProfile>>,
        fail_delete: bool,
    }

    impl MockUserRepository {
        fn with_user(wallet_address: Option<&str>) -> Self {
            let repo = Self::default();
            repo.users.lock().unwrap().insert(
                "user-1".to_string(),
                UserProfile {
                    user: UserAccount {
                        id: "user-1".to_string(),
                        username: "alice".to_string(),
                        email: None,
                        wallet_address: wallet_address.map(str::to_string),
                        created_at: NaiveDateTime::default(),
                        updated_at: NaiveDateTime::default(),
                    },
                    balance: STARTING_BALANCE,
                },
            );
            repo
        }

        fn count(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserRepositoryTrait for MockUserRepository {
        async fn create(&self, new_user: NewUser, starting_balance: Decimal) -> Result<UserProfile> {
            let profile = UserProfile {
                user: UserAccount {
                    id: format!("user-{}", self.count() + 1),
                    username: new_user.username,
                    email: new_user.email,
                    wallet_address: new_user.wallet_address,
                    created_at: NaiveDateTime::default(),
                    updated_at: NaiveDateTime::default(),
                },
                balance: starting_balance,
            };
            self.users
                .lock()
                .unwrap()
                .insert(profile.user.id.clone(), profile.clone());
            Ok(profile)
        }

        fn get_by_id(&self, user_id: &str) -> Result<UserAccount> {
            self.users
                .lock()
                .unwrap()
                .get(user_id)
                .map(|p| p.user.clone())
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(user_id.to_string())))
        }

        fn get_balance(&self, user_id: &str) -> Result<Balance> {
            self.users
                .lock()
                .unwrap()
                .get(user_id)
                .map(|p| Balance {
                    user_id: user_id.to_string(),
                    balance: p.balance,
                    updated_at: NaiveDateTime::default(),
                })
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(user_id.to_string())))
        }

        async fn set_wallet(
            &self,
            user_id: &str,
            wallet_address: Option<String>,
        ) -> Result<UserAccount> {
            let mut users = self.users.lock().unwrap();
            let profile = users
                .get_mut(user_id)
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(user_id.to_string())))?;
            profile.user.wallet_address = wallet_address;
            Ok(profile.user.clone())
        }

        async fn debit(&self, _user_id: &str, _amount: Decimal) -> Result<Decimal> {
            unimplemented!()
        }

        async fn delete(&self, user_id: &str) -> Result<Vec<Investment>> {
            if self.fail_delete {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "disk I/O error".to_string(),
                )));
            }
            self.users.lock().unwrap().remove(user_id);
            Ok(Vec::new())
        }
    }

    // --- Mock reconciliation repository ---
    #[derive(Default)]
    struct MockReconciliationRepository {
        entries: Mutex<Vec<NewReconciliationEntry>>,
    }

    #[async_trait]
    impl ReconciliationRepositoryTrait for MockReconciliationRepository {
        async fn record(&self, entry: NewReconciliationEntry) -> Result<ReconciliationEntry> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(ReconciliationEntry {
                id: "rec-1".to_string(),
                user_id: entry.user_id,
                wallet_address: entry.wallet_address,
                operation: entry.operation,
                amount: entry.amount,
                external_tx_ref: entry.external_tx_ref,
                failure_reason: entry.failure_reason,
                created_at: NaiveDateTime::default(),
            })
        }

        fn list(&self) -> Result<Vec<ReconciliationEntry>> {
            Ok(Vec::new())
        }
    }

    // --- Fake ledger that records calls and optionally fails them ---
    #[derive(Default)]
    struct FakeLedger {
        calls: Mutex<Vec<String>>,
        fail: bool,
        delay: Option<Duration>,
    }

    impl FakeLedger {
        fn record(&self, call: String) -> LedgerResult<LedgerTx> {
            if self.fail {
                return Err(LedgerError::TransactionReverted("execution reverted".to_string()));
            }
            self.calls.lock().unwrap().push(call);
            Ok(LedgerTx {
                tx_ref: "0xfeed".to_string(),
                block_number: None,
            })
        }
    }

    #[async_trait]
    impl LedgerClientTrait for FakeLedger {
        async fn lock(&self, _wallet_ref: &str, _amount: Decimal) -> LedgerResult<LedgerTx> {
            unimplemented!()
        }

        async fn unlock_all(&self, _wallet_ref: &str) -> LedgerResult<LedgerTx> {
            unimplemented!()
        }

        async fn mint_signup(&self, wallet_ref: &str) -> LedgerResult<LedgerTx> {
            self.record(format!("mint:{}", wallet_ref))
        }

        async fn burn_account(&self, wallet_ref: &str) -> LedgerResult<LedgerTx> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.record(format!("burn:{}", wallet_ref))
        }

        async fn query_balance(&self, _wallet_ref: &str) -> LedgerResult<WalletBalance> {
            unimplemented!()
        }
    }

    fn service(
        repo: Arc<MockUserRepository>,
        reconciliation: Arc<MockReconciliationRepository>,
        ledger: Option<Arc<FakeLedger>>,
    ) -> UserService {
        service_with_timeout(repo, reconciliation, ledger, Duration::from_secs(5))
    }

    fn service_with_timeout(
        repo: Arc<MockUserRepository>,
        reconciliation: Arc<MockReconciliationRepository>,
        ledger: Option<Arc<FakeLedger>>,
        ledger_timeout: Duration,
    ) -> UserService {
        let service = UserService::new(repo, Arc::new(ReconciliationLog::new(reconciliation)));
        match ledger {
            Some(ledger) => service.with_ledger(ledger, ledger_timeout),
            None => service,
        }
    }

    fn new_user(wallet_address: Option<&str>) -> NewUser {
        NewUser {
            username: "bob".to_string(),
            email: Some("bob@example.com".to_string()),
            wallet_address: wallet_address.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_user_starts_with_default_balance() {
        let repo = Arc::new(MockUserRepository::default());
        let svc = service(repo.clone(), Arc::default(), None);

        let profile = svc.create_user(new_user(None)).await.unwrap();
        assert_eq!(profile.balance, STARTING_BALANCE);
        assert_eq!(profile.user.username, "bob");

        let fetched = svc.get_profile(&profile.user.id).unwrap();
        assert_eq!(fetched, profile);
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_username() {
        let repo = Arc::new(MockUserRepository::default());
        let svc = service(repo.clone(), Arc::default(), None);

        let mut input = new_user(None);
        input.username = "bad name!".to_string();
        let err = svc.create_user(input).await.unwrap_err();
        match err {
            Error::Validation(e) => assert_eq!(e.field(), Some("username")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_signup_mints_on_ledger() {
        let repo = Arc::new(MockUserRepository::default());
        let ledger = Arc::new(FakeLedger::default());
        let svc = service(repo, Arc::default(), Some(ledger.clone()));

        svc.create_user(new_user(Some("0x123"))).await.unwrap();
        assert_eq!(*ledger.calls.lock().unwrap(), vec!["mint:0x123".to_string()]);
    }

    #[tokio::test]
    async fn test_signup_trims_wallet_before_storing_and_minting() {
        let repo = Arc::new(MockUserRepository::default());
        let ledger = Arc::new(FakeLedger::default());
        let svc = service(repo, Arc::default(), Some(ledger.clone()));

        let profile = svc.create_user(new_user(Some("  0x123 "))).await.unwrap();
        assert_eq!(profile.user.wallet_address.as_deref(), Some("0x123"));
        assert_eq!(*ledger.calls.lock().unwrap(), vec!["mint:0x123".to_string()]);

        let stored = svc.get_profile(&profile.user.id).unwrap();
        assert_eq!(stored.user.wallet_address.as_deref(), Some("0x123"));
    }

    #[tokio::test]
    async fn test_failed_mint_keeps_account_and_is_recorded() {
        let repo = Arc::new(MockUserRepository::default());
        let reconciliation = Arc::new(MockReconciliationRepository::default());
        let ledger = Arc::new(FakeLedger {
            fail: true,
            ..Default::default()
        });
        let svc = service(repo.clone(), reconciliation.clone(), Some(ledger));

        let profile = svc.create_user(new_user(Some("0x123"))).await.unwrap();
        assert_eq!(profile.balance, STARTING_BALANCE);
        assert_eq!(repo.count(), 1);

        let entries = reconciliation.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, LedgerOperation::MintSignup);
        assert_eq!(entries[0].amount, Some(STARTING_BALANCE));
        assert!(entries[0].external_tx_ref.is_none());
    }

    #[tokio::test]
    async fn test_set_wallet_trims_and_rejects_blank() {
        let repo = Arc::new(MockUserRepository::with_user(None));
        let svc = service(repo, Arc::default(), None);

        let user = svc
            .set_wallet("user-1", Some("  0xdef  ".to_string()))
            .await
            .unwrap();
        assert_eq!(user.wallet_address.as_deref(), Some("0xdef"));

        let err = svc
            .set_wallet("user-1", Some("   ".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let cleared = svc.set_wallet("user-1", None).await.unwrap();
        assert!(cleared.wallet_address.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_burns_then_deletes() {
        let repo = Arc::new(MockUserRepository::with_user(Some("0xabc")));
        let ledger = Arc::new(FakeLedger::default());
        let svc = service(repo.clone(), Arc::default(), Some(ledger.clone()));

        svc.delete_user("user-1").await.unwrap();
        assert_eq!(repo.count(), 0);
        assert_eq!(*ledger.calls.lock().unwrap(), vec!["burn:0xabc".to_string()]);
        assert!(svc.get_profile("user-1").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_failed_burn_keeps_account() {
        let repo = Arc::new(MockUserRepository::with_user(Some("0xabc")));
        let ledger = Arc::new(FakeLedger {
            fail: true,
            ..Default::default()
        });
        let svc = service(repo.clone(), Arc::default(), Some(ledger));

        let err = svc.delete_user("user-1").await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::TransactionReverted(_))));
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn test_burn_timeout_keeps_account_and_is_recorded() {
        let repo = Arc::new(MockUserRepository::with_user(Some("0xabc")));
        let reconciliation = Arc::new(MockReconciliationRepository::default());
        let ledger = Arc::new(FakeLedger {
            delay: Some(Duration::from_millis(500)),
            ..Default::default()
        });
        let svc = service_with_timeout(
            repo.clone(),
            reconciliation.clone(),
            Some(ledger),
            Duration::from_millis(20),
        );

        let err = svc.delete_user("user-1").await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::Timeout(_))));
        assert_eq!(repo.count(), 1);

        let entries = reconciliation.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, LedgerOperation::BurnAccount);
        assert_eq!(entries[0].wallet_address, "0xabc");
        assert!(entries[0].external_tx_ref.is_none());
    }

    #[tokio::test]
    async fn test_local_delete_failure_after_burn_is_recorded() {
        let repo = Arc::new(MockUserRepository {
            fail_delete: true,
            ..MockUserRepository::with_user(Some("0xabc"))
        });
        let reconciliation = Arc::new(MockReconciliationRepository::default());
        let ledger = Arc::new(FakeLedger::default());
        let svc = service(repo, reconciliation.clone(), Some(ledger));

        let err = svc.delete_user("user-1").await.unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::QueryFailed(_))));

        let entries = reconciliation.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, LedgerOperation::BurnAccount);
        assert_eq!(entries[0].external_tx_ref.as_deref(), Some("0xfeed"));
    }
}
