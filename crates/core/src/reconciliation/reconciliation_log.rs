use async_trait::async_trait;
use log::error;
use std::sync::Arc;

use super::reconciliation_model::{NewReconciliationEntry, ReconciliationEntry};
use crate::errors::Result;

/// Trait for reconciliation log persistence.
#[async_trait]
pub trait ReconciliationRepositoryTrait: Send + Sync {
    async fn record(&self, entry: NewReconciliationEntry) -> Result<ReconciliationEntry>;

    /// Lists entries, newest first.
    fn list(&self) -> Result<Vec<ReconciliationEntry>>;
}

/// Compensating step for ledger side effects whose local counterpart did not
/// commit, or the other way round.
///
/// Recording never fails from the caller's point of view: the gap is always
/// written to the error log, and persisted when storage is reachable.
pub struct ReconciliationLog {
    repository: Arc<dyn ReconciliationRepositoryTrait>,
}

impl ReconciliationLog {
    pub fn new(repository: Arc<dyn ReconciliationRepositoryTrait>) -> Self {
        Self { repository }
    }

    pub async fn record(&self, entry: NewReconciliationEntry) {
        error!(
            "Ledger reconciliation required: operation={} user={} wallet={} amount={} tx={} reason={}",
            entry.operation,
            entry.user_id,
            entry.wallet_address,
            entry
                .amount
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            entry.external_tx_ref.as_deref().unwrap_or("-"),
            entry.failure_reason
        );

        if let Err(e) = self.repository.record(entry).await {
            error!("Failed to persist reconciliation entry: {}", e);
        }
    }

    pub fn list_entries(&self) -> Result<Vec<ReconciliationEntry>> {
        self.repository.list()
    }
}
