//! Database model for reconciliation entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::str::FromStr;

use nuchain_core::reconciliation::{LedgerOperation, NewReconciliationEntry, ReconciliationEntry};

use crate::errors::StorageError;
use crate::utils::parse_optional_decimal;

/// Database model for reconciliation entries
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_reconciliation)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReconciliationEntryDB {
    pub id: String,
    pub user_id: String,
    pub wallet_address: String,
    pub operation: String,
    pub amount: Option<String>,
    pub external_tx_ref: Option<String>,
    pub failure_reason: String,
    pub created_at: NaiveDateTime,
}

impl From<NewReconciliationEntry> for ReconciliationEntryDB {
    fn from(domain: NewReconciliationEntry) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: domain.user_id,
            wallet_address: domain.wallet_address,
            operation: domain.operation.as_str().to_string(),
            amount: domain.amount.map(|a| a.to_string()),
            external_tx_ref: domain.external_tx_ref,
            failure_reason: domain.failure_reason,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<ReconciliationEntryDB> for ReconciliationEntry {
    type Error = StorageError;

    fn try_from(db: ReconciliationEntryDB) -> Result<Self, Self::Error> {
        let operation = LedgerOperation::from_str(&db.operation)
            .map_err(|e| StorageError::CorruptValue(e.to_string()))?;
        Ok(Self {
            amount: parse_optional_decimal(db.amount.as_deref(), "amount")?,
            operation,
            id: db.id,
            user_id: db.user_id,
            wallet_address: db.wallet_address,
            external_tx_ref: db.external_tx_ref,
            failure_reason: db.failure_reason,
            created_at: db.created_at,
        })
    }
}
