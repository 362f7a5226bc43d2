use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use nuchain_core::errors::{Error, Result};
use nuchain_core::reconciliation::{
    NewReconciliationEntry, ReconciliationEntry, ReconciliationRepositoryTrait,
};

use super::model::ReconciliationEntryDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::ledger_reconciliation;

pub struct ReconciliationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ReconciliationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ReconciliationRepositoryTrait for ReconciliationRepository {
    async fn record(&self, entry: NewReconciliationEntry) -> Result<ReconciliationEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ReconciliationEntry> {
                let row: ReconciliationEntryDB = entry.into();
                diesel::insert_into(ledger_reconciliation::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(ReconciliationEntry::try_from(row)?)
            })
            .await
    }

    fn list(&self) -> Result<Vec<ReconciliationEntry>> {
        let mut conn = get_connection(&self.pool)?;

        ledger_reconciliation::table
            .select(ReconciliationEntryDB::as_select())
            .order((
                ledger_reconciliation::created_at.desc(),
                ledger_reconciliation::id.desc(),
            ))
            .load::<ReconciliationEntryDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(|row| ReconciliationEntry::try_from(row).map_err(Error::from))
            .collect()
    }
}
