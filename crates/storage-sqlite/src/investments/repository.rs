use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

use nuchain_core::errors::{Error, Result};
use nuchain_core::investments::{
    CommittedInvestment, Investment, InvestmentCommit, InvestmentDetail,
    InvestmentRepositoryTrait, WalletReset,
};
use nuchain_core::reactors::Reactor;

use super::model::InvestmentDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::reactors::{add_funding_in_tx, release_funding_in_tx, ReactorDB};
use crate::schema::{investments, reactors};
use crate::users::{debit_in_tx, set_balance_in_tx};

/// Repository for the investment ledger and its atomic units of work
pub struct InvestmentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    /// Creates a new InvestmentRepository instance
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn into_detail((investment, reactor): (InvestmentDB, ReactorDB)) -> Result<InvestmentDetail> {
    Ok(InvestmentDetail {
        investment: Investment::try_from(investment)?,
        reactor: Reactor::try_from(reactor)?,
    })
}

/// Inserts an investment row inside the caller's transaction. No validation.
pub(crate) fn insert_in_tx(
    conn: &mut SqliteConnection,
    user_id: &str,
    reactor_id: &str,
    amount: Decimal,
) -> Result<Investment> {
    let row = InvestmentDB {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        reactor_id: reactor_id.to_string(),
        amount: amount.to_string(),
        created_at: chrono::Utc::now().naive_utc(),
    };

    diesel::insert_into(investments::table)
        .values(&row)
        .execute(conn)
        .map_err(StorageError::from)?;

    Ok(Investment::try_from(row)?)
}

/// Deletes every investment of the user inside the caller's transaction,
/// releasing their reactor funding first. Returns the removed investments.
pub(crate) fn clear_for_user_in_tx(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<Investment>> {
    let removed = investments::table
        .select(InvestmentDB::as_select())
        .filter(investments::user_id.eq(user_id))
        .order((investments::created_at.desc(), investments::id.desc()))
        .load::<InvestmentDB>(conn)
        .into_core()?
        .into_iter()
        .map(|row| Investment::try_from(row).map_err(Error::from))
        .collect::<Result<Vec<_>>>()?;

    let mut per_reactor: BTreeMap<&str, Decimal> = BTreeMap::new();
    for investment in &removed {
        *per_reactor
            .entry(investment.reactor_id.as_str())
            .or_insert(Decimal::ZERO) += investment.amount;
    }
    for (reactor_id, amount) in per_reactor {
        release_funding_in_tx(conn, reactor_id, amount)?;
    }

    diesel::delete(investments::table.filter(investments::user_id.eq(user_id)))
        .execute(conn)
        .map_err(StorageError::from)?;

    Ok(removed)
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<InvestmentDetail>> {
        let mut conn = get_connection(&self.pool)?;

        investments::table
            .inner_join(reactors::table)
            .filter(investments::user_id.eq(user_id))
            .order((investments::created_at.desc(), investments::id.desc()))
            .select((InvestmentDB::as_select(), ReactorDB::as_select()))
            .load::<(InvestmentDB, ReactorDB)>(&mut conn)
            .into_core()?
            .into_iter()
            .map(into_detail)
            .collect()
    }

    fn get_for_user(&self, user_id: &str, investment_id: &str) -> Result<InvestmentDetail> {
        let mut conn = get_connection(&self.pool)?;

        investments::table
            .inner_join(reactors::table)
            .filter(investments::id.eq(investment_id))
            .filter(investments::user_id.eq(user_id))
            .select((InvestmentDB::as_select(), ReactorDB::as_select()))
            .first::<(InvestmentDB, ReactorDB)>(&mut conn)
            .optional()
            .into_core()?
            .map(into_detail)
            .unwrap_or_else(|| Err(Error::NotFound(format!("Investment '{}'", investment_id))))
    }

    async fn commit_investment(&self, commit: InvestmentCommit) -> Result<CommittedInvestment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CommittedInvestment> {
                let remaining_balance = debit_in_tx(conn, &commit.user_id, commit.amount)?;
                let reactor = add_funding_in_tx(conn, &commit.reactor_id, commit.amount)?;
                let investment =
                    insert_in_tx(conn, &commit.user_id, &commit.reactor_id, commit.amount)?;

                Ok(CommittedInvestment {
                    investment,
                    reactor,
                    remaining_balance,
                })
            })
            .await
    }

    async fn reset_wallet(&self, user_id: &str, starting_balance: Decimal) -> Result<WalletReset> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WalletReset> {
                let removed = clear_for_user_in_tx(conn, &user_id)?;
                let balance = set_balance_in_tx(conn, &user_id, starting_balance)?;
                Ok(WalletReset { removed, balance })
            })
            .await
    }
}
