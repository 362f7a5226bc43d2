use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use nuchain_core::errors::{Error, InvestmentError, Result};
use nuchain_core::investments::Investment;
use nuchain_core::users::{Balance, NewUser, UserAccount, UserProfile, UserRepositoryTrait};

use super::model::{BalanceDB, UserDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::investments::clear_for_user_in_tx;
use crate::schema::{user_balances, users};

/// Repository for users and their balance rows
pub struct UserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UserRepository {
    /// Creates a new UserRepository instance
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn user_not_found(user_id: &str) -> Error {
    Error::NotFound(format!("User '{}'", user_id))
}

pub(crate) fn load_balance_in_tx(conn: &mut SqliteConnection, user_id: &str) -> Result<BalanceDB> {
    user_balances::table
        .select(BalanceDB::as_select())
        .find(user_id)
        .first::<BalanceDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| user_not_found(user_id))
}

/// Checks affordability and subtracts `amount` inside the caller's
/// transaction. Returns the new balance.
pub(crate) fn debit_in_tx(
    conn: &mut SqliteConnection,
    user_id: &str,
    amount: Decimal,
) -> Result<Decimal> {
    let row = load_balance_in_tx(conn, user_id)?;
    let balance = Balance::try_from(row.clone())?;

    if !balance.can_afford(amount) {
        return Err(InvestmentError::InsufficientFunds {
            requested: amount,
            available: balance.balance,
        }
        .into());
    }

    let new_balance = balance.balance - amount;
    let updated = diesel::update(
        user_balances::table
            .filter(user_balances::user_id.eq(user_id))
            .filter(user_balances::balance.eq(&row.balance)),
    )
    .set((
        user_balances::balance.eq(new_balance.to_string()),
        user_balances::updated_at.eq(chrono::Utc::now().naive_utc()),
    ))
    .execute(conn)
    .map_err(StorageError::from)?;

    if updated != 1 {
        return Err(Error::ConstraintViolation(format!(
            "Balance of user {} changed during the transaction",
            user_id
        )));
    }

    Ok(new_balance)
}

/// Sets the balance to an absolute value inside the caller's transaction.
pub(crate) fn set_balance_in_tx(
    conn: &mut SqliteConnection,
    user_id: &str,
    value: Decimal,
) -> Result<Decimal> {
    let updated = diesel::update(user_balances::table.find(user_id))
        .set((
            user_balances::balance.eq(value.to_string()),
            user_balances::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;

    if updated == 0 {
        return Err(user_not_found(user_id));
    }
    Ok(value)
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_user: NewUser, starting_balance: Decimal) -> Result<UserProfile> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserProfile> {
                let user_db: UserDB = new_user.into();
                diesel::insert_into(users::table)
                    .values(&user_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let balance_db = BalanceDB {
                    user_id: user_db.id.clone(),
                    balance: starting_balance.to_string(),
                    updated_at: user_db.created_at,
                };
                diesel::insert_into(user_balances::table)
                    .values(&balance_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(UserProfile {
                    user: user_db.into(),
                    balance: starting_balance,
                })
            })
            .await
    }

    fn get_by_id(&self, user_id: &str) -> Result<UserAccount> {
        let mut conn = get_connection(&self.pool)?;

        users::table
            .select(UserDB::as_select())
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(UserAccount::from)
            .ok_or_else(|| user_not_found(user_id))
    }

    fn get_balance(&self, user_id: &str) -> Result<Balance> {
        let mut conn = get_connection(&self.pool)?;
        let row = load_balance_in_tx(&mut conn, user_id)?;
        Ok(Balance::try_from(row)?)
    }

    async fn set_wallet(
        &self,
        user_id: &str,
        wallet_address: Option<String>,
    ) -> Result<UserAccount> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserAccount> {
                let updated = diesel::update(users::table.find(&user_id))
                    .set((
                        users::wallet_address.eq(wallet_address),
                        users::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(user_not_found(&user_id));
                }

                let user = users::table
                    .select(UserDB::as_select())
                    .find(&user_id)
                    .first::<UserDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(user.into())
            })
            .await
    }

    async fn debit(&self, user_id: &str, amount: Decimal) -> Result<Decimal> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Decimal> {
                debit_in_tx(conn, &user_id, amount)
            })
            .await
    }

    async fn delete(&self, user_id: &str) -> Result<Vec<Investment>> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<Investment>> {
                // Funding has to be released before the cascade drops the rows.
                let removed = clear_for_user_in_tx(conn, &user_id)?;

                let deleted = diesel::delete(users::table.find(&user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if deleted == 0 {
                    return Err(user_not_found(&user_id));
                }
                Ok(removed)
            })
            .await
    }
}
