//! Database models for users and balances.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use nuchain_core::users::{Balance, NewUser, UserAccount};

use crate::errors::StorageError;
use crate::utils::parse_decimal;

/// Database model for users
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for user balances
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::user_balances)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceDB {
    pub user_id: String,
    pub balance: String,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for UserAccount {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            username: db.username,
            email: db.email,
            wallet_address: db.wallet_address,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewUser> for UserDB {
    fn from(domain: NewUser) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: domain.username.trim().to_string(),
            email: domain.email.map(|e| e.trim().to_string()),
            wallet_address: domain.wallet_address.map(|w| w.trim().to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<BalanceDB> for Balance {
    type Error = StorageError;

    fn try_from(db: BalanceDB) -> Result<Self, Self::Error> {
        Ok(Self {
            balance: parse_decimal(&db.balance, "balance")?,
            user_id: db.user_id,
            updated_at: db.updated_at,
        })
    }
}
