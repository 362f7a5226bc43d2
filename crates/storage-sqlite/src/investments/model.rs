//! Database model for investments.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use nuchain_core::investments::Investment;

use crate::errors::StorageError;
use crate::reactors::ReactorDB;
use crate::utils::parse_decimal;

/// Database model for investments
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(ReactorDB, foreign_key = reactor_id))]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentDB {
    pub id: String,
    pub user_id: String,
    pub reactor_id: String,
    pub amount: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<InvestmentDB> for Investment {
    type Error = StorageError;

    fn try_from(db: InvestmentDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: parse_decimal(&db.amount, "amount")?,
            id: db.id,
            user_id: db.user_id,
            reactor_id: db.reactor_id,
            created_at: db.created_at,
        })
    }
}
