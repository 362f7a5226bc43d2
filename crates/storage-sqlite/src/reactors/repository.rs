use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use nuchain_core::errors::{Error, InvestmentError, Result};
use nuchain_core::reactors::{NewReactor, Reactor, ReactorRepositoryTrait};

use super::model::{NewReactorDB, ReactorDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::reactors;
use crate::schema::reactors::dsl::*;

/// Repository for the reactor catalog
pub struct ReactorRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ReactorRepository {
    /// Creates a new ReactorRepository instance
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn load_in_tx(conn: &mut SqliteConnection, reactor_id: &str) -> Result<(ReactorDB, Reactor)> {
    let row = reactors
        .select(ReactorDB::as_select())
        .find(reactor_id)
        .first::<ReactorDB>(conn)
        .into_core()?;
    let reactor = Reactor::try_from(row.clone())?;
    Ok((row, reactor))
}

/// Adds `amount` to the reactor's funding inside the caller's transaction.
///
/// Re-evaluates `can_accept` against the row read in this transaction, then
/// writes with a compare-and-set on the funding value that was read.
pub(crate) fn add_funding_in_tx(
    conn: &mut SqliteConnection,
    reactor_id: &str,
    amount: Decimal,
) -> Result<Reactor> {
    let (row, mut reactor) = load_in_tx(conn, reactor_id)?;

    if !reactor.is_active {
        return Err(InvestmentError::ReactorNotFound(reactor_id.to_string()).into());
    }
    if !reactor.can_accept(amount) {
        return Err(InvestmentError::CapacityExceeded {
            requested: amount,
            available: reactor.available_funding().max(Decimal::ZERO),
        }
        .into());
    }

    let new_funding = reactor.current_funding + amount;
    let now = chrono::Utc::now().naive_utc();
    let updated = diesel::update(
        reactors
            .filter(id.eq(reactor_id))
            .filter(current_funding.eq(&row.current_funding)),
    )
    .set((current_funding.eq(new_funding.to_string()), updated_at.eq(now)))
    .execute(conn)
    .map_err(StorageError::from)?;

    if updated != 1 {
        return Err(Error::ConstraintViolation(format!(
            "Funding of reactor {} changed during the transaction",
            reactor_id
        )));
    }

    reactor.current_funding = new_funding;
    reactor.updated_at = now;
    Ok(reactor)
}

/// Subtracts `amount` from the reactor's funding inside the caller's
/// transaction. The counter never goes below zero.
pub(crate) fn release_funding_in_tx(
    conn: &mut SqliteConnection,
    reactor_id: &str,
    amount: Decimal,
) -> Result<Decimal> {
    let (_, reactor) = load_in_tx(conn, reactor_id)?;

    let mut new_funding = reactor.current_funding - amount;
    if new_funding < Decimal::ZERO {
        warn!(
            "Funding of reactor {} would drop below zero ({}), clamping",
            reactor.slug, new_funding
        );
        new_funding = Decimal::ZERO;
    }

    diesel::update(reactors.find(reactor_id))
        .set((
            current_funding.eq(new_funding.to_string()),
            updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;

    Ok(new_funding)
}

#[async_trait]
impl ReactorRepositoryTrait for ReactorRepository {
    fn get_by_id(&self, reactor_id: &str) -> Result<Reactor> {
        let mut conn = get_connection(&self.pool)?;

        let row = reactors
            .select(ReactorDB::as_select())
            .find(reactor_id)
            .first::<ReactorDB>(&mut conn)
            .into_core()?;

        Ok(Reactor::try_from(row)?)
    }

    fn get_by_slug(&self, reactor_slug: &str) -> Result<Reactor> {
        let mut conn = get_connection(&self.pool)?;

        let row = reactors
            .select(ReactorDB::as_select())
            .filter(slug.eq(reactor_slug))
            .first::<ReactorDB>(&mut conn)
            .into_core()?;

        Ok(Reactor::try_from(row)?)
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Reactor>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = reactors::table.into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(is_active.eq(active));
        }

        let rows = query
            .select(ReactorDB::as_select())
            .order((display_order.asc(), name.asc()))
            .load::<ReactorDB>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|row| Reactor::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn seed(&self, catalog: Vec<NewReactor>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut created = 0;
                for new_reactor in catalog {
                    let row: NewReactorDB = new_reactor.into();
                    created += diesel::insert_into(reactors::table)
                        .values(&row)
                        .on_conflict(slug)
                        .do_nothing()
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(created)
            })
            .await
    }
}
