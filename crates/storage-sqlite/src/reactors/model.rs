//! Database models for reactors.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use nuchain_core::reactors::{NewReactor, Reactor};

use crate::errors::StorageError;
use crate::utils::parse_decimal;

/// Database model for reactors
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::reactors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReactorDB {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub reactor_type: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub annual_roi_rate: String,
    pub carbon_offset_rate: String,
    pub total_funding_needed: String,
    pub current_funding: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for provisioning a reactor
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::reactors)]
pub struct NewReactorDB {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub reactor_type: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub annual_roi_rate: String,
    pub carbon_offset_rate: String,
    pub total_funding_needed: String,
    pub current_funding: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ReactorDB> for Reactor {
    type Error = StorageError;

    fn try_from(db: ReactorDB) -> Result<Self, Self::Error> {
        Ok(Self {
            annual_roi_rate: parse_decimal(&db.annual_roi_rate, "annual_roi_rate")?,
            carbon_offset_rate: parse_decimal(&db.carbon_offset_rate, "carbon_offset_rate")?,
            total_funding_needed: parse_decimal(&db.total_funding_needed, "total_funding_needed")?,
            current_funding: parse_decimal(&db.current_funding, "current_funding")?,
            id: db.id,
            slug: db.slug,
            name: db.name,
            reactor_type: db.reactor_type,
            description: db.description,
            location: db.location,
            image_url: db.image_url,
            display_order: db.display_order,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewReactor> for NewReactorDB {
    fn from(domain: NewReactor) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: domain.slug,
            name: domain.name,
            reactor_type: domain.reactor_type,
            description: domain.description,
            location: domain.location,
            image_url: domain.image_url,
            display_order: domain.display_order,
            annual_roi_rate: domain.annual_roi_rate.to_string(),
            carbon_offset_rate: domain.carbon_offset_rate.to_string(),
            total_funding_needed: domain.total_funding_needed.to_string(),
            current_funding: "0".to_string(),
            is_active: domain.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
