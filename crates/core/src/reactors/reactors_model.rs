//! Reactor domain models.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_DECIMAL_PRECISION, RATE_DECIMAL_PLACES};
use crate::{errors::ValidationError, Result};

/// Domain model representing one investable reactor in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reactor {
    pub id: String,
    /// Stable identifier, unique and immutable after creation
    pub slug: String,
    pub name: String,
    pub reactor_type: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    /// Explicit rank in the catalog listing
    pub display_order: i32,
    /// Annual ROI as a fraction, may be negative (0.0650 = 6.5%)
    pub annual_roi_rate: Decimal,
    /// Tonnes of CO2 offset per $NUC invested per year
    pub carbon_offset_rate: Decimal,
    pub total_funding_needed: Decimal,
    pub current_funding: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Reactor {
    /// Remaining funding capacity in $NUC.
    pub fn available_funding(&self) -> Decimal {
        self.total_funding_needed - self.current_funding
    }

    /// Share of the funding target already committed, in percent.
    pub fn funding_percentage(&self) -> Decimal {
        if self.total_funding_needed.is_zero() {
            return Decimal::ZERO;
        }
        (self.current_funding / self.total_funding_needed * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn is_fully_funded(&self) -> bool {
        self.current_funding >= self.total_funding_needed
    }

    /// Whether `amount` can be committed to this reactor right now.
    ///
    /// Pure predicate over this snapshot. The storage layer re-applies the same
    /// condition atomically when the funding counter is incremented.
    pub fn can_accept(&self, amount: Decimal) -> bool {
        self.is_active
            && amount > Decimal::ZERO
            && self.current_funding + amount <= self.total_funding_needed
    }

    /// Linear, non-compounding return on `amount` after `years`.
    pub fn roi_projection(&self, amount: Decimal, years: u32) -> Decimal {
        amount * self.annual_roi_rate * Decimal::from(years)
    }

    /// Tonnes of CO2 offset by `amount` after `years`.
    pub fn carbon_offset_projection(&self, amount: Decimal, years: u32) -> Decimal {
        amount * self.carbon_offset_rate * Decimal::from(years)
    }
}

/// Input model for provisioning a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReactor {
    pub slug: String,
    pub name: String,
    pub reactor_type: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub annual_roi_rate: Decimal,
    pub carbon_offset_rate: Decimal,
    pub total_funding_needed: Decimal,
    pub is_active: bool,
}

impl NewReactor {
    /// Validates the catalog entry before it is written.
    pub fn validate(&self) -> Result<()> {
        if self.slug.trim().is_empty() {
            return Err(ValidationError::invalid("slug", "Reactor slug cannot be empty").into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "Reactor name cannot be empty").into());
        }
        if self.annual_roi_rate.normalize().scale() > RATE_DECIMAL_PLACES {
            return Err(ValidationError::invalid(
                "annualRoiRate",
                format!("At most {} decimal places are allowed", RATE_DECIMAL_PLACES),
            )
            .into());
        }
        if self.carbon_offset_rate.is_sign_negative() {
            return Err(ValidationError::invalid(
                "carbonOffsetRate",
                "Carbon offset rate cannot be negative",
            )
            .into());
        }
        if self.total_funding_needed <= Decimal::ZERO {
            return Err(ValidationError::invalid(
                "totalFundingNeeded",
                "Total funding needed must be positive",
            )
            .into());
        }
        Ok(())
    }
}
