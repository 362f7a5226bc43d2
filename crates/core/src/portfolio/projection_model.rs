//! Portfolio projection models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::WalletBalance;

/// Aggregate projection of a portfolio over one horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProjection {
    pub time_period_years: u32,
    pub total_roi: Decimal,
    pub total_carbon_offset: Decimal,
    /// Invested amount plus ROI
    pub total_return: Decimal,
    pub roi_percentage: Decimal,
}

/// Summary of a user's investments with one projection per horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub investment_count: usize,
    /// Reactor names, in the order they first appear
    pub reactors_invested_in: Vec<String>,
    pub projections: Vec<PortfolioProjection>,
    /// Position on the external ledger, when one is configured and reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletBalance>,
}
