use std::str::FromStr;

use chrono::NaiveDateTime;
use nuchain_core::errors::ValidationError;
use nuchain_core::investments as core_investments;
use nuchain_core::ledger as core_ledger;
use nuchain_core::portfolio as core_portfolio;
use nuchain_core::reactors as core_reactors;
use nuchain_core::users as core_users;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Reactor {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub reactor_type: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    pub display_order: i32,
    #[schema(value_type = f64)]
    pub annual_roi_rate: Decimal,
    #[schema(value_type = f64)]
    pub carbon_offset_rate: Decimal,
    #[schema(value_type = f64)]
    pub total_funding_needed: Decimal,
    #[schema(value_type = f64)]
    pub current_funding: Decimal,
    #[schema(value_type = f64)]
    pub funding_percentage: Decimal,
    #[schema(value_type = f64)]
    pub available_funding: Decimal,
    pub is_fully_funded: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<core_reactors::Reactor> for Reactor {
    fn from(r: core_reactors::Reactor) -> Self {
        Self {
            funding_percentage: r.funding_percentage(),
            available_funding: r.available_funding(),
            is_fully_funded: r.is_fully_funded(),
            id: r.id,
            slug: r.slug,
            name: r.name,
            reactor_type: r.reactor_type,
            description: r.description,
            location: r.location,
            image_url: r.image_url,
            display_order: r.display_order,
            annual_roi_rate: r.annual_roi_rate,
            carbon_offset_rate: r.carbon_offset_rate,
            total_funding_needed: r.total_funding_needed,
            current_funding: r.current_funding,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    #[schema(value_type = f64)]
    pub balance: Decimal,
    pub created_at: NaiveDateTime,
}

impl From<core_users::UserProfile> for UserProfile {
    fn from(p: core_users::UserProfile) -> Self {
        Self {
            id: p.user.id,
            username: p.user.username,
            email: p.user.email,
            wallet_address: p.user.wallet_address,
            balance: p.balance,
            created_at: p.user.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
}

impl TryFrom<NewUser> for core_users::NewUser {
    type Error = ValidationError;

    fn try_from(n: NewUser) -> Result<Self, Self::Error> {
        let username = n
            .username
            .ok_or_else(|| ValidationError::MissingField("username".to_string()))?;
        Ok(Self {
            username,
            email: n.email.filter(|e| !e.trim().is_empty()),
            wallet_address: n.wallet_address,
        })
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdate {
    /// `null` detaches the wallet
    pub wallet_address: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub reactor_id: String,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub created_at: NaiveDateTime,
    pub reactor: Reactor,
}

impl From<core_investments::InvestmentDetail> for Investment {
    fn from(d: core_investments::InvestmentDetail) -> Self {
        Self {
            id: d.investment.id,
            reactor_id: d.investment.reactor_id,
            amount: d.investment.amount,
            created_at: d.investment.created_at,
            reactor: d.reactor.into(),
        }
    }
}

/// Body of create-investment. `amount` accepts a JSON number or a decimal string.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    /// Reactor id or slug
    pub reactor_id: Option<String>,
    #[schema(value_type = f64)]
    pub amount: Option<serde_json::Value>,
}

impl TryFrom<NewInvestment> for core_investments::NewInvestment {
    type Error = ValidationError;

    fn try_from(n: NewInvestment) -> Result<Self, Self::Error> {
        let reactor_ref = n
            .reactor_id
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ValidationError::MissingField("reactorId".to_string()))?;
        let amount = parse_amount(n.amount.as_ref())?;
        Ok(Self {
            reactor_ref,
            amount,
        })
    }
}

fn parse_amount(value: Option<&serde_json::Value>) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::invalid("amount", "Enter a valid number.");
    let text = match value {
        None | Some(serde_json::Value::Null) => {
            return Err(ValidationError::MissingField("amount".to_string()))
        }
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(invalid()),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid())
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReceipt {
    pub investment: Investment,
    pub message: String,
    #[schema(value_type = f64)]
    pub remaining_balance: Decimal,
    #[schema(value_type = f64)]
    pub amount_invested: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_tx_ref: Option<String>,
}

impl From<core_investments::InvestmentReceipt> for InvestmentReceipt {
    fn from(r: core_investments::InvestmentReceipt) -> Self {
        Self {
            investment: r.investment.into(),
            message: r.message,
            remaining_balance: r.remaining_balance,
            amount_invested: r.amount_invested,
            external_tx_ref: r.external_tx_ref,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WalletResetReceipt {
    pub message: String,
    #[schema(value_type = f64)]
    pub balance: Decimal,
    pub investments_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_tx_ref: Option<String>,
}

impl From<core_investments::WalletResetReceipt> for WalletResetReceipt {
    fn from(r: core_investments::WalletResetReceipt) -> Self {
        Self {
            message: r.message,
            balance: r.balance,
            investments_removed: r.investments_removed,
            external_tx_ref: r.external_tx_ref,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProjection {
    pub time_period_years: u32,
    #[schema(value_type = f64)]
    pub total_roi: Decimal,
    #[schema(value_type = f64)]
    pub total_carbon_offset: Decimal,
    #[schema(value_type = f64)]
    pub total_return: Decimal,
    #[schema(value_type = f64)]
    pub roi_percentage: Decimal,
}

impl From<core_portfolio::PortfolioProjection> for PortfolioProjection {
    fn from(p: core_portfolio::PortfolioProjection) -> Self {
        Self {
            time_period_years: p.time_period_years,
            total_roi: p.total_roi,
            total_carbon_offset: p.total_carbon_offset,
            total_return: p.total_return,
            roi_percentage: p.roi_percentage,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub address: String,
    #[schema(value_type = f64)]
    pub total: Decimal,
    #[schema(value_type = f64)]
    pub locked: Decimal,
    #[schema(value_type = f64)]
    pub available: Decimal,
}

impl From<core_ledger::WalletBalance> for WalletBalance {
    fn from(w: core_ledger::WalletBalance) -> Self {
        Self {
            address: w.address,
            total: w.total,
            locked: w.locked,
            available: w.available,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[schema(value_type = f64)]
    pub total_invested: Decimal,
    pub investment_count: usize,
    pub reactors_invested_in: Vec<String>,
    pub projections: Vec<PortfolioProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletBalance>,
}

impl From<core_portfolio::PortfolioSummary> for PortfolioSummary {
    fn from(s: core_portfolio::PortfolioSummary) -> Self {
        Self {
            total_invested: s.total_invested,
            investment_count: s.investment_count,
            reactors_invested_in: s.reactors_invested_in,
            projections: s.projections.into_iter().map(Into::into).collect(),
            wallet: s.wallet.map(Into::into),
        }
    }
}
