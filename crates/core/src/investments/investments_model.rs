//! Investment domain models.

use chrono::NaiveDateTime;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{AMOUNT_DECIMAL_PLACES, MAX_INVESTMENT_AMOUNT, MIN_INVESTMENT_AMOUNT};
use crate::errors::{InvestmentError, Result};
use crate::reactors::Reactor;

/// Domain model representing one user's commitment to one reactor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub user_id: String,
    pub reactor_id: String,
    pub amount: Decimal,
    pub created_at: NaiveDateTime,
}

/// An investment with its reactor embedded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDetail {
    #[serde(flatten)]
    pub investment: Investment,
    pub reactor: Reactor,
}

/// Input model for the create-investment operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    /// Reactor id or slug
    pub reactor_ref: String,
    pub amount: Decimal,
}

/// The local unit of work of an investment, after every pre-check passed.
#[derive(Debug, Clone)]
pub struct InvestmentCommit {
    pub user_id: String,
    pub reactor_id: String,
    pub amount: Decimal,
}

/// Outcome of a committed local investment transaction.
#[derive(Debug, Clone)]
pub struct CommittedInvestment {
    pub investment: Investment,
    /// Reactor state after the funding increment
    pub reactor: Reactor,
    pub remaining_balance: Decimal,
}

/// Outcome of a committed local wallet reset.
#[derive(Debug, Clone)]
pub struct WalletReset {
    pub removed: Vec<Investment>,
    pub balance: Decimal,
}

/// Result returned to the caller of create-investment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReceipt {
    pub investment: InvestmentDetail,
    pub message: String,
    pub remaining_balance: Decimal,
    pub amount_invested: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_tx_ref: Option<String>,
}

/// Result returned to the caller of reset-wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletResetReceipt {
    pub message: String,
    pub balance: Decimal,
    pub investments_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_tx_ref: Option<String>,
}

/// Checks that `amount` is a positive token amount with at most two
/// fractional digits, inside the accepted range.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(InvestmentError::InvalidAmount("Amount must be greater than zero".to_string()).into());
    }
    if amount.normalize().scale() > AMOUNT_DECIMAL_PLACES {
        return Err(InvestmentError::InvalidAmount(format!(
            "Amount cannot have more than {} decimal places",
            AMOUNT_DECIMAL_PLACES
        ))
        .into());
    }
    if amount < MIN_INVESTMENT_AMOUNT {
        return Err(InvestmentError::InvalidAmount(format!(
            "Amount must be at least {}",
            MIN_INVESTMENT_AMOUNT
        ))
        .into());
    }
    if amount >= MAX_INVESTMENT_AMOUNT {
        return Err(InvestmentError::InvalidAmount(format!(
            "Amount must be less than {}",
            MAX_INVESTMENT_AMOUNT
        ))
        .into());
    }
    Ok(())
}

/// Formats a token amount with thousands separators and two decimals,
/// e.g. `10000` as `10,000.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}
