//! User account and balance domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Result};

const MAX_USERNAME_LENGTH: usize = 150;

/// Domain model representing a registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    /// Address of the user's wallet on the external ledger
    pub wallet_address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Token balance held by one user. Exactly one exists per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub user_id: String,
    pub balance: Decimal,
    pub updated_at: NaiveDateTime,
}

impl Balance {
    pub fn can_afford(&self, amount: Decimal) -> bool {
        can_afford(self.balance, amount)
    }
}

/// True when `balance` covers `amount`.
pub fn can_afford(balance: Decimal, amount: Decimal) -> bool {
    balance >= amount
}

/// A user together with their current balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserAccount,
    pub balance: Decimal,
}

/// Input model for registering a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
}

impl NewUser {
    /// Validates the registration data.
    pub fn validate(&self) -> Result<()> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::invalid("username", "Username cannot be empty").into());
        }
        if username.len() > MAX_USERNAME_LENGTH {
            return Err(ValidationError::invalid(
                "username",
                format!("Username cannot exceed {} characters", MAX_USERNAME_LENGTH),
            )
            .into());
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(ValidationError::invalid(
                "username",
                "Username may only contain letters, digits and @/./+/-/_",
            )
            .into());
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ValidationError::invalid("email", "Enter a valid email address").into());
            }
        }
        validate_wallet_address(self.wallet_address.as_deref())
    }
}

/// A wallet reference is opaque, it only has to be non-blank when present.
pub fn validate_wallet_address(wallet_address: Option<&str>) -> Result<()> {
    match wallet_address {
        Some(address) if address.trim().is_empty() => Err(ValidationError::invalid(
            "walletAddress",
            "Wallet address cannot be blank",
        )
        .into()),
        _ => Ok(()),
    }
}
