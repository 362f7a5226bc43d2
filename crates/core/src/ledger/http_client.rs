//! HTTP client for the external ledger gateway.
//!
//! The gateway fronts the token contract and exposes one endpoint per
//! capability. Token amounts travel as decimal strings so no precision is lost
//! on either side.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::Duration;

use super::ledger_model::{LedgerError, LedgerResult, LedgerTx, WalletBalance};
use super::ledger_traits::LedgerClientTrait;
use crate::errors::{Error, Result};

/// Default timeout for a ledger call, receipts can take minutes to confirm.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, serde::Serialize)]
struct ApiAmountRequest {
    amount: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTxResponse {
    tx_hash: String,
    #[serde(default)]
    block_number: Option<u64>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiBalanceResponse {
    address: String,
    total: String,
    locked: String,
    available: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// HTTP implementation of [`LedgerClientTrait`].
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<HeaderValue>,
    timeout: Duration,
}

impl HttpLedgerClient {
    /// Create a new gateway client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Gateway root, e.g. "http://localhost:8545/ledger"
    /// * `api_key` - Optional bearer token
    /// * `timeout` - Upper bound for every call, including receipt confirmation
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let auth_header = api_key
            .map(|key| {
                HeaderValue::from_str(&format!("Bearer {}", key))
                    .map_err(|e| Error::ConfigIO(format!("Invalid ledger API key: {}", e)))
            })
            .transpose()?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
            timeout,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    fn wallet_url(&self, wallet_ref: &str, action: &str) -> String {
        format!(
            "{}/wallets/{}/{}",
            self.base_url,
            urlencoding::encode(wallet_ref),
            action
        )
    }

    fn map_transport_error(&self, err: reqwest::Error) -> LedgerError {
        if err.is_timeout() {
            LedgerError::Timeout(self.timeout)
        } else if err.is_connect() {
            LedgerError::Connection(err.to_string())
        } else {
            LedgerError::Unexpected(err.to_string())
        }
    }

    async fn post_tx(&self, url: String, body: Option<ApiAmountRequest>) -> LedgerResult<LedgerTx> {
        debug!("[Ledger] POST {}", url);
        let mut request = self.client.post(&url).headers(self.headers());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let tx: ApiTxResponse = self.parse_response(response).await?;
        Ok(LedgerTx {
            tx_ref: tx.tx_hash,
            block_number: tx.block_number,
        })
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> LedgerResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| LedgerError::Unexpected(format!("Failed to parse response: {}", e)))
    }
}

/// Maps a non-success gateway response onto the ledger error taxonomy.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> LedgerError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).unwrap_or_default();
    let message = parsed
        .error
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>()));

    match parsed.code.as_deref() {
        Some("INSUFFICIENT_GAS") => LedgerError::InsufficientGas(message),
        Some("INSUFFICIENT_BALANCE") => LedgerError::InsufficientBalance(message),
        Some("REVERTED") => LedgerError::TransactionReverted(message),
        _ if status == StatusCode::BAD_GATEWAY || status == StatusCode::SERVICE_UNAVAILABLE => {
            LedgerError::Connection(message)
        }
        _ if status == StatusCode::GATEWAY_TIMEOUT => LedgerError::Timeout(DEFAULT_LEDGER_TIMEOUT),
        _ => LedgerError::Unexpected(message),
    }
}

fn parse_amount(field: &str, value: &str) -> LedgerResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| LedgerError::Unexpected(format!("Invalid {} '{}': {}", field, value, e)))
}

#[async_trait]
impl LedgerClientTrait for HttpLedgerClient {
    async fn lock(&self, wallet_ref: &str, amount: Decimal) -> LedgerResult<LedgerTx> {
        let body = ApiAmountRequest {
            amount: amount.to_string(),
        };
        self.post_tx(self.wallet_url(wallet_ref, "lock"), Some(body))
            .await
    }

    async fn unlock_all(&self, wallet_ref: &str) -> LedgerResult<LedgerTx> {
        self.post_tx(self.wallet_url(wallet_ref, "unlock-all"), None)
            .await
    }

    async fn mint_signup(&self, wallet_ref: &str) -> LedgerResult<LedgerTx> {
        self.post_tx(self.wallet_url(wallet_ref, "mint-signup"), None)
            .await
    }

    async fn burn_account(&self, wallet_ref: &str) -> LedgerResult<LedgerTx> {
        self.post_tx(self.wallet_url(wallet_ref, "burn"), None)
            .await
    }

    async fn query_balance(&self, wallet_ref: &str) -> LedgerResult<WalletBalance> {
        let url = self.wallet_url(wallet_ref, "balance");
        debug!("[Ledger] GET {}", url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let balance: ApiBalanceResponse = self.parse_response(response).await?;
        Ok(WalletBalance {
            address: balance.address,
            total: parse_amount("total", &balance.total)?,
            locked: parse_amount("locked", &balance.locked)?,
            available: parse_amount("available", &balance.available)?,
        })
    }
}
