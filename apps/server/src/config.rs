use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

const DEFAULT_LEDGER_TIMEOUT_MS: u64 = 120_000;

/// Margin the request timeout keeps over a single ledger call.
const LEDGER_TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Run the idempotent reactor catalog seed at start-up
    pub seed_reactors: bool,
    pub ledger: Option<LedgerConfig>,
}

/// Connection settings of the external token ledger gateway.
pub struct LedgerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("NUC_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid NUC_LISTEN_ADDR")?;
        let db_path = std::env::var("NUC_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("NUC_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("NUC_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let seed_reactors = std::env::var("NUC_SEED_REACTORS")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        let ledger = std::env::var("NUC_LEDGER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|base_url| {
                let timeout_ms: u64 = std::env::var("NUC_LEDGER_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_LEDGER_TIMEOUT_MS);
                LedgerConfig {
                    base_url,
                    api_key: std::env::var("NUC_LEDGER_API_KEY")
                        .ok()
                        .filter(|key| !key.is_empty()),
                    timeout: Duration::from_millis(timeout_ms),
                }
            });

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            seed_reactors,
            ledger,
        })
    }

    /// Timeout of one external ledger call.
    pub fn ledger_timeout(&self) -> Duration {
        self.ledger
            .as_ref()
            .map(|ledger| ledger.timeout)
            .unwrap_or(Duration::from_millis(DEFAULT_LEDGER_TIMEOUT_MS))
    }

    /// Request timeout the HTTP layer enforces. With a ledger configured it
    /// never fires before a ledger call has timed out on its own.
    pub fn effective_request_timeout(&self) -> Duration {
        match &self.ledger {
            Some(ledger) => self
                .request_timeout
                .max(ledger.timeout + LEDGER_TIMEOUT_HEADROOM),
            None => self.request_timeout,
        }
    }
}
