//! External ledger module - the opaque token-ledger capability and its HTTP client.

mod http_client;
mod ledger_model;
mod ledger_traits;

pub use http_client::{HttpLedgerClient, DEFAULT_LEDGER_TIMEOUT};
pub use ledger_model::{LedgerError, LedgerResult, LedgerTx, WalletBalance};
pub use ledger_traits::{run_detached, with_timeout, LedgerClientTrait, LedgerWallet};
