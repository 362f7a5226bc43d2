use std::sync::Arc;

use crate::config::Config;
use nuchain_core::{
    investments::{InvestmentService, InvestmentServiceTrait},
    ledger::{HttpLedgerClient, LedgerClientTrait},
    reactors::{ReactorService, ReactorServiceTrait},
    reconciliation::ReconciliationLog,
    users::{UserService, UserServiceTrait},
};
use nuchain_storage_sqlite::{
    db::{self, write_actor},
    investments::InvestmentRepository,
    reactors::ReactorRepository,
    reconciliation::ReconciliationRepository,
    users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub reactor_service: Arc<dyn ReactorServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub investment_service: Arc<dyn InvestmentServiceTrait>,
    pub reconciliation: Arc<ReconciliationLog>,
}

pub fn init_tracing() {
    let log_format = std::env::var("NUC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also installs the `log` bridge, so the library crates' records land here.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let ledger = match &config.ledger {
        Some(ledger_config) => {
            let client: Arc<dyn LedgerClientTrait> = Arc::new(HttpLedgerClient::new(
                &ledger_config.base_url,
                ledger_config.api_key.as_deref(),
                ledger_config.timeout,
            )?);
            tracing::info!("External ledger enabled at {}", ledger_config.base_url);
            Some(client)
        }
        None => {
            tracing::info!("No external ledger configured; balances are local only");
            None
        }
    };
    build_state_with_ledger(config, ledger).await
}

/// Builds the state around an already constructed ledger client. Ledger
/// calls are bounded by the configured ledger timeout.
pub async fn build_state_with_ledger(
    config: &Config,
    ledger: Option<Arc<dyn LedgerClientTrait>>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let reactor_repository = Arc::new(ReactorRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let investment_repository = Arc::new(InvestmentRepository::new(pool.clone(), writer.clone()));
    let reconciliation_repository = Arc::new(ReconciliationRepository::new(pool.clone(), writer));

    let reconciliation = Arc::new(ReconciliationLog::new(reconciliation_repository));
    let reactor_service: Arc<dyn ReactorServiceTrait> =
        Arc::new(ReactorService::new(reactor_repository));

    if config.seed_reactors {
        reactor_service.seed_default_catalog().await?;
    }

    let mut user_service = UserService::new(user_repository.clone(), reconciliation.clone());
    let mut investment_service = InvestmentService::new(
        investment_repository,
        reactor_service.clone(),
        user_repository,
        reconciliation.clone(),
    );

    if let Some(client) = ledger {
        let timeout = config.ledger_timeout();
        user_service = user_service.with_ledger(client.clone(), timeout);
        investment_service = investment_service.with_ledger(client, timeout);
    }

    Ok(Arc::new(AppState {
        reactor_service,
        user_service: Arc::new(user_service),
        investment_service: Arc::new(investment_service),
        reconciliation,
    }))
}
