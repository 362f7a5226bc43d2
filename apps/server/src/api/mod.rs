use std::sync::Arc;

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models,
};
use anyhow::Context;
use axum::{
    http::{HeaderMap, HeaderValue},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

mod investments;
mod reactors;
mod reconciliation;
mod users;

/// Header carrying the caller's user id, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolves the calling user from the request headers.
pub(crate) fn current_user_id(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))
}

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        reactors::list_reactors,
        reactors::get_reactor,
        users::create_user,
        users::get_me,
        users::set_wallet,
        users::delete_me,
        users::reset_wallet,
        investments::list_investments,
        investments::create_investment,
        investments::get_investment,
        investments::portfolio_summary,
    ),
    components(schemas(
        models::Reactor,
        models::UserProfile,
        models::NewUser,
        models::WalletUpdate,
        models::Investment,
        models::NewInvestment,
        models::InvestmentReceipt,
        models::WalletResetReceipt,
        models::PortfolioProjection,
        models::PortfolioSummary,
        models::WalletBalance,
    )),
    tags((name = "nuchain"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{}'", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let request_timeout = config.effective_request_timeout();
    if request_timeout != config.request_timeout {
        tracing::warn!(
            "Request timeout raised from {:?} to {:?} to outlast ledger calls",
            config.request_timeout,
            request_timeout
        );
    }

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(reactors::router())
        .merge(users::router())
        .merge(investments::router())
        .merge(reconciliation::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http()))
}
