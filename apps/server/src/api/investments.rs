use std::sync::Arc;

use crate::{
    api::current_user_id,
    error::ApiResult,
    main_lib::AppState,
    models::{Investment, InvestmentReceipt, NewInvestment, PortfolioSummary},
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use nuchain_core::investments::NewInvestment as CoreNewInvestment;

#[utoipa::path(get, path = "/api/v1/investments", responses((status = 200, body = [Investment])))]
pub async fn list_investments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Investment>>> {
    let user_id = current_user_id(&headers)?;
    let investments = state.investment_service.list_investments(&user_id)?;
    Ok(Json(investments.into_iter().map(Investment::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/investments",
    request_body = NewInvestment,
    responses(
        (status = 201, body = InvestmentReceipt),
        (status = 400, description = "Invalid amount or missing field"),
        (status = 404, description = "Unknown or inactive reactor"),
        (status = 409, description = "Insufficient funds or capacity exceeded"),
        (status = 412, description = "No external wallet"),
        (status = 502, description = "External ledger failure")
    )
)]
pub async fn create_investment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<NewInvestment>,
) -> ApiResult<(StatusCode, Json<InvestmentReceipt>)> {
    let user_id = current_user_id(&headers)?;
    let new_investment: CoreNewInvestment = payload.try_into()?;
    let receipt = state
        .investment_service
        .invest(&user_id, new_investment)
        .await?;
    Ok((StatusCode::CREATED, Json(InvestmentReceipt::from(receipt))))
}

#[utoipa::path(
    get,
    path = "/api/v1/investments/{id}",
    params(("id" = String, Path, description = "Investment id")),
    responses((status = 200, body = Investment), (status = 404))
)]
pub async fn get_investment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Investment>> {
    let user_id = current_user_id(&headers)?;
    let investment = state.investment_service.get_investment(&user_id, &id)?;
    Ok(Json(Investment::from(investment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/investments/portfolio-summary",
    responses((status = 200, body = PortfolioSummary))
)]
pub async fn portfolio_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<PortfolioSummary>> {
    let user_id = current_user_id(&headers)?;
    let summary = state.investment_service.portfolio_summary(&user_id).await?;
    Ok(Json(PortfolioSummary::from(summary)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/investments",
            get(list_investments).post(create_investment),
        )
        .route("/investments/portfolio-summary", get(portfolio_summary))
        .route("/investments/{id}", get(get_investment))
}
