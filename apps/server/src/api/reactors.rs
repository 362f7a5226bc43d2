use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::Reactor};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReactorListQuery {
    include_inactive: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reactors",
    params(("includeInactive" = Option<bool>, Query, description = "Also list reactors closed for investment")),
    responses((status = 200, body = [Reactor]))
)]
pub async fn list_reactors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReactorListQuery>,
) -> ApiResult<Json<Vec<Reactor>>> {
    let reactors = if query.include_inactive.unwrap_or(false) {
        state.reactor_service.list_reactors(None)?
    } else {
        state.reactor_service.get_active_reactors()?
    };
    Ok(Json(reactors.into_iter().map(Reactor::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/reactors/{slug_or_id}",
    params(("slug_or_id" = String, Path, description = "Reactor id or slug")),
    responses((status = 200, body = Reactor), (status = 404))
)]
pub async fn get_reactor(
    Path(slug_or_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Reactor>> {
    let reactor = state.reactor_service.get_reactor(&slug_or_id)?;
    Ok(Json(Reactor::from(reactor)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reactors", get(list_reactors))
        .route("/reactors/{slug_or_id}", get(get_reactor))
}
