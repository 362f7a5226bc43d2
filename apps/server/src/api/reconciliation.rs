use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use nuchain_core::reconciliation::ReconciliationEntry;

/// Divergences between the external ledger and local state, newest first.
async fn list_entries(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ReconciliationEntry>>> {
    let entries = state.reconciliation.list_entries()?;
    Ok(Json(entries))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/reconciliation", get(list_entries))
}
