use std::sync::Arc;

use crate::{
    api::current_user_id,
    error::ApiResult,
    main_lib::AppState,
    models::{NewUser, UserProfile, WalletResetReceipt, WalletUpdate},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use nuchain_core::users::NewUser as CoreNewUser;

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = NewUser,
    responses((status = 201, body = UserProfile), (status = 400), (status = 409))
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let new_user: CoreNewUser = payload.try_into()?;
    let profile = state.user_service.create_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(profile))))
}

#[utoipa::path(get, path = "/api/v1/users/me", responses((status = 200, body = UserProfile), (status = 404)))]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<UserProfile>> {
    let user_id = current_user_id(&headers)?;
    let profile = state.user_service.get_profile(&user_id)?;
    Ok(Json(UserProfile::from(profile)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me/wallet",
    request_body = WalletUpdate,
    responses((status = 200, body = UserProfile), (status = 400))
)]
pub async fn set_wallet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<WalletUpdate>,
) -> ApiResult<Json<UserProfile>> {
    let user_id = current_user_id(&headers)?;
    state
        .user_service
        .set_wallet(&user_id, payload.wallet_address)
        .await?;
    let profile = state.user_service.get_profile(&user_id)?;
    Ok(Json(UserProfile::from(profile)))
}

#[utoipa::path(delete, path = "/api/v1/users/me", responses((status = 204), (status = 502)))]
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let user_id = current_user_id(&headers)?;
    state.user_service.delete_user(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/users/me/wallet/reset",
    responses((status = 200, body = WalletResetReceipt), (status = 502))
)]
pub async fn reset_wallet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<WalletResetReceipt>> {
    let user_id = current_user_id(&headers)?;
    let receipt = state.investment_service.reset_wallet(&user_id).await?;
    Ok(Json(WalletResetReceipt::from(receipt)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/me", get(get_me).delete(delete_me))
        .route("/users/me/wallet", put(set_wallet))
        .route("/users/me/wallet/reset", post(reset_wallet))
}
