use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::Json;
use axum::Router;

use crate::error::AppError;
use crate::hooks::PasswordChange;
use crate::models::user::{ProfileUpdate, User};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/password", put(update_password))
}

async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<User>, AppError> {
    let profile = state.api.get_profile().await?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(payload) = payload?;
    let profile = state.api.update_profile(payload).await?;
    Ok(Json(profile))
}

async fn update_password(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    state
        .api
        .update_password(&payload.current_password, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
