use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{Credentials, LicenseFile, RegistrationForm, RiderApplication, User};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/applications/:id", get(get_application))
        .route("/applications/:id/approve", post(approve_application))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub form: RegistrationForm,
    pub license_file: Option<LicenseFile>,
}

async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(payload) = payload?;
    let user = state.api.login_user(payload).await?;
    Ok(Json(user))
}

async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RiderApplication>, AppError> {
    let Json(payload) = payload?;
    let application = state
        .api
        .register_rider(payload.form, payload.license_file)
        .await?;
    Ok(Json(application))
}

async fn get_application(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<RiderApplication>, AppError> {
    let Path(id) = id?;
    let application = state.api.get_application(id).await?;
    Ok(Json(application))
}

async fn approve_application(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let Path(id) = id?;
    let rider = state.api.approve_application(id).await?;
    Ok(Json(rider))
}
