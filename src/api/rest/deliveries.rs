use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::engine::history::{HistoryPage, HistoryQuery, SortKey};
use crate::error::AppError;
use crate::geo::route::RouteView;
use crate::models::delivery::{Delivery, DeliveryStatus, GeoPoint};
use crate::remote::DashboardSnapshot;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/deliveries/:id", get(get_delivery))
        .route("/deliveries/:id/status", patch(update_status))
        .route("/deliveries/:id/route", get(route))
        .route("/history", get(history))
        .route("/location", get(location))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DeliveryStatus,
    pub issues: Option<String>,
}

/// Raw query values; `into_query` turns malformed ones into `Validation` errors.
#[derive(Deserialize)]
pub struct HistoryParams {
    pub page: Option<String>,
    pub date: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl HistoryParams {
    fn into_query(self, state: &AppState) -> Result<HistoryQuery, AppError> {
        let page = match self.page.as_deref() {
            Some(raw) => raw.trim().parse::<u32>().map_err(|err| {
                AppError::Validation(format!("invalid page {raw:?}: {err}"))
            })?,
            None => 1,
        };

        let date = match self.date.as_deref() {
            Some(raw) => Some(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(
                |err| AppError::Validation(format!("invalid date {raw:?}: {err}")),
            )?),
            None => None,
        };

        let sort = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortKey>()?,
            None => SortKey::default(),
        };

        Ok(HistoryQuery {
            page,
            date,
            search_term: self.search,
            sort,
            offset: state.history_offset,
        })
    }
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<DashboardSnapshot>, AppError> {
    let snapshot = state.api.get_dashboard().await?;
    Ok(Json(snapshot))
}

async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = state.api.get_delivery_by_id(&id).await?;
    Ok(Json(delivery))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Delivery>, AppError> {
    let Json(payload) = payload?;
    let delivery = state
        .api
        .update_delivery_status(&id, payload.status, payload.issues)
        .await?;
    Ok(Json(delivery))
}

async fn route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RouteView>, AppError> {
    let view = state.api.route_for(&id).await?;
    Ok(Json(view))
}

async fn history(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryPage>, AppError> {
    let Query(params) = params?;
    let query = params.into_query(&state)?;
    let page = state.api.get_delivery_history(query).await?;
    Ok(Json(page))
}

async fn location(State(state): State<Arc<AppState>>) -> Result<Json<GeoPoint>, AppError> {
    let here = state.api.current_location().await?;
    Ok(Json(here))
}
