use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::engine::history::{query_history, HistoryPage, HistoryQuery};
use crate::engine::lifecycle::{advance_status, find_by_id};
use crate::error::AppError;
use crate::geo::route::RouteView;
use crate::models::delivery::{Delivery, DeliveryStatus, GeoPoint};
use crate::remote::RemoteApi;
use crate::store::Lane;

/// What the live dashboard shows for today.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub completed_today: Vec<Delivery>,
    pub current: Option<Delivery>,
    pub earnings_today: f64,
}

impl DashboardSnapshot {
    pub fn from_scheduled(scheduled: Vec<Delivery>) -> Self {
        let current = scheduled
            .iter()
            .find(|delivery| delivery.status.is_active())
            .cloned();

        let completed_today: Vec<Delivery> = scheduled
            .into_iter()
            .filter(|delivery| delivery.status == DeliveryStatus::Delivered)
            .collect();

        let earnings_today = completed_today.iter().map(|delivery| delivery.earnings).sum();

        Self {
            completed_today,
            current,
            earnings_today,
        }
    }
}

impl RemoteApi {
    pub async fn get_dashboard(&self) -> Result<DashboardSnapshot, AppError> {
        self.call("get_dashboard", self.latency.dashboard, async {
            Ok(DashboardSnapshot::from_scheduled(
                self.deliveries.lane(Lane::Scheduled),
            ))
        })
        .await
    }

    pub async fn get_delivery_by_id(&self, id: &str) -> Result<Delivery, AppError> {
        self.call("get_delivery_by_id", self.latency.fetch_delivery, async {
            find_by_id(self.deliveries.as_ref(), id)
        })
        .await
    }

    /// Applies a validated status transition and broadcasts it.
    pub async fn update_delivery_status(
        &self,
        id: &str,
        status: DeliveryStatus,
        issues: Option<String>,
    ) -> Result<Delivery, AppError> {
        self.call("update_delivery_status", self.latency.update_status, async {
            let change = advance_status(self.deliveries.as_ref(), id, status, issues, Utc::now())?;

            self.metrics
                .status_transitions_total
                .with_label_values(&[status.as_str()])
                .inc();
            let _ = self.events_tx.send(change.event);

            Ok(change.delivery)
        })
        .await
    }

    pub async fn get_delivery_history(&self, query: HistoryQuery) -> Result<HistoryPage, AppError> {
        self.call("get_delivery_history", self.latency.history, async {
            Ok(query_history(self.deliveries.lane(Lane::History), &query))
        })
        .await
    }

    pub async fn current_location(&self) -> Result<GeoPoint, AppError> {
        self.call("current_location", Duration::ZERO, async {
            self.location.current_location().await
        })
        .await
    }

    /// Map data for the delivery screen: rider position, next stop and distance.
    pub async fn route_for(&self, id: &str) -> Result<RouteView, AppError> {
        self.call("route_for", self.latency.route, async {
            let delivery = find_by_id(self.deliveries.as_ref(), id)?;
            let here = self.location.current_location().await?;
            Ok(RouteView::build(&delivery, here))
        })
        .await
    }
}
