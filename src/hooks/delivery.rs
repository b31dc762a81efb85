use std::sync::Arc;

use tokio::sync::watch;

use crate::error::AppError;
use crate::geo::route::RouteView;
use crate::hooks::{HookCell, HookState};
use crate::models::delivery::{Delivery, DeliveryStatus};
use crate::remote::RemoteApi;

/// Delivery detail and navigation screen.
pub struct DeliveryHook {
    api: Arc<RemoteApi>,
    cell: HookCell<Delivery>,
}

impl DeliveryHook {
    pub fn new(api: Arc<RemoteApi>) -> Self {
        Self {
            api,
            cell: HookCell::new(),
        }
    }

    pub async fn load(&self, id: &str) -> Result<Delivery, AppError> {
        self.cell.run(self.api.get_delivery_by_id(id)).await
    }

    pub fn state(&self) -> HookState<Delivery> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<HookState<Delivery>> {
        self.cell.subscribe()
    }

    /// The status the screen's primary button moves the loaded delivery to.
    pub fn next_status(&self) -> Option<DeliveryStatus> {
        match self.cell.data()?.status {
            DeliveryStatus::Assigned => Some(DeliveryStatus::PickedUp),
            DeliveryStatus::PickedUp => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered | DeliveryStatus::Canceled => None,
        }
    }

    pub async fn advance(
        &self,
        status: DeliveryStatus,
        issues: Option<String>,
    ) -> Result<Delivery, AppError> {
        let id = self.loaded_id()?;
        self.cell
            .run(self.api.update_delivery_status(&id, status, issues))
            .await
    }

    pub async fn route(&self) -> Result<RouteView, AppError> {
        let id = self.loaded_id()?;
        self.api.route_for(&id).await
    }

    fn loaded_id(&self) -> Result<String, AppError> {
        self.cell
            .data()
            .map(|delivery| delivery.id)
            .ok_or_else(|| AppError::Validation("no delivery loaded".to_string()))
    }
}
