use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Option<GeoPoint>,
}

/// Lifecycle of a delivery. The happy path is
/// `Assigned -> PickedUp -> Delivered`; `Canceled` is reachable from either
/// open state and is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Assigned,
    PickedUp,
    Delivered,
    Canceled,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Assigned => "ASSIGNED",
            DeliveryStatus::PickedUp => "PICKED_UP",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Canceled => "CANCELED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Canceled)
    }

    /// Still on the rider's plate: waiting for pickup or en route.
    pub fn is_active(self) -> bool {
        matches!(self, DeliveryStatus::Assigned | DeliveryStatus::PickedUp)
    }

    pub fn can_transition_to(self, next: DeliveryStatus) -> bool {
        matches!(
            (self, next),
            (DeliveryStatus::Assigned, DeliveryStatus::PickedUp)
                | (DeliveryStatus::PickedUp, DeliveryStatus::Delivered)
                | (DeliveryStatus::Assigned, DeliveryStatus::Canceled)
                | (DeliveryStatus::PickedUp, DeliveryStatus::Canceled)
        )
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSIGNED" => Ok(DeliveryStatus::Assigned),
            "PICKED_UP" => Ok(DeliveryStatus::PickedUp),
            "DELIVERED" => Ok(DeliveryStatus::Delivered),
            "CANCELED" => Ok(DeliveryStatus::Canceled),
            other => Err(AppError::Validation(format!(
                "unknown delivery status: {other}, expected ASSIGNED/PICKED_UP/DELIVERED/CANCELED"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: String,
    pub restaurant: Restaurant,
    pub customer: Customer,
    pub status: DeliveryStatus,
    pub items: u32,
    /// Kilometers.
    pub distance: f64,
    pub earnings: f64,
    pub expected_delivery_time: DateTime<Utc>,
    /// Present exactly when `status` is `Delivered`.
    pub completed_at: Option<DateTime<Utc>>,
    pub payment_method: String,
    pub issues: Option<String>,
}

/// Broadcast on every accepted status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEvent {
    pub delivery_id: String,
    pub from: DeliveryStatus,
    pub to: DeliveryStatus,
    pub at: DateTime<Utc>,
}
