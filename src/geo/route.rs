use serde::Serialize;

use crate::format::format_distance;
use crate::geo::haversine_km;
use crate::models::delivery::{Delivery, DeliveryStatus, GeoPoint};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStage {
    /// Heading to the restaurant.
    Pickup,
    /// Heading to the customer.
    Dropoff,
}

impl RouteStage {
    pub fn for_status(status: DeliveryStatus) -> Self {
        if status == DeliveryStatus::Assigned {
            RouteStage::Pickup
        } else {
            RouteStage::Dropoff
        }
    }
}

/// What the map draws for one delivery: the rider, the next stop and the
/// straight-line distance between them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    pub delivery_id: String,
    pub stage: RouteStage,
    pub current_location: GeoPoint,
    pub destination_name: String,
    pub destination_address: String,
    pub destination: Option<GeoPoint>,
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
}

impl RouteView {
    pub fn build(delivery: &Delivery, current_location: GeoPoint) -> Self {
        let stage = RouteStage::for_status(delivery.status);
        let (destination_name, destination_address, destination) = match stage {
            RouteStage::Pickup => (
                delivery.restaurant.name.clone(),
                delivery.restaurant.address.clone(),
                delivery.restaurant.location,
            ),
            RouteStage::Dropoff => (
                delivery.customer.name.clone(),
                delivery.customer.address.clone(),
                delivery.customer.location,
            ),
        };

        let mut view = Self {
            delivery_id: delivery.id.clone(),
            stage,
            current_location,
            destination_name,
            destination_address,
            destination,
            distance_km: None,
            distance_label: None,
        };
        view.recenter(current_location);
        view
    }

    /// Moves the rider marker and recomputes the distance.
    pub fn recenter(&mut self, current_location: GeoPoint) {
        self.current_location = current_location;
        self.distance_km = self
            .destination
            .map(|destination| haversine_km(&current_location, &destination));
        self.distance_label = self.distance_km.map(format_distance);
    }
}
