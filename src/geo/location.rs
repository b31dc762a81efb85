use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::time::sleep;

use crate::error::AppError;
use crate::models::delivery::GeoPoint;

/// Source of the rider's current position.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> BoxFuture<'_, Result<GeoPoint, AppError>>;
}

/// Reports a fixed position after a simulated fix delay.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    point: GeoPoint,
    delay: Duration,
}

impl FixedLocation {
    pub fn new(point: GeoPoint, delay: Duration) -> Self {
        Self { point, delay }
    }

    pub fn san_francisco(delay: Duration) -> Self {
        Self::new(
            GeoPoint {
                lat: 37.7749,
                lng: -122.4194,
            },
            delay,
        )
    }
}

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> BoxFuture<'_, Result<GeoPoint, AppError>> {
        async move {
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            Ok(self.point)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{FixedLocation, LocationProvider};

    #[tokio::test]
    async fn fixed_location_reports_its_point() {
        let provider = FixedLocation::san_francisco(Duration::ZERO);
        let point = provider.current_location().await.unwrap();
        assert_eq!(point.lat, 37.7749);
        assert_eq!(point.lng, -122.4194);
    }
}
