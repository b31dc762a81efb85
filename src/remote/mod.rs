//! Latency-injecting facade standing in for the rider backend's HTTP API.
//!
//! Every operation sleeps for its configured delay, then delegates to the
//! engine or the repositories. Failures are returned unchanged; nothing is
//! retried.

pub mod auth;
pub mod deliveries;
pub mod profile;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::error::AppError;
use crate::geo::location::{FixedLocation, LocationProvider};
use crate::models::delivery::DeliveryEvent;
use crate::notify::{EmailSender, Outbox};
use crate::observability::metrics::Metrics;
use crate::store::{DeliveryRepository, InMemoryStore, RiderRepository};

pub use deliveries::DashboardSnapshot;

/// Artificial round-trip time per operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latency {
    pub login: Duration,
    pub register: Duration,
    pub application: Duration,
    pub dashboard: Duration,
    pub fetch_delivery: Duration,
    pub update_status: Duration,
    pub history: Duration,
    pub route: Duration,
    pub profile: Duration,
    pub update_profile: Duration,
    pub update_password: Duration,
    pub location: Duration,
}

impl Latency {
    pub fn standard() -> Self {
        Self {
            login: Duration::from_millis(1000),
            register: Duration::from_millis(1500),
            application: Duration::from_millis(800),
            dashboard: Duration::from_millis(1000),
            fetch_delivery: Duration::from_millis(800),
            update_status: Duration::from_millis(1000),
            history: Duration::from_millis(1000),
            route: Duration::from_millis(1000),
            profile: Duration::from_millis(800),
            update_profile: Duration::from_millis(1000),
            update_password: Duration::from_millis(1000),
            location: Duration::from_millis(500),
        }
    }

    pub fn none() -> Self {
        Self::scaled(0.0)
    }

    /// Standard delays multiplied by `factor`; non-positive or non-finite factors disable latency.
    pub fn scaled(factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        };
        let scale = |d: Duration| d.mul_f64(factor);
        let base = Self::standard();

        Self {
            login: scale(base.login),
            register: scale(base.register),
            application: scale(base.application),
            dashboard: scale(base.dashboard),
            fetch_delivery: scale(base.fetch_delivery),
            update_status: scale(base.update_status),
            history: scale(base.history),
            route: scale(base.route),
            profile: scale(base.profile),
            update_profile: scale(base.update_profile),
            update_password: scale(base.update_password),
            location: scale(base.location),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::standard()
    }
}

pub struct RemoteApi {
    deliveries: Arc<dyn DeliveryRepository>,
    riders: Arc<dyn RiderRepository>,
    mailer: Arc<dyn EmailSender>,
    location: Arc<dyn LocationProvider>,
    rider_id: String,
    latency: Latency,
    metrics: Metrics,
    events_tx: broadcast::Sender<DeliveryEvent>,
}

impl RemoteApi {
    /// Wires both repositories to `store`, with an in-memory outbox and a fixed
    /// San Francisco position.
    pub fn new(
        store: Arc<InMemoryStore>,
        rider_id: impl Into<String>,
        latency: Latency,
        event_buffer_size: usize,
    ) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size.max(1));

        Self {
            deliveries: store.clone(),
            riders: store,
            mailer: Arc::new(Outbox::new()),
            location: Arc::new(FixedLocation::san_francisco(latency.location)),
            rider_id: rider_id.into(),
            latency,
            metrics: Metrics::new(),
            events_tx,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn EmailSender>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn with_location(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = location;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn rider_id(&self) -> &str {
        &self.rider_id
    }

    /// Stream of accepted status transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<DeliveryEvent> {
        self.events_tx.subscribe()
    }

    async fn call<T, F>(&self, operation: &'static str, delay: Duration, work: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let start = Instant::now();
        if !delay.is_zero() {
            sleep(delay).await;
        }

        let result = work.await;
        self.metrics
            .observe_call(operation, result.is_ok(), start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => debug!(operation, "remote call completed"),
            Err(AppError::Internal(msg)) => {
                error!(operation, error = %msg, "remote call failed unexpectedly")
            }
            Err(err) => warn!(operation, error = %err, "remote call rejected"),
        }

        result
    }
}

/// Names of the fields in `fields` whose value is blank.
fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

fn require_fields(fields: &[(&str, &str)]) -> Result<(), AppError> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{require_fields, Latency};
    use crate::error::AppError;

    #[test]
    fn scaled_latency_multiplies_standard_delays() {
        let half = Latency::scaled(0.5);
        assert_eq!(half.register, Duration::from_millis(750));
        assert_eq!(half.location, Duration::from_millis(250));
    }

    #[test]
    fn invalid_scale_disables_latency() {
        assert_eq!(Latency::scaled(-1.0), Latency::none());
        assert_eq!(Latency::scaled(f64::NAN), Latency::none());
        assert!(Latency::none().login.is_zero());
    }

    #[test]
    fn require_fields_names_every_blank_field() {
        let err = require_fields(&[("firstName", "Ana"), ("email", " "), ("phone", "")]).unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("missing required fields: email, phone".to_string())
        );
        assert!(require_fields(&[("email", "a@b.c")]).is_ok());
    }
}
