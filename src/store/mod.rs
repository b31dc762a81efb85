//! In-memory stand-in for the rider backend's database.
//!
//! Callers only see the repository traits, so the dashmap-backed
//! [`InMemoryStore`] can be replaced by a real persistence layer without
//! touching the engine or the remote layer.

pub mod memory;
pub mod seed;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::delivery::Delivery;
use crate::models::user::{RiderApplication, User};

pub use memory::InMemoryStore;

/// The two delivery collections the dashboard reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Today's assignments, shown on the live dashboard.
    Scheduled,
    /// Past deliveries, shown on the history page.
    History,
}

pub trait DeliveryRepository: Send + Sync {
    fn find(&self, id: &str) -> Option<Delivery>;

    /// Runs `apply` on the stored record while holding its entry lock and
    /// stores the result in place, keeping lane and position.
    ///
    /// Returns the record as it was before and after. An error from `apply`
    /// leaves the record untouched.
    fn update_with(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&Delivery) -> Result<Delivery, AppError>,
    ) -> Result<(Delivery, Delivery), AppError>;

    /// Records of one lane in seed order.
    fn lane(&self, lane: Lane) -> Vec<Delivery>;
}

/// Rider accounts and pending applications. Emails are unique across riders,
/// compared case-insensitively.
pub trait RiderRepository: Send + Sync {
    fn rider(&self, id: &str) -> Option<User>;
    fn rider_by_email(&self, email: &str) -> Option<User>;

    /// Adds a new rider; fails with `Validation` if the email is taken.
    fn insert_rider(&self, rider: User) -> Result<(), AppError>;

    /// Overwrites an existing rider; fails with `Validation` if the new email
    /// belongs to someone else.
    fn update_rider(&self, rider: User) -> Result<(), AppError>;

    fn application(&self, id: Uuid) -> Option<RiderApplication>;
    fn save_application(&self, application: RiderApplication);

    /// Runs `apply` on the stored application while holding its entry lock.
    /// An error from `apply` is returned as is.
    fn update_application(
        &self,
        id: Uuid,
        apply: &mut dyn FnMut(&mut RiderApplication) -> Result<(), AppError>,
    ) -> Result<RiderApplication, AppError>;
}
