use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::delivery::Delivery;
use crate::models::user::{RiderApplication, User};
use crate::store::seed::SeedData;
use crate::store::{DeliveryRepository, Lane, RiderRepository};

struct StoredDelivery {
    lane: Lane,
    position: usize,
    delivery: Delivery,
}

#[derive(Default)]
pub struct InMemoryStore {
    deliveries: DashMap<String, StoredDelivery>,
    riders: DashMap<String, User>,
    /// Lowercased email to rider id.
    rider_emails: DashMap<String, String>,
    applications: DashMap<Uuid, RiderApplication>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store populated with the demo fixtures, with today's deliveries placed around `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::from_seed(SeedData::generate(now))
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let store = Self::new();

        let lanes = [
            (Lane::Scheduled, seed.scheduled),
            (Lane::History, seed.history),
        ];
        for (lane, records) in lanes {
            for (position, delivery) in records.into_iter().enumerate() {
                match store.deliveries.entry(delivery.id.clone()) {
                    Entry::Occupied(_) => {
                        warn!(delivery_id = %delivery.id, "duplicate delivery id in seed; keeping the first");
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(StoredDelivery {
                            lane,
                            position,
                            delivery,
                        });
                    }
                }
            }
        }

        for rider in seed.riders {
            let id = rider.id.clone();
            if let Err(err) = store.insert_rider(rider) {
                warn!(rider_id = %id, error = %err, "skipping seeded rider");
            }
        }

        store
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.len()
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    pub fn application_count(&self) -> usize {
        self.applications.len()
    }
}

impl DeliveryRepository for InMemoryStore {
    fn find(&self, id: &str) -> Option<Delivery> {
        self.deliveries.get(id).map(|entry| entry.delivery.clone())
    }

    fn update_with(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&Delivery) -> Result<Delivery, AppError>,
    ) -> Result<(Delivery, Delivery), AppError> {
        let mut stored = self
            .deliveries
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("delivery {id} not found")))?;

        let updated = apply(&stored.delivery)?;
        if updated.id != id {
            return Err(AppError::Internal(format!(
                "update of delivery {id} changed its id to {}",
                updated.id
            )));
        }

        let before = std::mem::replace(&mut stored.delivery, updated.clone());
        Ok((before, updated))
    }

    fn lane(&self, lane: Lane) -> Vec<Delivery> {
        let mut records: Vec<(usize, Delivery)> = self
            .deliveries
            .iter()
            .filter(|entry| entry.lane == lane)
            .map(|entry| (entry.position, entry.delivery.clone()))
            .collect();

        records.sort_by_key(|(position, _)| *position);
        records.into_iter().map(|(_, delivery)| delivery).collect()
    }
}

impl RiderRepository for InMemoryStore {
    fn rider(&self, id: &str) -> Option<User> {
        self.riders.get(id).map(|entry| entry.value().clone())
    }

    fn rider_by_email(&self, email: &str) -> Option<User> {
        let id = self
            .rider_emails
            .get(&email_key(email))
            .map(|entry| entry.value().clone())?;
        self.rider(&id)
    }

    fn insert_rider(&self, rider: User) -> Result<(), AppError> {
        if self.riders.contains_key(&rider.id) {
            return Err(AppError::Validation(format!(
                "rider {} already exists",
                rider.id
            )));
        }

        match self.rider_emails.entry(email_key(&rider.email)) {
            Entry::Occupied(_) => return Err(email_taken(&rider.email)),
            Entry::Vacant(slot) => {
                slot.insert(rider.id.clone());
            }
        }

        self.riders.insert(rider.id.clone(), rider);
        Ok(())
    }

    fn update_rider(&self, rider: User) -> Result<(), AppError> {
        let mut stored = self
            .riders
            .get_mut(&rider.id)
            .ok_or_else(|| AppError::NotFound(format!("rider {} not found", rider.id)))?;

        let old_key = email_key(&stored.email);
        let new_key = email_key(&rider.email);
        if old_key != new_key {
            match self.rider_emails.entry(new_key) {
                Entry::Occupied(owner) if owner.get() != &rider.id => {
                    return Err(email_taken(&rider.email));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(rider.id.clone());
                }
            }
            self.rider_emails
                .remove_if(&old_key, |_, owner| owner == &rider.id);
        }

        *stored = rider;
        Ok(())
    }

    fn application(&self, id: Uuid) -> Option<RiderApplication> {
        self.applications.get(&id).map(|entry| entry.value().clone())
    }

    fn save_application(&self, application: RiderApplication) {
        self.applications.insert(application.id, application);
    }

    fn update_application(
        &self,
        id: Uuid,
        apply: &mut dyn FnMut(&mut RiderApplication) -> Result<(), AppError>,
    ) -> Result<RiderApplication, AppError> {
        let mut stored = self
            .applications
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("application {id} not found")))?;

        let mut updated = stored.clone();
        apply(&mut updated)?;
        *stored = updated.clone();
        Ok(updated)
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn email_taken(email: &str) -> AppError {
    AppError::Validation(format!("email {} is already registered", email.trim()))
}
