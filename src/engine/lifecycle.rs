use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AppError;
use crate::models::delivery::{Delivery, DeliveryEvent, DeliveryStatus};
use crate::store::DeliveryRepository;

/// An accepted transition: the record that replaced the old one, and the event describing it.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub delivery: Delivery,
    pub event: DeliveryEvent,
}

pub fn find_by_id(repo: &dyn DeliveryRepository, id: &str) -> Result<Delivery, AppError> {
    repo.find(id)
        .ok_or_else(|| AppError::NotFound(format!("delivery {id} not found")))
}

/// Builds the successor record for `next` without touching the store.
///
/// `completed_at` is stamped with `now` only when moving to `Delivered` and
/// cleared otherwise. Blank `issues` are dropped.
pub fn transition(
    delivery: &Delivery,
    next: DeliveryStatus,
    issues: Option<String>,
    now: DateTime<Utc>,
) -> Result<Delivery, AppError> {
    if !delivery.status.can_transition_to(next) {
        return Err(AppError::InvalidTransition {
            from: delivery.status,
            to: next,
        });
    }

    let mut updated = delivery.clone();
    updated.status = next;
    updated.issues = issues.filter(|note| !note.trim().is_empty());
    updated.completed_at = (next == DeliveryStatus::Delivered).then_some(now);
    Ok(updated)
}

/// Checks and applies the transition under the record's lock.
pub fn advance_status(
    repo: &dyn DeliveryRepository,
    id: &str,
    next: DeliveryStatus,
    mut issues: Option<String>,
    now: DateTime<Utc>,
) -> Result<StatusChange, AppError> {
    let (current, updated) =
        repo.update_with(id, &mut |current| transition(current, next, issues.take(), now))?;

    info!(
        delivery_id = %updated.id,
        from = %current.status,
        to = %updated.status,
        "delivery status advanced"
    );

    Ok(StatusChange {
        event: DeliveryEvent {
            delivery_id: updated.id.clone(),
            from: current.status,
            to: updated.status,
            at: now,
        },
        delivery: updated,
    })
}
