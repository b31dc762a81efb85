use std::sync::Arc;

use chrono::{FixedOffset, Utc};

use crate::config::Config;
use crate::error::AppError;
use crate::remote::{Latency, RemoteApi};
use crate::store::InMemoryStore;

pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub api: Arc<RemoteApi>,
    /// Local offset used to match history entries against a calendar date.
    pub history_offset: FixedOffset,
}

impl AppState {
    pub fn new(
        latency: Latency,
        rider_id: &str,
        event_buffer_size: usize,
        history_offset: FixedOffset,
    ) -> Self {
        let store = Arc::new(InMemoryStore::seeded(Utc::now()));
        let api = Arc::new(RemoteApi::new(
            store.clone(),
            rider_id,
            latency,
            event_buffer_size,
        ));

        Self {
            store,
            api,
            history_offset,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(
            Latency::scaled(config.latency_scale),
            &config.rider_id,
            config.event_buffer_size,
            config.history_offset()?,
        ))
    }
}
