//! Per-page state containers driving the dashboard views.
//!
//! Each hook publishes `{data, is_loading, error}` through a `watch` channel.
//! Every fetch or action draws a ticket from the hook's generation counter
//! and its result is applied only while that ticket is the newest, so a slow
//! response can never overwrite the result of a request issued after it.

pub mod dashboard;
pub mod delivery;
pub mod history;
pub mod profile;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::error::AppError;

pub use dashboard::DashboardHook;
pub use delivery::DeliveryHook;
pub use history::HistoryHook;
pub use profile::{PasswordChange, ProfileHook};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HookState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    /// Message for the user-facing notification of the last failure.
    pub error: Option<String>,
}

impl<T> Default for HookState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

pub struct HookCell<T> {
    tx: watch::Sender<HookState<T>>,
    generation: AtomicU64,
}

impl<T: Clone> HookCell<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(HookState::default());
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HookState<T>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> HookState<T> {
        self.tx.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.tx.borrow().data.clone()
    }

    /// Starts a request: supersedes every outstanding ticket and flags loading.
    pub fn begin(&self) -> Ticket {
        let mut ticket = Ticket(0);
        self.tx.send_modify(|state| {
            ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            state.is_loading = true;
            state.error = None;
        });
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Applies `result` if `ticket` is still the newest and hands it back either way.
    ///
    /// Failures keep the previous data and record the message.
    pub fn settle(&self, ticket: Ticket, result: Result<T, AppError>) -> Result<T, AppError> {
        let applied = self.tx.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }

            state.is_loading = false;
            match &result {
                Ok(value) => {
                    state.data = Some(value.clone());
                    state.error = None;
                }
                Err(err) => state.error = Some(err.to_string()),
            }
            true
        });

        if !applied {
            debug!(ticket = ticket.0, "discarding stale hook response");
        }
        result
    }

    pub async fn run<F>(&self, work: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let ticket = self.begin();
        let result = work.await;
        self.settle(ticket, result)
    }
}

impl<T: Clone> Default for HookCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
