use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::error::AppError;
use crate::format::format_currency;
use crate::hooks::{HookCell, HookState};
use crate::remote::{DashboardSnapshot, RemoteApi};

/// Live dashboard: today's completed deliveries, the active one, and the
/// rider's availability switch, which starts offline.
pub struct DashboardHook {
    api: Arc<RemoteApi>,
    cell: HookCell<DashboardSnapshot>,
    available: AtomicBool,
}

impl DashboardHook {
    pub fn new(api: Arc<RemoteApi>) -> Self {
        Self {
            api,
            cell: HookCell::new(),
            available: AtomicBool::new(false),
        }
    }

    pub async fn load(&self) -> Result<DashboardSnapshot, AppError> {
        self.cell.run(self.api.get_dashboard()).await
    }

    pub fn state(&self) -> HookState<DashboardSnapshot> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<HookState<DashboardSnapshot>> {
        self.cell.subscribe()
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        info!(rider_id = %self.api.rider_id(), available, "rider availability changed");
    }

    pub fn earnings_label(&self) -> Option<String> {
        self.cell
            .data()
            .map(|snapshot| format_currency(snapshot.earnings_today))
    }
}
