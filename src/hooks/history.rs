use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::engine::history::{HistoryPage, HistoryQuery};
use crate::error::AppError;
use crate::hooks::{HookCell, HookState};
use crate::remote::RemoteApi;

/// History page: re-fetches whenever the page, date, search term or sort changes.
pub struct HistoryHook {
    api: Arc<RemoteApi>,
    cell: HookCell<HistoryPage>,
    query: Mutex<HistoryQuery>,
}

impl HistoryHook {
    pub fn new(api: Arc<RemoteApi>, query: HistoryQuery) -> Self {
        Self {
            api,
            cell: HookCell::new(),
            query: Mutex::new(query),
        }
    }

    pub fn state(&self) -> HookState<HistoryPage> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<HookState<HistoryPage>> {
        self.cell.subscribe()
    }

    pub async fn query(&self) -> HistoryQuery {
        self.query.lock().await.clone()
    }

    pub async fn refresh(&self) -> Result<HistoryPage, AppError> {
        let query = self.query().await;
        self.cell.run(self.api.get_delivery_history(query)).await
    }

    pub async fn set_query(&self, query: HistoryQuery) -> Result<HistoryPage, AppError> {
        *self.query.lock().await = query.clone();
        self.cell.run(self.api.get_delivery_history(query)).await
    }

    pub async fn set_page(&self, page: u32) -> Result<HistoryPage, AppError> {
        let query = {
            let mut current = self.query.lock().await;
            current.page = page;
            current.clone()
        };
        self.cell.run(self.api.get_delivery_history(query)).await
    }
}
