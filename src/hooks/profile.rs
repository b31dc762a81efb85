use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::watch;

use crate::error::AppError;
use crate::hooks::{HookCell, HookState};
use crate::models::user::{ProfileUpdate, User};
use crate::remote::RemoteApi;

/// The password form as submitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.new_password != self.confirm_password {
            return Err(AppError::Validation(
                "new password and confirmation do not match".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct ProfileHook {
    api: Arc<RemoteApi>,
    cell: HookCell<User>,
}

impl ProfileHook {
    pub fn new(api: Arc<RemoteApi>) -> Self {
        Self {
            api,
            cell: HookCell::new(),
        }
    }

    pub async fn load(&self) -> Result<User, AppError> {
        self.cell.run(self.api.get_profile()).await
    }

    pub fn state(&self) -> HookState<User> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<HookState<User>> {
        self.cell.subscribe()
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, AppError> {
        self.cell.run(self.api.update_profile(update)).await
    }

    /// Leaves profile state alone; the caller reports the outcome.
    pub async fn update_password(&self, change: PasswordChange) -> Result<(), AppError> {
        change.validate()?;
        self.api
            .update_password(&change.current_password, &change.new_password)
            .await
    }
}
