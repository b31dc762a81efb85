use tracing::info;

use crate::error::AppError;
use crate::models::user::{ProfileUpdate, User};
use crate::remote::{require_fields, RemoteApi};

impl RemoteApi {
    pub async fn get_profile(&self) -> Result<User, AppError> {
        self.call("get_profile", self.latency.profile, async { self.signed_in_rider() })
            .await
    }

    /// Overwrites the contact fields and keeps everything else. The email must
    /// not belong to another rider.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, AppError> {
        self.call("update_profile", self.latency.update_profile, async {
            require_fields(&[
                ("firstName", update.first_name.as_str()),
                ("lastName", update.last_name.as_str()),
                ("email", update.email.as_str()),
                ("phone", update.phone.as_str()),
            ])?;

            let mut rider = self.signed_in_rider()?;
            rider.first_name = update.first_name.trim().to_string();
            rider.last_name = update.last_name.trim().to_string();
            rider.email = update.email.trim().to_string();
            rider.phone = update.phone.trim().to_string();
            self.riders.update_rider(rider.clone())?;

            info!(rider_id = %rider.id, "profile updated");
            Ok(rider)
        })
        .await
    }

    /// Only presence is checked; confirming the new password is the form's job.
    pub async fn update_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.call("update_password", self.latency.update_password, async {
            if current_password.is_empty() {
                return Err(AppError::Validation(
                    "current password is required".to_string(),
                ));
            }
            if new_password.is_empty() {
                return Err(AppError::Validation("new password is required".to_string()));
            }

            info!(rider_id = %self.rider_id, "password updated");
            Ok(())
        })
        .await
    }

    fn signed_in_rider(&self) -> Result<User, AppError> {
        self.riders
            .rider(&self.rider_id)
            .ok_or_else(|| AppError::NotFound(format!("rider {} not found", self.rider_id)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use crate::error::AppError;
    use crate::models::user::{Credentials, LicenseFile, ProfileUpdate, RegistrationForm};
    use crate::remote::test_support::api;
    use crate::remote::{Latency, RemoteApi};
    use crate::store::InMemoryStore;

    fn update() -> ProfileUpdate {
        ProfileUpdate {
            first_name: "Johnny".to_string(),
            last_name: "Doe".to_string(),
            email: "johnny@example.com".to_string(),
            phone: "+1 (555) 000-1111".to_string(),
        }
    }

    #[tokio::test]
    async fn profile_is_the_signed_in_rider() {
        let (_, api) = api();
        let profile = api.get_profile().await.unwrap();
        assert_eq!(profile.full_name(), "John Doe");
        assert_eq!(profile.total_deliveries, 156);
        assert_eq!(profile.rating, 4.8);
    }

    #[tokio::test]
    async fn update_overwrites_contact_fields_only() {
        let (_, api) = api();
        let before = api.get_profile().await.unwrap();
        let updated = api.update_profile(update()).await.unwrap();

        assert_eq!(updated.first_name, "Johnny");
        assert_eq!(updated.email, "johnny@example.com");
        assert_eq!(updated.license_number, before.license_number);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(api.get_profile().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_with_blank_field_changes_nothing() {
        let (_, api) = api();
        let before = api.get_profile().await.unwrap();

        let mut blank = update();
        blank.email = String::new();
        let err = api.update_profile(blank).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(api.get_profile().await.unwrap(), before);
    }

    #[tokio::test]
    async fn password_requires_current_and_new() {
        let (_, api) = api();
        assert!(api.update_password("old-secret", "new-secret").await.is_ok());
        assert_eq!(
            api.update_password("", "new-secret").await.unwrap_err(),
            AppError::Validation("current password is required".to_string())
        );
        assert!(api.update_password("old-secret", "").await.is_err());
    }

    #[tokio::test]
    async fn unknown_rider_id_is_not_found() {
        let store = Arc::new(InMemoryStore::seeded(Utc::now()));
        let api = RemoteApi::new(store, "user-404", Latency::none(), 16);
        assert!(matches!(api.get_profile().await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_cannot_take_another_riders_email() {
        let (_, api) = api();
        let application = api
            .register_rider(
                RegistrationForm {
                    first_name: "Ana".to_string(),
                    last_name: "Silva".to_string(),
                    email: "ana.silva@example.com".to_string(),
                    phone: "+1 (555) 987-6543".to_string(),
                    password: "hunter22".to_string(),
                    license_number: "DL99887766".to_string(),
                },
                Some(LicenseFile {
                    file_name: "license.jpg".to_string(),
                    content_type: "image/jpeg".to_string(),
                    size_bytes: 48_213,
                }),
            )
            .await
            .unwrap();
        let ana = api.approve_application(application.id).await.unwrap();
        let before = api.get_profile().await.unwrap();

        let mut clash = update();
        clash.email = "Ana.Silva@example.com".to_string();
        let err = api.update_profile(clash).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(api.get_profile().await.unwrap(), before);

        let login = api
            .login_user(Credentials {
                email: "ana.silva@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.id, ana.id);
    }

    #[tokio::test]
    async fn login_follows_updated_email() {
        let (_, api) = api();
        api.update_profile(update()).await.unwrap();

        let login = api
            .login_user(Credentials {
                email: "johnny@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.id, "user-1");
    }
}
