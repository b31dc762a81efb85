use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::format::format_date;
use crate::models::user::{
    ApplicationStatus, Credentials, LicenseFile, RegistrationForm, RiderApplication, User,
};
use crate::notify::EmailMessage;
use crate::remote::{require_fields, RemoteApi};

impl RemoteApi {
    /// Resolves the rider by email. Passwords are only checked for presence.
    pub async fn login_user(&self, credentials: Credentials) -> Result<User, AppError> {
        self.call("login_user", self.latency.login, async {
            if credentials.email.trim().is_empty() || credentials.password.is_empty() {
                return Err(AppError::Validation("invalid credentials".to_string()));
            }

            self.riders
                .rider_by_email(&credentials.email)
                .ok_or_else(|| AppError::Validation("invalid credentials".to_string()))
        })
        .await
    }

    pub async fn register_rider(
        &self,
        form: RegistrationForm,
        license_file: Option<LicenseFile>,
    ) -> Result<RiderApplication, AppError> {
        self.call("register_rider", self.latency.register, async {
            require_fields(&[
                ("firstName", form.first_name.as_str()),
                ("lastName", form.last_name.as_str()),
                ("email", form.email.as_str()),
                ("phone", form.phone.as_str()),
                ("password", form.password.as_str()),
                ("licenseNumber", form.license_number.as_str()),
            ])?;

            let license_file = license_file
                .ok_or_else(|| AppError::Validation("license file is required".to_string()))?;

            if self.riders.rider_by_email(&form.email).is_some() {
                return Err(AppError::Validation(format!(
                    "email {} is already registered",
                    form.email.trim()
                )));
            }

            let application = RiderApplication {
                id: Uuid::new_v4(),
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                email: form.email.trim().to_string(),
                phone: form.phone.trim().to_string(),
                license_number: form.license_number.trim().to_string(),
                license_file,
                status: ApplicationStatus::AwaitingApproval,
                submitted_at: Utc::now(),
                rider_id: None,
            };

            self.riders.save_application(application.clone());
            info!(
                application_id = %application.id,
                email = %application.email,
                license = %application.license_file.file_name,
                "rider application received"
            );

            Ok(application)
        })
        .await
    }

    pub async fn get_application(&self, id: Uuid) -> Result<RiderApplication, AppError> {
        self.call("get_application", self.latency.application, async {
            self.riders
                .application(id)
                .ok_or_else(|| AppError::NotFound(format!("application {id} not found")))
        })
        .await
    }

    /// Turns an application into an active rider account and emails the applicant.
    ///
    /// The status check, rider creation and status flip happen under the
    /// application's lock; a taken email leaves the application pending.
    pub async fn approve_application(&self, id: Uuid) -> Result<User, AppError> {
        self.call("approve_application", self.latency.application, async {
            let mut approved_rider = None;
            let application = self.riders.update_application(id, &mut |application| {
                if application.status == ApplicationStatus::Approved {
                    return Err(AppError::Validation(format!(
                        "application {id} is already approved"
                    )));
                }

                let rider = User {
                    id: format!("rider-{}", Uuid::new_v4().simple()),
                    first_name: application.first_name.clone(),
                    last_name: application.last_name.clone(),
                    email: application.email.clone(),
                    phone: application.phone.clone(),
                    status: "Active".to_string(),
                    created_at: Utc::now(),
                    license_number: application.license_number.clone(),
                    total_deliveries: 0,
                    rating: 0.0,
                };
                self.riders.insert_rider(rider.clone())?;

                application.status = ApplicationStatus::Approved;
                application.rider_id = Some(rider.id.clone());
                approved_rider = Some(rider);
                Ok(())
            })?;

            let rider = approved_rider.ok_or_else(|| {
                AppError::Internal(format!("application {id} approved without a rider"))
            })?;

            info!(application_id = %id, rider_id = %rider.id, "rider application approved");

            let outcome = self.mailer.send(approval_email(&application)).await;
            if !outcome.success {
                warn!(
                    application_id = %id,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "approval email not sent"
                );
            }

            Ok(rider)
        })
        .await
    }
}

fn approval_email(application: &RiderApplication) -> EmailMessage {
    let submitted = format_date(application.submitted_at.date_naive());
    EmailMessage {
        to: application.email.clone(),
        subject: "Your rider application has been approved".to_string(),
        text: format!(
            "Hi {}, your application submitted on {} has been approved. \
             You can now sign in and start accepting deliveries.",
            application.first_name, submitted
        ),
        html: Some(format!(
            "<p>Hi {},</p><p>Your application submitted on {} has been approved. \
             You can now sign in and start accepting deliveries.</p>",
            application.first_name, submitted
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use crate::error::AppError;
    use crate::models::user::{ApplicationStatus, Credentials, LicenseFile, RegistrationForm};
    use crate::notify::Outbox;
    use crate::remote::test_support::api;
    use crate::remote::{Latency, RemoteApi};
    use crate::store::InMemoryStore;

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: "ana.silva@example.com".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            password: "hunter22".to_string(),
            license_number: "DL99887766".to_string(),
        }
    }

    fn license() -> Option<LicenseFile> {
        Some(LicenseFile {
            file_name: "license.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size_bytes: 48_213,
        })
    }

    #[tokio::test]
    async fn login_resolves_seeded_rider() {
        let (_, api) = api();
        let user = api
            .login_user(Credentials {
                email: "john.doe@example.com".to_string(),
                password: "anything".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.id, "user-1");
    }

    #[tokio::test]
    async fn login_rejects_blank_or_unknown_credentials() {
        let (_, api) = api();
        for (email, password) in [("", "pw"), ("john.doe@example.com", ""), ("who@example.com", "pw")] {
            let err = api
                .login_user(Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .unwrap_err();
            assert_eq!(err, AppError::Validation("invalid credentials".to_string()));
        }
    }

    #[tokio::test]
    async fn register_succeeds_with_all_fields_and_license() {
        let (store, api) = api();
        let application = api.register_rider(form(), license()).await.unwrap();

        assert_eq!(application.status, ApplicationStatus::AwaitingApproval);
        assert_eq!(store.application_count(), 1);
        assert_eq!(api.get_application(application.id).await.unwrap().email, "ana.silva@example.com");
    }

    #[tokio::test]
    async fn register_fails_for_each_missing_field() {
        let (_, api) = api();
        let blankers: [fn(&mut RegistrationForm); 6] = [
            |f| f.first_name.clear(),
            |f| f.last_name.clear(),
            |f| f.email.clear(),
            |f| f.phone = "   ".to_string(),
            |f| f.password.clear(),
            |f| f.license_number.clear(),
        ];

        for blank in blankers {
            let mut incomplete = form();
            blank(&mut incomplete);
            let err = api.register_rider(incomplete, license()).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn register_fails_without_license_file() {
        let (store, api) = api();
        let err = api.register_rider(form(), None).await.unwrap_err();
        assert_eq!(err, AppError::Validation("license file is required".to_string()));
        assert_eq!(store.application_count(), 0);
    }

    #[tokio::test]
    async fn approval_creates_rider_and_sends_email() {
        let store = Arc::new(InMemoryStore::seeded(Utc::now()));
        let outbox = Arc::new(Outbox::new());
        let api = RemoteApi::new(store.clone(), "user-1", Latency::none(), 16)
            .with_mailer(outbox.clone());

        let application = api.register_rider(form(), license()).await.unwrap();
        let rider = api.approve_application(application.id).await.unwrap();

        assert_eq!(rider.status, "Active");
        assert_eq!(rider.total_deliveries, 0);
        assert_eq!(store.rider_count(), 2);

        let approved = api.get_application(application.id).await.unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);
        assert_eq!(approved.rider_id.as_deref(), Some(rider.id.as_str()));

        let sent = outbox.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana.silva@example.com");

        let login = api
            .login_user(Credentials {
                email: "ANA.SILVA@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.id, rider.id);
    }

    #[tokio::test]
    async fn approving_twice_is_rejected() {
        let (_, api) = api();
        let application = api.register_rider(form(), license()).await.unwrap();
        api.approve_application(application.id).await.unwrap();

        let err = api.approve_application(application.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_application_is_not_found() {
        let (_, api) = api();
        let err = api.get_application(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn register_rejects_email_of_existing_rider() {
        let (store, api) = api();
        let mut taken = form();
        taken.email = "JOHN.DOE@example.com".to_string();

        let err = api.register_rider(taken, license()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.application_count(), 0);
    }

    #[tokio::test]
    async fn approval_rejects_email_claimed_after_registration() {
        let (store, api) = api();
        let first = api.register_rider(form(), license()).await.unwrap();
        let second = api.register_rider(form(), license()).await.unwrap();

        let rider = api.approve_application(first.id).await.unwrap();
        let err = api.approve_application(second.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let pending = api.get_application(second.id).await.unwrap();
        assert_eq!(pending.status, ApplicationStatus::AwaitingApproval);
        assert!(pending.rider_id.is_none());
        assert_eq!(store.rider_count(), 2);

        let login = api
            .login_user(Credentials {
                email: "ana.silva@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.id, rider.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_approvals_create_one_rider() {
        let (store, api) = api();
        let api = Arc::new(api);
        let application = api.register_rider(form(), license()).await.unwrap();

        let approvals: Vec<_> = (0..8)
            .map(|_| {
                let api = api.clone();
                tokio::spawn(async move { api.approve_application(application.id).await })
            })
            .collect();

        let mut approved = 0;
        for approval in approvals {
            if approval.await.unwrap().is_ok() {
                approved += 1;
            }
        }

        assert_eq!(approved, 1);
        assert_eq!(store.rider_count(), 2);
    }
}
