use tracing::info;

use super::*;

/// Parameters for creating the first administrator.
#[derive(Debug, Clone)]
pub struct BootstrapAdminParams {
    /// Login name for the administrator.
    pub username: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Plaintext password.
    pub password: String,
}

impl AuthService {
    /// Creates the first administrator account and logs it in.
    ///
    /// Refused with `Forbidden` once any administrator exists, even a
    /// deactivated one. The bootstrap token itself is checked by the caller.
    pub async fn bootstrap_admin(
        &self,
        params: BootstrapAdminParams,
        context: ClientContext,
    ) -> AppResult<SessionGrant> {
        if self.user_repository.count_admins().await? > 0 {
            return Err(self.refuse_bootstrap(params.username, &context).await);
        }

        let username = Username::new(params.username)?;
        validate_password(&params.password, username.as_str())?;
        let display_name = peoplehub_core::NonEmptyString::new(params.display_name)?;

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let created = self
            .user_repository
            .create_if_no_admin(NewUser {
                username: username.as_str().to_owned(),
                display_name: display_name.into(),
                password_hash,
                role: Role::Admin,
                employee_id: None,
            })
            .await?;
        let Some(user_id) = created else {
            return Err(self
                .refuse_bootstrap(username.as_str().to_owned(), &context)
                .await);
        };

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Internal("bootstrap admin was not persisted".to_owned()))?;

        let now = Utc::now();
        self.user_repository
            .record_successful_login(user.id, now)
            .await?;
        let grant = self.issue_session(&user, now, &context).await?;

        self.record(Some(user.username.clone()), "bootstrap", "success", &context)
            .await?;
        info!(username = %user.username, "bootstrap administrator created");

        Ok(grant)
    }

    async fn refuse_bootstrap(&self, username: String, context: &ClientContext) -> AppError {
        if let Err(error) = self
            .record(Some(username), "bootstrap", "admin_already_exists", context)
            .await
        {
            return error;
        }

        AppError::Forbidden("an administrator account already exists".to_owned())
    }
}
