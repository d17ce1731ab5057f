use super::*;

impl AuthService {
    /// Changes the caller's password after verifying the current one.
    ///
    /// Every other session of the user is revoked; the calling session stays
    /// valid.
    pub async fn change_password(
        &self,
        actor: &UserIdentity,
        current_password: &str,
        new_password: &str,
        context: ClientContext,
    ) -> AppResult<()> {
        let user_id = UserId::from_uuid(actor.user_id());
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

        if !self
            .password_hasher
            .verify_password(current_password, &user.password_hash)?
        {
            self.record(
                Some(user.username.clone()),
                "password_change",
                "invalid_current_password",
                &context,
            )
            .await?;
            return Err(AppError::Unauthorized(
                "current password is incorrect".to_owned(),
            ));
        }

        if current_password == new_password {
            return Err(AppError::Validation(
                "new password must differ from the current password".to_owned(),
            ));
        }

        validate_password(new_password, &user.username)?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user_id, &new_hash)
            .await?;

        self.session_repository
            .revoke_all_for_user(
                user_id,
                Some(SessionId::from_uuid(actor.session_id())),
                Utc::now(),
            )
            .await?;

        self.record(Some(user.username), "password_change", "success", &context)
            .await
    }
}
