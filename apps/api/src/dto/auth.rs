use peoplehub_application::{SessionGrant, ValidatedSession};
use peoplehub_core::UserIdentity;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::timestamp;

/// Incoming payload for username/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Incoming payload for first-admin bootstrap.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub token: String,
    pub username: String,
    pub display_name: String,
    pub password: String,
}

/// Incoming payload for a password change.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/change-password-request.ts"
)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub employee_id: Option<String>,
}

impl From<&UserIdentity> for UserIdentityResponse {
    fn from(identity: &UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            username: identity.username().to_owned(),
            display_name: identity.display_name().to_owned(),
            role: identity.role().as_str().to_owned(),
            employee_id: identity.employee_id().map(|id| id.to_string()),
        }
    }
}

/// Issued session returned once after login or bootstrap.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub absolute_expires_at: String,
    pub user: UserIdentityResponse,
}

impl From<SessionGrant> for LoginResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            user: UserIdentityResponse::from(&grant.identity),
            token: grant.token,
            expires_at: timestamp(grant.expires_at),
            absolute_expires_at: timestamp(grant.absolute_expires_at),
        }
    }
}

/// Current session state.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/session-response.ts"
)]
pub struct SessionResponse {
    pub user: UserIdentityResponse,
    pub expires_at: String,
    pub absolute_expires_at: String,
}

impl From<&ValidatedSession> for SessionResponse {
    fn from(session: &ValidatedSession) -> Self {
        Self {
            user: UserIdentityResponse::from(&session.identity),
            expires_at: timestamp(session.expires_at),
            absolute_expires_at: timestamp(session.absolute_expires_at),
        }
    }
}
