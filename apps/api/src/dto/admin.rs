use peoplehub_application::{AuthEventEntry, UserRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::timestamp;

/// Incoming payload for account creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: String,
    pub employee_id: Option<String>,
}

/// Incoming payload for a role change.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-role-request.ts"
)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

/// Incoming payload for activating or deactivating an account.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-active-request.ts"
)]
pub struct UpdateUserActiveRequest {
    pub is_active: bool,
}

/// Incoming payload for replacing menu grants.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-menu-roles-request.ts"
)]
pub struct UpdateMenuRolesRequest {
    pub roles: Vec<String>,
}

/// API representation of a user account. Never includes the password hash.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-account-response.ts"
)]
pub struct UserAccountResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
    pub employee_id: Option<String>,
    pub failed_login_count: i32,
    pub locked_until: Option<String>,
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl From<UserRecord> for UserAccountResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
            display_name: value.display_name,
            role: value.role.as_str().to_owned(),
            is_active: value.is_active,
            employee_id: value.employee_id.map(|id| id.to_string()),
            failed_login_count: value.failed_login_count,
            locked_until: value.locked_until.map(timestamp),
            last_login_at: value.last_login_at.map(timestamp),
            created_at: timestamp(value.created_at),
        }
    }
}

/// API representation of an auth event.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-event-response.ts"
)]
pub struct AuthEventResponse {
    pub id: i64,
    pub subject: Option<String>,
    pub event_type: String,
    pub outcome: String,
    pub detail: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: String,
}

impl From<AuthEventEntry> for AuthEventResponse {
    fn from(value: AuthEventEntry) -> Self {
        Self {
            id: value.id,
            subject: value.subject,
            event_type: value.event_type,
            outcome: value.outcome,
            detail: value.detail,
            ip_address: value.ip_address,
            user_agent: value.user_agent,
            created_at: timestamp(value.created_at),
        }
    }
}
