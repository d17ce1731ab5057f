use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

/// Organisational role that drives dashboard content and menu visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator.
    Admin,
    /// Human resources staff with organisation-wide visibility.
    HrManager,
    /// Line manager with visibility over direct reports.
    Manager,
    /// Regular employee.
    Employee,
}

impl Role {
    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::HrManager => "hr_manager",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Admin, Role::HrManager, Role::Manager, Role::Employee];

        ALL
    }

    /// Returns whether the role may see every employee record.
    #[must_use]
    pub fn has_organisation_visibility(&self) -> bool {
        matches!(self, Self::Admin | Self::HrManager)
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "hr_manager" => Ok(Self::HrManager),
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Caller identity resolved from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: Uuid,
    username: String,
    display_name: String,
    role: Role,
    employee_id: Option<Uuid>,
    session_id: Uuid,
}

impl UserIdentity {
    /// Creates a user identity from account and session data.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        employee_id: Option<Uuid>,
        session_id: Uuid,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            display_name: display_name.into(),
            role,
            employee_id,
            session_id,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the role assigned to the account.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the linked employee record, if any.
    #[must_use]
    pub fn employee_id(&self) -> Option<Uuid> {
        self.employee_id
    }

    /// Returns the session the identity was resolved from.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}
