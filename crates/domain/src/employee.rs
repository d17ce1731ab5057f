//! Employee identifiers and visibility rules.

use peoplehub_core::{AppError, AppResult, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    /// Creates a new random employee identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an employee identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed and working.
    Active,
    /// Employed but on leave.
    OnLeave,
    /// No longer employed.
    Terminated,
}

impl EmployeeStatus {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Terminated => "terminated",
        }
    }

    /// Parses a storage string into a status.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "active" => Ok(Self::Active),
            "on_leave" => Ok(Self::OnLeave),
            "terminated" => Ok(Self::Terminated),
            _ => Err(AppError::Validation(format!(
                "unknown employee status '{value}'"
            ))),
        }
    }
}

/// Returns whether a viewer may read the target employee record.
///
/// Admins and HR see everyone, managers see themselves and their direct
/// reports, everyone else only sees their own record.
#[must_use]
pub fn can_view_employee(
    viewer_role: Role,
    viewer_employee_id: Option<EmployeeId>,
    target_id: EmployeeId,
    target_manager_id: Option<EmployeeId>,
) -> bool {
    if viewer_role.has_organisation_visibility() {
        return true;
    }

    let Some(viewer_employee_id) = viewer_employee_id else {
        return false;
    };

    if viewer_employee_id == target_id {
        return true;
    }

    viewer_role == Role::Manager && target_manager_id == Some(viewer_employee_id)
}
