//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod dashboard;
mod employee;
mod menu;
mod session;
mod user;

pub use dashboard::{DashboardWidgetKind, widgets_for_role};
pub use employee::{EmployeeId, EmployeeStatus, can_view_employee};
pub use menu::{MenuItem, MenuNode, build_navigation, is_menu_accessible};
pub use peoplehub_core::Role;
pub use session::{SessionId, SessionPolicy};
pub use user::{
    LockoutPolicy, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH, UserId, Username, validate_password,
};
