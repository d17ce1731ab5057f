use peoplehub_application::{Dashboard, DashboardWidget, DashboardWidgetContent};
use serde::Serialize;
use ts_rs::TS;

use super::{DepartmentResponse, EmployeeResponse};

/// Dashboard assembled for the caller's role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    pub role: String,
    pub display_name: String,
    pub widgets: Vec<DashboardWidgetResponse>,
}

/// One dashboard widget.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-widget-response.ts"
)]
pub struct DashboardWidgetResponse {
    pub kind: String,
    pub title: String,
    pub content: DashboardWidgetContentResponse,
}

/// Widget payload, tagged by widget type.
#[derive(Debug, Serialize, TS)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-widget-content-response.ts"
)]
pub enum DashboardWidgetContentResponse {
    AccountSecurity {
        total_users: i64,
        active_users: i64,
        locked_users: i64,
        active_sessions: i64,
        failed_logins_last_24h: i64,
    },
    HeadcountSummary {
        active: i64,
        on_leave: i64,
        terminated: i64,
    },
    DepartmentBreakdown(Vec<DepartmentResponse>),
    RecentHires(Vec<EmployeeResponse>),
    TeamRoster(Vec<EmployeeResponse>),
    MyProfile(Option<EmployeeResponse>),
}

impl From<DashboardWidgetContent> for DashboardWidgetContentResponse {
    fn from(value: DashboardWidgetContent) -> Self {
        match value {
            DashboardWidgetContent::AccountSecurity(summary) => Self::AccountSecurity {
                total_users: summary.total_users,
                active_users: summary.active_users,
                locked_users: summary.locked_users,
                active_sessions: summary.active_sessions,
                failed_logins_last_24h: summary.failed_logins_last_24h,
            },
            DashboardWidgetContent::HeadcountSummary(headcount) => Self::HeadcountSummary {
                active: headcount.active,
                on_leave: headcount.on_leave,
                terminated: headcount.terminated,
            },
            DashboardWidgetContent::DepartmentBreakdown(departments) => Self::DepartmentBreakdown(
                departments.into_iter().map(DepartmentResponse::from).collect(),
            ),
            DashboardWidgetContent::RecentHires(hires) => {
                Self::RecentHires(hires.into_iter().map(EmployeeResponse::from).collect())
            }
            DashboardWidgetContent::TeamRoster(team) => {
                Self::TeamRoster(team.into_iter().map(EmployeeResponse::from).collect())
            }
            DashboardWidgetContent::MyProfile(profile) => {
                Self::MyProfile(profile.map(EmployeeResponse::from))
            }
        }
    }
}

impl From<DashboardWidget> for DashboardWidgetResponse {
    fn from(value: DashboardWidget) -> Self {
        Self {
            kind: value.kind.as_str().to_owned(),
            title: value.title,
            content: value.content.into(),
        }
    }
}

impl From<Dashboard> for DashboardResponse {
    fn from(value: Dashboard) -> Self {
        Self {
            role: value.role.as_str().to_owned(),
            display_name: value.display_name,
            widgets: value
                .widgets
                .into_iter()
                .map(DashboardWidgetResponse::from)
                .collect(),
        }
    }
}
