//! Role-based dashboard assembly.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use peoplehub_core::{AppResult, Role, UserIdentity};
use peoplehub_domain::{DashboardWidgetKind, EmployeeId, widgets_for_role};

use crate::{DepartmentSummary, EmployeeRecord, EmployeeRepository};


/// Number of entries in the recent hires widget.
const RECENT_HIRES_LIMIT: i64 = 5;

/// Employee counts by employment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadcountSummary {
    /// Active employees.
    pub active: i64,
    /// Employees on leave.
    pub on_leave: i64,
    /// Terminated employees.
    pub terminated: i64,
}

/// Account and session counters for administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecuritySummary {
    /// All user accounts.
    pub total_users: i64,
    /// Accounts that may sign in.
    pub active_users: i64,
    /// Accounts currently locked out.
    pub locked_users: i64,
    /// Unrevoked, unexpired sessions.
    pub active_sessions: i64,
    /// Failed login attempts in the last 24 hours.
    pub failed_logins_last_24h: i64,
}

/// Repository port for dashboard aggregates.
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Counts employees per status.
    async fn headcount_summary(&self) -> AppResult<HeadcountSummary>;

    /// Lists departments with active headcount.
    async fn department_breakdown(&self) -> AppResult<Vec<DepartmentSummary>>;

    /// Lists the most recently hired non-terminated employees.
    async fn recent_hires(&self, limit: i64) -> AppResult<Vec<EmployeeRecord>>;

    /// Computes account and session counters relative to `now`.
    async fn security_summary(&self, now: DateTime<Utc>) -> AppResult<SecuritySummary>;
}

/// Payload of a single dashboard widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardWidgetContent {
    /// Security counters.
    AccountSecurity(SecuritySummary),
    /// Headcount by status.
    HeadcountSummary(HeadcountSummary),
    /// Departments with active headcount.
    DepartmentBreakdown(Vec<DepartmentSummary>),
    /// Most recent hires.
    RecentHires(Vec<EmployeeRecord>),
    /// Direct reports.
    TeamRoster(Vec<EmployeeRecord>),
    /// Caller's own record, absent when the account has no employee link.
    MyProfile(Option<EmployeeRecord>),
}

/// Dashboard widget with its resolved content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardWidget {
    /// Widget kind.
    pub kind: DashboardWidgetKind,
    /// Display title.
    pub title: String,
    /// Widget payload.
    pub content: DashboardWidgetContent,
}

/// Dashboard for one caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Caller role.
    pub role: Role,
    /// Caller display name.
    pub display_name: String,
    /// Widgets in display order.
    pub widgets: Vec<DashboardWidget>,
}

/// Application service that assembles dashboards.
#[derive(Clone)]
pub struct DashboardService {
    dashboard_repository: Arc<dyn DashboardRepository>,
    employee_repository: Arc<dyn EmployeeRepository>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    #[must_use]
    pub fn new(
        dashboard_repository: Arc<dyn DashboardRepository>,
        employee_repository: Arc<dyn EmployeeRepository>,
    ) -> Self {
        Self {
            dashboard_repository,
            employee_repository,
        }
    }

    /// Builds the dashboard for the caller's role.
    pub async fn dashboard_for(&self, actor: &UserIdentity) -> AppResult<Dashboard> {
        let kinds = widgets_for_role(actor.role());
        let mut widgets = Vec::with_capacity(kinds.len());

        for kind in kinds.iter().copied() {
            let content = self.widget_content(actor, kind).await?;
            widgets.push(DashboardWidget {
                kind,
                title: kind.title().to_owned(),
                content,
            });
        }

        debug!(
            username = actor.username(),
            role = %actor.role(),
            widget_count = widgets.len(),
            "assembled dashboard"
        );

        Ok(Dashboard {
            role: actor.role(),
            display_name: actor.display_name().to_owned(),
            widgets,
        })
    }

    async fn widget_content(
        &self,
        actor: &UserIdentity,
        kind: DashboardWidgetKind,
    ) -> AppResult<DashboardWidgetContent> {
        let employee_id = actor.employee_id().map(EmployeeId::from_uuid);

        let content = match kind {
            DashboardWidgetKind::AccountSecurity => DashboardWidgetContent::AccountSecurity(
                self.dashboard_repository
                    .security_summary(Utc::now())
                    .await?,
            ),
            DashboardWidgetKind::HeadcountSummary => DashboardWidgetContent::HeadcountSummary(
                self.dashboard_repository.headcount_summary().await?,
            ),
            DashboardWidgetKind::DepartmentBreakdown => {
                DashboardWidgetContent::DepartmentBreakdown(
                    self.dashboard_repository.department_breakdown().await?,
                )
            }
            DashboardWidgetKind::RecentHires => DashboardWidgetContent::RecentHires(
                self.dashboard_repository
                    .recent_hires(RECENT_HIRES_LIMIT)
                    .await?,
            ),
            DashboardWidgetKind::TeamRoster => match employee_id {
                Some(employee_id) => DashboardWidgetContent::TeamRoster(
                    self.employee_repository
                        .list_direct_reports(employee_id)
                        .await?,
                ),
                None => DashboardWidgetContent::TeamRoster(Vec::new()),
            },
            DashboardWidgetKind::MyProfile => match employee_id {
                Some(employee_id) => DashboardWidgetContent::MyProfile(
                    self.employee_repository.find_by_id(employee_id).await?,
                ),
                None => DashboardWidgetContent::MyProfile(None),
            },
        };

        Ok(content)
    }
}
