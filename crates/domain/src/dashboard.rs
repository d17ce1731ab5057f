use peoplehub_core::Role;
use serde::{Deserialize, Serialize};

/// Widgets that can appear on the landing dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardWidgetKind {
    /// Account and session security counters.
    AccountSecurity,
    /// Headcount split by employment status.
    HeadcountSummary,
    /// Active headcount per department.
    DepartmentBreakdown,
    /// Most recently hired employees.
    RecentHires,
    /// Direct reports of the caller.
    TeamRoster,
    /// The caller's own employee record.
    MyProfile,
}

impl DashboardWidgetKind {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountSecurity => "account_security",
            Self::HeadcountSummary => "headcount_summary",
            Self::DepartmentBreakdown => "department_breakdown",
            Self::RecentHires => "recent_hires",
            Self::TeamRoster => "team_roster",
            Self::MyProfile => "my_profile",
        }
    }

    /// Returns the human-readable widget title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::AccountSecurity => "Account security",
            Self::HeadcountSummary => "Headcount",
            Self::DepartmentBreakdown => "Departments",
            Self::RecentHires => "Recent hires",
            Self::TeamRoster => "My team",
            Self::MyProfile => "My profile",
        }
    }
}

/// Returns the ordered widget set shown to a role.
#[must_use]
pub fn widgets_for_role(role: Role) -> &'static [DashboardWidgetKind] {
    use DashboardWidgetKind::*;

    match role {
        Role::Admin => &[
            AccountSecurity,
            HeadcountSummary,
            DepartmentBreakdown,
            RecentHires,
        ],
        Role::HrManager => &[HeadcountSummary, DepartmentBreakdown, RecentHires],
        Role::Manager => &[MyProfile, TeamRoster],
        Role::Employee => &[MyProfile],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_widget_is_admin_only() {
        for role in Role::all() {
            let has_security = widgets_for_role(*role).contains(&DashboardWidgetKind::AccountSecurity);
            assert_eq!(has_security, *role == Role::Admin);
        }
    }

    #[test]
    fn every_role_gets_at_least_one_widget() {
        assert!(Role::all().iter().all(|role| !widgets_for_role(*role).is_empty()));
    }
}
