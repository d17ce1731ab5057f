//! In-memory fakes shared by service tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use peoplehub_core::{AppError, AppResult, Role, UserIdentity};
use peoplehub_domain::{EmployeeId, EmployeeStatus, MenuItem, SessionId, UserId};

use crate::{
    AuthEvent, AuthEventEntry, AuthEventRepository, AuthEventService, DashboardRepository,
    DepartmentSummary, EmployeeQuery, EmployeeRecord, EmployeeRepository, HeadcountSummary,
    MenuRepository, NewSession, NewUser, PasswordHasher, SecuritySummary, SessionRecord,
    SessionRepository, UserRecord, UserRepository,
};

/// Hasher that stores `plain$<password>` so tests stay fast.
pub(crate) struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> AppResult<bool> {
        Ok(stored_hash == format!("plain${password}"))
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<HashMap<UserId, UserRecord>>,
}

impl FakeUserRepository {
    pub(crate) async fn insert(
        &self,
        username: &str,
        password: &str,
        role: Role,
        employee_id: Option<EmployeeId>,
    ) -> UserId {
        let id = UserId::new();
        self.users.lock().await.insert(
            id,
            UserRecord {
                id,
                username: username.to_owned(),
                display_name: username.to_uppercase(),
                password_hash: format!("plain${password}"),
                role,
                is_active: true,
                employee_id,
                failed_login_count: 0,
                locked_until: None,
                last_login_at: None,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub(crate) async fn get(&self, user_id: UserId) -> Option<UserRecord> {
        self.users.lock().await.get(&user_id).cloned()
    }

    async fn update<F: FnOnce(&mut UserRecord)>(&self, user_id: UserId, apply: F) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;
        apply(user);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.get(user_id).await)
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.lock().await.values().cloned().collect();
        users.sort_by(|left, right| left.username.cmp(&right.username));
        Ok(users)
    }

    async fn create(&self, user: NewUser) -> AppResult<UserId> {
        let mut users = self.users.lock().await;
        if users.values().any(|existing| existing.username == user.username) {
            return Err(AppError::Conflict("username is already taken".to_owned()));
        }

        let id = UserId::new();
        users.insert(
            id,
            UserRecord {
                id,
                username: user.username,
                display_name: user.display_name,
                password_hash: user.password_hash,
                role: user.role,
                is_active: true,
                employee_id: user.employee_id,
                failed_login_count: 0,
                locked_until: None,
                last_login_at: None,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        self.update(user_id, |user| user.password_hash = password_hash.to_owned())
            .await
    }

    async fn increment_failed_logins(&self, user_id: UserId) -> AppResult<i32> {
        let mut count = 0;
        self.update(user_id, |user| {
            user.failed_login_count += 1;
            count = user.failed_login_count;
        })
        .await?;
        Ok(count)
    }

    async fn lock_until(&self, user_id: UserId, locked_until: DateTime<Utc>) -> AppResult<()> {
        self.update(user_id, |user| {
            user.locked_until = Some(locked_until);
            user.failed_login_count = 0;
        })
        .await
    }

    async fn record_successful_login(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.update(user_id, |user| {
            user.failed_login_count = 0;
            user.locked_until = None;
            user.last_login_at = Some(at);
        })
        .await
    }

    async fn clear_lockout(&self, user_id: UserId) -> AppResult<()> {
        self.update(user_id, |user| {
            user.failed_login_count = 0;
            user.locked_until = None;
        })
        .await
    }

    async fn update_role(&self, user_id: UserId, role: Role) -> AppResult<()> {
        self.update(user_id, |user| user.role = role).await
    }

    async fn set_active(&self, user_id: UserId, is_active: bool) -> AppResult<()> {
        self.update(user_id, |user| user.is_active = is_active).await
    }

    async fn count_admins(&self) -> AppResult<i64> {
        let count = self
            .users
            .lock()
            .await
            .values()
            .filter(|user| user.role == Role::Admin)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn create_if_no_admin(&self, user: NewUser) -> AppResult<Option<UserId>> {
        let mut users = self.users.lock().await;
        if users.values().any(|existing| existing.role == Role::Admin) {
            return Ok(None);
        }

        let id = UserId::new();
        users.insert(
            id,
            UserRecord {
                id,
                username: user.username,
                display_name: user.display_name,
                password_hash: user.password_hash,
                role: user.role,
                is_active: true,
                employee_id: user.employee_id,
                failed_login_count: 0,
                locked_until: None,
                last_login_at: None,
                created_at: Utc::now(),
            },
        );
        Ok(Some(id))
    }
}

#[derive(Default)]
pub(crate) struct FakeSessionRepository {
    pub(crate) sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl FakeSessionRepository {
    pub(crate) async fn update_all<F: FnMut(&mut SessionRecord)>(&self, mut apply: F) {
        for session in self.sessions.lock().await.values_mut() {
            apply(session);
        }
    }

    pub(crate) async fn live_count(&self, user_id: UserId) -> usize {
        self.sessions
            .lock()
            .await
            .values()
            .filter(|session| session.user_id == user_id && session.revoked_at.is_none())
            .count()
    }
}

#[async_trait]
impl SessionRepository for FakeSessionRepository {
    async fn create(&self, session: NewSession) -> AppResult<()> {
        self.sessions.lock().await.insert(
            session.token_hash,
            SessionRecord {
                id: session.id,
                user_id: session.user_id,
                created_at: session.created_at,
                last_seen_at: session.created_at,
                expires_at: session.expires_at,
                absolute_expires_at: session.absolute_expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<SessionRecord>> {
        Ok(self.sessions.lock().await.get(token_hash).cloned())
    }

    async fn touch(
        &self,
        session_id: SessionId,
        last_seen_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.update_all(|session| {
            if session.id == session_id {
                session.last_seen_at = last_seen_at;
                session.expires_at = expires_at;
            }
        })
        .await;
        Ok(())
    }

    async fn revoke(&self, session_id: SessionId, at: DateTime<Utc>) -> AppResult<()> {
        self.update_all(|session| {
            if session.id == session_id && session.revoked_at.is_none() {
                session.revoked_at = Some(at);
            }
        })
        .await;
        Ok(())
    }

    async fn revoke_all_for_user(
        &self,
        user_id: UserId,
        except: Option<SessionId>,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut revoked = 0;
        self.update_all(|session| {
            if session.user_id == user_id
                && session.revoked_at.is_none()
                && Some(session.id) != except
            {
                session.revoked_at = Some(at);
                revoked += 1;
            }
        })
        .await;
        Ok(revoked)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.expires_at >= cutoff && session.revoked_at.is_none_or(|at| at >= cutoff)
        });
        Ok(u64::try_from(before - sessions.len()).unwrap_or(0))
    }
}

#[derive(Default)]
pub(crate) struct FakeAuthEventRepository {
    pub(crate) events: Mutex<Vec<AuthEvent>>,
    pub(crate) fail_appends: AtomicBool,
}

impl FakeAuthEventRepository {
    pub(crate) async fn outcomes(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .map(|event| format!("{}/{}", event.event_type, event.outcome))
            .collect()
    }
}

#[async_trait]
impl AuthEventRepository for FakeAuthEventRepository {
    async fn append_event(&self, event: AuthEvent) -> AppResult<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(AppError::Internal("auth event store unavailable".to_owned()));
        }
        self.events.lock().await.push(event);
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<AuthEventEntry>> {
        let events = self.events.lock().await;
        Ok(events
            .iter()
            .enumerate()
            .rev()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|(index, event)| AuthEventEntry {
                id: i64::try_from(index).unwrap_or_default() + 1,
                subject: event.subject.clone(),
                event_type: event.event_type.clone(),
                outcome: event.outcome.clone(),
                detail: event.detail.clone(),
                ip_address: event.ip_address.clone(),
                user_agent: event.user_agent.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }
}

pub(crate) fn event_service() -> (Arc<FakeAuthEventRepository>, AuthEventService) {
    let repository = Arc::new(FakeAuthEventRepository::default());
    (repository.clone(), AuthEventService::new(repository))
}

pub(crate) fn identity(role: Role, employee_id: Option<EmployeeId>) -> UserIdentity {
    UserIdentity::new(
        Uuid::new_v4(),
        format!("{}.user", role.as_str()),
        "Test User",
        role,
        employee_id.map(|id| id.as_uuid()),
        Uuid::new_v4(),
    )
}

pub(crate) fn employee(
    full_name: &str,
    department_code: &str,
    manager_id: Option<EmployeeId>,
    status: EmployeeStatus,
    hire_date: NaiveDate,
) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::new(),
        employee_number: format!("E-{}", full_name.len()),
        full_name: full_name.to_owned(),
        email: Some(format!(
            "{}@example.com",
            full_name.to_lowercase().replace(' ', ".")
        )),
        department_code: Some(department_code.to_owned()),
        department_name: Some(department_code.to_uppercase()),
        position: None,
        manager_id,
        manager_name: None,
        hire_date,
        status,
    }
}

#[derive(Default)]
pub(crate) struct FakeEmployeeRepository {
    pub(crate) employees: Vec<EmployeeRecord>,
}

impl FakeEmployeeRepository {
    fn matches(query: &EmployeeQuery, employee: &EmployeeRecord) -> bool {
        query
            .department_code
            .as_ref()
            .is_none_or(|code| employee.department_code.as_ref() == Some(code))
            && query.status.is_none_or(|status| employee.status == status)
            && query.team_of.is_none_or(|manager_id| {
                employee.id == manager_id || employee.manager_id == Some(manager_id)
            })
            && query.search.as_ref().is_none_or(|search| {
                employee
                    .full_name
                    .to_lowercase()
                    .contains(&search.to_lowercase())
            })
    }
}

#[async_trait]
impl EmployeeRepository for FakeEmployeeRepository {
    async fn find_by_id(&self, employee_id: EmployeeId) -> AppResult<Option<EmployeeRecord>> {
        Ok(self
            .employees
            .iter()
            .find(|employee| employee.id == employee_id)
            .cloned())
    }

    async fn list(&self, query: &EmployeeQuery) -> AppResult<Vec<EmployeeRecord>> {
        Ok(self
            .employees
            .iter()
            .filter(|employee| Self::matches(query, employee))
            .skip(usize::try_from(query.offset).unwrap_or(0))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn list_direct_reports(&self, manager_id: EmployeeId) -> AppResult<Vec<EmployeeRecord>> {
        Ok(self
            .employees
            .iter()
            .filter(|employee| employee.manager_id == Some(manager_id))
            .cloned()
            .collect())
    }

    async fn list_departments(&self) -> AppResult<Vec<DepartmentSummary>> {
        let mut departments: HashMap<String, i64> = HashMap::new();
        for employee in &self.employees {
            if let Some(code) = &employee.department_code {
                let count = departments.entry(code.clone()).or_default();
                if employee.status == EmployeeStatus::Active {
                    *count += 1;
                }
            }
        }

        let mut summaries: Vec<DepartmentSummary> = departments
            .into_iter()
            .map(|(code, active_headcount)| DepartmentSummary {
                name: code.to_uppercase(),
                code,
                active_headcount,
            })
            .collect();
        summaries.sort_by(|left, right| left.code.cmp(&right.code));
        Ok(summaries)
    }
}

pub(crate) struct FakeDashboardRepository {
    pub(crate) employees: Arc<FakeEmployeeRepository>,
    pub(crate) security: SecuritySummary,
}

#[async_trait]
impl DashboardRepository for FakeDashboardRepository {
    async fn headcount_summary(&self) -> AppResult<HeadcountSummary> {
        let count = |status: EmployeeStatus| {
            let total = self
                .employees
                .employees
                .iter()
                .filter(|employee| employee.status == status)
                .count();
            i64::try_from(total).unwrap_or_default()
        };

        Ok(HeadcountSummary {
            active: count(EmployeeStatus::Active),
            on_leave: count(EmployeeStatus::OnLeave),
            terminated: count(EmployeeStatus::Terminated),
        })
    }

    async fn department_breakdown(&self) -> AppResult<Vec<DepartmentSummary>> {
        self.employees.list_departments().await
    }

    async fn recent_hires(&self, limit: i64) -> AppResult<Vec<EmployeeRecord>> {
        let mut hires: Vec<EmployeeRecord> = self
            .employees
            .employees
            .iter()
            .filter(|employee| employee.status != EmployeeStatus::Terminated)
            .cloned()
            .collect();
        hires.sort_by(|left, right| right.hire_date.cmp(&left.hire_date));
        hires.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(hires)
    }

    async fn security_summary(&self, _now: DateTime<Utc>) -> AppResult<SecuritySummary> {
        Ok(self.security.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeMenuRepository {
    pub(crate) items: Mutex<Vec<MenuItem>>,
}

impl FakeMenuRepository {
    pub(crate) fn with_items(items: Vec<MenuItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

#[async_trait]
impl MenuRepository for FakeMenuRepository {
    async fn list_items(&self) -> AppResult<Vec<MenuItem>> {
        Ok(self.items.lock().await.clone())
    }

    async fn replace_roles(&self, code: &str, roles: &BTreeSet<Role>) -> AppResult<()> {
        let mut items = self.items.lock().await;
        let position = items
            .iter()
            .position(|item| item.code() == code)
            .ok_or_else(|| AppError::NotFound(format!("menu item '{code}' not found")))?;
        let item = items.remove(position);
        items.insert(position, item.with_roles(roles.clone()));
        Ok(())
    }
}
