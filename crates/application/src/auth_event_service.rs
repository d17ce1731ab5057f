use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use peoplehub_core::{AppResult, Role, UserIdentity};

use crate::require_role;

/// Maximum number of events returned by one listing.
const MAX_EVENT_LIMIT: i64 = 500;

/// Authentication event payload for security analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// Acting username or user id, if known.
    pub subject: Option<String>,
    /// Stable event type identifier.
    pub event_type: String,
    /// Event outcome label.
    pub outcome: String,
    /// Free-form detail such as the affected account.
    pub detail: Option<String>,
    /// Caller IP address if available.
    pub ip_address: Option<String>,
    /// Caller user-agent if available.
    pub user_agent: Option<String>,
}

/// Persisted auth event returned to administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEventEntry {
    /// Sequential event identifier.
    pub id: i64,
    /// Acting subject.
    pub subject: Option<String>,
    /// Stable event type identifier.
    pub event_type: String,
    /// Event outcome label.
    pub outcome: String,
    /// Free-form detail.
    pub detail: Option<String>,
    /// Caller IP address.
    pub ip_address: Option<String>,
    /// Caller user-agent.
    pub user_agent: Option<String>,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}

/// Repository port for auth event persistence.
#[async_trait]
pub trait AuthEventRepository: Send + Sync {
    /// Appends an auth event entry.
    async fn append_event(&self, event: AuthEvent) -> AppResult<()>;

    /// Lists the newest events first.
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<AuthEventEntry>>;
}

/// Application service for auth event recording.
#[derive(Clone)]
pub struct AuthEventService {
    repository: Arc<dyn AuthEventRepository>,
}

impl AuthEventService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthEventRepository>) -> Self {
        Self { repository }
    }

    /// Persists an auth event.
    pub async fn record_event(&self, event: AuthEvent) -> AppResult<()> {
        self.repository.append_event(event).await
    }

    /// Lists recent auth events for an administrator. The limit is clamped to 1..=500.
    pub async fn list_recent(
        &self,
        actor: &UserIdentity,
        limit: i64,
    ) -> AppResult<Vec<AuthEventEntry>> {
        require_role(actor, &[Role::Admin])?;
        self.repository
            .list_recent(limit.clamp(1, MAX_EVENT_LIMIT))
            .await
    }
}
