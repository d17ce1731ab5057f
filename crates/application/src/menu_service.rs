//! Menu navigation and per-role access grants.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use peoplehub_core::{AppError, AppResult, Role, UserIdentity};
use peoplehub_domain::{MenuItem, MenuNode, build_navigation, is_menu_accessible};

use crate::{AuthEvent, AuthEventService, ClientContext, require_role};


/// Repository port for menu items and their role grants.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Lists every menu item with its granted roles.
    async fn list_items(&self) -> AppResult<Vec<MenuItem>>;

    /// Replaces the roles granted to one menu item.
    async fn replace_roles(&self, code: &str, roles: &BTreeSet<Role>) -> AppResult<()>;
}

/// Application service for navigation and menu access control.
#[derive(Clone)]
pub struct MenuService {
    repository: Arc<dyn MenuRepository>,
    auth_event_service: AuthEventService,
}

impl MenuService {
    /// Creates a new menu service.
    #[must_use]
    pub fn new(repository: Arc<dyn MenuRepository>, auth_event_service: AuthEventService) -> Self {
        Self {
            repository,
            auth_event_service,
        }
    }

    /// Returns the navigation tree visible to the caller.
    pub async fn navigation_for(&self, actor: &UserIdentity) -> AppResult<Vec<MenuNode>> {
        let items = self.repository.list_items().await?;
        Ok(build_navigation(&items, actor.role()))
    }

    /// Returns whether the caller may open the menu item.
    pub async fn check_access(&self, actor: &UserIdentity, code: &str) -> AppResult<bool> {
        let items = self.repository.list_items().await?;
        is_menu_accessible(&items, code, actor.role())
            .ok_or_else(|| AppError::NotFound(format!("menu item '{code}' not found")))
    }

    /// Lists every menu item with its grants for administrators.
    pub async fn list_menu_access(&self, actor: &UserIdentity) -> AppResult<Vec<MenuItem>> {
        require_role(actor, &[Role::Admin])?;

        let mut items = self.repository.list_items().await?;
        items.sort_by(|left, right| {
            left.parent_code()
                .cmp(&right.parent_code())
                .then_with(|| left.position().cmp(&right.position()))
                .then_with(|| left.code().cmp(right.code()))
        });
        Ok(items)
    }

    /// Replaces the roles granted to a menu item and returns the updated item.
    pub async fn set_menu_roles(
        &self,
        actor: &UserIdentity,
        code: &str,
        roles: BTreeSet<Role>,
        context: ClientContext,
    ) -> AppResult<MenuItem> {
        require_role(actor, &[Role::Admin])?;

        let items = self.repository.list_items().await?;
        let Some(item) = items.into_iter().find(|item| item.code() == code) else {
            return Err(AppError::NotFound(format!("menu item '{code}' not found")));
        };

        self.repository.replace_roles(code, &roles).await?;

        let granted = roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(",");
        info!(
            actor = actor.username(),
            menu_code = code,
            roles = %granted,
            "menu access changed"
        );
        self.auth_event_service
            .record_event(AuthEvent {
                subject: Some(actor.username().to_owned()),
                event_type: "menu_access_changed".to_owned(),
                outcome: "success".to_owned(),
                detail: Some(format!("{code}: [{granted}]")),
                ip_address: context.ip_address,
                user_agent: context.user_agent,
            })
            .await?;

        Ok(item.with_roles(roles))
    }
}
