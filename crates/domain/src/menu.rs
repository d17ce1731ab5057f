//! Navigation menu model and role-based visibility.

use std::collections::{BTreeSet, HashMap};

use peoplehub_core::{AppError, AppResult, NonEmptyString, Role};
use serde::{Deserialize, Serialize};

/// Menu entry together with the roles granted to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    code: NonEmptyString,
    parent_code: Option<NonEmptyString>,
    label: NonEmptyString,
    path: Option<String>,
    icon: Option<String>,
    position: i32,
    roles: BTreeSet<Role>,
}

impl MenuItem {
    /// Creates a validated menu item.
    pub fn new(
        code: impl Into<String>,
        parent_code: Option<String>,
        label: impl Into<String>,
        path: Option<String>,
        icon: Option<String>,
        position: i32,
        roles: BTreeSet<Role>,
    ) -> AppResult<Self> {
        let code = validate_menu_code(code.into())?;
        let parent_code = parent_code.map(validate_menu_code).transpose()?;

        if parent_code.as_ref() == Some(&code) {
            return Err(AppError::Validation(format!(
                "menu item '{}' cannot be its own parent",
                code.as_str()
            )));
        }

        let path = path.filter(|value| !value.trim().is_empty());
        if let Some(path) = path.as_deref()
            && !path.starts_with('/')
        {
            return Err(AppError::Validation(format!(
                "menu path '{path}' must start with '/'"
            )));
        }

        Ok(Self {
            code,
            parent_code,
            label: NonEmptyString::new(label)?,
            path,
            icon: icon.filter(|value| !value.trim().is_empty()),
            position,
            roles,
        })
    }

    /// Returns the stable menu code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the parent menu code, if nested.
    #[must_use]
    pub fn parent_code(&self) -> Option<&str> {
        self.parent_code.as_ref().map(NonEmptyString::as_str)
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the client route, or `None` for pure grouping entries.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the icon identifier.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the sort position among siblings.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Returns the roles granted to this entry.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Returns a copy with the granted roles replaced.
    #[must_use]
    pub fn with_roles(mut self, roles: BTreeSet<Role>) -> Self {
        self.roles = roles;
        self
    }
}

fn validate_menu_code(value: String) -> AppResult<NonEmptyString> {
    let code = NonEmptyString::new(value)?;
    if !code.as_str().chars().all(|character| {
        character.is_ascii_lowercase() || character.is_ascii_digit() || "._-".contains(character)
    }) {
        return Err(AppError::Validation(format!(
            "menu code '{}' may only contain lowercase letters, digits, '.', '_' and '-'",
            code.as_str()
        )));
    }

    Ok(code)
}

/// Navigation node returned to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    /// Stable menu code.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Client route, if the node is navigable.
    pub path: Option<String>,
    /// Icon identifier.
    pub icon: Option<String>,
    /// Visible child nodes in display order.
    pub children: Vec<MenuNode>,
}

/// Builds the navigation tree visible to a role.
///
/// An item is visible when its own grants include the role and every ancestor
/// is visible. Items whose parent is unknown are dropped. Groups without a
/// path are pruned when none of their children remain.
#[must_use]
pub fn build_navigation(items: &[MenuItem], role: Role) -> Vec<MenuNode> {
    let resolver = VisibilityResolver::new(items, role);
    let visible: Vec<&MenuItem> = items
        .iter()
        .filter(|item| resolver.is_visible(item.code()))
        .collect();

    let mut children_by_parent: HashMap<Option<&str>, Vec<&MenuItem>> = HashMap::new();
    for item in visible {
        children_by_parent
            .entry(item.parent_code())
            .or_default()
            .push(item);
    }

    for siblings in children_by_parent.values_mut() {
        siblings.sort_by(|left, right| {
            left.position()
                .cmp(&right.position())
                .then_with(|| left.code().cmp(right.code()))
        });
    }

    build_level(&children_by_parent, None)
}

fn build_level<'a>(
    children_by_parent: &HashMap<Option<&'a str>, Vec<&'a MenuItem>>,
    parent_code: Option<&'a str>,
) -> Vec<MenuNode> {
    let Some(siblings) = children_by_parent.get(&parent_code) else {
        return Vec::new();
    };

    siblings
        .iter()
        .copied()
        .filter_map(|item| {
            let children = build_level(children_by_parent, Some(item.code()));
            if item.path().is_none() && children.is_empty() {
                return None;
            }

            Some(MenuNode {
                code: item.code().to_owned(),
                label: item.label().to_owned(),
                path: item.path().map(ToOwned::to_owned),
                icon: item.icon().map(ToOwned::to_owned),
                children,
            })
        })
        .collect()
}

/// Returns whether `code` and all its ancestors are granted to `role`.
///
/// Returns `None` when no item with that code exists.
#[must_use]
pub fn is_menu_accessible(items: &[MenuItem], code: &str, role: Role) -> Option<bool> {
    let resolver = VisibilityResolver::new(items, role);
    resolver
        .by_code
        .contains_key(code)
        .then(|| resolver.is_visible(code))
}

struct VisibilityResolver<'a> {
    by_code: HashMap<&'a str, &'a MenuItem>,
    role: Role,
}

impl<'a> VisibilityResolver<'a> {
    fn new(items: &'a [MenuItem], role: Role) -> Self {
        Self {
            by_code: items.iter().map(|item| (item.code(), item)).collect(),
            role,
        }
    }

    // Ancestor walk bounded by the item count so a parent cycle resolves to hidden.
    fn is_visible(&self, code: &str) -> bool {
        let mut current = code;
        for _ in 0..=self.by_code.len() {
            let Some(item) = self.by_code.get(current) else {
                return false;
            };

            if !item.roles().contains(&self.role) {
                return false;
            }

            match item.parent_code() {
                Some(parent_code) => current = parent_code,
                None => return true,
            }
        }

        false
    }
}
