use peoplehub_domain::{MenuItem, MenuNode};
use serde::Serialize;
use ts_rs::TS;

/// Navigation tree node.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/menu-node-response.ts"
)]
pub struct MenuNodeResponse {
    pub code: String,
    pub label: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub children: Vec<MenuNodeResponse>,
}

impl From<MenuNode> for MenuNodeResponse {
    fn from(value: MenuNode) -> Self {
        Self {
            code: value.code,
            label: value.label,
            path: value.path,
            icon: value.icon,
            children: value.children.into_iter().map(Self::from).collect(),
        }
    }
}

/// Access decision for one menu item.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/menu-access-response.ts"
)]
pub struct MenuAccessResponse {
    pub code: String,
    pub allowed: bool,
}

/// Menu item with its role grants, for administrators.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/menu-access-item-response.ts"
)]
pub struct MenuAccessItemResponse {
    pub code: String,
    pub parent_code: Option<String>,
    pub label: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub position: i32,
    pub roles: Vec<String>,
}

impl From<MenuItem> for MenuAccessItemResponse {
    fn from(value: MenuItem) -> Self {
        Self {
            code: value.code().to_owned(),
            parent_code: value.parent_code().map(ToOwned::to_owned),
            label: value.label().to_owned(),
            path: value.path().map(ToOwned::to_owned),
            icon: value.icon().map(ToOwned::to_owned),
            position: value.position(),
            roles: value
                .roles()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        }
    }
}
