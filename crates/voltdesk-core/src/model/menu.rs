// ── Menu domain type ──
//
// Menus are reference data for the permission screens: powers point at
// the menu they guard. Read-mostly, but the CRUD shape is the same.

use serde::{Deserialize, Serialize};

use super::{Audit, Entity, EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub sort: i32,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub sort: i32,
}

impl Entity for Menu {
    type Draft = MenuDraft;
    const KIND: EntityKind = EntityKind::Menu;

    fn id(&self) -> EntityId {
        self.id
    }
}
