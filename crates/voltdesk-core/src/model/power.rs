// ── Power (permission) domain type ──

use serde::{Deserialize, Serialize};

use super::{Audit, Entity, EntityId, EntityKind};

/// A grantable permission, usually scoped to one menu entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub id: EntityId,
    pub name: String,
    /// Machine-readable permission code, e.g. `device:write`.
    pub code: String,
    #[serde(default)]
    pub menu_id: Option<EntityId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerDraft {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Power {
    type Draft = PowerDraft;
    const KIND: EntityKind = EntityKind::Power;

    fn id(&self) -> EntityId {
        self.id
    }
}
