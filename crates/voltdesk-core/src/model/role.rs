// ── Role domain type ──
//
// The powers granted to a role are not part of the record; they are
// loaded separately per role (see `store::RolePowerState`).

use serde::{Deserialize, Serialize};

use super::{Audit, Entity, EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Role {
    type Draft = RoleDraft;
    const KIND: EntityKind = EntityKind::Role;

    fn id(&self) -> EntityId {
        self.id
    }
}
