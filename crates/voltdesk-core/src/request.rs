// ── Requests ──
//
// The commands an orchestrator consumes. A request names what to do;
// the transition it eventually produces is what the slice records.

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::model::{Entity, EntityId};
use crate::store::PowerSet;

/// Operation kinds. Latest-wins tickets are issued per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Fetch,
    Create,
    Update,
    Delete,
}

/// A single CRUD request against one entity collection.
#[derive(Debug, Clone)]
pub enum Request<T: Entity> {
    Fetch,
    Create(T::Draft),
    Update { id: EntityId, draft: T::Draft },
    Delete { id: EntityId },
}

impl<T: Entity> Request<T> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Fetch => OperationKind::Fetch,
            Self::Create(_) => OperationKind::Create,
            Self::Update { .. } => OperationKind::Update,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RolePowerOp {
    Load,
    Save,
}

/// A request against the role/power assignment of one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePowerRequest {
    Load { role: EntityId },
    Save { role: EntityId, powers: PowerSet },
}

impl RolePowerRequest {
    pub fn op(&self) -> RolePowerOp {
        match self {
            Self::Load { .. } => RolePowerOp::Load,
            Self::Save { .. } => RolePowerOp::Save,
        }
    }

    pub fn role(&self) -> EntityId {
        match self {
            Self::Load { role } | Self::Save { role, .. } => *role,
        }
    }
}
