// ── Meter domain type ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::{Audit, Entity, EntityId, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum MeterKind {
    Electricity,
    Water,
    Gas,
    Heat,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A metering point, optionally attached to the device that reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    pub id: EntityId,
    pub meter_no: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_id: Option<EntityId>,
    #[serde(default)]
    pub kind: MeterKind,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterDraft {
    pub meter_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MeterKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Entity for Meter {
    type Draft = MeterDraft;
    const KIND: EntityKind = EntityKind::Meter;

    fn id(&self) -> EntityId {
        self.id
    }
}
