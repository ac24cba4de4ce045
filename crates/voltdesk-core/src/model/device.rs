// ── Device domain type ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::{Audit, Entity, EntityId, EntityKind};

/// Operational state reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Maintenance,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A field device (gateway, concentrator, sensor hub).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: EntityId,
    /// Serial number, unique per backend.
    pub sn: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDraft {
    pub sn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

impl Entity for Device {
    type Draft = DeviceDraft;
    const KIND: EntityKind = EntityKind::Device;

    fn id(&self) -> EntityId {
        self.id
    }
}
