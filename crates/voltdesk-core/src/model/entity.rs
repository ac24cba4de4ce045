// ── Entity abstraction ──
//
// One trait ties a record type to its REST collection, its draft body,
// and its insertion policy. The store and orchestrator are written once
// against this trait.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::EntityId;

/// The resource types managed by the console.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Device,
    Meter,
    Power,
    Role,
    User,
    Menu,
}

impl EntityKind {
    /// REST collection segment, e.g. `devices`.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Device => "devices",
            Self::Meter => "meters",
            Self::Power => "powers",
            Self::Role => "roles",
            Self::User => "users",
            Self::Menu => "menus",
        }
    }

    /// Human label, e.g. `Device`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Device => "Device",
            Self::Meter => "Meter",
            Self::Power => "Power",
            Self::Role => "Role",
            Self::User => "User",
            Self::Menu => "Menu",
        }
    }

    /// Where a freshly created record lands unless configured otherwise.
    ///
    /// Devices and meters show newest first; the permission-related
    /// collections keep creation order.
    pub fn default_insert(self) -> InsertPosition {
        match self {
            Self::Device | Self::Meter => InsertPosition::Prepend,
            Self::Power | Self::Role | Self::User | Self::Menu => InsertPosition::Append,
        }
    }
}

/// Position of a newly created record within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InsertPosition {
    Prepend,
    #[default]
    Append,
}

/// A backend record type.
pub trait Entity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Body sent on create/update: domain fields only, no id or audit data.
    type Draft: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn kinds_round_trip_through_strings() {
        for kind in EntityKind::iter() {
            assert_eq!(EntityKind::from_str(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn device_and_meter_prepend_by_default() {
        assert_eq!(EntityKind::Device.default_insert(), InsertPosition::Prepend);
        assert_eq!(EntityKind::Meter.default_insert(), InsertPosition::Prepend);
        assert_eq!(EntityKind::Power.default_insert(), InsertPosition::Append);
        assert_eq!(EntityKind::Role.default_insert(), InsertPosition::Append);
    }
}
