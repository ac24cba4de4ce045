// ── Domain model ──
//
// Canonical representation of every record the backend manages. The
// same types are used on the wire and in the store.

pub mod audit;
pub mod entity;
pub mod entity_id;

pub mod device;
pub mod menu;
pub mod meter;
pub mod power;
pub mod role;
pub mod user;

pub use audit::Audit;
pub use entity::{Entity, EntityKind, InsertPosition};
pub use entity_id::EntityId;

pub use device::{Device, DeviceDraft, DeviceStatus};
pub use menu::{Menu, MenuDraft};
pub use meter::{Meter, MeterDraft, MeterKind};
pub use power::{Power, PowerDraft};
pub use role::{Role, RoleDraft};
pub use user::{User, UserDraft};
