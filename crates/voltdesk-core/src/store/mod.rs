// ── Client-side store ──
//
// One observable slice per entity collection, plus the role/power
// assignment slice. Slices change only by applying transitions.

mod entity_state;
mod role_powers;
mod slice;
mod status;

pub use entity_state::{EntityState, EntityTransition};
pub use role_powers::{PowerSet, RolePowerState, RolePowerTransition};
pub use slice::{Slice, SliceModel};
pub use status::{Notification, NotificationKind, Status};
