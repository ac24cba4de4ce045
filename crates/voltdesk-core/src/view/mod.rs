// ── Derived views ──
//
// Pure, synchronous projections over slice snapshots.

mod filter;
mod group;
mod join;

pub use filter::{FieldFn, SearchView, Searchable, filter_by, filter_by_substring};
pub use group::{MenuGroupView, UNASSIGNED_GROUP, group_by_key, group_powers_by_menu};
pub use join::{
    NO_REFERENCE, device_label, menu_label, partition_powers, role_has_power, role_label,
};
