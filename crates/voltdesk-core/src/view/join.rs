// ── Join projections ──
//
// Resolve foreign keys against reference collections for display.
// Missing references produce a placeholder label.

use std::sync::Arc;

use crate::model::{Device, EntityId, Menu, Power, Role};
use crate::store::{PowerSet, RolePowerState};

pub const NO_REFERENCE: &str = "-";

fn label<T>(
    records: &[Arc<T>],
    id: Option<EntityId>,
    id_of: impl Fn(&T) -> EntityId,
    name_of: impl Fn(&T) -> String,
    placeholder: &str,
) -> String {
    let Some(id) = id else {
        return NO_REFERENCE.to_owned();
    };
    records
        .iter()
        .find(|r| id_of(&***r) == id)
        .map_or_else(|| format!("{placeholder} {id}"), |r| name_of(&**r))
}

pub fn menu_label(menus: &[Arc<Menu>], id: Option<EntityId>) -> String {
    label(menus, id, |m| m.id, |m| m.title.clone(), "Menu")
}

pub fn role_label(roles: &[Arc<Role>], id: Option<EntityId>) -> String {
    label(roles, id, |r| r.id, |r| r.name.clone(), "Role")
}

/// Device display name, falling back to its serial number.
pub fn device_label(devices: &[Arc<Device>], id: Option<EntityId>) -> String {
    label(
        devices,
        id,
        |d| d.id,
        |d| d.name.clone().unwrap_or_else(|| d.sn.clone()),
        "Device",
    )
}

pub fn role_has_power(assignments: &RolePowerState, role: EntityId, power: EntityId) -> bool {
    assignments.has_power(role, power)
}

/// Split `powers` into (assigned, unassigned) with respect to `assigned`.
pub fn partition_powers(
    powers: &[Arc<Power>],
    assigned: &PowerSet,
) -> (Vec<Arc<Power>>, Vec<Arc<Power>>) {
    powers
        .iter()
        .cloned()
        .partition(|p| assigned.contains(&p.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Audit, DeviceStatus};
    use crate::store::{RolePowerTransition, SliceModel};

    fn role(id: i64, name: &str) -> Arc<Role> {
        Arc::new(Role {
            id: EntityId::new(id),
            name: name.into(),
            description: None,
            audit: Audit::default(),
        })
    }

    fn power(id: i64) -> Arc<Power> {
        Arc::new(Power {
            id: EntityId::new(id),
            name: format!("power-{id}"),
            code: format!("p:{id}"),
            menu_id: None,
            description: None,
            audit: Audit::default(),
        })
    }

    #[test]
    fn role_label_resolves_or_placeholders() {
        let roles = vec![role(1, "Admin")];
        assert_eq!(role_label(&roles, Some(EntityId::new(1))), "Admin");
        assert_eq!(role_label(&roles, Some(EntityId::new(9))), "Role 9");
        assert_eq!(role_label(&roles, None), NO_REFERENCE);
    }

    #[test]
    fn device_label_falls_back_to_serial() {
        let devices = vec![Arc::new(Device {
            id: EntityId::new(3),
            sn: "SN-003".into(),
            name: None,
            model: None,
            location: None,
            status: DeviceStatus::Offline,
            audit: Audit::default(),
        })];
        assert_eq!(device_label(&devices, Some(EntityId::new(3))), "SN-003");
        assert_eq!(device_label(&[], Some(EntityId::new(3))), "Device 3");
    }

    #[test]
    fn menu_label_handles_empty_reference() {
        assert_eq!(menu_label(&[], Some(EntityId::new(4))), "Menu 4");
    }

    #[test]
    fn partition_by_assignment() {
        let powers = vec![power(1), power(2), power(3)];
        let assigned: PowerSet = [EntityId::new(2)].into_iter().collect();
        let (yes, no) = partition_powers(&powers, &assigned);
        assert_eq!(yes.len(), 1);
        assert_eq!(no.iter().map(|p| p.id.get()).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn membership_through_assignments() {
        let mut state = RolePowerState::default();
        state.reduce(&RolePowerTransition::LoadSucceeded {
            role: EntityId::new(1),
            powers: [EntityId::new(5)].into_iter().collect(),
        });
        assert!(role_has_power(&state, EntityId::new(1), EntityId::new(5)));
        assert!(!role_has_power(&state, EntityId::new(1), EntityId::new(6)));
    }
}
