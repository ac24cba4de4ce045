// ── Role ↔ Power assignment slice ──
//
// A role owns a set of power identifiers. Sets are loaded lazily per role
// and replaced wholesale on save; they are never merged.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

use super::{SliceModel, Status};
use crate::model::EntityId;

pub type PowerSet = BTreeSet<EntityId>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RolePowerTransition {
    LoadRequested { role: EntityId },
    LoadSucceeded { role: EntityId, powers: PowerSet },
    LoadFailed { role: EntityId, message: String },

    SaveRequested { role: EntityId, powers: PowerSet },
    SaveSucceeded { role: EntityId, powers: PowerSet },
    SaveFailed { role: EntityId, message: String },

    DismissNotification,
}

#[derive(Debug, Clone, Default)]
pub struct RolePowerState {
    assignments: HashMap<EntityId, Arc<PowerSet>>,
    pub status: Status,
}

impl RolePowerState {
    /// The loaded power set for a role, or `None` if not loaded yet.
    pub fn powers_of(&self, role: EntityId) -> Option<Arc<PowerSet>> {
        self.assignments.get(&role).cloned()
    }

    pub fn is_loaded(&self, role: EntityId) -> bool {
        self.assignments.contains_key(&role)
    }

    /// Identifier-set membership. Unloaded roles own nothing.
    pub fn has_power(&self, role: EntityId, power: EntityId) -> bool {
        self.assignments
            .get(&role)
            .is_some_and(|set| set.contains(&power))
    }

    pub fn is_loading(&self) -> bool {
        self.status.loading
    }
}

impl SliceModel for RolePowerState {
    type Transition = RolePowerTransition;

    fn reduce(&mut self, transition: &RolePowerTransition) {
        match transition {
            RolePowerTransition::LoadRequested { .. } | RolePowerTransition::SaveRequested { .. } => {
                self.status.begin();
            }
            RolePowerTransition::LoadSucceeded { role, powers } => {
                self.assignments.insert(*role, Arc::new(powers.clone()));
                self.status.settle();
            }
            RolePowerTransition::SaveSucceeded { role, powers } => {
                self.assignments.insert(*role, Arc::new(powers.clone()));
                self.status.succeed("Role permissions saved successfully");
            }
            RolePowerTransition::LoadFailed { message, .. }
            | RolePowerTransition::SaveFailed { message, .. } => self.status.fail(message),
            RolePowerTransition::DismissNotification => self.status.dismiss(),
        }
    }

    fn status(&self) -> &Status {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> PowerSet {
        ids.iter().copied().map(EntityId::new).collect()
    }

    #[test]
    fn save_replaces_rather_than_merges() {
        let role = EntityId::new(2);
        let mut state = RolePowerState::default();
        state.reduce(&RolePowerTransition::LoadSucceeded {
            role,
            powers: set(&[1, 2, 3]),
        });
        state.reduce(&RolePowerTransition::SaveSucceeded {
            role,
            powers: set(&[3, 4]),
        });

        assert_eq!(*state.powers_of(role).unwrap_or_default(), set(&[3, 4]));
        assert!(!state.has_power(role, EntityId::new(1)));
        assert!(state.has_power(role, EntityId::new(4)));
        assert!(state.status.notification.visible);
    }

    #[test]
    fn unloaded_role_has_no_powers() {
        let state = RolePowerState::default();
        assert!(!state.is_loaded(EntityId::new(1)));
        assert!(!state.has_power(EntityId::new(1), EntityId::new(1)));
    }

    #[test]
    fn failed_load_keeps_previous_set() {
        let role = EntityId::new(5);
        let mut state = RolePowerState::default();
        state.reduce(&RolePowerTransition::LoadSucceeded {
            role,
            powers: set(&[9]),
        });
        state.reduce(&RolePowerTransition::LoadRequested { role });
        state.reduce(&RolePowerTransition::LoadFailed {
            role,
            message: "no permission to view this resource".into(),
        });

        assert!(state.has_power(role, EntityId::new(9)));
        assert!(!state.is_loading());
        assert!(state.status.error.is_some());
    }
}
