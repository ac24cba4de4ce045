// ── Generic observable slice ──
//
// A slice owns one piece of client state. It is mutated only by applying
// transitions, one at a time, through `watch::Sender::send_modify`.
// Every applied transition is also published on a broadcast channel so
// consumers can tail the transition log.

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use super::Status;

const TRANSITION_LOG_CAPACITY: usize = 256;

/// State that evolves by reducing transitions.
pub trait SliceModel: Clone + Send + Sync + 'static {
    type Transition: Clone + Debug + Send + Sync + 'static;

    fn reduce(&mut self, transition: &Self::Transition);

    fn status(&self) -> &Status;
}

pub struct Slice<S: SliceModel> {
    state: watch::Sender<S>,
    log: broadcast::Sender<Arc<S::Transition>>,
}

impl<S: SliceModel> Slice<S> {
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        let (log, _) = broadcast::channel(TRANSITION_LOG_CAPACITY);
        Self { state, log }
    }

    /// Apply one transition and notify subscribers.
    pub fn apply(&self, transition: S::Transition) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state.send_modify(|state| state.reduce(&transition));
        let _ = self.log.send(Arc::new(transition));
    }

    /// Apply `transition` only if `guard` holds, checked under the same
    /// lock as the write. Returns whether it was applied.
    pub fn apply_if(&self, guard: impl FnOnce() -> bool, transition: S::Transition) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if !guard() {
                return false;
            }
            state.reduce(&transition);
            true
        });
        if applied {
            let _ = self.log.send(Arc::new(transition));
        }
        applied
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn status(&self) -> Status {
        self.read(|s| s.status().clone())
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    /// Subscribe to the transition log. Only transitions applied after
    /// subscribing are delivered.
    pub fn transitions(&self) -> broadcast::Receiver<Arc<S::Transition>> {
        self.log.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::effect::LatestWins;
    use crate::model::{Audit, Device, DeviceStatus, EntityId};
    use crate::request::OperationKind;
    use crate::store::{EntityState, EntityTransition};

    fn device(id: i64) -> Device {
        Device {
            id: EntityId::new(id),
            sn: format!("SN-{id:03}"),
            name: None,
            model: None,
            location: None,
            status: DeviceStatus::Online,
            audit: Audit::default(),
        }
    }

    fn ids(slice: &Slice<EntityState<Device>>) -> Vec<i64> {
        slice.read(|s| s.get_all().iter().map(|d| d.id.get()).collect())
    }

    #[test]
    fn apply_if_skips_write_and_log_when_guard_fails() {
        let slice = Slice::new(EntityState::<Device>::default());
        let mut log = slice.transitions();

        let applied = slice.apply_if(|| false, EntityTransition::FetchSucceeded(vec![device(1)]));

        assert!(!applied);
        assert!(ids(&slice).is_empty());
        assert!(log.try_recv().is_err());
    }

    #[test]
    fn apply_if_checks_ticket_at_write_time() {
        let slice = Slice::new(EntityState::<Device>::default());
        let tickets = LatestWins::new();
        let mut log = slice.transitions();

        let stale = tickets.issue(OperationKind::Fetch);
        let fresh = tickets.issue(OperationKind::Fetch);

        let fresh_applied = slice.apply_if(
            || tickets.is_current(&fresh),
            EntityTransition::FetchSucceeded(vec![device(2)]),
        );
        let stale_applied = slice.apply_if(
            || tickets.is_current(&stale),
            EntityTransition::FetchSucceeded(vec![device(1)]),
        );

        assert!(fresh_applied);
        assert!(!stale_applied);
        assert_eq!(ids(&slice), vec![2]);
        assert!(matches!(
            *log.try_recv().unwrap(),
            EntityTransition::FetchSucceeded(_)
        ));
        assert!(log.try_recv().is_err());
    }
}
