// ── Effect orchestration ──
//
// Bridges requests to the API client and the resulting transitions to
// the store, with latest-wins sequencing per operation kind.

mod entity;
mod latest;
mod role_powers;

pub use entity::{Orchestrator, Pending};
pub use latest::{LatestWins, Ticket};
pub use role_powers::{PendingRolePowers, RolePowerOrchestrator};
