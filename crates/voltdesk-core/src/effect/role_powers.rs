// ── Role/power assignment orchestrator ──
//
// Same contract as the entity orchestrator, but tickets are keyed by
// (operation, role) so loading role A never supersedes loading role B.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use voltdesk_api::ApiClient;

use super::entity::failure;
use super::latest::{LatestWins, Ticket};
use crate::model::EntityId;
use crate::request::{RolePowerOp, RolePowerRequest};
use crate::store::{PowerSet, RolePowerState, RolePowerTransition, Slice};
use crate::stream::SliceStream;

const LOAD_FALLBACK: &str = "Failed to load role permissions";
const SAVE_FALLBACK: &str = "Failed to save role permissions";

#[derive(Debug)]
pub struct PendingRolePowers {
    ticket: Ticket<(RolePowerOp, EntityId)>,
    request: RolePowerRequest,
}

#[derive(Clone)]
pub struct RolePowerOrchestrator {
    inner: Arc<RolePowerInner>,
}

struct RolePowerInner {
    api: Arc<ApiClient>,
    slice: Slice<RolePowerState>,
    tickets: LatestWins<(RolePowerOp, EntityId)>,
    cancel: CancellationToken,
}

impl RolePowerOrchestrator {
    pub fn new(api: Arc<ApiClient>, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::new(RolePowerInner {
                api,
                slice: Slice::new(RolePowerState::default()),
                tickets: LatestWins::new(),
                cancel,
            }),
        }
    }

    pub fn slice(&self) -> &Slice<RolePowerState> {
        &self.inner.slice
    }

    pub fn state(&self) -> RolePowerState {
        self.inner.slice.snapshot()
    }

    pub fn powers_of(&self, role: EntityId) -> Option<Arc<PowerSet>> {
        self.inner.slice.read(|s| s.powers_of(role))
    }

    pub fn watch(&self) -> SliceStream<RolePowerState> {
        SliceStream::new(self.inner.slice.subscribe())
    }

    pub fn dismiss_notification(&self) {
        self.inner
            .slice
            .apply(RolePowerTransition::DismissNotification);
    }

    pub fn begin(&self, request: RolePowerRequest) -> PendingRolePowers {
        let ticket = self.inner.tickets.issue((request.op(), request.role()));
        let requested = match &request {
            RolePowerRequest::Load { role } => RolePowerTransition::LoadRequested { role: *role },
            RolePowerRequest::Save { role, powers } => RolePowerTransition::SaveRequested {
                role: *role,
                powers: powers.clone(),
            },
        };
        self.inner.slice.apply(requested);
        PendingRolePowers { ticket, request }
    }

    pub async fn complete(&self, pending: PendingRolePowers) -> Option<RolePowerTransition> {
        let PendingRolePowers { ticket, request } = pending;

        let outcome = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return None,
            outcome = self.perform(request) => outcome,
        };

        let tickets = &self.inner.tickets;
        if !self
            .inner
            .slice
            .apply_if(|| tickets.is_current(&ticket), outcome.clone())
        {
            let (op, role) = ticket.key();
            debug!(%op, %role, seq = ticket.seq(), "discarding superseded role powers completion");
            return None;
        }
        Some(outcome)
    }

    pub async fn run(&self, request: RolePowerRequest) -> Option<RolePowerTransition> {
        let pending = self.begin(request);
        self.complete(pending).await
    }

    pub fn dispatch(&self, request: RolePowerRequest) -> JoinHandle<Option<RolePowerTransition>> {
        let pending = self.begin(request);
        let this = self.clone();
        tokio::spawn(async move { this.complete(pending).await })
    }

    pub async fn load(&self, role: EntityId) -> Option<RolePowerTransition> {
        self.run(RolePowerRequest::Load { role }).await
    }

    /// Replace the role's power set with `powers`.
    pub async fn save(&self, role: EntityId, powers: PowerSet) -> Option<RolePowerTransition> {
        self.run(RolePowerRequest::Save { role, powers }).await
    }

    async fn perform(&self, request: RolePowerRequest) -> RolePowerTransition {
        let api = &self.inner.api;
        match request {
            RolePowerRequest::Load { role } => match api.role_powers(role.get()).await {
                Ok(ids) => RolePowerTransition::LoadSucceeded {
                    role,
                    powers: ids.into_iter().map(EntityId::new).collect(),
                },
                Err(e) => RolePowerTransition::LoadFailed {
                    role,
                    message: failure(e, LOAD_FALLBACK),
                },
            },
            RolePowerRequest::Save { role, powers } => {
                let ids: Vec<i64> = powers.iter().map(|id| id.get()).collect();
                match api.set_role_powers(role.get(), &ids).await {
                    Ok(saved) => RolePowerTransition::SaveSucceeded {
                        role,
                        powers: saved.into_iter().map(EntityId::new).collect(),
                    },
                    Err(e) => RolePowerTransition::SaveFailed {
                        role,
                        message: failure(e, SAVE_FALLBACK),
                    },
                }
            }
        }
    }
}
