// ── Entity effect orchestrator ──
//
// Turns a `Request<T>` into exactly one network call and exactly one
// terminal transition on the slice. Failures never escape: they become
// `*Failed(message)` transitions with a normalized message.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use voltdesk_api::ApiClient;

use super::latest::{LatestWins, Ticket};
use crate::error::CoreError;
use crate::model::{Entity, EntityId, InsertPosition};
use crate::request::{OperationKind, Request};
use crate::store::{EntityState, EntityTransition, Slice};
use crate::stream::SliceStream;

/// A request whose `*Requested` transition has been applied but whose
/// network call has not run yet.
#[derive(Debug)]
pub struct Pending<T: Entity> {
    ticket: Ticket<OperationKind>,
    request: Request<T>,
}

impl<T: Entity> Pending<T> {
    pub fn kind(&self) -> OperationKind {
        *self.ticket.key()
    }
}

/// Effect orchestrator for one entity collection.
///
/// Cheaply cloneable via `Arc<OrchestratorInner>`; clones share the slice,
/// the latest-wins counters, and the shutdown token.
pub struct Orchestrator<T: Entity> {
    inner: Arc<OrchestratorInner<T>>,
}

struct OrchestratorInner<T: Entity> {
    api: Arc<ApiClient>,
    slice: Slice<EntityState<T>>,
    tickets: LatestWins<OperationKind>,
    cancel: CancellationToken,
}

impl<T: Entity> Clone for Orchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Entity> Orchestrator<T> {
    pub fn new(api: Arc<ApiClient>, position: InsertPosition, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::new(OrchestratorInner {
                api,
                slice: Slice::new(EntityState::new(position)),
                tickets: LatestWins::new(),
                cancel,
            }),
        }
    }

    // ── State access ─────────────────────────────────────────────

    pub fn slice(&self) -> &Slice<EntityState<T>> {
        &self.inner.slice
    }

    pub fn state(&self) -> EntityState<T> {
        self.inner.slice.snapshot()
    }

    pub fn get_all(&self) -> Arc<Vec<Arc<T>>> {
        self.inner.slice.read(EntityState::get_all)
    }

    pub fn watch(&self) -> SliceStream<EntityState<T>> {
        SliceStream::new(self.inner.slice.subscribe())
    }

    pub fn dismiss_notification(&self) {
        self.inner.slice.apply(EntityTransition::DismissNotification);
    }

    // ── Request lifecycle ────────────────────────────────────────

    /// Issue a ticket and apply the `*Requested` transition.
    ///
    /// Synchronous, so issue order equals call order even when the
    /// network calls are later raced on separate tasks.
    pub fn begin(&self, request: Request<T>) -> Pending<T> {
        let ticket = self.inner.tickets.issue(request.kind());
        let requested = match &request {
            Request::Fetch => EntityTransition::FetchRequested,
            Request::Create(draft) => EntityTransition::CreateRequested(draft.clone()),
            Request::Update { id, draft } => EntityTransition::UpdateRequested {
                id: *id,
                draft: draft.clone(),
            },
            Request::Delete { id } => EntityTransition::DeleteRequested(*id),
        };
        self.inner.slice.apply(requested);
        Pending { ticket, request }
    }

    /// Perform the network call and apply its terminal transition.
    ///
    /// Returns `None` when the completion was superseded by a newer
    /// request of the same kind, or when the console shut down first.
    pub async fn complete(&self, pending: Pending<T>) -> Option<EntityTransition<T>> {
        let Pending { ticket, request } = pending;

        let outcome = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => {
                debug!(entity = %T::KIND, kind = %ticket.key(), "shutdown before completion");
                return None;
            }
            outcome = self.perform(request) => outcome,
        };

        let tickets = &self.inner.tickets;
        if !self
            .inner
            .slice
            .apply_if(|| tickets.is_current(&ticket), outcome.clone())
        {
            debug!(
                entity = %T::KIND,
                kind = %ticket.key(),
                seq = ticket.seq(),
                "discarding superseded completion"
            );
            return None;
        }
        Some(outcome)
    }

    /// Run a request inline: `begin` then `complete`.
    pub async fn run(&self, request: Request<T>) -> Option<EntityTransition<T>> {
        let pending = self.begin(request);
        self.complete(pending).await
    }

    /// Run a request on the tokio runtime.
    ///
    /// The `*Requested` transition is applied before this returns.
    pub fn dispatch(&self, request: Request<T>) -> JoinHandle<Option<EntityTransition<T>>> {
        let pending = self.begin(request);
        let this = self.clone();
        tokio::spawn(async move { this.complete(pending).await })
    }

    // ── Convenience wrappers ─────────────────────────────────────

    pub async fn fetch_all(&self) -> Option<EntityTransition<T>> {
        self.run(Request::Fetch).await
    }

    pub async fn create(&self, draft: T::Draft) -> Option<EntityTransition<T>> {
        self.run(Request::Create(draft)).await
    }

    pub async fn update(&self, id: EntityId, draft: T::Draft) -> Option<EntityTransition<T>> {
        self.run(Request::Update { id, draft }).await
    }

    pub async fn delete(&self, id: EntityId) -> Option<EntityTransition<T>> {
        self.run(Request::Delete { id }).await
    }

    /// Create, then on success reload the whole collection.
    ///
    /// Applies `CreateSucceeded` followed by `FetchSucceeded`. A failing
    /// reload is logged and leaves the create notification in place.
    pub async fn create_then_refresh(&self, draft: T::Draft) -> Option<EntityTransition<T>> {
        let created = self.create(draft).await?;
        if !matches!(created, EntityTransition::CreateSucceeded(_)) {
            return Some(created);
        }

        let ticket = self.inner.tickets.issue(OperationKind::Fetch);
        let fetched = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return Some(created),
            fetched = self.inner.api.list::<T>(T::KIND.collection()) => fetched,
        };

        match fetched {
            Ok(records) => {
                let tickets = &self.inner.tickets;
                let applied = self.inner.slice.apply_if(
                    || tickets.is_current(&ticket),
                    EntityTransition::FetchSucceeded(records),
                );
                if !applied {
                    debug!(entity = %T::KIND, "discarding superseded refresh");
                }
            }
            Err(e) => warn!(entity = %T::KIND, error = %e, "refresh after create failed"),
        }
        Some(created)
    }

    /// Fetch a single record. Does not touch the slice.
    pub async fn fetch_one(&self, id: EntityId) -> Result<T, CoreError> {
        Ok(self
            .inner
            .api
            .fetch::<T>(T::KIND.collection(), id.get())
            .await?)
    }

    // ── Network ──────────────────────────────────────────────────

    async fn perform(&self, request: Request<T>) -> EntityTransition<T> {
        let api = &self.inner.api;
        let collection = T::KIND.collection();

        match request {
            Request::Fetch => match api.list::<T>(collection).await {
                Ok(records) => EntityTransition::FetchSucceeded(records),
                Err(e) => EntityTransition::FetchFailed(failure(e, &format!(
                    "Failed to load {collection}"
                ))),
            },
            Request::Create(draft) => match api.create::<T>(collection, &draft).await {
                Ok(record) => EntityTransition::CreateSucceeded(record),
                Err(e) => EntityTransition::CreateFailed(failure(e, &format!(
                    "Failed to create {}",
                    T::KIND
                ))),
            },
            Request::Update { id, draft } => {
                match api.update::<T>(collection, id.get(), &draft).await {
                    Ok(record) => EntityTransition::UpdateSucceeded(record),
                    Err(e) => EntityTransition::UpdateFailed(failure(e, &format!(
                        "Failed to update {}",
                        T::KIND
                    ))),
                }
            }
            Request::Delete { id } => match api.remove(collection, id.get()).await {
                Ok(()) => EntityTransition::DeleteSucceeded(id),
                Err(e) => EntityTransition::DeleteFailed(failure(e, &format!(
                    "Failed to delete {}",
                    T::KIND
                ))),
            },
        }
    }
}

/// Normalize a wire error into notification text.
pub(crate) fn failure(err: voltdesk_api::Error, fallback: &str) -> String {
    let err = CoreError::from(err);
    debug!(error = %err, "request failed");
    err.notification_message(fallback)
}
