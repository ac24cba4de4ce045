// ── Entity collection slice ──
//
// The authoritative client-side copy of one entity collection plus its
// UI flags, and the transitions that are allowed to change it.

use std::sync::Arc;

use serde::Serialize;

use super::{SliceModel, Status};
use crate::model::{Entity, EntityId, InsertPosition};

/// Every state change an entity slice accepts.
///
/// `*Requested` variants mark the start of an operation, `*Succeeded` /
/// `*Failed` its end. Serializable so the log can be persisted or shipped.
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "snake_case",
    bound(serialize = "T: Entity")
)]
pub enum EntityTransition<T: Entity> {
    FetchRequested,
    FetchSucceeded(Vec<T>),
    FetchFailed(String),

    CreateRequested(T::Draft),
    CreateSucceeded(T),
    CreateFailed(String),

    UpdateRequested { id: EntityId, draft: T::Draft },
    UpdateSucceeded(T),
    UpdateFailed(String),

    DeleteRequested(EntityId),
    DeleteSucceeded(EntityId),
    DeleteFailed(String),

    DismissNotification,
}

impl<T: Entity> EntityTransition<T> {
    /// `true` for the variants that end an operation.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::FetchRequested
                | Self::CreateRequested(_)
                | Self::UpdateRequested { .. }
                | Self::DeleteRequested(_)
                | Self::DismissNotification
        )
    }

    /// `true` for the `*Failed` variants.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed(_) | Self::CreateFailed(_) | Self::UpdateFailed(_) | Self::DeleteFailed(_)
        )
    }
}

/// Collection + flags for one entity kind.
#[derive(Debug, Clone)]
pub struct EntityState<T: Entity> {
    records: Arc<Vec<Arc<T>>>,
    position: InsertPosition,
    pub status: Status,
}

impl<T: Entity> EntityState<T> {
    pub fn new(position: InsertPosition) -> Self {
        Self {
            records: Arc::new(Vec::new()),
            position,
            status: Status::default(),
        }
    }

    /// The whole collection (cheap `Arc` clone).
    pub fn get_all(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(&self.records)
    }

    pub fn get(&self, id: EntityId) -> Option<Arc<T>> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.status.loading
    }

    pub fn insert_position(&self) -> InsertPosition {
        self.position
    }

    fn replace_all(&mut self, records: &[T]) {
        self.records = Arc::new(records.iter().cloned().map(Arc::new).collect());
    }

    fn insert(&mut self, record: &T) {
        let record = Arc::new(record.clone());
        let mut next = Vec::with_capacity(self.records.len() + 1);
        match self.position {
            InsertPosition::Prepend => {
                next.push(record);
                next.extend(self.records.iter().cloned());
            }
            InsertPosition::Append => {
                next.extend(self.records.iter().cloned());
                next.push(record);
            }
        }
        self.records = Arc::new(next);
    }

    fn replace(&mut self, record: &T) {
        let id = record.id();
        let next = self
            .records
            .iter()
            .map(|existing| {
                if existing.id() == id {
                    Arc::new(record.clone())
                } else {
                    Arc::clone(existing)
                }
            })
            .collect();
        self.records = Arc::new(next);
    }

    fn remove(&mut self, id: EntityId) {
        if self.records.iter().any(|r| r.id() == id) {
            let next = self
                .records
                .iter()
                .filter(|r| r.id() != id)
                .cloned()
                .collect();
            self.records = Arc::new(next);
        }
    }
}

impl<T: Entity> Default for EntityState<T> {
    fn default() -> Self {
        Self::new(T::KIND.default_insert())
    }
}

impl<T: Entity> SliceModel for EntityState<T> {
    type Transition = EntityTransition<T>;

    fn reduce(&mut self, transition: &EntityTransition<T>) {
        let label = T::KIND.label();
        match transition {
            EntityTransition::FetchRequested
            | EntityTransition::CreateRequested(_)
            | EntityTransition::UpdateRequested { .. }
            | EntityTransition::DeleteRequested(_) => self.status.begin(),

            EntityTransition::FetchSucceeded(records) => {
                self.replace_all(records);
                self.status.settle();
            }
            EntityTransition::CreateSucceeded(record) => {
                self.insert(record);
                self.status.succeed(format!("{label} created successfully"));
            }
            EntityTransition::UpdateSucceeded(record) => {
                self.replace(record);
                self.status.succeed(format!("{label} updated successfully"));
            }
            EntityTransition::DeleteSucceeded(id) => {
                self.remove(*id);
                self.status.succeed(format!("{label} deleted successfully"));
            }

            EntityTransition::FetchFailed(message)
            | EntityTransition::CreateFailed(message)
            | EntityTransition::UpdateFailed(message)
            | EntityTransition::DeleteFailed(message) => self.status.fail(message),

            EntityTransition::DismissNotification => self.status.dismiss(),
        }
    }

    fn status(&self) -> &Status {
        &self.status
    }
}
