// ── Reactive slice subscriptions ──
//
// Snapshot access plus change notification for any slice, and a `Stream`
// adapter for consumers using `StreamExt` combinators.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::SliceModel;

/// A subscription to one slice.
pub struct SliceStream<S: SliceModel> {
    current: S,
    receiver: watch::Receiver<S>,
}

impl<S: SliceModel> SliceStream<S> {
    pub(crate) fn new(receiver: watch::Receiver<S>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &S {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> S {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the slice is dropped.
    pub async fn changed(&mut self) -> Option<S> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> SliceWatchStream<S> {
        SliceWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`. Yields the current
/// snapshot first, then one per change.
pub struct SliceWatchStream<S: SliceModel> {
    inner: WatchStream<S>,
}

impl<S: SliceModel + Unpin> Stream for SliceWatchStream<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Audit, EntityId, Role};
    use crate::store::{EntityState, EntityTransition, Slice};

    #[tokio::test]
    async fn changed_yields_new_snapshot() {
        let slice = Slice::new(EntityState::<Role>::default());
        let mut stream = SliceStream::new(slice.subscribe());
        assert!(stream.current().is_empty());

        slice.apply(EntityTransition::CreateSucceeded(Role {
            id: EntityId::new(1),
            name: "admin".into(),
            description: None,
            audit: Audit::default(),
        }));

        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(stream.current().len(), 1);
    }
}
