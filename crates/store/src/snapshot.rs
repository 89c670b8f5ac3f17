//! Full-collection snapshots and the realtime hub that fans them out.

use std::{
    pin::Pin,
    sync::RwLock,
    task::{Context, Poll},
};

use futures::{Stream, StreamExt, stream::BoxStream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::{StoreError, documents::RawDocument};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 256;

/// A complete point-in-time listing of one collection, in document order.
/// Delivered whole on every change; consumers replace their state rather
/// than patching it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub docs: Vec<RawDocument>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }
}

/// Latest snapshot plus a broadcast channel of subsequent ones. A new
/// subscriber always sees the current snapshot first, then live changes.
pub struct SnapshotHub {
    latest: RwLock<Snapshot>,
    sender: broadcast::Sender<Snapshot>,
}

impl Default for SnapshotHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            latest: RwLock::new(Snapshot::default()),
            sender,
        }
    }

    pub fn publish(&self, snapshot: Snapshot) {
        *self
            .latest
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot.clone();
        // No receivers is fine: the collection may not be watched yet.
        let _ = self.sender.send(snapshot);
    }

    pub fn latest(&self) -> Snapshot {
        self.latest
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Current snapshot first, then every published one. A duplicate around
    /// the subscribe instant is harmless because snapshots are full
    /// replacements.
    pub fn subscribe(&self) -> Subscription {
        let rx = self.sender.subscribe();
        let current = self.latest();
        Subscription::new(current, rx)
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Live feed of one collection. Dropping it releases the listener. An error
/// item is terminal: the external client owns retry, so the consumer is
/// expected to surface the failure and wait for a manual reload.
pub struct Subscription {
    stream: BoxStream<'static, Result<Snapshot, StoreError>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl Subscription {
    /// A feed over an arbitrary stream of snapshot events, for store
    /// implementations that do not fan out through a [`SnapshotHub`].
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Snapshot, StoreError>> + Send + 'static,
    {
        Self {
            stream: stream.boxed(),
        }
    }

    fn new(current: Snapshot, rx: broadcast::Receiver<Snapshot>) -> Self {
        let live = BroadcastStream::new(rx).map(|item| match item {
            Ok(snapshot) => Ok(snapshot),
            Err(_lagged) => Err(StoreError::SubscriptionLost),
        });
        let stream = futures::stream::once(async move { Ok(current) })
            .chain(live)
            .boxed();
        Self { stream }
    }
}

impl Stream for Subscription {
    type Item = Result<Snapshot, StoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next_unpin(cx)
    }
}
