use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

/// A change notification emitted by a store.
#[derive(Debug, Clone)]
pub enum StoreEvent<K, V> {
    Created(K, V),
    Updated(K, V),
    Deleted(K),
}

/// An opaque handle identifying a registered watcher, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(Uuid);

/// Fan-out registry for store watchers.
///
/// Dispatch never holds the registry lock while delivering: `notify` takes
/// the read lock only long enough to clone the list of sender handles, then
/// releases it before pushing to any channel. This keeps an unresponsive
/// subscriber from coupling to writers (§4.1, §9 "Watcher registry under
/// contention"). Delivery is best-effort — a full or dropped receiver is
/// silently skipped.
pub struct WatcherRegistry<K, V> {
    subscribers: RwLock<HashMap<Uuid, mpsc::UnboundedSender<StoreEvent<K, V>>>>,
}

impl<K, V> Default for WatcherRegistry<K, V> {
    fn default() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> WatcherRegistry<K, V>
where
    K: Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new watcher and returns its handle plus the stream of
    /// events it will receive.
    pub fn subscribe(&self) -> (WatchHandle, UnboundedReceiverStream<StoreEvent<K, V>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.subscribers.write().insert(id, tx);
        (WatchHandle(id), UnboundedReceiverStream::new(rx))
    }

    pub fn unsubscribe(&self, handle: WatchHandle) {
        self.subscribers.write().remove(&handle.0);
    }

    pub fn notify(&self, event: StoreEvent<K, V>) {
        let senders: Vec<_> = self.subscribers.read().values().cloned().collect();
        for sender in senders {
            let _ = sender.send(event.clone());
        }
    }
}
