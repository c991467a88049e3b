use std::collections::HashMap;
use std::hash::Hash;

use futures::Stream;
use mlb_contracts::{ControllerError, Result};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use super::watch::{StoreEvent, WatchHandle, WatcherRegistry};

/// A concurrent key-value store: a `HashMap` guarded by a single
/// reader/writer lock, plus a watcher registry for change notification.
///
/// Reads take the shared lock; writes take the exclusive lock. `list_*`
/// operations take the read lock once to clone a snapshot, then release it
/// before yielding — the returned sequence is a finite, non-restartable
/// view of that snapshot, never a live cursor into the map (§4.1).
pub struct KvStore<K, V> {
    entries: RwLock<HashMap<K, V>>,
    watchers: WatcherRegistry<K, V>,
}

impl<K, V> Default for KvStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            watchers: WatcherRegistry::new(),
        }
    }
}

impl<K, V> KvStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `key`. Never fails; emits `Created`.
    pub fn put(&self, key: K, value: V) {
        self.entries.write().insert(key.clone(), value.clone());
        self.watchers.notify(StoreEvent::Created(key, value));
    }

    pub fn get(&self, key: &K) -> Result<V> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ControllerError::NotFound("key not found".to_string()))
    }

    /// Overwrites iff `key` is present; emits `Updated`.
    pub fn update(&self, key: K, value: V) -> Result<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(&key) {
            return Err(ControllerError::NotFound("key not found".to_string()));
        }
        entries.insert(key.clone(), value.clone());
        drop(entries);
        self.watchers.notify(StoreEvent::Updated(key, value));
        Ok(())
    }

    /// Removes `key`; silent if absent.
    pub fn delete(&self, key: K) {
        let removed = self.entries.write().remove(&key).is_some();
        if removed {
            self.watchers.notify(StoreEvent::Deleted(key));
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// A snapshot of every key, taken under one read-lock acquisition.
    pub fn snapshot_keys(&self) -> Vec<K> {
        self.entries.read().keys().cloned().collect()
    }

    /// A snapshot of every (key, value) pair.
    pub fn snapshot_entries(&self) -> Vec<(K, V)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Lazily streams the current key snapshot, stopping early if `token`
    /// is cancelled.
    pub fn list_keys(&self, token: CancellationToken) -> impl Stream<Item = K> + use<K, V> {
        let snapshot = self.snapshot_keys();
        async_stream::stream! {
            for key in snapshot {
                if token.is_cancelled() {
                    break;
                }
                yield key;
            }
        }
    }

    /// Lazily streams the current (key, value) snapshot, stopping early if
    /// `token` is cancelled.
    pub fn list_entries(
        &self,
        token: CancellationToken,
    ) -> impl Stream<Item = (K, V)> + use<K, V> {
        let snapshot = self.snapshot_entries();
        async_stream::stream! {
            for entry in snapshot {
                if token.is_cancelled() {
                    break;
                }
                yield entry;
            }
        }
    }

    pub fn watch(&self) -> (WatchHandle, impl Stream<Item = StoreEvent<K, V>> + use<K, V>) {
        self.watchers.subscribe()
    }

    pub fn unwatch(&self, handle: WatchHandle) {
        self.watchers.unsubscribe(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn get_after_put_returns_value() {
        let store: KvStore<String, i32> = KvStore::new();
        store.put("a".to_string(), 1);
        assert_eq!(store.get(&"a".to_string()).unwrap(), 1);
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let store: KvStore<String, i32> = KvStore::new();
        assert!(matches!(
            store.get(&"missing".to_string()),
            Err(ControllerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_on_absent_key_fails() {
        let store: KvStore<String, i32> = KvStore::new();
        assert!(store.update("a".to_string(), 2).is_err());
    }

    #[tokio::test]
    async fn update_on_present_key_overwrites() {
        let store: KvStore<String, i32> = KvStore::new();
        store.put("a".to_string(), 1);
        store.update("a".to_string(), 2).unwrap();
        assert_eq!(store.get(&"a".to_string()).unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_is_silent_when_absent() {
        let store: KvStore<String, i32> = KvStore::new();
        store.delete("missing".to_string());
    }

    #[tokio::test]
    async fn list_keys_streams_snapshot() {
        let store: KvStore<String, i32> = KvStore::new();
        store.put("a".to_string(), 1);
        store.put("b".to_string(), 2);
        let token = CancellationToken::new();
        let keys: Vec<_> = store.list_keys(token).collect().await;
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn list_keys_stops_early_when_cancelled_before_first_poll() {
        let store: KvStore<String, i32> = KvStore::new();
        store.put("a".to_string(), 1);
        store.put("b".to_string(), 2);
        let token = CancellationToken::new();
        token.cancel();
        let keys: Vec<_> = store.list_keys(token).collect().await;
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn watchers_receive_put_events() {
        let store: KvStore<String, i32> = KvStore::new();
        let (_handle, mut stream) = store.watch();
        store.put("a".to_string(), 1);
        let event = stream.next().await.unwrap();
        assert!(matches!(event, StoreEvent::Created(k, v) if k == "a" && v == 1));
    }
}
