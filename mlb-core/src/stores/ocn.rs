use std::collections::HashMap;

use futures::Stream;
use mlb_contracts::{CellKey, ControllerError, Offset, Result};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use super::watch::{StoreEvent, WatchHandle, WatcherRegistry};

/// The per-(serving-cell, neighbor-cell) Ocn bias matrix.
///
/// A two-level mapping: outer key is a serving `CellKey`, value is an
/// inner mapping from neighbor `CellKey` to `Offset`. The inner mapping is
/// created empty when the outer key first appears (§3).
#[derive(Default)]
pub struct OcnStore {
    matrix: RwLock<HashMap<CellKey, HashMap<CellKey, Offset>>>,
    watchers: WatcherRegistry<CellKey, Offset>,
}

/// `{outer, inner, offset}` triple yielded by `list_all_inner`.
#[derive(Debug, Clone)]
pub struct OcnEntry {
    pub outer: CellKey,
    pub inner: CellKey,
    pub offset: Offset,
}

impl OcnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty inner map for `outer` if one does not already
    /// exist. Returns `true` if it was created.
    pub fn ensure_outer(&self, outer: &CellKey) -> bool {
        let mut matrix = self.matrix.write();
        if matrix.contains_key(outer) {
            false
        } else {
            matrix.insert(outer.clone(), HashMap::new());
            true
        }
    }

    pub fn outer_exists(&self, outer: &CellKey) -> bool {
        self.matrix.read().contains_key(outer)
    }

    /// Sets the inner entry; fails if `outer` is absent.
    pub fn put_inner(&self, outer: &CellKey, inner: CellKey, offset: Offset) -> Result<()> {
        let mut matrix = self.matrix.write();
        let Some(row) = matrix.get_mut(outer) else {
            return Err(ControllerError::NotFound(format!(
                "no Ocn row for outer key {outer}"
            )));
        };
        row.insert(inner.clone(), offset);
        drop(matrix);
        self.watchers.notify(StoreEvent::Updated(inner, offset));
        Ok(())
    }

    pub fn get_inner(&self, outer: &CellKey, inner: &CellKey) -> Result<Offset> {
        self.matrix
            .read()
            .get(outer)
            .and_then(|row| row.get(inner))
            .copied()
            .ok_or_else(|| ControllerError::NotFound("inner key not found".to_string()))
    }

    pub fn delete_inner(&self, outer: &CellKey, inner: &CellKey) {
        if let Some(row) = self.matrix.write().get_mut(outer) {
            row.remove(inner);
        }
    }

    /// Current inner-key set of `outer`, empty if `outer` is absent.
    pub fn inner_keys(&self, outer: &CellKey) -> Vec<CellKey> {
        self.matrix
            .read()
            .get(outer)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn snapshot_inner(&self, outer: &CellKey) -> Vec<(CellKey, Offset)> {
        self.matrix
            .read()
            .get(outer)
            .map(|row| row.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }

    pub fn list_inner(
        &self,
        outer: CellKey,
        token: CancellationToken,
    ) -> impl Stream<Item = (CellKey, Offset)> {
        let snapshot = self.snapshot_inner(&outer);
        async_stream::stream! {
            for entry in snapshot {
                if token.is_cancelled() {
                    break;
                }
                yield entry;
            }
        }
    }

    fn snapshot_all(&self) -> Vec<OcnEntry> {
        self.matrix
            .read()
            .iter()
            .flat_map(|(outer, row)| {
                row.iter().map(|(inner, offset)| OcnEntry {
                    outer: outer.clone(),
                    inner: inner.clone(),
                    offset: *offset,
                })
            })
            .collect()
    }

    pub fn list_all_inner(&self, token: CancellationToken) -> impl Stream<Item = OcnEntry> {
        let snapshot = self.snapshot_all();
        async_stream::stream! {
            for entry in snapshot {
                if token.is_cancelled() {
                    break;
                }
                yield entry;
            }
        }
    }

    /// A snapshot of the full matrix, used by the management API's
    /// `GetOcn` and by tests.
    pub fn snapshot(&self) -> HashMap<CellKey, HashMap<CellKey, Offset>> {
        self.matrix.read().clone()
    }

    pub fn watch(&self) -> (WatchHandle, impl Stream<Item = StoreEvent<CellKey, Offset>>) {
        self.watchers.subscribe()
    }

    pub fn unwatch(&self, handle: WatchHandle) {
        self.watchers.unsubscribe(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: &str) -> CellKey {
        CellKey::new("node1", "plmn1", n, "obj1")
    }

    #[test]
    fn ensure_outer_creates_empty_row_once() {
        let store = OcnStore::new();
        assert!(store.ensure_outer(&key("a")));
        assert!(!store.ensure_outer(&key("a")));
        assert!(store.inner_keys(&key("a")).is_empty());
    }

    #[test]
    fn put_inner_fails_when_outer_absent() {
        let store = OcnStore::new();
        assert!(store.put_inner(&key("a"), key("b"), Offset::ZERO).is_err());
    }

    #[test]
    fn put_then_get_inner_roundtrips() {
        let store = OcnStore::new();
        store.ensure_outer(&key("a"));
        store.put_inner(&key("a"), key("b"), Offset::ZERO).unwrap();
        assert_eq!(store.get_inner(&key("a"), &key("b")).unwrap().db(), 0);
    }

    #[test]
    fn delete_inner_removes_entry() {
        let store = OcnStore::new();
        store.ensure_outer(&key("a"));
        store.put_inner(&key("a"), key("b"), Offset::ZERO).unwrap();
        store.delete_inner(&key("a"), &key("b"));
        assert!(store.get_inner(&key("a"), &key("b")).is_err());
    }
}
