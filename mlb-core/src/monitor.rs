use std::collections::HashMap;
use std::sync::Arc;

use mlb_contracts::{CellKey, ControllerError, Offset};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::ports::{Snapshot, TopoRecord, TopoSource};
use crate::stores::{NeighborStore, OcnStore, UeCountStore};

/// Reconciles TopoSource snapshots into the neighbor, UE-count and Ocn
/// stores (§4.2). Invoked by the controller on every tick.
pub struct Monitor {
    topo_source: Arc<dyn TopoSource>,
    neighbors: Arc<NeighborStore>,
    ue_counts: Arc<UeCountStore>,
    ocn: Arc<OcnStore>,
}

impl Monitor {
    pub fn new(
        topo_source: Arc<dyn TopoSource>,
        neighbors: Arc<NeighborStore>,
        ue_counts: Arc<UeCountStore>,
        ocn: Arc<OcnStore>,
    ) -> Self {
        Self {
            topo_source,
            neighbors,
            ue_counts,
            ocn,
        }
    }

    /// Fetches a snapshot, backfills and writes it into the stores, then
    /// reconciles the Ocn matrix against the fresh neighbor store.
    ///
    /// Returns `EmptySource` if the snapshot had no records (the caller
    /// treats this as a transient warning and skips the tick), or
    /// `NotSupported` if a record's key tuple could not be completed after
    /// backfill.
    pub async fn run(&self, token: CancellationToken) -> Result<(), ControllerError> {
        let snapshot = self.topo_source.fetch_snapshot(token.clone()).await?;
        if snapshot.is_empty() {
            return Err(ControllerError::EmptySource);
        }
        if token.is_cancelled() {
            return Err(ControllerError::Cancelled);
        }

        let completed = backfill(snapshot)?;

        for record in &completed {
            match record {
                TopoRecord::Neighbors(key, list) => {
                    self.neighbors.put(key.clone(), list.clone());
                }
                TopoRecord::UeCount(key, measurement) => {
                    self.ue_counts.put(key.clone(), *measurement);
                }
            }
        }

        self.reconcile_ocn();
        Ok(())
    }

    /// Ensures an Ocn row exists for every serving cell known to the
    /// neighbor store, and that its inner-key set equals the current
    /// neighbor list, inserting default-offset entries for newly seen
    /// neighbors and dropping stale ones (§4.2 step 4).
    fn reconcile_ocn(&self) {
        for (serving, list) in self.neighbors.snapshot_entries() {
            let is_new = self.ocn.ensure_outer(&serving);
            if is_new {
                for neighbor in list.iter() {
                    let _ = self.ocn.put_inner(&serving, neighbor.clone(), Offset::ZERO);
                }
                continue;
            }

            let current_inner: Vec<CellKey> = self.ocn.inner_keys(&serving);
            for stale in current_inner.iter().filter(|k| !list.contains(k)) {
                self.ocn.delete_inner(&serving, stale);
            }
            for neighbor in list.iter().filter(|n| !current_inner.contains(n)) {
                let _ = self.ocn.put_inner(&serving, neighbor.clone(), Offset::ZERO);
            }
        }
    }
}

/// Infers missing `PlmnID`/`CellObjID`/`CellID` components from the rest
/// of the snapshot, then discards or fails records whose key still cannot
/// be completed.
fn backfill(snapshot: Snapshot) -> Result<Snapshot, ControllerError> {
    let mut plmn_by_cell_id: HashMap<String, String> = HashMap::new();
    let mut obj_by_cell_id: HashMap<String, String> = HashMap::new();
    let mut cell_id_by_obj: HashMap<String, String> = HashMap::new();

    let note = |plmn_by_cell_id: &mut HashMap<String, String>,
                obj_by_cell_id: &mut HashMap<String, String>,
                cell_id_by_obj: &mut HashMap<String, String>,
                key: &CellKey| {
        if !key.plmn_id.is_empty() && !key.cell_id.is_empty() {
            plmn_by_cell_id
                .entry(key.cell_id.clone())
                .or_insert_with(|| key.plmn_id.clone());
        }
        if !key.cell_id.is_empty() && !key.cell_obj_id.is_empty() {
            obj_by_cell_id
                .entry(key.cell_id.clone())
                .or_insert_with(|| key.cell_obj_id.clone());
            cell_id_by_obj
                .entry(key.cell_obj_id.clone())
                .or_insert_with(|| key.cell_id.clone());
        }
    };

    for record in &snapshot {
        match record {
            TopoRecord::Neighbors(key, list) => {
                note(&mut plmn_by_cell_id, &mut obj_by_cell_id, &mut cell_id_by_obj, key);
                for neighbor in list.iter() {
                    note(&mut plmn_by_cell_id, &mut obj_by_cell_id, &mut cell_id_by_obj, neighbor);
                }
            }
            TopoRecord::UeCount(key, _) => {
                note(&mut plmn_by_cell_id, &mut obj_by_cell_id, &mut cell_id_by_obj, key);
            }
        }
    }

    // Cells with no inferred PlmnID are discarded; records whose identity
    // (CellObjID/CellID) cannot be completed fail the whole tick (§4.2).
    enum Completion {
        Complete(CellKey),
        MissingPlmnId,
        MissingIdentity,
    }

    let complete_key = |mut key: CellKey| -> Completion {
        if key.cell_obj_id.is_empty() {
            if let Some(obj) = obj_by_cell_id.get(&key.cell_id) {
                key.cell_obj_id = obj.clone();
            }
        }
        if key.cell_id.is_empty() {
            if let Some(cell_id) = cell_id_by_obj.get(&key.cell_obj_id) {
                key.cell_id = cell_id.clone();
            }
        }
        if key.cell_id.is_empty() || key.cell_obj_id.is_empty() {
            return Completion::MissingIdentity;
        }
        if key.plmn_id.is_empty() {
            if let Some(plmn) = plmn_by_cell_id.get(&key.cell_id) {
                key.plmn_id = plmn.clone();
            }
        }
        if key.plmn_id.is_empty() {
            return Completion::MissingPlmnId;
        }
        Completion::Complete(key)
    };

    let mut completed = Vec::with_capacity(snapshot.len());
    for record in snapshot {
        match record {
            TopoRecord::Neighbors(key, list) => match complete_key(key) {
                Completion::Complete(key) => completed.push(TopoRecord::Neighbors(key, list)),
                Completion::MissingPlmnId => {
                    warn!("discarding neighbors record with no inferred PlmnID after backfill");
                }
                Completion::MissingIdentity => {
                    return Err(ControllerError::NotSupported(
                        "neighbors record missing CellObjID or CellID after backfill".to_string(),
                    ));
                }
            },
            TopoRecord::UeCount(key, measurement) => match complete_key(key) {
                Completion::Complete(key) => completed.push(TopoRecord::UeCount(key, measurement)),
                Completion::MissingPlmnId => {
                    warn!("discarding UE-count record with no inferred PlmnID after backfill");
                }
                Completion::MissingIdentity => {
                    return Err(ControllerError::NotSupported(
                        "UE-count record missing CellObjID or CellID after backfill".to_string(),
                    ));
                }
            },
        }
    }
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mlb_contracts::{Measurement, NeighborList};
    use std::sync::Mutex;

    struct FixedTopoSource {
        snapshots: Mutex<Vec<Snapshot>>,
    }

    #[async_trait]
    impl TopoSource for FixedTopoSource {
        async fn fetch_snapshot(
            &self,
            _token: CancellationToken,
        ) -> Result<Snapshot, ControllerError> {
            let mut snapshots = self.snapshots.lock().unwrap();
            Ok(snapshots.pop().unwrap_or_default())
        }
    }

    fn key(cell_id: &str) -> CellKey {
        CellKey::new("node1", "315010", cell_id, format!("obj-{cell_id}"))
    }

    fn monitor_with(snapshot: Snapshot) -> (Monitor, Arc<NeighborStore>, Arc<UeCountStore>, Arc<OcnStore>) {
        let neighbors = Arc::new(NeighborStore::new());
        let ue_counts = Arc::new(UeCountStore::new());
        let ocn = Arc::new(OcnStore::new());
        let source = Arc::new(FixedTopoSource {
            snapshots: Mutex::new(vec![snapshot]),
        });
        let monitor = Monitor::new(source, neighbors.clone(), ue_counts.clone(), ocn.clone());
        (monitor, neighbors, ue_counts, ocn)
    }

    #[tokio::test]
    async fn empty_snapshot_yields_empty_source() {
        let (monitor, ..) = monitor_with(vec![]);
        let result = monitor.run(CancellationToken::new()).await;
        assert!(matches!(result, Err(ControllerError::EmptySource)));
    }

    #[tokio::test]
    async fn neighbor_reconciliation_creates_zero_offset_row() {
        let a = key("a");
        let b = key("b");
        let list = NeighborList::new([b.clone()]);
        let (monitor, _neighbors, _ue_counts, ocn) =
            monitor_with(vec![TopoRecord::Neighbors(a.clone(), list)]);
        monitor.run(CancellationToken::new()).await.unwrap();
        assert_eq!(ocn.get_inner(&a, &b).unwrap().db(), 0);
    }

    #[tokio::test]
    async fn ue_count_is_recorded() {
        let a = key("a");
        let (monitor, _neighbors, ue_counts, _ocn) =
            monitor_with(vec![TopoRecord::UeCount(a.clone(), Measurement(5))]);
        monitor.run(CancellationToken::new()).await.unwrap();
        assert_eq!(ue_counts.get(&a).unwrap().value(), 5);
    }

    #[test]
    fn backfill_infers_plmn_id_from_neighbor_entry() {
        // Cell A has no inline PlmnID, but cell D's neighbor list names A
        // as a neighbor with PlmnID populated; that lets A's own record
        // (and its UE-count record) be completed.
        let a_in_d_neighbor_list = key("a");
        let d = CellKey::new("node1", "315010", "d", "obj-d");
        let a_serving = CellKey::new("node1", "", "a", "obj-a");
        let a_ue = CellKey::new("node1", "", "a", "obj-a");
        let result = backfill(vec![
            TopoRecord::Neighbors(d, NeighborList::new([a_in_d_neighbor_list])),
            TopoRecord::Neighbors(a_serving, NeighborList::new([])),
            TopoRecord::UeCount(a_ue, Measurement(1)),
        ])
        .unwrap();
        for record in result {
            match record {
                TopoRecord::Neighbors(k, _) | TopoRecord::UeCount(k, _) => {
                    if k.cell_id == "a" {
                        assert_eq!(k.plmn_id, "315010");
                    }
                }
            }
        }
    }

    #[test]
    fn backfill_discards_record_when_plmn_id_cannot_be_inferred() {
        let orphan = CellKey::new("node1", "", "z", "obj-z");
        let result = backfill(vec![TopoRecord::UeCount(orphan, Measurement(1))]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn backfill_fails_tick_when_identity_cannot_be_completed() {
        let orphan = CellKey::new("node1", "315010", "", "");
        let result = backfill(vec![TopoRecord::UeCount(orphan, Measurement(1))]);
        assert!(matches!(result, Err(ControllerError::NotSupported(_))));
    }

    #[test]
    fn backfill_fails_tick_when_neighbors_record_identity_cannot_be_completed() {
        let orphan = CellKey::new("node1", "315010", "", "");
        let result = backfill(vec![TopoRecord::Neighbors(orphan, NeighborList::new([]))]);
        assert!(matches!(result, Err(ControllerError::NotSupported(_))));
    }
}
