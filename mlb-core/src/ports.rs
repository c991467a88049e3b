//! The two external collaborator contracts: `TopoSource` supplies
//! topology/measurement snapshots, `OffsetSink` accepts outbound offset
//! updates. Concrete adapters live in `mlb-server`; this crate only
//! depends on the trait.

use async_trait::async_trait;
use mlb_contracts::{CellKey, ControllerError, Measurement, NeighborList, Offset};
use tokio_util::sync::CancellationToken;

/// One record from a TopoSource snapshot. CellKey fields may arrive
/// partially populated (e.g. neighbor entries carrying only `PlmnID` and
/// `CellID`) — the monitor backfills before writing to the stores.
#[derive(Debug, Clone)]
pub enum TopoRecord {
    Neighbors(CellKey, NeighborList),
    UeCount(CellKey, Measurement),
}

/// A full pull from TopoSource: an unordered list of records.
pub type Snapshot = Vec<TopoRecord>;

/// Supplies topology and UE-count snapshots. Out of scope per the spec's
/// §1 "Out of scope" list — `mlb-server` wires a concrete HTTP adapter.
#[async_trait]
pub trait TopoSource: Send + Sync {
    async fn fetch_snapshot(&self, token: CancellationToken) -> Result<Snapshot, ControllerError>;
}

/// Accepts outbound (cell, node, offset) updates. The core does not
/// interpret the returned outcome beyond success/failure (§6).
#[async_trait]
pub trait OffsetSink: Send + Sync {
    async fn emit(
        &self,
        target: &CellKey,
        serving_node_id: &str,
        offset: Offset,
        token: CancellationToken,
    ) -> Result<(), ControllerError>;
}
