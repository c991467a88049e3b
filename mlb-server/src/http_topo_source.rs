use async_trait::async_trait;
use mlb_contracts::{CellKey, ControllerError, Measurement, NeighborList};
use mlb_core::ports::{Snapshot, TopoRecord, TopoSource};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Wire shape of a single TopoSource record, as served by the
/// topology/measurement collaborator's `/topology` endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WireRecord {
    Neighbors {
        cell: WireCellKey,
        neighbors: Vec<WireCellKey>,
    },
    UeCount {
        cell: WireCellKey,
        count: u32,
    },
}

#[derive(Debug, Deserialize)]
struct WireCellKey {
    #[serde(default)]
    node_id: String,
    #[serde(default)]
    plmn_id: String,
    #[serde(default)]
    cell_id: String,
    #[serde(default)]
    cell_obj_id: String,
}

impl From<WireCellKey> for CellKey {
    fn from(wire: WireCellKey) -> Self {
        CellKey::new(wire.node_id, wire.plmn_id, wire.cell_id, wire.cell_obj_id)
    }
}

/// A `TopoSource` adapter that polls a topology/measurement collaborator
/// over HTTP, per §6's "TopoSource endpoint" boot configuration.
pub struct HttpTopoSource {
    client: reqwest::Client,
    endpoint_url: String,
}

impl HttpTopoSource {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint_url: format!("https://{endpoint}/topology"),
        }
    }
}

#[async_trait]
impl TopoSource for HttpTopoSource {
    async fn fetch_snapshot(&self, token: CancellationToken) -> Result<Snapshot, ControllerError> {
        let request = self.client.get(&self.endpoint_url).send();
        let response = tokio::select! {
            result = request => result,
            _ = token.cancelled() => return Err(ControllerError::Cancelled),
        }
        .map_err(|e| ControllerError::Unavailable(format!("TopoSource request failed: {e}")))?;

        let records: Vec<WireRecord> = response
            .json()
            .await
            .map_err(|e| ControllerError::Unavailable(format!("TopoSource response invalid: {e}")))?;

        let mut snapshot = Snapshot::with_capacity(records.len());
        for record in records {
            match record {
                WireRecord::Neighbors { cell, neighbors } => {
                    let list = NeighborList::new(neighbors.into_iter().map(CellKey::from));
                    snapshot.push(TopoRecord::Neighbors(cell.into(), list));
                }
                WireRecord::UeCount { cell, count } => {
                    snapshot.push(TopoRecord::UeCount(cell.into(), Measurement(count)));
                }
            }
        }

        if snapshot.is_empty() {
            warn!("TopoSource returned zero records");
        }
        Ok(snapshot)
    }
}
