use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a cell: `(NodeID, PlmnID, CellID, CellObjID)`.
///
/// All four components are opaque strings; equality is componentwise.
/// `CellObjID` is a per-node logical name, `CellID` is the global cell
/// identity — the monitor is responsible for populating all four before a
/// key reaches the stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub node_id: String,
    pub plmn_id: String,
    pub cell_id: String,
    pub cell_obj_id: String,
}

impl CellKey {
    pub fn new(
        node_id: impl Into<String>,
        plmn_id: impl Into<String>,
        cell_id: impl Into<String>,
        cell_obj_id: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            plmn_id: plmn_id.into(),
            cell_id: cell_id.into(),
            cell_obj_id: cell_obj_id.into(),
        }
    }

    /// True once every component has been populated by the monitor.
    pub fn is_complete(&self) -> bool {
        !self.node_id.is_empty()
            && !self.plmn_id.is_empty()
            && !self.cell_id.is_empty()
            && !self.cell_obj_id.is_empty()
    }
}

/// `"NodeID:PlmnID:CellID:CellObjID"` — the management API's wire form.
impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.node_id, self.plmn_id, self.cell_id, self.cell_obj_id
        )
    }
}
