//! Domain types and the shared error taxonomy for the MLB controller
//! workspace: `CellKey`, `Offset`, `NeighborList`, `Measurement`,
//! `Parameters`, and `ControllerError`. No async, no I/O — every other
//! crate in the workspace depends on this one.

mod cell_key;
mod error;
mod measurement;
mod neighbor;
mod offset;
mod parameters;

pub use cell_key::CellKey;
pub use error::{ControllerError, Result};
pub use measurement::Measurement;
pub use neighbor::NeighborList;
pub use offset::Offset;
pub use parameters::{ParameterName, Parameters, SetParametersResult};
