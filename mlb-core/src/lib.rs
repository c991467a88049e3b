//! The MLB closed control loop: stores, monitor, controller and manager.
//!
//! Data flow per tick: TopoSource -> Monitor -> (UE-count store, neighbor
//! store, Ocn store reconciliation) -> Controller -> OffsetSink + Ocn
//! store update. The management API reads from the stores via `Manager`.

pub mod controller;
pub mod manager;
pub mod monitor;
pub mod ports;
pub mod stores;

pub use controller::Controller;
pub use manager::{BootParameters, Manager};
pub use monitor::Monitor;
pub use ports::{OffsetSink, Snapshot, TopoRecord, TopoSource};
