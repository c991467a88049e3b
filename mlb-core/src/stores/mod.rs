//! The three concurrent indexes (UE-count, neighbor, Ocn matrix) plus the
//! parameter registry. No policy lives here — only atomicity, watchers,
//! and lazy enumeration.

mod kv;
mod ocn;
mod parameters;
mod watch;

pub use kv::KvStore;
pub use ocn::{OcnEntry, OcnStore};
pub use parameters::ParameterStore;
pub use watch::{StoreEvent, WatchHandle, WatcherRegistry};

use mlb_contracts::{CellKey, Measurement, NeighborList};

/// The UE-count store: serving `CellKey` -> current `Measurement`.
pub type UeCountStore = KvStore<CellKey, Measurement>;

/// The neighbor store: serving `CellKey` -> its `NeighborList`.
pub type NeighborStore = KvStore<CellKey, NeighborList>;
