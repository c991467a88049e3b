use serde::{Deserialize, Serialize};

/// An integer UE (user-equipment) count attached to a `CellKey`. Always
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Measurement(pub u32);

impl Measurement {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Measurement {
    fn from(value: u32) -> Self {
        Measurement(value)
    }
}
