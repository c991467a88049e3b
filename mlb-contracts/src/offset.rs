use serde::{Deserialize, Serialize, Serializer};

/// The standardized Q-offset range enumeration, in dB, ascending.
///
/// `ZERO_INDEX` names the position of the 0 dB entry, the Ocn default.
const DB_VALUES: [i32; 31] = [
    -24, -22, -20, -18, -16, -14, -12, -10, -8, -6, -5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5, 6, 8, 10,
    12, 14, 16, 18, 20, 22, 24,
];
const ZERO_INDEX: u8 = 15;

/// A quantized handover-bias offset, drawn from the fixed Q-offset
/// enumeration (-24 dB to +24 dB). Stored as an ordinal index into
/// [`DB_VALUES`] rather than a raw dB value, because §4.3 arithmetic is
/// defined in step counts over the enumeration, not dB deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i32")]
pub struct Offset(u8);

impl Offset {
    pub const ZERO: Offset = Offset(ZERO_INDEX);
    pub const MIN: Offset = Offset(0);
    pub const MAX: Offset = Offset(DB_VALUES.len() as u8 - 1);

    /// Looks up the enumeration entry matching an exact dB value.
    pub fn from_db(db: i32) -> Option<Self> {
        DB_VALUES
            .iter()
            .position(|&v| v == db)
            .map(|idx| Offset(idx as u8))
    }

    pub fn db(self) -> i32 {
        DB_VALUES[self.0 as usize]
    }

    /// Shifts by `steps` positions within the enumeration, saturating at
    /// either endpoint. Positive `steps` moves toward +24 dB.
    pub fn shift(self, steps: i32) -> Self {
        let idx = self.0 as i32 + steps;
        let clamped = idx.clamp(0, DB_VALUES.len() as i32 - 1);
        Offset(clamped as u8)
    }

    pub fn increment(self, steps: u32) -> Self {
        self.shift(steps as i32)
    }

    pub fn decrement(self, steps: u32) -> Self {
        self.shift(-(steps as i32))
    }
}

impl Default for Offset {
    fn default() -> Self {
        Offset::ZERO
    }
}

impl TryFrom<i32> for Offset {
    type Error = String;

    fn try_from(db: i32) -> Result<Self, Self::Error> {
        Offset::from_db(db).ok_or_else(|| format!("{db} is not a valid Q-offset value"))
    }
}

/// Serializes as the plain signed dB integer, per the management API's
/// `GetOcn` contract.
impl Serialize for Offset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.db())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero_db() {
        assert_eq!(Offset::ZERO.db(), 0);
    }

    #[test]
    fn decrement_saturates_at_minus_24() {
        let mut o = Offset::ZERO;
        for _ in 0..20 {
            o = o.decrement(3);
        }
        assert_eq!(o.db(), -24);
    }

    #[test]
    fn increment_saturates_at_plus_24() {
        let mut o = Offset::ZERO;
        for _ in 0..20 {
            o = o.increment(3);
        }
        assert_eq!(o.db(), 24);
    }

    #[test]
    fn n_decrements_then_n_increments_returns_to_start() {
        let mut o = Offset::ZERO;
        for _ in 0..4 {
            o = o.decrement(2);
        }
        for _ in 0..4 {
            o = o.increment(2);
        }
        assert_eq!(o.db(), 0);
    }

    #[test]
    fn from_db_rejects_unlisted_values() {
        assert!(Offset::from_db(-23).is_none());
        assert!(Offset::from_db(7).is_none());
        assert_eq!(Offset::from_db(-5).unwrap().db(), -5);
    }
}
