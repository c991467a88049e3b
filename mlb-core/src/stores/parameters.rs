use std::collections::HashMap;

use mlb_contracts::{ControllerError, ParameterName, Result};
use parking_lot::RwLock;

/// The flat string-to-int parameter registry.
///
/// Simpler than `KvStore`: no watchers, and `Update` behaves like `Put`
/// (the store always has all four recognized keys present after
/// construction, so "update on an absent key" cannot arise in practice —
/// see `Parameters::seeded`). `Get` of an absent key fails.
#[derive(Default)]
pub struct ParameterStore {
    values: RwLock<HashMap<String, i64>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a store pre-seeded with the four recognized keys, so
    /// that `Get` never observes "absent" after boot (§3 invariant).
    pub fn seeded(interval: i64, overload_threshold: i64, target_threshold: i64, delta_ocn: i64) -> Self {
        let store = Self::new();
        store.put(ParameterName::Interval, interval);
        store.put(ParameterName::OverloadThreshold, overload_threshold);
        store.put(ParameterName::TargetThreshold, target_threshold);
        store.put(ParameterName::DeltaOcn, delta_ocn);
        store
    }

    pub fn put(&self, name: ParameterName, value: i64) {
        self.values.write().insert(name.as_str().to_string(), value);
    }

    pub fn get(&self, name: ParameterName) -> Result<i64> {
        self.values
            .read()
            .get(name.as_str())
            .copied()
            .ok_or_else(|| ControllerError::NotFound(format!("parameter {name} not set")))
    }

    pub fn update(&self, name: ParameterName, value: i64) -> Result<()> {
        self.put(name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_all_four_keys() {
        let store = ParameterStore::seeded(10, 80, 20, 3);
        for name in ParameterName::ALL {
            assert!(store.get(name).is_ok());
        }
    }

    #[test]
    fn get_on_unseeded_key_is_not_found() {
        let store = ParameterStore::new();
        assert!(store.get(ParameterName::Interval).is_err());
    }

    #[test]
    fn update_overwrites_value() {
        let store = ParameterStore::seeded(10, 80, 20, 3);
        store.update(ParameterName::Interval, 5).unwrap();
        assert_eq!(store.get(ParameterName::Interval).unwrap(), 5);
    }
}
