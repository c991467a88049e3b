use serde::{Deserialize, Serialize};

use crate::cell_key::CellKey;

/// An ordered sequence of neighbor `CellKey`s attached to a serving cell.
///
/// Order is whatever the source supplied; the controller does not depend
/// on it, but neighbor processing within a cell follows this order
/// (§4.3, "Ordering guarantees"). Duplicates are dropped on construction,
/// keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborList(Vec<CellKey>);

impl NeighborList {
    pub fn new(neighbors: impl IntoIterator<Item = CellKey>) -> Self {
        let mut seen = Vec::new();
        for neighbor in neighbors {
            if !seen.contains(&neighbor) {
                seen.push(neighbor);
            }
        }
        Self(seen)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellKey> {
        self.0.iter()
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[CellKey] {
        &self.0
    }
}

impl FromIterator<CellKey> for NeighborList {
    fn from_iter<T: IntoIterator<Item = CellKey>>(iter: T) -> Self {
        NeighborList::new(iter)
    }
}

impl IntoIterator for NeighborList {
    type Item = CellKey;
    type IntoIter = std::vec::IntoIter<CellKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: &str) -> CellKey {
        CellKey::new("node1", "plmn1", n, "obj1")
    }

    #[test]
    fn construction_drops_duplicates_preserving_first_order() {
        let list = NeighborList::new([key("a"), key("b"), key("a"), key("c")]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_slice(), &[key("a"), key("b"), key("c")]);
    }
}
