use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset over the dense oriented-tile id space
///
/// Uses 0-based indexing matching the ids assigned by the adjacency compiler.
/// Provides O(1) membership testing and efficient set operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBitset {
    bits: BitVec,
    max_tiles: usize,
}

impl TileBitset {
    /// Create a bitset with no tiles present
    pub fn new(max_tiles: usize) -> Self {
        Self {
            bits: bitvec![0; max_tiles],
            max_tiles,
        }
    }

    /// Create a bitset containing all possible tiles
    pub fn all(max_tiles: usize) -> Self {
        Self {
            bits: bitvec![1; max_tiles],
            max_tiles,
        }
    }

    /// Insert a tile id; ids outside the capacity are ignored
    pub fn insert(&mut self, tile: usize) {
        if tile < self.max_tiles {
            self.bits.set(tile, true);
        }
    }

    /// Remove a tile id, returning whether it was present
    pub fn remove(&mut self, tile: usize) -> bool {
        if self.contains(tile) {
            self.bits.set(tile, false);
            true
        } else {
            false
        }
    }

    /// Test tile membership
    pub fn contains(&self, tile: usize) -> bool {
        self.bits.get(tile).as_deref() == Some(&true)
    }

    /// Test whether the two sets share at least one tile
    pub fn intersects(&self, other: &Self) -> bool {
        self.bits
            .iter_ones()
            .any(|index| other.bits.get(index).as_deref() == Some(&true))
    }

    /// Intersect this bitset with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Create a new bitset containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Capacity of the id space
    pub const fn capacity(&self) -> usize {
        self.max_tiles
    }

    /// Lowest tile id in the set
    pub fn first(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Iterate tile ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all tile ids as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileBitset({} tiles: {:?})", self.count(), self.to_vec())
    }
}
