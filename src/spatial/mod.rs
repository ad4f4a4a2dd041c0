//! Spatial data structures and tile geometry
//!
//! This module contains spatial-related functionality including:
//! - The dihedral symmetry classes and direction transforms
//! - The output grid snapshot of resolved tiles

/// Output grid of resolved oriented-tile identifiers
pub mod grid;
/// Dihedral symmetry classes and neighbor directions
pub mod symmetry;

pub use grid::TileGrid;
pub use symmetry::{Direction, SymmetryClass};
