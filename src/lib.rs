//! Simple tiled wave function collapse
//!
//! Tiles are declared with a symmetry class and a weight, together with the
//! pairs of tiles allowed side by side. The rules are expanded under every
//! rotation and reflection of the square, then a grid is filled by repeatedly
//! collapsing the lowest-entropy cell and propagating the consequences until
//! every cell holds one oriented tile or some cell runs out of options.

#![forbid(unsafe_code)]

/// Core algorithm: rule compilation, wave state, propagation, selection and the model
pub mod algorithm;
/// Tile-set loading, rendering, command-line handling and error types
pub mod io;
/// Entropy and weighted sampling helpers
pub mod math;
/// Output grids and the square's symmetry group
pub mod spatial;

pub use algorithm::adjacency::{CompiledRules, NeighborSpec, TileSpec};
pub use algorithm::executor::{ModelState, SimpleTiledModel};
pub use io::error::{AlgorithmError, Result};
pub use spatial::grid::TileGrid;
