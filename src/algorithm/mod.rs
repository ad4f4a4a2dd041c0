/// Tile-set compilation into oriented tiles and directional compatibility
pub mod adjacency;
/// Efficient bitset implementation for cell domains and compatibility rows
pub mod bitset;
/// Model controller driving generation attempts and stepping
pub mod executor;
/// Support-counting constraint propagation
pub mod propagation;
/// Minimum-entropy cell selection and weighted collapse
pub mod selection;
/// Per-cell domains, entropy bookkeeping and support counters
pub mod wave;
