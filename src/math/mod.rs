//! Mathematical utilities for the model

/// Entropy bookkeeping and weighted sampling
pub mod probability;
