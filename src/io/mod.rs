//! Input/output: tile-set files, rendering, the command line and errors

/// Command-line interface and batch file processing
pub mod cli;
/// Model constants and runtime configuration defaults
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Tile bitmap rendering and PNG export
pub mod image;
/// Progress bars for batch runs
pub mod progress;
/// Tile-set JSON loading
pub mod tileset;
