//! Model constants and runtime configuration defaults

/// Number of fresh waves `generate` tries before reporting failure
pub const MAX_ATTEMPTS: usize = 10;

/// Scale of the random noise that breaks entropy ties between cells
pub const ENTROPY_NOISE: f64 = 1e-6;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Largest orientation index a neighbor declaration may reference
pub const MAX_VARIANT_INDEX: usize = 7;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default output width in cells
pub const DEFAULT_WIDTH: usize = 20;

/// Default output height in cells
pub const DEFAULT_HEIGHT: usize = 20;

/// Edge length of tile bitmaps when the tile set does not specify one
pub const DEFAULT_TILE_SIZE: u32 = 16;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Extension of tile-set description files
pub const TILESET_EXTENSION: &str = "json";
