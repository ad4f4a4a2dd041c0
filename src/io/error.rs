//! Error types and context management for model construction, generation and I/O

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all crate operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Failed to load a tile bitmap from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Tile-set description could not be parsed
    TileSetParse {
        /// Path of the tile-set file
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Source data doesn't meet model requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// A neighbor declaration references a tile that was never declared
    UnknownTile {
        /// The unresolved tile name
        name: String,
    },

    /// A symmetry string is not one of the recognized classes
    UnknownSymmetry {
        /// The rejected symmetry string
        symbol: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Tile index exceeds available tile set
    InvalidTileIndex {
        /// The invalid tile index
        index: usize,
        /// Number of valid tile indices
        max_tiles: usize,
    },

    /// A cell domain became empty during propagation
    Contradiction {
        /// Row-major index of the first emptied cell
        cell: usize,
        /// Cell coordinates (x, y)
        position: (usize, usize),
    },

    /// Some tile sets of a batch were not fully collapsed
    IncompleteGeneration {
        /// Tile sets left incomplete
        failures: usize,
        /// Tile sets processed
        total: usize,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::TileSetParse { path, source } => {
                write!(f, "Failed to parse tile set '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::UnknownTile { name } => {
                write!(f, "Neighbor rule references unknown tile '{name}'")
            }
            Self::UnknownSymmetry { symbol } => {
                write!(f, "Unrecognized symmetry class '{symbol}'")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(f, "Tile index {index} is out of bounds (max: {max_tiles})")
            }
            Self::Contradiction { cell, position } => {
                write!(
                    f,
                    "Contradiction: cell {cell} at ({}, {}) has no remaining tiles",
                    position.0, position.1
                )
            }
            Self::IncompleteGeneration { failures, total } => {
                write!(f, "{failures} of {total} tile sets could not be fully collapsed")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::TileSetParse { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext<'a> {
    /// File the failing operation was working on
    pub path: Option<&'a Path>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches errors converted through `From` with the path and operation involved
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext<'_>) -> Result<T>;

    /// Add just the path context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<AlgorithmError>,
{
    fn with_context(self, context: ErrorContext<'_>) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only file-backed errors carry a path worth replacing
            match &mut error {
                AlgorithmError::ImageLoad { path, .. }
                | AlgorithmError::ImageExport { path, .. }
                | AlgorithmError::TileSetParse { path, .. } => {
                    if let Some(context_path) = context.path {
                        *path = context_path.to_path_buf();
                    }
                }
                AlgorithmError::FileSystem {
                    path, operation, ..
                } => {
                    if let Some(context_path) = context.path {
                        *path = context_path.to_path_buf();
                    }
                    if let Some(context_operation) = context.operation {
                        *operation = context_operation;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_path(self, path: &Path) -> Result<T> {
        self.with_context(ErrorContext {
            path: Some(path),
            ..Default::default()
        })
    }
}

impl From<image::ImageError> for AlgorithmError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for AlgorithmError {
    fn from(err: serde_json::Error) -> Self {
        Self::TileSetParse {
            path: PathBuf::from("<inline>"),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid source data error
pub fn invalid_source(reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::InvalidSourceData {
        reason: reason.to_string(),
    }
}
