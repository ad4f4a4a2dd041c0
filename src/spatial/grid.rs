//! Output grid of resolved oriented-tile identifiers
//!
//! The grid is a snapshot: it owns its data and does not track the wave it was
//! taken from. Cells are indexed `[y, x]` to match image row order.

use ndarray::Array2;
use std::fmt;

/// Width × height snapshot of resolved oriented-tile ids
///
/// `None` marks a cell whose domain still holds several tiles, or none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    cells: Array2<Option<usize>>,
}

impl TileGrid {
    /// Create a grid with every cell unresolved
    pub fn unresolved(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), None),
        }
    }

    /// Create a grid from row-major cell values
    ///
    /// Returns `None` if the number of values does not match the dimensions.
    pub fn from_row_major(width: usize, height: usize, values: Vec<Option<usize>>) -> Option<Self> {
        Array2::from_shape_vec((height, width), values)
            .ok()
            .map(|cells| Self { cells })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Resolved oriented-tile id at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        self.cells.get([y, x]).copied().flatten()
    }

    /// Whether every cell holds exactly one tile
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of resolved cells
    pub fn resolved_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Underlying array, indexed `[y, x]`
    pub const fn cells(&self) -> &Array2<Option<usize>> {
        &self.cells
    }
}

/// One line per row, ids separated by spaces, `.` for unresolved cells
impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            let line = row
                .iter()
                .map(|cell| cell.map_or_else(|| ".".to_string(), |id| id.to_string()))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
