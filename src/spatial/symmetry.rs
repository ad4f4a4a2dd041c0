//! Dihedral symmetry classes of square tiles
//!
//! A tile's symmetry class decides how many distinct orientations it has under
//! the eight rotations and reflections of the square, and how those group
//! elements permute its orientation indices. Orientation `k < 4` is the base
//! bitmap rotated `k` quarter turns counter-clockwise, orientation `4 + k` is
//! that rotation followed by a horizontal mirror.

use crate::io::error::{AlgorithmError, Result};
use std::fmt;
use std::str::FromStr;

/// Number of elements in the dihedral group of the square
pub const GROUP_ORDER: usize = 8;

/// Orbit type of a tile under the square's rotation/reflection group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymmetryClass {
    /// Fully symmetric, one orientation
    X,
    /// Mirror symmetric about both axes, two orientations
    I,
    /// Symmetric about one diagonal, two orientations
    Backslash,
    /// Mirror symmetric about one axis, four orientations
    T,
    /// Symmetric about one diagonal, four orientations
    L,
    /// No symmetry, eight orientations
    F,
}

impl SymmetryClass {
    /// All recognized classes
    pub const ALL: [Self; 6] = [Self::X, Self::I, Self::Backslash, Self::T, Self::L, Self::F];

    /// Parse a symmetry string; the empty string means [`SymmetryClass::X`]
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::UnknownSymmetry`] for any other unrecognized string
    pub fn parse(symbol: &str) -> Result<Self> {
        match symbol {
            "" | "X" => Ok(Self::X),
            "I" => Ok(Self::I),
            "\\" => Ok(Self::Backslash),
            "T" => Ok(Self::T),
            "L" => Ok(Self::L),
            "F" => Ok(Self::F),
            other => Err(AlgorithmError::UnknownSymmetry {
                symbol: other.to_string(),
            }),
        }
    }

    /// Canonical symbol of the class
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::I => "I",
            Self::Backslash => "\\",
            Self::T => "T",
            Self::L => "L",
            Self::F => "F",
        }
    }

    /// Number of distinct orientations
    pub const fn cardinality(self) -> usize {
        match self {
            Self::X => 1,
            Self::I | Self::Backslash => 2,
            Self::T | Self::L => 4,
            Self::F => 8,
        }
    }

    /// Orientation reached by one counter-clockwise quarter turn
    pub const fn rotate(self, orientation: usize) -> usize {
        match self {
            Self::X => orientation,
            Self::I | Self::Backslash => (orientation + 1) % 2,
            Self::T | Self::L => (orientation + 1) % 4,
            Self::F => {
                if orientation < 4 {
                    (orientation + 1) % 4
                } else {
                    4 + (orientation + 3) % 4
                }
            }
        }
    }

    /// Orientation reached by a horizontal mirror
    pub const fn reflect(self, orientation: usize) -> usize {
        match self {
            Self::X | Self::I => orientation,
            Self::Backslash => (orientation + 1) % 2,
            Self::T => {
                if orientation % 2 == 0 {
                    orientation
                } else {
                    4 - orientation
                }
            }
            Self::L => {
                if orientation % 2 == 0 {
                    orientation + 1
                } else {
                    orientation - 1
                }
            }
            Self::F => {
                if orientation < 4 {
                    orientation + 4
                } else {
                    orientation - 4
                }
            }
        }
    }

    /// Images of one orientation under every group element
    ///
    /// Element `k < 4` is `k` counter-clockwise quarter turns, element `4 + k`
    /// is the same rotation followed by a horizontal mirror.
    pub fn orbit(self, orientation: usize) -> [usize; GROUP_ORDER] {
        std::array::from_fn(|element| {
            let rotated = (0..element % 4).fold(orientation, |current, _| self.rotate(current));
            if element >= 4 {
                self.reflect(rotated)
            } else {
                rotated
            }
        })
    }
}

impl FromStr for SymmetryClass {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SymmetryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Cardinal neighbor direction in image coordinates (y grows downwards)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Negative x
    Left,
    /// Positive y
    Down,
    /// Positive x
    Right,
    /// Negative y
    Up,
}

impl Direction {
    /// Number of neighbor directions on a square grid
    pub const COUNT: usize = 4;

    /// All directions in index order
    pub const ALL: [Self; Self::COUNT] = [Self::Left, Self::Down, Self::Right, Self::Up];

    /// Dense index used for per-direction tables
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Down => 1,
            Self::Right => 2,
            Self::Up => 3,
        }
    }

    /// Direction for an index, taken modulo [`Direction::COUNT`]
    pub const fn from_index(index: usize) -> Self {
        match index % Self::COUNT {
            0 => Self::Left,
            1 => Self::Down,
            2 => Self::Right,
            _ => Self::Up,
        }
    }

    /// Coordinate offset `(dx, dy)` of the neighbor in this direction
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
        }
    }

    /// Direction pointing back from the neighbor
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Direction after a counter-clockwise quarter turn
    pub const fn rotated(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Direction after a horizontal mirror
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            other => other,
        }
    }

    /// Direction under a group element, see [`SymmetryClass::orbit`]
    pub const fn transformed(self, element: usize) -> Self {
        let rotated = Self::from_index(self.index() + element % 4);
        if element % GROUP_ORDER >= 4 {
            rotated.mirrored()
        } else {
            rotated
        }
    }
}
