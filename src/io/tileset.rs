//! Tile-set descriptions loaded from JSON
//!
//! A tile set names its tiles, their symmetry classes and weights, and the
//! neighbor pairs allowed between them. Bitmaps live next to the JSON file at
//! `<dir>/<path><name>.png`.

use crate::{
    algorithm::adjacency::{Axis, NeighborSpec, TileSpec},
    io::configuration::DEFAULT_TILE_SIZE,
    io::error::{ErrorContext, Result, WithContext, invalid_source},
};
use image::RgbaImage;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw tile-set document as stored on disk
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileSetFile {
    /// Bitmap directory prefix relative to the JSON file
    #[serde(default)]
    pub path: String,
    /// Edge length of every tile bitmap in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Declared tiles in id order
    pub tiles: Vec<RawTile>,
    /// Allowed neighbor pairs
    #[serde(default)]
    pub neighbors: Vec<RawNeighbor>,
}

/// Raw tile entry
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawTile {
    /// Tile name, also the bitmap file stem
    pub name: String,
    /// Symmetry class letter, empty meaning fully symmetric
    #[serde(default)]
    pub symmetry: String,
    /// Relative frequency, zero meaning the default of one
    #[serde(default)]
    pub weight: f64,
}

/// Raw neighbor entry
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawNeighbor {
    /// Left (or top) tile name
    pub left: String,
    /// Orientation applied to the left tile
    #[serde(default)]
    pub left_num: usize,
    /// Right (or bottom) tile name
    pub right: String,
    /// Orientation applied to the right tile
    #[serde(default)]
    pub right_num: usize,
    /// Pair layout
    #[serde(default)]
    pub axis: RawAxis,
}

/// Pair layout as spelled in JSON
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RawAxis {
    /// Left tile beside right tile
    #[default]
    Horizontal,
    /// Left tile above right tile
    Vertical,
}

const fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

impl From<RawAxis> for Axis {
    fn from(axis: RawAxis) -> Self {
        match axis {
            RawAxis::Horizontal => Self::Horizontal,
            RawAxis::Vertical => Self::Vertical,
        }
    }
}

impl TileSetFile {
    /// Parse a tile-set document from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid tile-set document.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a tile-set file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The contents are not a valid tile-set document
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(ErrorContext {
            path: Some(path),
            operation: Some("read tile set"),
        })?;
        Self::parse(&text).with_path(path)
    }

    /// Validated tile records in declaration order
    ///
    /// # Errors
    ///
    /// Returns an error if a symmetry class is unknown or a weight is negative
    /// or not finite.
    pub fn tile_specs(&self) -> Result<Vec<TileSpec>> {
        self.tiles
            .iter()
            .map(|tile| {
                let weight = (tile.weight.abs() > 0.0).then_some(tile.weight);
                TileSpec::new(tile.name.clone(), &tile.symmetry, weight)
            })
            .collect()
    }

    /// Neighbor declarations in file order
    pub fn neighbor_specs(&self) -> Vec<NeighborSpec> {
        self.neighbors
            .iter()
            .map(|neighbor| NeighborSpec {
                left: neighbor.left.clone(),
                left_variant: neighbor.left_num,
                right: neighbor.right.clone(),
                right_variant: neighbor.right_num,
                axis: neighbor.axis.into(),
            })
            .collect()
    }

    /// Location of a tile's bitmap relative to the tile-set directory
    pub fn bitmap_path(&self, directory: &Path, name: &str) -> PathBuf {
        directory.join(format!("{}{name}.png", self.path))
    }
}

/// Tile set with its decoded bitmaps
#[derive(Clone, Debug)]
pub struct TileSet {
    /// Parsed document
    pub file: TileSetFile,
    /// One bitmap per declared tile, in declaration order
    pub bitmaps: Vec<RgbaImage>,
}

impl TileSet {
    /// Load a tile-set file together with every tile bitmap
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The JSON file cannot be read or parsed
    /// - A bitmap cannot be decoded
    /// - A bitmap is not `tileSize` pixels square
    pub fn load(path: &Path) -> Result<Self> {
        let file = TileSetFile::from_path(path)?;
        let directory = path.parent().unwrap_or_else(|| Path::new("."));

        let mut bitmaps = Vec::with_capacity(file.tiles.len());
        for tile in &file.tiles {
            let bitmap_path = file.bitmap_path(directory, &tile.name);
            let bitmap = image::open(&bitmap_path)
                .with_path(&bitmap_path)?
                .to_rgba8();
            if bitmap.dimensions() != (file.tile_size, file.tile_size) {
                return Err(invalid_source(&format!(
                    "bitmap {} is {}x{}, expected {size}x{size}",
                    bitmap_path.display(),
                    bitmap.width(),
                    bitmap.height(),
                    size = file.tile_size
                )));
            }
            bitmaps.push(bitmap);
        }

        Ok(Self { file, bitmaps })
    }
}
