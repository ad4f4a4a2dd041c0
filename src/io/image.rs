//! Rendering of waves and grids into tile bitmaps, and PNG export

use crate::{
    algorithm::adjacency::CompiledRules,
    algorithm::wave::Wave,
    io::error::{AlgorithmError, Result, invalid_source},
    spatial::grid::TileGrid,
};
use image::{Rgba, RgbaImage, imageops};
use std::path::Path;

/// Bitmap for every oriented tile of a compiled tile set
#[derive(Clone, Debug)]
pub struct TileAtlas {
    tile_size: u32,
    bitmaps: Vec<RgbaImage>,
}

impl TileAtlas {
    /// Build oriented bitmaps by rotating and mirroring each declared tile
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The number of bitmaps differs from the number of declared tiles
    /// - A bitmap is not `tile_size` pixels square
    pub fn new(tile_size: u32, bitmaps: &[RgbaImage], rules: &CompiledRules) -> Result<Self> {
        if bitmaps.len() != rules.tiles().len() {
            return Err(invalid_source(&format!(
                "{} bitmaps supplied for {} tiles",
                bitmaps.len(),
                rules.tiles().len()
            )));
        }
        if let Some(bad) = bitmaps
            .iter()
            .position(|bitmap| bitmap.dimensions() != (tile_size, tile_size))
        {
            return Err(invalid_source(&format!(
                "bitmap for tile {bad} is not {tile_size}x{tile_size}"
            )));
        }

        let mut oriented = Vec::with_capacity(rules.oriented_count());
        for tile in rules.oriented_tiles() {
            let base = bitmaps
                .get(tile.tile)
                .ok_or(AlgorithmError::InvalidTileIndex {
                    index: tile.tile,
                    max_tiles: bitmaps.len(),
                })?;
            oriented.push(orient_bitmap(base, tile.orientation));
        }

        Ok(Self {
            tile_size,
            bitmaps: oriented,
        })
    }

    /// Edge length of each tile bitmap in pixels
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Bitmap of an oriented tile id
    pub fn bitmap(&self, id: usize) -> Option<&RgbaImage> {
        self.bitmaps.get(id)
    }

    /// Render the wave, blending undecided cells
    ///
    /// Decided cells show their tile bitmap. Undecided cells show the
    /// weight-averaged colour of the tiles they may still hold. Empty cells
    /// stay transparent.
    pub fn render(&self, wave: &Wave) -> RgbaImage {
        let rules = wave.rules();
        let mut output = self.canvas(wave.width(), wave.height());

        for cell in 0..wave.cell_count() {
            let (x, y) = wave.position(cell);
            if let Some(tile) = wave.observed(cell) {
                self.blit(&mut output, x, y, tile);
                continue;
            }
            let Some(domain) = wave.domain(cell) else {
                continue;
            };
            let weight_sum = wave.weight_sum(cell);
            if domain.is_empty() || weight_sum <= 0.0 {
                continue;
            }

            let candidates: Vec<(&RgbaImage, f64)> = domain
                .iter()
                .filter_map(|id| self.bitmaps.get(id).map(|bitmap| (bitmap, rules.weight(id))))
                .collect();
            for py in 0..self.tile_size {
                for px in 0..self.tile_size {
                    let mut channels = [0.0_f64; 4];
                    for (bitmap, weight) in &candidates {
                        let Rgba(pixel) = bitmap.get_pixel(px, py);
                        for (sum, &value) in channels.iter_mut().zip(pixel) {
                            *sum += f64::from(value) * weight;
                        }
                    }
                    let blended =
                        channels.map(|sum| (sum / weight_sum).round().clamp(0.0, 255.0) as u8);
                    self.put(&mut output, x, y, px, py, Rgba(blended));
                }
            }
        }

        output
    }

    /// Render a grid snapshot, unresolved cells transparent
    pub fn render_grid(&self, grid: &TileGrid) -> RgbaImage {
        let mut output = self.canvas(grid.width(), grid.height());
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if let Some(tile) = grid.get(x, y) {
                    self.blit(&mut output, x, y, tile);
                }
            }
        }
        output
    }

    fn canvas(&self, width: usize, height: usize) -> RgbaImage {
        RgbaImage::new(width as u32 * self.tile_size, height as u32 * self.tile_size)
    }

    fn blit(&self, output: &mut RgbaImage, x: usize, y: usize, tile: usize) {
        if let Some(bitmap) = self.bitmaps.get(tile) {
            imageops::replace(
                output,
                bitmap,
                i64::from(x as u32 * self.tile_size),
                i64::from(y as u32 * self.tile_size),
            );
        }
    }

    fn put(&self, output: &mut RgbaImage, x: usize, y: usize, px: u32, py: u32, color: Rgba<u8>) {
        let ox = x as u32 * self.tile_size + px;
        let oy = y as u32 * self.tile_size + py;
        if ox < output.width() && oy < output.height() {
            output.put_pixel(ox, oy, color);
        }
    }
}

/// Apply an orientation index to a base bitmap
///
/// Orientation `k < 4` rotates `k` quarter turns counter-clockwise, `4 + k`
/// additionally mirrors horizontally.
pub fn orient_bitmap(base: &RgbaImage, orientation: usize) -> RgbaImage {
    let mut bitmap = base.clone();
    for _ in 0..orientation % 4 {
        bitmap = imageops::rotate270(&bitmap);
    }
    if orientation >= 4 {
        bitmap = imageops::flip_horizontal(&bitmap);
    }
    bitmap
}

/// Save an image as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_png(image: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    image
        .save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
