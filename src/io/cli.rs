//! Command-line interface for batch generation from tile-set JSON files

use crate::algorithm::adjacency::CompiledRules;
use crate::algorithm::executor::SimpleTiledModel;
use crate::io::configuration::{
    DEFAULT_HEIGHT, DEFAULT_SEED, DEFAULT_WIDTH, OUTPUT_SUFFIX, TILESET_EXTENSION,
};
use crate::io::error::{AlgorithmError, Result, invalid_parameter, invalid_source};
use crate::io::image::{TileAtlas, export_png};
use crate::io::progress::ProgressManager;
use crate::io::tileset::TileSet;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "simpletiled")]
#[command(
    author,
    version,
    about = "Generate tiled images with simple tiled wave function collapse"
)]
/// Command-line arguments for the tile generation tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Tile-set JSON file or directory of tile sets to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Output width in tiles
    #[arg(short = 'w', long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Output height in tiles
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Wrap the grid so opposite edges are neighbors
    #[arg(long)]
    pub periodic: bool,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Collapse at most this many cells without restarting, rendering the partial wave
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Output PNG path (single tile set only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Orchestrates batch processing of tile sets with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// Returns the number of tile sets that could not be fully collapsed;
    /// their partial results are still written.
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, tile-set loading or output
    /// export fails
    pub fn process(&mut self) -> Result<usize> {
        let files = self.collect_files()?;
        self.process_batch(&files)
    }

    /// Process files and fail if any tile set was left incomplete
    ///
    /// # Errors
    ///
    /// Returns an error if processing fails or any tile set could not be fully
    /// collapsed
    pub fn run(&mut self) -> Result<()> {
        let files = self.collect_files()?;
        let failures = self.process_batch(&files)?;
        if failures > 0 {
            return Err(AlgorithmError::IncompleteGeneration {
                failures,
                total: files.len(),
            });
        }
        Ok(())
    }

    fn process_batch(&mut self, files: &[PathBuf]) -> Result<usize> {
        if files.is_empty() {
            return Ok(0);
        }
        if self.cli.output.is_some() && files.len() > 1 {
            return Err(invalid_parameter(
                "output",
                &self.cli.target.display(),
                &"an explicit output path needs a single tile-set file",
            ));
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut failures = 0;
        for (index, file) in files.iter().enumerate() {
            if !self.process_file(file, index)? {
                failures += 1;
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(failures)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_tileset(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_source(&"Target file must be a tile-set JSON file"))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_tileset(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_source(
                &"Target must be a tile-set JSON file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    // Allow print for user feedback on contradictions
    #[allow(clippy::print_stderr)]
    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<bool> {
        let start_time = Instant::now();
        let output_path = self.output_path(input_path);

        let tileset = TileSet::load(input_path)?;
        let rules = Arc::new(CompiledRules::compile(
            tileset.file.tile_specs()?,
            &tileset.file.neighbor_specs(),
        )?);
        let atlas = TileAtlas::new(tileset.file.tile_size, &tileset.bitmaps, &rules)?;

        let mut model = SimpleTiledModel::from_rules(
            Arc::clone(&rules),
            self.cli.width,
            self.cli.height,
            self.cli.periodic,
        )?;
        model.set_seed(self.cli.seed);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, self.cli.width * self.cli.height);
        }

        let success = if let Some(steps) = self.cli.iterations {
            let (_, finished, error) = model.iterate(steps);
            if let Some(error) = error {
                if !self.cli.quiet {
                    eprintln!("{}: {error}", input_path.display());
                }
            }
            finished
        } else {
            let progress = &mut self.progress_manager;
            let (_, success) = model.generate_with_progress(|report| {
                if let Some(pm) = progress.as_mut() {
                    pm.update_cells(index, report.decided);
                }
            });
            if !success && !self.cli.quiet {
                eprintln!(
                    "{}: every attempt ended in a contradiction",
                    input_path.display()
                );
            }
            success
        };

        let image = model
            .wave()
            .map_or_else(|| atlas.render_grid(&model.grid()), |wave| atlas.render(wave));
        export_png(&image, &output_path)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, success, start_time.elapsed());
        }

        Ok(success)
    }

    fn output_path(&self, input_path: &Path) -> PathBuf {
        if let Some(output) = &self.cli.output {
            return output.clone();
        }
        Self::get_output_path(input_path)
    }

    fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{}.png", stem.to_string_lossy(), OUTPUT_SUFFIX);

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}

fn is_tileset(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(TILESET_EXTENSION)
}
