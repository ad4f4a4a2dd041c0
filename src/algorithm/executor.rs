use crate::{
    algorithm::adjacency::{CompiledRules, NeighborSpec, TileSpec},
    algorithm::selection::{RandomSelector, Selection, collapse, select_next},
    algorithm::wave::Wave,
    io::configuration::{DEFAULT_SEED, MAX_ATTEMPTS, MAX_GRID_DIMENSION},
    io::error::{AlgorithmError, Result, invalid_parameter},
    spatial::grid::TileGrid,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Lifecycle of the live wave held by a model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    /// No wave has been built yet, or it was cleared
    Uninitialized,
    /// A wave exists and still has undecided cells
    Running,
    /// Every cell holds exactly one tile
    Completed,
    /// Some cell ran out of tiles
    Contradiction,
}

/// Snapshot reported after every collapse of [`SimpleTiledModel::generate_with_progress`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationProgress {
    /// One-based attempt number
    pub attempt: usize,
    /// Cells holding exactly one tile
    pub decided: usize,
    /// Cells in the grid
    pub total: usize,
}

/// Simple tiled wave function collapse over a fixed-size grid
///
/// Owns the compiled rules, one live wave and the random stream. The whole
/// output is a function of the rules, dimensions, periodicity and seed.
#[derive(Clone, Debug)]
pub struct SimpleTiledModel {
    rules: Arc<CompiledRules>,
    width: usize,
    height: usize,
    periodic: bool,
    seed: u64,
    random_selector: RandomSelector,
    wave: Option<Wave>,
    state: ModelState,
}

impl SimpleTiledModel {
    /// Compile the tile set and create a model
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tile or neighbor declarations fail to compile
    /// - Either dimension is zero or exceeds the supported maximum
    pub fn new(
        tiles: Vec<TileSpec>,
        neighbors: &[NeighborSpec],
        width: usize,
        height: usize,
        periodic: bool,
    ) -> Result<Self> {
        let rules = CompiledRules::compile(tiles, neighbors)?;
        Self::from_rules(Arc::new(rules), width, height, periodic)
    }

    /// Create a model sharing already compiled rules
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds the supported
    /// maximum.
    pub fn from_rules(
        rules: Arc<CompiledRules>,
        width: usize,
        height: usize,
        periodic: bool,
    ) -> Result<Self> {
        validate_dimension("width", width)?;
        validate_dimension("height", height)?;

        Ok(Self {
            rules,
            width,
            height,
            periodic,
            seed: DEFAULT_SEED,
            random_selector: RandomSelector::new(DEFAULT_SEED),
            wave: None,
            state: ModelState::Uninitialized,
        })
    }

    /// Reset the random stream to a seed
    ///
    /// The live wave is left untouched, so later steps of a running
    /// generation continue from the new stream.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.random_selector.reseed(seed);
    }

    /// Run a full generation with restarts
    ///
    /// Returns the grid and whether it is fully collapsed. After
    /// [`MAX_ATTEMPTS`] failed attempts the last contradictory grid is
    /// returned with `false`.
    pub fn generate(&mut self) -> (TileGrid, bool) {
        self.generate_with_progress(|_| {})
    }

    /// Run [`SimpleTiledModel::generate`] reporting progress after each collapse
    pub fn generate_with_progress<F>(&mut self, mut on_progress: F) -> (TileGrid, bool)
    where
        F: FnMut(GenerationProgress),
    {
        self.random_selector.reseed(self.seed);
        let total = self.cell_count();

        for attempt in 1..=MAX_ATTEMPTS {
            let mut wave = self.fresh_wave();

            let outcome = loop {
                match select_next(&wave, &mut self.random_selector) {
                    Selection::Cell(cell) => {
                        collapse(&mut wave, cell, &mut self.random_selector);
                        on_progress(GenerationProgress {
                            attempt,
                            decided: wave.decided_count(),
                            total,
                        });
                    }
                    other => break other,
                }
            };

            let grid = wave.to_grid();
            self.wave = Some(wave);

            match outcome {
                Selection::Contradiction(cell) => {
                    debug!(
                        "Attempt {attempt}/{MAX_ATTEMPTS} hit a contradiction at cell {cell}, restarting"
                    );
                    self.state = ModelState::Contradiction;
                    if attempt == MAX_ATTEMPTS {
                        warn!(
                            "Generation failed: all {MAX_ATTEMPTS} attempts ended in contradiction"
                        );
                        return (grid, false);
                    }
                }
                Selection::Complete | Selection::Cell(_) => {
                    info!(
                        "Generated {}x{} grid on attempt {attempt}",
                        self.width, self.height
                    );
                    self.state = ModelState::Completed;
                    return (grid, true);
                }
            }
        }

        (self.grid(), false)
    }

    /// Advance the live wave by up to `steps` collapses
    ///
    /// Builds the wave on first use and never retries. Returns the current
    /// grid, whether it is fully collapsed, and a contradiction error when
    /// the contradiction arose during this call, wave construction included.
    /// A wave that was already contradictory or completed is left unchanged
    /// and reported without an error.
    pub fn iterate(&mut self, steps: usize) -> (TileGrid, bool, Option<AlgorithmError>) {
        if self.wave.is_none() {
            self.wave = Some(self.fresh_wave());
            self.state = ModelState::Running;
        } else if self.state == ModelState::Contradiction {
            return (self.grid(), false, None);
        }
        let Some(wave) = self.wave.as_mut() else {
            return (TileGrid::unresolved(self.width, self.height), false, None);
        };

        for _ in 0..steps {
            let Selection::Cell(cell) = select_next(wave, &mut self.random_selector) else {
                break;
            };
            collapse(wave, cell, &mut self.random_selector);
        }

        let grid = wave.to_grid();
        if let Some(cell) = wave.contradiction_cell() {
            let position = wave.position(cell);
            self.state = ModelState::Contradiction;
            debug!("Stepping stopped at contradiction in cell {cell}");
            return (
                grid,
                false,
                Some(AlgorithmError::Contradiction { cell, position }),
            );
        }

        if wave.is_collapsed() {
            if self.state != ModelState::Completed {
                info!("Stepped {}x{} grid to completion", self.width, self.height);
            }
            self.state = ModelState::Completed;
            (grid, true, None)
        } else {
            self.state = ModelState::Running;
            (grid, false, None)
        }
    }

    /// Discard the live wave so the next [`SimpleTiledModel::iterate`] starts over
    pub fn clear(&mut self) {
        self.wave = None;
        self.state = ModelState::Uninitialized;
    }

    /// Current grid snapshot, all `None` before the first step
    pub fn grid(&self) -> TileGrid {
        self.wave.as_ref().map_or_else(
            || TileGrid::unresolved(self.width, self.height),
            Wave::to_grid,
        )
    }

    /// Lifecycle state of the live wave
    pub const fn state(&self) -> ModelState {
        self.state
    }

    /// Live wave, if one has been built
    pub const fn wave(&self) -> Option<&Wave> {
        self.wave.as_ref()
    }

    /// Compiled rules shared by every wave of this model
    pub const fn rules(&self) -> &Arc<CompiledRules> {
        &self.rules
    }

    /// Seed the stream restarts from
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Grid width in cells
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether opposite edges are adjacent
    pub const fn periodic(&self) -> bool {
        self.periodic
    }

    const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    fn fresh_wave(&self) -> Wave {
        Wave::new(
            Arc::clone(&self.rules),
            self.width,
            self.height,
            self.periodic,
        )
    }
}

fn validate_dimension(parameter: &'static str, value: usize) -> Result<()> {
    if value == 0 || value > MAX_GRID_DIMENSION {
        return Err(invalid_parameter(
            parameter,
            &value,
            &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
        ));
    }
    Ok(())
}
